#![forbid(unsafe_code)]

//! Reactive form state as a tree of controls.
//!
//! A [`FormTree`] owns every control. Leaves hold a single [`ControlValue`];
//! groups own named children and derive their value and status from them.
//! Each control carries:
//!
//! - a [`ControlStatus`] (`Valid`, `Invalid` or `Disabled`, exactly one),
//! - the errors its [validators](validation) reported, keyed by error code,
//! - `touched` / `pristine` interaction flags.
//!
//! Mutations go through `FormTree` methods and leave the whole tree
//! consistent before they return: values and validity propagate upward,
//! structural operations (disable, enable, untouch, pristine) cascade down.
//! Reads go through [`ControlRef`], which is also what validators see.
//!
//! # Example
//!
//! ```rust
//! use formtree::{ControlValue, FormTree};
//! use formtree::validation::{Email, Required};
//!
//! let mut tree = FormTree::new();
//! let email = tree.leaf("", vec![Box::new(Required::new()), Box::new(Email::new())]);
//! let password = tree.leaf("", vec![Box::new(Required::new())]);
//! let login = tree.group([("email", email), ("password", password)], Vec::new())?;
//!
//! assert!(tree.control(login)?.is_invalid());
//! assert_eq!(
//!     tree.control(login)?.value(),
//!     &ControlValue::group([("email", ""), ("password", "")])
//! );
//!
//! tree.patch_value(
//!     login,
//!     ControlValue::group([("email", "ada@example.com"), ("password", "hunter22")]),
//!     false,
//! )?;
//! assert!(tree.control(login)?.is_valid());
//!
//! tree.mark_as_touched(email, false)?;
//! assert!(tree.control(login)?.is_touched());
//! # Ok::<(), formtree::FormError>(())
//! ```
//!
//! # Ownership
//!
//! Children are referenced by [`ControlId`] and know their parent only by id,
//! so the tree needs no shared or weak pointers. A child belongs to at most
//! one group; attaching it elsewhere fails with [`FormError::AlreadyAttached`]
//! until it is removed.
//!
//! # Configuration
//!
//! [`FormConfig`] holds the per-tree behavior switches and can be read from
//! `FORMTREE_*` environment variables.

pub mod config;
mod control;
pub mod error;
mod group;
mod leaf;
pub mod path;
mod propagation;
pub mod snapshot;
pub mod status;
pub mod tree;
pub mod validation;
pub mod value;

pub use config::{FormConfig, PristinePropagation};
pub use error::FormError;
pub use path::ControlPath;
pub use snapshot::ControlSnapshot;
pub use status::ControlStatus;
pub use tree::{ControlId, ControlRef, FormTree};
pub use value::ControlValue;
