#![forbid(unsafe_code)]

//! Control validation with composable validators.
//!
//! This module provides:
//! - A core [`Validator`] trait invoked with a read-only view of the control
//! - Built-in validators for common patterns (required, min/max length, email, URL, range)
//! - Composable validators (And, Or, Not, All, Any) for complex rules
//! - Error messages with parameter interpolation for i18n support
//! - [`ValidatorList`], the id-keyed validator sequence each control owns
//!
//! A control runs every validator in its list and folds the failures into an
//! error map keyed by error code; duplicate codes collapse to the first one
//! reported.
//!
//! # Example
//!
//! ```rust
//! use formtree::FormTree;
//! use formtree::validation::{MinLength, Required, ValidatorBuilder};
//!
//! let mut tree = FormTree::new();
//! let name = tree.leaf("", vec![Box::new(Required::new()), Box::new(MinLength::new(3))]);
//! assert!(tree.control(name).unwrap().has_error("required"));
//!
//! tree.set_value(name, "alice", false).unwrap();
//! assert!(tree.control(name).unwrap().is_valid());
//!
//! let username = ValidatorBuilder::new().required().max_length(20).build();
//! let other = tree.leaf("bob", vec![Box::new(username)]);
//! assert!(tree.control(other).unwrap().is_valid());
//! ```

mod list;
mod validators;

pub use list::{ValidatorId, ValidatorList};
pub use validators::{
    // Composition
    All,
    And,
    Any,
    // Error codes
    ERROR_CODE_EMAIL,
    ERROR_CODE_MAX_LENGTH,
    ERROR_CODE_MIN_LENGTH,
    ERROR_CODE_PATTERN,
    ERROR_CODE_RANGE,
    ERROR_CODE_REQUIRED,
    ERROR_CODE_URL,
    // Built-in validators
    Email,
    FnValidator,
    MaxLength,
    MinLength,
    Not,
    Or,
    Pattern,
    Range,
    Required,
    Url,
    // Core types
    ErrorMap,
    ValidationError,
    ValidationResult,
    Validator,
    // Builder
    ValidatorBuilder,
};
