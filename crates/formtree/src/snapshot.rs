#![forbid(unsafe_code)]

//! Plain-data read model of a control subtree.
//!
//! Render layers and binding adapters usually want the state of a whole form
//! at once without holding a borrow of the [`FormTree`](crate::FormTree).
//! A [`ControlSnapshot`] is that copy: value, status, formatted error
//! messages, interaction flags, and the same for every child.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::status::ControlStatus;
use crate::tree::{ControlId, ControlRef};
use crate::value::ControlValue;

/// Detached copy of one control and its descendants.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControlSnapshot {
    pub id: ControlId,
    pub value: ControlValue,
    pub status: ControlStatus,
    /// Error code -> formatted message.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "BTreeMap::is_empty"))]
    pub errors: BTreeMap<String, String>,
    pub touched: bool,
    pub pristine: bool,
    /// Every child, enabled or not. Empty for leaves.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "BTreeMap::is_empty"))]
    pub children: BTreeMap<String, ControlSnapshot>,
}

impl ControlSnapshot {
    pub(crate) fn capture(control: ControlRef<'_>) -> Self {
        let errors = control
            .errors()
            .map(|errors| {
                errors
                    .iter()
                    .map(|(code, error)| (code.clone(), error.format_message()))
                    .collect()
            })
            .unwrap_or_default();
        let children = control
            .children()
            .map(|(name, child)| (name.to_owned(), Self::capture(child)))
            .collect();
        Self {
            id: control.id(),
            value: control.value().clone(),
            status: control.status(),
            errors,
            touched: control.is_touched(),
            pristine: control.is_pristine(),
            children,
        }
    }

    /// Messages a UI should show right now: all of them once the control has
    /// been touched, none before. Sorted by error code.
    #[must_use]
    pub fn visible_errors(&self) -> Vec<&str> {
        if !self.touched {
            return Vec::new();
        }
        self.errors.values().map(String::as_str).collect()
    }

    #[must_use]
    pub fn child(&self, name: &str) -> Option<&ControlSnapshot> {
        self.children.get(name)
    }

    /// Serialize to a JSON string.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a snapshot previously produced by [`to_json`](Self::to_json).
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
