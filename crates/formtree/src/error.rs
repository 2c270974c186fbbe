#![forbid(unsafe_code)]

//! Configuration and programmer errors raised by tree operations.
//!
//! Validation failures are not errors in this sense: they are data stored on
//! a control (see [`crate::validation`]). A [`FormError`] means the caller
//! asked for something the tree cannot do, and the operation was rejected
//! before any state changed.

use std::fmt;

use crate::tree::ControlId;

/// Rejected tree operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// The id does not name a control in this tree.
    UnknownControl { control: ControlId },
    /// A group-only operation was invoked on a leaf.
    NotAGroup { control: ControlId },
    /// `set_value` on a group that has no children.
    EmptyGroup { control: ControlId },
    /// A value map named a child the group does not have.
    MissingControl { control: ControlId, name: String },
    /// A full-replacement value map omitted one of the group's children.
    MissingValue { control: ControlId, name: String },
    /// A group was given a scalar where a name -> value map is required.
    ExpectedGroupValue { control: ControlId },
    /// The child is already owned by another group.
    AlreadyAttached { child: ControlId, parent: ControlId },
    /// Attaching the child would make a group its own descendant.
    WouldCycle { group: ControlId, child: ControlId },
    /// Only detached controls can be released from the arena.
    StillAttached { control: ControlId, parent: ControlId },
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownControl { control } => write!(f, "no control with id {control}"),
            Self::NotAGroup { control } => write!(f, "control {control} is not a group"),
            Self::EmptyGroup { control } => {
                write!(f, "group {control} has no controls registered yet")
            }
            Self::MissingControl { control, name } => {
                write!(f, "group {control} has no control named '{name}'")
            }
            Self::MissingValue { control, name } => {
                write!(f, "must supply a value for control '{name}' of group {control}")
            }
            Self::ExpectedGroupValue { control } => {
                write!(f, "group {control} expects a name -> value map")
            }
            Self::AlreadyAttached { child, parent } => {
                write!(f, "control {child} already belongs to group {parent}")
            }
            Self::WouldCycle { group, child } => {
                write!(f, "attaching {child} under {group} would create a cycle")
            }
            Self::StillAttached { control, parent } => {
                write!(f, "control {control} is still owned by group {parent}")
            }
        }
    }
}

impl std::error::Error for FormError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_child() {
        let err = FormError::MissingValue {
            control: ControlId::MIN,
            name: "email".into(),
        };
        assert_eq!(
            err.to_string(),
            "must supply a value for control 'email' of group #1"
        );
    }
}
