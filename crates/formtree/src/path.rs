#![forbid(unsafe_code)]

//! Name paths into a control subtree.
//!
//! A path is a sequence of child names. Dotted strings split on `.`, so
//! `"address.city"` and `["address", "city"]` name the same control. The
//! empty path names nothing; it does not resolve to the starting control.
//! Resolution gives up as soon as it meets a leaf or a name the current group
//! does not have.

use std::fmt;

use crate::tree::{ControlId, FormTree};

/// Sequence of child names, resolved relative to some control.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ControlPath(Vec<String>);

impl ControlPath {
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Append one segment.
    #[must_use]
    pub fn join(mut self, segment: impl Into<String>) -> Self {
        self.0.push(segment.into());
        self
    }

    pub(crate) fn resolve(&self, tree: &FormTree, from: ControlId) -> Option<ControlId> {
        if self.0.is_empty() {
            return None;
        }
        let mut current = from;
        for segment in &self.0 {
            let controls = tree.node(current).ok()?.controls()?;
            current = *controls.get(segment)?;
        }
        Some(current)
    }
}

impl fmt::Display for ControlPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl From<&str> for ControlPath {
    fn from(path: &str) -> Self {
        if path.is_empty() {
            return Self::default();
        }
        Self(path.split('.').map(str::to_owned).collect())
    }
}

impl From<String> for ControlPath {
    fn from(path: String) -> Self {
        Self::from(path.as_str())
    }
}

impl From<&String> for ControlPath {
    fn from(path: &String) -> Self {
        Self::from(path.as_str())
    }
}

impl From<&[&str]> for ControlPath {
    fn from(segments: &[&str]) -> Self {
        Self(segments.iter().map(|s| (*s).to_owned()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ControlPath {
    fn from(segments: [&str; N]) -> Self {
        Self(segments.iter().map(|s| (*s).to_owned()).collect())
    }
}

impl From<Vec<&str>> for ControlPath {
    fn from(segments: Vec<&str>) -> Self {
        Self::from(segments.as_slice())
    }
}

impl From<Vec<String>> for ControlPath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl From<&ControlPath> for ControlPath {
    fn from(path: &ControlPath) -> Self {
        path.clone()
    }
}
