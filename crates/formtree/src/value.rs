#![forbid(unsafe_code)]

//! Dynamically-typed control values.

use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The value held by a control.
///
/// Leaves hold any variant; groups always hold [`ControlValue::Group`],
/// re-derived from their children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ControlValue {
    /// No value.
    #[default]
    Null,
    /// Boolean toggle.
    Bool(bool),
    /// Integer input.
    Number(i64),
    /// Free text.
    Text(String),
    /// Name -> value mapping of a group.
    Group(BTreeMap<String, ControlValue>),
}

impl ControlValue {
    /// Build a group value from `(name, value)` pairs.
    pub fn group<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<ControlValue>,
    {
        Self::Group(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_group(&self) -> Option<&BTreeMap<String, ControlValue>> {
        match self {
            Self::Group(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a named entry of a group value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ControlValue> {
        self.as_group().and_then(|map| map.get(name))
    }
}

impl fmt::Display for ControlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Group(map) => {
                f.write_str("{")?;
                for (i, (name, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<&str> for ControlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ControlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for ControlValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ControlValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for ControlValue {
    fn from(value: i32) -> Self {
        Self::Number(i64::from(value))
    }
}

impl From<BTreeMap<String, ControlValue>> for ControlValue {
    fn from(value: BTreeMap<String, ControlValue>) -> Self {
        Self::Group(value)
    }
}

impl<T: Into<ControlValue>> From<Option<T>> for ControlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
