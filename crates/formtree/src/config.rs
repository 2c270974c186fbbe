#![forbid(unsafe_code)]

//! Per-tree behavior switches.
//!
//! | Variable | Values | Default |
//! |----------|--------|---------|
//! | `FORMTREE_DETACH_REMOVED` | `1`/`true`, `0`/`false` | `true` |
//! | `FORMTREE_PRISTINE_PROPAGATION` | `touched`, `pristine` | `touched` |

use std::env;

/// What `mark_as_pristine` recomputes on the parent chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PristinePropagation {
    /// Recompute the ancestors' *touched* flag, leaving their pristine flag
    /// alone. A parent marked dirty stays dirty after its children are
    /// marked pristine again.
    #[default]
    Touched,
    /// Recompute each ancestor's pristine flag as "no enabled child is dirty".
    Pristine,
}

impl PristinePropagation {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "touched" => Some(Self::Touched),
            "pristine" => Some(Self::Pristine),
            _ => None,
        }
    }
}

/// Behavior switches for a [`FormTree`](crate::FormTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormConfig {
    /// Clear the parent link of a child displaced by `remove_control` or
    /// `set_control`, turning it back into a free control.
    pub detach_removed: bool,
    /// Ancestor recomputation performed by `mark_as_pristine`.
    pub pristine_propagation: PristinePropagation,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            detach_removed: true,
            pristine_propagation: PristinePropagation::default(),
        }
    }
}

impl FormConfig {
    /// Read overrides from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read overrides through `lookup`; unset or unparsable keys keep their
    /// defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = lookup("FORMTREE_DETACH_REMOVED") {
            match parse_flag(&raw) {
                Some(flag) => config.detach_removed = flag,
                None => tracing::warn!(value = %raw, "ignoring FORMTREE_DETACH_REMOVED"),
            }
        }
        if let Some(raw) = lookup("FORMTREE_PRISTINE_PROPAGATION") {
            match PristinePropagation::parse(&raw) {
                Some(mode) => config.pristine_propagation = mode,
                None => tracing::warn!(value = %raw, "ignoring FORMTREE_PRISTINE_PROPAGATION"),
            }
        }
        config
    }

    #[must_use]
    pub fn detach_removed(mut self, detach: bool) -> Self {
        self.detach_removed = detach;
        self
    }

    #[must_use]
    pub fn pristine_propagation(mut self, mode: PristinePropagation) -> Self {
        self.pristine_propagation = mode;
        self
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw == "1" || raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw == "0" || raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn defaults_without_overrides() {
        assert_eq!(FormConfig::from_lookup(|_| None), FormConfig::default());
        assert!(FormConfig::default().detach_removed);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = FormConfig::from_lookup(lookup(&[
            ("FORMTREE_DETACH_REMOVED", "false"),
            ("FORMTREE_PRISTINE_PROPAGATION", "Pristine"),
        ]));
        assert!(!config.detach_removed);
        assert_eq!(config.pristine_propagation, PristinePropagation::Pristine);
    }

    #[test]
    fn garbage_keeps_defaults() {
        let config = FormConfig::from_lookup(lookup(&[
            ("FORMTREE_DETACH_REMOVED", "maybe"),
            ("FORMTREE_PRISTINE_PROPAGATION", "dirty"),
        ]));
        assert_eq!(config, FormConfig::default());
    }
}
