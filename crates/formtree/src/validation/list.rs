#![forbid(unsafe_code)]

//! Ordered validator sequence addressed by stable ids.

use std::fmt;

use super::Validator;

/// Handle to a validator installed on a control.
///
/// Ids are allocated by the owning [`FormTree`](crate::FormTree) and never
/// reused, so removing a validator by id cannot hit a different one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValidatorId(u64);

impl ValidatorId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ValidatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// The validators of one control, in installation order.
#[derive(Default)]
pub struct ValidatorList {
    entries: Vec<(ValidatorId, Box<dyn Validator>)>,
}

impl ValidatorList {
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids in installation order.
    pub fn ids(&self) -> impl Iterator<Item = ValidatorId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(dyn Validator + 'static)> + '_ {
        self.entries.iter().map(|(_, v)| &**v)
    }

    #[must_use]
    pub fn get(&self, id: ValidatorId) -> Option<&dyn Validator> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == id)
            .map(|(_, v)| &**v)
    }

    pub(crate) fn push(&mut self, id: ValidatorId, validator: Box<dyn Validator>) {
        self.entries.push((id, validator));
    }

    /// Remove the listed ids (all validators when `subset` is `None`).
    /// Returns how many were removed.
    pub(crate) fn remove(&mut self, subset: Option<&[ValidatorId]>) -> usize {
        let before = self.entries.len();
        match subset {
            None => self.entries.clear(),
            Some(ids) => self.entries.retain(|(id, _)| !ids.contains(id)),
        }
        before - self.entries.len()
    }
}

impl fmt::Debug for ValidatorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}
