#![forbid(unsafe_code)]

//! Composite controls: named children, registration, and value distribution.
//!
//! A group owns its children exclusively. Every attach goes through
//! [`FormTree::register_control`], which rejects children that already have a
//! parent and groups that would end up inside their own subtree, so the
//! parent links always form a forest.
//!
//! # Value shapes
//!
//! [`FormTree::set_value`] on a group is strict: the map must name every
//! child and nothing else, recursively. [`FormTree::patch_value`] is lenient:
//! unknown names are ignored and missing children keep their value.

use std::collections::BTreeMap;

use crate::control::ControlKind;
use crate::error::FormError;
use crate::tree::{ControlId, FormTree};
use crate::validation::Validator;
use crate::value::ControlValue;

impl FormTree {
    /// Create a group adopting `children`.
    ///
    /// When a name (or a child) repeats, the first entry wins and the later
    /// one is skipped. Fails without changing the tree if any child is
    /// unknown or already owned.
    pub fn group<I, K>(
        &mut self,
        children: I,
        validators: Vec<Box<dyn Validator>>,
    ) -> Result<ControlId, FormError>
    where
        I: IntoIterator<Item = (K, ControlId)>,
        K: Into<String>,
    {
        let children: Vec<(String, ControlId)> = children
            .into_iter()
            .map(|(name, child)| (name.into(), child))
            .collect();

        let mut accepted: Vec<(String, ControlId)> = Vec::with_capacity(children.len());
        for (name, child) in children {
            if let Some((_, first)) = accepted.iter().find(|(taken, _)| *taken == name) {
                tracing::trace!(name = %name, kept = %first, skipped = %child, "duplicate name");
                continue;
            }
            if let Some(parent) = self.node(child)?.parent {
                tracing::warn!(child = %child, parent = %parent, "child already owned");
                return Err(FormError::AlreadyAttached { child, parent });
            }
            if accepted.iter().any(|(_, taken)| *taken == child) {
                tracing::trace!(name = %name, child = %child, "child listed twice");
                continue;
            }
            accepted.push((name, child));
        }

        let id = self.insert_node(
            ControlValue::Group(BTreeMap::new()),
            ControlKind::Group(BTreeMap::new()),
            validators,
        );
        for (name, child) in accepted {
            self.register_control(id, name, child)?;
        }
        self.refresh_new(id);
        tracing::trace!(control = %id, "created group");
        Ok(id)
    }

    /// Attach `child` under `name` without revalidating.
    ///
    /// If `name` is already taken the existing child is returned and `child`
    /// is left alone.
    pub fn register_control(
        &mut self,
        group: ControlId,
        name: impl Into<String>,
        child: ControlId,
    ) -> Result<ControlId, FormError> {
        let name = name.into();
        if let Some(existing) = self.group_controls(group)?.get(&name) {
            return Ok(*existing);
        }
        self.check_attachable(group, child)?;

        self.node_mut(child)?.parent = Some(group);
        if let ControlKind::Group(controls) = &mut self.node_mut(group)?.kind {
            controls.insert(name.clone(), child);
        }
        tracing::debug!(group = %group, child = %child, name = %name, "registered control");
        Ok(child)
    }

    /// [`register_control`](Self::register_control), then revalidate the
    /// group and its ancestors.
    pub fn add_control(
        &mut self,
        group: ControlId,
        name: impl Into<String>,
        child: ControlId,
    ) -> Result<ControlId, FormError> {
        let registered = self.register_control(group, name, child)?;
        self.update_value_and_validity(group, false)?;
        Ok(registered)
    }

    /// Replace whatever occupies `name` (possibly nothing) with `child`
    /// (possibly nothing), then revalidate.
    ///
    /// Returns the displaced control, if any.
    pub fn set_control(
        &mut self,
        group: ControlId,
        name: impl Into<String>,
        child: Option<ControlId>,
    ) -> Result<Option<ControlId>, FormError> {
        let name = name.into();
        let current = self.group_controls(group)?.get(&name).copied();
        if let Some(child) = child
            && current != Some(child)
        {
            self.check_attachable(group, child)?;
        }

        let displaced = self.take_control(group, &name)?;
        if let Some(child) = child {
            self.node_mut(child)?.parent = Some(group);
            if let ControlKind::Group(controls) = &mut self.node_mut(group)?.kind {
                controls.insert(name.clone(), child);
            }
            tracing::debug!(group = %group, child = %child, name = %name, "set control");
        }
        self.update_value_and_validity(group, false)?;
        Ok(displaced)
    }

    /// Delete the child registered under `name`, then revalidate.
    ///
    /// Returns the removed control. With
    /// [`FormConfig::detach_removed`](crate::FormConfig::detach_removed) set
    /// (the default) it is detached and may be attached elsewhere or
    /// [released](Self::release).
    pub fn remove_control(
        &mut self,
        group: ControlId,
        name: &str,
    ) -> Result<Option<ControlId>, FormError> {
        let removed = self.take_control(group, name)?;
        self.update_value_and_validity(group, false)?;
        Ok(removed)
    }

    /// True iff `group` has an enabled child called `name`.
    #[must_use]
    pub fn contains(&self, group: ControlId, name: &str) -> bool {
        self.control(group)
            .is_ok_and(|control| control.contains(name))
    }

    fn group_controls(&self, group: ControlId) -> Result<&BTreeMap<String, ControlId>, FormError> {
        self.node(group)?
            .controls()
            .ok_or(FormError::NotAGroup { control: group })
    }

    fn check_attachable(&self, group: ControlId, child: ControlId) -> Result<(), FormError> {
        if let Some(parent) = self.node(child)?.parent {
            tracing::warn!(child = %child, parent = %parent, "child already owned");
            return Err(FormError::AlreadyAttached { child, parent });
        }
        // A parentless child can only be an ancestor of `group` by being its root.
        if self.root(group)? == child {
            tracing::warn!(group = %group, child = %child, "attach would create a cycle");
            return Err(FormError::WouldCycle { group, child });
        }
        Ok(())
    }

    fn take_control(&mut self, group: ControlId, name: &str) -> Result<Option<ControlId>, FormError> {
        let ControlKind::Group(controls) = &mut self.node_mut(group)?.kind else {
            return Err(FormError::NotAGroup { control: group });
        };
        let Some(removed) = controls.remove(name) else {
            return Ok(None);
        };
        if self.config().detach_removed {
            self.node_mut(removed)?.parent = None;
        }
        tracing::debug!(
            group = %group,
            child = %removed,
            name,
            detached = self.config().detach_removed,
            "removed control"
        );
        Ok(Some(removed))
    }

    // -------------------------------------------------------------------------
    // Values
    // -------------------------------------------------------------------------

    /// Shape check for a full replacement, run before anything is written.
    pub(crate) fn check_group_value(
        &self,
        id: ControlId,
        value: &ControlValue,
    ) -> Result<(), FormError> {
        let controls = self.group_controls(id)?;
        if controls.is_empty() {
            return Err(FormError::EmptyGroup { control: id });
        }
        let ControlValue::Group(entries) = value else {
            return Err(FormError::ExpectedGroupValue { control: id });
        };
        if let Some(name) = controls.keys().find(|name| !entries.contains_key(*name)) {
            return Err(FormError::MissingValue {
                control: id,
                name: name.clone(),
            });
        }
        if let Some(name) = entries.keys().find(|name| !controls.contains_key(*name)) {
            return Err(FormError::MissingControl {
                control: id,
                name: name.clone(),
            });
        }
        for (name, child) in controls {
            if let Some(entry) = entries.get(name) {
                self.check_full_value(*child, entry)?;
            }
        }
        Ok(())
    }

    /// Distribute an already checked map into the children, then revalidate
    /// once at this level.
    pub(crate) fn set_group_value(
        &mut self,
        id: ControlId,
        value: ControlValue,
        only_self: bool,
    ) -> Result<(), FormError> {
        let ControlValue::Group(mut entries) = value else {
            return Err(FormError::ExpectedGroupValue { control: id });
        };
        for (name, child) in self.named_children(id)? {
            if let Some(entry) = entries.remove(&name) {
                self.write_value(child, entry, true)?;
            }
        }
        self.update_value_and_validity(id, only_self)
    }

    /// Forward known entries to their children; ignore everything else.
    pub(crate) fn patch_group_value(
        &mut self,
        id: ControlId,
        value: ControlValue,
        only_self: bool,
    ) -> Result<(), FormError> {
        if let ControlValue::Group(mut entries) = value {
            for (name, child) in self.named_children(id)? {
                if let Some(entry) = entries.remove(&name) {
                    self.patch_value(child, entry, true)?;
                }
            }
            if !entries.is_empty() {
                tracing::trace!(control = %id, ignored = entries.len(), "patch ignored unknown names");
            }
        }
        self.update_value_and_validity(id, only_self)
    }
}
