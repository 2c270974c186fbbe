#![forbid(unsafe_code)]

//! The shared control state machine.
//!
//! Every operation here is written once against the hooks in
//! [`crate::control`] and works the same for leaves and groups.
//!
//! # Directions
//!
//! - Value and validity flow **upward**: after a control recomputes, its
//!   parent recomputes, and so on to the root, unless `only_self` is set.
//! - Structural operations (untouch, pristine, disable, enable) cascade
//!   **downward** to every child first, enabled or not, with `only_self`
//!   forced on, and then fix up the ancestors.
//! - Touch and dirty marks never cascade to siblings; ancestors re-derive
//!   their flag from their enabled children.
//!
//! Disabling or revalidating a disabled control clears its errors. Only a
//! manual `set_error` can record one on a disabled control.

use crate::config::PristinePropagation;
use crate::error::FormError;
use crate::status::ControlStatus;
use crate::tree::{ControlId, FormTree};
use crate::validation::ValidationError;

impl FormTree {
    /// Recompute value, errors and status of `id`, then of each ancestor
    /// unless `only_self`.
    pub fn update_value_and_validity(
        &mut self,
        id: ControlId,
        only_self: bool,
    ) -> Result<(), FormError> {
        let mut current = id;
        loop {
            let provisional = if self.all_controls_disabled(current)? {
                ControlStatus::Disabled
            } else {
                ControlStatus::Valid
            };
            self.node_mut(current)?.status = provisional;
            self.update_value(current)?;

            if provisional.is_enabled() {
                let errors = self.run_validators(current)?;
                self.node_mut(current)?.errors = errors;
                let status = self.calculate_status(current)?;
                self.node_mut(current)?.status = status;
            } else {
                self.node_mut(current)?.errors = None;
            }
            tracing::trace!(control = %current, status = %self.node(current)?.status, "recomputed");

            if only_self {
                return Ok(());
            }
            match self.node(current)?.parent {
                Some(parent) => current = parent,
                None => return Ok(()),
            }
        }
    }

    /// First validation of a control that nothing can reference yet.
    pub(crate) fn refresh_new(&mut self, id: ControlId) {
        if let Err(err) = self.update_value_and_validity(id, true) {
            tracing::warn!(control = %id, error = %err, "initial validation failed");
        }
    }

    // -------------------------------------------------------------------------
    // Touched
    // -------------------------------------------------------------------------

    /// Mark `id` touched and let its ancestors re-derive their flag.
    pub fn mark_as_touched(&mut self, id: ControlId, only_self: bool) -> Result<(), FormError> {
        self.node_mut(id)?.touched = true;
        if !only_self && let Some(parent) = self.node(id)?.parent {
            self.update_touched(parent)?;
        }
        Ok(())
    }

    /// Mark `id` and every descendant touched, e.g. on submit.
    pub fn mark_all_as_touched(&mut self, id: ControlId) -> Result<(), FormError> {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            self.node_mut(current)?.touched = true;
            stack.extend(self.children(current)?);
        }
        if let Some(parent) = self.node(id)?.parent {
            self.update_touched(parent)?;
        }
        Ok(())
    }

    /// Clear the touched flag on `id` and its whole subtree.
    pub fn mark_as_untouched(&mut self, id: ControlId, only_self: bool) -> Result<(), FormError> {
        self.node_mut(id)?.touched = false;
        for child in self.children(id)? {
            self.mark_as_untouched(child, true)?;
        }
        if !only_self && let Some(parent) = self.node(id)?.parent {
            self.update_touched(parent)?;
        }
        Ok(())
    }

    /// `touched` := some enabled child is touched, from `id` to the root.
    fn update_touched(&mut self, id: ControlId) -> Result<(), FormError> {
        let mut current = Some(id);
        while let Some(id) = current {
            let touched = self.any_controls(id, |child| child.touched)?;
            let node = self.node_mut(id)?;
            node.touched = touched;
            current = node.parent;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Pristine / dirty
    // -------------------------------------------------------------------------

    /// Mark `id` dirty, and its ancestors unless `only_self`.
    pub fn mark_as_dirty(&mut self, id: ControlId, only_self: bool) -> Result<(), FormError> {
        let mut current = id;
        loop {
            let node = self.node_mut(current)?;
            node.pristine = false;
            match node.parent {
                Some(parent) if !only_self => current = parent,
                _ => return Ok(()),
            }
        }
    }

    /// Mark `id` and its whole subtree pristine.
    ///
    /// What the ancestors recompute afterwards depends on
    /// [`FormConfig::pristine_propagation`](crate::FormConfig::pristine_propagation).
    /// The default, [`PristinePropagation::Touched`], re-derives their
    /// *touched* flag and leaves a dirty parent dirty.
    pub fn mark_as_pristine(&mut self, id: ControlId, only_self: bool) -> Result<(), FormError> {
        self.node_mut(id)?.pristine = true;
        for child in self.children(id)? {
            self.mark_as_pristine(child, true)?;
        }
        if only_self {
            return Ok(());
        }
        if let Some(parent) = self.node(id)?.parent {
            match self.config().pristine_propagation {
                PristinePropagation::Touched => self.update_touched(parent)?,
                PristinePropagation::Pristine => self.update_pristine(parent)?,
            }
        }
        Ok(())
    }

    /// `pristine` := no enabled child is dirty, from `id` to the root.
    fn update_pristine(&mut self, id: ControlId) -> Result<(), FormError> {
        let mut current = Some(id);
        while let Some(id) = current {
            let dirty = self.any_controls(id, |child| !child.pristine)?;
            let node = self.node_mut(id)?;
            node.pristine = !dirty;
            current = node.parent;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Disable / enable
    // -------------------------------------------------------------------------

    /// Disable `id` and its whole subtree.
    ///
    /// The parent drops the subtree from its value and validity unless
    /// `only_self`.
    pub fn disable(&mut self, id: ControlId, only_self: bool) -> Result<(), FormError> {
        let node = self.node_mut(id)?;
        node.status = ControlStatus::Disabled;
        node.errors = None;
        for child in self.children(id)? {
            self.disable(child, true)?;
        }
        self.update_value(id)?;
        tracing::debug!(control = %id, only_self, "disabled");

        if !only_self && let Some(parent) = self.node(id)?.parent {
            self.update_value_and_validity(parent, false)?;
        }
        Ok(())
    }

    /// Enable `id` and its whole subtree, revalidating from scratch.
    pub fn enable(&mut self, id: ControlId, only_self: bool) -> Result<(), FormError> {
        let node = self.node_mut(id)?;
        node.status = ControlStatus::Valid;
        node.errors = None;
        for child in self.children(id)? {
            self.enable(child, true)?;
        }
        self.update_value_and_validity(id, true)?;
        tracing::debug!(control = %id, only_self, status = %self.node(id)?.status, "enabled");

        if !only_self && let Some(parent) = self.node(id)?.parent {
            self.update_value_and_validity(parent, false)?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Manual errors
    // -------------------------------------------------------------------------

    /// Record `error` under its code, replacing any error with that code.
    ///
    /// Only the status of `id` is recomputed; ancestors are not touched.
    /// A disabled control keeps the error but stays disabled; enabling it
    /// revalidates from scratch and drops the error.
    pub fn set_error(&mut self, id: ControlId, error: ValidationError) -> Result<(), FormError> {
        let node = self.node_mut(id)?;
        node.errors
            .get_or_insert_with(Default::default)
            .insert(error.code.to_string(), error);
        let status = self.calculate_status(id)?;
        self.node_mut(id)?.status = status;
        Ok(())
    }

    /// Drop the error recorded under `code`, if any, and recompute the status
    /// of `id`. Removing the last error leaves `errors` at `None`.
    pub fn remove_error(&mut self, id: ControlId, code: &str) -> Result<(), FormError> {
        let node = self.node_mut(id)?;
        if let Some(errors) = &mut node.errors {
            errors.remove(code);
        }
        if node.errors.as_ref().is_some_and(|errors| errors.is_empty()) {
            node.errors = None;
        }
        let status = self.calculate_status(id)?;
        self.node_mut(id)?.status = status;
        Ok(())
    }
}
