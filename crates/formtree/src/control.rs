#![forbid(unsafe_code)]

//! Control records and the per-variant capability hooks.
//!
//! The shared state machine in [`crate::propagation`] is written once against
//! four hooks, each dispatched on [`ControlKind`]:
//!
//! | Hook | Leaf | Group |
//! |------|------|-------|
//! | `children` | none | every registered child |
//! | `any_controls` | `false` | some enabled child satisfies the predicate |
//! | `all_controls_disabled` | own disabled flag | no enabled child, and non-empty or itself disabled |
//! | `update_value` | no-op | fold children into a name -> value map |

use std::collections::BTreeMap;

use crate::error::FormError;
use crate::status::ControlStatus;
use crate::tree::{ControlId, FormTree};
use crate::validation::{ErrorMap, ValidationResult, ValidatorList};
use crate::value::ControlValue;

/// Variant payload of a control.
#[derive(Debug)]
pub(crate) enum ControlKind {
    Leaf,
    Group(BTreeMap<String, ControlId>),
}

/// One control in the arena.
#[derive(Debug)]
pub(crate) struct ControlNode {
    pub(crate) value: ControlValue,
    pub(crate) status: ControlStatus,
    pub(crate) errors: Option<ErrorMap>,
    pub(crate) touched: bool,
    pub(crate) pristine: bool,
    pub(crate) parent: Option<ControlId>,
    pub(crate) validators: ValidatorList,
    pub(crate) kind: ControlKind,
}

impl ControlNode {
    pub(crate) fn new(value: ControlValue, kind: ControlKind, validators: ValidatorList) -> Self {
        Self {
            value,
            status: ControlStatus::Valid,
            errors: None,
            touched: false,
            pristine: true,
            parent: None,
            validators,
            kind,
        }
    }

    pub(crate) fn controls(&self) -> Option<&BTreeMap<String, ControlId>> {
        match &self.kind {
            ControlKind::Leaf => None,
            ControlKind::Group(controls) => Some(controls),
        }
    }
}

impl FormTree {
    /// Direct children, in name order. Empty for leaves.
    pub(crate) fn children(&self, id: ControlId) -> Result<Vec<ControlId>, FormError> {
        Ok(self
            .node(id)?
            .controls()
            .map(|controls| controls.values().copied().collect())
            .unwrap_or_default())
    }

    /// True iff some enabled child satisfies `pred`.
    pub(crate) fn any_controls(
        &self,
        id: ControlId,
        pred: impl Fn(&ControlNode) -> bool,
    ) -> Result<bool, FormError> {
        let Some(controls) = self.node(id)?.controls() else {
            return Ok(false);
        };
        for child in controls.values() {
            let child = self.node(*child)?;
            if child.status.is_enabled() && pred(child) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// An empty group is "all disabled" only if it was disabled itself.
    pub(crate) fn all_controls_disabled(&self, id: ControlId) -> Result<bool, FormError> {
        let node = self.node(id)?;
        let Some(controls) = node.controls() else {
            return Ok(node.status.is_disabled());
        };
        for child in controls.values() {
            if self.node(*child)?.status.is_enabled() {
                return Ok(false);
            }
        }
        Ok(!controls.is_empty() || node.status.is_disabled())
    }

    /// Re-derive a group's value from its children.
    ///
    /// Disabled children are left out unless the group itself is disabled.
    pub(crate) fn update_value(&mut self, id: ControlId) -> Result<(), FormError> {
        let node = self.node(id)?;
        let Some(controls) = node.controls() else {
            return Ok(());
        };
        let include_disabled = node.status.is_disabled();
        let mut value = BTreeMap::new();
        for (name, child) in controls {
            let child = self.node(*child)?;
            if include_disabled || child.status.is_enabled() {
                value.insert(name.clone(), child.value.clone());
            }
        }
        self.node_mut(id)?.value = ControlValue::Group(value);
        Ok(())
    }

    /// Run every validator and merge failures by code. `None` when all pass.
    pub(crate) fn run_validators(&self, id: ControlId) -> Result<Option<ErrorMap>, FormError> {
        let control = self.control(id)?;
        let mut errors = ErrorMap::new();
        for validator in control.validators().iter() {
            if let ValidationResult::Invalid(error) = validator.validate(control) {
                errors.entry(error.code.to_string()).or_insert(error);
            }
        }
        Ok((!errors.is_empty()).then_some(errors))
    }

    /// Final status from the control's own errors and its enabled children.
    pub(crate) fn calculate_status(&self, id: ControlId) -> Result<ControlStatus, FormError> {
        if self.all_controls_disabled(id)? {
            return Ok(ControlStatus::Disabled);
        }
        if self.node(id)?.errors.is_some() {
            return Ok(ControlStatus::Invalid);
        }
        if self.any_controls(id, |child| child.status.is_invalid())? {
            return Ok(ControlStatus::Invalid);
        }
        Ok(ControlStatus::Valid)
    }
}
