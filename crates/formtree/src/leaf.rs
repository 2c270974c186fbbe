#![forbid(unsafe_code)]

//! Single-value controls.

use crate::control::ControlKind;
use crate::error::FormError;
use crate::tree::{ControlId, FormTree};
use crate::validation::Validator;
use crate::value::ControlValue;

impl FormTree {
    /// Create a free leaf control holding `value`.
    ///
    /// The new control is validated immediately; it has no parent yet, so
    /// nothing propagates.
    pub fn leaf(
        &mut self,
        value: impl Into<ControlValue>,
        validators: Vec<Box<dyn Validator>>,
    ) -> ControlId {
        let id = self.insert_node(value.into(), ControlKind::Leaf, validators);
        self.refresh_new(id);
        tracing::trace!(control = %id, "created leaf");
        id
    }

    /// Store a leaf value and revalidate.
    pub(crate) fn set_leaf_value(
        &mut self,
        id: ControlId,
        value: ControlValue,
        only_self: bool,
    ) -> Result<(), FormError> {
        self.node_mut(id)?.value = value;
        self.update_value_and_validity(id, only_self)
    }
}
