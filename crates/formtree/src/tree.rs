#![forbid(unsafe_code)]

//! The control arena and its read-only views.
//!
//! A [`FormTree`] owns every control. Controls refer to each other by
//! [`ControlId`]: a group maps names to child ids, and each child records its
//! owning group as a plain id. Ownership therefore only runs downward, and the
//! attach checks in [`crate::group`] keep the parent links acyclic.
//!
//! Several independent trees may live in one arena; a control without a
//! parent is its own root.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::config::FormConfig;
use crate::control::{ControlKind, ControlNode};
use crate::error::FormError;
use crate::path::ControlPath;
use crate::snapshot::ControlSnapshot;
use crate::status::ControlStatus;
use crate::validation::{ErrorMap, ValidationError, Validator, ValidatorId, ValidatorList};
use crate::value::ControlValue;

/// Stable identifier for a control.
///
/// `0` is reserved so ids are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ControlId(u64);

impl ControlId {
    /// Lowest valid control id.
    pub const MIN: Self = Self(1);

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Arena owning a forest of form controls.
#[derive(Debug)]
pub struct FormTree {
    nodes: BTreeMap<ControlId, ControlNode>,
    next_id: ControlId,
    next_validator: u64,
    config: FormConfig,
}

impl Default for FormTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FormTree {
    /// An empty arena with default behavior switches.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(FormConfig::default())
    }

    /// An empty arena using `config` for removal and pristine behavior.
    #[must_use]
    pub fn with_config(config: FormConfig) -> Self {
        Self {
            nodes: BTreeMap::new(),
            next_id: ControlId::MIN,
            next_validator: 1,
            config,
        }
    }

    /// Behavior switches this tree was built with.
    #[must_use]
    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// Number of controls in the arena, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when the arena holds no controls.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` still names a control in this arena.
    #[must_use]
    pub fn contains_id(&self, id: ControlId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub(crate) fn node(&self, id: ControlId) -> Result<&ControlNode, FormError> {
        self.nodes
            .get(&id)
            .ok_or(FormError::UnknownControl { control: id })
    }

    pub(crate) fn node_mut(&mut self, id: ControlId) -> Result<&mut ControlNode, FormError> {
        self.nodes
            .get_mut(&id)
            .ok_or(FormError::UnknownControl { control: id })
    }

    /// Store a fresh control; validity is computed by the caller.
    pub(crate) fn insert_node(
        &mut self,
        value: ControlValue,
        kind: ControlKind,
        validators: Vec<Box<dyn Validator>>,
    ) -> ControlId {
        let list = self.validator_list(validators).1;
        let id = self.next_id;
        self.next_id = id.next();
        self.nodes.insert(id, ControlNode::new(value, kind, list));
        id
    }

    fn next_validator_id(&mut self) -> ValidatorId {
        let id = ValidatorId::new(self.next_validator);
        self.next_validator += 1;
        id
    }

    fn validator_list(
        &mut self,
        validators: Vec<Box<dyn Validator>>,
    ) -> (Vec<ValidatorId>, ValidatorList) {
        let mut list = ValidatorList::default();
        let mut ids = Vec::with_capacity(validators.len());
        for validator in validators {
            let id = self.next_validator_id();
            list.push(id, validator);
            ids.push(id);
        }
        (ids, list)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Read-only view of a control.
    pub fn control(&self, id: ControlId) -> Result<ControlRef<'_>, FormError> {
        let node = self.node(id)?;
        Ok(ControlRef {
            tree: self,
            id,
            node,
        })
    }

    /// Resolve `path` starting at `from`. See [`crate::path`].
    #[must_use]
    pub fn get(&self, from: ControlId, path: impl Into<ControlPath>) -> Option<ControlId> {
        path.into().resolve(self, from)
    }

    /// Topmost control reached by following parent links.
    pub fn root(&self, id: ControlId) -> Result<ControlId, FormError> {
        let mut current = id;
        while let Some(parent) = self.node(current)?.parent {
            current = parent;
        }
        Ok(current)
    }

    /// Value including disabled children at every level.
    pub fn raw_value(&self, id: ControlId) -> Result<ControlValue, FormError> {
        let node = self.node(id)?;
        let Some(controls) = node.controls() else {
            return Ok(node.value.clone());
        };
        let mut value = BTreeMap::new();
        for (name, child) in controls {
            value.insert(name.clone(), self.raw_value(*child)?);
        }
        Ok(ControlValue::Group(value))
    }

    // -------------------------------------------------------------------------
    // Validators
    // -------------------------------------------------------------------------

    /// Append a validator. Does not revalidate; call
    /// [`update_value_and_validity`](Self::update_value_and_validity).
    pub fn add_validator(
        &mut self,
        id: ControlId,
        validator: Box<dyn Validator>,
    ) -> Result<ValidatorId, FormError> {
        self.node(id)?;
        let validator_id = self.next_validator_id();
        self.node_mut(id)?.validators.push(validator_id, validator);
        Ok(validator_id)
    }

    /// Replace the whole validator list. Does not revalidate.
    pub fn set_validators(
        &mut self,
        id: ControlId,
        validators: Vec<Box<dyn Validator>>,
    ) -> Result<Vec<ValidatorId>, FormError> {
        self.node(id)?;
        let (ids, list) = self.validator_list(validators);
        self.node_mut(id)?.validators = list;
        Ok(ids)
    }

    /// Remove the given validators, or all of them when `subset` is `None`.
    /// Returns how many were removed. Does not revalidate.
    pub fn clear_validators(
        &mut self,
        id: ControlId,
        subset: Option<&[ValidatorId]>,
    ) -> Result<usize, FormError> {
        Ok(self.node_mut(id)?.validators.remove(subset))
    }

    // -------------------------------------------------------------------------
    // Values
    // -------------------------------------------------------------------------

    /// Replace a control's value.
    ///
    /// A leaf stores `value`. A group needs a map with exactly one entry per
    /// child; the whole shape is checked before anything is written.
    pub fn set_value(
        &mut self,
        id: ControlId,
        value: impl Into<ControlValue>,
        only_self: bool,
    ) -> Result<(), FormError> {
        let value = value.into();
        if let Err(err) = self.check_full_value(id, &value) {
            tracing::warn!(control = %id, error = %err, "rejected set_value");
            return Err(err);
        }
        self.write_value(id, value, only_self)
    }

    /// Partially update a control's value.
    ///
    /// For a group, entries naming existing children are forwarded and every
    /// other entry is ignored; children without an entry keep their value.
    pub fn patch_value(
        &mut self,
        id: ControlId,
        value: impl Into<ControlValue>,
        only_self: bool,
    ) -> Result<(), FormError> {
        let value = value.into();
        match self.node(id)?.kind {
            ControlKind::Leaf => self.set_leaf_value(id, value, only_self),
            ControlKind::Group(_) => self.patch_group_value(id, value, only_self),
        }
    }

    /// Assign `value`, then mark the subtree pristine and untouched.
    ///
    /// Group children without an entry in `value` are reset to `Null`.
    pub fn reset(
        &mut self,
        id: ControlId,
        value: impl Into<ControlValue>,
        only_self: bool,
    ) -> Result<(), FormError> {
        self.reset_values(id, value.into())?;
        self.mark_as_pristine(id, true)?;
        self.mark_as_untouched(id, only_self)?;
        self.update_value_and_validity(id, only_self)
    }

    fn reset_values(&mut self, id: ControlId, value: ControlValue) -> Result<(), FormError> {
        match self.node(id)?.kind {
            ControlKind::Leaf => self.node_mut(id)?.value = value,
            ControlKind::Group(_) => {
                let mut entries = match value {
                    ControlValue::Group(map) => map,
                    _ => BTreeMap::new(),
                };
                for (name, child) in self.named_children(id)? {
                    let value = entries.remove(&name).unwrap_or_default();
                    self.reset_values(child, value)?;
                }
            }
        }
        self.update_value_and_validity(id, true)
    }

    pub(crate) fn check_full_value(
        &self,
        id: ControlId,
        value: &ControlValue,
    ) -> Result<(), FormError> {
        match self.node(id)?.kind {
            ControlKind::Leaf => Ok(()),
            ControlKind::Group(_) => self.check_group_value(id, value),
        }
    }

    pub(crate) fn write_value(
        &mut self,
        id: ControlId,
        value: ControlValue,
        only_self: bool,
    ) -> Result<(), FormError> {
        match self.node(id)?.kind {
            ControlKind::Leaf => self.set_leaf_value(id, value, only_self),
            ControlKind::Group(_) => self.set_group_value(id, value, only_self),
        }
    }

    // -------------------------------------------------------------------------
    // Arena maintenance
    // -------------------------------------------------------------------------

    /// Drop a detached control and its whole subtree from the arena.
    ///
    /// Controls that still name a released group as parent (left behind by
    /// removal with `detach_removed` off) become free controls.
    pub fn release(&mut self, id: ControlId) -> Result<(), FormError> {
        if let Some(parent) = self.node(id)?.parent {
            return Err(FormError::StillAttached {
                control: id,
                parent,
            });
        }
        let mut stack = vec![id];
        let mut released = BTreeSet::new();
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                released.insert(current);
                if let ControlKind::Group(controls) = node.kind {
                    stack.extend(controls.into_values());
                }
            }
        }
        // Children removed without detaching may still point into the subtree.
        let mut orphaned = 0usize;
        for node in self.nodes.values_mut() {
            if node.parent.is_some_and(|parent| released.contains(&parent)) {
                node.parent = None;
                orphaned += 1;
            }
        }
        tracing::debug!(
            control = %id,
            released = released.len(),
            orphaned,
            "released detached subtree"
        );
        Ok(())
    }

    pub(crate) fn named_children(
        &self,
        id: ControlId,
    ) -> Result<Vec<(String, ControlId)>, FormError> {
        Ok(self
            .node(id)?
            .controls()
            .map(|controls| {
                controls
                    .iter()
                    .map(|(name, child)| (name.clone(), *child))
                    .collect()
            })
            .unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// ControlRef
// ---------------------------------------------------------------------------

/// Read-only view of one control inside a [`FormTree`].
///
/// This is what validators receive and what render layers read. All the
/// navigation and error queries live here.
#[derive(Clone, Copy)]
pub struct ControlRef<'a> {
    tree: &'a FormTree,
    id: ControlId,
    node: &'a ControlNode,
}

impl<'a> ControlRef<'a> {
    /// Arena id of this control.
    #[must_use]
    pub fn id(&self) -> ControlId {
        self.id
    }

    /// The tree this view borrows from.
    #[must_use]
    pub fn tree(&self) -> &'a FormTree {
        self.tree
    }

    /// Current value; groups hold the derived map of their children.
    #[must_use]
    pub fn value(&self) -> &'a ControlValue {
        &self.node.value
    }

    /// Current validation status.
    #[must_use]
    pub fn status(&self) -> ControlStatus {
        self.node.status
    }

    /// `status == Valid`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.node.status.is_valid()
    }

    /// `status == Invalid`.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        self.node.status.is_invalid()
    }

    /// `status == Disabled`.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.node.status.is_disabled()
    }

    /// Anything but `Disabled`.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.node.status.is_enabled()
    }

    /// Current errors; `None` when there are none.
    #[must_use]
    pub fn errors(&self) -> Option<&'a ErrorMap> {
        self.node.errors.as_ref()
    }

    /// The user has interacted with this control or, for a group, an enabled child.
    #[must_use]
    pub fn is_touched(&self) -> bool {
        self.node.touched
    }

    /// Negation of [`is_touched`](Self::is_touched).
    #[must_use]
    pub fn is_untouched(&self) -> bool {
        !self.node.touched
    }

    /// The value has not been changed through the UI.
    #[must_use]
    pub fn is_pristine(&self) -> bool {
        self.node.pristine
    }

    /// Negation of [`is_pristine`](Self::is_pristine).
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.node.pristine
    }

    /// `true` for groups, `false` for leaves.
    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self.node.kind, ControlKind::Group(_))
    }

    /// Validators attached to this control, in insertion order.
    #[must_use]
    pub fn validators(&self) -> &'a ValidatorList {
        &self.node.validators
    }

    /// Owning group, if any.
    #[must_use]
    pub fn parent(&self) -> Option<ControlRef<'a>> {
        self.node.parent.and_then(|id| self.tree.control(id).ok())
    }

    /// Topmost ancestor; the control itself when it has no parent.
    #[must_use]
    pub fn root(&self) -> ControlRef<'a> {
        let mut current = *self;
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Child registered under `name`, enabled or not.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<ControlRef<'a>> {
        let node = self.node;
        let id = *node.controls()?.get(name)?;
        self.tree.control(id).ok()
    }

    /// Children in name order. Empty for leaves.
    pub fn children(&self) -> impl Iterator<Item = (&'a str, ControlRef<'a>)> + 'a {
        let tree = self.tree;
        let node = self.node;
        node.controls()
            .into_iter()
            .flatten()
            .filter_map(move |(name, id)| Some((name.as_str(), tree.control(*id).ok()?)))
    }

    /// True iff a child named `name` exists and is enabled.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.child(name).is_some_and(|child| child.is_enabled())
    }

    /// Resolve a dotted path or segment list below this control.
    #[must_use]
    pub fn get(&self, path: impl Into<ControlPath>) -> Option<ControlRef<'a>> {
        let id = self.tree.get(self.id, path)?;
        self.tree.control(id).ok()
    }

    /// Error recorded under `code`, if any.
    #[must_use]
    pub fn get_error(&self, code: &str) -> Option<&'a ValidationError> {
        self.errors()?.get(code)
    }

    /// [`get_error`](Self::get_error) on the control at `path`.
    #[must_use]
    pub fn get_error_at(
        &self,
        code: &str,
        path: impl Into<ControlPath>,
    ) -> Option<&'a ValidationError> {
        self.get(path)?.get_error(code)
    }

    /// Whether an error is recorded under `code`.
    #[must_use]
    pub fn has_error(&self, code: &str) -> bool {
        self.get_error(code).is_some()
    }

    /// [`has_error`](Self::has_error) on the control at `path`; `false` when
    /// the path does not resolve.
    #[must_use]
    pub fn has_error_at(&self, code: &str, path: impl Into<ControlPath>) -> bool {
        self.get_error_at(code, path).is_some()
    }

    /// Touched and carrying `code`: the moment a UI should surface the error.
    #[must_use]
    pub fn should_show_error(&self, code: &str) -> bool {
        self.is_touched() && self.has_error(code)
    }

    /// [`should_show_error`](Self::should_show_error) on the control at `path`.
    #[must_use]
    pub fn should_show_error_at(&self, code: &str, path: impl Into<ControlPath>) -> bool {
        self.get(path)
            .is_some_and(|control| control.should_show_error(code))
    }

    /// Plain-data copy of this control and its subtree.
    #[must_use]
    pub fn snapshot(&self) -> ControlSnapshot {
        ControlSnapshot::capture(*self)
    }
}

impl fmt::Debug for ControlRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlRef")
            .field("id", &self.id)
            .field("status", &self.node.status)
            .field("value", &self.node.value)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{ERROR_CODE_REQUIRED, Required};

    fn profile(tree: &mut FormTree) -> (ControlId, ControlId, ControlId) {
        let first = tree.leaf("Ada", vec![Box::new(Required::new())]);
        let last = tree.leaf("", vec![Box::new(Required::new())]);
        let name = tree.group([("first", first), ("last", last)], Vec::new()).unwrap();
        (name, first, last)
    }

    #[test]
    fn ids_are_non_zero_and_increasing() {
        let mut tree = FormTree::new();
        let a = tree.leaf("a", Vec::new());
        let b = tree.leaf("b", Vec::new());
        assert_eq!(a, ControlId::MIN);
        assert!(b > a);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn unknown_id_is_an_error() {
        let tree = FormTree::new();
        let missing = ControlId::MIN;
        assert_eq!(
            tree.control(missing).unwrap_err(),
            FormError::UnknownControl { control: missing }
        );
    }

    #[test]
    fn root_and_parent_navigation() {
        let mut tree = FormTree::new();
        let (name, first, _) = profile(&mut tree);
        let form = tree.group([("name", name)], Vec::new()).unwrap();

        assert_eq!(tree.root(first).unwrap(), form);
        assert_eq!(tree.root(form).unwrap(), form);
        let first = tree.control(first).unwrap();
        assert_eq!(first.parent().map(|p| p.id()), Some(name));
        assert_eq!(first.root().id(), form);
    }

    #[test]
    fn error_queries_by_path() {
        let mut tree = FormTree::new();
        let (name, _, last) = profile(&mut tree);
        let form = tree.group([("name", name)], Vec::new()).unwrap();
        let view = tree.control(form).unwrap();

        assert!(view.has_error_at(ERROR_CODE_REQUIRED, "name.last"));
        assert!(!view.has_error_at(ERROR_CODE_REQUIRED, "name.first"));
        assert!(!view.has_error_at(ERROR_CODE_REQUIRED, "name.nope"));
        assert!(view.get_error_at(ERROR_CODE_REQUIRED, ["name", "last"]).is_some());
        assert!(!view.should_show_error_at(ERROR_CODE_REQUIRED, "name.last"));

        tree.mark_as_touched(last, false).unwrap();
        let view = tree.control(form).unwrap();
        assert!(view.should_show_error_at(ERROR_CODE_REQUIRED, "name.last"));
    }

    #[test]
    fn raw_value_includes_disabled_children() {
        let mut tree = FormTree::new();
        let (name, first, _) = profile(&mut tree);
        tree.disable(first, false).unwrap();

        assert_eq!(
            tree.control(name).unwrap().value(),
            &ControlValue::group([("last", "")])
        );
        assert_eq!(
            tree.raw_value(name).unwrap(),
            ControlValue::group([("first", "Ada"), ("last", "")])
        );
    }

    #[test]
    fn validators_are_managed_by_id() {
        let mut tree = FormTree::new();
        let leaf = tree.leaf("", Vec::new());
        assert!(tree.control(leaf).unwrap().is_valid());

        let required = tree.add_validator(leaf, Box::new(Required::new())).unwrap();
        // Installing a validator does not revalidate on its own.
        assert!(tree.control(leaf).unwrap().is_valid());
        tree.update_value_and_validity(leaf, false).unwrap();
        assert!(tree.control(leaf).unwrap().is_invalid());

        assert_eq!(tree.clear_validators(leaf, Some(&[required][..])).unwrap(), 1);
        tree.update_value_and_validity(leaf, false).unwrap();
        assert!(tree.control(leaf).unwrap().is_valid());

        let ids = tree
            .set_validators(leaf, vec![Box::new(Required::new()), Box::new(Required::new())])
            .unwrap();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], required);
        assert_eq!(tree.clear_validators(leaf, None).unwrap(), 2);
    }

    #[test]
    fn reset_restores_pristine_untouched_state() {
        let mut tree = FormTree::new();
        let (name, first, last) = profile(&mut tree);
        tree.set_value(last, "Lovelace", false).unwrap();
        tree.mark_as_dirty(last, false).unwrap();
        tree.mark_as_touched(first, false).unwrap();

        tree.reset(name, ControlValue::group([("first", "Grace")]), false)
            .unwrap();

        let view = tree.control(name).unwrap();
        assert!(view.is_pristine());
        assert!(view.is_untouched());
        assert_eq!(
            view.value(),
            &ControlValue::group([
                ("first", ControlValue::from("Grace")),
                ("last", ControlValue::Null),
            ])
        );
        assert!(view.is_invalid());
        assert!(tree.control(last).unwrap().has_error(ERROR_CODE_REQUIRED));
        assert!(tree.control(last).unwrap().is_pristine());
    }

    #[test]
    fn release_requires_detached_control() {
        let mut tree = FormTree::new();
        let (name, first, last) = profile(&mut tree);
        assert_eq!(
            tree.release(first).unwrap_err(),
            FormError::StillAttached {
                control: first,
                parent: name
            }
        );

        tree.release(name).unwrap();
        assert!(!tree.contains_id(name));
        assert!(!tree.contains_id(first));
        assert!(!tree.contains_id(last));
        assert!(tree.is_empty());
    }
}
