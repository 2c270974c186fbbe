#![forbid(unsafe_code)]

//! End-to-end form scenarios.
//!
//! | ID      | Scenario                                                     |
//! |---------|--------------------------------------------------------------|
//! | LEAF-1  | Empty leaf with a not-empty rule is invalid until filled     |
//! | GRP-1   | Login group is invalid while both children are              |
//! | ERR-1   | set_error / remove_error on a fresh leaf returns it to valid |
//! | SET-1   | Group set_value names a missing child in its error           |
//! | PATCH-1 | patch_value ignores unknown keys                             |
//! | PATH-1  | get("a.b") descends groups and stops at leaves               |
//! | DIS-1   | Disabling a group excludes its whole subtree                 |
//! | TOUCH-1 | Touching a leaf touches its ancestors                        |
//! | TOUCH-2 | Touching a disabled leaf leaves its parent untouched         |
//! | PRIS-1  | mark_as_pristine re-derives the parent's touched flag        |
//! | XVAL-1  | Group validators can compare children                        |
//! | MOVE-1  | A removed control can be re-homed or released                |

use formtree::tree::ControlRef;
use formtree::validation::{
    ERROR_CODE_EMAIL, ERROR_CODE_REQUIRED, Email, FnValidator, Required, ValidationError,
    ValidationResult, Validator,
};
use formtree::{
    ControlStatus, ControlValue, FormConfig, FormError, FormTree, PristinePropagation,
};

fn not_empty() -> Box<dyn Validator> {
    Box::new(FnValidator::new("EmptyError", |control: ControlRef<'_>| {
        match control.value().as_str() {
            Some("") => ValidationResult::Invalid(ValidationError::code("EmptyError")),
            _ => ValidationResult::Valid,
        }
    }))
}

#[test]
fn leaf_1_empty_leaf_is_invalid_until_filled() {
    let mut tree = FormTree::new();
    let leaf = tree.leaf("", vec![not_empty()]);

    let view = tree.control(leaf).unwrap();
    assert_eq!(view.status(), ControlStatus::Invalid);
    let codes: Vec<&str> = view.errors().unwrap().keys().map(String::as_str).collect();
    assert_eq!(codes, vec!["EmptyError"]);

    tree.set_value(leaf, "x", false).unwrap();
    let view = tree.control(leaf).unwrap();
    assert_eq!(view.status(), ControlStatus::Valid);
    assert!(view.errors().is_none());
}

#[test]
fn grp_1_login_group_aggregates_children() {
    let mut tree = FormTree::new();
    let email = tree.leaf("", vec![Box::new(Required::new()), Box::new(Email::new())]);
    let password = tree.leaf("", vec![not_empty()]);
    let login = tree
        .group([("email", email), ("password", password)], Vec::new())
        .unwrap();

    let view = tree.control(login).unwrap();
    assert_eq!(view.status(), ControlStatus::Invalid);
    assert_eq!(
        view.value(),
        &ControlValue::group([("email", ""), ("password", "")])
    );
    assert!(view.has_error_at(ERROR_CODE_REQUIRED, "email"));
    assert!(view.has_error_at("EmptyError", "password"));

    tree.set_value(email, "not-an-email", false).unwrap();
    let view = tree.control(login).unwrap();
    assert!(view.has_error_at(ERROR_CODE_EMAIL, "email"));
    assert!(!view.has_error_at(ERROR_CODE_REQUIRED, "email"));

    tree.set_value(email, "ada@example.com", false).unwrap();
    tree.set_value(password, "secret", false).unwrap();
    assert_eq!(tree.control(login).unwrap().status(), ControlStatus::Valid);
}

#[test]
fn err_1_manual_error_round_trip() {
    let mut tree = FormTree::new();
    let leaf = tree.leaf("", Vec::new());

    tree.set_error(leaf, ValidationError::code("X")).unwrap();
    assert!(tree.control(leaf).unwrap().is_invalid());

    tree.remove_error(leaf, "X").unwrap();
    assert!(tree.control(leaf).unwrap().is_valid());
}

#[test]
fn set_1_group_set_value_requires_every_child() {
    let mut tree = FormTree::new();
    let email = tree.leaf("", Vec::new());
    let password = tree.leaf("", Vec::new());
    let login = tree
        .group([("email", email), ("password", password)], Vec::new())
        .unwrap();

    let err = tree
        .set_value(login, ControlValue::group([("password", "pw")]), false)
        .unwrap_err();
    assert_eq!(
        err,
        FormError::MissingValue {
            control: login,
            name: "email".into()
        }
    );
    assert!(err.to_string().contains("'email'"));
    assert_eq!(
        tree.control(password).unwrap().value(),
        &ControlValue::from("")
    );
}

#[test]
fn patch_1_patch_ignores_unknown_keys() {
    let mut tree = FormTree::new();
    let email = tree.leaf("old@example.com", Vec::new());
    let password = tree.leaf("pw", Vec::new());
    let login = tree
        .group([("email", email), ("password", password)], Vec::new())
        .unwrap();

    tree.patch_value(
        login,
        ControlValue::group([("email", "new@example.com"), ("remember", "yes")]),
        false,
    )
    .unwrap();
    assert_eq!(
        tree.control(login).unwrap().value(),
        &ControlValue::group([("email", "new@example.com"), ("password", "pw")])
    );
}

#[test]
fn path_1_get_descends_groups_only() {
    let mut tree = FormTree::new();
    let b = tree.leaf("leaf", Vec::new());
    let a = tree.group([("b", b)], Vec::new()).unwrap();
    let root = tree.group([("a", a)], Vec::new()).unwrap();
    assert_eq!(tree.get(root, "a.b"), Some(b));
    assert_eq!(tree.get(root, ["a", "b"]), Some(b));

    let leaf_a = tree.leaf("leaf", Vec::new());
    let flat = tree.group([("a", leaf_a)], Vec::new()).unwrap();
    assert_eq!(tree.get(flat, "a.b"), None);
    assert_eq!(tree.get(flat, ""), None);
}

#[test]
fn dis_1_disabled_group_never_invalidates_parent() {
    let mut tree = FormTree::new();
    let street = tree.leaf("", vec![Box::new(Required::new())]);
    let city = tree.leaf("", vec![Box::new(Required::new())]);
    let address = tree
        .group([("street", street), ("city", city)], Vec::new())
        .unwrap();
    let name = tree.leaf("Ada", vec![Box::new(Required::new())]);
    let form = tree
        .group([("name", name), ("address", address)], Vec::new())
        .unwrap();
    assert!(tree.control(form).unwrap().is_invalid());

    tree.disable(address, false).unwrap();
    for id in [address, street, city] {
        assert!(tree.control(id).unwrap().is_disabled());
    }
    let view = tree.control(form).unwrap();
    assert!(view.is_valid());
    assert!(!view.contains("address"));
    assert_eq!(view.value(), &ControlValue::group([("name", "Ada")]));
    assert_eq!(
        tree.raw_value(form).unwrap().get("address"),
        Some(&ControlValue::group([("city", ""), ("street", "")]))
    );

    tree.enable(address, false).unwrap();
    assert!(tree.control(form).unwrap().is_invalid());
}

#[test]
fn touch_1_touch_propagates_to_root() {
    let mut tree = FormTree::new();
    let email = tree.leaf("", vec![Box::new(Required::new())]);
    let password = tree.leaf("", Vec::new());
    let login = tree
        .group([("email", email), ("password", password)], Vec::new())
        .unwrap();
    let page = tree.group([("login", login)], Vec::new()).unwrap();

    let view = tree.control(page).unwrap();
    assert!(!view.should_show_error_at(ERROR_CODE_REQUIRED, "login.email"));

    tree.mark_as_touched(email, false).unwrap();
    assert!(tree.control(password).unwrap().is_untouched());
    assert!(tree.control(login).unwrap().is_touched());
    let view = tree.control(page).unwrap();
    assert!(view.is_touched());
    assert!(view.should_show_error_at(ERROR_CODE_REQUIRED, "login.email"));
}

#[test]
fn touch_2_disabled_child_does_not_touch_parent() {
    let mut tree = FormTree::new();
    let email = tree.leaf("", Vec::new());
    let password = tree.leaf("", Vec::new());
    let login = tree
        .group([("email", email), ("password", password)], Vec::new())
        .unwrap();
    let page = tree.group([("login", login)], Vec::new()).unwrap();

    tree.disable(email, false).unwrap();
    tree.mark_as_touched(email, false).unwrap();
    assert!(tree.control(email).unwrap().is_touched());
    assert!(tree.control(login).unwrap().is_untouched());
    assert!(tree.control(page).unwrap().is_untouched());

    // Enabled siblings still count.
    tree.mark_as_touched(password, false).unwrap();
    assert!(tree.control(login).unwrap().is_touched());
    assert!(tree.control(page).unwrap().is_touched());
}

#[test]
fn pris_1_pristine_recomputes_touched_by_default() {
    let mut tree = FormTree::new();
    let email = tree.leaf("", Vec::new());
    let login = tree.group([("email", email)], Vec::new()).unwrap();

    tree.mark_as_dirty(email, false).unwrap();
    assert!(tree.control(login).unwrap().is_dirty());
    tree.mark_as_pristine(email, false).unwrap();
    assert!(tree.control(email).unwrap().is_pristine());
    assert!(tree.control(login).unwrap().is_dirty());

    let mut fixed = FormTree::with_config(
        FormConfig::default().pristine_propagation(PristinePropagation::Pristine),
    );
    let email = fixed.leaf("", Vec::new());
    let login = fixed.group([("email", email)], Vec::new()).unwrap();
    fixed.mark_as_dirty(email, false).unwrap();
    fixed.mark_as_pristine(email, false).unwrap();
    assert!(fixed.control(login).unwrap().is_pristine());
}

#[test]
fn xval_1_group_validator_compares_children() {
    let matching = FnValidator::new("Passwords must match", |group: ControlRef<'_>| {
        let password = group.get("password").map(|c| c.value());
        let confirm = group.get("confirm").map(|c| c.value());
        if password == confirm {
            ValidationResult::Valid
        } else {
            ValidationResult::invalid("mismatch", "Passwords must match")
        }
    });

    let mut tree = FormTree::new();
    let password = tree.leaf("hunter2", Vec::new());
    let confirm = tree.leaf("", Vec::new());
    let signup = tree
        .group(
            [("password", password), ("confirm", confirm)],
            vec![Box::new(matching)],
        )
        .unwrap();
    assert!(tree.control(signup).unwrap().has_error("mismatch"));

    tree.set_value(confirm, "hunter2", false).unwrap();
    assert!(tree.control(signup).unwrap().is_valid());
}

#[test]
fn move_1_removed_control_can_be_rehomed_or_released() {
    let mut tree = FormTree::new();
    let nick = tree.leaf("", vec![Box::new(Required::new())]);
    let profile = tree.group([("nick", nick)], Vec::new()).unwrap();
    let other = tree.group(Vec::<(&str, _)>::new(), Vec::new()).unwrap();

    assert!(matches!(
        tree.add_control(other, "nick", nick),
        Err(FormError::AlreadyAttached { .. })
    ));

    assert_eq!(tree.remove_control(profile, "nick").unwrap(), Some(nick));
    tree.add_control(other, "nick", nick).unwrap();
    assert!(tree.control(other).unwrap().is_invalid());
    assert_eq!(tree.root(nick).unwrap(), other);

    tree.remove_control(other, "nick").unwrap();
    tree.release(nick).unwrap();
    assert!(tree.control(nick).is_err());
}
