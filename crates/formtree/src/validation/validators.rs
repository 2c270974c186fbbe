#![forbid(unsafe_code)]

//! Validation errors, the [`Validator`] trait, and the stock rules.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::tree::ControlRef;
use crate::value::ControlValue;

// ---------------------------------------------------------------------------
// Error codes
// ---------------------------------------------------------------------------

// Keys of a control's error map, one per stock rule.
pub const ERROR_CODE_REQUIRED: &str = "required";
pub const ERROR_CODE_MIN_LENGTH: &str = "too_short";
pub const ERROR_CODE_MAX_LENGTH: &str = "too_long";
pub const ERROR_CODE_PATTERN: &str = "pattern";
pub const ERROR_CODE_EMAIL: &str = "email";
pub const ERROR_CODE_URL: &str = "url";
pub const ERROR_CODE_RANGE: &str = "range";

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// One failed rule: a code, a message template, and the values to fill in.
///
/// The `code` is the key under which the error is stored on a control; two
/// errors with the same code are the same error as far as the control is
/// concerned.
///
/// # Example
///
/// ```rust
/// use formtree::validation::ValidationError;
///
/// let error = ValidationError::new("too_short", "Passwords need {min}+ characters")
///     .with_param("min", 12);
///
/// assert_eq!(error.format_message(), "Passwords need 12+ characters");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValidationError {
    pub code: Cow<'static, str>,
    /// Template; `{name}` placeholders are filled from `params`.
    pub message: String,
    pub params: BTreeMap<String, String>,
}

impl ValidationError {
    #[must_use]
    pub fn new(code: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            params: BTreeMap::new(),
        }
    }

    /// An error carrying only a code; the message defaults to the code.
    #[must_use]
    pub fn code(code: impl Into<Cow<'static, str>>) -> Self {
        let code = code.into();
        let message = code.to_string();
        Self::new(code, message)
    }

    /// Attach a value for the `{key}` placeholder.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    /// The message with every known placeholder filled in.
    #[must_use]
    pub fn format_message(&self) -> String {
        self.params
            .iter()
            .fold(self.message.clone(), |message, (key, value)| {
                message.replace(&format!("{{{key}}}"), value)
            })
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_message())
    }
}

impl std::error::Error for ValidationError {}

/// Errors currently set on a control, keyed by error code.
pub type ErrorMap = BTreeMap<String, ValidationError>;

// ---------------------------------------------------------------------------
// ValidationResult
// ---------------------------------------------------------------------------

/// Outcome of running one validator against one control.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValidationResult {
    #[default]
    Valid,
    Invalid(ValidationError),
}

impl ValidationResult {
    /// Shorthand for an `Invalid` result with the given code and message.
    #[must_use]
    pub fn invalid(code: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self::Invalid(ValidationError::new(code, message))
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    #[must_use]
    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            Self::Invalid(error) => Some(error),
            Self::Valid => None,
        }
    }

    #[must_use]
    pub fn into_error(self) -> Option<ValidationError> {
        match self {
            Self::Invalid(error) => Some(error),
            Self::Valid => None,
        }
    }

    /// `self` if it failed, otherwise `other`.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        if self.is_invalid() { self } else { other }
    }

    /// Valid if either side is; otherwise the error of `other`.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        if self.is_valid() { self } else { other }
    }
}

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

/// A validator inspects a control and reports at most one error.
///
/// Validators receive a read-only [`ControlRef`], so a rule may look at the
/// control's own value as well as its parent or siblings. They must be free of
/// side effects: the tree may run them any number of times.
///
/// # Custom rules
///
/// ```rust
/// use formtree::tree::ControlRef;
/// use formtree::validation::{ValidationResult, Validator};
///
/// struct NoSpaces;
///
/// impl Validator for NoSpaces {
///     fn validate(&self, control: ControlRef<'_>) -> ValidationResult {
///         match control.value().as_str() {
///             Some(s) if s.contains(' ') => {
///                 ValidationResult::invalid("no_spaces", "Spaces are not allowed")
///             }
///             _ => ValidationResult::Valid,
///         }
///     }
///
///     fn error_message(&self) -> &str {
///         "Spaces are not allowed"
///     }
/// }
/// ```
pub trait Validator: Send + Sync {
    fn validate(&self, control: ControlRef<'_>) -> ValidationResult;

    /// Message template reported on failure, for help text and docs.
    fn error_message(&self) -> &str;
}

impl<V: Validator + ?Sized> Validator for Box<V> {
    fn validate(&self, control: ControlRef<'_>) -> ValidationResult {
        (**self).validate(control)
    }

    fn error_message(&self) -> &str {
        (**self).error_message()
    }
}

/// Adapts a closure into a [`Validator`].
pub struct FnValidator<F> {
    f: F,
    message: String,
}

impl<F> FnValidator<F>
where
    F: Fn(ControlRef<'_>) -> ValidationResult + Send + Sync,
{
    /// Wrap `f`; `message` is what [`Validator::error_message`] reports.
    #[must_use]
    pub fn new(message: impl Into<String>, f: F) -> Self {
        Self {
            f,
            message: message.into(),
        }
    }
}

impl<F> Validator for FnValidator<F>
where
    F: Fn(ControlRef<'_>) -> ValidationResult + Send + Sync,
{
    fn validate(&self, control: ControlRef<'_>) -> ValidationResult {
        (self.f)(control)
    }

    fn error_message(&self) -> &str {
        &self.message
    }
}

impl<F> fmt::Debug for FnValidator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnValidator")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Stock rules
// ---------------------------------------------------------------------------

/// The control must hold something.
///
/// `Null`, an empty group value, and blank text count as missing. Booleans
/// and numbers are always present.
#[derive(Debug, Clone, Copy, Default)]
pub struct Required {
    /// Treat whitespace-only text as present.
    pub allow_whitespace: bool,
}

impl Required {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn allow_whitespace(mut self) -> Self {
        self.allow_whitespace = true;
        self
    }
}

impl Validator for Required {
    fn validate(&self, control: ControlRef<'_>) -> ValidationResult {
        let missing = match control.value() {
            ControlValue::Null => true,
            ControlValue::Bool(_) | ControlValue::Number(_) => false,
            ControlValue::Text(text) if self.allow_whitespace => text.is_empty(),
            ControlValue::Text(text) => text.trim().is_empty(),
            ControlValue::Group(entries) => entries.is_empty(),
        };
        if missing {
            ValidationResult::invalid(ERROR_CODE_REQUIRED, "This field is required")
        } else {
            ValidationResult::Valid
        }
    }

    fn error_message(&self) -> &str {
        "This field is required"
    }
}

/// Text of at least `min` characters (not bytes). Non-text values pass.
#[derive(Debug, Clone, Copy)]
pub struct MinLength {
    pub min: usize,
}

impl MinLength {
    #[must_use]
    pub fn new(min: usize) -> Self {
        Self { min }
    }
}

impl Validator for MinLength {
    fn validate(&self, control: ControlRef<'_>) -> ValidationResult {
        if let Some(len) = text_len(control)
            && len < self.min
        {
            ValidationResult::Invalid(
                ValidationError::new(ERROR_CODE_MIN_LENGTH, "Must be at least {min} characters")
                    .with_param("min", self.min)
                    .with_param("actual", len),
            )
        } else {
            ValidationResult::Valid
        }
    }

    fn error_message(&self) -> &str {
        "Must be at least {min} characters"
    }
}

/// Text of at most `max` characters (not bytes). Non-text values pass.
#[derive(Debug, Clone, Copy)]
pub struct MaxLength {
    pub max: usize,
}

impl MaxLength {
    #[must_use]
    pub fn new(max: usize) -> Self {
        Self { max }
    }
}

impl Validator for MaxLength {
    fn validate(&self, control: ControlRef<'_>) -> ValidationResult {
        if let Some(len) = text_len(control)
            && len > self.max
        {
            ValidationResult::Invalid(
                ValidationError::new(ERROR_CODE_MAX_LENGTH, "Must be at most {max} characters")
                    .with_param("max", self.max)
                    .with_param("actual", len),
            )
        } else {
            ValidationResult::Valid
        }
    }

    fn error_message(&self) -> &str {
        "Must be at most {max} characters"
    }
}

/// Text containing, or equal to, a literal. Non-text values count as `""`.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub pattern: String,
    pub message: String,
    /// The whole value must equal `pattern`.
    pub exact: bool,
}

impl Pattern {
    fn literal(pattern: impl Into<String>, exact: bool) -> Self {
        Self {
            pattern: pattern.into(),
            message: String::from("Invalid format"),
            exact,
        }
    }

    #[must_use]
    pub fn contains(pattern: impl Into<String>) -> Self {
        Self::literal(pattern, false)
    }

    #[must_use]
    pub fn exact(pattern: impl Into<String>) -> Self {
        Self::literal(pattern, true)
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl Validator for Pattern {
    fn validate(&self, control: ControlRef<'_>) -> ValidationResult {
        let text = control.value().as_str().unwrap_or_default();
        let matched = if self.exact {
            text == self.pattern
        } else {
            text.contains(self.pattern.as_str())
        };
        if matched {
            ValidationResult::Valid
        } else {
            ValidationResult::invalid(ERROR_CODE_PATTERN, &self.message)
        }
    }

    fn error_message(&self) -> &str {
        &self.message
    }
}

/// Text that looks like an email address.
///
/// Heuristic: one `@` with a non-empty local part and a dotted domain whose
/// top-level label has at least two characters. Empty text passes; pair with
/// [`Required`] to demand a value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Email;

impl Email {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn looks_valid(value: &str) -> bool {
        let Some((local, domain)) = value.split_once('@') else {
            return false;
        };
        if local.is_empty() || domain.is_empty() || !domain.contains('.') {
            return false;
        }
        let labels: Vec<&str> = domain.split('.').collect();
        if labels.iter().any(|label| label.is_empty()) {
            return false;
        }
        labels.last().is_some_and(|tld| tld.len() >= 2)
    }
}

impl Validator for Email {
    fn validate(&self, control: ControlRef<'_>) -> ValidationResult {
        let text = trimmed_text(control);
        if text.is_empty() || Self::looks_valid(text) {
            ValidationResult::Valid
        } else {
            ValidationResult::invalid(ERROR_CODE_EMAIL, "Invalid email address")
        }
    }

    fn error_message(&self) -> &str {
        "Invalid email address"
    }
}

/// An `http://` or `https://` URL with something after the scheme.
/// Empty text passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Url {
    pub require_https: bool,
}

impl Url {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn require_https(mut self) -> Self {
        self.require_https = true;
        self
    }
}

impl Validator for Url {
    fn validate(&self, control: ControlRef<'_>) -> ValidationResult {
        let text = trimmed_text(control);
        if text.is_empty() {
            return ValidationResult::Valid;
        }
        let has_rest = |scheme: &str| text.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty());
        let accepted = has_rest("https://") || (!self.require_https && has_rest("http://"));
        if accepted {
            ValidationResult::Valid
        } else if self.require_https {
            ValidationResult::invalid(ERROR_CODE_URL, "Invalid URL (must use HTTPS)")
        } else {
            ValidationResult::invalid(ERROR_CODE_URL, "Invalid URL")
        }
    }

    fn error_message(&self) -> &str {
        "Invalid URL"
    }
}

/// A number within `min..=max`. Non-numbers pass.
#[derive(Debug, Clone, Copy)]
pub struct Range {
    pub min: i64,
    pub max: i64,
}

impl Range {
    #[must_use]
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }
}

impl Validator for Range {
    fn validate(&self, control: ControlRef<'_>) -> ValidationResult {
        match control.value().as_number() {
            Some(n) if !(self.min..=self.max).contains(&n) => ValidationResult::Invalid(
                ValidationError::new(ERROR_CODE_RANGE, "Must be between {min} and {max}")
                    .with_param("min", self.min)
                    .with_param("max", self.max)
                    .with_param("actual", n),
            ),
            _ => ValidationResult::Valid,
        }
    }

    fn error_message(&self) -> &str {
        "Must be between {min} and {max}"
    }
}

fn text_len(control: ControlRef<'_>) -> Option<usize> {
    control.value().as_str().map(|text| text.chars().count())
}

fn trimmed_text<'a>(control: ControlRef<'a>) -> &'a str {
    control.value().as_str().unwrap_or_default().trim()
}

// ---------------------------------------------------------------------------
// Combinators
// ---------------------------------------------------------------------------

/// Both validators must pass; reports the first failure.
#[derive(Debug, Clone)]
pub struct And<A, B> {
    pub first: A,
    pub second: B,
}

impl<A, B> And<A, B> {
    #[must_use]
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: Validator, B: Validator> Validator for And<A, B> {
    fn validate(&self, control: ControlRef<'_>) -> ValidationResult {
        match self.first.validate(control) {
            ValidationResult::Valid => self.second.validate(control),
            err => err,
        }
    }

    fn error_message(&self) -> &str {
        self.first.error_message()
    }
}

/// At least one validator must pass; reports the second failure.
#[derive(Debug, Clone)]
pub struct Or<A, B> {
    pub first: A,
    pub second: B,
}

impl<A, B> Or<A, B> {
    #[must_use]
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: Validator, B: Validator> Validator for Or<A, B> {
    fn validate(&self, control: ControlRef<'_>) -> ValidationResult {
        match self.first.validate(control) {
            ValidationResult::Valid => ValidationResult::Valid,
            _ => self.second.validate(control),
        }
    }

    fn error_message(&self) -> &str {
        self.second.error_message()
    }
}

/// Fails with code `not` exactly when `inner` passes.
#[derive(Debug, Clone)]
pub struct Not<V> {
    pub inner: V,
    pub message: String,
}

impl<V> Not<V> {
    #[must_use]
    pub fn new(inner: V, message: impl Into<String>) -> Self {
        Self {
            inner,
            message: message.into(),
        }
    }
}

impl<V: Validator> Validator for Not<V> {
    fn validate(&self, control: ControlRef<'_>) -> ValidationResult {
        if self.inner.validate(control).is_valid() {
            ValidationResult::invalid("not", &self.message)
        } else {
            ValidationResult::Valid
        }
    }

    fn error_message(&self) -> &str {
        &self.message
    }
}

/// All validators must pass; stops at the first failure.
pub struct All {
    validators: Vec<Box<dyn Validator>>,
}

impl All {
    #[must_use]
    pub fn new(validators: Vec<Box<dyn Validator>>) -> Self {
        Self { validators }
    }
}

impl Validator for All {
    fn validate(&self, control: ControlRef<'_>) -> ValidationResult {
        self.validators
            .iter()
            .map(|v| v.validate(control))
            .find(ValidationResult::is_invalid)
            .unwrap_or_default()
    }

    fn error_message(&self) -> &str {
        self.validators
            .first()
            .map_or("Validation failed", |v| v.error_message())
    }
}

impl fmt::Debug for All {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("All")
            .field("len", &self.validators.len())
            .finish_non_exhaustive()
    }
}

/// At least one validator must pass; reports the last failure.
pub struct Any {
    validators: Vec<Box<dyn Validator>>,
}

impl Any {
    #[must_use]
    pub fn new(validators: Vec<Box<dyn Validator>>) -> Self {
        Self { validators }
    }
}

impl Validator for Any {
    fn validate(&self, control: ControlRef<'_>) -> ValidationResult {
        let mut outcome = ValidationResult::Valid;
        for validator in &self.validators {
            outcome = validator.validate(control);
            if outcome.is_valid() {
                break;
            }
        }
        outcome
    }

    fn error_message(&self) -> &str {
        self.validators
            .last()
            .map_or("Validation failed", |v| v.error_message())
    }
}

impl fmt::Debug for Any {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Any")
            .field("len", &self.validators.len())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// ValidatorBuilder
// ---------------------------------------------------------------------------

/// Fluent construction of a combined text validator.
///
/// [`build`](Self::build) yields a short-circuiting [`All`];
/// [`into_validators`](Self::into_validators) yields the individual rules so
/// that a control reports every failing code at once.
#[derive(Default)]
pub struct ValidatorBuilder {
    validators: Vec<Box<dyn Validator>>,
}

impl ValidatorBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn custom(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Box::new(validator) as Box<dyn Validator>);
        self
    }

    #[must_use]
    pub fn required(self) -> Self {
        self.custom(Required::new())
    }

    #[must_use]
    pub fn min_length(self, min: usize) -> Self {
        self.custom(MinLength::new(min))
    }

    #[must_use]
    pub fn max_length(self, max: usize) -> Self {
        self.custom(MaxLength::new(max))
    }

    #[must_use]
    pub fn email(self) -> Self {
        self.custom(Email::new())
    }

    #[must_use]
    pub fn url(self) -> Self {
        self.custom(Url::new())
    }

    #[must_use]
    pub fn range(self, min: i64, max: i64) -> Self {
        self.custom(Range::new(min, max))
    }

    #[must_use]
    pub fn contains(self, pattern: impl Into<String>) -> Self {
        self.custom(Pattern::contains(pattern))
    }

    /// One validator that stops at the first failing rule.
    #[must_use]
    pub fn build(self) -> All {
        All::new(self.validators)
    }

    /// The collected validators, unmerged.
    #[must_use]
    pub fn into_validators(self) -> Vec<Box<dyn Validator>> {
        self.validators
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::FormTree;

    /// Run `validator` against a free leaf holding `value`.
    fn check(validator: &dyn Validator, value: impl Into<ControlValue>) -> ValidationResult {
        let mut tree = FormTree::new();
        let id = tree.leaf(value, Vec::new());
        let control = tree.control(id).expect("leaf exists");
        validator.validate(control)
    }

    // ValidationError / ValidationResult

    #[test]
    fn placeholders_are_filled() {
        let err = ValidationError::new("span", "{lo}..{hi} (not {lo})")
            .with_param("hi", 10)
            .with_param("lo", 1)
            .with_param("unused", "x");
        assert_eq!(err.format_message(), "1..10 (not 1)");
    }

    #[test]
    fn validation_error_code_only_uses_code_as_message() {
        let err = ValidationError::code("EmptyError");
        assert_eq!(err.code, "EmptyError");
        assert_eq!(err.to_string(), "EmptyError");
    }

    #[test]
    fn validation_result_and_or() {
        let valid = ValidationResult::Valid;
        let invalid = ValidationResult::invalid("x", "");

        assert!(valid.clone().and(invalid.clone()).is_invalid());
        assert!(invalid.clone().and(valid.clone()).is_invalid());
        assert!(valid.clone().or(invalid.clone()).is_valid());
        assert!(invalid.clone().or(invalid.clone()).is_invalid());
    }

    // Stock rules

    #[test]
    fn required_rejects_missing_values() {
        let v = Required::new();
        assert!(check(&v, "").is_invalid());
        assert!(check(&v, "   ").is_invalid());
        assert!(check(&v, ControlValue::Null).is_invalid());
        assert!(check(&v, ControlValue::group(Vec::<(String, ControlValue)>::new())).is_invalid());
    }

    #[test]
    fn required_accepts_present_values() {
        let v = Required::new();
        assert!(check(&v, "hello").is_valid());
        assert!(check(&v, false).is_valid());
        assert!(check(&v, 0_i64).is_valid());
        assert!(check(&Required::new().allow_whitespace(), "   ").is_valid());
    }

    #[test]
    fn min_length_boundary_and_params() {
        let v = MinLength::new(3);
        assert!(check(&v, "ab").is_invalid());
        assert!(check(&v, "abc").is_valid());
        assert!(check(&v, "café").is_valid());

        let result = check(&MinLength::new(5), "ab");
        let err = result.error().expect("too short");
        assert_eq!(err.params.get("min"), Some(&"5".to_string()));
        assert_eq!(err.params.get("actual"), Some(&"2".to_string()));
    }

    #[test]
    fn length_ignores_non_text() {
        assert!(check(&MinLength::new(3), 7_i64).is_valid());
        assert!(check(&MaxLength::new(0), true).is_valid());
    }

    #[test]
    fn max_length_unicode() {
        let v = MaxLength::new(4);
        assert!(check(&v, "café").is_valid());
        assert!(check(&v, "café!").is_invalid());
    }

    #[test]
    fn pattern_contains_and_exact() {
        assert!(check(&Pattern::contains("@"), "a@b").is_valid());
        assert!(check(&Pattern::contains("@"), "ab").is_invalid());
        assert!(check(&Pattern::exact("hello"), "HELLO").is_invalid());

        let custom = Pattern::contains("@").with_message("Must contain @");
        assert_eq!(check(&custom, "x").error().map(|e| e.message.as_str()), Some("Must contain @"));
    }

    #[test]
    fn email_heuristics() {
        let v = Email::new();
        assert!(check(&v, "user@example.com").is_valid());
        assert!(check(&v, "  user+tag@example.co.uk ").is_valid());
        assert!(check(&v, "").is_valid());
        assert!(check(&v, "not-an-email").is_invalid());
        assert!(check(&v, "@example.com").is_invalid());
        assert!(check(&v, "user@example").is_invalid());
        assert!(check(&v, "user@.com").is_invalid());
        assert!(check(&v, "user@example.c").is_invalid());
    }

    #[test]
    fn url_require_https() {
        assert!(check(&Url::new(), "http://example.com").is_valid());
        assert!(check(&Url::new(), "ftp://example.com").is_invalid());
        assert!(check(&Url::new(), "http://").is_invalid());
        assert!(check(&Url::new().require_https(), "http://example.com").is_invalid());
    }

    #[test]
    fn range_bounds_inclusive() {
        let v = Range::new(1, 10);
        assert!(check(&v, 0_i64).is_invalid());
        assert!(check(&v, 1_i64).is_valid());
        assert!(check(&v, 10_i64).is_valid());
        assert!(check(&v, 11_i64).is_invalid());
        assert!(check(&v, "text").is_valid());
    }

    // Combinators

    #[test]
    fn and_reports_first_failure() {
        let v = And::new(Required::new(), MinLength::new(5));
        assert_eq!(
            check(&v, "").error().map(|e| e.code.clone()),
            Some(ERROR_CODE_REQUIRED.into())
        );
        assert_eq!(
            check(&v, "ab").error().map(|e| e.code.clone()),
            Some(ERROR_CODE_MIN_LENGTH.into())
        );
    }

    #[test]
    fn or_and_not() {
        let yes_no = Or::new(Pattern::exact("yes"), Pattern::exact("no"));
        assert!(check(&yes_no, "no").is_valid());
        assert!(check(&yes_no, "maybe").is_invalid());

        let no_at = Not::new(Pattern::contains("@"), "Must not contain @");
        assert!(check(&no_at, "hello").is_valid());
        assert!(check(&no_at, "hello@world").is_invalid());
    }

    #[test]
    fn all_and_any() {
        let all = All::new(vec![
            Box::new(Required::new()),
            Box::new(MinLength::new(3)),
            Box::new(MaxLength::new(10)),
        ]);
        assert!(check(&all, "hello").is_valid());
        assert!(check(&all, "this is too long").is_invalid());

        let any = Any::new(vec![
            Box::new(Pattern::exact("yes")),
            Box::new(Pattern::exact("no")),
        ]);
        assert!(check(&any, "yes").is_valid());
        assert!(check(&any, "dunno").is_invalid());
        assert!(check(&Any::new(Vec::new()), "").is_valid());
    }

    #[test]
    fn builder_chain() {
        let v = ValidatorBuilder::new()
            .required()
            .min_length(3)
            .max_length(10)
            .build();

        assert!(check(&v, "hello").is_valid());
        assert!(check(&v, "").is_invalid());
        assert!(check(&v, "this is way too long").is_invalid());
        assert_eq!(ValidatorBuilder::new().email().url().into_validators().len(), 2);
    }

    #[test]
    fn fn_validator_sees_control() {
        let no_digits = FnValidator::new("Must not contain digits", |control: ControlRef<'_>| {
            match control.value().as_str() {
                Some(s) if s.chars().any(|c| c.is_ascii_digit()) => {
                    ValidationResult::invalid("no_digits", "Must not contain digits")
                }
                _ => ValidationResult::Valid,
            }
        });
        assert!(check(&no_digits, "hello").is_valid());
        assert!(check(&no_digits, "hello123").is_invalid());
        assert_eq!(no_digits.error_message(), "Must not contain digits");
    }
}
