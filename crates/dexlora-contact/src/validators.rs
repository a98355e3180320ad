#![forbid(unsafe_code)]

//! Composable string validators.
//!
//! ```rust
//! use dexlora_contact::validators::{And, MinLength, Required, Validator};
//!
//! let name = And::new(Required::new(), MinLength::new(2).trimmed());
//! assert!(name.validate("Jane").is_valid());
//! assert!(name.validate(" J ").is_invalid());
//! ```

use std::collections::BTreeMap;
use std::fmt;

/// Blank input.
pub const ERROR_CODE_REQUIRED: &str = "required";
/// Fewer characters than allowed.
pub const ERROR_CODE_MIN_LENGTH: &str = "too_short";
/// Not shaped like `local@domain.tld`.
pub const ERROR_CODE_EMAIL: &str = "email";

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// A validation failure with a stable code and a message template.
///
/// `{key}` placeholders in `message` are filled from `params`.
///
/// ```rust
/// use dexlora_contact::validators::ValidationError;
///
/// let error = ValidationError::new("too_short", "Message must be at least {min} characters")
///     .with_param("min", 10);
/// assert_eq!(error.format_message(), "Message must be at least 10 characters");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
    pub params: BTreeMap<String, String>,
}

impl ValidationError {
    #[must_use]
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            params: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    /// Message with parameters substituted.
    #[must_use]
    pub fn format_message(&self) -> String {
        let mut result = self.message.clone();
        for (key, value) in &self.params {
            result = result.replace(&format!("{{{key}}}"), value);
        }
        result
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_message())
    }
}

impl std::error::Error for ValidationError {}

// ---------------------------------------------------------------------------
// ValidationResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValidationResult {
    #[default]
    Valid,
    Invalid(ValidationError),
}

impl ValidationResult {
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
            Self::Valid => None,
            Self::Invalid(e) => Some(e),
        }
    }

    /// First error wins.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match self {
            Self::Valid => other,
            Self::Invalid(_) => self,
        }
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid(e) => Err(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Validator trait
// ---------------------------------------------------------------------------

/// Validates values of type `T`.
pub trait Validator<T: ?Sized> {
    fn validate(&self, value: &T) -> ValidationResult;

    /// Default message for this validator.
    fn error_message(&self) -> &str;
}

impl<T: ?Sized, V: Validator<T> + ?Sized> Validator<T> for Box<V> {
    fn validate(&self, value: &T) -> ValidationResult {
        (**self).validate(value)
    }

    fn error_message(&self) -> &str {
        (**self).error_message()
    }
}

// ---------------------------------------------------------------------------
// Built-in validators
// ---------------------------------------------------------------------------

/// Rejects empty and whitespace-only strings.
#[derive(Debug, Clone)]
pub struct Required {
    message: String,
}

impl Default for Required {
    fn default() -> Self {
        Self {
            message: "This field is required".to_owned(),
        }
    }
}

impl Required {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl Validator<str> for Required {
    fn validate(&self, value: &str) -> ValidationResult {
        if value.trim().is_empty() {
            ValidationResult::Invalid(ValidationError::new(ERROR_CODE_REQUIRED, &self.message))
        } else {
            ValidationResult::Valid
        }
    }

    fn error_message(&self) -> &str {
        &self.message
    }
}

/// Requires at least `min` characters (Unicode scalar values).
#[derive(Debug, Clone)]
pub struct MinLength {
    pub min: usize,
    /// Count after trimming surrounding whitespace.
    pub trim: bool,
    message: String,
}

impl MinLength {
    #[must_use]
    pub fn new(min: usize) -> Self {
        Self {
            min,
            trim: false,
            message: "Must be at least {min} characters".to_owned(),
        }
    }

    #[must_use]
    pub fn trimmed(mut self) -> Self {
        self.trim = true;
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl Validator<str> for MinLength {
    fn validate(&self, value: &str) -> ValidationResult {
        let value = if self.trim { value.trim() } else { value };
        let len = value.chars().count();
        if len < self.min {
            ValidationResult::Invalid(
                ValidationError::new(ERROR_CODE_MIN_LENGTH, &self.message)
                    .with_param("min", self.min)
                    .with_param("actual", len),
            )
        } else {
            ValidationResult::Valid
        }
    }

    fn error_message(&self) -> &str {
        &self.message
    }
}

/// Basic address shape: `local@domain.tld`, no whitespace, exactly one `@`.
///
/// Equivalent to `^[^\s@]+@[^\s@]+\.[^\s@]+$`. Empty input is valid; pair
/// with [`Required`] to reject it.
#[derive(Debug, Clone)]
pub struct Email {
    message: String,
}

impl Default for Email {
    fn default() -> Self {
        Self {
            message: "Invalid email address".to_owned(),
        }
    }
}

impl Email {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Whether `value` has the basic address shape.
    pub fn matches(value: &str) -> bool {
        let Some((local, domain)) = value.split_once('@') else {
            return false;
        };
        let clean = |s: &str| !s.is_empty() && !s.chars().any(|c| c.is_whitespace() || c == '@');
        if !clean(local) || !clean(domain) {
            return false;
        }
        // a dot with at least one character on each side
        domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
    }
}

impl Validator<str> for Email {
    fn validate(&self, value: &str) -> ValidationResult {
        if value.is_empty() || Self::matches(value) {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(ValidationError::new(ERROR_CODE_EMAIL, &self.message))
        }
    }

    fn error_message(&self) -> &str {
        &self.message
    }
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// Both validators must pass; the first failure is reported.
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

impl<T: ?Sized, A, B> Validator<T> for And<A, B>
where
    A: Validator<T>,
    B: Validator<T>,
{
    fn validate(&self, value: &T) -> ValidationResult {
        match self.first.validate(value) {
            ValidationResult::Valid => self.second.validate(value),
            invalid => invalid,
        }
    }

    fn error_message(&self) -> &str {
        self.first.error_message()
    }
}

/// No-op validator for optional fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct Optional;

impl Validator<str> for Optional {
    fn validate(&self, _value: &str) -> ValidationResult {
        ValidationResult::Valid
    }

    fn error_message(&self) -> &str {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Required --

    #[test]
    fn required_rejects_blank() {
        let v = Required::new();
        assert!(v.validate("").is_invalid());
        assert!(v.validate("   \t").is_invalid());
        assert!(v.validate("x").is_valid());
    }

    #[test]
    fn required_custom_message() {
        let v = Required::new().with_message("Name is required");
        let err = v.validate("").error().cloned().expect("invalid");
        assert_eq!(err.code, ERROR_CODE_REQUIRED);
        assert_eq!(err.to_string(), "Name is required");
    }

    // -- MinLength --

    #[test]
    fn min_length_boundary() {
        let v = MinLength::new(3);
        assert!(v.validate("ab").is_invalid());
        assert!(v.validate("abc").is_valid());
    }

    #[test]
    fn min_length_trimmed_ignores_padding() {
        let v = MinLength::new(2).trimmed();
        assert!(v.validate("  a  ").is_invalid());
        assert!(v.validate(" ab ").is_valid());
    }

    #[test]
    fn min_length_counts_chars_not_bytes() {
        let v = MinLength::new(4);
        assert!(v.validate("café").is_valid());
        assert!(v.validate("ça").is_invalid());
    }

    #[test]
    fn min_length_interpolates_min() {
        let v = MinLength::new(10);
        let err = v.validate("short").error().cloned().expect("invalid");
        assert_eq!(err.format_message(), "Must be at least 10 characters");
        assert_eq!(err.params.get("actual").map(String::as_str), Some("5"));
    }

    // -- Email --

    #[test]
    fn email_accepts_basic_shapes() {
        for ok in ["jane@x.com", "a@b.co", "first.last@sub.example.org", "a@b.c.d"] {
            assert!(Email::matches(ok), "{ok}");
        }
    }

    #[test]
    fn email_rejects_bad_shapes() {
        for bad in [
            "jane",
            "jane@",
            "@x.com",
            "jane@x",
            "jane@.com",
            "jane@x.",
            "ja ne@x.com",
            "jane@x .com",
            "jane@@x.com",
            "jane@x@y.com",
            " jane@x.com",
        ] {
            assert!(!Email::matches(bad), "{bad}");
        }
    }

    #[test]
    fn email_empty_is_left_to_required() {
        assert!(Email::new().validate("").is_valid());
    }

    // -- Composition --

    #[test]
    fn and_reports_first_failure() {
        let v = And::new(
            Required::new().with_message("missing"),
            MinLength::new(5).with_message("short"),
        );
        assert_eq!(v.validate("").error().map(|e| e.message.as_str()), Some("missing"));
        assert_eq!(v.validate("abc").error().map(|e| e.message.as_str()), Some("short"));
        assert!(v.validate("abcdef").is_valid());
    }

    #[test]
    fn boxed_validators_compose() {
        let v: Box<dyn Validator<str>> = Box::new(And::new(Required::new(), Email::new()));
        assert!(v.validate("jane@x.com").is_valid());
        assert!(v.validate("nope").is_invalid());
    }

    #[test]
    fn result_and_keeps_first_error() {
        let a = ValidationResult::Invalid(ValidationError::new("a", "a"));
        let b = ValidationResult::Invalid(ValidationError::new("b", "b"));
        assert_eq!(a.clone().and(b).error().map(|e| e.code), Some("a"));
        assert!(ValidationResult::Valid.and(ValidationResult::Valid).is_valid());
    }
}
