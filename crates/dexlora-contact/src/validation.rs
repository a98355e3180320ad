#![forbid(unsafe_code)]

//! Draft validation rules.
//!
//! | field   | rule                                          |
//! |---------|-----------------------------------------------|
//! | name    | required, at least 2 characters after trimming |
//! | email   | required, basic `local@domain.tld` shape       |
//! | subject | optional; blank falls back to a default        |
//! | message | required, at least 10 characters after trimming |

use std::fmt;

use crate::draft::{ContactDraft, Field};
use crate::validators::{And, Email, MinLength, Optional, Required, ValidationError, Validator};

/// Subject sent when the draft leaves it blank.
pub const DEFAULT_SUBJECT: &str = "General Inquiry";

pub const NAME_MIN_CHARS: usize = 2;
pub const MESSAGE_MIN_CHARS: usize = 10;

/// One failed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub error: ValidationError,
}

/// Validation failures in form order. Never empty when returned as an error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: Field, error: ValidationError) {
        self.0.push(FieldError { field, error });
    }

    /// The first offending field.
    pub fn first(&self) -> Option<&FieldError> {
        self.0.first()
    }

    pub fn get(&self, field: Field) -> Option<&ValidationError> {
        self.0.iter().find(|e| e.field == field).map(|e| &e.error)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    /// Forget the error for `field`, if any.
    pub fn clear_field(&mut self, field: Field) -> bool {
        let before = self.0.len();
        self.0.retain(|e| e.field != field);
        self.0.len() != before
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.iter().map(|e| e.field)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.error)?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Per-field validators for the contact draft.
pub struct DraftRules {
    rules: Vec<(Field, Box<dyn Validator<str>>)>,
}

impl fmt::Debug for DraftRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DraftRules")
            .field("fields", &self.rules.iter().map(|(f, _)| *f).collect::<Vec<_>>())
            .finish()
    }
}

impl Default for DraftRules {
    fn default() -> Self {
        Self {
            rules: vec![
                (
                    Field::Name,
                    Box::new(And::new(
                        Required::new().with_message("Name is required"),
                        MinLength::new(NAME_MIN_CHARS)
                            .trimmed()
                            .with_message("Name must be at least {min} characters"),
                    )),
                ),
                (
                    Field::Email,
                    Box::new(And::new(
                        Required::new().with_message("Email is required"),
                        Email::new().with_message("Please enter a valid email address"),
                    )),
                ),
                (Field::Subject, Box::new(Optional)),
                (
                    Field::Message,
                    Box::new(And::new(
                        Required::new().with_message("Message is required"),
                        MinLength::new(MESSAGE_MIN_CHARS)
                            .trimmed()
                            .with_message("Message must be at least {min} characters"),
                    )),
                ),
            ],
        }
    }
}

impl DraftRules {
    /// Validate one field.
    pub fn validate_field(
        &self,
        draft: &ContactDraft,
        field: Field,
    ) -> Result<(), ValidationError> {
        self.rules
            .iter()
            .filter(|(f, _)| *f == field)
            .try_for_each(|(_, rule)| rule.validate(draft.get(field)).into_result())
    }

    /// Validate every field, collecting failures in form order.
    pub fn validate(&self, draft: &ContactDraft) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        for (field, rule) in &self.rules {
            if let Err(error) = rule.validate(draft.get(*field)).into_result() {
                errors.push(*field, error);
            }
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Validate `draft` with the default rules.
pub fn validate(draft: &ContactDraft) -> Result<(), FieldErrors> {
    DraftRules::default().validate(draft)
}

/// Subject to send: the trimmed draft subject, or [`DEFAULT_SUBJECT`].
pub fn effective_subject(draft: &ContactDraft) -> &str {
    match draft.subject.trim() {
        "" => DEFAULT_SUBJECT,
        subject => subject,
    }
}
