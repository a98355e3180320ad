#![forbid(unsafe_code)]

//! Transient user notifications (toasts).

use serde::Serialize;

use crate::error::ContactError;

/// Title shown after a successful submission.
pub const SENT_TITLE: &str = "Message Sent!";

/// Direct address offered when the form cannot be used.
pub const CONTACT_EMAIL: &str = "dexlora.innovations@gmail.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

/// One toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub kind: NoticeKind,
}

impl Notice {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            kind: NoticeKind::Success,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            kind: NoticeKind::Error,
        }
    }

    pub fn sent() -> Self {
        Self::success(
            SENT_TITLE,
            "Thank you for reaching out! We'll get back to you soon.",
        )
    }

    pub const fn is_error(&self) -> bool {
        matches!(self.kind, NoticeKind::Error)
    }
}

impl From<&ContactError> for Notice {
    fn from(error: &ContactError) -> Self {
        match error {
            ContactError::Validation(_) => {
                Self::error("Validation Error", "Please fix the errors in the form.")
            }
            ContactError::Configuration(_) => Self::error(
                "Contact Form Unavailable",
                format!(
                    "The contact form is not set up yet. Please email us directly at {CONTACT_EMAIL}."
                ),
            ),
            ContactError::Transport(_) | ContactError::Rejected { .. } => Self::error(
                "Failed to Send Message",
                "Something went wrong. Please try again or contact us directly.",
            ),
        }
    }
}
