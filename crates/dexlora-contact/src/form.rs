#![forbid(unsafe_code)]

//! Contact form controller.
//!
//! # Submission
//!
//! ```text
//! begin_submit ──► validate ──► relay configured? ──► payload
//!      │               │                │
//!      │ busy          ✗ Validation     ✗ Configuration
//!      ▼
//! PendingSubmission::send ──► one POST ──► interpret
//!                                              │
//! finish_submit ◄──────────────────────────────┘
//!   ok: clear draft, "Message Sent!"   err: keep draft, error notice
//! ```
//!
//! [`ContactForm::submit`] runs all three steps. Hosts that cannot hold a
//! mutable borrow across the network await (the browser glue) call them
//! separately; while a submission is pending, further attempts return
//! [`SubmitOutcome::Busy`].

use std::collections::VecDeque;

use crate::clock::{SubmissionClock, SystemClock, format_human};
use crate::config::RelayConfig;
use crate::draft::{ContactDraft, Field};
use crate::error::ContactError;
use crate::notice::Notice;
use crate::payload::RelayPayload;
use crate::transport::RelayTransport;
use crate::validation::{DraftRules, FieldErrors};

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The relay accepted the message.
    Sent,
    Failed(ContactError),
    /// A submission is already in flight; nothing was done.
    Busy,
}

impl SubmitOutcome {
    pub const fn is_sent(&self) -> bool {
        matches!(self, Self::Sent)
    }
}

/// A validated submission ready to send. Holds no borrow of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    url: String,
    relay: &'static str,
    payload: RelayPayload,
}

impl PendingSubmission {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn payload(&self) -> &RelayPayload {
        &self.payload
    }

    /// Perform the single relay request.
    pub async fn send<T: RelayTransport + ?Sized>(
        &self,
        transport: &T,
    ) -> Result<(), ContactError> {
        tracing::debug!(relay = self.relay, "sending contact submission");
        let response = transport.post_json(&self.url, &self.payload).await?;
        response.interpret()
    }
}

/// Owns the draft, field errors, notices and in-flight flag.
pub struct ContactForm<T, C = SystemClock> {
    draft: ContactDraft,
    errors: FieldErrors,
    rules: DraftRules,
    config: RelayConfig,
    transport: T,
    clock: C,
    submitting: bool,
    success: bool,
    notices: VecDeque<Notice>,
}

impl<T: std::fmt::Debug, C> std::fmt::Debug for ContactForm<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactForm")
            .field("draft", &self.draft)
            .field("errors", &self.errors)
            .field("relay", &self.config.strategy.name())
            .field("transport", &self.transport)
            .field("submitting", &self.submitting)
            .field("success", &self.success)
            .field("notices", &self.notices.len())
            .finish()
    }
}

impl<T> ContactForm<T, SystemClock> {
    pub fn new(config: RelayConfig, transport: T) -> Self {
        Self::with_clock(config, transport, SystemClock)
    }
}

impl<T, C> ContactForm<T, C> {
    pub fn with_clock(config: RelayConfig, transport: T, clock: C) -> Self {
        Self {
            draft: ContactDraft::default(),
            errors: FieldErrors::new(),
            rules: DraftRules::default(),
            config,
            transport,
            clock,
            submitting: false,
            success: false,
            notices: VecDeque::new(),
        }
    }

    pub fn draft(&self) -> &ContactDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// True while a submission is in flight; the submit control is disabled.
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// True after a successful send until the next edit or acknowledgement.
    pub const fn is_success(&self) -> bool {
        self.success
    }

    pub fn acknowledge_success(&mut self) {
        self.success = false;
    }

    /// Label for the submit control.
    pub const fn submit_label(&self) -> &'static str {
        if self.submitting {
            "Sending Message..."
        } else if self.success {
            "Message Sent Successfully!"
        } else {
            "Send Message"
        }
    }

    /// Update one field and clear its error.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.draft.set(field, value);
        self.errors.clear_field(field);
        self.success = false;
    }

    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    fn fail(&mut self, error: ContactError) -> SubmitOutcome {
        tracing::warn!(kind = error.kind(), %error, "contact submission failed");
        self.notices.push_back(Notice::from(&error));
        SubmitOutcome::Failed(error)
    }

    /// Apply the result of [`PendingSubmission::send`].
    pub fn finish_submit(&mut self, result: Result<(), ContactError>) -> SubmitOutcome {
        self.submitting = false;
        match result {
            Ok(()) => {
                tracing::info!(relay = self.config.strategy.name(), "contact submission sent");
                self.draft.clear();
                self.errors.clear();
                self.success = true;
                self.notices.push_back(Notice::sent());
                SubmitOutcome::Sent
            }
            Err(error) => self.fail(error),
        }
    }
}

impl<T, C: SubmissionClock> ContactForm<T, C> {
    /// Validate and prepare a submission, marking the form busy.
    ///
    /// Returns the outcome directly when nothing needs to be sent.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, SubmitOutcome> {
        if self.submitting {
            return Err(SubmitOutcome::Busy);
        }
        if let Err(errors) = self.rules.validate(&self.draft) {
            self.errors = errors.clone();
            return Err(self.fail(ContactError::Validation(errors)));
        }
        self.errors.clear();
        let url = match self.config.strategy.endpoint() {
            Ok(url) => url,
            Err(e) => return Err(self.fail(e.into())),
        };
        let submitted_at = format_human(self.clock.now());
        let payload = match RelayPayload::build(&self.config, &self.draft, submitted_at) {
            Ok(payload) => payload,
            Err(e) => return Err(self.fail(e.into())),
        };
        self.submitting = true;
        Ok(PendingSubmission {
            url,
            relay: self.config.strategy.name(),
            payload,
        })
    }
}

impl<T: RelayTransport, C: SubmissionClock> ContactForm<T, C> {
    /// Validate, send once, and record the outcome.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let pending = match self.begin_submit() {
            Ok(pending) => pending,
            Err(outcome) => return outcome,
        };
        let result = pending.send(&self.transport).await;
        self.finish_submit(result)
    }
}
