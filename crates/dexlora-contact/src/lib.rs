#![forbid(unsafe_code)]

//! Contact form for the DexLora site.
//!
//! A [`ContactForm`] owns a [`ContactDraft`], validates it with
//! [`DraftRules`], and submits it once through a [`RelayTransport`] to the
//! relay chosen by [`RelayConfig`]. Success clears the draft and queues a
//! "Message Sent!" [`Notice`]; any failure keeps the draft and queues an
//! error notice.
//!
//! ```
//! use dexlora_contact::{ContactForm, Field, RelayConfig, SubmitOutcome};
//! # use dexlora_contact::{RelayPayload, RelayResponse, RelayTransport, TransportError};
//! # struct Accepting;
//! # impl RelayTransport for Accepting {
//! #     async fn post_json(
//! #         &self,
//! #         _: &str,
//! #         _: &RelayPayload,
//! #     ) -> Result<RelayResponse, TransportError> {
//! #         Ok(RelayResponse::new(200, r#"{"ok":true}"#))
//! #     }
//! # }
//! let config = RelayConfig::from_lookup(|key| {
//!     (key == "DEXLORA_FORMSPREE_ID").then(|| "xyzabc".to_owned())
//! });
//! let mut form = ContactForm::new(config, Accepting);
//! form.set_field(Field::Name, "Jane");
//! form.set_field(Field::Email, "jane@x.com");
//! form.set_field(Field::Message, "Hello there, interested in a quote");
//!
//! assert_eq!(pollster::block_on(form.submit()), SubmitOutcome::Sent);
//! assert!(form.draft().is_empty());
//! ```

pub mod clock;
pub mod config;
pub mod draft;
pub mod error;
pub mod form;
pub mod notice;
pub mod payload;
pub mod transport;
pub mod validation;
pub mod validators;

pub use clock::{FixedClock, SubmissionClock, SystemClock, format_human};
pub use config::{RelayConfig, RelayStrategy};
pub use draft::{ContactDraft, Field};
pub use error::{ConfigError, ContactError, TransportError, TransportErrorKind};
pub use form::{ContactForm, PendingSubmission, SubmitOutcome};
pub use notice::{Notice, NoticeKind};
pub use payload::{RelayPayload, RelayResponse};
#[cfg(feature = "http")]
pub use transport::HttpTransport;
pub use transport::RelayTransport;
pub use validation::{DraftRules, FieldError, FieldErrors, effective_subject, validate};
