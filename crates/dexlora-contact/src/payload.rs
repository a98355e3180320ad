#![forbid(unsafe_code)]

//! Relay request bodies and response interpretation.

use serde::Serialize;
use serde_json::Value;

use crate::config::{RelayConfig, RelayStrategy};
use crate::draft::ContactDraft;
use crate::error::{ConfigError, ContactError};
use crate::validation::effective_subject;

/// Subject prefix added for Web3Forms, where the subject becomes the email subject.
pub const WEB3FORMS_SUBJECT_PREFIX: &str = "[DexLora Contact] ";
/// Sender name shown by Web3Forms.
pub const WEB3FORMS_FROM_NAME: &str = "DexLora Innovations Website";

/// JSON body posted to the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub submitted_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

impl RelayPayload {
    /// Build the body for `config`'s strategy.
    pub fn build(
        config: &RelayConfig,
        draft: &ContactDraft,
        submitted_at: String,
    ) -> Result<Self, ConfigError> {
        let subject = effective_subject(draft);
        let mut payload = Self {
            access_key: None,
            name: draft.name.trim().to_owned(),
            email: draft.email.trim().to_owned(),
            subject: subject.to_owned(),
            message: draft.message.trim().to_owned(),
            submitted_at,
            from_name: None,
            to: None,
        };
        match &config.strategy {
            RelayStrategy::Formspree { .. } => {}
            RelayStrategy::Web3Forms { access_key } => {
                payload.access_key = Some(access_key.clone());
                payload.subject = format!("{WEB3FORMS_SUBJECT_PREFIX}{subject}");
                payload.from_name = Some(WEB3FORMS_FROM_NAME.to_owned());
                payload.to = config.recipient.clone();
            }
            RelayStrategy::Unconfigured => return Err(ConfigError::MissingCredential),
        }
        Ok(payload)
    }
}

/// Raw relay answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayResponse {
    pub status: u16,
    pub body: String,
}

/// Lenient view of a relay reply. Field types vary between relays, so each
/// field is read from a raw `Value` and a mistyped reason never masks a
/// failure flag.
#[derive(Debug)]
struct ReplyBody(Value);

impl ReplyBody {
    fn parse(body: &str) -> Option<Self> {
        serde_json::from_str::<Value>(body).ok().map(Self)
    }

    fn signals_failure(&self) -> bool {
        flag_is_false(self.0.get("success"))
            || flag_is_false(self.0.get("ok"))
            || self.0.get("errors").is_some_and(is_non_empty)
    }

    fn reason(&self) -> Option<String> {
        ["message", "error", "errors"]
            .into_iter()
            .filter_map(|key| self.0.get(key))
            .find_map(value_text)
    }
}

/// `false`, `"false"` and `0` all count as an explicit failure flag.
fn flag_is_false(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => !b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("false"),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

fn is_non_empty(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// Human-readable text for a reason field of any shape.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_owned())
        }
        Value::Array(items) => items.iter().find_map(value_text),
        Value::Object(map) => ["message", "text", "error", "code"]
            .into_iter()
            .filter_map(|key| map.get(key))
            .find_map(value_text)
            .or_else(|| {
                map.iter()
                    .find_map(|(key, v)| value_text(v).map(|text| format!("{key}: {text}")))
            }),
        other => Some(other.to_string()),
    }
}

impl RelayResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub const fn is_success_status(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Success iff the status is 2xx and the body does not explicitly signal
    /// failure. A 2xx body that is not JSON counts as success.
    pub fn interpret(&self) -> Result<(), ContactError> {
        let reply = ReplyBody::parse(&self.body);
        if self.is_success_status() && !reply.as_ref().is_some_and(ReplyBody::signals_failure) {
            return Ok(());
        }
        let message = reply
            .and_then(|r| r.reason())
            .unwrap_or_else(|| format!("relay answered with status {}", self.status));
        Err(ContactError::Rejected {
            status: self.status,
            message,
        })
    }
}
