#![forbid(unsafe_code)]

//! Contact submission errors.

use std::fmt;

use crate::validation::FieldErrors;

/// Relay configuration problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Neither a Formspree id nor a Web3Forms key was configured.
    MissingCredential,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredential => f.write_str("no contact relay credential configured"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Coarse transport failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Could not reach the relay.
    Connect,
    Timeout,
    /// The request was sent but the response body could not be read.
    Body,
    Other,
}

/// The request did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Body => "body",
            TransportErrorKind::Other => "transport",
        };
        write!(f, "{kind} error: {}", self.message)
    }
}

impl std::error::Error for TransportError {}

/// Why a submission did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    /// Local validation failed; nothing was sent.
    Validation(FieldErrors),
    /// No relay configured; nothing was sent.
    Configuration(ConfigError),
    /// The request failed in flight.
    Transport(TransportError),
    /// The relay answered with a non-2xx status or an explicit failure body.
    Rejected { status: u16, message: String },
}

impl ContactError {
    /// Short label for logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Configuration(_) => "configuration",
            Self::Transport(_) => "transport",
            Self::Rejected { .. } => "rejected",
        }
    }

    /// Whether the relay may have been contacted.
    pub const fn reached_network(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Rejected { .. })
    }
}

impl fmt::Display for ContactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(errors) => write!(f, "invalid contact form: {errors}"),
            Self::Configuration(e) => write!(f, "contact relay misconfigured: {e}"),
            Self::Transport(e) => write!(f, "contact relay unreachable: {e}"),
            Self::Rejected { status, message } => {
                write!(f, "contact relay rejected submission ({status}): {message}")
            }
        }
    }
}

impl std::error::Error for ContactError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(e) => Some(e),
            Self::Configuration(e) => Some(e),
            Self::Transport(e) => Some(e),
            Self::Rejected { .. } => None,
        }
    }
}

impl From<FieldErrors> for ContactError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<ConfigError> for ContactError {
    fn from(error: ConfigError) -> Self {
        Self::Configuration(error)
    }
}

impl From<TransportError> for ContactError {
    fn from(error: TransportError) -> Self {
        Self::Transport(error)
    }
}
