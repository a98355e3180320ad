#![forbid(unsafe_code)]

//! Relay selection, fixed once at configuration load.
//!
//! Precedence:
//! 1. `DEXLORA_FORMSPREE_ID` set → Formspree form endpoint.
//! 2. `DEXLORA_WEB3FORMS_KEY` set → Web3Forms with that access key.
//! 3. Neither → [`RelayStrategy::Unconfigured`]; submissions fail with a
//!    configuration error before any network call.
//!
//! Blank values count as unset.

use std::time::Duration;

use crate::error::ConfigError;

/// Formspree form identifier.
pub const ENV_FORMSPREE_ID: &str = "DEXLORA_FORMSPREE_ID";
/// Web3Forms access key.
pub const ENV_WEB3FORMS_KEY: &str = "DEXLORA_WEB3FORMS_KEY";

pub const FORMSPREE_BASE_URL: &str = "https://formspree.io/f/";
pub const WEB3FORMS_URL: &str = "https://api.web3forms.com/submit";

/// Default request timeout (native transports only).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Which relay receives submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayStrategy {
    Formspree { form_id: String },
    Web3Forms { access_key: String },
    Unconfigured,
}

impl RelayStrategy {
    /// Endpoint URL, or the configuration error for [`Unconfigured`](Self::Unconfigured).
    pub fn endpoint(&self) -> Result<String, ConfigError> {
        match self {
            Self::Formspree { form_id } => Ok(format!("{FORMSPREE_BASE_URL}{form_id}")),
            Self::Web3Forms { .. } => Ok(WEB3FORMS_URL.to_owned()),
            Self::Unconfigured => Err(ConfigError::MissingCredential),
        }
    }

    /// Short name for logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Formspree { .. } => "formspree",
            Self::Web3Forms { .. } => "web3forms",
            Self::Unconfigured => "unconfigured",
        }
    }

    pub const fn is_configured(&self) -> bool {
        !matches!(self, Self::Unconfigured)
    }
}

/// Relay configuration for one deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub strategy: RelayStrategy,
    /// Recipient forwarded to relays that accept one.
    pub recipient: Option<String>,
    pub timeout: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self::new(RelayStrategy::Unconfigured)
    }
}

impl RelayConfig {
    pub fn new(strategy: RelayStrategy) -> Self {
        Self {
            strategy,
            recipient: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };
        let strategy = if let Some(form_id) = read(ENV_FORMSPREE_ID) {
            RelayStrategy::Formspree { form_id }
        } else if let Some(access_key) = read(ENV_WEB3FORMS_KEY) {
            RelayStrategy::Web3Forms { access_key }
        } else {
            RelayStrategy::Unconfigured
        };
        tracing::debug!(relay = strategy.name(), "contact relay selected");
        Self {
            strategy,
            recipient: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn formspree_wins_when_both_set() {
        let config = RelayConfig::from_lookup(lookup(&[
            (ENV_FORMSPREE_ID, "abc123"),
            (ENV_WEB3FORMS_KEY, "key"),
        ]));
        assert_eq!(
            config.strategy,
            RelayStrategy::Formspree {
                form_id: "abc123".into()
            }
        );
        assert_eq!(
            config.strategy.endpoint(),
            Ok("https://formspree.io/f/abc123".to_owned())
        );
    }

    #[test]
    fn web3forms_is_the_fallback() {
        let config = RelayConfig::from_lookup(lookup(&[(ENV_WEB3FORMS_KEY, " key ")]));
        assert_eq!(
            config.strategy,
            RelayStrategy::Web3Forms {
                access_key: "key".into()
            }
        );
        assert_eq!(config.strategy.endpoint(), Ok(WEB3FORMS_URL.to_owned()));
    }

    #[test]
    fn blank_values_are_unset() {
        let config = RelayConfig::from_lookup(lookup(&[
            (ENV_FORMSPREE_ID, "  "),
            (ENV_WEB3FORMS_KEY, ""),
        ]));
        assert_eq!(config.strategy, RelayStrategy::Unconfigured);
        assert_eq!(config.strategy.endpoint(), Err(ConfigError::MissingCredential));
    }

    #[test]
    fn recipient_is_set_in_code_only() {
        let config = RelayConfig::from_lookup(lookup(&[(ENV_WEB3FORMS_KEY, "key")]));
        assert_eq!(config.recipient, None);
        let config = config.with_recipient("dexlora.innovations@gmail.com");
        assert_eq!(config.recipient.as_deref(), Some("dexlora.innovations@gmail.com"));
    }
}
