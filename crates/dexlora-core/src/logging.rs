#![forbid(unsafe_code)]

//! Logging and tracing support.
//!
//! With the `tracing` feature the usual macros are re-exported here so
//! downstream crates can log through `dexlora_core::logging` without naming
//! `tracing` themselves. `tracing-json` adds [`init_logging`], which installs a
//! JSON subscriber filtered by the `DEXLORA_LOG` environment variable.

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Environment variable holding the log filter directive (e.g. `dexlora_fx=debug`).
pub const LOG_FILTER_ENV: &str = "DEXLORA_LOG";

/// Default filter used when [`LOG_FILTER_ENV`] is unset or unparsable.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Install a global JSON subscriber.
///
/// Returns `false` if a global subscriber was already installed (the existing
/// one is kept).
#[cfg(feature = "tracing-json")]
pub fn init_logging() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(all(test, feature = "tracing-json"))]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_rejected() {
        let _ = init_logging();
        assert!(!init_logging(), "global subscriber should only install once");
    }
}
