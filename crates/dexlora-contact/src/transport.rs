#![forbid(unsafe_code)]

//! The one network call: a JSON `POST` to the relay.

use crate::error::TransportError;
use crate::payload::{RelayPayload, RelayResponse};

/// Sends a relay payload and returns the raw answer.
///
/// Implementations make exactly one request per call and never retry.
#[allow(async_fn_in_trait)]
pub trait RelayTransport {
    async fn post_json(
        &self,
        url: &str,
        payload: &RelayPayload,
    ) -> Result<RelayResponse, TransportError>;
}

impl<T: RelayTransport + ?Sized> RelayTransport for &T {
    async fn post_json(
        &self,
        url: &str,
        payload: &RelayPayload,
    ) -> Result<RelayResponse, TransportError> {
        (**self).post_json(url, payload).await
    }
}

#[cfg(feature = "http")]
pub use http::HttpTransport;

#[cfg(feature = "http")]
mod http {
    use std::time::Duration;

    use super::RelayTransport;
    use crate::error::{TransportError, TransportErrorKind};
    use crate::payload::{RelayPayload, RelayResponse};

    /// `reqwest`-backed transport. Uses `fetch` on wasm32.
    #[derive(Debug, Clone)]
    pub struct HttpTransport {
        client: reqwest::Client,
    }

    impl HttpTransport {
        /// Build a client. `timeout` applies on native targets only; the
        /// browser owns request timeouts on wasm32.
        pub fn new(timeout: Duration) -> Result<Self, TransportError> {
            let builder = reqwest::Client::builder();
            #[cfg(not(target_arch = "wasm32"))]
            let builder = builder.timeout(timeout);
            #[cfg(target_arch = "wasm32")]
            let _ = timeout;
            let client = builder.build().map_err(|e| {
                TransportError::new(
                    TransportErrorKind::Other,
                    format!("http client init failed: {e}"),
                )
            })?;
            Ok(Self { client })
        }

        pub fn with_client(client: reqwest::Client) -> Self {
            Self { client }
        }
    }

    fn classify(error: &reqwest::Error) -> TransportErrorKind {
        #[cfg(not(target_arch = "wasm32"))]
        {
            if error.is_timeout() {
                return TransportErrorKind::Timeout;
            }
            if error.is_connect() {
                return TransportErrorKind::Connect;
            }
        }
        if error.is_body() || error.is_decode() {
            TransportErrorKind::Body
        } else if error.is_request() {
            TransportErrorKind::Connect
        } else {
            TransportErrorKind::Other
        }
    }

    impl RelayTransport for HttpTransport {
        async fn post_json(
            &self,
            url: &str,
            payload: &RelayPayload,
        ) -> Result<RelayResponse, TransportError> {
            let response = self
                .client
                .post(url)
                .header(reqwest::header::ACCEPT, "application/json")
                .json(payload)
                .send()
                .await
                .map_err(|e| {
                    TransportError::new(classify(&e), format!("relay request failed: {e}"))
                })?;
            let status = response.status().as_u16();
            let body = response.text().await.map_err(|e| {
                TransportError::new(
                    TransportErrorKind::Body,
                    format!("relay response unreadable: {e}"),
                )
            })?;
            Ok(RelayResponse { status, body })
        }
    }
}
