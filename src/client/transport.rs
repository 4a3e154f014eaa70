use std::fmt::Debug;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tokio::runtime::Runtime;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request to listings API failed: {0}")]
    Request(String),
    #[error("listings API answered with HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("listings API returned invalid JSON: {0}")]
    Decode(String),
    #[error("transport runtime unavailable: {0}")]
    Runtime(String),
}

/// Performs a GET against `endpoint` and decodes the JSON body.
pub trait Transport: Debug + Send + Sync {
    fn get_json(&self, endpoint: &str, params: &[(String, String)])
        -> Result<Value, TransportError>;
}

/// reqwest-backed transport. Owns a tokio runtime so callers stay synchronous.
///
/// # Panics
///
/// [`Transport::get_json`] blocks on the owned runtime and panics when called
/// from within another tokio runtime. Async callers should run searches on a
/// blocking thread (`spawn_blocking`) or supply their own [`Transport`].
pub struct HttpTransport {
    client: Client,
    runtime: Runtime,
}

impl HttpTransport {
    pub fn new(client: Client, runtime: Runtime) -> Self {
        Self { client, runtime }
    }

    pub fn with_runtime(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(HttpTransport::map_error)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| TransportError::Runtime(err.to_string()))?;
        Ok(Self::new(client, runtime))
    }

    fn map_error<E: std::fmt::Display>(err: E) -> TransportError {
        TransportError::Request(err.to_string())
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport").finish_non_exhaustive()
    }
}

impl Transport for HttpTransport {
    fn get_json(
        &self,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<Value, TransportError> {
        self.runtime.block_on(async {
            let response = self
                .client
                .get(endpoint)
                .query(params)
                .send()
                .await
                .map_err(HttpTransport::map_error)?;

            let status = response.status();
            debug!(%status, endpoint, "listings API responded");
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(TransportError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            response
                .json::<Value>()
                .await
                .map_err(|err| TransportError::Decode(err.to_string()))
        })
    }
}
