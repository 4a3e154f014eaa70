pub mod query;
pub mod response;
pub mod transport;

pub use query::{build_params, sort_parameter, split_argument, ObjectType, QueryParams, SearchQuery};
pub use response::{parse_response, Entry};
pub use transport::{HttpTransport, Transport, TransportError};

use crate::config::{ClientConfig, ConfigError, DEFAULT_ENDPOINT};
use crate::error::SearchError;
use tracing::{info, warn};

const OUTPUT_FORMAT: &str = "json";
const TARGET_MODULE: &str = "Objecten";

/// Search facade for the Huizenzoeker listings API.
///
/// Every call builds the full parameter set up front, so a bad filter never
/// reaches the network.
#[derive(Debug)]
pub struct Huizenzoeker {
    api_key: String,
    endpoint: String,
    transport: Box<dyn Transport>,
}

impl Huizenzoeker {
    /// Client using the default HTTP transport.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ClientInitError> {
        Self::from_config(&ClientConfig::new(api_key))
    }

    pub fn with_transport(api_key: impl Into<String>, transport: Box<dyn Transport>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            transport,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientInitError> {
        let api_key = config.require_api_key()?;
        let transport = HttpTransport::with_runtime(Some(config.timeout))?;
        Ok(Self::with_transport(api_key, Box::new(transport)).with_endpoint(&config.endpoint))
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn for_sale(&self, query: &SearchQuery) -> Result<Vec<Entry>, SearchError> {
        self.objects(ObjectType::Sale.as_str(), query)
    }

    pub fn for_rent(&self, query: &SearchQuery) -> Result<Vec<Entry>, SearchError> {
        self.objects(ObjectType::Rent.as_str(), query)
    }

    /// Runs a search for `object_type` (`sale` or `rent`).
    pub fn objects(
        &self,
        object_type: &str,
        query: &SearchQuery,
    ) -> Result<Vec<Entry>, SearchError> {
        let params = self.request_params(object_type, query)?;
        info!(
            object_type,
            parameters = params.len(),
            "requesting listings"
        );

        let payload = self
            .transport
            .get_json(&self.endpoint, &params.to_pairs())
            .inspect_err(|err| warn!(error = %err, "listings request failed"))?;

        let entries = parse_response(payload)
            .inspect_err(|err| warn!(error = %err, "listings API rejected search"))?;
        info!(object_type, entries = entries.len(), "listings received");
        Ok(entries)
    }

    /// Complete parameter set `objects` would send, API key included.
    pub fn request_params(
        &self,
        object_type: &str,
        query: &SearchQuery,
    ) -> Result<QueryParams, SearchError> {
        let mut params = build_params(object_type, query)?;
        params.insert("apisleutel", self.api_key.as_str());
        params.insert("output", OUTPUT_FORMAT);
        params.insert("module", TARGET_MODULE);
        Ok(params)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientInitError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}
