use crate::client::transport::TransportError;
use crate::client::ClientInitError;
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use std::fmt;

/// Failure raised while building or executing a listings search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Filter \"{name}\" does not exist, choose from {}", .available.join(", "))]
    FilterDoesNotExist {
        name: String,
        available: Vec<String>,
    },
    #[error("{0}")]
    Validation(String),
    #[error("{operation} not implemented for {filter}")]
    OperationNotImplemented { operation: String, filter: String },
    #[error("Error in parameter \"{parameter}\": {message}")]
    Api { parameter: String, message: String },
    #[error("unexpected response shape: {0}")]
    MalformedResponse(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl SearchError {
    /// Whether the caller built an invalid search, as opposed to the remote
    /// side or the network failing.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::FilterDoesNotExist { .. }
                | Self::Validation(_)
                | Self::OperationNotImplemented { .. }
        )
    }
}

/// Top-level failure of the command-line tool.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Client(ClientInitError),
    Search(SearchError),
    Output(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Client(err) => write!(f, "client error: {}", err),
            AppError::Search(err) => write!(f, "search failed: {}", err),
            AppError::Output(err) => write!(f, "could not render output: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Client(err) => Some(err),
            AppError::Search(err) => Some(err),
            AppError::Output(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<ClientInitError> for AppError {
    fn from(value: ClientInitError) -> Self {
        Self::Client(value)
    }
}

impl From<SearchError> for AppError {
    fn from(value: SearchError) -> Self {
        Self::Search(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Output(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let missing = SearchError::FilterDoesNotExist {
            name: "garden".to_string(),
            available: vec!["city".to_string(), "price".to_string()],
        };
        assert_eq!(
            missing.to_string(),
            "Filter \"garden\" does not exist, choose from city, price"
        );

        let api = SearchError::Api {
            parameter: "pc".to_string(),
            message: "onbekende postcode".to_string(),
        };
        assert_eq!(
            api.to_string(),
            "Error in parameter \"pc\": onbekende postcode"
        );
    }

    #[test]
    fn usage_errors_are_distinguished_from_remote_errors() {
        assert!(SearchError::Validation("bad".to_string()).is_usage_error());
        assert!(!SearchError::MalformedResponse("bad".to_string()).is_usage_error());
        assert!(!SearchError::Api {
            parameter: "get".to_string(),
            message: "fout".to_string()
        }
        .is_usage_error());
    }
}
