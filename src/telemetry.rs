use crate::config::TelemetryConfig;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("HUIZENZOEKER_LOG_LEVEL '{directive}' is not a valid tracing directive")]
    InvalidLevel {
        directive: String,
        #[source]
        source: ParseError,
    },
    #[error("a global tracing subscriber is already installed: {0}")]
    AlreadyInstalled(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// `RUST_LOG` wins over the configured level.
fn log_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::InvalidLevel {
        directive: config.log_level.clone(),
        source,
    })
}

/// Installs the global subscriber for the command-line tool. Output goes to
/// stderr; stdout carries search results.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = log_filter(config)?;
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .try_init()
        .map_err(TelemetryError::AlreadyInstalled)
}
