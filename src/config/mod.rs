use std::env;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://www.huizenzoeker.nl/api/v1/";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Top-level configuration for the client and command-line tool.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub client: ClientConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_key = env::var("HUIZENZOEKER_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let endpoint =
            env::var("HUIZENZOEKER_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        let timeout_secs = env::var("HUIZENZOEKER_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTimeout)?;

        let log_level = env::var("HUIZENZOEKER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            client: ClientConfig {
                api_key,
                endpoint,
                timeout: Duration::from_secs(timeout_secs),
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Settings for talking to the listings API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingApiKey,
    InvalidTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingApiKey => write!(f, "HUIZENZOEKER_API_KEY must be set"),
            ConfigError::InvalidTimeout => {
                write!(f, "HUIZENZOEKER_TIMEOUT_SECS must be a whole number of seconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("HUIZENZOEKER_API_KEY");
        env::remove_var("HUIZENZOEKER_ENDPOINT");
        env::remove_var("HUIZENZOEKER_TIMEOUT_SECS");
        env::remove_var("HUIZENZOEKER_LOG_LEVEL");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.client.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.client.timeout, Duration::from_secs(30));
        assert_eq!(config.telemetry.log_level, "info");
        assert!(matches!(
            config.client.require_api_key(),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn reads_api_key_and_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("HUIZENZOEKER_API_KEY", "secret");
        env::set_var("HUIZENZOEKER_ENDPOINT", "http://127.0.0.1:9000/api/");
        env::set_var("HUIZENZOEKER_TIMEOUT_SECS", "5");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.client.require_api_key().expect("key"), "secret");
        assert_eq!(config.client.endpoint, "http://127.0.0.1:9000/api/");
        assert_eq!(config.client.timeout, Duration::from_secs(5));
        reset_env();
    }

    #[test]
    fn rejects_non_numeric_timeout() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("HUIZENZOEKER_TIMEOUT_SECS", "soon");
        assert!(matches!(AppConfig::load(), Err(ConfigError::InvalidTimeout)));
        reset_env();
    }
}
