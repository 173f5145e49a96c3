use std::fmt;
use std::path::PathBuf;

use reqwest::Url;

pub const TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const ENDPOINT_VAR: &str = "ENDPOINT";
pub const LOG_FILE_VAR: &str = "LOG_FILE";

const DEFAULT_LOG_FILE: &str = "anekdot.log";

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Required variables are absent or empty.
    Missing(Vec<&'static str>),
    /// The endpoint is not an absolute URL.
    InvalidEndpoint { value: String, reason: String },
    /// Validation error.
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(vars) => {
                write!(f, "missing required variables: {}", vars.join(", "))
            }
            Self::InvalidEndpoint { value, reason } => {
                write!(f, "invalid {ENDPOINT_VAR} '{}': {}", value, reason)
            }
            Self::Validation(msg) => write!(f, "config validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

pub struct Config {
    pub telegram_token: String,
    /// Where jokes are fetched from.
    pub endpoint: Url,
    pub log_file: PathBuf,
}

impl Config {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let token = get(TOKEN_VAR);
        let endpoint = get(ENDPOINT_VAR);

        let missing: Vec<&'static str> = [(TOKEN_VAR, token.is_none()), (ENDPOINT_VAR, endpoint.is_none())]
            .into_iter()
            .filter_map(|(name, absent)| absent.then_some(name))
            .collect();
        let (Some(telegram_token), Some(endpoint)) = (token, endpoint) else {
            return Err(ConfigError::Missing(missing));
        };

        // Telegram tokens are formatted as {bot_id}:{secret} where bot_id is numeric
        let token_parts: Vec<&str> = telegram_token.split(':').collect();
        if token_parts.len() != 2 || token_parts[0].parse::<u64>().is_err() || token_parts[1].is_empty() {
            return Err(ConfigError::Validation(format!(
                "{TOKEN_VAR} appears invalid (expected format: 123456789:ABCdefGHI...)"
            )));
        }

        let endpoint = Url::parse(endpoint.trim())
            .map_err(|e| ConfigError::InvalidEndpoint { value: endpoint.clone(), reason: e.to_string() })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "{ENDPOINT_VAR} must be an http(s) URL, got scheme '{}'",
                endpoint.scheme()
            )));
        }

        Ok(Self {
            telegram_token,
            endpoint,
            log_file: log_file(&lookup),
        })
    }
}

/// Log file location, resolved before the rest of the config so that
/// configuration errors end up in the log.
pub fn log_file<F>(lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    lookup(LOG_FILE_VAR)
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
}
