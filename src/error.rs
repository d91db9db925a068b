//! Error types for klereo-bridge

use thiserror::Error;

/// Result type alias for klereo-bridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    HomeAssistant(#[from] HassError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Operation failed: {0}")]
    Other(String),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

impl Error {
    /// True when the failure is one of the Klereo "no data" outcomes.
    pub fn is_no_data(&self) -> bool {
        matches!(self, Error::Api(_))
    }
}

/// Klereo API errors
///
/// All four variants collapse to the same "no data" outcome for callers that
/// only check presence; the variant is kept for diagnostics.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Invalid API response from {endpoint}: {reason}")]
    Protocol { endpoint: String, reason: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Klereo maintenance window {from:04}-{to:04} is ongoing, request skipped")]
    MaintenanceSuppressed { from: u16, to: u16 },
}

impl ApiError {
    pub(crate) fn protocol(endpoint: &str, reason: impl Into<String>) -> Self {
        ApiError::Protocol {
            endpoint: endpoint.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Transport("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Transport("Failed to connect to API".to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// Home Assistant REST API errors
#[derive(Debug, Error)]
pub enum HassError {
    #[error("Home Assistant is not configured. Run `klereo-bridge init` or set HA_URL and HA_TOKEN.")]
    NotConfigured,

    #[error("Home Assistant returned HTTP {status} for {endpoint}")]
    Status { endpoint: String, status: u16 },

    #[error("Home Assistant request failed: {0}")]
    Network(String),

    #[error("Invalid Home Assistant response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for HassError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HassError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            HassError::Network("Failed to connect to Home Assistant".to_string())
        } else {
            HassError::Network(err.to_string())
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found. Run `klereo-bridge init` to set up.")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("Klereo credentials not configured. Run `klereo-bridge init` to set them up.")]
    MissingCredentials,
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
