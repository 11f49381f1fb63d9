use std::io;
use thiserror::Error;

/// Unified error type for the installer assistant
#[derive(Error, Debug)]
pub enum AssistError {
    /// Provider answered with a body we could not use
    #[error("API error: {0}")]
    Api(String),

    /// Provider answered with a non-success status
    #[error("Failed to get response from {provider}")]
    ProviderFailed { provider: &'static str, status: u16 },

    /// Provider value outside the known set
    #[error("Invalid provider: {0}")]
    InvalidProvider(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input errors
    #[error("Input error: {0}")]
    Input(String),

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Network-related errors
    #[error("Network error: {0}")]
    Network(String),
}

impl AssistError {
    /// Errors raised before any request leaves the process.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            AssistError::Config(_) | AssistError::InvalidProvider(_)
        )
    }
}

impl From<reqwest::Error> for AssistError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AssistError::Network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            AssistError::Network(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            AssistError::Serialization(format!("Response body: {}", err))
        } else {
            AssistError::Network(format!("Request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for AssistError {
    fn from(err: serde_json::Error) -> Self {
        AssistError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yml::Error> for AssistError {
    fn from(err: serde_yml::Error) -> Self {
        AssistError::Serialization(format!("YAML error: {}", err))
    }
}
