//! Error types for the Love Journey SDK

use crate::validation::ValidationErrors;
use thiserror::Error;

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, JourneyError>;

/// SDK error types
#[derive(Error, Debug)]
pub enum JourneyError {
    /// Record not found
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization error (including malformed response bodies)
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Server answered with a non-success HTTP status
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Backend answered `{success: false, error}`
    #[error("{0}")]
    Backend(String),

    /// Response parsed but did not carry the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Local form validation failed
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Backend call did not complete in time
    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    /// Owning page was torn down before the call completed
    #[error("Request cancelled")]
    Cancelled,

    /// Operation is not allowed in the current modal state
    #[error("Cannot {action} while modal is {from}")]
    InvalidTransition { from: String, action: String },

    /// Backend does not expose this operation
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl JourneyError {
    /// Errors the user can recover from with a "Try Again" action
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            JourneyError::Network(_)
                | JourneyError::Timeout(_)
                | JourneyError::Server { status: 500..=599, .. }
        )
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for JourneyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            JourneyError::Serialization(err.to_string())
        } else {
            JourneyError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for JourneyError {
    fn from(err: serde_json::Error) -> Self {
        JourneyError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for JourneyError {
    fn from(err: toml::de::Error) -> Self {
        JourneyError::Config(err.to_string())
    }
}

impl From<std::io::Error> for JourneyError {
    fn from(err: std::io::Error) -> Self {
        JourneyError::Config(err.to_string())
    }
}

impl From<ValidationErrors> for JourneyError {
    fn from(errors: ValidationErrors) -> Self {
        JourneyError::Validation(errors)
    }
}
