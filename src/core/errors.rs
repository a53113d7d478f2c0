//! Custom error types for translation operations

use thiserror::Error;

/// Translation-related errors
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Required credential missing or a setting is unusable
    #[error("Configuration error: {message}")]
    ConfigError {
        /// What is missing or wrong
        message: String,
    },

    /// Caller passed input the service cannot work with
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Which argument was rejected
        message: String,
    },

    /// Operation not provided by the selected service
    #[error("Unsupported operation: {operation} is not implemented by {service}")]
    Unsupported {
        /// Service name
        service: &'static str,
        /// Operation name
        operation: &'static str,
    },

    /// Non-success status or an error payload returned by the backend
    #[error("Remote service error: {status} - {body}")]
    RemoteServiceError {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Response parsed but does not match the request
    #[error("Invalid response: {message}")]
    InvalidResponseError {
        /// How the response differs from the request
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Reqwest error
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl TranslationError {
    /// Shorthand for a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        TranslationError::ConfigError {
            message: message.into(),
        }
    }

    /// Shorthand for an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        TranslationError::InvalidArgument {
            message: message.into(),
        }
    }
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;
