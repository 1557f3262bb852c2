//! OANDA-specific error types.

use thiserror::Error;

use crate::application::ports::BrokerError;

/// Errors from the OANDA adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OandaError {
    /// API returned a non-2xx status.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// `errorMessage` from the body, or the raw body.
        message: String,
    },

    /// Client was built without credentials.
    #[error("Missing API token")]
    MissingCredentials,

    /// Base URL cannot carry path segments.
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    /// Network error.
    #[error("Network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("Request timed out")]
    Timeout,

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(String),
}

impl OandaError {
    /// Classify a transport error from reqwest.
    pub(crate) fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<OandaError> for BrokerError {
    fn from(err: OandaError) -> Self {
        match err {
            OandaError::Api { status, message } => Self::Api { status, message },
            OandaError::Timeout => Self::Timeout,
            OandaError::Network(message) | OandaError::InvalidUrl(message) => {
                Self::ConnectionError { message }
            }
            OandaError::MissingCredentials => Self::ConnectionError {
                message: "Missing API token".to_string(),
            },
            OandaError::JsonParse(message) => Self::InvalidResponse { message },
        }
    }
}
