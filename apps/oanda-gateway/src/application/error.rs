//! Gateway error taxonomy.

use thiserror::Error;

use super::ports::BrokerError;
use crate::domain::{CloseUnitsError, OrderValidationError, PricingError};

/// Errors returned by gateway operations.
///
/// The HTTP layer maps each variant to a status code exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Caller input was rejected before reaching the broker.
    #[error("{0}")]
    InvalidRequest(String),

    /// The broker returned no data for the requested resource.
    #[error("{0}")]
    NotFound(String),

    /// The broker reported a failure.
    #[error("Oanda API error: {0}")]
    Upstream(BrokerError),

    /// Anything else: transport failures, undecodable responses.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Short tier name used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::NotFound(_) => "not_found",
            Self::Upstream(_) => "upstream",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<BrokerError> for GatewayError {
    fn from(err: BrokerError) -> Self {
        if err.is_api_error() {
            Self::Upstream(err)
        } else {
            Self::Internal(err.to_string())
        }
    }
}

impl From<OrderValidationError> for GatewayError {
    fn from(err: OrderValidationError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

impl From<CloseUnitsError> for GatewayError {
    fn from(err: CloseUnitsError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

impl From<PricingError> for GatewayError {
    fn from(err: PricingError) -> Self {
        Self::Internal(err.to_string())
    }
}
