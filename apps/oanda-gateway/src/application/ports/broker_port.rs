//! Broker Port (Driven Port)
//!
//! Interface to the trading venue. One method per broker operation; each
//! call is fire-once, with no retries.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{
    AccountSummary, CandleQuery, ClientPrice, OrderPayload, PositionCloseRequest,
};

/// Broker port error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrokerError {
    /// The broker answered with a documented failure (non-2xx status).
    #[error("{message}")]
    Api {
        /// HTTP status returned by the broker.
        status: u16,
        /// Broker error text.
        message: String,
    },

    /// The request never got a response.
    #[error("Broker connection error: {message}")]
    ConnectionError {
        /// Error details.
        message: String,
    },

    /// The request exceeded the configured timeout.
    #[error("Broker request timed out")]
    Timeout,

    /// The broker answered 2xx with a body we could not decode.
    #[error("Invalid broker response: {message}")]
    InvalidResponse {
        /// Error details.
        message: String,
    },
}

impl BrokerError {
    /// Whether the broker itself reported the failure.
    #[must_use]
    pub const fn is_api_error(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}

/// Port for broker interactions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BrokerPort: Send + Sync {
    /// Fetch account balance, margin and counts.
    async fn account_details(&self) -> Result<AccountSummary, BrokerError>;

    /// List open positions.
    async fn open_positions(&self) -> Result<Vec<Value>, BrokerError>;

    /// List pending orders.
    async fn pending_orders(&self) -> Result<Vec<Value>, BrokerError>;

    /// Fetch current price rows for an instrument.
    async fn pricing(&self, instrument: &str) -> Result<Vec<ClientPrice>, BrokerError>;

    /// Fetch historical candles for an instrument.
    async fn candles(
        &self,
        instrument: &str,
        query: &CandleQuery,
    ) -> Result<Vec<Value>, BrokerError>;

    /// Create an order. Returns the broker's raw response.
    async fn create_order(&self, payload: &OrderPayload) -> Result<Value, BrokerError>;

    /// Cancel a pending order. Returns the broker's raw response.
    async fn cancel_order(&self, order_id: &str) -> Result<Value, BrokerError>;

    /// Close (part of) a position. Returns the broker's raw response.
    async fn close_position(
        &self,
        instrument: &str,
        request: &PositionCloseRequest,
    ) -> Result<Value, BrokerError>;
}
