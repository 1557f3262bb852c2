//! Trading Gateway Use Cases
//!
//! One method per route. Each validates its input, performs exactly one
//! broker call and reshapes the result. Failures are logged here, once, and
//! returned as [`GatewayError`].

use std::sync::Arc;

use serde_json::Value;

use super::error::GatewayError;
use super::ports::{BrokerError, BrokerPort};
use crate::domain::{AccountSummary, CandleQuery, CloseUnits, OrderKind, OrderRequest, Quote};

/// Gateway over a broker implementation.
pub struct TradingGateway<B: BrokerPort> {
    broker: Arc<B>,
    account_id: String,
    environment: String,
}

impl<B: BrokerPort> TradingGateway<B> {
    /// Create a gateway for one account.
    pub fn new(
        broker: Arc<B>,
        account_id: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            broker,
            account_id: account_id.into(),
            environment: environment.into(),
        }
    }

    /// Configured account id.
    #[must_use]
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Configured environment name (`practice` or `live`).
    #[must_use]
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Probe broker reachability.
    ///
    /// Failures are returned to the caller as data and are not logged as errors.
    pub async fn probe(&self) -> Result<(), BrokerError> {
        self.broker.account_details().await.map(|_| ())
    }

    /// Account balance, NAV, margin and counts.
    pub async fn account(&self) -> Result<AccountSummary, GatewayError> {
        self.broker
            .account_details()
            .await
            .map_err(|e| failed("get_account_info", e.into()))
    }

    /// Open positions.
    pub async fn positions(&self) -> Result<Vec<Value>, GatewayError> {
        self.broker
            .open_positions()
            .await
            .map_err(|e| failed("get_positions", e.into()))
    }

    /// Pending orders.
    pub async fn orders(&self) -> Result<Vec<Value>, GatewayError> {
        self.broker
            .pending_orders()
            .await
            .map_err(|e| failed("get_orders", e.into()))
    }

    /// Best bid/ask and spread for an instrument.
    pub async fn price(&self, instrument: &str) -> Result<Quote, GatewayError> {
        const OP: &str = "get_current_price";

        require_non_empty(OP, "instrument", instrument)?;

        let prices = self
            .broker
            .pricing(instrument)
            .await
            .map_err(|e| failed(OP, e.into()))?;

        let Some(price) = prices.first() else {
            return Err(failed(
                OP,
                GatewayError::NotFound(format!("No price data found for {instrument}")),
            ));
        };

        Quote::from_price(instrument, price).map_err(|e| failed(OP, e.into()))
    }

    /// Historical candles. `query` has already been clamped.
    pub async fn historical(
        &self,
        instrument: &str,
        query: &CandleQuery,
    ) -> Result<Vec<Value>, GatewayError> {
        const OP: &str = "get_historical_data";

        require_non_empty(OP, "instrument", instrument)?;

        self.broker
            .candles(instrument, query)
            .await
            .map_err(|e| failed(OP, e.into()))
    }

    /// Validate and place a market or limit order.
    pub async fn place_order(
        &self,
        kind: OrderKind,
        request: OrderRequest,
    ) -> Result<Value, GatewayError> {
        let op = match kind {
            OrderKind::Market => "place_market_order",
            OrderKind::Limit => "place_limit_order",
        };

        let payload = request
            .into_payload(kind)
            .map_err(|e| failed(op, e.into()))?;

        self.broker
            .create_order(&payload)
            .await
            .map_err(|e| failed(op, e.into()))
    }

    /// Cancel a pending order.
    pub async fn cancel_order(&self, order_id: &str) -> Result<Value, GatewayError> {
        const OP: &str = "cancel_order";

        require_non_empty(OP, "order_id", order_id)?;

        self.broker
            .cancel_order(order_id)
            .await
            .map_err(|e| failed(OP, e.into()))
    }

    /// Close a position; see [`CloseUnits`] for the `units` convention.
    pub async fn close_position(
        &self,
        instrument: &str,
        units: &str,
    ) -> Result<Value, GatewayError> {
        const OP: &str = "close_position";

        require_non_empty(OP, "instrument", instrument)?;

        let request = units
            .parse::<CloseUnits>()
            .map_err(|e| failed(OP, e.into()))?
            .to_request();

        self.broker
            .close_position(instrument, &request)
            .await
            .map_err(|e| failed(OP, e.into()))
    }
}

fn require_non_empty(op: &'static str, field: &str, value: &str) -> Result<(), GatewayError> {
    if value.trim().is_empty() {
        return Err(failed(
            op,
            GatewayError::InvalidRequest(format!("{field} must not be empty")),
        ));
    }
    Ok(())
}

/// Log a failed operation and hand the error back.
fn failed(op: &'static str, err: GatewayError) -> GatewayError {
    match &err {
        GatewayError::InvalidRequest(_) => {
            tracing::warn!(operation = op, error = %err, "Rejected request");
        }
        GatewayError::NotFound(_) => {
            tracing::warn!(operation = op, error = %err, "Resource not found");
        }
        GatewayError::Upstream(_) => {
            tracing::error!(operation = op, error = %err, "Oanda API error");
        }
        GatewayError::Internal(_) => {
            tracing::error!(operation = op, error = %err, "Unexpected error");
        }
    }
    err
}
