//! Order placement requests.
//!
//! Inbound order bodies are loosely typed on the wire: `units` and prices may
//! arrive either as JSON strings or JSON numbers. They are carried as
//! [`WireScalar`] and always forwarded to the broker as strings.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A string-or-number value from a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireScalar {
    /// JSON string.
    Text(String),
    /// JSON number.
    Number(Number),
}

impl WireScalar {
    /// Whether the value counts as set: non-empty strings and non-zero numbers.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Text(s) => !s.is_empty(),
            Self::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        }
    }
}

impl fmt::Display for WireScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for WireScalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for WireScalar {
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

/// Order type accepted by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderKind {
    /// Fill immediately at the current market price.
    Market,
    /// Fill at `price` or better.
    Limit,
}

impl OrderKind {
    /// Broker-side order type name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Market => "MARKET",
            Self::Limit => "LIMIT",
        }
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failure for an order body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderValidationError {
    /// A required field was absent (or null).
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// Body of `POST /order/market` and `POST /order/limit`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Instrument to trade, e.g. `EUR_USD`.
    #[serde(default)]
    pub instrument: Option<String>,
    /// Signed units; negative sells.
    #[serde(default)]
    pub units: Option<WireScalar>,
    /// Limit price. Required for limit orders, ignored for market orders.
    #[serde(default)]
    pub price: Option<WireScalar>,
    /// Stop-loss price attached on fill.
    #[serde(default)]
    pub stop_loss: Option<WireScalar>,
    /// Take-profit price attached on fill.
    #[serde(default)]
    pub take_profit: Option<WireScalar>,
}

impl OrderRequest {
    /// Create a request with the two mandatory fields set.
    #[must_use]
    pub fn new(instrument: impl Into<String>, units: impl Into<WireScalar>) -> Self {
        Self {
            instrument: Some(instrument.into()),
            units: Some(units.into()),
            ..Self::default()
        }
    }

    /// Set the limit price.
    #[must_use]
    pub fn with_price(mut self, price: impl Into<WireScalar>) -> Self {
        self.price = Some(price.into());
        self
    }

    /// Set the stop-loss price.
    #[must_use]
    pub fn with_stop_loss(mut self, price: impl Into<WireScalar>) -> Self {
        self.stop_loss = Some(price.into());
        self
    }

    /// Set the take-profit price.
    #[must_use]
    pub fn with_take_profit(mut self, price: impl Into<WireScalar>) -> Self {
        self.take_profit = Some(price.into());
        self
    }

    /// Validate the request and build the broker payload.
    ///
    /// Required fields are checked in order (`instrument`, `units`, then
    /// `price` for limit orders) and the first missing one is reported.
    pub fn into_payload(self, kind: OrderKind) -> Result<OrderPayload, OrderValidationError> {
        let instrument = self
            .instrument
            .ok_or(OrderValidationError::MissingField("instrument"))?;
        let units = self
            .units
            .ok_or(OrderValidationError::MissingField("units"))?;

        let price = match kind {
            OrderKind::Market => None,
            OrderKind::Limit => Some(
                self.price
                    .ok_or(OrderValidationError::MissingField("price"))?
                    .to_string(),
            ),
        };

        Ok(OrderPayload {
            order: OrderSpec {
                order_type: kind,
                instrument,
                units: units.to_string(),
                price,
                stop_loss_on_fill: on_fill(self.stop_loss),
                take_profit_on_fill: on_fill(self.take_profit),
            },
        })
    }
}

fn on_fill(value: Option<WireScalar>) -> Option<PriceDetails> {
    value.filter(WireScalar::is_truthy).map(|v| PriceDetails {
        price: v.to_string(),
    })
}

/// Order-creation body sent to the broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPayload {
    /// The order specification.
    pub order: OrderSpec,
}

/// Broker order specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSpec {
    /// Order type.
    #[serde(rename = "type")]
    pub order_type: OrderKind,
    /// Instrument.
    pub instrument: String,
    /// Signed units as a string.
    pub units: String,
    /// Limit price, limit orders only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    /// Stop-loss created when the order fills.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss_on_fill: Option<PriceDetails>,
    /// Take-profit created when the order fills.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit_on_fill: Option<PriceDetails>,
}

/// Price wrapper used by on-fill dependent orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceDetails {
    /// Price as a string.
    pub price: String,
}
