//! v20 REST API response envelopes.
//!
//! Only the fields the gateway reshapes are typed; list items and
//! transaction responses are passed through as raw JSON.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{AccountSummary, ClientPrice};

/// Error body returned with non-2xx statuses. Other fields such as
/// `errorCode` are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V20ErrorResponse {
    /// Human-readable error.
    #[serde(default)]
    pub error_message: Option<String>,
}

/// `GET /v3/accounts/{id}` response.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountEnvelope {
    /// Full account object.
    pub account: V20Account,
}

/// Subset of the v20 `Account` object.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V20Account {
    /// Account id.
    pub id: String,
    /// Home currency.
    pub currency: String,
    /// Balance.
    pub balance: String,
    /// Net asset value.
    #[serde(rename = "NAV")]
    pub nav: String,
    /// Unrealized P&L.
    #[serde(rename = "unrealizedPL")]
    pub unrealized_pl: String,
    /// Margin used.
    pub margin_used: String,
    /// Margin available.
    pub margin_available: String,
    /// Margin rate.
    pub margin_rate: String,
    /// Open trades.
    pub open_trade_count: u64,
    /// Open positions.
    pub open_position_count: u64,
    /// Pending orders.
    pub pending_order_count: u64,
}

impl From<V20Account> for AccountSummary {
    fn from(account: V20Account) -> Self {
        Self {
            id: account.id,
            currency: account.currency,
            balance: account.balance,
            nav: account.nav,
            unrealized_pl: account.unrealized_pl,
            margin_used: account.margin_used,
            margin_available: account.margin_available,
            margin_rate: account.margin_rate,
            open_trade_count: account.open_trade_count,
            open_position_count: account.open_position_count,
            pending_order_count: account.pending_order_count,
        }
    }
}

/// `GET /v3/accounts/{id}/openPositions` response.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionsEnvelope {
    /// Open positions.
    #[serde(default)]
    pub positions: Vec<Value>,
}

/// `GET /v3/accounts/{id}/orders` response.
#[derive(Debug, Clone, Deserialize)]
pub struct OrdersEnvelope {
    /// Pending orders.
    #[serde(default)]
    pub orders: Vec<Value>,
}

/// `GET /v3/accounts/{id}/pricing` response.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingEnvelope {
    /// One row per requested instrument.
    #[serde(default)]
    pub prices: Vec<ClientPrice>,
}

/// `GET /v3/instruments/{instrument}/candles` response.
#[derive(Debug, Clone, Deserialize)]
pub struct CandlesEnvelope {
    /// Candles, oldest first.
    #[serde(default)]
    pub candles: Vec<Value>,
}
