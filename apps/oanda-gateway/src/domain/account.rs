//! Account summary returned by `GET /account`.

use serde::{Deserialize, Serialize};

/// Balance, margin and exposure counts for the configured account.
///
/// Money fields keep the broker's decimal strings untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    /// Account id.
    pub id: String,
    /// Home currency.
    pub currency: String,
    /// Realized balance.
    pub balance: String,
    /// Net asset value (balance + unrealized P&L).
    pub nav: String,
    /// Unrealized profit/loss of open trades.
    pub unrealized_pl: String,
    /// Margin currently in use.
    pub margin_used: String,
    /// Margin available for new positions.
    pub margin_available: String,
    /// Account margin rate.
    pub margin_rate: String,
    /// Number of open trades.
    pub open_trade_count: u64,
    /// Number of open positions.
    pub open_position_count: u64,
    /// Number of pending orders.
    pub pending_order_count: u64,
}
