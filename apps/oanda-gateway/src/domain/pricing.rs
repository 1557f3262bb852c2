//! Best bid/ask quotes.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Placeholder emitted when the broker sends no bid or ask bucket.
pub const NOT_AVAILABLE: &str = "N/A";

/// One price row from the broker's pricing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPrice {
    /// Instrument the row is for.
    #[serde(default)]
    pub instrument: Option<String>,
    /// Bid ladder, best first.
    #[serde(default)]
    pub bids: Vec<PriceBucket>,
    /// Ask ladder, best first.
    #[serde(default)]
    pub asks: Vec<PriceBucket>,
    /// Quote time.
    #[serde(default)]
    pub time: Option<String>,
}

/// A single ladder level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBucket {
    /// Price as a decimal string.
    pub price: String,
}

/// A broker quote that cannot be turned into a [`Quote`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    /// A price that is not a decimal number.
    #[error("Could not parse quote price '{0}'")]
    Unparsable(String),

    /// `ask - bid` does not fit a decimal or an `f64`.
    #[error("Spread of ask '{ask}' and bid '{bid}' is out of range")]
    SpreadOutOfRange {
        /// Ask as sent by the broker.
        ask: String,
        /// Bid as sent by the broker.
        bid: String,
    },
}

/// Reshaped quote returned by `GET /price/{instrument}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Requested instrument.
    pub instrument: String,
    /// Best bid, or `N/A`.
    pub bid: String,
    /// Best ask, or `N/A`.
    pub ask: String,
    /// `ask - bid`. A missing side counts as zero.
    pub spread: f64,
    /// Broker quote time.
    pub time: Option<String>,
}

impl Quote {
    /// Build a quote from the first price row.
    pub fn from_price(instrument: &str, price: &ClientPrice) -> Result<Self, PricingError> {
        let bid = price.bids.first().map(|b| b.price.as_str());
        let ask = price.asks.first().map(|a| a.price.as_str());

        let bid_text = bid.unwrap_or(NOT_AVAILABLE).to_string();
        let ask_text = ask.unwrap_or(NOT_AVAILABLE).to_string();
        let out_of_range = || PricingError::SpreadOutOfRange {
            ask: ask_text.clone(),
            bid: bid_text.clone(),
        };

        let spread = parse_or_zero(ask)?
            .checked_sub(parse_or_zero(bid)?)
            .and_then(|spread| spread.to_f64())
            .ok_or_else(out_of_range)?;

        Ok(Self {
            instrument: instrument.to_string(),
            bid: bid_text,
            ask: ask_text,
            spread,
            time: price.time.clone(),
        })
    }
}

fn parse_or_zero(price: Option<&str>) -> Result<Decimal, PricingError> {
    price.map_or(Ok(Decimal::ZERO), |p| {
        Decimal::from_str(p.trim())
            .or_else(|_| Decimal::from_scientific(p.trim()))
            .map_err(|_| PricingError::Unparsable(p.to_string()))
    })
}
