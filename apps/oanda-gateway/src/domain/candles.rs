//! Historical candle queries.

use serde::{Deserialize, Serialize};

/// Candle granularity used when the caller gives none (daily).
pub const DEFAULT_GRANULARITY: &str = "D";

/// Candle count used when the caller gives none.
pub const DEFAULT_CANDLE_COUNT: u32 = 100;

/// Largest candle count forwarded to the broker.
pub const MAX_CANDLE_COUNT: u32 = 5000;

/// Query forwarded to the broker's candle endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandleQuery {
    /// Candle bucket size, e.g. `D`, `H1`, `M5`.
    pub granularity: String,
    /// Number of candles, never above [`MAX_CANDLE_COUNT`].
    pub count: u32,
}

impl CandleQuery {
    /// Apply defaults and silently clamp `count`.
    #[must_use]
    pub fn new(granularity: Option<String>, count: Option<u64>) -> Self {
        let count = count
            .unwrap_or(u64::from(DEFAULT_CANDLE_COUNT))
            .min(u64::from(MAX_CANDLE_COUNT));
        Self {
            granularity: granularity.unwrap_or_else(|| DEFAULT_GRANULARITY.to_string()),
            count: u32::try_from(count).unwrap_or(MAX_CANDLE_COUNT),
        }
    }
}

impl Default for CandleQuery {
    fn default() -> Self {
        Self::new(None, None)
    }
}
