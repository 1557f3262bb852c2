//! Query-string parameters.

use serde::{Deserialize, Deserializer, de};

use crate::domain::CandleQuery;
use crate::domain::position::CLOSE_ALL;

/// `GET /historical/{instrument}` query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoricalParams {
    /// Candle granularity, default `D`.
    #[serde(default)]
    pub granularity: Option<String>,
    /// Candle count, default 100. Oversized values saturate; anything that
    /// is not a non-negative integer is rejected by the extractor.
    #[serde(default, deserialize_with = "saturating_count")]
    pub count: Option<u64>,
}

fn saturating_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_count(&raw).map(Some).map_err(de::Error::custom)
}

fn parse_count(raw: &str) -> Result<u64, String> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("invalid count: {raw}"));
    }
    // All digits, so the only possible failure is overflow.
    Ok(digits.parse().unwrap_or(u64::MAX))
}

impl From<HistoricalParams> for CandleQuery {
    fn from(params: HistoricalParams) -> Self {
        Self::new(params.granularity, params.count)
    }
}

/// `POST /position/close/{instrument}` query.
#[derive(Debug, Clone, Deserialize)]
pub struct CloseParams {
    /// `ALL` or a signed integer.
    #[serde(default = "close_all")]
    pub units: String,
}

fn close_all() -> String {
    CLOSE_ALL.to_string()
}
