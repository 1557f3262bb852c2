//! Position close requests.
//!
//! The `units` query parameter selects which side of a position is closed:
//! `ALL` closes both sides, a positive integer closes that many long units,
//! and any other integer closes `abs(units)` short units. Zero therefore maps
//! to `shortUnits: "0"`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Keyword closing both sides of a position.
pub const CLOSE_ALL: &str = "ALL";

/// Parsed `units` for a close request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseUnits {
    /// Close long and short exposure fully.
    All,
    /// Close long units. Holds the value exactly as the caller sent it.
    Long(String),
    /// Close short units. Holds the absolute value.
    Short(String),
}

/// Invalid `units` value for a close request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid units value '{0}': expected \"ALL\" or a signed integer")]
pub struct CloseUnitsError(pub String);

impl FromStr for CloseUnits {
    type Err = CloseUnitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == CLOSE_ALL {
            return Ok(Self::All);
        }

        let units: i64 = s
            .trim()
            .parse()
            .map_err(|_| CloseUnitsError(s.to_string()))?;

        if units > 0 {
            Ok(Self::Long(s.to_string()))
        } else {
            Ok(Self::Short(units.unsigned_abs().to_string()))
        }
    }
}

impl CloseUnits {
    /// Build the broker close body.
    #[must_use]
    pub fn to_request(&self) -> PositionCloseRequest {
        match self {
            Self::All => PositionCloseRequest {
                long_units: Some(CLOSE_ALL.to_string()),
                short_units: Some(CLOSE_ALL.to_string()),
            },
            Self::Long(units) => PositionCloseRequest {
                long_units: Some(units.clone()),
                short_units: None,
            },
            Self::Short(units) => PositionCloseRequest {
                long_units: None,
                short_units: Some(units.clone()),
            },
        }
    }
}

/// Close body sent to the broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionCloseRequest {
    /// Long units to close.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_units: Option<String>,
    /// Short units to close.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_units: Option<String>,
}
