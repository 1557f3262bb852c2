//! OANDA adapter configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// v20 trading environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OandaEnvironment {
    /// fxTrade Practice (demo money).
    #[default]
    Practice,
    /// fxTrade (real money).
    Live,
}

impl OandaEnvironment {
    /// Get the base URL for the v20 REST API.
    #[must_use]
    pub const fn rest_base_url(&self) -> &'static str {
        match self {
            Self::Practice => "https://api-fxpractice.oanda.com",
            Self::Live => "https://api-fxtrade.oanda.com",
        }
    }

    /// Check if this is live trading.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }

    /// Get the environment name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Practice => "practice",
            Self::Live => "live",
        }
    }
}

impl fmt::Display for OandaEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown environment name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown OANDA environment '{0}' (expected 'practice' or 'live')")]
pub struct UnknownEnvironment(pub String);

impl FromStr for OandaEnvironment {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "practice" => Ok(Self::Practice),
            "live" => Ok(Self::Live),
            _ => Err(UnknownEnvironment(s.to_string())),
        }
    }
}

/// Configuration for the OANDA broker adapter.
#[derive(Clone)]
pub struct OandaConfig {
    /// Personal access token.
    pub api_token: String,
    /// v20 account id.
    pub account_id: String,
    /// Trading environment.
    pub environment: OandaEnvironment,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// Base URL override, used instead of the environment's URL.
    pub base_url: Option<String>,
}

impl OandaConfig {
    /// Create a new configuration.
    #[must_use]
    pub fn new(api_token: String, account_id: String, environment: OandaEnvironment) -> Self {
        Self {
            api_token,
            account_id,
            environment,
            timeout: Duration::from_secs(30),
            base_url: None,
        }
    }

    /// Set the HTTP timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Point the client at a different REST host.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Get the effective REST base URL.
    #[must_use]
    pub fn rest_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.rest_base_url())
    }
}

impl fmt::Debug for OandaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OandaConfig")
            .field("api_token", &"[REDACTED]")
            .field("account_id", &self.account_id)
            .field("environment", &self.environment)
            .field("timeout", &self.timeout)
            .field("base_url", &self.base_url)
            .finish()
    }
}
