//! Gateway Configuration Settings
//!
//! Configuration types for the gateway, loaded from environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use crate::infrastructure::broker::{OandaConfig, OandaEnvironment};

/// Default request timeout for outbound broker calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// OANDA API credentials.
#[derive(Clone)]
pub struct Credentials {
    api_token: String,
    account_id: String,
}

impl Credentials {
    /// Create new credentials.
    #[must_use]
    pub const fn new(api_token: String, account_id: String) -> Self {
        Self {
            api_token,
            account_id,
        }
    }

    /// Get the API token.
    #[must_use]
    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    /// Get the account id.
    #[must_use]
    pub fn account_id(&self) -> &str {
        &self.account_id
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_token", &"[REDACTED]")
            .field("account_id", &self.account_id)
            .finish()
    }
}

/// Listener settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Bind address.
    pub host: IpAddr,
    /// HTTP port.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
        }
    }
}

impl ServerSettings {
    /// Socket address to bind.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Complete gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Trading environment.
    pub environment: OandaEnvironment,
    /// API credentials.
    pub credentials: Credentials,
    /// Listener settings.
    pub server: ServerSettings,
    /// Outbound request timeout.
    pub timeout: Duration,
    /// REST base URL override.
    pub base_url: Option<String>,
}

impl GatewayConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a credential is missing or empty, or if
    /// `OANDA_ENVIRONMENT` names an unknown environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`GatewayConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_token = required(&lookup, "OANDA_API_KEY")?;
        let account_id = required(&lookup, "OANDA_ACCOUNT_ID")?;

        let environment = match lookup("OANDA_ENVIRONMENT") {
            Some(value) => value
                .parse::<OandaEnvironment>()
                .map_err(|e| ConfigError::InvalidEnvironment(e.0))?,
            None => OandaEnvironment::default(),
        };

        let defaults = ServerSettings::default();
        let server = ServerSettings {
            host: parse_env(&lookup, "HOST", defaults.host),
            port: parse_env(&lookup, "PORT", defaults.port),
        };

        let timeout = parse_env_duration_secs(&lookup, "OANDA_TIMEOUT_SECS", DEFAULT_TIMEOUT);

        let base_url = lookup("OANDA_BASE_URL").filter(|url| !url.trim().is_empty());

        Ok(Self {
            environment,
            credentials: Credentials::new(api_token, account_id),
            server,
            timeout,
            base_url,
        })
    }

    /// Build the broker adapter configuration.
    #[must_use]
    pub fn to_oanda_config(&self) -> OandaConfig {
        let config = OandaConfig::new(
            self.credentials.api_token().to_string(),
            self.credentials.account_id().to_string(),
            self.environment,
        )
        .with_timeout(self.timeout);

        match &self.base_url {
            Some(url) => config.with_base_url(url.clone()),
            None => config,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
    /// `OANDA_ENVIRONMENT` is neither practice nor live.
    #[error("OANDA_ENVIRONMENT must be 'practice' or 'live', got '{0}'")]
    InvalidEnvironment(String),
}

fn required<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))?;
    if value.trim().is_empty() {
        return Err(ConfigError::EmptyValue(key.to_string()));
    }
    Ok(value)
}

fn parse_env<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_env_duration_secs<F>(lookup: &F, key: &str, default: Duration) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map_or(default, Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<GatewayConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        GatewayConfig::from_lookup(|key| vars.get(key).cloned())
    }

    const CREDS: [(&str, &str); 2] = [
        ("OANDA_API_KEY", "token-abc"),
        ("OANDA_ACCOUNT_ID", "101-004-1-001"),
    ];

    #[test]
    fn defaults() {
        let config = config_from(&CREDS).unwrap();
        assert_eq!(config.environment, OandaEnvironment::Practice);
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.socket_addr().to_string(), "0.0.0.0:8000");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.base_url.is_none());
    }

    #[test]
    fn missing_api_key() {
        let err = config_from(&[("OANDA_ACCOUNT_ID", "101")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "OANDA_API_KEY"));
    }

    #[test]
    fn missing_account_id() {
        let err = config_from(&[("OANDA_API_KEY", "token")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "OANDA_ACCOUNT_ID"));
    }

    #[test]
    fn empty_credential() {
        let err = config_from(&[("OANDA_API_KEY", ""), ("OANDA_ACCOUNT_ID", "101")]).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyValue(ref k) if k == "OANDA_API_KEY"));
    }

    #[test]
    fn live_environment() {
        let mut vars = CREDS.to_vec();
        vars.push(("OANDA_ENVIRONMENT", "Live"));
        let config = config_from(&vars).unwrap();
        assert!(config.environment.is_live());
        assert_eq!(
            config.to_oanda_config().rest_base_url(),
            "https://api-fxtrade.oanda.com"
        );
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let mut vars = CREDS.to_vec();
        vars.push(("OANDA_ENVIRONMENT", "sandbox"));
        let err = config_from(&vars).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvironment(ref v) if v == "sandbox"));
    }

    #[test]
    fn overrides() {
        let mut vars = CREDS.to_vec();
        vars.extend([
            ("HOST", "127.0.0.1"),
            ("PORT", "9100"),
            ("OANDA_TIMEOUT_SECS", "5"),
            ("OANDA_BASE_URL", "http://localhost:8080"),
        ]);
        let config = config_from(&vars).unwrap();
        assert_eq!(config.server.socket_addr().to_string(), "127.0.0.1:9100");

        let oanda = config.to_oanda_config();
        assert_eq!(oanda.timeout, Duration::from_secs(5));
        assert_eq!(oanda.rest_base_url(), "http://localhost:8080");
        assert_eq!(oanda.account_id, "101-004-1-001");
    }

    #[test]
    fn unparsable_values_fall_back() {
        let mut vars = CREDS.to_vec();
        vars.extend([("PORT", "eighty"), ("OANDA_TIMEOUT_SECS", "0")]);
        let config = config_from(&vars).unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn credentials_redacted_debug() {
        let config = config_from(&CREDS).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("token-abc"));
        assert!(debug.contains("[REDACTED]"));
    }
}
