//! OANDA v20 Broker Adapter
//!
//! Implementation of `BrokerPort` for the OANDA v20 REST API with:
//! - Bearer-token authenticated JSON calls
//! - Single-shot requests with a configurable timeout
//! - Environment-aware safety checks (practice vs live)

mod adapter;
mod api_types;
mod config;
mod error;
mod http_client;

pub use adapter::OandaBrokerAdapter;
pub use config::{OandaConfig, OandaEnvironment, UnknownEnvironment};
pub use error::OandaError;
