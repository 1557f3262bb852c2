//! Broker Adapters
//!
//! Implementations of `BrokerPort`.

pub mod oanda;

pub use oanda::{OandaBrokerAdapter, OandaConfig, OandaEnvironment, OandaError};
