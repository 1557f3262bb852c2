//! Application Layer
//!
//! Use cases and the ports they depend on.

pub mod error;
pub mod gateway;
pub mod ports;

pub use error::GatewayError;
pub use gateway::TradingGateway;
pub use ports::{BrokerError, BrokerPort};
