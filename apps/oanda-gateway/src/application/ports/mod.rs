//! Application Ports
//!
//! Driven ports: how the gateway reaches external systems.

mod broker_port;

#[cfg(test)]
pub use broker_port::MockBrokerPort;
pub use broker_port::{BrokerError, BrokerPort};
