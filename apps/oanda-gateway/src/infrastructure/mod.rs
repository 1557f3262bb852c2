//! Infrastructure Layer - Adapters and external integrations.
//!
//! This layer contains the concrete implementations of the port interfaces
//! defined in the application layer.

/// OANDA v20 REST adapter.
pub mod broker;

/// Configuration loaded from the environment.
pub mod config;

/// HTTP/JSON API server.
pub mod http;

/// Logging and OpenTelemetry tracing.
pub mod telemetry;
