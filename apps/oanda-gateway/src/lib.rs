#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! OANDA Gateway - REST front end for the OANDA v20 trading API
//!
//! Every route validates its input, forwards exactly one call to the broker
//! and reshapes the answer into a `{success, data}` envelope. Nothing is
//! cached, retried or persisted.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Request validation and payload shaping
//!   - `order`: Market/limit order bodies and broker payloads
//!   - `position`: Close-units convention
//!   - `pricing`: Best bid/ask and spread
//!   - `candles`: Candle query defaults and clamp
//!
//! - **Application**: Use cases and port definitions
//!   - `ports`: `BrokerPort` and its error taxonomy
//!   - `gateway`: One use case per route
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `broker`: v20 REST client
//!   - `http`: axum router and envelopes
//!   - `config`: Environment configuration
//!   - `telemetry`: Logging and OTLP export
//!
//! # Data Flow
//!
//! ```text
//! HTTP request ──► extractor ──► TradingGateway ──► BrokerPort ──► v20 REST
//!                                      │
//! HTTP response ◄── envelope ◄─────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Validation and payload shaping with no I/O.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::{
    AccountSummary, CandleQuery, ClientPrice, CloseUnits, OrderKind, OrderPayload, OrderRequest,
    PositionCloseRequest, PriceBucket, Quote,
};

// Application
pub use application::{BrokerError, BrokerPort, GatewayError, TradingGateway};

// Broker adapter
pub use infrastructure::broker::{OandaBrokerAdapter, OandaConfig, OandaEnvironment, OandaError};

// Infrastructure config
pub use infrastructure::config::{ConfigError, Credentials, GatewayConfig, ServerSettings};

// HTTP server
pub use infrastructure::http::{AppState, ROUTES, create_router};

// Telemetry
pub use infrastructure::telemetry::{TelemetryConfig, TelemetryGuard, init as init_telemetry};
