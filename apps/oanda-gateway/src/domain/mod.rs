//! Domain Layer
//!
//! Request validation and payload shaping for the trading gateway. Nothing in
//! here performs I/O; every type is transient and lives for one request.

pub mod account;
pub mod candles;
pub mod order;
pub mod position;
pub mod pricing;

pub use account::AccountSummary;
pub use candles::{CandleQuery, DEFAULT_CANDLE_COUNT, DEFAULT_GRANULARITY, MAX_CANDLE_COUNT};
pub use order::{
    OrderKind, OrderPayload, OrderRequest, OrderSpec, OrderValidationError, PriceDetails,
    WireScalar,
};
pub use position::{CloseUnits, CloseUnitsError, PositionCloseRequest};
pub use pricing::{ClientPrice, PriceBucket, PricingError, Quote};
