//! HTTP Server
//!
//! axum router, request parameters and response envelopes.

mod controller;
mod request;
mod response;

pub use controller::{AppState, ROUTES, create_router};
pub use request::{CloseParams, HistoricalParams};
pub use response::{
    ApiError, CandlesData, DataResponse, ErrorResponse, HealthResponse, ListResponse,
    RootResponse,
};
