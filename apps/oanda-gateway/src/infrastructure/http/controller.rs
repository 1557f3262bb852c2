//! HTTP/JSON API server implementation.
//!
//! Thin axum handlers over [`TradingGateway`]. Each handler extracts its
//! input, calls one gateway method and wraps the result in an envelope.

use std::any::Any;
use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::request::{CloseParams, HistoricalParams};
use super::response::{
    ApiError, CandlesData, DataResponse, ErrorResponse, HealthResponse, ListResponse,
    RootResponse,
};
use crate::application::{BrokerPort, TradingGateway};
use crate::domain::{AccountSummary, CandleQuery, OrderKind, OrderRequest, Quote};

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Method and path of every route, in registration order.
pub const ROUTES: [(&str, &str); 11] = [
    ("GET", "/"),
    ("GET", "/health"),
    ("GET", "/account"),
    ("GET", "/positions"),
    ("GET", "/orders"),
    ("GET", "/price/{instrument}"),
    ("GET", "/historical/{instrument}"),
    ("POST", "/order/market"),
    ("POST", "/order/limit"),
    ("DELETE", "/order/{order_id}"),
    ("POST", "/position/close/{instrument}"),
];

/// Shared state for the HTTP server.
pub struct AppState<B: BrokerPort> {
    gateway: Arc<TradingGateway<B>>,
}

impl<B: BrokerPort> AppState<B> {
    /// Create state around a gateway.
    #[must_use]
    pub fn new(gateway: TradingGateway<B>) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }
}

impl<B: BrokerPort> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
        }
    }
}

/// Create the Axum router with all endpoints.
#[must_use]
pub fn create_router<B: BrokerPort + 'static>(state: AppState<B>) -> Router {
    Router::new()
        .route("/", get(root::<B>))
        .route("/health", get(health::<B>))
        .route("/account", get(account::<B>))
        .route("/positions", get(positions::<B>))
        .route("/orders", get(orders::<B>))
        .route("/price/{instrument}", get(price::<B>))
        .route("/historical/{instrument}", get(historical::<B>))
        .route("/order/market", post(market_order::<B>))
        .route("/order/limit", post(limit_order::<B>))
        .route("/order/{order_id}", delete(cancel_order::<B>))
        .route("/position/close/{instrument}", post(close_position::<B>))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
}

async fn root<B: BrokerPort>(State(state): State<AppState<B>>) -> Json<RootResponse> {
    Json(RootResponse {
        message: "OANDA gateway is running",
        environment: state.gateway.environment().to_string(),
        status: "healthy",
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

async fn health<B: BrokerPort>(State(state): State<AppState<B>>) -> Json<HealthResponse> {
    let gateway = &state.gateway;
    match gateway.probe().await {
        Ok(()) => Json(HealthResponse::healthy(
            gateway.account_id(),
            gateway.environment(),
        )),
        Err(e) => {
            tracing::warn!(error = %e, "Broker health probe failed");
            Json(HealthResponse::unhealthy(e.to_string()))
        }
    }
}

async fn account<B: BrokerPort>(
    State(state): State<AppState<B>>,
) -> ApiResult<DataResponse<AccountSummary>> {
    let summary = state.gateway.account().await?;
    Ok(Json(DataResponse::new(summary)))
}

async fn positions<B: BrokerPort>(State(state): State<AppState<B>>) -> ApiResult<ListResponse> {
    let positions = state.gateway.positions().await?;
    Ok(Json(ListResponse::new(positions)))
}

async fn orders<B: BrokerPort>(State(state): State<AppState<B>>) -> ApiResult<ListResponse> {
    let orders = state.gateway.orders().await?;
    Ok(Json(ListResponse::new(orders)))
}

async fn price<B: BrokerPort>(
    State(state): State<AppState<B>>,
    instrument: Result<Path<String>, PathRejection>,
) -> ApiResult<DataResponse<Quote>> {
    let Path(instrument) = instrument?;
    let quote = state.gateway.price(&instrument).await?;
    Ok(Json(DataResponse::new(quote)))
}

async fn historical<B: BrokerPort>(
    State(state): State<AppState<B>>,
    instrument: Result<Path<String>, PathRejection>,
    params: Result<Query<HistoricalParams>, QueryRejection>,
) -> ApiResult<DataResponse<CandlesData>> {
    let Path(instrument) = instrument?;
    let Query(params) = params?;
    let query = CandleQuery::from(params);

    let candles = state.gateway.historical(&instrument, &query).await?;

    Ok(Json(DataResponse::new(CandlesData {
        instrument,
        granularity: query.granularity,
        count: candles.len(),
        candles,
    })))
}

async fn market_order<B: BrokerPort>(
    State(state): State<AppState<B>>,
    body: Result<Json<OrderRequest>, JsonRejection>,
) -> ApiResult<DataResponse<serde_json::Value>> {
    let Json(request) = body?;
    let response = state.gateway.place_order(OrderKind::Market, request).await?;
    Ok(Json(DataResponse::new(response)))
}

async fn limit_order<B: BrokerPort>(
    State(state): State<AppState<B>>,
    body: Result<Json<OrderRequest>, JsonRejection>,
) -> ApiResult<DataResponse<serde_json::Value>> {
    let Json(request) = body?;
    let response = state.gateway.place_order(OrderKind::Limit, request).await?;
    Ok(Json(DataResponse::new(response)))
}

async fn cancel_order<B: BrokerPort>(
    State(state): State<AppState<B>>,
    order_id: Result<Path<String>, PathRejection>,
) -> ApiResult<DataResponse<serde_json::Value>> {
    let Path(order_id) = order_id?;
    let response = state.gateway.cancel_order(&order_id).await?;
    Ok(Json(DataResponse::new(response)))
}

async fn close_position<B: BrokerPort>(
    State(state): State<AppState<B>>,
    instrument: Result<Path<String>, PathRejection>,
    params: Result<Query<CloseParams>, QueryRejection>,
) -> ApiResult<DataResponse<serde_json::Value>> {
    let Path(instrument) = instrument?;
    let Query(params) = params?;
    let response = state
        .gateway
        .close_position(&instrument, &params.units)
        .await?;
    Ok(Json(DataResponse::new(response)))
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not Found")
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::new("Method Not Allowed")),
    )
        .into_response()
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(ToString::to_string))
        .unwrap_or_else(|| "handler panicked".to_string());

    tracing::error!(error = %detail, "Unhandled panic in request handler");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::internal(detail)),
    )
        .into_response()
}
