//! v20 Adapter Integration Tests
//!
//! Full stack: router, gateway and the real v20 adapter pointed at a mock
//! OANDA server.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use oanda_gateway::{
    AppState, GatewayConfig, OandaBrokerAdapter, TradingGateway, create_router,
};

const ACCOUNT: &str = "101-004-7654321-001";

fn app(server: &MockServer, timeout_secs: &str) -> Router {
    let uri = server.uri();
    let config = GatewayConfig::from_lookup(|key| match key {
        "OANDA_API_KEY" => Some("integration-token".to_string()),
        "OANDA_ACCOUNT_ID" => Some(ACCOUNT.to_string()),
        "OANDA_BASE_URL" => Some(uri.clone()),
        "OANDA_TIMEOUT_SECS" => Some(timeout_secs.to_string()),
        _ => None,
    })
    .unwrap();

    let adapter = OandaBrokerAdapter::new(config.to_oanda_config()).unwrap();
    let gateway = TradingGateway::new(
        Arc::new(adapter),
        config.credentials.account_id(),
        config.environment.as_str(),
    );
    create_router(AppState::new(gateway))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn account_is_fetched_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v3/accounts/{ACCOUNT}")))
        .and(header("authorization", "Bearer integration-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "account": {
                "id": ACCOUNT,
                "currency": "EUR",
                "balance": "5000.0000",
                "NAV": "5012.3400",
                "unrealizedPL": "12.3400",
                "marginUsed": "100.0000",
                "marginAvailable": "4912.3400",
                "marginRate": "0.0333",
                "openTradeCount": 2,
                "openPositionCount": 1,
                "pendingOrderCount": 3
            },
            "lastTransactionID": "99"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = send(app(&server, "30"), get("/account")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "data": {
                "id": ACCOUNT,
                "currency": "EUR",
                "balance": "5000.0000",
                "nav": "5012.3400",
                "unrealized_pl": "12.3400",
                "margin_used": "100.0000",
                "margin_available": "4912.3400",
                "margin_rate": "0.0333",
                "open_trade_count": 2,
                "open_position_count": 1,
                "pending_order_count": 3
            }
        })
    );
}

#[tokio::test]
async fn close_position_puts_close_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("/v3/accounts/{ACCOUNT}/positions/USD_JPY/close")))
        .and(body_json(json!({"longUnits": "ALL", "shortUnits": "ALL"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"lastTransactionID": "100"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/position/close/USD_JPY")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(&server, "30"), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["lastTransactionID"], "100");
}

#[tokio::test]
async fn candles_query_reaches_broker() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/instruments/EUR_USD/candles"))
        .and(query_param("granularity", "M5"))
        .and(query_param("count", "5000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "instrument": "EUR_USD",
            "granularity": "M5",
            "candles": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = send(
        app(&server, "30"),
        get("/historical/EUR_USD?granularity=M5&count=6000"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 0);
}

#[tokio::test]
async fn broker_error_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/v3/accounts/{ACCOUNT}/orders")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errorMessage": "Invalid value specified for 'units'",
            "errorCode": "UNITS_INVALID"
        })))
        .mount(&server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/order/market")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"instrument": "EUR_USD", "units": "abc"}).to_string(),
        ))
        .unwrap();
    let (status, body) = send(app(&server, "30"), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["detail"],
        "Oanda API error: Invalid value specified for 'units'"
    );
}

#[tokio::test]
async fn slow_broker_times_out_as_500() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"orders": []}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let (status, body) = send(app(&server, "1"), get("/orders")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Internal error: Broker request timed out");
}
