//! OANDA broker adapter implementing BrokerPort.

use async_trait::async_trait;
use serde_json::Value;

use crate::application::ports::{BrokerError, BrokerPort};
use crate::domain::{
    AccountSummary, CandleQuery, ClientPrice, OrderPayload, PositionCloseRequest,
};

use super::api_types::{
    AccountEnvelope, CandlesEnvelope, OrdersEnvelope, PositionsEnvelope, PricingEnvelope,
};
use super::config::{OandaConfig, OandaEnvironment};
use super::error::OandaError;
use super::http_client::OandaHttpClient;

const V3: &str = "v3";
const ACCOUNTS: &str = "accounts";

/// OANDA v20 broker adapter.
///
/// Bound to a single account for its whole lifetime.
#[derive(Debug, Clone)]
pub struct OandaBrokerAdapter {
    client: OandaHttpClient,
    account_id: String,
    environment: OandaEnvironment,
}

impl OandaBrokerAdapter {
    /// Create a new OANDA broker adapter.
    pub fn new(config: OandaConfig) -> Result<Self, OandaError> {
        let client = OandaHttpClient::new(&config)?;
        Ok(Self {
            client,
            account_id: config.account_id,
            environment: config.environment,
        })
    }

    /// Check if we're in live trading mode.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.environment.is_live()
    }

    /// Account id this adapter trades on.
    #[must_use]
    pub fn account_id(&self) -> &str {
        &self.account_id
    }
}

#[async_trait]
impl BrokerPort for OandaBrokerAdapter {
    async fn account_details(&self) -> Result<AccountSummary, BrokerError> {
        let envelope: AccountEnvelope = self
            .client
            .get(&[V3, ACCOUNTS, self.account_id.as_str()], &[])
            .await
            .map_err(BrokerError::from)?;

        Ok(envelope.account.into())
    }

    async fn open_positions(&self) -> Result<Vec<Value>, BrokerError> {
        let envelope: PositionsEnvelope = self
            .client
            .get(&[V3, ACCOUNTS, self.account_id.as_str(), "openPositions"], &[])
            .await
            .map_err(BrokerError::from)?;

        Ok(envelope.positions)
    }

    async fn pending_orders(&self) -> Result<Vec<Value>, BrokerError> {
        let envelope: OrdersEnvelope = self
            .client
            .get(&[V3, ACCOUNTS, self.account_id.as_str(), "orders"], &[])
            .await
            .map_err(BrokerError::from)?;

        Ok(envelope.orders)
    }

    async fn pricing(&self, instrument: &str) -> Result<Vec<ClientPrice>, BrokerError> {
        let envelope: PricingEnvelope = self
            .client
            .get(
                &[V3, ACCOUNTS, self.account_id.as_str(), "pricing"],
                &[("instruments", instrument)],
            )
            .await
            .map_err(BrokerError::from)?;

        Ok(envelope.prices)
    }

    async fn candles(
        &self,
        instrument: &str,
        query: &CandleQuery,
    ) -> Result<Vec<Value>, BrokerError> {
        let count = query.count.to_string();
        let envelope: CandlesEnvelope = self
            .client
            .get(
                &[V3, "instruments", instrument, "candles"],
                &[
                    ("granularity", query.granularity.as_str()),
                    ("count", count.as_str()),
                ],
            )
            .await
            .map_err(BrokerError::from)?;

        Ok(envelope.candles)
    }

    async fn create_order(&self, payload: &OrderPayload) -> Result<Value, BrokerError> {
        let order = &payload.order;

        if self.is_live() {
            tracing::warn!(
                instrument = %order.instrument,
                units = %order.units,
                "Submitting LIVE order - this will execute real trades"
            );
        }

        tracing::info!(
            instrument = %order.instrument,
            order_type = %order.order_type,
            units = %order.units,
            price = ?order.price,
            "Submitting order to OANDA"
        );

        let response: Value = self
            .client
            .post(&[V3, ACCOUNTS, self.account_id.as_str(), "orders"], payload)
            .await
            .map_err(BrokerError::from)?;

        tracing::info!(instrument = %order.instrument, "Order submitted");

        Ok(response)
    }

    async fn cancel_order(&self, order_id: &str) -> Result<Value, BrokerError> {
        tracing::info!(order_id, "Canceling order");

        self.client
            .put::<Value, ()>(
                &[V3, ACCOUNTS, self.account_id.as_str(), "orders", order_id, "cancel"],
                None,
            )
            .await
            .map_err(BrokerError::from)
    }

    async fn close_position(
        &self,
        instrument: &str,
        request: &PositionCloseRequest,
    ) -> Result<Value, BrokerError> {
        if self.is_live() {
            tracing::warn!(instrument, "Closing LIVE position");
        }

        tracing::info!(
            instrument,
            long_units = ?request.long_units,
            short_units = ?request.short_units,
            "Closing position"
        );

        self.client
            .put(
                &[V3, ACCOUNTS, self.account_id.as_str(), "positions", instrument, "close"],
                Some(request),
            )
            .await
            .map_err(BrokerError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::TradingGateway;
    use crate::domain::{CloseUnits, OrderKind, OrderRequest};
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ACCOUNT: &str = "101-004-1234567-001";

    fn adapter(server: &MockServer) -> OandaBrokerAdapter {
        let config = OandaConfig::new(
            "test-token".to_string(),
            ACCOUNT.to_string(),
            OandaEnvironment::Practice,
        )
        .with_base_url(server.uri());
        OandaBrokerAdapter::new(config).unwrap()
    }

    #[tokio::test]
    async fn account_details_reshapes_account() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/v3/accounts/{ACCOUNT}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "account": {
                    "id": ACCOUNT,
                    "currency": "USD",
                    "balance": "100000.0000",
                    "NAV": "100000.0000",
                    "unrealizedPL": "0.0000",
                    "marginUsed": "0.0000",
                    "marginAvailable": "100000.0000",
                    "marginRate": "0.02",
                    "openTradeCount": 0,
                    "openPositionCount": 0,
                    "pendingOrderCount": 0
                }
            })))
            .mount(&server)
            .await;

        let summary = adapter(&server).account_details().await.unwrap();
        assert_eq!(summary.id, ACCOUNT);
        assert_eq!(summary.margin_rate, "0.02");
    }

    #[tokio::test]
    async fn pricing_requests_single_instrument() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/v3/accounts/{ACCOUNT}/pricing")))
            .and(query_param("instruments", "EUR_USD"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "prices": [{
                    "instrument": "EUR_USD",
                    "bids": [{"price": "1.10000", "liquidity": 1_000_000}],
                    "asks": [{"price": "1.10020", "liquidity": 1_000_000}],
                    "time": "2024-01-02T10:00:00.000000000Z"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let prices = adapter(&server).pricing("EUR_USD").await.unwrap();
        assert_eq!(prices.len(), 1);
        assert_eq!(prices[0].bids[0].price, "1.10000");
    }

    #[tokio::test]
    async fn candles_forward_granularity_and_count() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/instruments/EUR_USD/candles"))
            .and(query_param("granularity", "H1"))
            .and(query_param("count", "5000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "instrument": "EUR_USD",
                "granularity": "H1",
                "candles": [{"time": "t0", "complete": true}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let query = CandleQuery::new(Some("H1".to_string()), Some(10_000));
        let candles = adapter(&server).candles("EUR_USD", &query).await.unwrap();
        assert_eq!(candles.len(), 1);
    }

    #[tokio::test]
    async fn create_order_posts_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/v3/accounts/{ACCOUNT}/orders")))
            .and(body_json(json!({
                "order": {
                    "type": "MARKET",
                    "instrument": "EUR_USD",
                    "units": "100",
                    "stopLossOnFill": {"price": "1.0950"}
                }
            })))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({"orderCreateTransaction": {"id": "6368"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let payload = OrderRequest::new("EUR_USD", 100)
            .with_stop_loss("1.0950")
            .into_payload(OrderKind::Market)
            .unwrap();

        let response = adapter(&server).create_order(&payload).await.unwrap();
        assert_eq!(response["orderCreateTransaction"]["id"], "6368");
    }

    #[tokio::test]
    async fn cancel_order_uses_put() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(format!("/v3/accounts/{ACCOUNT}/orders/6372/cancel")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"orderCancelTransaction": {"orderID": "6372"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let response = adapter(&server).cancel_order("6372").await.unwrap();
        assert_eq!(response["orderCancelTransaction"]["orderID"], "6372");
    }

    #[tokio::test]
    async fn close_position_sends_short_units() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(format!("/v3/accounts/{ACCOUNT}/positions/EUR_USD/close")))
            .and(body_json(json!({"shortUnits": "500"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let request = "-500".parse::<CloseUnits>().unwrap().to_request();
        let response = adapter(&server)
            .close_position("EUR_USD", &request)
            .await
            .unwrap();
        assert_eq!(response["ok"], true);
    }

    #[tokio::test]
    async fn broker_rejection_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "errorMessage": "Insufficient authorization to perform request."
            })))
            .mount(&server)
            .await;

        let err = adapter(&server).open_positions().await.unwrap_err();
        assert_eq!(
            err,
            BrokerError::Api {
                status: 401,
                message: "Insufficient authorization to perform request.".to_string(),
            }
        );
    }

    /// Collects the messages of this crate's `info` events.
    #[derive(Clone, Default)]
    struct InfoMessages(Arc<Mutex<Vec<String>>>);

    impl InfoMessages {
        fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.0.lock().unwrap())
        }
    }

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for InfoMessages {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            let meta = event.metadata();
            if *meta.level() != tracing::Level::INFO || !meta.target().starts_with("oanda_gateway")
            {
                return;
            }
            let mut visitor = MessageVisitor(String::new());
            event.record(&mut visitor);
            self.0.lock().unwrap().push(visitor.0);
        }
    }

    struct MessageVisitor(String);

    impl tracing::field::Visit for MessageVisitor {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{value:?}");
            }
        }
    }

    #[tokio::test]
    async fn order_and_close_are_logged_once_per_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/v3/accounts/{ACCOUNT}/orders")))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(format!("/v3/accounts/{ACCOUNT}/positions/EUR_USD/close")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let messages = InfoMessages::default();
        let _guard =
            tracing::subscriber::set_default(tracing_subscriber::registry().with(messages.clone()));
        let gateway = TradingGateway::new(Arc::new(adapter(&server)), ACCOUNT, "practice");

        gateway
            .place_order(OrderKind::Market, OrderRequest::new("EUR_USD", 100))
            .await
            .unwrap();
        assert_eq!(
            messages.take(),
            vec!["Submitting order to OANDA", "Order submitted"]
        );

        gateway.close_position("EUR_USD", "ALL").await.unwrap();
        assert_eq!(messages.take(), vec!["Closing position"]);

        gateway.cancel_order("6372").await.unwrap_err();
        assert_eq!(messages.take(), vec!["Canceling order"]);
    }

    #[test]
    fn practice_is_not_live() {
        let config = OandaConfig::new(
            "t".to_string(),
            ACCOUNT.to_string(),
            OandaEnvironment::Practice,
        );
        let adapter = OandaBrokerAdapter::new(config).unwrap();
        assert!(!adapter.is_live());
        assert_eq!(adapter.account_id(), ACCOUNT);
    }
}
