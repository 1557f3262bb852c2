//! HTTP client wrapper for the v20 REST API.
//!
//! Every call is sent once. Non-2xx responses become [`OandaError::Api`]
//! carrying the body's `errorMessage`.

use reqwest::{Client, Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::api_types::V20ErrorResponse;
use super::config::OandaConfig;
use super::error::OandaError;

/// HTTP client for the v20 REST API.
#[derive(Debug, Clone)]
pub struct OandaHttpClient {
    client: Client,
    api_token: String,
    base_url: Url,
}

impl OandaHttpClient {
    /// Create a new HTTP client from config.
    pub fn new(config: &OandaConfig) -> Result<Self, OandaError> {
        if config.api_token.is_empty() {
            return Err(OandaError::MissingCredentials);
        }

        let base_url = Url::parse(config.rest_base_url())
            .map_err(|e| OandaError::InvalidUrl(format!("{}: {e}", config.rest_base_url())))?;
        if base_url.cannot_be_a_base() {
            return Err(OandaError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OandaError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_token: config.api_token.clone(),
            base_url,
        })
    }

    /// Make a GET request. `segments` are percent-encoded path segments.
    pub async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T, OandaError> {
        let mut url = self.endpoint(segments)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        self.request(Method::GET, url, None::<&()>).await
    }

    /// Make a POST request with a JSON body.
    pub async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, OandaError> {
        let url = self.endpoint(segments)?;
        self.request(Method::POST, url, Some(body)).await
    }

    /// Make a PUT request with an optional JSON body.
    pub async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<T, OandaError> {
        let url = self.endpoint(segments)?;
        self.request(Method::PUT, url, body).await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, OandaError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| OandaError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn request<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<T, OandaError> {
        tracing::debug!(%method, path = url.path(), "Sending request to OANDA");

        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .bearer_auth(&self.api_token);
        if let Some(b) = body {
            request = request.json(b);
        }

        let response = request
            .send()
            .await
            .map_err(|e| OandaError::from_transport(&e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| OandaError::from_transport(&e))?;

        if status.is_success() {
            let text = if text.is_empty() { "null" } else { &text };
            return serde_json::from_str(text).map_err(|e| OandaError::JsonParse(e.to_string()));
        }

        let message = serde_json::from_str::<V20ErrorResponse>(&text)
            .ok()
            .and_then(|err| err.error_message)
            .unwrap_or(text);

        tracing::debug!(
            %method,
            path = url.path(),
            status = status.as_u16(),
            message = %message,
            "OANDA returned an error"
        );

        Err(OandaError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
