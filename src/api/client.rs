use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ClientError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Shared HTTP client bound to the backend base URL.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("Carhop/{}", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: crate::config::sanitize_base_url(base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Core request function used by every endpoint wrapper.
    /// Returns the JSON body, or `ClientError::Backend` when the body is an
    /// object carrying an `error` field.
    pub async fn api_call(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        params: Option<Vec<(String, String)>>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!(%method, %url, ?params, ?body, "API request");

        let mut req = self.client.request(method.clone(), &url);
        if let Some(ref p) = params {
            if !p.is_empty() {
                req = req.query(p);
            }
        }
        if let Some(ref b) = body {
            req = req.json(b);
        }

        let resp = req.send().await.map_err(|e| {
            tracing::warn!(%e, %url, "API request failed");
            ClientError::from(e)
        })?;
        let status = resp.status();
        let text = resp.text().await?;
        let payload: Value = serde_json::from_str(&text).map_err(|e| {
            tracing::warn!(%e, %status, %url, "API response is not JSON");
            ClientError::Decode(format!("{} ({})", e, status))
        })?;
        tracing::debug!(%status, response = %payload, "API response");

        if let Some(message) = payload.get("error").and_then(|v| v.as_str()) {
            return Err(ClientError::Backend(message.to_string()));
        }
        Ok(payload)
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Vec<(String, String)>,
    ) -> Result<T> {
        let payload = self.api_call(Method::GET, endpoint, None, Some(params)).await?;
        Ok(serde_json::from_value(payload)?)
    }

    pub(crate) async fn post<T: DeserializeOwned>(&self, endpoint: &str, body: Value) -> Result<T> {
        let payload = self.api_call(Method::POST, endpoint, Some(body), None).await?;
        Ok(serde_json::from_value(payload)?)
    }
}
