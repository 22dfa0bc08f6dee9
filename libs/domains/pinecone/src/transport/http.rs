use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tracing::{debug, error};

use super::{JsonObject, Transport};
use crate::config::PineconeConfig;
use crate::error::{PineconeError, PineconeResult};

const API_KEY_HEADER: &str = "Api-Key";
const API_VERSION_HEADER: &str = "X-Pinecone-API-Version";

/// reqwest-backed transport with headers fixed at construction
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Target `endpoint` when given, otherwise the config's control-plane
    /// environment URL.
    pub fn new(config: &PineconeConfig, endpoint: Option<&str>) -> PineconeResult<Self> {
        let base_url = endpoint.unwrap_or(config.environment()).to_string();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static("api-key"),
            header_value(API_KEY_HEADER, config.api_key())?,
        );
        headers.insert(
            HeaderName::from_static("x-pinecone-api-version"),
            header_value(API_VERSION_HEADER, config.api_version())?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs()))
            .build()
            .map_err(|e| PineconeError::Transport(format!("Failed to build client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Target the dedicated index host from `config.custom_endpoint()`.
    pub fn for_custom_endpoint(config: &PineconeConfig) -> PineconeResult<Self> {
        Self::new(config, Some(config.custom_endpoint()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn execute(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
    ) -> PineconeResult<JsonObject> {
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(PineconeError::Transport(status_message(status, &text)));
        }

        decode_body(&text)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> PineconeResult<JsonObject> {
        let url = self.url_for(path);
        debug!(%method, %url, has_body = body.is_some(), "Sending Pinecone request");

        self.execute(method.clone(), &url, body)
            .await
            .inspect_err(|e| error!(%method, %url, error = %e, "Pinecone request failed"))
    }
}

fn header_value(name: &str, value: &str) -> PineconeResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| PineconeError::Transport(format!("Invalid {} header value: {}", name, e)))
}

pub(crate) fn decode_body(text: &str) -> PineconeResult<JsonObject> {
    if text.trim().is_empty() {
        return Ok(JsonObject::new());
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(PineconeError::Transport(format!(
            "Invalid JSON response: expected an object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(PineconeError::Transport(format!("Invalid JSON response: {}", e))),
    }
}

/// Prefer the server's own error text (`{"error": {"message": ..}}` or
/// `{"message": ..}`) over the raw body.
fn status_message(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        v.pointer("/error/message")
            .or_else(|| v.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
    });

    match detail {
        Some(message) => format!("HTTP {}: {}", status, message),
        None if body.trim().is_empty() => format!("HTTP {}", status),
        None => format!("HTTP {}: {}", status, body.trim()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
