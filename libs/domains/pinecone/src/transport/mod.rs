//! One HTTP round trip per call.
//!
//! Services only see the [`Transport`] trait so tests can swap in a mock and
//! assert on the exact method, path and body that would go over the wire.

mod http;

use async_trait::async_trait;
pub use reqwest::Method;
use serde_json::Value;

pub use http::HttpTransport;

use crate::error::PineconeResult;

/// Decoded JSON response body. Empty bodies decode to an empty object.
pub type JsonObject = serde_json::Map<String, Value>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform exactly one request.
    ///
    /// `path` is either an absolute URL or relative to the transport's base
    /// endpoint, and may carry a query string. `body` is sent as JSON when
    /// present.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> PineconeResult<JsonObject>;
}
