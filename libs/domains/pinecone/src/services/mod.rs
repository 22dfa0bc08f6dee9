mod index;
mod vector;

pub use index::IndexService;
pub use vector::{NAMESPACE_EMPTY_MESSAGE, VectorService};

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{PineconeError, PineconeResult};
use crate::transport::{JsonObject, Method, Transport};
use crate::validation::SchemaValidator;

/// Validate → send → validate, shared by both services.
struct Pipeline<T: Transport> {
    transport: Arc<T>,
    validator: SchemaValidator,
}

impl<T: Transport> Pipeline<T> {
    fn new(transport: Arc<T>, validator: SchemaValidator) -> Self {
        Self {
            transport,
            validator,
        }
    }

    fn validator(&self) -> &SchemaValidator {
        &self.validator
    }

    /// Encode a request struct and check it against `schema`.
    fn prepare<S: Serialize>(&self, request: &S, schema: &str) -> PineconeResult<Value> {
        let payload = encode(request)?;
        self.validator.validate(&payload, schema, None)?;
        Ok(payload)
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        response_schema: &str,
    ) -> PineconeResult<JsonObject> {
        debug!(%method, path, response_schema, "Dispatching validated request");
        let response = self.transport.send(method, path, body).await?;
        self.validator.validate(&response, response_schema, None)?;
        Ok(response)
    }
}

fn encode<S: Serialize>(request: &S) -> PineconeResult<Value> {
    serde_json::to_value(request).map_err(|e| {
        PineconeError::ValidationFailed(format!("Failed to encode data to JSON: {}", e))
    })
}

/// `key=value&key=value` with values form-urlencoded, in the given order.
fn query_string<'a>(pairs: impl IntoIterator<Item = (&'a str, String)>) -> String {
    pairs
        .into_iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn with_query(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}

/// Treat blank optional strings as absent.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
