//! Typed REST client over the platform backend.
//!
//! One `Backend` is shared per session. It carries a cookie store so the
//! session credential set by `/user-session` rides along on every call,
//! and it applies the platform's response envelope uniformly: bodies are
//! `{status: "success", ...}` or an error body with `message`, and any
//! non-2xx or `status != "success"` becomes a user-facing [`ApiError`],
//! never a panic.

pub mod admin;
pub mod appointments;
pub mod catalog;
pub mod checkout;
pub mod payments;
pub mod session;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct Backend {
    client: Client,
    base_url: Url,
    image_timeout: Duration,
}

impl Backend {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("invalid base_url: {}", config.base_url))?;

        // Cookie store on: the backend uses cookie-based session
        // credentials on every call. No default timeout; only the image
        // path sets one.
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url,
            image_timeout: Duration::from_secs(config.image_timeout_secs),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn image_timeout(&self) -> Duration {
        self.image_timeout
    }

    pub(crate) fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Malformed(format!("bad request path {path}: {e}")))
    }

    /// GET `path` and unwrap the response envelope.
    pub(crate) async fn get_envelope(&self, path: &str) -> Result<Value, ApiError> {
        let url = self.url(path)?;
        debug!(%url, "backend GET");
        self.execute(self.client.get(url)).await
    }

    /// GET `path?query` and unwrap the response envelope.
    pub(crate) async fn get_envelope_query(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value, ApiError> {
        let url = self.url(path)?;
        debug!(%url, ?query, "backend GET");
        self.execute(self.client.get(url).query(query)).await
    }

    /// POST a JSON body to `path` and unwrap the response envelope.
    pub(crate) async fn post_envelope<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        let url = self.url(path)?;
        debug!(%url, "backend POST");
        self.execute(self.client.post(url).json(body)).await
    }

    /// POST with no body (session probe and similar).
    pub(crate) async fn post_envelope_empty(&self, path: &str) -> Result<Value, ApiError> {
        let url = self.url(path)?;
        debug!(%url, "backend POST");
        self.execute(self.client.post(url)).await
    }

    pub(crate) async fn put_envelope<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        let url = self.url(path)?;
        debug!(%url, "backend PUT");
        self.execute(self.client.put(url).json(body)).await
    }

    pub(crate) async fn delete_envelope(&self, path: &str) -> Result<Value, ApiError> {
        let url = self.url(path)?;
        debug!(%url, "backend DELETE");
        self.execute(self.client.delete(url)).await
    }

    /// Raw GET returning bytes, with the explicit image timeout. Used only
    /// by the image path.
    pub(crate) fn raw_get(&self, url: Url, timeout: Duration) -> RequestBuilder {
        self.client.get(url).timeout(timeout)
    }

    /// Send the request and apply the envelope rules:
    /// - transport failure -> `Network` ("network error, try again")
    /// - non-2xx with a JSON `message` -> `Backend` (message verbatim)
    /// - non-2xx otherwise -> `Status` ("server returned N")
    /// - 2xx with `status != "success"` -> `Backend`
    /// - unparseable 2xx body -> `Malformed`
    async fn execute(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let response = request.send().await.map_err(ApiError::Network)?;
        let status = response.status();

        if !status.is_success() {
            return Err(error_from_status(status, response.text().await.ok()));
        }

        let body: Value = response.json().await.map_err(|e| {
            if e.is_decode() {
                ApiError::Malformed(e.to_string())
            } else {
                ApiError::Network(e)
            }
        })?;

        if let Some(envelope_status) = body.get("status").and_then(Value::as_str) {
            if envelope_status != "success" {
                let message = body
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("request failed");
                debug!(envelope_status, message, "backend envelope rejection");
                return Err(ApiError::backend(message));
            }
        }

        Ok(body)
    }
}

fn error_from_status(status: StatusCode, body: Option<String>) -> ApiError {
    if let Some(body) = body {
        if let Ok(value) = serde_json::from_str::<Value>(&body) {
            if let Some(message) = value.get("message").and_then(Value::as_str) {
                return ApiError::backend(message);
            }
        }
    }
    ApiError::Status {
        status: status.as_u16(),
    }
}

/// Defensively coerce an optional JSON value into a typed list. A missing
/// or non-array value yields an empty list; elements that fail to parse
/// are dropped with a warning. This keeps a partially malformed response
/// from taking the whole view down.
pub(crate) fn coerce_array<T: DeserializeOwned>(value: Option<&Value>) -> Vec<T> {
    let items = match value {
        Some(Value::Array(items)) => items,
        Some(other) => {
            warn!(got = %json_kind(other), "expected array in response, coercing to empty");
            return Vec::new();
        }
        None => return Vec::new(),
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!(error = %e, "dropping malformed array element");
                None
            }
        })
        .collect()
}

/// Parse a required field out of an envelope, failing as `Malformed` when
/// absent or of the wrong shape.
pub(crate) fn required_field<T: DeserializeOwned>(body: &Value, key: &str) -> Result<T, ApiError> {
    let value = body
        .get(key)
        .ok_or_else(|| ApiError::Malformed(format!("missing field `{key}`")))?;
    serde_json::from_value(value.clone())
        .map_err(|e| ApiError::Malformed(format!("field `{key}`: {e}")))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_array_handles_missing_and_wrong_shape() {
        let empty: Vec<i64> = coerce_array(None);
        assert!(empty.is_empty());

        let not_array = json!({"oops": true});
        let coerced: Vec<i64> = coerce_array(Some(&not_array));
        assert!(coerced.is_empty());
    }

    #[test]
    fn test_coerce_array_drops_bad_elements() {
        let mixed = json!([1, "two", 3]);
        let parsed: Vec<i64> = coerce_array(Some(&mixed));
        assert_eq!(parsed, vec![1, 3]);
    }

    #[test]
    fn test_error_from_status_prefers_json_message() {
        let err = error_from_status(
            StatusCode::CONFLICT,
            Some(r#"{"status":"error","message":"Slot no longer available"}"#.to_string()),
        );
        assert_eq!(err.to_string(), "Slot no longer available");
    }

    #[test]
    fn test_error_from_status_falls_back_to_generic() {
        let err = error_from_status(StatusCode::BAD_GATEWAY, Some("<html>".to_string()));
        assert_eq!(err.to_string(), "server returned 502");
    }

    #[test]
    fn test_required_field_reports_missing() {
        let body = json!({"status": "success"});
        let err = required_field::<i64>(&body, "total").unwrap_err();
        assert!(matches!(err, ApiError::Malformed(_)));
    }
}
