//! Failure taxonomy for backend calls.
//!
//! Every error is terminal at the caller boundary: it is surfaced to the
//! user and nothing retries automatically. A non-2xx status or an envelope
//! with `status != "success"` is a recoverable, user-facing error, never a
//! panic.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Request never completed (DNS, connect, TLS, body read). Rendered
    /// generically; the transport detail is kept as the source.
    #[error("network error, try again")]
    Network(#[source] reqwest::Error),

    /// The backend rejected the request with a message of its own, either
    /// via a non-2xx JSON body or a 2xx envelope with `status != "success"`.
    /// The message is surfaced verbatim.
    #[error("{message}")]
    Backend { message: String },

    /// Non-2xx response whose body carried no parseable `message` field.
    #[error("server returned {status}")]
    Status { status: u16 },

    /// Client-side validation failure, raised before any network call and
    /// surfaced inline next to the offending field.
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// A 2xx response whose body did not match the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// True when the error came from the backend itself (as opposed to the
    /// transport or this client), meaning its message is safe to display
    /// verbatim.
    pub fn is_backend_rejection(&self) -> bool {
        matches!(self, Self::Backend { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message_is_verbatim() {
        let err = ApiError::backend("Slot no longer available");
        assert_eq!(err.to_string(), "Slot no longer available");
        assert!(err.is_backend_rejection());
    }

    #[test]
    fn test_status_fallback_wording() {
        let err = ApiError::Status { status: 502 };
        assert_eq!(err.to_string(), "server returned 502");
    }

    #[test]
    fn test_validation_names_field() {
        let err = ApiError::validation("date", "required");
        assert_eq!(err.to_string(), "date: required");
        assert!(!err.is_backend_rejection());
    }
}
