//! HTTP-specific error types.
//!
//! - [`HttpResponseError`]: non-2xx responses from the API
//! - [`MaxHttpRetriesExceededError`]: retry attempts exhausted on 429/500
//! - [`InvalidHttpRequestError`]: a request failed validation before sending
//! - [`HttpError`]: the unified transport error
//!
//! # Example
//!
//! ```rust,ignore
//! use rest_connection::clients::HttpError;
//!
//! match client.request(request).await {
//!     Ok(response) => println!("Status: {}", response.code),
//!     Err(HttpError::Response(e)) => println!("API error {}: {}", e.code, e.message),
//!     Err(HttpError::MaxRetries(e)) => println!("Gave up after {} tries", e.tries),
//!     Err(HttpError::InvalidRequest(e)) => println!("Invalid request: {e}"),
//!     Err(HttpError::Network(e)) => println!("Network error: {e}"),
//! }
//! ```

use thiserror::Error;

/// Error returned when a request receives a non-successful response.
///
/// The message holds the `errors`, `error`, `message` and `error_description`
/// fields of the response body serialized as JSON, when present.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Serialized error message in JSON format.
    pub message: String,
    /// Reference ID for error reporting (from the `X-Request-Id` header).
    pub error_reference: Option<String>,
}

/// Error returned when retry attempts are exhausted.
#[derive(Debug, Error)]
#[error("Exceeded maximum retry count of {tries}. Last message: {message}")]
pub struct MaxHttpRetriesExceededError {
    /// The HTTP status code of the last response.
    pub code: u16,
    /// The number of tries that were attempted.
    pub tries: u32,
    /// Serialized error message from the last response.
    pub message: String,
    /// Reference ID for error reporting (from the `X-Request-Id` header).
    pub error_reference: Option<String>,
}

/// Error returned when a request fails validation before being sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A request body was provided without specifying the body type.
    #[error("Cannot set a body without also setting body_type.")]
    MissingBodyType,

    /// A POST or PUT request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// The request was configured with zero attempts.
    #[error("A request must be attempted at least once.")]
    ZeroTries,
}

/// Unified error type for transport failures.
///
/// This is the `TransportError` of the resource layer: it is propagated to
/// the caller unchanged and never retried above the transport.
#[derive(Debug, Error)]
pub enum HttpError {
    /// An HTTP response error (non-2xx status code).
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Maximum retry attempts exhausted.
    #[error(transparent)]
    MaxRetries(#[from] MaxHttpRetriesExceededError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl HttpError {
    /// Returns the HTTP status code, if the failure carried one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.code),
            Self::MaxRetries(e) => Some(e.code),
            Self::InvalidRequest(_) | Self::Network(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_response_error_displays_message() {
        let error = HttpResponseError {
            code: 404,
            message: r#"{"error":"Not Found"}"#.to_string(),
            error_reference: None,
        };
        assert_eq!(error.to_string(), r#"{"error":"Not Found"}"#);
    }

    #[test]
    fn test_max_retries_error_includes_retry_count() {
        let error = MaxHttpRetriesExceededError {
            code: 429,
            tries: 3,
            message: r#"{"error":"Rate limited"}"#.to_string(),
            error_reference: None,
        };
        let message = error.to_string();
        assert!(message.contains('3'));
        assert!(message.contains("Exceeded maximum retry count"));
    }

    #[test]
    fn test_invalid_request_error_messages() {
        assert_eq!(
            InvalidHttpRequestError::MissingBody {
                method: "post".to_string()
            }
            .to_string(),
            "Cannot use post without specifying data."
        );
        assert_eq!(
            InvalidHttpRequestError::MissingBodyType.to_string(),
            "Cannot set a body without also setting body_type."
        );
    }

    #[test]
    fn test_status_is_exposed_for_response_errors() {
        let error = HttpError::Response(HttpResponseError {
            code: 503,
            message: "{}".to_string(),
            error_reference: None,
        });
        assert_eq!(error.status(), Some(503));

        let error = HttpError::InvalidRequest(InvalidHttpRequestError::ZeroTries);
        assert_eq!(error.status(), None);
    }
}
