//! Error types for resource operations.
//!
//! [`ResourceError`] is the single error type returned by the router and by
//! every resource operation. Transport and configuration failures are wrapped
//! transparently so callers can still match on them.
//!
//! # Example
//!
//! ```rust,ignore
//! use rest_connection::rest::ResourceError;
//!
//! match connection.select("ordres") {
//!     Ok(orders) => { /* ... */ }
//!     Err(ResourceError::UnknownResource { name, valid }) => {
//!         println!("{name} is not one of {valid:?}");
//!     }
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```

use crate::clients::HttpError;
use crate::error::ConfigError;
use thiserror::Error;

/// Error type for resource routing and resource operations.
///
/// # Example
///
/// ```rust
/// use rest_connection::rest::ResourceError;
///
/// let error = ResourceError::UnknownResource {
///     name: "ordres".to_string(),
///     valid: vec!["orders".to_string(), "customers".to_string()],
/// };
/// assert_eq!(
///     error.to_string(),
///     "ordres resource not found, did you mean one of these? orders, customers"
/// );
/// ```
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The resource name is not in the integration's whitelist.
    #[error("{name} resource not found, did you mean one of these? {}", .valid.join(", "))]
    UnknownResource {
        /// The name that was requested.
        name: String,
        /// The names the integration accepts.
        valid: Vec<String>,
    },

    /// An operation was requested before any resource was selected.
    #[error("No resource selected. Call `select` with a resource name first.")]
    NoResourceSelected,

    /// The response body could not be decoded as JSON.
    #[error("Malformed response envelope: {0}")]
    MalformedEnvelope(#[from] serde_json::Error),

    /// An HTTP-level error occurred.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The connection configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The `each` callback aborted the iteration.
    #[error("Callback failed: {0}")]
    Callback(Box<dyn std::error::Error + Send + Sync>),
}

impl ResourceError {
    /// Wraps any error returned from an `each` callback.
    pub fn callback(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Callback(error.into())
    }

    /// Returns the HTTP status code, if this error came from a response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http(error) => error.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::HttpResponseError;

    #[test]
    fn test_unknown_resource_message_lists_valid_names() {
        let error = ResourceError::UnknownResource {
            name: "foo".to_string(),
            valid: vec!["orders".to_string(), "customers".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "foo resource not found, did you mean one of these? orders, customers"
        );
    }

    #[test]
    fn test_malformed_envelope_from_serde_error() {
        let serde_error = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let error: ResourceError = serde_error.into();
        assert!(matches!(error, ResourceError::MalformedEnvelope(_)));
        assert!(error.to_string().starts_with("Malformed response envelope"));
    }

    #[test]
    fn test_http_error_is_transparent_and_keeps_status() {
        let error: ResourceError = HttpError::Response(HttpResponseError {
            code: 404,
            message: r#"{"error":"Not Found"}"#.to_string(),
            error_reference: None,
        })
        .into();
        assert_eq!(error.status(), Some(404));
        assert!(error.to_string().contains("Not Found"));
    }

    #[test]
    fn test_config_error_converts() {
        let error: ResourceError = ConfigError::EmptyResourceName.into();
        assert!(matches!(error, ResourceError::Config(ConfigError::EmptyResourceName)));
        assert_eq!(error.status(), None);
    }

    #[test]
    fn test_callback_wraps_string_errors() {
        let error = ResourceError::callback("stop here");
        assert_eq!(error.to_string(), "Callback failed: stop here");
    }

    #[test]
    fn test_resource_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ResourceError>();
    }
}
