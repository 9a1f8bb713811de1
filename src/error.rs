//! Configuration error types.
//!
//! All configuration constructors return `Result<T, ConfigError>` so that
//! invalid values are rejected when a [`Connection`](crate::Connection) is
//! built rather than on the first request.
//!
//! # Example
//!
//! ```rust
//! use rest_connection::{BearerToken, ConfigError};
//!
//! let result = BearerToken::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyBearerToken)));
//! ```

use thiserror::Error;

/// Errors that can occur while configuring a connection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Base URI is invalid.
    #[error("Invalid base URI '{uri}'. Expected an absolute URL with scheme (e.g., 'https://api.example.com/v1').")]
    InvalidBaseUri {
        /// The invalid URI that was provided.
        uri: String,
    },

    /// Bearer token cannot be empty.
    #[error("Bearer token cannot be empty. Please provide a valid access token.")]
    EmptyBearerToken,

    /// Resource names cannot be empty.
    #[error("Resource name cannot be empty.")]
    EmptyResourceName,

    /// The fallback delay range has a lower bound above its upper bound.
    #[error("Invalid delay range: minimum {min_ms}ms is greater than maximum {max_ms}ms.")]
    InvalidDelayRange {
        /// Lower bound in milliseconds.
        min_ms: u128,
        /// Upper bound in milliseconds.
        max_ms: u128,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the connection.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_base_uri_error_message() {
        let error = ConfigError::InvalidBaseUri {
            uri: "not a url".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("not a url"));
        assert!(message.contains("absolute URL"));
    }

    #[test]
    fn test_missing_required_field_error_message() {
        let error = ConfigError::MissingRequiredField {
            field: "bearer_token",
        };
        let message = error.to_string();
        assert!(message.contains("bearer_token"));
        assert!(message.contains("must be set"));
    }

    #[test]
    fn test_invalid_delay_range_error_message() {
        let error = ConfigError::InvalidDelayRange {
            min_ms: 2000,
            max_ms: 500,
        };
        assert_eq!(
            error.to_string(),
            "Invalid delay range: minimum 2000ms is greater than maximum 500ms."
        );
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::EmptyResourceName;
        let _: &dyn std::error::Error = &error;
    }
}
