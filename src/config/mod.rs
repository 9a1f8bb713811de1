//! Configuration types for building a [`Connection`](crate::Connection).
//!
//! # Overview
//!
//! - [`ConnectionConfig`]: construction parameters for a connection
//! - [`ConnectionConfigBuilder`]: a builder for [`ConnectionConfig`]
//! - [`BaseUri`]: a validated API base address
//! - [`BearerToken`]: a token with masked debug output
//! - [`ResourceName`]: a non-empty resource name
//!
//! Everything the integration itself declares (list field name, page-count
//! accessor, endpoint templates) lives on the
//! [`Integration`](crate::rest::Integration) trait. This module only holds the
//! per-instance knobs that callers may want to vary.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use rest_connection::{BearerToken, ConnectionConfig, DelayRange};
//!
//! let config = ConnectionConfig::builder()
//!     .bearer_token(BearerToken::new("token").unwrap())
//!     .delay_range(DelayRange::new(Duration::from_millis(100), Duration::from_millis(250)).unwrap())
//!     .header("X-Client", "reporting")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.tries(), 1);
//! ```

mod newtypes;

pub use newtypes::{BaseUri, BearerToken, ResourceName};

use std::collections::HashMap;

use crate::error::ConfigError;
use crate::rest::{DelayRange, UnwrapPolicy};

/// Construction parameters for a connection.
///
/// # Defaults
///
/// - `base_uri`: `None` (the integration's own base URI is used)
/// - `headers`: empty (merged over the integration's headers)
/// - `bearer_token`: `None`
/// - `delay_range`: 500ms to 2000ms
/// - `unwrap_policy`: [`UnwrapPolicy::CollapseSingleton`]
/// - `tries`: 1 (no transport-level retries)
/// - `user_agent_prefix`: `None`
#[derive(Clone, Debug)]
pub struct ConnectionConfig {
    base_uri: Option<BaseUri>,
    headers: HashMap<String, String>,
    bearer_token: Option<BearerToken>,
    delay_range: DelayRange,
    unwrap_policy: UnwrapPolicy,
    tries: u32,
    user_agent_prefix: Option<String>,
}

impl ConnectionConfig {
    /// Creates a new builder for constructing a `ConnectionConfig`.
    #[must_use]
    pub fn builder() -> ConnectionConfigBuilder {
        ConnectionConfigBuilder::new()
    }

    /// Returns the base URI override, if configured.
    #[must_use]
    pub const fn base_uri(&self) -> Option<&BaseUri> {
        self.base_uri.as_ref()
    }

    /// Returns the extra default headers.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Returns the bearer token, if configured.
    #[must_use]
    pub const fn bearer_token(&self) -> Option<&BearerToken> {
        self.bearer_token.as_ref()
    }

    /// Returns the fallback delay range used when the integration does not
    /// decide a delay itself.
    #[must_use]
    pub const fn delay_range(&self) -> DelayRange {
        self.delay_range
    }

    /// Returns the envelope unwrap policy.
    #[must_use]
    pub const fn unwrap_policy(&self) -> UnwrapPolicy {
        self.unwrap_policy
    }

    /// Returns the number of transport-level attempts per request.
    #[must_use]
    pub const fn tries(&self) -> u32 {
        self.tries
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            base_uri: None,
            headers: HashMap::new(),
            bearer_token: None,
            delay_range: DelayRange::default(),
            unwrap_policy: UnwrapPolicy::default(),
            tries: 1,
            user_agent_prefix: None,
        }
    }
}

// Verify ConnectionConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ConnectionConfig>();
};

/// Builder for constructing [`ConnectionConfig`] instances.
///
/// No field is required; [`build`](Self::build) only rejects inconsistent
/// values.
#[derive(Debug, Default)]
pub struct ConnectionConfigBuilder {
    base_uri: Option<BaseUri>,
    headers: HashMap<String, String>,
    bearer_token: Option<BearerToken>,
    delay_range: Option<DelayRange>,
    unwrap_policy: Option<UnwrapPolicy>,
    tries: Option<u32>,
    user_agent_prefix: Option<String>,
}

impl ConnectionConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the integration's base URI.
    #[must_use]
    pub fn base_uri(mut self, uri: BaseUri) -> Self {
        self.base_uri = Some(uri);
        self
    }

    /// Adds a default header sent with every request.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Replaces all extra default headers at once.
    #[must_use]
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the bearer token used when the integration declares bearer auth.
    #[must_use]
    pub fn bearer_token(mut self, token: BearerToken) -> Self {
        self.bearer_token = Some(token);
        self
    }

    /// Sets the fallback delay range.
    #[must_use]
    pub const fn delay_range(mut self, range: DelayRange) -> Self {
        self.delay_range = Some(range);
        self
    }

    /// Sets the envelope unwrap policy.
    #[must_use]
    pub const fn unwrap_policy(mut self, policy: UnwrapPolicy) -> Self {
        self.unwrap_policy = Some(policy);
        self
    }

    /// Sets the number of transport-level attempts for 429 and 500 responses.
    #[must_use]
    pub const fn tries(mut self, tries: u32) -> Self {
        self.tries = Some(tries);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`ConnectionConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `tries` was set to 0.
    pub fn build(self) -> Result<ConnectionConfig, ConfigError> {
        let tries = self.tries.unwrap_or(1);
        if tries == 0 {
            return Err(ConfigError::MissingRequiredField { field: "tries" });
        }

        Ok(ConnectionConfig {
            base_uri: self.base_uri,
            headers: self.headers,
            bearer_token: self.bearer_token,
            delay_range: self.delay_range.unwrap_or_default(),
            unwrap_policy: self.unwrap_policy.unwrap_or_default(),
            tries,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = ConnectionConfig::builder().build().unwrap();

        assert!(config.base_uri().is_none());
        assert!(config.headers().is_empty());
        assert!(config.bearer_token().is_none());
        assert_eq!(config.delay_range().min(), Duration::from_millis(500));
        assert_eq!(config.delay_range().max(), Duration::from_millis(2000));
        assert_eq!(config.unwrap_policy(), UnwrapPolicy::CollapseSingleton);
        assert_eq!(config.tries(), 1);
        assert!(config.user_agent_prefix().is_none());
    }

    #[test]
    fn test_default_matches_empty_builder() {
        let config = ConnectionConfig::default();
        assert_eq!(config.tries(), 1);
        assert_eq!(config.delay_range(), DelayRange::default());
    }

    #[test]
    fn test_builder_rejects_zero_tries() {
        let result = ConnectionConfig::builder().tries(0).build();
        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "tries" })
        ));
    }

    #[test]
    fn test_builder_with_all_optional_fields() {
        let uri = BaseUri::new("https://api.example.com/v1").unwrap();
        let config = ConnectionConfig::builder()
            .base_uri(uri.clone())
            .header("X-Tenant", "acme")
            .bearer_token(BearerToken::new("tok").unwrap())
            .delay_range(DelayRange::ZERO)
            .unwrap_policy(UnwrapPolicy::Preserve)
            .tries(3)
            .user_agent_prefix("MyApp/1.0")
            .build()
            .unwrap();

        assert_eq!(config.base_uri(), Some(&uri));
        assert_eq!(config.headers().get("X-Tenant"), Some(&"acme".to_string()));
        assert_eq!(config.bearer_token().unwrap().as_ref(), "tok");
        assert_eq!(config.delay_range(), DelayRange::ZERO);
        assert_eq!(config.unwrap_policy(), UnwrapPolicy::Preserve);
        assert_eq!(config.tries(), 3);
        assert_eq!(config.user_agent_prefix(), Some("MyApp/1.0"));
    }

    #[test]
    fn test_config_debug_masks_token() {
        let config = ConnectionConfig::builder()
            .bearer_token(BearerToken::new("very-secret").unwrap())
            .build()
            .unwrap();

        let debug_str = format!("{config:?}");
        assert!(debug_str.contains("ConnectionConfig"));
        assert!(!debug_str.contains("very-secret"));
    }
}
