//! Validated newtype wrappers for configuration values.
//!
//! These wrappers validate their contents on construction. Invalid values are
//! rejected with a [`ConfigError`].

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated base URI for an API.
///
/// The URI must carry a scheme and a host. A path prefix is allowed and any
/// trailing slash is removed so that endpoint paths can be joined with a
/// single `/`.
///
/// # Example
///
/// ```rust
/// use rest_connection::BaseUri;
///
/// let uri = BaseUri::new("https://api.example.com/v2/").unwrap();
/// assert_eq!(uri.as_ref(), "https://api.example.com/v2");
/// assert_eq!(uri.scheme(), "https");
/// assert_eq!(uri.host_name(), "api.example.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUri {
    uri: String,
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl BaseUri {
    /// Creates a new validated base URI.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUri`] if the URI has no scheme or host.
    pub fn new(uri: impl Into<String>) -> Result<Self, ConfigError> {
        let uri = uri.into();
        let uri = uri.trim().trim_end_matches('/').to_string();

        let scheme_end = uri
            .find("://")
            .ok_or_else(|| ConfigError::InvalidBaseUri { uri: uri.clone() })?;

        let scheme = &uri[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidBaseUri { uri });
        }

        let host_start = scheme_end + 3;
        if host_start >= uri.len() {
            return Err(ConfigError::InvalidBaseUri { uri });
        }

        // Host ends at port, path, query, or end of string
        let host_end = uri[host_start..]
            .find([':', '/', '?', '#'])
            .map_or(uri.len(), |i| host_start + i);

        if host_end == host_start {
            return Err(ConfigError::InvalidBaseUri { uri });
        }

        Ok(Self {
            uri,
            scheme_end,
            host_start,
            host_end,
        })
    }

    /// Returns the URI scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.uri[..self.scheme_end]
    }

    /// Returns the host name portion of the URI.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.uri[self.host_start..self.host_end]
    }
}

impl AsRef<str> for BaseUri {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

impl fmt::Display for BaseUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

/// A bearer token attached to every outgoing request when the integration
/// declares bearer authentication.
///
/// The `Debug` implementation masks the value.
///
/// ```rust
/// use rest_connection::BearerToken;
///
/// let token = BearerToken::new("secret-token").unwrap();
/// assert_eq!(format!("{:?}", token), "BearerToken(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Creates a new bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyBearerToken`] if the token is empty.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConfigError::EmptyBearerToken);
        }
        Ok(Self(token))
    }
}

impl AsRef<str> for BearerToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(*****)")
    }
}

/// The name of a collection within a REST API (e.g., "orders").
///
/// Whitelist checks happen in the router; this type only rejects empty names.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceName(String);

impl ResourceName {
    /// Creates a new resource name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyResourceName`] if the name is empty.
    pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ConfigError::EmptyResourceName);
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for ResourceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ResourceName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ResourceName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_uri_validates_format() {
        let uri = BaseUri::new("https://api.example.com").unwrap();
        assert_eq!(uri.scheme(), "https");
        assert_eq!(uri.host_name(), "api.example.com");

        let uri = BaseUri::new("http://localhost:3000/api").unwrap();
        assert_eq!(uri.scheme(), "http");
        assert_eq!(uri.host_name(), "localhost");
        assert_eq!(uri.as_ref(), "http://localhost:3000/api");
    }

    #[test]
    fn test_base_uri_strips_trailing_slashes() {
        let uri = BaseUri::new("https://api.example.com/v1//").unwrap();
        assert_eq!(uri.as_ref(), "https://api.example.com/v1");
    }

    #[test]
    fn test_base_uri_rejects_invalid() {
        assert!(BaseUri::new("api.example.com").is_err());
        assert!(BaseUri::new("https://").is_err());
        assert!(BaseUri::new("://example.com").is_err());
        assert!(BaseUri::new("https:///path").is_err());
    }

    #[test]
    fn test_bearer_token_rejects_empty_and_blank() {
        assert!(matches!(
            BearerToken::new(""),
            Err(ConfigError::EmptyBearerToken)
        ));
        assert!(matches!(
            BearerToken::new("   "),
            Err(ConfigError::EmptyBearerToken)
        ));
    }

    #[test]
    fn test_bearer_token_masks_value_in_debug() {
        let token = BearerToken::new("super-secret").unwrap();
        let debug_output = format!("{token:?}");
        assert_eq!(debug_output, "BearerToken(*****)");
        assert!(!debug_output.contains("super-secret"));
    }

    #[test]
    fn test_resource_name_rejects_empty() {
        assert!(matches!(
            ResourceName::new(""),
            Err(ConfigError::EmptyResourceName)
        ));
        assert_eq!(ResourceName::new("orders").unwrap().as_ref(), "orders");
    }

    #[test]
    fn test_resource_name_deserialize_validates() {
        let name: ResourceName = serde_json::from_str(r#""customers""#).unwrap();
        assert_eq!(name.to_string(), "customers");

        let result: Result<ResourceName, _> = serde_json::from_str(r#""""#);
        assert!(result.is_err());
    }
}
