//! Authentication hooks.
//!
//! Token acquisition and refresh happen outside this crate. What lives here is
//! the request hook that attaches an already-obtained token to every request
//! when an integration declares
//! [`Capabilities::uses_bearer_auth`](crate::rest::Capabilities).

use std::collections::HashMap;

use crate::clients::{HttpRequest, RequestHook};
use crate::config::BearerToken;

/// Attaches `Authorization: Bearer <token>` to every outgoing request.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use rest_connection::auth::BearerAuth;
/// use rest_connection::clients::{HttpMethod, HttpRequest, RequestHook};
/// use rest_connection::BearerToken;
///
/// let hook = BearerAuth::new(BearerToken::new("abc").unwrap());
/// let request = HttpRequest::builder(HttpMethod::Get, "orders").build().unwrap();
/// let mut headers = HashMap::new();
/// hook.prepare(&request, &mut headers);
///
/// assert_eq!(headers.get("Authorization"), Some(&"Bearer abc".to_string()));
/// ```
#[derive(Clone, Debug)]
pub struct BearerAuth {
    token: BearerToken,
}

impl BearerAuth {
    /// Creates a hook for the given token.
    #[must_use]
    pub const fn new(token: BearerToken) -> Self {
        Self { token }
    }
}

impl RequestHook for BearerAuth {
    fn prepare(&self, _request: &HttpRequest, headers: &mut HashMap<String, String>) {
        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", self.token.as_ref()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::HttpMethod;

    #[test]
    fn test_bearer_auth_overrides_existing_authorization() {
        let hook = BearerAuth::new(BearerToken::new("fresh").unwrap());
        let request = HttpRequest::builder(HttpMethod::Delete, "orders/1")
            .build()
            .unwrap();

        let mut headers = HashMap::new();
        headers.insert("Authorization".to_string(), "Basic stale".to_string());
        hook.prepare(&request, &mut headers);

        assert_eq!(
            headers.get("Authorization"),
            Some(&"Bearer fresh".to_string())
        );
    }

    #[test]
    fn test_bearer_auth_debug_does_not_leak_token() {
        let hook = BearerAuth::new(BearerToken::new("leaky").unwrap());
        assert!(!format!("{hook:?}").contains("leaky"));
    }
}
