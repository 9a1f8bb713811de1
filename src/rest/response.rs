//! Response wrapper for resource operations.
//!
//! This module provides [`ResourceResponse`], which combines the normalized
//! body with metadata from the HTTP response. The wrapper implements `Deref`
//! to [`Normalized`] for ergonomic access to the data.
//!
//! # Example
//!
//! ```rust,ignore
//! let response = connection.select("orders")?.list(None).await?;
//!
//! // Access fields directly via Deref
//! let total = response.field("total_pages");
//!
//! // Check rate limits
//! if let Some(limit) = response.rate_limit() {
//!     println!("remaining: {:?}", limit.remaining);
//! }
//!
//! // Take ownership of the body
//! let body: serde_json::Value = response.into_inner().into_value();
//! ```

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use crate::clients::{HttpResponse, RateLimitInfo};
use crate::rest::normalize::Normalized;

/// A normalized response from a resource operation.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use rest_connection::clients::HttpResponse;
/// use rest_connection::rest::{Normalized, ResourceResponse};
/// use serde_json::json;
///
/// let raw = HttpResponse::new(200, HashMap::new(), r#"{"data":[{"id":1}]}"#);
/// let response = ResourceResponse::new(Normalized::Single(json!({"id": 1})), &raw);
///
/// assert_eq!(response.code(), 200);
/// assert_eq!(response.field("id"), Some(&json!(1)));
/// ```
#[derive(Debug, Clone)]
pub struct ResourceResponse {
    data: Normalized,
    code: u16,
    headers: HashMap<String, Vec<String>>,
    rate_limit: Option<RateLimitInfo>,
}

impl ResourceResponse {
    /// Creates a new `ResourceResponse` from a normalized body and the raw
    /// HTTP response it came from.
    #[must_use]
    pub fn new(data: Normalized, raw: &HttpResponse) -> Self {
        Self {
            data,
            code: raw.code,
            headers: raw.headers.clone(),
            rate_limit: raw.rate_limit,
        }
    }

    /// Consumes the response and returns the normalized body.
    #[must_use]
    pub fn into_inner(self) -> Normalized {
        self.data
    }

    /// Returns a reference to the normalized body.
    ///
    /// Note: In most cases, you can use Deref coercion instead of
    /// calling this method explicitly.
    #[must_use]
    pub const fn data(&self) -> &Normalized {
        &self.data
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub const fn code(&self) -> u16 {
        self.code
    }

    /// Returns the first value of a response header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns all response headers, keyed by lowercase name.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, Vec<String>> {
        &self.headers
    }

    /// Returns the parsed rate limit headers, if the API sent any.
    #[must_use]
    pub const fn rate_limit(&self) -> Option<&RateLimitInfo> {
        self.rate_limit.as_ref()
    }
}

impl Deref for ResourceResponse {
    type Target = Normalized;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl DerefMut for ResourceResponse {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}
