//! The contract a concrete API integration implements.
//!
//! An integration declares only what differs per API: where it lives, where
//! list payloads keep their records, and how many pages the server reports.
//! Everything else has a default.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use rest_connection::clients::HttpResponse;
//! use rest_connection::rest::{EndpointTemplates, Integration, ResourceResponse};
//! use rest_connection::rest::governor::delay_from_headers;
//! use rest_connection::ResourceName;
//!
//! struct Shop;
//!
//! impl EndpointTemplates for Shop {
//!     fn endpoint_for_delete(&self, resource: &ResourceName, id: &str) -> String {
//!         format!("{resource}/{id}/cancel")
//!     }
//! }
//!
//! impl Integration for Shop {
//!     fn base_uri(&self) -> &str {
//!         "https://shop.example.com/api/v2"
//!     }
//!
//!     fn list_name(&self) -> &str {
//!         "items"
//!     }
//!
//!     fn total_pages(&self, response: &ResourceResponse) -> u64 {
//!         response
//!             .field("total_pages")
//!             .and_then(serde_json::Value::as_u64)
//!             .unwrap_or(1)
//!     }
//!
//!     fn resource_names(&self) -> Option<&[&str]> {
//!         Some(&["orders", "customers"])
//!     }
//!
//!     fn rate_limit(&self, response: &HttpResponse) -> Option<Duration> {
//!         delay_from_headers(response)
//!     }
//! }
//! ```

use std::collections::HashMap;
use std::time::Duration;

use crate::clients::HttpResponse;
use crate::rest::path::EndpointTemplates;
use crate::rest::response::ResourceResponse;
use crate::rest::router::DelegateRegistry;

/// Optional features an integration opts into.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Attach `Authorization: Bearer <token>` using the configured
    /// [`BearerToken`](crate::BearerToken).
    pub uses_bearer_auth: bool,
}

/// A concrete REST API.
///
/// Required: [`base_uri`](Self::base_uri), [`list_name`](Self::list_name)
/// and [`total_pages`](Self::total_pages). Endpoint paths come from the
/// [`EndpointTemplates`] supertrait.
pub trait Integration: EndpointTemplates + Send + Sync {
    /// Absolute base address every endpoint path is joined onto.
    fn base_uri(&self) -> &str;

    /// Field of a list response that holds the records.
    fn list_name(&self) -> &str;

    /// Total number of pages reported by a list response.
    fn total_pages(&self, response: &ResourceResponse) -> u64;

    /// Resource names this API accepts. `None` accepts any non-empty name.
    ///
    /// Every entry must be non-empty; [`Connection::new`](crate::rest::Connection::new)
    /// rejects a whitelist that is not.
    fn resource_names(&self) -> Option<&[&str]> {
        None
    }

    /// Query parameter carrying the 1-based page number.
    fn page_name(&self) -> &str {
        "page"
    }

    /// Query parameter and value for the page size, if the API takes one.
    fn page_size(&self) -> Option<(&str, u32)> {
        None
    }

    /// Headers sent with every request.
    fn headers(&self) -> HashMap<String, String> {
        HashMap::new()
    }

    /// Optional features.
    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    /// Delay to wait after `response`. `None` uses the random fallback.
    fn rate_limit(&self, _response: &HttpResponse) -> Option<Duration> {
        None
    }

    /// Resource-specific clients that replace the generic one.
    fn delegates(&self) -> DelegateRegistry {
        DelegateRegistry::new()
    }
}
