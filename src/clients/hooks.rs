//! Request-processing hooks.
//!
//! A [`RequestHook`] runs for every outgoing request after the default
//! headers are merged and before the request is sent. Hooks are the place to
//! inject per-request headers such as bearer tokens or tenant identifiers.

use std::collections::HashMap;
use std::fmt;

use crate::clients::http_request::HttpRequest;

/// A hook invoked on every outgoing request.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use rest_connection::clients::{HttpRequest, RequestHook};
///
/// #[derive(Debug)]
/// struct TenantHeader(String);
///
/// impl RequestHook for TenantHeader {
///     fn prepare(&self, _request: &HttpRequest, headers: &mut HashMap<String, String>) {
///         headers.insert("X-Tenant".to_string(), self.0.clone());
///     }
/// }
/// ```
pub trait RequestHook: Send + Sync + fmt::Debug {
    /// Adjusts the headers of an outgoing request.
    fn prepare(&self, request: &HttpRequest, headers: &mut HashMap<String, String>);
}
