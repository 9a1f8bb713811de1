//! HTTP transport for resource operations.
//!
//! # Overview
//!
//! - [`HttpClient`]: the async client bound to one API base URI
//! - [`HttpRequest`]: a request to be sent to the API
//! - [`HttpResponse`]: a response with parsed rate limit headers
//! - [`HttpMethod`]: supported HTTP methods (GET, POST, PUT, DELETE)
//! - [`RequestHook`]: per-request header injection
//!
//! # Retry Behavior
//!
//! - **429 (Rate Limited)**: retries using the `Retry-After` header value, or 1 second
//! - **500 (Server Error)**: retries with a fixed 1-second delay
//! - **Other errors**: returned immediately
//!
//! The default `tries` is 1, meaning no automatic retries. The resource layer
//! above never retries on its own.

mod errors;
mod hooks;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{
    HttpError, HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError,
};
pub use hooks::RequestHook;
pub use http_client::{HttpClient, LIBRARY_VERSION, RETRY_WAIT_TIME};
pub use http_request::{DataType, HttpMethod, HttpRequest, HttpRequestBuilder, QueryParams};
pub use http_response::{HttpResponse, RateLimitInfo};
