//! Async HTTP client used as the transport for resource operations.
//!
//! This module provides the [`HttpClient`] type, a thin layer over `reqwest`
//! that adds default headers, request hooks and optional retries.

use std::collections::HashMap;
use std::sync::Arc;

use crate::clients::errors::{HttpError, HttpResponseError, MaxHttpRetriesExceededError};
use crate::clients::hooks::RequestHook;
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;

/// Fixed retry wait time in seconds when no `Retry-After` header is sent.
pub const RETRY_WAIT_TIME: u64 = 1;

/// Library version from Cargo.toml.
pub const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for a single API base URI.
///
/// The client handles:
/// - URL construction from the base URI and a relative path
/// - Default headers including User-Agent and Accept
/// - [`RequestHook`]s run on every outgoing request
/// - Retries on 429 and 500 responses when a request asks for more than one try
///
/// # Example
///
/// ```rust,ignore
/// use std::collections::HashMap;
/// use rest_connection::clients::{HttpClient, HttpMethod, HttpRequest};
///
/// let client = HttpClient::new("https://api.example.com/v1", HashMap::new(), None);
/// let request = HttpRequest::builder(HttpMethod::Get, "orders")
///     .query_param("page", "1")
///     .build()
///     .unwrap();
///
/// let response = client.request(request).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    base_uri: String,
    default_headers: HashMap<String, String>,
    hooks: Vec<Arc<dyn RequestHook>>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// `headers` are merged over the built-in `User-Agent` and `Accept`
    /// defaults.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS initialization failure).
    #[must_use]
    pub fn new(
        base_uri: impl Into<String>,
        headers: HashMap<String, String>,
        user_agent_prefix: Option<&str>,
    ) -> Self {
        let base_uri = base_uri.into().trim_end_matches('/').to_string();

        let user_agent_prefix = user_agent_prefix.map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}rest-connection v{LIBRARY_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.extend(headers);

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_uri,
            default_headers,
            hooks: Vec::new(),
        }
    }

    /// Registers a hook that runs on every outgoing request.
    #[must_use]
    pub fn with_hook(mut self, hook: Arc<dyn RequestHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Returns the base URI for this client.
    #[must_use]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the number of registered request hooks.
    #[must_use]
    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// Builds the absolute URL for a relative path.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_uri, path.trim_start_matches('/'))
    }

    /// Sends an HTTP request.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - Network error occurs (`Network`)
    /// - Non-2xx response received (`Response`)
    /// - Max retries exceeded (`MaxRetries`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = self.url_for(&request.path);

        let mut headers = self.default_headers.clone();
        if let Some(body_type) = &request.body_type {
            headers.insert(
                "Content-Type".to_string(),
                body_type.as_content_type().to_string(),
            );
        }
        if let Some(extra) = &request.extra_headers {
            for (key, value) in extra {
                headers.insert(key.clone(), value.clone());
            }
        }
        for hook in &self.hooks {
            hook.prepare(&request, &mut headers);
        }

        let mut tries: u32 = 0;
        loop {
            tries += 1;

            let mut req_builder = match request.http_method {
                HttpMethod::Get => self.client.get(&url),
                HttpMethod::Post => self.client.post(&url),
                HttpMethod::Put => self.client.put(&url),
                HttpMethod::Delete => self.client.delete(&url),
            };

            for (key, value) in &headers {
                req_builder = req_builder.header(key, value);
            }

            if let Some(query) = &request.query {
                req_builder = req_builder.query(query);
            }

            if let Some(body) = &request.body {
                req_builder = req_builder.body(body.to_string());
            }

            tracing::debug!(method = %request.http_method, %url, "sending request");
            let res = req_builder.send().await?;

            let code = res.status().as_u16();
            let res_headers = Self::parse_response_headers(res.headers());
            let body = res.text().await?;

            let response = HttpResponse::new(code, res_headers, body);

            if response.is_ok() {
                return Ok(response);
            }

            let error_message = Self::serialize_error(&response);

            let should_retry = code == 429 || code == 500;
            if !should_retry {
                return Err(HttpError::Response(HttpResponseError {
                    code,
                    message: error_message,
                    error_reference: response.request_id().map(String::from),
                }));
            }

            if tries >= request.tries {
                if request.tries == 1 {
                    return Err(HttpError::Response(HttpResponseError {
                        code,
                        message: error_message,
                        error_reference: response.request_id().map(String::from),
                    }));
                }
                return Err(HttpError::MaxRetries(MaxHttpRetriesExceededError {
                    code,
                    tries: request.tries,
                    message: error_message,
                    error_reference: response.request_id().map(String::from),
                }));
            }

            let delay = Self::calculate_retry_delay(&response, code);
            tracing::warn!(
                code,
                attempt = tries,
                delay_ms = delay.as_millis(),
                path = %request.path,
                "retrying request"
            );
            tokio::time::sleep(delay).await;
        }
    }

    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// 429 honors `Retry-After`; everything else waits the fixed delay.
    fn calculate_retry_delay(response: &HttpResponse, status: u16) -> std::time::Duration {
        if status == 429 {
            if let Some(retry_after) = response
                .retry_request_after
                .and_then(|seconds| std::time::Duration::try_from_secs_f64(seconds).ok())
            {
                return retry_after;
            }
        }
        std::time::Duration::from_secs(RETRY_WAIT_TIME)
    }

    fn serialize_error(response: &HttpResponse) -> String {
        let body = response.json().unwrap_or(serde_json::Value::Null);
        let mut error_body = serde_json::Map::new();

        for key in ["errors", "error", "message", "error_description"] {
            if let Some(value) = body.get(key) {
                error_body.insert(key.to_string(), value.clone());
            }
        }

        if error_body.is_empty() && !response.body.trim().is_empty() && body.is_null() {
            error_body.insert(
                "raw_body".to_string(),
                serde_json::Value::String(response.body.clone()),
            );
        }

        if let Some(request_id) = response.request_id() {
            error_body.insert(
                "error_reference".to_string(),
                serde_json::json!(format!(
                    "If you report this error, please include this id: {request_id}."
                )),
            );
        }

        serde_json::to_string(&error_body).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::BearerAuth;
    use crate::config::BearerToken;

    #[test]
    fn test_client_strips_trailing_slash_from_base_uri() {
        let client = HttpClient::new("https://api.example.com/v1/", HashMap::new(), None);
        assert_eq!(client.base_uri(), "https://api.example.com/v1");
    }

    #[test]
    fn test_url_for_joins_with_single_slash() {
        let client = HttpClient::new("https://api.example.com/v1", HashMap::new(), None);
        assert_eq!(client.url_for("orders"), "https://api.example.com/v1/orders");
        assert_eq!(client.url_for("/orders/7"), "https://api.example.com/v1/orders/7");
    }

    #[test]
    fn test_user_agent_header_format() {
        let client = HttpClient::new("https://api.example.com", HashMap::new(), None);
        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.contains("rest-connection v"));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let client = HttpClient::new("https://api.example.com", HashMap::new(), Some("MyApp/1.0"));
        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("MyApp/1.0 | "));
    }

    #[test]
    fn test_custom_headers_override_defaults() {
        let mut headers = HashMap::new();
        headers.insert("Accept".to_string(), "application/vnd.api+json".to_string());
        headers.insert("X-Tenant".to_string(), "acme".to_string());

        let client = HttpClient::new("https://api.example.com", headers, None);
        assert_eq!(
            client.default_headers().get("Accept"),
            Some(&"application/vnd.api+json".to_string())
        );
        assert_eq!(
            client.default_headers().get("X-Tenant"),
            Some(&"acme".to_string())
        );
    }

    #[test]
    fn test_with_hook_registers_hook() {
        let client = HttpClient::new("https://api.example.com", HashMap::new(), None)
            .with_hook(Arc::new(BearerAuth::new(BearerToken::new("t").unwrap())));
        assert_eq!(client.hook_count(), 1);
    }

    #[test]
    fn test_serialize_error_keeps_known_fields_and_request_id() {
        let mut headers = HashMap::new();
        headers.insert("x-request-id".to_string(), vec!["req-9".to_string()]);
        let response = HttpResponse::new(
            422,
            headers,
            r#"{"message":"invalid","errors":{"name":["blank"]},"other":1}"#,
        );

        let serialized = HttpClient::serialize_error(&response);
        let value: serde_json::Value = serde_json::from_str(&serialized).unwrap();
        assert_eq!(value["message"], "invalid");
        assert_eq!(value["errors"]["name"][0], "blank");
        assert!(value.get("other").is_none());
        assert!(value["error_reference"].as_str().unwrap().contains("req-9"));
    }

    #[test]
    fn test_serialize_error_keeps_non_json_body() {
        let response = HttpResponse::new(502, HashMap::new(), "Bad Gateway");
        let serialized = HttpClient::serialize_error(&response);
        assert!(serialized.contains("Bad Gateway"));
    }

    #[test]
    fn test_retry_delay_uses_retry_after_for_429_only() {
        let mut headers = HashMap::new();
        headers.insert("retry-after".to_string(), vec!["3".to_string()]);
        let response = HttpResponse::new(429, headers.clone(), "");
        assert_eq!(
            HttpClient::calculate_retry_delay(&response, 429),
            std::time::Duration::from_secs(3)
        );

        let response = HttpResponse::new(500, headers, "");
        assert_eq!(
            HttpClient::calculate_retry_delay(&response, 500),
            std::time::Duration::from_secs(RETRY_WAIT_TIME)
        );
    }

    #[test]
    fn test_retry_delay_ignores_unusable_retry_after() {
        let mut response = HttpResponse::new(429, HashMap::new(), "");
        for seconds in [f64::INFINITY, f64::NAN, 1e20, -4.0] {
            response.retry_request_after = Some(seconds);
            assert_eq!(
                HttpClient::calculate_retry_delay(&response, 429),
                std::time::Duration::from_secs(RETRY_WAIT_TIME),
                "{seconds}"
            );
        }
    }
}
