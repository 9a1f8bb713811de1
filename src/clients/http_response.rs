//! HTTP response types.
//!
//! [`HttpResponse`] keeps the raw body text so that decoding failures surface
//! in the resource layer instead of being swallowed by the transport.

use std::collections::HashMap;

/// Rate limit information parsed from the conventional
/// `X-RateLimit-Limit`, `X-RateLimit-Remaining` and `X-RateLimit-Reset`
/// headers.
///
/// Each field is optional because APIs commonly send only a subset.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use rest_connection::clients::RateLimitInfo;
///
/// let mut headers = HashMap::new();
/// headers.insert("x-ratelimit-limit".to_string(), vec!["40".to_string()]);
/// headers.insert("x-ratelimit-remaining".to_string(), vec!["0".to_string()]);
/// headers.insert("x-ratelimit-reset".to_string(), vec!["12".to_string()]);
///
/// let info = RateLimitInfo::from_headers(&headers).unwrap();
/// assert_eq!(info.limit, Some(40));
/// assert_eq!(info.remaining, Some(0));
/// assert_eq!(info.reset, Some(12));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Requests allowed in the current window.
    pub limit: Option<u64>,
    /// Requests remaining in the current window.
    pub remaining: Option<u64>,
    /// Seconds until the window resets.
    pub reset: Option<u64>,
}

impl RateLimitInfo {
    /// Parses rate limit headers. Header names must be lowercase.
    ///
    /// Returns `None` when none of the three headers is present or parseable.
    #[must_use]
    pub fn from_headers(headers: &HashMap<String, Vec<String>>) -> Option<Self> {
        let parse = |name: &str| {
            headers
                .get(name)
                .and_then(|values| values.first())
                .and_then(|value| value.trim().parse::<u64>().ok())
        };

        let info = Self {
            limit: parse("x-ratelimit-limit"),
            remaining: parse("x-ratelimit-remaining"),
            reset: parse("x-ratelimit-reset"),
        };

        if info == Self::default() {
            None
        } else {
            Some(info)
        }
    }

    /// Returns `true` when the server reported no remaining requests.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        matches!(self.remaining, Some(0))
    }
}

/// An HTTP response from the API.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, keyed by lowercase name.
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response body.
    pub body: String,
    /// Rate limit information, if the API sends it.
    pub rate_limit: Option<RateLimitInfo>,
    /// Seconds to wait before retrying (from the `Retry-After` header).
    ///
    /// Values that are not a finite, non-negative number of seconds
    /// representable as a [`Duration`](std::time::Duration) are dropped.
    pub retry_request_after: Option<f64>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, parsing the rate limit and
    /// `Retry-After` headers.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: impl Into<String>) -> Self {
        let rate_limit = RateLimitInfo::from_headers(&headers);

        let retry_request_after = headers
            .get("retry-after")
            .and_then(|values| values.first())
            .and_then(|value| value.trim().parse::<f64>().ok())
            .filter(|seconds| std::time::Duration::try_from_secs_f64(*seconds).is_ok());

        Self {
            code,
            headers,
            body: body.into(),
            rate_limit,
            retry_request_after,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the first value of a header. The name is matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Decodes the body as JSON.
    ///
    /// An empty body decodes to `null`.
    ///
    /// # Errors
    ///
    /// Returns the decode error if the body is not valid JSON.
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        if self.body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&self.body)
    }
}
