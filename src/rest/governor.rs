//! Pause scheduling between requests.
//!
//! After every response the connection asks the integration for an explicit
//! delay via [`Integration::rate_limit`](crate::rest::Integration::rate_limit).
//! When the integration has no opinion, a random delay is drawn from the
//! configured [`DelayRange`]. The pause always completes before the operation
//! returns.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use rest_connection::rest::governor::{decide, Throttle};
//! use rest_connection::DelayRange;
//!
//! let range = DelayRange::new(Duration::from_millis(10), Duration::from_millis(20)).unwrap();
//!
//! assert_eq!(decide(Some(Duration::ZERO), &range), Throttle::Explicit(Duration::ZERO));
//!
//! let Throttle::Random(delay) = decide(None, &range) else { panic!() };
//! assert!(delay >= range.min() && delay <= range.max());
//! ```

use std::time::Duration;

use rand::Rng;

use crate::clients::HttpResponse;
use crate::error::ConfigError;

/// Inclusive bounds for the fallback random delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelayRange {
    min: Duration,
    max: Duration,
}

impl DelayRange {
    /// A range that never pauses.
    pub const ZERO: Self = Self {
        min: Duration::ZERO,
        max: Duration::ZERO,
    };

    /// Creates a new range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDelayRange`] if `min > max`.
    pub fn new(min: Duration, max: Duration) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::InvalidDelayRange {
                min_ms: min.as_millis(),
                max_ms: max.as_millis(),
            });
        }
        Ok(Self { min, max })
    }

    /// Returns the lower bound.
    #[must_use]
    pub const fn min(&self) -> Duration {
        self.min
    }

    /// Returns the upper bound.
    #[must_use]
    pub const fn max(&self) -> Duration {
        self.max
    }

    /// Draws a uniformly distributed delay with microsecond resolution.
    #[must_use]
    pub fn sample(&self) -> Duration {
        let min = micros(self.min);
        let max = micros(self.max);
        if min >= max {
            return self.min;
        }
        Duration::from_micros(rand::thread_rng().gen_range(min..=max))
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(500),
            max: Duration::from_millis(2000),
        }
    }
}

fn micros(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

/// The pause chosen for one response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Throttle {
    /// The integration supplied this delay.
    Explicit(Duration),
    /// Drawn from the fallback [`DelayRange`].
    Random(Duration),
}

impl Throttle {
    /// Returns the delay to sleep for.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        match self {
            Self::Explicit(delay) | Self::Random(delay) => *delay,
        }
    }
}

/// Chooses the pause after a response.
#[must_use]
pub fn decide(explicit: Option<Duration>, range: &DelayRange) -> Throttle {
    explicit.map_or_else(|| Throttle::Random(range.sample()), Throttle::Explicit)
}

/// Derives a delay from common rate limit headers.
///
/// - `Retry-After` wins when present and convertible to a [`Duration`].
/// - `X-RateLimit-Remaining: 0` waits for `X-RateLimit-Reset` seconds.
/// - Any remaining budget means no pause.
///
/// Returns `None` when the response carries none of these, so the caller
/// falls back to the random delay.
///
/// ```rust
/// use std::collections::HashMap;
/// use std::time::Duration;
/// use rest_connection::clients::HttpResponse;
/// use rest_connection::rest::governor::delay_from_headers;
///
/// let mut headers = HashMap::new();
/// headers.insert("x-ratelimit-remaining".to_string(), vec!["0".to_string()]);
/// headers.insert("x-ratelimit-reset".to_string(), vec!["3".to_string()]);
/// let response = HttpResponse::new(200, headers, "{}");
///
/// assert_eq!(delay_from_headers(&response), Some(Duration::from_secs(3)));
/// ```
#[must_use]
pub fn delay_from_headers(response: &HttpResponse) -> Option<Duration> {
    if let Some(retry_after) = response
        .retry_request_after
        .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
    {
        return Some(retry_after);
    }

    let info = response.rate_limit?;
    match (info.remaining, info.reset) {
        (Some(0), Some(reset)) => Some(Duration::from_secs(reset)),
        (Some(0) | None, _) => None,
        (Some(_), _) => Some(Duration::ZERO),
    }
}

/// Sleeps for the chosen delay.
pub(crate) async fn pause(throttle: Throttle) {
    let delay = throttle.delay();
    if delay.is_zero() {
        return;
    }
    tracing::debug!(delay_ms = delay.as_millis(), ?throttle, "pausing before next request");
    tokio::time::sleep(delay).await;
}
