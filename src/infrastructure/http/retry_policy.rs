//! Retry policies for the two catalog APIs.
//!
//! Each provider gets its own backoff profile; 429 responses carrying a
//! `Retry-After` header override the computed delay.

use std::time::Duration;

/// Configuration for HTTP retry behavior
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Base delay between retries
    pub base_delay: Duration,
    /// Maximum delay to wait (prevents excessive waits)
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Whether to jitter computed delays
    pub jitter: bool,
}

impl RetryPolicy {
    /// Conservative policy for Jikan (60 req/min limit)
    pub fn jikan() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(120),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }

    /// Policy for AniList (30 req/min in degraded state)
    pub fn anilist() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_millis(700),
            max_delay: Duration::from_secs(60),
            backoff_multiplier: 1.5,
            jitter: true,
        }
    }

    /// Calculate delay for the next retry attempt. A server-provided
    /// `Retry-After` takes priority over the computed backoff.
    pub fn calculate_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        if let Some(server_delay) = retry_after {
            return server_delay.min(self.max_delay);
        }

        let multiplier = self.backoff_multiplier.powi(attempt as i32);
        let mut delay =
            Duration::from_millis((self.base_delay.as_millis() as f64 * multiplier) as u64);
        if self.jitter {
            delay = delay.mul_f64(0.8 + rand::random::<f64>() * 0.4);
        }
        delay.min(self.max_delay)
    }
}

/// Information extracted from HTTP 429 responses.
#[derive(Debug, Clone)]
pub struct RateLimitInfo {
    /// How long to wait before the next request (from `Retry-After`)
    pub retry_after: Option<Duration>,
}

impl RateLimitInfo {
    pub fn from_headers(headers: &reqwest::header::HeaderMap) -> Self {
        let retry_after = headers
            .get("retry-after")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs);

        Self { retry_after }
    }
}

/// Determines if a transport-level error is worth retrying.
pub fn is_retryable_error(error: &reqwest::Error) -> bool {
    if let Some(status) = error.status() {
        return matches!(status.as_u16(), 429 | 500..=599);
    }
    error.is_timeout() || error.is_connect() || error.is_request()
}
