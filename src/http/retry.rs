//! Per-request options and the shared retry loop.
//!
//! Upstream calls use a fixed attempt budget with linear backoff: after the
//! n-th failed attempt (0-indexed) the caller waits `backoff_step * (n + 1)`.
//! Every failure is retried; exhausting the budget yields `None` rather than
//! an error.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::Result;
use crate::telemetry;

/// Timeout and retry budget for one upstream GET.
///
/// ```rust
/// # use membit::http::RequestOptions;
/// # use std::time::Duration;
/// let options = RequestOptions::new()
///     .retries(4)
///     .timeout(Duration::from_secs(3));
/// assert_eq!(options.max_attempts(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    /// Per-attempt timeout. Default: 8s.
    pub timeout: Duration,
    /// Retries after the first attempt. Default: 2 (three attempts total).
    pub retries: u32,
    /// Linear backoff unit. Default: 250ms.
    pub backoff_step: Duration,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(8),
            retries: 2,
            backoff_step: Duration::from_millis(250),
        }
    }
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single attempt, no retry.
    pub fn no_retry() -> Self {
        Self {
            retries: 0,
            ..Self::default()
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn backoff_step(mut self, step: Duration) -> Self {
        self.backoff_step = step;
        self
    }

    /// Total attempts, including the initial request.
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    /// Delay after a failed attempt (0-indexed): `backoff_step * (attempt + 1)`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff_step.saturating_mul(attempt.saturating_add(1))
    }
}

/// Run `f` until it succeeds or the attempt budget is spent.
///
/// Failures are logged at debug level and never returned.
pub(crate) async fn with_retry<F, Fut, T>(options: &RequestOptions, operation: &str, f: F) -> Option<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = options.max_attempts();
    for attempt in 0..max_attempts {
        match f().await {
            Ok(value) => {
                metrics::counter!(telemetry::HTTP_REQUESTS_TOTAL, "status" => "ok").increment(1);
                return Some(value);
            }
            Err(e) => {
                metrics::counter!(telemetry::HTTP_REQUESTS_TOTAL, "status" => "error")
                    .increment(1);
                debug!(operation, attempt = attempt + 1, max_attempts, error = %e, "attempt failed");
                if attempt + 1 < max_attempts {
                    metrics::counter!(telemetry::HTTP_RETRIES_TOTAL).increment(1);
                    tokio::time::sleep(options.delay_for_attempt(attempt)).await;
                }
            }
        }
    }
    warn!(operation, max_attempts, "giving up after exhausting attempts");
    None
}
