//! Telemetry metric name constants.
//!
//! Centralised metric names for membit operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `membit_`. Counters end in `_total`.
//!
//! # Common labels
//!
//! - `status`: outcome: "ok" or "error"
//! - `command`: chat command name without the `!` prefix (e.g. "hunt")

/// Total upstream GET attempts issued by [`SafeHttp`](crate::http::SafeHttp).
///
/// Labels: `status` ("ok" | "error").
pub const HTTP_REQUESTS_TOTAL: &str = "membit_http_requests_total";

/// Total retry attempts (not counting the initial request).
pub const HTTP_RETRIES_TOTAL: &str = "membit_http_retries_total";

/// Total cluster cache hits.
pub const CACHE_HITS_TOTAL: &str = "membit_cache_hits_total";

/// Total cluster cache misses.
pub const CACHE_MISSES_TOTAL: &str = "membit_cache_misses_total";

/// Total AI generation calls.
///
/// Labels: `status` ("ok" | "error").
pub const AI_REQUESTS_TOTAL: &str = "membit_ai_requests_total";

/// Total chat commands dispatched.
///
/// Labels: `command`.
pub const COMMANDS_TOTAL: &str = "membit_commands_total";
