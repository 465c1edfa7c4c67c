//! Per-user rate limiting for expensive commands.

use std::time::Duration;

use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

/// Admits one call per user per `window`.
///
/// Backed by a keyed GCRA limiter with a burst of one: a call is accepted
/// when at least `window` has passed since the user's previous accepted
/// call, and rejected calls do not extend the wait. A zero window disables
/// the limiter.
pub struct CooldownTracker {
    window: Duration,
    limiter: Option<DefaultKeyedRateLimiter<String>>,
}

impl CooldownTracker {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            limiter: Quota::with_period(window).map(RateLimiter::keyed),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Accept or reject a call from `user` now, recording it if accepted.
    pub fn check(&self, user: &str) -> bool {
        match &self.limiter {
            Some(limiter) => limiter.check_key(&user.to_string()).is_ok(),
            None => true,
        }
    }

    /// Forget users whose cooldown has fully elapsed.
    pub fn prune(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.retain_recent();
        }
    }
}
