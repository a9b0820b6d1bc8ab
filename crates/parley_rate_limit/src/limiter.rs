//! Per-client request limiter.

use crate::window::Window;
use crate::{Quota, RateLimitError, RateLimitErrorKind};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tracing::{debug, instrument, trace};

type WindowKey = (String, Quota);

/// Fixed-window rate limiter keyed by client.
///
/// Each `(client, quota)` pair gets its own window, so an endpoint allowing
/// 60/minute and one allowing 6/minute count the same client independently.
///
/// Every check by a non-exempt client counts against its quota, including checks
/// that get rejected. A client that keeps hammering stays blocked until the window
/// it opened runs out.
///
/// # Example
///
/// ```
/// use parley_rate_limit::{Quota, RateLimiter};
///
/// let limiter = RateLimiter::new(["127.0.0.1"]);
/// let quota = Quota::per_minute(1).unwrap();
///
/// assert!(limiter.check("10.0.0.7", &quota).is_ok());
/// assert!(limiter.check("10.0.0.7", &quota).is_err());
/// assert!(limiter.check("127.0.0.1", &quota).is_ok());
/// assert!(limiter.check("127.0.0.1", &quota).is_ok());
/// ```
#[derive(Debug, Default)]
pub struct RateLimiter {
    /// Clients that bypass counting entirely
    exempt: HashSet<String>,
    /// Live windows
    windows: Mutex<HashMap<WindowKey, Window>>,
}

impl RateLimiter {
    /// Creates a limiter that never counts the given clients.
    pub fn new<I, S>(exempt: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exempt: exempt.into_iter().map(Into::into).collect(),
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// True if the client bypasses the limiter.
    pub fn is_exempt(&self, client: &str) -> bool {
        self.exempt.contains(client)
    }

    fn windows(&self) -> MutexGuard<'_, HashMap<WindowKey, Window>> {
        self.windows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Counts a request from `client` against `quota`.
    ///
    /// # Errors
    ///
    /// Returns [`RateLimitErrorKind::LimitExceeded`] once the client has made more
    /// than `quota.count()` requests in the current window.
    pub fn check(&self, client: &str, quota: &Quota) -> Result<(), RateLimitError> {
        self.check_at(client, quota, Instant::now())
    }

    /// [`check`](Self::check) against an explicit clock reading.
    #[instrument(skip(self, quota, now), fields(quota = %quota))]
    pub fn check_at(
        &self,
        client: &str,
        quota: &Quota,
        now: Instant,
    ) -> Result<(), RateLimitError> {
        if self.is_exempt(client) {
            trace!("Client is exempt from rate limiting");
            return Ok(());
        }

        let mut windows = self.windows();
        let window = windows
            .entry((client.to_string(), *quota))
            .or_insert_with(|| Window::new(now));
        let count = window.hit(now, *quota.period());

        if count <= *quota.count() {
            trace!(count, "Rate limit check passed");
            return Ok(());
        }

        let retry_after = window.resets_in(now, *quota.period());
        let retry_after_secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
        debug!(count, retry_after_secs, "Rate limit exceeded");
        Err(RateLimitError::new(RateLimitErrorKind::LimitExceeded {
            client: client.to_string(),
            limit: quota.to_string(),
            retry_after_secs,
        }))
    }

    /// Requests `client` may still make under `quota` in the current window.
    pub fn remaining(&self, client: &str, quota: &Quota) -> u32 {
        self.remaining_at(client, quota, Instant::now())
    }

    /// [`remaining`](Self::remaining) against an explicit clock reading.
    pub fn remaining_at(&self, client: &str, quota: &Quota, now: Instant) -> u32 {
        if self.is_exempt(client) {
            return *quota.count();
        }
        let used = self
            .windows()
            .get(&(client.to_string(), *quota))
            .map_or(0, |window| window.count_at(now, *quota.period()));
        quota.count().saturating_sub(used)
    }

    /// Drops every window that has run out, returning how many were removed.
    pub fn purge_expired(&self, now: Instant) -> usize {
        let mut windows = self.windows();
        let before = windows.len();
        windows.retain(|(_, quota), window| !window.is_expired(now, *quota.period()));
        let purged = before - windows.len();
        if purged > 0 {
            debug!(purged, live = windows.len(), "Purged expired rate limit windows");
        }
        purged
    }

    /// Number of live windows.
    pub fn tracked_windows(&self) -> usize {
        self.windows().len()
    }
}
