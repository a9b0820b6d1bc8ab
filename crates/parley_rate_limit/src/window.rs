//! Fixed-window request counting.

use std::time::{Duration, Instant};

/// Request count inside one fixed window.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Window {
    /// Requests counted since `started`, rejected ones included
    count: u32,
    /// Start of the current window
    started: Instant,
}

impl Window {
    pub(crate) fn new(now: Instant) -> Self {
        Self {
            count: 0,
            started: now,
        }
    }

    /// Starts a fresh window if `period` has elapsed.
    fn roll(&mut self, now: Instant, period: Duration) {
        if self.is_expired(now, period) {
            self.count = 0;
            self.started = now;
        }
    }

    pub(crate) fn is_expired(&self, now: Instant, period: Duration) -> bool {
        now.saturating_duration_since(self.started) >= period
    }

    /// Counts one request and returns the new total.
    pub(crate) fn hit(&mut self, now: Instant, period: Duration) -> u32 {
        self.roll(now, period);
        self.count = self.count.saturating_add(1);
        self.count
    }

    /// Requests counted in the window that is current at `now`.
    pub(crate) fn count_at(&self, now: Instant, period: Duration) -> u32 {
        if self.is_expired(now, period) {
            0
        } else {
            self.count
        }
    }

    /// Time until the window resets.
    pub(crate) fn resets_in(&self, now: Instant, period: Duration) -> Duration {
        period.saturating_sub(now.saturating_duration_since(self.started))
    }
}
