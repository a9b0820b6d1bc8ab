//! Scheduler counters.

use derive_getters::Getters;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters updated by the scheduler.
#[derive(Debug, Default)]
pub(crate) struct SchedulerStats {
    pub(crate) lock_acquisitions: AtomicU64,
    pub(crate) waiting: AtomicU64,
    pub(crate) completed: AtomicU64,
    pub(crate) validation_failures: AtomicU64,
    pub(crate) backend_failures: AtomicU64,
    pub(crate) parse_failures: AtomicU64,
}

impl SchedulerStats {
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            lock_acquisitions: self.lock_acquisitions.load(Ordering::Relaxed),
            waiting: self.waiting.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            validation_failures: self.validation_failures.load(Ordering::Relaxed),
            backend_failures: self.backend_failures.load(Ordering::Relaxed),
            parse_failures: self.parse_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the scheduler counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Getters)]
pub struct StatsSnapshot {
    /// Times the model lock was taken
    lock_acquisitions: u64,
    /// Requests currently queued on the model lock
    waiting: u64,
    /// Generations that produced a parsed result
    completed: u64,
    /// Requests rejected before reaching the model
    validation_failures: u64,
    /// Backend errors, timeouts and lost workers
    backend_failures: u64,
    /// Outputs that could not be parsed
    parse_failures: u64,
}

/// Decrements the waiting counter when dropped, so a caller that gives up
/// while queued is not counted forever.
pub(crate) struct QueuedTicket<'a>(&'a AtomicU64);

impl<'a> QueuedTicket<'a> {
    pub(crate) fn enter(waiting: &'a AtomicU64) -> Self {
        waiting.fetch_add(1, Ordering::Relaxed);
        Self(waiting)
    }
}

impl Drop for QueuedTicket<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_tracks_waiting() {
        let stats = SchedulerStats::default();
        {
            let _first = QueuedTicket::enter(&stats.waiting);
            let _second = QueuedTicket::enter(&stats.waiting);
            assert_eq!(*stats.snapshot().waiting(), 2);
        }
        assert_eq!(*stats.snapshot().waiting(), 0);
    }
}
