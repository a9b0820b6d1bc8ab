//! Background eviction of stale windows.

use crate::RateLimiter;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Spawns a task that purges expired windows every `every`.
///
/// Without it the window map grows with every distinct client ever seen. The task
/// runs until the returned handle is aborted or the runtime shuts down.
pub fn spawn_sweeper(limiter: Arc<RateLimiter>, every: Duration) -> JoinHandle<()> {
    tracing::info!(interval_secs = every.as_secs(), "Starting rate limit sweeper");
    tokio::spawn(async move {
        let mut ticks = tokio::time::interval_at(Instant::now() + every, every);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticks.tick().await;
            limiter.purge_expired(std::time::Instant::now());
        }
    })
}
