//! Generation scheduling for the Parley chat completion service.
//!
//! [`GenerationScheduler`] serializes access to one [`ChatBackend`] behind an async
//! FIFO lock, runs the blocking call on tokio's blocking pool, and parses the raw
//! output with the model's [`OutputParser`].
//!
//! [`ChatBackend`]: parley_models::ChatBackend
//! [`OutputParser`]: parley_models::OutputParser

#![warn(missing_docs)]
#![forbid(unsafe_code)]

#[cfg(feature = "metrics")]
mod metrics;
mod scheduler;
mod stats;

#[cfg(feature = "metrics")]
pub use metrics::GenerationMetrics;
pub use scheduler::GenerationScheduler;
pub use stats::StatsSnapshot;
