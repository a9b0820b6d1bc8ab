//! OpenTelemetry instruments for generations.
//!
//! Available with the `metrics` feature. Instruments come from the global meter
//! provider installed by `parley_core::init_metrics`.

use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram, Meter},
};

/// Generation metrics.
#[derive(Clone)]
pub struct GenerationMetrics {
    /// Meter handle kept alive for metric instruments
    _meter: Meter,
    /// Generations that produced a parsed result
    pub completed: Counter<u64>,
    /// Failed generations, labelled by failure kind
    pub failures: Counter<u64>,
    /// Time spent queued on the model lock
    pub lock_wait: Histogram<f64>,
    /// Time spent in the backend call
    pub duration: Histogram<f64>,
}

impl GenerationMetrics {
    /// Create new generation metrics.
    pub fn new() -> Self {
        tracing::debug!("Building generation metrics instruments");
        let meter = global::meter("parley_inference");

        Self {
            _meter: meter.clone(),
            completed: meter
                .u64_counter("generation.completed")
                .with_description("Generations that produced a parsed result")
                .build(),
            failures: meter
                .u64_counter("generation.failures")
                .with_description("Failed generations")
                .build(),
            lock_wait: meter
                .f64_histogram("generation.lock_wait")
                .with_unit("seconds")
                .with_description("Time queued on the model lock")
                .build(),
            duration: meter
                .f64_histogram("generation.duration")
                .with_unit("seconds")
                .with_description("Backend call duration")
                .build(),
        }
    }

    /// Record a successful generation.
    pub fn record_completed(&self, backend: &str, wait_secs: f64, duration_secs: f64) {
        let labels = &[KeyValue::new("backend", backend.to_string())];
        self.completed.add(1, labels);
        self.lock_wait.record(wait_secs, labels);
        self.duration.record(duration_secs, labels);
    }

    /// Record a failed generation.
    pub fn record_failure(&self, backend: &str, kind: &'static str) {
        let labels = &[
            KeyValue::new("backend", backend.to_string()),
            KeyValue::new("kind", kind),
        ];
        self.failures.add(1, labels);
    }
}

impl Default for GenerationMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GenerationMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationMetrics").finish_non_exhaustive()
    }
}
