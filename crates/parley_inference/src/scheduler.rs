//! Single-flight access to the loaded model.

use crate::stats::{QueuedTicket, SchedulerStats, StatsSnapshot};
use parley_core::{Conversation, GenerationOptions, MAX_NEW_TOKENS_CAP, ParsedResult};
use parley_error::{BackendError, BackendErrorKind, GenerationError, GenerationResult};
use parley_models::{ChatBackend, OutputParser};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Runs generations against one backend, one at a time.
///
/// The scheduler owns the model lock. Requests queue on it in arrival order, and the
/// holder runs the blocking backend call on tokio's blocking pool so the async
/// workers stay free to accept and rate-limit other requests. The lock guard travels
/// into the blocking worker and is only dropped once the backend call returns, so a
/// caller that times out or disconnects never frees the model early.
///
/// Cloning is cheap and every clone shares the same lock.
#[derive(Clone)]
pub struct GenerationScheduler {
    backend: Arc<dyn ChatBackend>,
    parser: OutputParser,
    model_lock: Arc<Mutex<()>>,
    max_new_tokens_cap: u32,
    generation_timeout: Option<Duration>,
    stats: Arc<SchedulerStats>,
    #[cfg(feature = "metrics")]
    metrics: crate::GenerationMetrics,
}

impl std::fmt::Debug for GenerationScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationScheduler")
            .field("backend", &self.backend.name())
            .field("parser", &self.parser)
            .field("max_new_tokens_cap", &self.max_new_tokens_cap)
            .field("generation_timeout", &self.generation_timeout)
            .finish_non_exhaustive()
    }
}

impl GenerationScheduler {
    /// Creates a scheduler with the default token cap and no timeout.
    pub fn new(backend: Arc<dyn ChatBackend>, parser: OutputParser) -> Self {
        Self {
            backend,
            parser,
            model_lock: Arc::new(Mutex::new(())),
            max_new_tokens_cap: MAX_NEW_TOKENS_CAP,
            generation_timeout: None,
            stats: Arc::new(SchedulerStats::default()),
            #[cfg(feature = "metrics")]
            metrics: crate::GenerationMetrics::new(),
        }
    }

    /// Sets the upper bound on `max_new_tokens`.
    pub fn with_max_new_tokens_cap(mut self, cap: u32) -> Self {
        self.max_new_tokens_cap = cap;
        self
    }

    /// Sets how long a caller waits for the backend once it holds the lock.
    pub fn with_generation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.generation_timeout = timeout;
        self
    }

    /// The parser applied to raw output.
    pub fn parser(&self) -> OutputParser {
        self.parser
    }

    /// The token cap applied to every request.
    pub fn max_new_tokens_cap(&self) -> u32 {
        self.max_new_tokens_cap
    }

    /// Name of the backend in use.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// True while a generation holds the model.
    pub fn is_busy(&self) -> bool {
        self.model_lock.try_lock().is_err()
    }

    /// Current counter values.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Generates the next turn of `conversation`.
    ///
    /// The conversation is validated before the model lock is touched. Options are
    /// clamped to the token cap, the conversation is rendered in the model's chat
    /// template, and the raw output is parsed back into turns.
    ///
    /// # Errors
    ///
    /// - `Validation` if the conversation is empty or a message lacks a role or content
    /// - `Backend` if the backend fails, times out or its worker dies
    /// - `Parse` if the output holds no recognizable turn
    #[instrument(
        skip_all,
        fields(
            request_id = %uuid::Uuid::new_v4(),
            turns = conversation.len(),
            parser = %self.parser,
        )
    )]
    pub async fn generate(
        &self,
        conversation: &Conversation,
        options: GenerationOptions,
    ) -> GenerationResult<ParsedResult> {
        if let Err(e) = conversation.validate() {
            SchedulerStats::bump(&self.stats.validation_failures);
            warn!(error = %e, "Rejected conversation");
            return Err(e.into());
        }

        let options = options.clamped(self.max_new_tokens_cap);
        let prompt = self.parser.render(conversation.messages());

        let queued = Instant::now();
        let guard = {
            let _ticket = QueuedTicket::enter(&self.stats.waiting);
            Arc::clone(&self.model_lock).lock_owned().await
        };
        SchedulerStats::bump(&self.stats.lock_acquisitions);
        let waited = queued.elapsed();
        debug!(
            waited_ms = waited.as_millis() as u64,
            max_new_tokens = *options.max_new_tokens(),
            "Model lock acquired"
        );

        let backend = Arc::clone(&self.backend);
        let started = Instant::now();
        let worker = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            backend.generate(&prompt, &options)
        });

        let raw = match self.join(worker).await {
            Ok(raw) => raw,
            Err(e) => {
                SchedulerStats::bump(&self.stats.backend_failures);
                #[cfg(feature = "metrics")]
                self.metrics.record_failure(self.backend.name(), "backend");
                warn!(error = %e, "Generation failed");
                return Err(e.into());
            }
        };
        let elapsed = started.elapsed();

        match self.parser.parse(&raw) {
            Ok(parsed) => {
                SchedulerStats::bump(&self.stats.completed);
                #[cfg(feature = "metrics")]
                self.metrics.record_completed(
                    self.backend.name(),
                    waited.as_secs_f64(),
                    elapsed.as_secs_f64(),
                );
                info!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    output_len = raw.len(),
                    turns = parsed.conversation().len(),
                    "Generation complete"
                );
                Ok(parsed)
            }
            Err(e) => {
                SchedulerStats::bump(&self.stats.parse_failures);
                #[cfg(feature = "metrics")]
                self.metrics.record_failure(self.backend.name(), "parse");
                warn!(error = %e, output_len = raw.len(), "Unparseable model output");
                Err(GenerationError::from(e))
            }
        }
    }

    async fn join(
        &self,
        worker: tokio::task::JoinHandle<Result<String, BackendError>>,
    ) -> Result<String, BackendError> {
        let joined = match self.generation_timeout {
            Some(limit) => match tokio::time::timeout(limit, worker).await {
                Ok(joined) => joined,
                Err(_) => {
                    return Err(BackendError::new(BackendErrorKind::TimedOut {
                        millis: limit.as_millis() as u64,
                    }));
                }
            },
            None => worker.await,
        };
        joined.map_err(|e| BackendError::new(BackendErrorKind::WorkerLost(e.to_string())))?
    }
}
