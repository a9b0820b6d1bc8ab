//! Backend error types.

/// Ways the model call itself can fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum BackendErrorKind {
    /// The inference backend reported a failure.
    #[display("Inference failed: {_0}")]
    Inference(String),
    /// The backend could not be reached or answered with an error status.
    #[display("Backend request failed: {_0}")]
    Http(String),
    /// The generation did not finish within the configured wall-clock limit.
    #[display("Generation timed out after {millis} ms")]
    TimedOut {
        /// Timeout that elapsed, in milliseconds
        millis: u64,
    },
    /// The worker running the blocking call panicked or was torn down.
    #[display("Generation worker lost: {_0}")]
    WorkerLost(String),
}

/// Backend error with source location.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Backend Error: {} at line {} in {}", kind, line, file)]
pub struct BackendError {
    /// What went wrong
    pub kind: BackendErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl BackendError {
    /// Create a new BackendError at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use parley_error::{BackendError, BackendErrorKind};
    ///
    /// let err = BackendError::new(BackendErrorKind::Inference("CUDA out of memory".into()));
    /// assert!(format!("{}", err).contains("out of memory"));
    /// ```
    #[track_caller]
    pub fn new(kind: BackendErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for an [`BackendErrorKind::Inference`] failure.
    #[track_caller]
    pub fn inference(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Inference(message.into()))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &BackendErrorKind {
        &self.kind
    }
}
