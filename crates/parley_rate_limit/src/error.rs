//! Error types for rate limiting operations.

/// Error kinds for rate limiting operations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum RateLimitErrorKind {
    /// A limit specification could not be parsed.
    #[display("Invalid rate limit {_0:?}: expected \"N/unit\" such as \"6/minute\"")]
    InvalidSpec(String),
    /// The client used up its quota for the current window.
    #[display("Rate limit exceeded for {client}: {limit}, retry after {retry_after_secs}s")]
    LimitExceeded {
        /// Key the quota is tracked under
        client: String,
        /// The limit that was exceeded
        limit: String,
        /// Seconds until the window resets
        retry_after_secs: u64,
    },
}

/// Rate limiting error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Rate Limit Error: {} at line {} in {}", kind, line, file)]
pub struct RateLimitError {
    kind: RateLimitErrorKind,
    line: u32,
    file: &'static str,
}

impl RateLimitError {
    /// Create a new rate limiting error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RateLimitErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &RateLimitErrorKind {
        &self.kind
    }

    /// Seconds the client should wait, when the error is a quota rejection.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match &self.kind {
            RateLimitErrorKind::LimitExceeded {
                retry_after_secs, ..
            } => Some(*retry_after_secs),
            RateLimitErrorKind::InvalidSpec(_) => None,
        }
    }
}

impl<T> From<T> for RateLimitError
where
    T: Into<RateLimitErrorKind>,
{
    #[track_caller]
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}
