//! Errors surfaced by the generation scheduler.

use crate::{BackendError, ParseError, ValidationError};

/// Why a generation request failed.
///
/// Callers branch on the variant: validation failures are the client's fault,
/// backend failures mean the model never produced output, and parse failures mean it
/// did but the output could not be read.
#[derive(Debug, Clone, derive_more::From, derive_more::Display)]
pub enum GenerationErrorKind {
    /// The conversation was rejected before the model lock was taken.
    #[display("{_0}")]
    Validation(ValidationError),
    /// The backend call failed, timed out or lost its worker.
    #[display("{_0}")]
    Backend(BackendError),
    /// The backend answered but the output had no recognizable turns.
    #[display("{_0}")]
    Parse(ParseError),
}

/// Generation error with location tracking.
///
/// # Examples
///
/// ```
/// use parley_error::{GenerationError, GenerationErrorKind, ValidationError, ValidationErrorKind};
///
/// let err: GenerationError = ValidationError::new(ValidationErrorKind::EmptyConversation).into();
/// assert!(matches!(err.kind(), GenerationErrorKind::Validation(_)));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The failure kind
    pub kind: GenerationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &GenerationErrorKind {
        &self.kind
    }

    /// True when the request was rejected before reaching the model.
    pub fn is_validation(&self) -> bool {
        matches!(self.kind, GenerationErrorKind::Validation(_))
    }
}

impl<T> From<T> for GenerationError
where
    T: Into<GenerationErrorKind>,
{
    #[track_caller]
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for generation operations.
pub type GenerationResult<T> = Result<T, GenerationError>;
