//! Request validation errors.

/// Specific validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ValidationErrorKind {
    /// The request body carried no prompt.
    #[display("pass prompt in body!")]
    MissingPrompt,
    /// The request body could not be read as JSON.
    #[display("Malformed request body: {_0}")]
    MalformedBody(String),
    /// Nothing to generate from.
    #[display("Conversation is empty")]
    EmptyConversation,
    /// A message has no role.
    #[display("Missing role in conversation at message {index}")]
    MissingRole {
        /// Position of the offending message
        index: usize,
    },
    /// A message has no content.
    #[display("Missing content in conversation at message {index}")]
    MissingContent {
        /// Position of the offending message
        index: usize,
    },
}

/// Validation error with location tracking.
///
/// # Examples
///
/// ```
/// use parley_error::{ValidationError, ValidationErrorKind};
///
/// let err = ValidationError::new(ValidationErrorKind::MissingRole { index: 2 });
/// assert!(format!("{}", err).contains("message 2"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    /// The specific validation failure
    pub kind: ValidationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new ValidationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ValidationErrorKind {
        &self.kind
    }
}
