//! Top-level error for service start-up and wiring.

use crate::{BackendError, ConfigError, GenerationError, ParseError, ValidationError};

/// Any error the service can raise outside of a single HTTP request.
#[derive(Debug, derive_more::From, derive_more::Display)]
pub enum ParleyErrorKind {
    /// Configuration could not be loaded or is invalid
    #[display("{_0}")]
    Config(ConfigError),
    /// Request validation error
    #[display("{_0}")]
    Validation(ValidationError),
    /// Backend error
    #[display("{_0}")]
    Backend(BackendError),
    /// Output parsing error
    #[display("{_0}")]
    Parse(ParseError),
    /// Generation error
    #[display("{_0}")]
    Generation(GenerationError),
    /// Socket or filesystem failure
    #[display("I/O Error: {_0}")]
    Io(std::io::Error),
}

/// Parley error with kind discrimination.
#[derive(Debug)]
pub struct ParleyError(Box<ParleyErrorKind>);

impl ParleyError {
    /// Create a new error from a kind.
    pub fn new(kind: ParleyErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ParleyErrorKind {
        &self.0
    }
}

impl std::fmt::Display for ParleyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parley Error: {}", self.0)
    }
}

impl std::error::Error for ParleyError {}

impl<T> From<T> for ParleyError
where
    T: Into<ParleyErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Parley operations.
pub type ParleyResult<T> = std::result::Result<T, ParleyError>;
