//! Output parsing errors.

/// Specific parse failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ParseErrorKind {
    /// No delimited turn was found in the raw output.
    #[display("No output data found for {family} output ({raw_len} bytes)")]
    NoOutputData {
        /// Model family whose grammar was applied
        family: String,
        /// Length of the raw output that was searched
        raw_len: usize,
    },
}

/// Parse error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Parse Error: {} at line {} in {}", kind, line, file)]
pub struct ParseError {
    /// The specific parse failure
    pub kind: ParseErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ParseError {
    /// Create a new ParseError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ParseErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }
}
