//! The seam between the scheduler and whatever runs the model.

use parley_core::GenerationOptions;
use parley_error::BackendError;

/// A blocking text generator.
///
/// `generate` receives the rendered prompt and returns the decoded output,
/// usually the prompt followed by the continuation. Implementations may be slow
/// and need not tolerate concurrent calls: the scheduler calls them from a
/// blocking worker thread, one call at a time.
pub trait ChatBackend: Send + Sync {
    /// Runs one generation.
    ///
    /// # Errors
    ///
    /// Any failure of the underlying model or transport.
    fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String, BackendError>;

    /// Short description for logs.
    fn name(&self) -> &str {
        "backend"
    }
}
