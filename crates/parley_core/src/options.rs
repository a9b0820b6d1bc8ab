//! Sampling options for a generation call.

use serde::{Deserialize, Serialize};

/// Token budget used when the caller does not ask for one.
pub const DEFAULT_MAX_NEW_TOKENS: u32 = 500;
/// Upper bound on new tokens per generation, whatever the caller requests.
pub const MAX_NEW_TOKENS_CAP: u32 = 500;
/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.4;
/// Default nucleus sampling threshold.
pub const DEFAULT_TOP_P: f32 = 0.92;

/// Generation parameters passed to the backend.
///
/// # Examples
///
/// ```
/// use parley_core::GenerationOptions;
///
/// let options = GenerationOptions::default().with_max_new_tokens(4096);
/// assert_eq!(*options.clamped(500).max_new_tokens(), 500);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_setters::Setters,
)]
#[setters(prefix = "with_")]
pub struct GenerationOptions {
    /// Maximum number of tokens to generate
    max_new_tokens: u32,
    /// Sampling temperature
    temperature: f32,
    /// Nucleus sampling threshold
    top_p: f32,
    /// Sample instead of greedy decoding
    do_sample: bool,
}

impl GenerationOptions {
    /// Creates options from explicit values.
    pub fn new(max_new_tokens: u32, temperature: f32, top_p: f32, do_sample: bool) -> Self {
        Self {
            max_new_tokens,
            temperature,
            top_p,
            do_sample,
        }
    }

    /// Returns a copy with `max_new_tokens` limited to `cap`.
    pub fn clamped(self, cap: u32) -> Self {
        Self {
            max_new_tokens: self.max_new_tokens.min(cap),
            ..self
        }
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NEW_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_P, true)
    }
}
