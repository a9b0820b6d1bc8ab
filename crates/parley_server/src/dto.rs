//! Request and response bodies.

use derive_getters::Getters;
use parley_core::{Conversation, GenerationOptions};
use serde::{Deserialize, Serialize};

/// Body of `POST /chat/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters)]
pub struct ChatRequest {
    /// The user's new message
    #[serde(default)]
    prompt: Option<String>,
    /// Sampling overrides
    #[serde(default)]
    options: Option<ChatOptions>,
    /// Earlier turns, oldest first
    #[serde(default)]
    conversation: Option<Conversation>,
}

impl ChatRequest {
    /// Consumes the request into its parts.
    pub fn into_parts(self) -> (Option<String>, Option<ChatOptions>, Option<Conversation>) {
        (self.prompt, self.options, self.conversation)
    }
}

/// Per-request sampling overrides. Absent fields keep the configured defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Getters)]
pub struct ChatOptions {
    /// Token budget, still subject to the server cap
    #[serde(default)]
    max_tokens: Option<u32>,
    /// Sampling temperature
    #[serde(default)]
    temperature: Option<f32>,
    /// Nucleus sampling threshold
    #[serde(default)]
    top_p: Option<f32>,
}

impl ChatOptions {
    /// Overlays these overrides on `defaults`.
    pub fn apply(&self, defaults: GenerationOptions) -> GenerationOptions {
        GenerationOptions::new(
            self.max_tokens.unwrap_or(*defaults.max_new_tokens()),
            self.temperature.unwrap_or(*defaults.temperature()),
            self.top_p.unwrap_or(*defaults.top_p()),
            *defaults.do_sample(),
        )
    }
}

/// Body of `GET /srv/get/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct StatusResponse {
    /// Version of the web client this API serves
    frontend_version: String,
    /// Version of this API
    api_version: String,
}

impl StatusResponse {
    /// Creates a status payload.
    pub fn new(frontend_version: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self {
            frontend_version: frontend_version.into(),
            api_version: api_version.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_options_keep_defaults() {
        let defaults = GenerationOptions::default();
        assert_eq!(ChatOptions::default().apply(defaults), defaults);
    }

    #[test]
    fn test_max_tokens_reaches_generation_options() {
        let options: ChatOptions =
            serde_json::from_str(r#"{"max_tokens": 42, "top_p": 0.5}"#).unwrap();
        let applied = options.apply(GenerationOptions::default());
        assert_eq!(*applied.max_new_tokens(), 42);
        assert_eq!(*applied.top_p(), 0.5);
        assert_eq!(*applied.temperature(), parley_core::DEFAULT_TEMPERATURE);
    }

    #[test]
    fn test_request_fields_are_optional() {
        let request: ChatRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request, ChatRequest::default());
    }
}
