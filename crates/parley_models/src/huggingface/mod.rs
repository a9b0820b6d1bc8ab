//! Backend for HuggingFace text-generation endpoints.
//!
//! Works against a self-hosted text-generation-inference server (`POST /generate`)
//! or the hosted Inference API (`POST /models/{id}`). Both take
//! `{inputs, parameters}` and answer with generated text.
//!
//! These servers decode with special tokens skipped, so the turn terminator the
//! model stopped on is missing from `generated_text`. A backend configured with
//! [`HuggingFaceBackend::with_end_marker`] puts it back.

mod dto;

pub use dto::{
    GeneratedText, GenerationDetails, HuggingFaceParameters, HuggingFaceRequest, HuggingFaceResponse,
};

use crate::ChatBackend;
use derive_getters::Getters;
use parley_core::GenerationOptions;
use parley_error::{BackendError, BackendErrorKind};
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, instrument, warn};

/// Connection settings for a text-generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct HuggingFaceConfig {
    /// Full URL generation requests are POSTed to
    endpoint: String,
    /// Bearer token, if the endpoint needs one
    #[builder(default)]
    api_key: Option<String>,
    /// Per-request HTTP timeout
    #[builder(default = "Duration::from_secs(120)")]
    request_timeout: Duration,
}

impl HuggingFaceConfig {
    /// Returns a builder for the configuration.
    pub fn builder() -> HuggingFaceConfigBuilder {
        HuggingFaceConfigBuilder::default()
    }
}

/// [`ChatBackend`] that calls a remote text-generation endpoint.
///
/// The trait is blocking while reqwest is async, so each call is driven to
/// completion on the runtime captured at construction. Call `generate` from a
/// blocking worker (`spawn_blocking`), never from inside an async task.
#[derive(Debug, Clone)]
pub struct HuggingFaceBackend {
    client: reqwest::Client,
    config: HuggingFaceConfig,
    runtime: Handle,
    end_marker: Option<&'static str>,
}

impl HuggingFaceBackend {
    /// Creates a backend that runs its requests on `runtime`.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn new(config: HuggingFaceConfig, runtime: Handle) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| BackendError::new(BackendErrorKind::Http(e.to_string())))?;
        Ok(Self {
            client,
            config,
            runtime,
            end_marker: None,
        })
    }

    /// Restores `marker` at the end of output that lacks it.
    ///
    /// Pass the marker of the model family being served, or `None` when output is
    /// used as is.
    pub fn with_end_marker(mut self, marker: Option<&'static str>) -> Self {
        self.end_marker = marker;
        self
    }

    #[instrument(skip(self, prompt, options), fields(endpoint = %self.config.endpoint, prompt_len = prompt.len()))]
    async fn request(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, BackendError> {
        let body = HuggingFaceRequest::new(prompt, HuggingFaceParameters::from(options));
        let mut request = self.client.post(&self.config.endpoint).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BackendError::new(BackendErrorKind::Http(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(BackendError::new(BackendErrorKind::Http(format!(
                "{status}: {detail}"
            ))));
        }

        let generated: HuggingFaceResponse = response
            .json()
            .await
            .map_err(|e| BackendError::inference(format!("unreadable response: {e}")))?;
        let generated = generated
            .into_first()
            .ok_or_else(|| BackendError::inference("response held no generated text"))?;

        if let Some(details) = generated.details() {
            debug!(
                finish_reason = %details.finish_reason(),
                generated_tokens = ?details.generated_tokens(),
                "Generation details"
            );
            if details.hit_length_limit() {
                warn!(
                    max_new_tokens = *options.max_new_tokens(),
                    "Reply cut off at the token limit"
                );
            }
        }

        let text = self.close_turn(generated.into_text());
        debug!(output_len = text.len(), "Generation response received");
        Ok(text)
    }

    fn close_turn(&self, mut text: String) -> String {
        match self.end_marker {
            Some(marker) if !text.trim_end().ends_with(marker) => {
                text.push_str(marker);
                text
            }
            _ => text,
        }
    }
}

impl ChatBackend for HuggingFaceBackend {
    fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String, BackendError> {
        self.runtime.block_on(self.request(prompt, options))
    }

    fn name(&self) -> &str {
        "huggingface"
    }
}
