//! Shared handler state.

use crate::{ParleyConfig, RouteLimits, StatusResponse};
use derive_getters::Getters;
use parley_core::GenerationOptions;
use parley_error::ConfigError;
use parley_inference::GenerationScheduler;
use parley_rate_limit::RateLimiter;
use std::sync::Arc;

/// State injected into every handler and middleware.
#[derive(Debug, Clone, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct AppState {
    /// Serialized access to the model
    scheduler: GenerationScheduler,
    /// Per-client request counters
    #[builder(default)]
    limiter: Arc<RateLimiter>,
    /// Quota per route
    limits: RouteLimits,
    /// Key clients by credentials instead of address
    #[builder(default)]
    use_auth_identity: bool,
    /// Opening message for fresh conversations
    #[builder(default = "crate::DEFAULT_START_PROMPT.to_string()")]
    start_prompt: String,
    /// Options used when a request leaves a field out
    #[builder(default)]
    default_options: GenerationOptions,
    /// Status endpoint payload
    #[builder(default)]
    status: StatusResponse,
}

impl AppState {
    /// Returns a builder for the state.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::default()
    }

    /// Assembles state from loaded configuration.
    ///
    /// # Errors
    ///
    /// Fails when a configured quota does not parse.
    pub fn from_config(
        config: &ParleyConfig,
        scheduler: GenerationScheduler,
        limiter: Arc<RateLimiter>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            scheduler,
            limiter,
            limits: config.rate_limit().quotas()?,
            use_auth_identity: *config.rate_limit().use_auth_identity(),
            start_prompt: config.model().start_prompt().clone(),
            default_options: config.model().default_options(),
            status: StatusResponse::new(
                config.server().frontend_version().clone(),
                config.server().api_version().clone(),
            ),
        })
    }
}
