//! Service configuration.
//!
//! Values are layered: built-in defaults, then a TOML file, then `PARLEY__*`
//! environment variables (`PARLEY__SERVER__BIND`, `PARLEY__RATE_LIMIT__EXEMPT`, ...).

use derive_getters::Getters;
use parley_core::{
    DEFAULT_MAX_NEW_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_P, GenerationOptions, LogFormat,
    MAX_NEW_TOKENS_CAP,
};
use parley_error::ConfigError;
use parley_models::{HuggingFaceConfig, ModelFamily, OutputParser, ParserRegistry};
use parley_rate_limit::Quota;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Opening message used when a request carries no conversation.
pub const DEFAULT_START_PROMPT: &str = "You are a helpful assistant, with a focus on talking to people about relevant topics in the conversation.";

/// File name searched for in the working directory and the user config directory.
pub const CONFIG_FILE_NAME: &str = "parley.toml";

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct ParleyConfig {
    /// Listener and version info
    server: ServerSection,
    /// Model identity and sampling defaults
    model: ModelSection,
    /// Inference endpoint
    backend: BackendSection,
    /// Request quotas
    rate_limit: RateLimitSection,
    /// Log output
    logging: LoggingSection,
}

impl ParleyConfig {
    /// Loads configuration from `path`, or from the first config file found.
    ///
    /// Search order without an explicit path: `./parley.toml`, then
    /// `<config dir>/parley/parley.toml`. Without any file the defaults apply.
    /// Environment variables override file values either way.
    ///
    /// # Errors
    ///
    /// Fails if an explicit path is missing, a file does not parse, or a value has
    /// the wrong type.
    #[tracing::instrument(skip(path))]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        match path.map(Path::to_path_buf).or_else(discover) {
            Some(file) => {
                tracing::info!(path = %file.display(), "Loading configuration file");
                builder = builder.add_source(config::File::from(file).required(true));
            }
            None => tracing::info!("No configuration file found, using defaults"),
        }

        builder
            .add_source(
                config::Environment::with_prefix("PARLEY")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("rate_limit.exempt")
                    .try_parsing(true),
            )
            .build()
            .and_then(|merged| merged.try_deserialize::<Self>())
            .map_err(|e| ConfigError::new(format!("Failed to load configuration: {e}")))
    }

    /// Checks values that deserialize but cannot run.
    ///
    /// # Errors
    ///
    /// Reports the first unusable value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rate_limit.quotas()?;
        if self.model.max_new_tokens_cap == 0 {
            return Err(ConfigError::new("model.max_new_tokens_cap must be positive"));
        }
        if self.model.id.trim().is_empty() {
            return Err(ConfigError::new("model.id must not be empty"));
        }
        if self.rate_limit.sweep_interval_secs == 0 {
            return Err(ConfigError::new("rate_limit.sweep_interval_secs must be positive"));
        }
        self.backend.huggingface_config()?;
        Ok(())
    }
}

fn discover() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|dir| dir.join("parley").join(CONFIG_FILE_NAME))
        .filter(|path| path.is_file())
}

/// `[server]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct ServerSection {
    /// Address to listen on
    bind: SocketAddr,
    /// Reported by the status endpoint
    api_version: String,
    /// Reported by the status endpoint
    frontend_version: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            api_version: env!("CARGO_PKG_VERSION").to_string(),
            frontend_version: "unknown".to_string(),
        }
    }
}

/// `[model]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct ModelSection {
    /// Model identifier, used to pick the output parser
    id: String,
    /// Forces a grammar instead of looking the id up
    family: Option<ModelFamily>,
    /// Extra model ids mapped to a family
    aliases: HashMap<String, ModelFamily>,
    /// Opening assistant message for fresh conversations
    start_prompt: String,
    /// Default sampling temperature
    temperature: f32,
    /// Default nucleus sampling threshold
    top_p: f32,
    /// Sample instead of greedy decoding
    do_sample: bool,
    /// Upper bound on new tokens per request
    max_new_tokens_cap: u32,
    /// Wall-clock limit on one generation, unlimited when absent
    generation_timeout_secs: Option<u64>,
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            id: "HuggingFaceTB/SmolLM-1.7B-Instruct".to_string(),
            family: None,
            aliases: HashMap::new(),
            start_prompt: DEFAULT_START_PROMPT.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            do_sample: true,
            max_new_tokens_cap: MAX_NEW_TOKENS_CAP,
            generation_timeout_secs: None,
        }
    }
}

impl ModelSection {
    /// The output parser for the configured model.
    pub fn parser(&self) -> OutputParser {
        if let Some(family) = self.family {
            return OutputParser::Family(family);
        }
        self.aliases
            .iter()
            .fold(ParserRegistry::default(), |registry, (id, family)| {
                registry.register(id.clone(), *family)
            })
            .get_parser(&self.id)
    }

    /// Options used when a request leaves a field out.
    pub fn default_options(&self) -> GenerationOptions {
        GenerationOptions::new(
            DEFAULT_MAX_NEW_TOKENS.min(self.max_new_tokens_cap),
            self.temperature,
            self.top_p,
            self.do_sample,
        )
    }

    /// Generation timeout, if any.
    pub fn generation_timeout(&self) -> Option<Duration> {
        self.generation_timeout_secs.map(Duration::from_secs)
    }
}

/// `[backend]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct BackendSection {
    /// URL generation requests are POSTed to
    base_url: String,
    /// Bearer token for the endpoint
    api_key: Option<String>,
    /// Per-request HTTP timeout
    request_timeout_secs: u64,
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000/generate".to_string(),
            api_key: None,
            request_timeout_secs: 120,
        }
    }
}

impl BackendSection {
    /// Connection settings for the text-generation backend.
    ///
    /// # Errors
    ///
    /// Fails when the URL is empty.
    pub fn huggingface_config(&self) -> Result<HuggingFaceConfig, ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::new("backend.base_url must not be empty"));
        }
        HuggingFaceConfig::builder()
            .endpoint(self.base_url.clone())
            .api_key(self.api_key.clone())
            .request_timeout(Duration::from_secs(self.request_timeout_secs))
            .build()
            .map_err(|e| ConfigError::new(format!("Invalid backend settings: {e}")))
    }
}

/// `[rate_limit]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct RateLimitSection {
    /// Quota for `POST /chat/`
    chat: String,
    /// Quota for `GET /srv/get/`
    status: String,
    /// Addresses or principal keys that skip limiting
    exempt: Vec<String>,
    /// Key clients by their credentials instead of their address
    use_auth_identity: bool,
    /// How often elapsed windows are dropped
    sweep_interval_secs: u64,
}

impl Default for RateLimitSection {
    fn default() -> Self {
        Self {
            chat: "6/m".to_string(),
            status: "60/m".to_string(),
            exempt: Vec::new(),
            use_auth_identity: false,
            sweep_interval_secs: 60,
        }
    }
}

impl RateLimitSection {
    /// Parses the per-route quotas.
    ///
    /// # Errors
    ///
    /// Fails when a quota is not of the form `"N/unit"`.
    pub fn quotas(&self) -> Result<RouteLimits, ConfigError> {
        let parse = |name: &str, spec: &str| {
            spec.parse::<Quota>()
                .map_err(|e| ConfigError::new(format!("rate_limit.{name}: {}", e.kind())))
        };
        Ok(RouteLimits::new(
            parse("chat", &self.chat)?,
            parse("status", &self.status)?,
        ))
    }

    /// Sweep period.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

/// Quotas applied to each route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct RouteLimits {
    /// Chat completions
    chat: Quota,
    /// Status endpoint
    status: Quota,
}

impl RouteLimits {
    /// Creates route limits.
    pub fn new(chat: Quota, status: Quota) -> Self {
        Self { chat, status }
    }
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct LoggingSection {
    /// Subscriber output format
    format: LogFormat,
    /// Filter used when `RUST_LOG` is unset
    filter: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: "info,tower_http=info".to_string(),
        }
    }
}
