//! Tests for configuration parsing and loading.

use parley_core::LogFormat;
use parley_models::{ModelFamily, OutputParser};
use parley_server::{DEFAULT_START_PROMPT, ParleyConfig};
use std::io::Write;
use std::time::Duration;

#[test]
fn test_defaults() {
    let config = ParleyConfig::default();
    assert_eq!(config.model().start_prompt(), DEFAULT_START_PROMPT);
    assert_eq!(*config.model().max_new_tokens_cap(), 500);
    assert_eq!(
        config.model().parser(),
        OutputParser::Family(ModelFamily::SmolLm)
    );
    assert_eq!(config.rate_limit().chat(), "6/m");
    assert_eq!(config.rate_limit().status(), "60/m");
    assert!(config.validate().is_ok());

    let limits = config.rate_limit().quotas().unwrap();
    assert_eq!(*limits.chat().count(), 6);
    assert_eq!(*limits.status().period(), Duration::from_secs(60));
}

#[test]
fn test_parse_partial_file() {
    let toml = r#"
[server]
bind = "127.0.0.1:9000"
frontend_version = "3.2.1"

[model]
id = "TinyLlama/TinyLlama-1.1B-Chat-v1.0"
temperature = 0.7
generation_timeout_secs = 90

[rate_limit]
chat = "10/5m"
exempt = ["127.0.0.1"]

[logging]
format = "json"
"#;

    let config: ParleyConfig = toml::from_str(toml).expect("Valid TOML");
    assert_eq!(config.server().bind().port(), 9000);
    assert_eq!(config.server().frontend_version(), "3.2.1");
    assert_eq!(
        config.model().parser(),
        OutputParser::Family(ModelFamily::TinyLlama)
    );
    assert_eq!(*config.model().default_options().temperature(), 0.7);
    assert_eq!(
        config.model().generation_timeout(),
        Some(Duration::from_secs(90))
    );
    assert_eq!(config.rate_limit().exempt(), &vec!["127.0.0.1".to_string()]);
    assert_eq!(*config.logging().format(), LogFormat::Json);
    assert_eq!(
        *config.rate_limit().quotas().unwrap().chat().period(),
        Duration::from_secs(300)
    );
    // Untouched sections keep their defaults.
    assert_eq!(config.rate_limit().status(), "60/m");
    assert_eq!(*config.backend().request_timeout_secs(), 120);
}

#[test]
fn test_unknown_model_uses_passthrough_unless_aliased() {
    let toml = r#"
[model]
id = "acme/chat-7b"
"#;
    let config: ParleyConfig = toml::from_str(toml).unwrap();
    assert_eq!(config.model().parser(), OutputParser::Passthrough);

    let toml = r#"
[model]
id = "acme/chat-7b"

[model.aliases]
"acme/chat-7b" = "chatml"
"#;
    let config: ParleyConfig = toml::from_str(toml).unwrap();
    assert_eq!(
        config.model().parser(),
        OutputParser::Family(ModelFamily::SmolLm)
    );
}

#[test]
fn test_family_override_wins() {
    let toml = r#"
[model]
id = "HuggingFaceTB/SmolLM-1.7B-Instruct"
family = "tinyllama"
"#;
    let config: ParleyConfig = toml::from_str(toml).unwrap();
    assert_eq!(
        config.model().parser(),
        OutputParser::Family(ModelFamily::TinyLlama)
    );
}

#[test]
fn test_validate_rejects_bad_quota() {
    let toml = r#"
[rate_limit]
chat = "6/fortnight"
"#;
    let config: ParleyConfig = toml::from_str(toml).unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.message.contains("rate_limit.chat"));
}

#[test]
fn test_validate_rejects_zero_cap() {
    let toml = r#"
[model]
max_new_tokens_cap = 0
"#;
    let config: ParleyConfig = toml::from_str(toml).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_load_explicit_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        "[server]\napi_version = \"9.9\"\n\n[backend]\nbase_url = \"http://gpu-box:8080/generate\""
    )
    .unwrap();

    let config = ParleyConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.server().api_version(), "9.9");
    assert_eq!(config.backend().base_url(), "http://gpu-box:8080/generate");
    assert_eq!(
        config.backend().huggingface_config().unwrap().endpoint(),
        "http://gpu-box:8080/generate"
    );
}

#[test]
fn test_load_missing_explicit_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    assert!(ParleyConfig::load(Some(&missing)).is_err());
}

#[tokio::test]
async fn test_build_state_from_defaults() {
    let (state, sweeper) = parley_server::build_state(&ParleyConfig::default()).unwrap();
    assert_eq!(*state.limits().chat().count(), 6);
    assert_eq!(*state.limits().status().count(), 60);
    assert_eq!(state.scheduler().max_new_tokens_cap(), 500);
    assert_eq!(state.scheduler().backend_name(), "huggingface");
    assert_eq!(state.start_prompt(), DEFAULT_START_PROMPT);
    sweeper.abort();
}

#[tokio::test]
async fn test_build_state_rejects_bad_quota() {
    let config: ParleyConfig = toml::from_str("[rate_limit]\nstatus = \"zero/m\"").unwrap();
    assert!(parley_server::build_state(&config).is_err());
}
