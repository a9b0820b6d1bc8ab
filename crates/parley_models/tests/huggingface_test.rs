//! Tests for the HTTP text-generation backend against a local server.

use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use parley_core::{GenerationOptions, Message};
use parley_error::BackendErrorKind;
use parley_models::{ChatBackend, HuggingFaceBackend, HuggingFaceConfig, ModelFamily, OutputParser};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::runtime::Handle;

/// Echoes `inputs` followed by a completion, as a text-generation server does with
/// `return_full_text`.
async fn generate(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer hf_test") {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad token"})));
    }
    let inputs = body["inputs"].as_str().unwrap_or_default();
    let max = body["parameters"]["max_new_tokens"].as_u64().unwrap_or_default();
    (
        StatusCode::OK,
        Json(json!([{ "generated_text": format!("{inputs}[{max}]") }])),
    )
}

/// Answers like text-generation-inference: the prompt is echoed, the reply follows,
/// and the special token the model stopped on is decoded away. A reply already
/// ending in `<|im_end|>` is sent unchanged.
async fn generate_stripped(Json(body): Json<Value>) -> Json<Value> {
    let inputs = body["inputs"].as_str().unwrap_or_default();
    let reply = if inputs.contains("Twice?") {
        "Yes.<|im_end|>"
    } else {
        "You are Sky."
    };
    Json(json!({
        "generated_text": format!("{inputs}{reply}"),
        "details": {"finish_reason": "eos_token", "generated_tokens": 4}
    }))
}

async fn spawn_server() -> String {
    let app = Router::new()
        .route("/generate", post(generate))
        .route("/stripped", post(generate_stripped));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/generate")
}

fn backend(
    endpoint: String,
    api_key: Option<&str>,
    end_marker: Option<&'static str>,
) -> Arc<HuggingFaceBackend> {
    let config = HuggingFaceConfig::builder()
        .endpoint(endpoint)
        .api_key(api_key.map(str::to_string))
        .build()
        .unwrap();
    Arc::new(
        HuggingFaceBackend::new(config, Handle::current())
            .unwrap()
            .with_end_marker(end_marker),
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_generate_posts_prompt_and_parameters() {
    let backend = backend(spawn_server().await, Some("hf_test"), None);
    let options = GenerationOptions::default().with_max_new_tokens(64);

    let output = tokio::task::spawn_blocking(move || backend.generate("Hello", &options))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(output, "Hello[64]");
}

fn stripped_endpoint(generate_url: &str) -> String {
    generate_url.replace("/generate", "/stripped")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_reply_without_end_marker_is_parsed() {
    let url = stripped_endpoint(&spawn_server().await);
    for family in [ModelFamily::SmolLm, ModelFamily::TinyLlama] {
        let parser = OutputParser::Family(family);
        let backend = backend(url.clone(), None, parser.end_marker());
        let prompt = parser.render(&[Message::system("Hi"), Message::user("Who am I?")]);

        let raw = tokio::task::spawn_blocking(move || {
            backend.generate(&prompt, &GenerationOptions::default())
        })
        .await
        .unwrap()
        .unwrap();

        let parsed = parser.parse(&raw).unwrap();
        assert_eq!(parsed.response(), "You are Sky.", "{family}");
        assert_eq!(parsed.conversation().len(), 3, "{family}");
        assert_eq!(parsed.conversation()[1], Message::user("Who am I?"));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_end_marker_is_not_doubled() {
    let url = stripped_endpoint(&spawn_server().await);
    let parser = OutputParser::Family(ModelFamily::SmolLm);
    let backend = backend(url, None, parser.end_marker());
    let prompt = parser.render(&[Message::user("Twice?")]);

    let raw = tokio::task::spawn_blocking(move || {
        backend.generate(&prompt, &GenerationOptions::default())
    })
    .await
    .unwrap()
    .unwrap();

    assert!(raw.ends_with("Yes.<|im_end|>"));
    assert!(!raw.ends_with("<|im_end|><|im_end|>"));
    assert_eq!(parser.parse(&raw).unwrap().response(), "Yes.");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_error_status_maps_to_http_error() {
    let backend = backend(spawn_server().await, None, None);
    let options = GenerationOptions::default();

    let err = tokio::task::spawn_blocking(move || backend.generate("Hello", &options))
        .await
        .unwrap()
        .unwrap_err();
    match err.kind() {
        BackendErrorKind::Http(detail) => assert!(detail.contains("401")),
        other => panic!("expected HTTP error, got {other}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unreachable_endpoint_fails() {
    let backend = backend("http://127.0.0.1:1/generate".to_string(), None, None);
    let options = GenerationOptions::default();

    let err = tokio::task::spawn_blocking(move || backend.generate("Hello", &options))
        .await
        .unwrap()
        .unwrap_err();
    assert!(matches!(err.kind(), BackendErrorKind::Http(_)));
}
