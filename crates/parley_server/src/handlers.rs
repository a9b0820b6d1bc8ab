//! Route handlers.

use crate::{ApiError, AppState, ChatRequest, StatusResponse};
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use parley_core::{Conversation, Message, ParsedResult};
use parley_error::{ValidationError, ValidationErrorKind};
use tracing::{debug, instrument};

/// `POST /chat/`: appends the prompt to the conversation and generates a reply.
///
/// The body is read leniently: any JSON object is accepted regardless of
/// content type, and a missing conversation starts from the configured opening
/// message.
#[instrument(skip_all, fields(body_len = body.len()))]
pub async fn chat(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ParsedResult>, ApiError> {
    let request: ChatRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!(error = %e, "Unreadable chat body");
        ValidationError::new(ValidationErrorKind::MalformedBody(e.to_string()))
    })?;
    let (prompt, options, conversation) = request.into_parts();
    let prompt = prompt.ok_or_else(|| ValidationError::new(ValidationErrorKind::MissingPrompt))?;

    let mut conversation = conversation.unwrap_or_else(|| {
        Conversation::new().with(Message::assistant(state.start_prompt().clone()))
    });
    conversation.push(Message::user(prompt));

    let options = options
        .map(|o| o.apply(*state.default_options()))
        .unwrap_or(*state.default_options());

    let parsed = state.scheduler().generate(&conversation, options).await?;
    Ok(Json(parsed))
}

/// `GET /srv/get/`: version information.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(state.status().clone())
}
