//! HTTP error mapping.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use parley_error::{GenerationError, GenerationErrorKind, ValidationError, ValidationErrorKind};
use parley_rate_limit::RateLimitError;

/// Everything a request can fail with.
#[derive(Debug, derive_more::From, derive_more::Display)]
pub enum ApiError {
    /// Bad request body
    #[display("{_0}")]
    Validation(ValidationError),
    /// Quota used up
    #[display("{_0}")]
    RateLimited(RateLimitError),
    /// Generation failed
    #[display("{_0}")]
    Generation(GenerationError),
}

impl ApiError {
    /// Status code sent to the client.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Generation(e) => match e.kind() {
                GenerationErrorKind::Validation(_) => StatusCode::BAD_REQUEST,
                GenerationErrorKind::Backend(_) | GenerationErrorKind::Parse(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    /// Plain-text body sent to the client. Source locations stay in the logs.
    pub fn message(&self) -> String {
        match self {
            ApiError::Validation(e) => validation_message(e),
            ApiError::RateLimited(e) => e.kind().to_string(),
            ApiError::Generation(e) => match e.kind() {
                GenerationErrorKind::Validation(v) => validation_message(v),
                GenerationErrorKind::Backend(b) => b.kind().to_string(),
                GenerationErrorKind::Parse(p) => p.kind().to_string(),
            },
        }
    }
}

fn validation_message(error: &ValidationError) -> String {
    match error.kind() {
        ValidationErrorKind::MalformedBody(_) => ValidationErrorKind::MissingPrompt.to_string(),
        kind => kind.to_string(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, %status, "Request rejected");
        }

        let retry_after = match &self {
            ApiError::RateLimited(e) => e.retry_after_secs(),
            _ => None,
        };
        let mut response = (status, self.message()).into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}
