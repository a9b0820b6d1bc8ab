//! HTTP front end for the Parley chat completion service.
//!
//! Routes:
//!
//! - `POST /chat/`: generate the next turn of a conversation
//! - `GET /srv/get/`: frontend and API versions
//!
//! Both are rate limited per client before any other work happens.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod dto;
mod error;
mod handlers;
mod identity;
mod middleware;
mod router;
mod server;
mod state;

pub use config::{
    BackendSection, CONFIG_FILE_NAME, DEFAULT_START_PROMPT, LoggingSection, ModelSection,
    ParleyConfig, RateLimitSection, RouteLimits, ServerSection,
};
pub use dto::{ChatOptions, ChatRequest, StatusResponse};
pub use error::ApiError;
pub use identity::ClientIdentity;
pub use router::create_router;
pub use server::{build_state, serve};
pub use state::{AppState, AppStateBuilder, AppStateBuilderError};
