//! Core data types for the Parley chat completion service.
//!
//! This crate provides the conversation model shared by the rate limiter, the
//! output parsers, the generation scheduler and the HTTP layer.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod conversation;
mod message;
mod observability;
mod options;
mod parsed;

pub use conversation::Conversation;
pub use message::Message;
#[cfg(feature = "metrics")]
pub use observability::init_metrics;
pub use observability::{LogFormat, init_tracing};
pub use options::{
    DEFAULT_MAX_NEW_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_P, GenerationOptions,
    MAX_NEW_TOKENS_CAP,
};
pub use parsed::ParsedResult;
