//! Error types for the Parley chat completion service.
//!
//! Every error carries the source location where it was raised. Constructors are
//! `#[track_caller]`, so `line` and `file` point at the call site, not at this crate.
//!
//! The generation path reports [`GenerationError`], whose [`GenerationErrorKind`]
//! separates bad input ([`ValidationError`]) from a failed model call
//! ([`BackendError`]) and from output the model produced but nobody can read
//! ([`ParseError`]).

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod backend;
mod config;
mod error;
mod generation;
mod parse;
mod validation;

pub use backend::{BackendError, BackendErrorKind};
pub use config::ConfigError;
pub use error::{ParleyError, ParleyErrorKind, ParleyResult};
pub use generation::{GenerationError, GenerationErrorKind, GenerationResult};
pub use parse::{ParseError, ParseErrorKind};
pub use validation::{ValidationError, ValidationErrorKind};
