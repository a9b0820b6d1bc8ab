//! Model families, output parsers and inference backends for Parley.
//!
//! A [`ModelFamily`] knows how its models delimit chat turns. The same
//! [`TurnGrammar`] renders a conversation into prompt text and parses the
//! model's raw output back into a conversation. [`ParserRegistry`] picks the
//! [`OutputParser`] for a model id and falls back to passthrough for unknown
//! models.
//!
//! [`ChatBackend`] is the blocking generation call the scheduler serializes.
//! [`HuggingFaceBackend`] implements it over HTTP.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod backend;
mod family;
mod grammar;
mod huggingface;
mod parser;

pub use backend::ChatBackend;
pub use family::ModelFamily;
pub use grammar::TurnGrammar;
pub use huggingface::{
    GeneratedText, GenerationDetails, HuggingFaceBackend, HuggingFaceConfig, HuggingFaceConfigBuilder,
    HuggingFaceParameters, HuggingFaceRequest, HuggingFaceResponse,
};
pub use parser::{KNOWN_MODELS, OutputParser, ParserRegistry};
