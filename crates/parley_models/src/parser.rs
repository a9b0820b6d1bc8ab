//! Output parser selection by model identifier.

use crate::ModelFamily;
use parley_core::{Message, ParsedResult};
use parley_error::ParseError;
use std::collections::HashMap;
use std::fmt;

/// Model ids whose family is known out of the box.
pub const KNOWN_MODELS: &[(&str, ModelFamily)] = &[
    ("HuggingFaceTB/SmolLM-1.7B-Instruct", ModelFamily::SmolLm),
    ("TinyLlama/TinyLlama-1.1B-Chat-v1.0", ModelFamily::TinyLlama),
];

/// Turns raw model output into a [`ParsedResult`], and conversations into prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputParser {
    /// Parse with a family's delimiter grammar.
    Family(ModelFamily),
    /// No known grammar: the raw text is the response.
    Passthrough,
}

impl OutputParser {
    /// Parses raw model output.
    ///
    /// # Errors
    ///
    /// Family parsers fail when the output holds no delimited turn. The passthrough
    /// parser never fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use parley_models::{ModelFamily, OutputParser};
    ///
    /// let raw = "<|im_start|>user\nHi<|im_end|><|im_start|>assistant\nHello!<|im_end|>";
    /// let parsed = OutputParser::Family(ModelFamily::SmolLm).parse(raw).unwrap();
    /// assert_eq!(parsed.response(), "Hello!");
    /// assert_eq!(parsed.conversation().len(), 2);
    /// ```
    pub fn parse(&self, raw: &str) -> Result<ParsedResult, ParseError> {
        match self {
            OutputParser::Family(family) => family.grammar().parse(raw),
            OutputParser::Passthrough => Ok(ParsedResult::passthrough(raw)),
        }
    }

    /// The marker that closes a model turn, if this parser needs one.
    pub fn end_marker(&self) -> Option<&'static str> {
        match self {
            OutputParser::Family(family) => Some(family.grammar().end_marker()),
            OutputParser::Passthrough => None,
        }
    }

    /// Renders a conversation as prompt text for the backend.
    pub fn render(&self, conversation: &[Message]) -> String {
        match self {
            OutputParser::Family(family) => family.grammar().render(conversation),
            OutputParser::Passthrough => {
                let mut prompt: String = conversation
                    .iter()
                    .map(|m| format!("{}: {}\n", m.role(), m.content()))
                    .collect();
                prompt.push_str("assistant:");
                prompt
            }
        }
    }
}

impl fmt::Display for OutputParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputParser::Family(family) => write!(f, "{family}"),
            OutputParser::Passthrough => write!(f, "passthrough"),
        }
    }
}

/// Maps model identifiers to output parsers.
///
/// Filled at start-up and only read afterwards, so it can be shared freely.
#[derive(Debug, Clone)]
pub struct ParserRegistry {
    families: HashMap<String, ModelFamily>,
}

impl ParserRegistry {
    /// A registry that knows no model.
    pub fn empty() -> Self {
        Self {
            families: HashMap::new(),
        }
    }

    /// Registers (or overrides) the family of a model id.
    pub fn register(mut self, model_id: impl Into<String>, family: ModelFamily) -> Self {
        self.families.insert(model_id.into(), family);
        self
    }

    /// The parser for `model_id`, or [`OutputParser::Passthrough`] if it is unknown.
    pub fn get_parser(&self, model_id: &str) -> OutputParser {
        match self.families.get(model_id) {
            Some(family) => OutputParser::Family(*family),
            None => {
                tracing::debug!(model_id, "No output grammar registered, using passthrough");
                OutputParser::Passthrough
            }
        }
    }
}

impl Default for ParserRegistry {
    /// A registry holding [`KNOWN_MODELS`].
    fn default() -> Self {
        KNOWN_MODELS
            .iter()
            .fold(Self::empty(), |registry, (id, family)| {
                registry.register(*id, *family)
            })
    }
}
