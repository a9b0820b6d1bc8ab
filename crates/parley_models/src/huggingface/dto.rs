//! Text-generation API data transfer objects.

use derive_getters::Getters;
use parley_core::GenerationOptions;
use serde::{Deserialize, Serialize};

/// Body of a text-generation request.
#[derive(Debug, Clone, Serialize, Getters)]
pub struct HuggingFaceRequest {
    /// Prompt text
    inputs: String,
    /// Sampling parameters
    parameters: HuggingFaceParameters,
}

impl HuggingFaceRequest {
    /// Creates a request for `inputs`.
    pub fn new(inputs: impl Into<String>, parameters: HuggingFaceParameters) -> Self {
        Self {
            inputs: inputs.into(),
            parameters,
        }
    }
}

/// Generation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Getters)]
pub struct HuggingFaceParameters {
    /// Maximum new tokens to generate
    max_new_tokens: u32,
    /// Temperature for sampling
    temperature: f32,
    /// Top-p sampling
    top_p: f32,
    /// Sample instead of greedy decoding
    do_sample: bool,
    /// Echo the prompt ahead of the continuation
    return_full_text: bool,
    /// Ask for generation details such as the finish reason
    details: bool,
}

impl From<&GenerationOptions> for HuggingFaceParameters {
    fn from(options: &GenerationOptions) -> Self {
        Self {
            max_new_tokens: *options.max_new_tokens(),
            temperature: *options.temperature(),
            top_p: *options.top_p(),
            do_sample: *options.do_sample(),
            return_full_text: true,
            details: true,
        }
    }
}

/// One generated sequence.
#[derive(Debug, Clone, Deserialize, Getters)]
pub struct GeneratedText {
    /// Decoded output
    generated_text: String,
    /// Present when the server honours `details`
    #[serde(default)]
    details: Option<GenerationDetails>,
}

impl GeneratedText {
    /// Consumes the sequence, keeping only its text.
    pub fn into_text(self) -> String {
        self.generated_text
    }
}

/// Generation details reported by text-generation-inference.
#[derive(Debug, Clone, Deserialize, Getters)]
pub struct GenerationDetails {
    /// `eos_token`, `length` or `stop_sequence`
    finish_reason: String,
    /// Tokens generated
    #[serde(default)]
    generated_tokens: Option<u32>,
}

impl GenerationDetails {
    /// Whether generation stopped at the token limit rather than at a turn end.
    pub fn hit_length_limit(&self) -> bool {
        self.finish_reason == "length"
    }
}

/// Response body: a bare object from text-generation-inference servers, a
/// one-element array from the hosted Inference API.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HuggingFaceResponse {
    /// `{"generated_text": ...}`
    Single(GeneratedText),
    /// `[{"generated_text": ...}]`
    Batch(Vec<GeneratedText>),
}

impl HuggingFaceResponse {
    /// The first generated sequence, if any.
    pub fn into_first(self) -> Option<GeneratedText> {
        match self {
            HuggingFaceResponse::Single(generated) => Some(generated),
            HuggingFaceResponse::Batch(batch) => batch.into_iter().next(),
        }
    }

    /// Text of the first generated sequence, if any.
    pub fn into_text(self) -> Option<String> {
        self.into_first().map(GeneratedText::into_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameters_follow_options() {
        let options = GenerationOptions::new(200, 0.6, 0.9, false);
        let json = serde_json::to_value(HuggingFaceRequest::new(
            "prompt",
            HuggingFaceParameters::from(&options),
        ))
        .unwrap();
        assert_eq!(json["inputs"], "prompt");
        assert_eq!(json["parameters"]["max_new_tokens"], 200);
        assert_eq!(json["parameters"]["do_sample"], false);
        assert_eq!(json["parameters"]["return_full_text"], true);
        assert_eq!(json["parameters"]["details"], true);
    }

    #[test]
    fn test_details_are_optional() {
        let detailed: HuggingFaceResponse = serde_json::from_str(
            r#"{"generated_text": "x", "details": {"finish_reason": "length", "generated_tokens": 500}}"#,
        )
        .unwrap();
        let details = detailed.into_first().unwrap().details.unwrap();
        assert!(details.hit_length_limit());
        assert_eq!(details.generated_tokens, Some(500));

        let bare: HuggingFaceResponse =
            serde_json::from_str(r#"[{"generated_text": "y"}]"#).unwrap();
        assert!(bare.into_first().unwrap().details.is_none());
    }

    #[test]
    fn test_response_accepts_both_shapes() {
        let single: HuggingFaceResponse =
            serde_json::from_str(r#"{"generated_text": "one"}"#).unwrap();
        let batch: HuggingFaceResponse =
            serde_json::from_str(r#"[{"generated_text": "two"}]"#).unwrap();
        let empty: HuggingFaceResponse = serde_json::from_str("[]").unwrap();
        assert_eq!(single.into_text().as_deref(), Some("one"));
        assert_eq!(batch.into_text().as_deref(), Some("two"));
        assert_eq!(empty.into_text(), None);
    }
}
