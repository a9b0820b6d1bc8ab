//! Structured result of a generation.

use crate::{Conversation, Message};
use serde::{Deserialize, Serialize};

/// The reply and the conversation reconstructed from raw model output.
///
/// Serializes as `{"response": ..., "conversation": [...]}`, the body of a
/// successful chat response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ParsedResult {
    /// Content of the final turn
    response: String,
    /// Every turn recovered from the output
    conversation: Conversation,
}

impl ParsedResult {
    /// Builds a result from recovered turns. The response is the last turn's content.
    ///
    /// Returns `None` when there are no turns.
    ///
    /// # Examples
    ///
    /// ```
    /// use parley_core::{Message, ParsedResult};
    ///
    /// let parsed = ParsedResult::from_turns(vec![
    ///     Message::user("Who am I?"),
    ///     Message::assistant("You are Sky."),
    /// ])
    /// .unwrap();
    /// assert_eq!(parsed.response(), "You are Sky.");
    /// ```
    pub fn from_turns(turns: Vec<Message>) -> Option<Self> {
        let response = turns.last()?.content().clone();
        Some(Self {
            response,
            conversation: Conversation::from(turns),
        })
    }

    /// Wraps raw text without assuming any structure.
    pub fn passthrough(raw: impl Into<String>) -> Self {
        Self {
            response: raw.into(),
            conversation: Conversation::new(),
        }
    }

    /// Consumes the result into its parts.
    pub fn into_parts(self) -> (String, Conversation) {
        (self.response, self.conversation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_turns_empty_is_none() {
        assert!(ParsedResult::from_turns(Vec::new()).is_none());
    }

    #[test]
    fn test_serializes_response_and_conversation() {
        let parsed = ParsedResult::from_turns(vec![Message::assistant("Hello")]).unwrap();
        let json = serde_json::to_value(&parsed).unwrap();
        assert_eq!(json["response"], "Hello");
        assert_eq!(json["conversation"][0]["role"], "assistant");
    }

    #[test]
    fn test_passthrough_has_no_turns() {
        let parsed = ParsedResult::passthrough("raw text");
        assert_eq!(parsed.response(), "raw text");
        assert!(parsed.conversation().is_empty());
    }
}
