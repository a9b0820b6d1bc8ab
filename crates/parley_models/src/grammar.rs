//! Delimiter grammars for chat-formatted model output.

use parley_core::{Message, ParsedResult};
use parley_error::{ParseError, ParseErrorKind};
use regex::Regex;

/// How one model family marks turns in its prompts and output.
///
/// A turn is rendered as `header_open + role + header_close + content + turn_end`.
/// Parsing runs `turn` over the raw output: capture group 1 of each match is one
/// turn, whose first line is the role label and whose remaining lines are the
/// content.
#[derive(Debug)]
pub struct TurnGrammar {
    /// Family name used in logs and errors
    pub(crate) name: &'static str,
    /// Matches a whole turn; group 1 holds label and content
    pub(crate) turn: Regex,
    /// Marker characters stripped from both ends of a role label
    pub(crate) role_trim: &'static [char],
    /// Text before the role label
    pub(crate) header_open: &'static str,
    /// Text between the role label and the content
    pub(crate) header_close: &'static str,
    /// Text closing a turn
    pub(crate) turn_end: &'static str,
}

impl TurnGrammar {
    /// Family name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Turn terminator without trailing whitespace, as a model emits it.
    pub fn end_marker(&self) -> &'static str {
        self.turn_end.trim_end()
    }

    /// Renders a conversation as a prompt that ends with an open assistant turn.
    pub fn render(&self, conversation: &[Message]) -> String {
        let mut prompt = String::new();
        for message in conversation {
            self.push_header(&mut prompt, message.role());
            prompt.push_str(message.content());
            prompt.push_str(self.turn_end);
        }
        self.push_header(&mut prompt, "assistant");
        prompt
    }

    fn push_header(&self, prompt: &mut String, role: &str) {
        prompt.push_str(self.header_open);
        prompt.push_str(role);
        prompt.push_str(self.header_close);
    }

    /// Recovers the turns in `raw`.
    ///
    /// # Errors
    ///
    /// [`ParseErrorKind::NoOutputData`] when no turn with a role label is found.
    pub fn parse(&self, raw: &str) -> Result<ParsedResult, ParseError> {
        let turns: Vec<Message> = self
            .turn
            .captures_iter(raw)
            .filter_map(|captures| captures.get(1))
            .filter_map(|span| self.split_turn(span.as_str()))
            .collect();

        tracing::trace!(family = self.name, turns = turns.len(), "Parsed model output");
        ParsedResult::from_turns(turns).ok_or_else(|| {
            ParseError::new(ParseErrorKind::NoOutputData {
                family: self.name.to_string(),
                raw_len: raw.len(),
            })
        })
    }

    fn split_turn(&self, span: &str) -> Option<Message> {
        let span = span.trim_start();
        let (label, content) = span.split_once('\n').unwrap_or((span, ""));
        let role = label.trim_matches(self.role_trim);
        if role.is_empty() {
            tracing::debug!(family = self.name, "Skipping turn without a role label");
            return None;
        }
        Some(Message::new(role, content.trim()))
    }
}
