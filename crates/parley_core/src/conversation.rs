//! Ordered conversation history.

use crate::Message;
use parley_error::{ValidationError, ValidationErrorKind};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Chronological sequence of messages.
///
/// Messages can only be appended. The core never reorders or prunes a
/// conversation, so slicing through [`Deref`] is read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, derive_more::From)]
#[serde(transparent)]
pub struct Conversation(Vec<Message>);

impl Conversation {
    /// Creates an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message at the end.
    pub fn push(&mut self, message: Message) {
        self.0.push(message);
    }

    /// Builder-style append.
    pub fn with(mut self, message: Message) -> Self {
        self.push(message);
        self
    }

    /// The messages in order.
    pub fn messages(&self) -> &[Message] {
        &self.0
    }

    /// Checks that the conversation is non-empty and every message has a role and
    /// content.
    ///
    /// # Errors
    ///
    /// Reports the first offending message by index.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::EmptyConversation));
        }
        for (index, message) in self.0.iter().enumerate() {
            if message.role().is_empty() {
                return Err(ValidationError::new(ValidationErrorKind::MissingRole {
                    index,
                }));
            }
            if message.content().is_empty() {
                return Err(ValidationError::new(ValidationErrorKind::MissingContent {
                    index,
                }));
            }
        }
        Ok(())
    }
}

impl Deref for Conversation {
    type Target = [Message];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<Message> for Conversation {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Conversation {
    type Item = Message;
    type IntoIter = std::vec::IntoIter<Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
