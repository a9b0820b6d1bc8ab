//! A single turn of a conversation.

use serde::{Deserialize, Serialize};

/// A role-labeled message.
///
/// Roles are an open set. Anything non-empty is accepted, so "system", "user",
/// "assistant" and whatever a model family invents all pass through untouched.
/// Missing fields deserialize as empty strings and are rejected by
/// [`Conversation::validate`](crate::Conversation::validate), which reports the
/// message index instead of a serde error.
///
/// # Examples
///
/// ```
/// use parley_core::Message;
///
/// let message = Message::user("Who am I?");
/// assert_eq!(message.role(), "user");
/// assert_eq!(message.content(), "Who am I?");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_getters::Getters,
)]
pub struct Message {
    /// Role of the message sender
    #[serde(default)]
    role: String,
    /// Message text
    #[serde(default)]
    content: String,
}

impl Message {
    /// Creates a message with the given role and content.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}
