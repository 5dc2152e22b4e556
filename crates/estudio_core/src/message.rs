//! Message types for model conversations.

use crate::{Input, Role};
use serde::{Deserialize, Serialize};

/// A multimodal message.
///
/// # Examples
///
/// ```
/// use estudio_core::{Input, Message, Role};
///
/// let message = Message::user(vec![Input::Text("Olá!".to_string())]);
/// assert_eq!(message.role, Role::User);
/// assert_eq!(message.content.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
pub struct Message {
    /// The role of the message sender
    pub role: Role,
    /// The content of the message
    pub content: Vec<Input>,
}

impl Message {
    /// A user turn carrying rendered prompt parts.
    pub fn user(content: Vec<Input>) -> Self {
        Self {
            role: Role::User,
            content,
        }
    }

    /// A system instruction.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: vec![Input::Text(text.into())],
        }
    }
}
