//! Ordered message history for a conversational surface

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Monotonic message identifier, unique within a log
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MessageId(u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One entry in a conversation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub text: String,
    /// Server-relative audio location, kept verbatim
    pub audio_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Transient assistant placeholder awaiting its response
    pub pending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogError {
    #[error("No placeholder with id {0}")]
    UnknownPlaceholder(MessageId),
}

/// Append-only history; the only in-place edit is resolving a placeholder.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    messages: Vec<Message>,
    next_id: u64,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        id
    }

    fn push(&mut self, role: Role, text: String, pending: bool) -> &Message {
        let id = self.allocate_id();
        self.messages.push(Message {
            id,
            role,
            text,
            audio_ref: None,
            created_at: Utc::now(),
            pending,
        });
        &self.messages[self.messages.len() - 1]
    }

    /// Append a user message. Blank text leaves the log untouched.
    pub fn append_user(&mut self, text: &str) -> Option<Message> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(self.push(Role::User, text.to_string(), false).clone())
    }

    /// Insert a waiting assistant entry to be resolved later
    pub fn append_pending_assistant(&mut self, text: &str) -> MessageId {
        self.push(Role::Assistant, text.to_string(), true).id
    }

    /// Replace the placeholder in place. Resolving an already-resolved id
    /// returns the existing message unchanged.
    pub fn resolve_assistant(
        &mut self,
        id: MessageId,
        text: &str,
        audio_ref: Option<String>,
    ) -> Result<Message, LogError> {
        let message = self
            .messages
            .iter_mut()
            .find(|m| m.id == id && m.role == Role::Assistant)
            .ok_or(LogError::UnknownPlaceholder(id))?;

        if message.pending {
            message.text = text.to_string();
            message.audio_ref = audio_ref;
            message.created_at = Utc::now();
            message.pending = false;
        }
        Ok(message.clone())
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[allow(dead_code)] // Pairs with len()
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn has_pending(&self) -> bool {
        self.messages.iter().any(|m| m.pending)
    }
}
