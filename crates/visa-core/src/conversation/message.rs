//! Conversation message types.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::attachment::Attachment;

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageAuthor {
    /// Message typed (or uploaded) by the human.
    User,
    /// Reply produced by the analyzer.
    Assistant,
}

/// A single turn in the conversation history.
///
/// Messages are immutable once created: fields are only reachable through
/// accessors, and the id and timestamp are assigned at construction.
#[derive(Debug, Clone)]
pub struct Message {
    id: Uuid,
    content: String,
    author: MessageAuthor,
    timestamp: DateTime<Utc>,
    file: Option<Arc<Attachment>>,
}

impl Message {
    /// Creates a user-authored message.
    pub fn user(content: impl Into<String>, file: Option<Arc<Attachment>>) -> Self {
        Self::new(content, MessageAuthor::User, file)
    }

    /// Creates an assistant-authored message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(content, MessageAuthor::Assistant, None)
    }

    fn new(
        content: impl Into<String>,
        author: MessageAuthor,
        file: Option<Arc<Attachment>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            author,
            timestamp: Utc::now(),
            file,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn author(&self) -> MessageAuthor {
        self.author
    }

    pub fn is_user(&self) -> bool {
        self.author == MessageAuthor::User
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn file(&self) -> Option<&Arc<Attachment>> {
        self.file.as_ref()
    }
}
