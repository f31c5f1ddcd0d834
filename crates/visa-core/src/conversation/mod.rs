//! Conversation domain module.
//!
//! # Module Structure
//!
//! - `message`: Conversation turns (`Message`, `MessageAuthor`)
//! - `attachment`: Uploaded documents (`Attachment`)
//! - `requirement`: Visa badge and its derivation (`VisaRequirement`, `classify`)
//! - `state`: Session-scoped state rendered by front ends (`ConversationState`)

mod attachment;
mod message;
mod requirement;
mod state;

// Re-export public API
pub use attachment::{ACCEPTED_EXTENSIONS, Attachment};
pub use message::{Message, MessageAuthor};
pub use requirement::{VisaRequirement, classify};
pub use state::ConversationState;

/// Assistant text appended when an exchange fails outright.
pub const FALLBACK_REPLY: &str =
    "I apologize, but I encountered an error processing your request. Could you please try again?";
