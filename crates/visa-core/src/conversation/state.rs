//! Session-scoped conversation state.

use super::message::Message;
use super::requirement::VisaRequirement;

/// Everything a front end needs to render the conversation.
///
/// Created empty at session start and only written by the conversation
/// store. `visa_requirement` and the country fields are derived from the
/// latest analyzer reply.
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    /// Turns in chronological (and display) order.
    pub messages: Vec<Message>,
    /// True while an analyzer exchange is in flight.
    pub is_loading: bool,
    pub visa_requirement: Option<VisaRequirement>,
    pub passport_country: Option<String>,
    pub destination_country: Option<String>,
    pub detected_passport: Option<String>,
    pub detected_destination: Option<String>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the first turn has been submitted.
    pub fn has_started(&self) -> bool {
        !self.messages.is_empty()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// The badge to render, if any.
    ///
    /// Shown only when the last message is an assistant reply.
    pub fn badge(&self) -> Option<VisaRequirement> {
        match self.last_message() {
            Some(message) if !message.is_user() => self.visa_requirement,
            _ => None,
        }
    }

    /// Clears every field derived from analyzer replies.
    pub fn clear_derived(&mut self) {
        self.visa_requirement = None;
        self.passport_country = None;
        self.destination_country = None;
        self.detected_passport = None;
        self.detected_destination = None;
    }
}
