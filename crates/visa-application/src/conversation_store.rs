use std::sync::Arc;

use tokio::sync::watch;
use visa_core::analysis::{AnalyzeResult, Analyzer};
use visa_core::conversation::{Attachment, ConversationState, FALLBACK_REPLY, Message, classify};

/// Owns the conversation state and drives exchanges with the analyzer.
///
/// `ConversationStore` is the only writer of [`ConversationState`]:
/// - `submit_turn` is the single mutation entry point
/// - `snapshot` and `subscribe` give front ends read-only views
///
/// Each state change is applied in one `send_modify` call, so observers
/// never see half of an update. Overlapping `submit_turn` calls are allowed;
/// their replies are applied in completion order, and the last one to
/// complete decides `is_loading` and the derived fields.
pub struct ConversationStore<A: Analyzer> {
    analyzer: A,
    state: watch::Sender<ConversationState>,
}

impl<A: Analyzer> ConversationStore<A> {
    /// Creates a store with an empty conversation.
    pub fn new(analyzer: A) -> Self {
        let (state, _) = watch::channel(ConversationState::new());
        Self { analyzer, state }
    }

    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> ConversationState {
        self.state.borrow().clone()
    }

    /// Returns a receiver notified after every state change.
    pub fn subscribe(&self) -> watch::Receiver<ConversationState> {
        self.state.subscribe()
    }

    /// Submits one user turn and waits for the assistant's reply.
    ///
    /// Callers must only submit turns with non-empty content or a file.
    /// Failures reported by the analyzer are turned into a fallback
    /// assistant message and never returned.
    pub async fn submit_turn(&self, content: impl Into<String>, file: Option<Attachment>) {
        let content = content.into();
        let file = file.map(Arc::new);

        self.state.send_modify(|state| {
            state.messages.push(Message::user(content.clone(), file.clone()));
            state.is_loading = true;
        });

        let mut guard = LoadingGuard::new(&self.state);
        let outcome = self.analyzer.analyze(&content, file).await;

        self.state.send_modify(|state| {
            match outcome {
                Ok(result) => apply_result(state, result),
                Err(err) => {
                    tracing::error!("Error processing message: {}", err);
                    state.messages.push(Message::assistant(FALLBACK_REPLY));
                    state.clear_derived();
                }
            }
            state.is_loading = false;
        });
        guard.disarm();
    }
}

fn apply_result(state: &mut ConversationState, result: AnalyzeResult) {
    let status = result.status();
    let reply = result.into_reply();

    let requirement = classify(status, &reply.message);
    tracing::debug!(%status, ?requirement, "Applying analyzer reply");

    state.messages.push(Message::assistant(reply.message));
    state.passport_country = reply.passport_country;
    state.destination_country = reply.destination_country;
    state.detected_passport = reply.detected_passport;
    state.detected_destination = reply.detected_destination;
    state.visa_requirement = requirement;
}

/// Resets `is_loading` if a `submit_turn` future is dropped mid-flight.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<ConversationState>,
    armed: bool,
}

impl<'a> LoadingGuard<'a> {
    fn new(state: &'a watch::Sender<ConversationState>) -> Self {
        Self { state, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!("Turn dropped before the analyzer replied");
            self.state.send_modify(|state| state.is_loading = false);
        }
    }
}
