use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{Notify, oneshot};
use visa_application::ConversationStore;
use visa_core::VisaError;
use visa_core::analysis::{AnalysisReply, AnalysisStatus, AnalyzeResult, Analyzer};
use visa_core::conversation::{Attachment, FALLBACK_REPLY, VisaRequirement};
use visa_core::error::Result;

// Mock analyzer that replays scripted outcomes and records every call
struct ScriptedAnalyzer {
    outcomes: Mutex<VecDeque<Result<AnalyzeResult>>>,
    calls: Mutex<Vec<(String, Option<String>)>>,
}

impl ScriptedAnalyzer {
    fn new(outcomes: Vec<Result<AnalyzeResult>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(String, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Analyzer for ScriptedAnalyzer {
    async fn analyze(&self, content: &str, file: Option<Arc<Attachment>>) -> Result<AnalyzeResult> {
        self.calls.lock().unwrap().push((
            content.to_string(),
            file.map(|f| f.file_name().to_string()),
        ));
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .expect("No scripted outcome left")
    }
}

// Mock analyzer that blocks until released
struct GatedAnalyzer {
    release: Arc<Notify>,
}

#[async_trait::async_trait]
impl Analyzer for GatedAnalyzer {
    async fn analyze(
        &self,
        _content: &str,
        _file: Option<Arc<Attachment>>,
    ) -> Result<AnalyzeResult> {
        self.release.notified().await;
        Ok(AnalyzeResult::Complete(AnalysisReply::message(
            "You are visa exempt for 90 days.",
        )))
    }
}

// Mock analyzer whose replies are delivered per message content
struct KeyedAnalyzer {
    pending: Mutex<HashMap<String, oneshot::Receiver<AnalyzeResult>>>,
}

#[async_trait::async_trait]
impl Analyzer for KeyedAnalyzer {
    async fn analyze(
        &self,
        content: &str,
        _file: Option<Arc<Attachment>>,
    ) -> Result<AnalyzeResult> {
        let receiver = self
            .pending
            .lock()
            .unwrap()
            .remove(content)
            .expect("No pending reply for content");
        receiver
            .await
            .map_err(|_| VisaError::internal("reply sender dropped"))
    }
}

fn complete(message: &str) -> Result<AnalyzeResult> {
    Ok(AnalyzeResult::Complete(AnalysisReply::message(message)))
}

#[tokio::test]
async fn test_new_store_is_empty() {
    let store = ConversationStore::new(ScriptedAnalyzer::new(vec![]));
    let state = store.snapshot();

    assert!(state.messages.is_empty());
    assert!(!state.is_loading);
    assert_eq!(state.visa_requirement, None);
    assert_eq!(state.passport_country, None);
    assert_eq!(state.destination_country, None);
}

#[tokio::test]
async fn test_each_turn_appends_user_and_assistant_messages() {
    let store = ConversationStore::new(ScriptedAnalyzer::new(vec![
        Ok(AnalyzeResult::Incomplete(AnalysisReply::message(
            "Could you clarify your destination country?",
        ))),
        Err(VisaError::transport("connection reset")),
        complete("Visa on arrival is available."),
    ]));

    store.submit_turn("I have an Indian passport", None).await;
    assert_eq!(store.snapshot().messages.len(), 2);

    store.submit_turn("Going to Thailand", None).await;
    assert_eq!(store.snapshot().messages.len(), 4);

    store.submit_turn("Thailand, please", None).await;
    let state = store.snapshot();
    assert_eq!(state.messages.len(), 6);

    let authors: Vec<bool> = state.messages.iter().map(|m| m.is_user()).collect();
    assert_eq!(authors, vec![true, false, true, false, true, false]);
    assert!(!state.is_loading);
}

#[tokio::test]
async fn test_complete_reply_derives_requirement_and_countries() {
    let store = ConversationStore::new(ScriptedAnalyzer::new(vec![Ok(AnalyzeResult::Complete(
        AnalysisReply::message("Thank you for the information. You are visa exempt for 90 days.")
            .with_countries("UNITED STATES", "JAPAN"),
    ))]));

    store.submit_turn("US passport, visiting Japan", None).await;
    let state = store.snapshot();

    assert_eq!(
        state.messages[1].content(),
        "Thank you for the information. You are visa exempt for 90 days."
    );
    assert_eq!(state.visa_requirement, Some(VisaRequirement::VisaExempt));
    assert_eq!(state.badge(), Some(VisaRequirement::VisaExempt));
    assert_eq!(state.passport_country.as_deref(), Some("UNITED STATES"));
    assert_eq!(state.destination_country.as_deref(), Some("JAPAN"));
}

#[tokio::test]
async fn test_classification_scenarios() {
    let cases = [
        (
            AnalysisStatus::Complete,
            "You are visa exempt for 90 days.",
            Some(VisaRequirement::VisaExempt),
        ),
        (
            AnalysisStatus::Complete,
            "Visa on arrival is available.",
            Some(VisaRequirement::VisaOnArrival),
        ),
        (
            AnalysisStatus::Complete,
            "Please apply for a visa at the embassy.",
            Some(VisaRequirement::ApplyOffline),
        ),
        (AnalysisStatus::Incomplete, "What is your destination?", None),
        (AnalysisStatus::Complete, "Unclear, please provide passport.", None),
    ];

    for (status, message, expected) in cases {
        let store = ConversationStore::new(ScriptedAnalyzer::new(vec![Ok(
            AnalyzeResult::from_parts(status, AnalysisReply::message(message)),
        )]));
        store.submit_turn("hello", None).await;
        assert_eq!(store.snapshot().visa_requirement, expected, "message: {message}");
    }
}

#[tokio::test]
async fn test_incomplete_reply_clears_previous_requirement() {
    let store = ConversationStore::new(ScriptedAnalyzer::new(vec![
        Ok(AnalyzeResult::Complete(
            AnalysisReply::message("Please apply for a visa at the embassy.")
                .with_countries("INDIA", "FRANCE"),
        )),
        Ok(AnalyzeResult::Incomplete(AnalysisReply {
            message: "Could you clarify your destination country?".into(),
            detected_passport: Some("INDIA".into()),
            ..AnalysisReply::default()
        })),
    ]));

    store.submit_turn("India to France", None).await;
    assert_eq!(store.snapshot().visa_requirement, Some(VisaRequirement::ApplyOffline));

    store.submit_turn("What about somewhere else?", None).await;
    let state = store.snapshot();
    assert_eq!(state.visa_requirement, None);
    assert_eq!(state.passport_country, None);
    assert_eq!(state.destination_country, None);
    assert_eq!(state.detected_passport.as_deref(), Some("INDIA"));
}

#[tokio::test]
async fn test_server_error_reply_is_shown_as_assistant_turn() {
    let store = ConversationStore::new(ScriptedAnalyzer::new(vec![Ok(AnalyzeResult::error(
        "An internal server error occurred",
    ))]));

    store.submit_turn("hello", None).await;
    let state = store.snapshot();

    assert_eq!(state.messages.len(), 2);
    assert_eq!(state.messages[1].content(), "An internal server error occurred");
    assert_eq!(state.visa_requirement, None);
}

#[tokio::test]
async fn test_analyzer_failure_appends_fallback_and_clears_fields() {
    let store = ConversationStore::new(ScriptedAnalyzer::new(vec![
        Ok(AnalyzeResult::Complete(
            AnalysisReply::message("Visa on arrival is available.")
                .with_countries("INDIA", "NEPAL"),
        )),
        Err(VisaError::transport("Analyzer request failed: connection refused")),
    ]));

    store.submit_turn("India to Nepal", None).await;
    store.submit_turn("Thanks", None).await;
    let state = store.snapshot();

    let fallbacks = state
        .messages
        .iter()
        .filter(|m| m.content() == FALLBACK_REPLY)
        .count();
    assert_eq!(fallbacks, 1);
    assert_eq!(state.messages.len(), 4);
    assert!(!state.messages[3].is_user());
    assert_eq!(state.messages[3].content(), FALLBACK_REPLY);
    assert_eq!(state.visa_requirement, None);
    assert_eq!(state.passport_country, None);
    assert_eq!(state.destination_country, None);
    assert!(!state.is_loading);
}

#[tokio::test]
async fn test_turn_with_file_is_forwarded() {
    let store = ConversationStore::new(ScriptedAnalyzer::new(vec![Ok(AnalyzeResult::Incomplete(
        AnalysisReply::message("Could you clarify your destination country?"),
    ))]));
    let file = Attachment::new("passport.jpg", "image/jpeg", vec![0xff, 0xd8, 0xff]);

    store.submit_turn("", Some(file)).await;

    let state = store.snapshot();
    let user_message = &state.messages[0];
    assert!(user_message.is_user());
    assert_eq!(user_message.content(), "");
    assert_eq!(user_message.file().unwrap().file_name(), "passport.jpg");
    assert!(state.messages[1].file().is_none());

    assert_eq!(
        store.analyzer().calls(),
        vec![(String::new(), Some("passport.jpg".to_string()))]
    );
}

#[tokio::test]
async fn test_loading_flag_tracks_in_flight_exchange() {
    let release = Arc::new(Notify::new());
    let store = Arc::new(ConversationStore::new(GatedAnalyzer {
        release: Arc::clone(&release),
    }));
    let mut updates = store.subscribe();

    let task = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.submit_turn("UK to Japan", None).await })
    };

    let in_flight = updates.wait_for(|state| state.is_loading).await.unwrap().clone();
    assert_eq!(in_flight.messages.len(), 1);
    assert!(in_flight.messages[0].is_user());

    release.notify_one();
    task.await.unwrap();

    let state = store.snapshot();
    assert!(!state.is_loading);
    assert_eq!(state.messages.len(), 2);
    assert_eq!(state.visa_requirement, Some(VisaRequirement::VisaExempt));
}

#[tokio::test]
async fn test_dropped_turn_does_not_leave_loading_set() {
    let store = ConversationStore::new(GatedAnalyzer {
        release: Arc::new(Notify::new()),
    });

    let outcome = tokio::time::timeout(
        Duration::from_millis(20),
        store.submit_turn("never answered", None),
    )
    .await;

    assert!(outcome.is_err());
    let state = store.snapshot();
    assert!(!state.is_loading);
    assert_eq!(state.messages.len(), 1);
}

#[tokio::test]
async fn test_overlapping_turns_apply_in_completion_order() {
    let (first_tx, first_rx) = oneshot::channel();
    let (second_tx, second_rx) = oneshot::channel();
    let analyzer = KeyedAnalyzer {
        pending: Mutex::new(HashMap::from([
            ("first".to_string(), first_rx),
            ("second".to_string(), second_rx),
        ])),
    };
    let store = Arc::new(ConversationStore::new(analyzer));
    let mut updates = store.subscribe();

    let first = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.submit_turn("first", None).await })
    };
    updates.wait_for(|state| state.messages.len() == 1).await.unwrap();

    let second = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.submit_turn("second", None).await })
    };
    updates.wait_for(|state| state.messages.len() == 2).await.unwrap();

    second_tx
        .send(AnalyzeResult::Complete(AnalysisReply::message("Visa on arrival is available.")))
        .unwrap();
    second.await.unwrap();
    assert!(!store.snapshot().is_loading);

    first_tx
        .send(AnalyzeResult::Complete(AnalysisReply::message("Please apply at the embassy.")))
        .unwrap();
    first.await.unwrap();

    let state = store.snapshot();
    let contents: Vec<&str> = state.messages.iter().map(|m| m.content()).collect();
    assert_eq!(
        contents,
        vec![
            "first",
            "second",
            "Visa on arrival is available.",
            "Please apply at the embassy."
        ]
    );
    // The last completion decides the derived fields.
    assert_eq!(state.visa_requirement, Some(VisaRequirement::ApplyOffline));
    assert!(!state.is_loading);
}
