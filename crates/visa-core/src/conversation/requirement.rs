//! Visa requirement badge derived from analyzer replies.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::analysis::AnalysisStatus;

/// Visa category shown as a badge under the latest assistant reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum VisaRequirement {
    #[strum(serialize = "VISA EXEMPT")]
    VisaExempt,
    #[strum(serialize = "VISA ON ARRIVAL")]
    VisaOnArrival,
    #[strum(serialize = "APPLY FOR VISA OFFLINE")]
    ApplyOffline,
}

/// Keywords checked in order; the first one found wins.
const KEYWORDS: &[(&str, VisaRequirement)] = &[
    ("exempt", VisaRequirement::VisaExempt),
    ("arrival", VisaRequirement::VisaOnArrival),
    ("apply", VisaRequirement::ApplyOffline),
];

/// Derives the visa requirement from a reply.
///
/// Only `complete` replies are classified. The message is searched
/// case-insensitively for the keywords above. Returns `None` when the reply
/// is not complete or no keyword matches.
pub fn classify(status: AnalysisStatus, message: &str) -> Option<VisaRequirement> {
    if status != AnalysisStatus::Complete {
        return None;
    }

    let lowered = message.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, requirement)| *requirement)
}
