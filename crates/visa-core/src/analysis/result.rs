//! Normalized analyzer results.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Outcome category reported by the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AnalysisStatus {
    /// The assistant is still asking clarifying questions.
    Incomplete,
    /// Enough information was gathered to state a visa requirement.
    Complete,
    /// The analyzer (or the exchange with it) failed.
    Error,
}

/// Payload carried by every [`AnalyzeResult`] variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReply {
    /// Assistant reply text.
    pub message: String,
    pub passport_country: Option<String>,
    pub destination_country: Option<String>,
    /// Passport country recognised so far while the conversation is incomplete.
    pub detected_passport: Option<String>,
    /// Destination recognised so far while the conversation is incomplete.
    pub detected_destination: Option<String>,
}

impl AnalysisReply {
    /// Reply with only a message and no country information.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_countries(
        mut self,
        passport_country: impl Into<String>,
        destination_country: impl Into<String>,
    ) -> Self {
        self.passport_country = Some(passport_country.into());
        self.destination_country = Some(destination_country.into());
        self
    }
}

/// Result of one exchange with the analyzer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyzeResult {
    Incomplete(AnalysisReply),
    Complete(AnalysisReply),
    Error(AnalysisReply),
}

impl AnalyzeResult {
    /// Builds a result from a status and its reply.
    pub fn from_parts(status: AnalysisStatus, reply: AnalysisReply) -> Self {
        match status {
            AnalysisStatus::Incomplete => Self::Incomplete(reply),
            AnalysisStatus::Complete => Self::Complete(reply),
            AnalysisStatus::Error => Self::Error(reply),
        }
    }

    /// An error result carrying only a description.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(AnalysisReply::message(message))
    }

    pub fn status(&self) -> AnalysisStatus {
        match self {
            Self::Incomplete(_) => AnalysisStatus::Incomplete,
            Self::Complete(_) => AnalysisStatus::Complete,
            Self::Error(_) => AnalysisStatus::Error,
        }
    }

    pub fn reply(&self) -> &AnalysisReply {
        match self {
            Self::Incomplete(reply) | Self::Complete(reply) | Self::Error(reply) => reply,
        }
    }

    pub fn into_reply(self) -> AnalysisReply {
        match self {
            Self::Incomplete(reply) | Self::Complete(reply) | Self::Error(reply) => reply,
        }
    }

    pub fn message(&self) -> &str {
        &self.reply().message
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}
