use serde::{Deserialize, Serialize};

use crate::modes;

/// Raw form submission. Numbers stay as typed so validation can report
/// missing or malformed entries per field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingRequest {
    pub mode_id: String,
    pub question: String,
    pub numbers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_a: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_b: Option<String>,
    pub timestamp: i64,
}

impl ReadingRequest {
    pub fn new(
        mode_id: impl Into<String>,
        question: impl Into<String>,
        numbers: impl IntoIterator<Item = impl ToString>,
        timestamp: i64,
    ) -> Self {
        Self {
            mode_id: mode_id.into(),
            question: question.into(),
            numbers: numbers.into_iter().map(|n| n.to_string()).collect(),
            option_a: None,
            option_b: None,
            timestamp,
        }
    }

    pub fn three_card(
        question: impl Into<String>,
        numbers: impl IntoIterator<Item = impl ToString>,
        timestamp: i64,
    ) -> Self {
        Self::new(modes::THREE_CARD, question, numbers, timestamp)
    }

    pub fn with_options(mut self, option_a: impl Into<String>, option_b: impl Into<String>) -> Self {
        self.option_a = Some(option_a.into());
        self.option_b = Some(option_b.into());
        self
    }
}

/// Role-tagged message pair plus generation parameters sent to the
/// narrative service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativePrompt {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}
