use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Row id in the card table. Valid indices lie in `0..DECK_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardIndex(pub i64);

impl fmt::Display for CardIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReadingId(pub Uuid);

impl ReadingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ReadingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReadingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Selects the prompt builder used for a mode's narrative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptTemplate {
    ThreeCard,
    Decision,
    Relationship,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadingMode {
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub description: &'static str,
    pub card_count: usize,
    pub position_labels: &'static [&'static str],
    pub template: PromptTemplate,
    pub requires_options: bool,
    pub question_prompt: &'static str,
    pub numbers_prompt: &'static str,
}

/// Everything the card index generator needs from one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedInput {
    pub timestamp: i64,
    pub question: String,
    pub numbers: Vec<i64>,
}

impl SeedInput {
    pub fn new(timestamp: i64, question: impl Into<String>, numbers: Vec<i64>) -> Self {
        Self {
            timestamp,
            question: question.into(),
            numbers,
        }
    }

    /// Question length in UTF-16 code units.
    pub fn question_len(&self) -> i64 {
        self.question.encode_utf16().count() as i64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    pub index: CardIndex,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCard {
    pub index: CardIndex,
    pub name: String,
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,
}

impl ResolvedCard {
    pub fn fallback_name(index: CardIndex) -> String {
        format!("Card {index}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionOptions {
    pub first: String,
    pub second: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    pub id: ReadingId,
    pub mode_id: String,
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<DecisionOptions>,
    pub cards: Vec<ResolvedCard>,
    pub narrative: Option<String>,
    pub loading: bool,
}

impl Reading {
    pub fn pending(
        id: ReadingId,
        mode: &ReadingMode,
        question: impl Into<String>,
        options: Option<DecisionOptions>,
    ) -> Self {
        Self {
            id,
            mode_id: mode.id.to_string(),
            question: question.into(),
            options,
            cards: Vec::new(),
            narrative: None,
            loading: true,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.loading
    }
}
