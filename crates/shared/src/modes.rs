use crate::domain::{PromptTemplate, ReadingMode};

pub const THREE_CARD: &str = "three-card";
pub const DECISION: &str = "decision";
pub const RELATIONSHIP: &str = "relationship";

static MODES: [ReadingMode; 3] = [
    ReadingMode {
        id: THREE_CARD,
        title: "Normal Reading",
        subtitle: "Past • Present • Future",
        description: "Classic three-card spread for general guidance and life insights",
        card_count: 3,
        position_labels: &["Past", "Present", "Future"],
        template: PromptTemplate::ThreeCard,
        requires_options: false,
        question_prompt: "Type in the question you want to ask in any language:",
        numbers_prompt: "Enter three different numbers to start your Tarot Cards Draw!",
    },
    ReadingMode {
        id: DECISION,
        title: "Decision Reading",
        subtitle: "Option A vs Option B",
        description: "Compare two choices to help make important decisions",
        card_count: 2,
        position_labels: &["Option 1", "Option 2"],
        template: PromptTemplate::Decision,
        requires_options: true,
        question_prompt: "What decision are you trying to make?",
        numbers_prompt: "Choose numbers for your decision reading:",
    },
    ReadingMode {
        id: RELATIONSHIP,
        title: "Relationship Reading",
        subtitle: "Love & Connection Cross",
        description: "Five-card cross spread for deep relationship insights",
        card_count: 5,
        position_labels: &[
            "Past Situation",
            "Your Feelings",
            "Current Situation",
            "Their Feelings",
            "Future Development",
        ],
        template: PromptTemplate::Relationship,
        requires_options: false,
        question_prompt: "What would you like to know about your relationship?",
        numbers_prompt: "Enter five different numbers for your relationship reading:",
    },
];

pub fn catalog() -> &'static [ReadingMode] {
    &MODES
}

pub fn find(id: &str) -> Option<&'static ReadingMode> {
    MODES.iter().find(|mode| mode.id == id)
}

/// Mode used when a caller does not pick one.
pub fn default_mode() -> &'static ReadingMode {
    &MODES[0]
}
