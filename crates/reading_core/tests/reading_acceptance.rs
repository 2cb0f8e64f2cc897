use std::sync::Arc;

use async_trait::async_trait;
use reading_core::{
    CardLookup, NarrativeError, NarrativeGenerator, ReadingOrchestrator, FALLBACK_NARRATIVE,
};
use shared::{
    domain::{CardIndex, CardRecord},
    modes,
    protocol::{NarrativePrompt, ReadingRequest},
};
use storage::Storage;
use tokio::sync::Mutex;

#[derive(Default)]
struct RecordingNarrator {
    prompts: Mutex<Vec<NarrativePrompt>>,
}

#[async_trait]
impl NarrativeGenerator for RecordingNarrator {
    async fn generate(&self, prompt: &NarrativePrompt) -> Result<String, NarrativeError> {
        self.prompts.lock().await.push(prompt.clone());
        Ok("The cross speaks of patience.".to_string())
    }
}

#[tokio::test]
async fn relationship_reading_resolves_names_from_card_table() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.seed_standard_deck().await.expect("seed");

    let narrator = Arc::new(RecordingNarrator::default());
    let orchestrator = ReadingOrchestrator::new(Arc::new(storage.clone()), narrator.clone());

    let reading = orchestrator
        .produce_reading_to_completion(ReadingRequest::new(
            modes::RELATIONSHIP,
            "Is this the right person for me?",
            [11, 222, 3333, 44444, 55555],
            2120,
        ))
        .await
        .expect("reading");

    assert_eq!(reading.cards.len(), 5);
    for card in &reading.cards {
        let stored = storage
            .card(card.index)
            .await
            .expect("lookup")
            .expect("seeded row");
        assert_eq!(card.name, stored.name);
    }
    let positions: Vec<&str> = reading.cards.iter().map(|c| c.position.as_str()).collect();
    assert_eq!(
        positions,
        vec![
            "Past Situation",
            "Your Feelings",
            "Current Situation",
            "Their Feelings",
            "Future Development"
        ]
    );
    assert_eq!(
        reading.narrative.as_deref(),
        Some("The cross speaks of patience.")
    );
    assert_eq!(narrator.prompts.lock().await.len(), 1);
}

#[tokio::test]
async fn empty_card_table_still_completes_reading() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let orchestrator = ReadingOrchestrator::new(
        Arc::new(storage),
        Arc::new(reading_core::MissingNarrativeGenerator),
    );

    let reading = orchestrator
        .produce_reading_to_completion(ReadingRequest::three_card("abc", [10, 20, 30], 2024))
        .await
        .expect("reading");

    let names: Vec<&str> = reading.cards.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Card 37", "Card 74", "Card 111"]);
    assert_eq!(reading.narrative.as_deref(), Some(FALLBACK_NARRATIVE));
    assert!(!reading.loading);
}

#[tokio::test]
async fn imported_meanings_reach_the_prompt() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage
        .import_cards(&[CardRecord {
            index: CardIndex(37),
            name: "Two of Cups".into(),
            meaning: Some("Partnership, mutual attraction".into()),
        }])
        .await
        .expect("import");

    let lookup: Arc<dyn CardLookup> = Arc::new(storage);
    let narrator = Arc::new(RecordingNarrator::default());
    let orchestrator = ReadingOrchestrator::new(lookup, narrator.clone());

    let reading = orchestrator
        .produce_reading_to_completion(ReadingRequest::three_card("abc", [10, 20, 30], 2024))
        .await
        .expect("reading");

    assert_eq!(
        reading.cards[0].meaning.as_deref(),
        Some("Partnership, mutual attraction")
    );
    let prompts = narrator.prompts.lock().await;
    assert!(prompts[0]
        .user
        .contains("- Past: Two of Cups (traditional meaning: Partnership, mutual attraction)"));
}
