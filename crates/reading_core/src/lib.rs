use std::{future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;
use futures::future::join_all;
use shared::{
    domain::{CardIndex, CardRecord, Reading, ReadingId, ReadingMode, ResolvedCard},
    draw::draw_for_mode,
    error::ReadingError,
    protocol::{NarrativePrompt, ReadingRequest},
};
use tokio::sync::watch;
use tracing::{info, info_span, warn, Instrument};

pub mod error;
mod handle;
pub mod lookup;
pub mod narrative;
pub mod prompts;
pub mod validation;

pub use error::{LookupError, NarrativeError};
pub use handle::ReadingHandle;
pub use lookup::BuiltinDeck;
pub use narrative::{MissingNarrativeGenerator, OpenAiNarrativeClient};
pub use prompts::FALLBACK_NARRATIVE;

use prompts::PromptContext;
use validation::ValidatedReading;

pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

#[async_trait]
pub trait CardLookup: Send + Sync {
    /// `Ok(None)` when the table has no row for `index`.
    async fn card(&self, index: CardIndex) -> Result<Option<CardRecord>, LookupError>;
}

#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn generate(&self, prompt: &NarrativePrompt) -> Result<String, NarrativeError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorSettings {
    pub max_tokens: u32,
    pub temperature: f32,
    pub lookup_timeout: Option<Duration>,
    pub narrative_timeout: Option<Duration>,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            lookup_timeout: None,
            narrative_timeout: None,
        }
    }
}

#[derive(Clone)]
pub struct ReadingOrchestrator {
    lookup: Arc<dyn CardLookup>,
    narrator: Arc<dyn NarrativeGenerator>,
    settings: OrchestratorSettings,
}

impl ReadingOrchestrator {
    pub fn new(lookup: Arc<dyn CardLookup>, narrator: Arc<dyn NarrativeGenerator>) -> Self {
        Self::with_settings(lookup, narrator, OrchestratorSettings::default())
    }

    pub fn with_settings(
        lookup: Arc<dyn CardLookup>,
        narrator: Arc<dyn NarrativeGenerator>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            lookup,
            narrator,
            settings,
        }
    }

    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    /// Validates and draws, then starts the lookup and narrative work on its own
    /// Tokio task. Validation and domain errors never start a task. Must be
    /// awaited inside a Tokio runtime.
    pub async fn produce_reading(
        &self,
        request: ReadingRequest,
    ) -> Result<ReadingHandle, ReadingError> {
        let plan = validation::validate(&request)?;
        let indices = draw_for_mode(plan.mode, &plan.seed)?;

        let id = ReadingId::new();
        let reading = Reading::pending(id, plan.mode, plan.question.clone(), plan.options.clone());
        let (updates_tx, updates_rx) = watch::channel(reading);

        info!(
            reading_id = %id,
            mode = plan.mode.id,
            cards = indices.len(),
            "reading: started"
        );

        let this = self.clone();
        let span = info_span!("reading", reading_id = %id, mode = plan.mode.id);
        let task = tokio::spawn(async move { this.run(plan, indices, updates_tx).await }.instrument(span));

        Ok(ReadingHandle::new(id, updates_rx, task))
    }

    pub async fn produce_reading_to_completion(
        &self,
        request: ReadingRequest,
    ) -> Result<Reading, ReadingError> {
        Ok(self.produce_reading(request).await?.wait().await)
    }

    async fn run(
        &self,
        plan: ValidatedReading,
        indices: Vec<CardIndex>,
        updates: watch::Sender<Reading>,
    ) {
        let cards = self.resolve_cards(plan.mode, &indices).await;
        updates.send_modify(|reading| reading.cards = cards.clone());

        let prompt = prompts::build_prompt(
            &PromptContext {
                mode: plan.mode,
                question: &plan.question,
                cards: &cards,
                options: plan.options.as_ref(),
            },
            self.settings.max_tokens,
            self.settings.temperature,
        );

        let narrative = match self.generate(&prompt).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!("reading: narrative service returned blank text, using fallback");
                FALLBACK_NARRATIVE.to_string()
            }
            Err(error) => {
                warn!(%error, "reading: narrative generation failed, using fallback");
                FALLBACK_NARRATIVE.to_string()
            }
        };

        updates.send_modify(|reading| {
            reading.narrative = Some(narrative);
            reading.loading = false;
        });
        info!("reading: complete");
    }

    async fn resolve_cards(&self, mode: &ReadingMode, indices: &[CardIndex]) -> Vec<ResolvedCard> {
        let lookups = indices
            .iter()
            .zip(mode.position_labels.iter())
            .map(|(&index, &position)| async move {
                let record = match self.lookup_card(index).await {
                    Ok(record) => record,
                    Err(error) => {
                        warn!(%index, %error, "reading: card lookup failed, using fallback name");
                        None
                    }
                };
                match record {
                    Some(record) => ResolvedCard {
                        index,
                        name: record.name,
                        position: position.to_string(),
                        meaning: record.meaning,
                    },
                    None => ResolvedCard {
                        index,
                        name: ResolvedCard::fallback_name(index),
                        position: position.to_string(),
                        meaning: None,
                    },
                }
            });
        join_all(lookups).await
    }

    async fn lookup_card(&self, index: CardIndex) -> Result<Option<CardRecord>, LookupError> {
        with_timeout(self.settings.lookup_timeout, self.lookup.card(index), LookupError::Timeout).await
    }

    async fn generate(&self, prompt: &NarrativePrompt) -> Result<String, NarrativeError> {
        with_timeout(
            self.settings.narrative_timeout,
            self.narrator.generate(prompt),
            NarrativeError::Timeout,
        )
        .await
    }
}

async fn with_timeout<T, E>(
    limit: Option<Duration>,
    call: impl Future<Output = Result<T, E>>,
    on_timeout: impl FnOnce(Duration) -> E,
) -> Result<T, E> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .unwrap_or_else(|_| Err(on_timeout(limit))),
        None => call.await,
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
