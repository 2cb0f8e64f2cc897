use async_trait::async_trait;
use shared::{
    deck,
    domain::{CardIndex, CardRecord},
};
use storage::Storage;

use crate::{error::LookupError, CardLookup};

#[async_trait]
impl CardLookup for Storage {
    async fn card(&self, index: CardIndex) -> Result<Option<CardRecord>, LookupError> {
        Storage::card(self, index)
            .await
            .map_err(|e| LookupError::Store(format!("{e:#}")))
    }
}

/// Card names compiled into the binary, for running without a card table.
pub struct BuiltinDeck;

#[async_trait]
impl CardLookup for BuiltinDeck {
    async fn card(&self, index: CardIndex) -> Result<Option<CardRecord>, LookupError> {
        Ok(deck::card_name(index).map(|name| CardRecord {
            index,
            name,
            meaning: None,
        }))
    }
}
