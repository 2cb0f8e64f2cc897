//! Built-in card names for the 156-row table: 78 upright cards followed by the
//! same 78 reversed.

use crate::{
    domain::{CardIndex, CardRecord},
    draw::DECK_SIZE,
};

const MAJOR_ARCANA: [&str; 22] = [
    "The Fool",
    "The Magician",
    "The High Priestess",
    "The Empress",
    "The Emperor",
    "The Hierophant",
    "The Lovers",
    "The Chariot",
    "Strength",
    "The Hermit",
    "Wheel of Fortune",
    "Justice",
    "The Hanged Man",
    "Death",
    "Temperance",
    "The Devil",
    "The Tower",
    "The Star",
    "The Moon",
    "The Sun",
    "Judgement",
    "The World",
];

const SUITS: [&str; 4] = ["Wands", "Cups", "Swords", "Pentacles"];

const RANKS: [&str; 14] = [
    "Ace", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Page",
    "Knight", "Queen", "King",
];

pub const UPRIGHT_CARDS: usize = MAJOR_ARCANA.len() + SUITS.len() * RANKS.len();

fn upright_name(position: usize) -> String {
    if position < MAJOR_ARCANA.len() {
        return MAJOR_ARCANA[position].to_string();
    }
    let minor = position - MAJOR_ARCANA.len();
    format!("{} of {}", RANKS[minor % RANKS.len()], SUITS[minor / RANKS.len()])
}

/// Name of the built-in card at `index`, or `None` outside the table.
pub fn card_name(index: CardIndex) -> Option<String> {
    let position = usize::try_from(index.0).ok()?;
    if position >= DECK_SIZE as usize {
        return None;
    }
    if position < UPRIGHT_CARDS {
        Some(upright_name(position))
    } else {
        Some(format!("{} (Reversed)", upright_name(position - UPRIGHT_CARDS)))
    }
}

pub fn standard_deck() -> Vec<CardRecord> {
    (0..DECK_SIZE)
        .filter_map(|i| {
            let index = CardIndex(i);
            card_name(index).map(|name| CardRecord {
                index,
                name,
                meaning: None,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn fills_the_whole_table() {
        let deck = standard_deck();
        assert_eq!(deck.len(), DECK_SIZE as usize);
        let names: HashSet<_> = deck.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names.len(), deck.len());
    }

    #[test]
    fn orders_majors_then_suits_then_reversals() {
        assert_eq!(card_name(CardIndex(0)).as_deref(), Some("The Fool"));
        assert_eq!(card_name(CardIndex(22)).as_deref(), Some("Ace of Wands"));
        assert_eq!(card_name(CardIndex(77)).as_deref(), Some("King of Pentacles"));
        assert_eq!(
            card_name(CardIndex(78)).as_deref(),
            Some("The Fool (Reversed)")
        );
        assert_eq!(card_name(CardIndex(156)), None);
        assert_eq!(card_name(CardIndex(-1)), None);
    }
}
