//! Deterministic card selection.
//!
//! Every candidate is `(base * timestamp * question_len + counter) mod DECK_SIZE`.
//! One counter runs across all slots starting at 1 and advances on every
//! evaluation, including rejected duplicates, so a retry in one slot shifts the
//! starting point of the next.

use std::collections::HashSet;

use chrono::{Datelike, Timelike};

use crate::{
    domain::{CardIndex, ReadingMode, SeedInput},
    error::ReadingError,
};

pub const DECK_SIZE: i64 = 156;

pub fn draw_for_mode(mode: &ReadingMode, seed: &SeedInput) -> Result<Vec<CardIndex>, ReadingError> {
    draw_cards(mode.card_count, seed)
}

pub fn draw_cards(card_count: usize, seed: &SeedInput) -> Result<Vec<CardIndex>, ReadingError> {
    if card_count >= DECK_SIZE as usize {
        return Err(ReadingError::ExhaustedDomain {
            requested: card_count,
            available: DECK_SIZE as usize,
        });
    }
    if card_count > 0 && seed.numbers.is_empty() {
        return Err(ReadingError::validation(
            "numbers",
            "at least one number is required",
        ));
    }

    let multiplier = i128::from(seed.timestamp) * i128::from(seed.question_len());
    let mut counter: i128 = 1;
    let mut seen = HashSet::with_capacity(card_count);
    let mut drawn = Vec::with_capacity(card_count);

    for slot in 0..card_count {
        let base = i128::from(seed.numbers[slot % seed.numbers.len()]);
        loop {
            let candidate = (base * multiplier + counter).rem_euclid(i128::from(DECK_SIZE)) as i64;
            counter += 1;
            if seen.insert(candidate) {
                drawn.push(CardIndex(candidate));
                break;
            }
        }
    }

    Ok(drawn)
}

/// Collapses a submission time into the seed timestamp: the sum of its
/// calendar and clock fields, month counted from 1.
pub fn submission_stamp<T: Datelike + Timelike>(at: &T) -> i64 {
    i64::from(at.year())
        + i64::from(at.month())
        + i64::from(at.day())
        + i64::from(at.hour())
        + i64::from(at.minute())
        + i64::from(at.second())
}
