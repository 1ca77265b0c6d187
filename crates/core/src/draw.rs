//! Card selection for the three draw actions. Nothing here touches images or
//! the clipboard; every check runs before the pipeline starts any async work.

use crate::{CardIndex, OutsSet, RngState};
use thiserror::Error;

pub const INITIAL_DRAW_SIZE: usize = 6;
/// Most numbers one selection may name, repeats included.
pub const MAX_SELECTION: usize = crate::DECK_SIZE;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DrawError {
    #[error("the deck is exhausted")]
    DeckExhausted,
    #[error("no card numbers in input")]
    EmptyInput,
    #[error("cards not out yet: {missing:?}")]
    NotYetOut { missing: Vec<u64> },
    #[error("too many card numbers, at most {max} per copy")]
    TooManyCards { max: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawKind {
    Initial,
    Addon,
    Selected,
}

/// Cards picked by one draw action, in tile order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    pub kind: DrawKind,
    pub cards: Vec<CardIndex>,
    pub requested: usize,
}

impl Draw {
    /// True when fewer cards remained than were asked for.
    pub fn is_partial(&self) -> bool {
        self.cards.len() < self.requested
    }

    /// Whether the caller should append these cards to its outs once delivered.
    pub fn reveals_new_cards(&self) -> bool {
        !matches!(self.kind, DrawKind::Selected)
    }
}

pub fn draw_initial(outs: &OutsSet, size: usize, rng: &mut RngState) -> Result<Draw, DrawError> {
    let remaining = outs.remaining();
    if remaining.is_empty() {
        return Err(DrawError::DeckExhausted);
    }
    let cards = rng.sample(&remaining, size);
    if cards.len() < size {
        log::info!(
            "only {} of {} requested cards remain, drawing a partial hand",
            cards.len(),
            size
        );
    }
    Ok(Draw {
        kind: DrawKind::Initial,
        cards,
        requested: size,
    })
}

pub fn draw_addon(outs: &OutsSet, rng: &mut RngState) -> Result<Draw, DrawError> {
    let remaining = outs.remaining();
    let card = rng.pick(&remaining).ok_or(DrawError::DeckExhausted)?;
    Ok(Draw {
        kind: DrawKind::Addon,
        cards: vec![card],
        requested: 1,
    })
}

/// Re-copies cards that are already out. Input order and repeats are kept,
/// up to [`MAX_SELECTION`] numbers.
pub fn draw_selected(outs: &OutsSet, raw_input: &str) -> Result<Draw, DrawError> {
    let numbers: Vec<u64> = selection_numbers(raw_input)
        .take(MAX_SELECTION + 1)
        .collect();
    if numbers.is_empty() {
        return Err(DrawError::EmptyInput);
    }
    if numbers.len() > MAX_SELECTION {
        return Err(DrawError::TooManyCards { max: MAX_SELECTION });
    }
    let mut cards = Vec::with_capacity(numbers.len());
    let mut missing = Vec::new();
    for number in numbers {
        match CardIndex::new(number) {
            Ok(index) if outs.contains(index) => cards.push(index),
            _ => missing.push(number),
        }
    }
    if !missing.is_empty() {
        return Err(DrawError::NotYetOut { missing });
    }
    let requested = cards.len();
    Ok(Draw {
        kind: DrawKind::Selected,
        cards,
        requested,
    })
}

/// Splits on every run of non-digits. `"7-9"` is two numbers, not a range.
/// Zeros are dropped; runs too long for `u64` saturate so they still fail
/// membership instead of vanishing.
pub fn parse_selection(raw_input: &str) -> Vec<u64> {
    selection_numbers(raw_input).collect()
}

fn selection_numbers(raw_input: &str) -> impl Iterator<Item = u64> + '_ {
    raw_input
        .split(|ch: char| !ch.is_ascii_digit())
        .filter(|token| !token.is_empty())
        .map(|token| token.parse::<u64>().unwrap_or(u64::MAX))
        .filter(|number| *number != 0)
}
