use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const DECK_SIZE: usize = 36;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeckError {
    #[error("deck must have exactly {expected} entries, got {actual}")]
    WrongSize { expected: usize, actual: usize },
    #[error("card number {0} is outside 1..=36")]
    IndexOutOfRange(u64),
}

/// 1-based position in the deck registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct CardIndex(u8);

impl CardIndex {
    pub fn new(value: u64) -> Result<Self, DeckError> {
        if value == 0 || value > DECK_SIZE as u64 {
            return Err(DeckError::IndexOutOfRange(value));
        }
        Ok(Self(value as u8))
    }

    pub fn get(self) -> u64 {
        u64::from(self.0)
    }

    /// Every index of the deck, in registry order.
    pub fn all() -> impl Iterator<Item = CardIndex> {
        (1..=DECK_SIZE as u8).map(CardIndex)
    }

    fn slot(self) -> usize {
        usize::from(self.0) - 1
    }
}

impl TryFrom<u64> for CardIndex {
    type Error = DeckError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CardIndex> for u64 {
    fn from(value: CardIndex) -> Self {
        value.get()
    }
}

impl fmt::Display for CardIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque reference to a card image: a path or a URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeckEntry(String);

impl DeckEntry {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeckEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct DeckRegistry {
    entries: Vec<DeckEntry>,
}

impl DeckRegistry {
    pub fn from_entries(entries: Vec<DeckEntry>) -> Result<Self, DeckError> {
        if entries.len() != DECK_SIZE {
            return Err(DeckError::WrongSize {
                expected: DECK_SIZE,
                actual: entries.len(),
            });
        }
        Ok(Self { entries })
    }

    /// `{base}/1.{ext}` through `{base}/36.{ext}`.
    pub fn numbered(base: &str, extension: &str) -> Self {
        let base = base.trim_end_matches('/');
        let entries = CardIndex::all()
            .map(|index| {
                if base.is_empty() {
                    DeckEntry::new(format!("{index}.{extension}"))
                } else {
                    DeckEntry::new(format!("{base}/{index}.{extension}"))
                }
            })
            .collect();
        Self { entries }
    }

    pub fn entry(&self, index: CardIndex) -> &DeckEntry {
        &self.entries[index.slot()]
    }

    pub fn entries_for(&self, indices: &[CardIndex]) -> Vec<DeckEntry> {
        indices
            .iter()
            .map(|index| self.entry(*index).clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
