use crate::CardIndex;
use serde::{Deserialize, Serialize};

/// Cards already drawn in the current round, in draw order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CardIndex>", into = "Vec<CardIndex>")]
pub struct OutsSet {
    cards: Vec<CardIndex>,
}

impl OutsSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from stored values, dropping repeats.
    pub fn from_cards(cards: impl IntoIterator<Item = CardIndex>) -> Self {
        let mut outs = Self::new();
        outs.append(cards);
        outs
    }

    pub fn contains(&self, index: CardIndex) -> bool {
        self.cards.contains(&index)
    }

    /// Appends newly drawn cards; cards already present are skipped.
    pub fn append(&mut self, cards: impl IntoIterator<Item = CardIndex>) {
        for card in cards {
            if self.contains(card) {
                log::debug!("card {card} is already out, skipping");
                continue;
            }
            self.cards.push(card);
        }
    }

    /// Deck indices not yet drawn, ascending.
    pub fn remaining(&self) -> Vec<CardIndex> {
        CardIndex::all().filter(|index| !self.contains(*index)).collect()
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn as_slice(&self) -> &[CardIndex] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl From<Vec<CardIndex>> for OutsSet {
    fn from(cards: Vec<CardIndex>) -> Self {
        Self::from_cards(cards)
    }
}

impl From<OutsSet> for Vec<CardIndex> {
    fn from(outs: OutsSet) -> Self {
        outs.cards
    }
}
