use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Builds the unshuffled deck for a `cols` x `rows` grid: two copies of every
/// value `1..=N` with `N = cols * rows / 2`, plus one filler when the cell
/// count is odd.
pub fn create_cards(cols: Dim, rows: Dim) -> Vec<Card> {
    let total = mult(cols, rows);
    let pairs = total / 2;

    let mut cards = Vec::with_capacity(total.into());
    for _ in 0..2 {
        cards.extend((1..=pairs).map(|value| Card::new(Face::Value(value))));
    }
    if total % 2 == 1 {
        cards.push(Card::new(Face::Filler));
    }
    cards
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    size: Size2,
    cards: Vec<Card>,
    visible: bool,
}

impl Grid {
    pub fn new(cols: Dim, rows: Dim) -> Self {
        let cards = create_cards(cols, rows);
        if cards.is_empty() {
            log::warn!("Grid of {}x{} holds no cards", cols, rows);
        }
        Self {
            size: (cols, rows),
            cards,
            visible: false,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.cols, config.rows)
    }

    pub fn size(&self) -> Size2 {
        self.size
    }

    pub fn len(&self) -> CardCount {
        // `create_cards` never produces more than `CardCount::MAX` cards.
        self.cards.len() as CardCount
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(usize::from(id))
    }

    pub(crate) fn card_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.get_mut(usize::from(id))
    }

    pub fn validate_id(&self, id: CardId) -> Result<CardId> {
        if id < self.len() {
            Ok(id)
        } else {
            Err(GameError::InvalidCard)
        }
    }

    /// Uniformly permutes the cards and turns every one face down.
    pub fn shuffle(&mut self, seed: u64) {
        use rand::prelude::*;

        let mut rng = SmallRng::seed_from_u64(seed);
        self.cards.shuffle(&mut rng);
        for card in &mut self.cards {
            card.set_active(false);
        }
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
