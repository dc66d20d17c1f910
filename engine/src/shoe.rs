use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::cards::{single_deck, Card};
use crate::errors::EngineError;

/// Deck counts a shoe accepts.
pub const VALID_DECK_COUNTS: [u8; 5] = [1, 2, 4, 6, 8];

/// Per-rank-value card counts for the part of the shoe not yet dealt.
///
/// Index 0 holds aces, indices 1..=9 hold values 2..=10 (all ten-value
/// ranks collapse into index 9). Used by the probability engine to draw
/// without replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    counts: [u16; 10],
}

impl Composition {
    pub fn full(num_decks: u8) -> Self {
        let d = num_decks as u16;
        let mut counts = [4 * d; 10];
        counts[9] = 16 * d; // 10, J, Q, K
        Self { counts }
    }

    fn index(value: u8) -> usize {
        match value {
            11 | 1 => 0,
            v @ 2..=10 => v as usize - 1,
            _ => 0,
        }
    }

    pub fn count_of(&self, value: u8) -> u16 {
        self.counts[Self::index(value)]
    }

    pub fn remove(&mut self, value: u8) {
        let i = Self::index(value);
        self.counts[i] = self.counts[i].saturating_sub(1);
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().map(|&c| c as u32).sum()
    }

    /// Probability of drawing the given blackjack value next.
    pub fn draw_probability(&self, value: u8) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.count_of(value) as f64 / total as f64
    }
}

/// Multi-deck dealing shoe with a cut card and a deterministic shuffle.
///
/// The undrawn sequence is `cards[position..]`; everything before the
/// cursor has been dealt. The shoe never auto-shuffles: the game decides
/// when [`Shoe::reshuffle`] runs (between rounds only).
#[derive(Debug, Clone)]
pub struct Shoe {
    num_decks: u8,
    penetration: f64,
    cards: Vec<Card>,
    position: usize,
    seed: u64,
    rng: ChaCha20Rng,
    shuffles: u32,
}

impl Shoe {
    /// Builds a shuffled shoe. A `None` seed draws one from the thread RNG
    /// and records it, so every shoe stays replayable.
    pub fn new(num_decks: u8, penetration: f64, seed: Option<u64>) -> Result<Self, EngineError> {
        if !VALID_DECK_COUNTS.contains(&num_decks) {
            return Err(EngineError::Configuration(format!(
                "num_decks must be one of {:?}, got {}",
                VALID_DECK_COUNTS, num_decks
            )));
        }
        if !(penetration > 0.0 && penetration <= 1.0) {
            return Err(EngineError::Configuration(format!(
                "penetration must be in (0, 1], got {}",
                penetration
            )));
        }
        let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
        let mut shoe = Self {
            num_decks,
            penetration,
            cards: Vec::new(),
            position: 0,
            seed,
            rng: ChaCha20Rng::seed_from_u64(seed),
            shuffles: 0,
        };
        shoe.reshuffle();
        Ok(shoe)
    }

    /// Restores the full composition and shuffles. Resets the deal cursor.
    pub fn reshuffle(&mut self) {
        self.cards.clear();
        for _ in 0..self.num_decks {
            self.cards.extend(single_deck());
        }
        self.cards.shuffle(&mut self.rng);
        self.position = 0;
        self.shuffles += 1;
    }

    /// Deals one card, moving it from the undrawn sequence to the dealt record.
    pub fn deal(&mut self) -> Result<Card, EngineError> {
        let card = self
            .cards
            .get(self.position)
            .copied()
            .ok_or(EngineError::ShoeExhausted)?;
        self.position += 1;
        Ok(card)
    }

    /// Next card without dealing it.
    pub fn peek(&self) -> Option<Card> {
        self.cards.get(self.position).copied()
    }

    pub fn needs_shuffle(&self) -> bool {
        self.position as f64 / self.total_cards() as f64 >= self.penetration
    }

    pub fn num_decks(&self) -> u8 {
        self.num_decks
    }

    pub fn penetration(&self) -> f64 {
        self.penetration
    }

    pub fn total_cards(&self) -> usize {
        self.num_decks as usize * 52
    }

    pub fn cards_remaining(&self) -> usize {
        self.cards.len() - self.position
    }

    pub fn cards_dealt(&self) -> usize {
        self.position
    }

    /// Decks left in the shoe, floored at half a deck for true-count math.
    pub fn decks_remaining(&self) -> f64 {
        (self.cards_remaining() as f64 / 52.0).max(0.5)
    }

    pub fn dealt_cards(&self) -> &[Card] {
        &self.cards[..self.position]
    }

    pub fn undrawn_cards(&self) -> &[Card] {
        &self.cards[self.position..]
    }

    /// Per-value counts of the undrawn portion.
    pub fn remaining_composition(&self) -> Composition {
        let mut comp = Composition::full(self.num_decks);
        for c in self.dealt_cards() {
            comp.remove(c.value());
        }
        comp
    }

    /// Reorders the undrawn cards so the given cards are dealt next, in
    /// order. Fails if any card is not available in the undrawn portion.
    /// Composition is untouched; this only permutes the deal order.
    pub fn stack_front(&mut self, front: &[Card]) -> Result<(), EngineError> {
        for (offset, want) in front.iter().enumerate() {
            let at = self.position + offset;
            let found = self.cards[at..]
                .iter()
                .position(|c| c == want)
                .ok_or_else(|| {
                    EngineError::Validation(format!("card {want} not available to stack"))
                })?;
            self.cards.swap(at, at + found);
        }
        Ok(())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of shuffles performed since construction (the first shuffle
    /// happens in the constructor). Persisted so a restore can replay the
    /// same shuffle sequence.
    pub fn shuffle_epoch(&self) -> u32 {
        self.shuffles
    }

    /// Rebuilds a shoe from its persisted coordinates: replays `epochs`
    /// shuffles from the seed, then fast-forwards the deal cursor.
    pub fn restore(
        num_decks: u8,
        penetration: f64,
        seed: u64,
        epochs: u32,
        cards_dealt: usize,
    ) -> Result<Self, EngineError> {
        let mut shoe = Self::new(num_decks, penetration, Some(seed))?;
        for _ in 1..epochs {
            shoe.reshuffle();
        }
        if cards_dealt > shoe.total_cards() {
            return Err(EngineError::Invariant(format!(
                "persisted draw index {} exceeds shoe size",
                cards_dealt
            )));
        }
        shoe.position = cards_dealt;
        Ok(shoe)
    }
}
