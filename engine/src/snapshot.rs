use serde::{Deserialize, Serialize};

use crate::counting::{CountState, CountingSystem};
use crate::errors::EngineError;
use crate::game::{Game, GameState, RoundSummary};
use crate::hand::Hand;
use crate::rules::RuleSet;
use crate::shoe::Shoe;
use crate::strategy::BasicStrategy;

/// Current persistence format version.
pub const SAVE_VERSION: u32 = 1;

/// One player hand as the outside world sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandView {
    pub cards: Vec<String>,
    pub total: u8,
    pub is_soft: bool,
    pub is_pair: bool,
    pub is_busted: bool,
    pub is_blackjack: bool,
    pub bet: i64,
    pub from_split: bool,
}

impl HandView {
    fn from_hand(hand: &Hand) -> Self {
        Self {
            cards: hand.cards.iter().map(|c| c.to_string()).collect(),
            total: hand.total(),
            is_soft: hand.is_soft(),
            is_pair: hand.is_pair(),
            is_busted: hand.is_bust(),
            is_blackjack: hand.is_blackjack(),
            bet: hand.bet,
            from_split: hand.from_split,
        }
    }
}

/// The dealer's hand with the hole card masked until it is revealed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealerView {
    /// One entry per card; the hole card shows as `None` while hidden.
    pub cards: Vec<Option<String>>,
    /// Total over the visible cards only; full total once revealed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_total: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShoeView {
    pub cards_remaining: usize,
    pub decks_remaining: f64,
    pub needs_shuffle: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountingView {
    pub system: CountingSystem,
    pub running_count: f64,
    pub true_count: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ace_side_count: Option<u32>,
}

/// Full externally visible game state, returned by the pure
/// [`Game::snapshot`] query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub state: GameState,
    pub player_hands: Vec<HandView>,
    pub current_hand_index: usize,
    pub dealer_hand: DealerView,
    pub bankroll: i64,
    pub shoe: ShoeView,
    pub counting: CountingView,
    pub can_hit: bool,
    pub can_stand: bool,
    pub can_double: bool,
    pub can_split: bool,
    pub can_surrender: bool,
    pub can_insure: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_result: Option<RoundSummary>,
}

impl Game {
    /// Pure query: everything a client may see right now. The dealer's
    /// hole card stays masked until the dealer turn reveals it.
    pub fn snapshot(&self) -> StateSnapshot {
        let hide_hole = !self.hole_revealed;
        let dealer_cards: Vec<Option<String>> = self
            .dealer
            .cards
            .iter()
            .enumerate()
            .map(|(i, c)| {
                if i == 1 && hide_hole {
                    None
                } else {
                    Some(c.to_string())
                }
            })
            .collect();
        let visible_total = if self.dealer.cards.is_empty() {
            None
        } else if hide_hole {
            self.dealer.cards.first().map(|c| c.value())
        } else {
            Some(self.dealer.total())
        };

        StateSnapshot {
            state: self.state,
            player_hands: self.hands.iter().map(HandView::from_hand).collect(),
            current_hand_index: self.current_hand,
            dealer_hand: DealerView {
                cards: dealer_cards,
                visible_total,
            },
            bankroll: self.bankroll,
            shoe: ShoeView {
                cards_remaining: self.shoe.cards_remaining(),
                decks_remaining: self.shoe.decks_remaining(),
                needs_shuffle: self.shoe.needs_shuffle(),
            },
            counting: CountingView {
                system: self.counting.system(),
                running_count: self.counting.running_count(),
                true_count: self.true_count(),
                ace_side_count: self
                    .counting
                    .ace_richness()
                    .map(|_| self.counting.aces_seen()),
            },
            can_hit: self.can_hit(),
            can_stand: self.can_stand(),
            can_double: self.can_double(),
            can_split: self.can_split(),
            can_surrender: self.can_surrender(),
            can_insure: self.can_insure(),
            last_result: self.last_result.clone(),
        }
    }
}

/// Forward-compatible persisted session record.
///
/// The shoe is stored as its coordinates (seed, shuffle epoch, draw index)
/// rather than its card order, so a restore replays the deterministic
/// shuffles and lands on the identical shoe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSession {
    pub version: u32,
    pub rules: RuleSet,
    pub counting: CountState,
    pub state: GameState,
    pub hands: Vec<Hand>,
    pub current_hand: usize,
    pub dealer: Hand,
    pub hole_revealed: bool,
    pub bankroll: i64,
    pub starting_bankroll: i64,
    pub insurance_bet: i64,
    #[serde(default)]
    pub last_result: Option<RoundSummary>,
    pub prng_seed: u64,
    pub shuffle_epoch: u32,
    pub cards_dealt: usize,
}

impl Game {
    /// Serializable record of this session.
    pub fn save(&self) -> SavedSession {
        SavedSession {
            version: SAVE_VERSION,
            rules: self.rules.clone(),
            counting: self.counting.clone(),
            state: self.state,
            hands: self.hands.clone(),
            current_hand: self.current_hand,
            dealer: self.dealer.clone(),
            hole_revealed: self.hole_revealed,
            bankroll: self.bankroll,
            starting_bankroll: self.starting_bankroll,
            insurance_bet: self.insurance_bet,
            last_result: self.last_result.clone(),
            prng_seed: self.shoe.seed(),
            shuffle_epoch: self.shoe.shuffle_epoch(),
            cards_dealt: self.shoe.cards_dealt(),
        }
    }

    /// Rebuilds a session from a saved record. The restored session
    /// snapshots identically and accepts the same commands.
    pub fn restore(saved: SavedSession) -> Result<Self, EngineError> {
        if saved.version != SAVE_VERSION {
            return Err(EngineError::Configuration(format!(
                "unsupported save version {}",
                saved.version
            )));
        }
        saved.rules.validate()?;
        let shoe = Shoe::restore(
            saved.rules.num_decks,
            saved.rules.penetration,
            saved.prng_seed,
            saved.shuffle_epoch,
            saved.cards_dealt,
        )?;
        let strategy = BasicStrategy::new(&saved.rules);
        Ok(Game {
            strategy,
            shoe,
            rules: saved.rules,
            counting: saved.counting,
            state: saved.state,
            hands: saved.hands,
            current_hand: saved.current_hand,
            dealer: saved.dealer,
            hole_revealed: saved.hole_revealed,
            bankroll: saved.bankroll,
            starting_bankroll: saved.starting_bankroll,
            insurance_bet: saved.insurance_bet,
            last_result: saved.last_result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counting::CountingSystem;

    #[test]
    fn save_restore_round_trips_mid_round() {
        let mut game = Game::new(
            RuleSet::default(),
            CountingSystem::HiLo,
            500_00,
            Some(404),
        )
        .unwrap();
        game.place_bet(25_00).unwrap();
        if game.state() == GameState::OfferingInsurance {
            game.insurance(false).unwrap();
        }

        let saved = game.save();
        let text = serde_json::to_string(&saved).unwrap();
        let reloaded: SavedSession = serde_json::from_str(&text).unwrap();
        let restored = Game::restore(reloaded).unwrap();

        assert_eq!(restored.snapshot(), game.snapshot());
        assert_eq!(restored.available_actions(), game.available_actions());
    }

    #[test]
    fn unknown_save_version_is_rejected() {
        let game = Game::new(RuleSet::default(), CountingSystem::Ko, 500_00, Some(1)).unwrap();
        let mut saved = game.save();
        saved.version = 99;
        assert!(Game::restore(saved).is_err());
    }

    #[test]
    fn snapshot_masks_the_hole_card_during_play() {
        let mut game = Game::new(
            RuleSet::default(),
            CountingSystem::HiLo,
            500_00,
            Some(11),
        )
        .unwrap();
        game.place_bet(10_00).unwrap();
        let snap = game.snapshot();
        if snap.state == GameState::PlayerTurn || snap.state == GameState::OfferingInsurance {
            assert_eq!(snap.dealer_hand.cards.len(), 2);
            assert!(snap.dealer_hand.cards[0].is_some());
            assert!(snap.dealer_hand.cards[1].is_none());
        }
    }
}
