use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use edgewise_engine::cards::Card;
use edgewise_engine::counting::{CountState, CountingSystem};
use edgewise_engine::deviations::{strategy_hint, IndexPlay, FAB_4, ILLUSTRIOUS_18};
use edgewise_engine::hand::Hand;
use edgewise_engine::rules::RuleSet;
use edgewise_engine::shoe::Shoe;
use edgewise_engine::strategy::Action;

/// Time after which the clock bonus reaches zero, in milliseconds.
const SPEED_BASELINE_MS: u64 = 30_000;
/// Bonus points per second under the baseline.
const SPEED_BONUS_PER_SECOND: u64 = 50;
/// Flat bonus for an exact count.
const ACCURACY_BONUS: u32 = 500;
/// Base points per card shown.
const BASE_PER_CARD: u32 = 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DrillError {
    /// Verification against an unknown or already-verified drill id.
    #[error("unknown or expired drill: {0}")]
    UnknownDrill(String),
    #[error("invalid drill request: {0}")]
    InvalidRequest(String),
}

/// A counting or speed drill: cards shown in order plus the expected count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountingDrill {
    pub id: String,
    pub system: CountingSystem,
    pub cards: Vec<Card>,
    /// The exact running count after all cards (half-integers possible).
    pub expected_count: f64,
}

/// Outcome of a count verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyOutcome {
    pub correct: bool,
    pub expected: f64,
    /// Present when a completion time was reported (speed drill).
    pub score: Option<u32>,
}

/// A basic-strategy quiz position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyDrill {
    pub id: String,
    pub player_cards: Vec<Card>,
    pub player_total: u8,
    pub is_soft: bool,
    pub is_pair: bool,
    pub dealer_upcard: Card,
    pub correct_action: Action,
}

/// An index-play quiz position sampled from the Illustrious 18 / Fab 4.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviationDrill {
    pub id: String,
    pub player_total: u8,
    pub is_soft: bool,
    pub is_pair: bool,
    /// Ace as 11.
    pub dealer_upcard: u8,
    pub true_count: f64,
    pub correct_action: Action,
    /// What basic strategy would do, for contrast in the result screen.
    pub basic_action: Action,
    pub description: String,
}

#[derive(Debug, Clone)]
enum Pending {
    Count { expected_x2: i32, num_cards: u8 },
    Strategy { correct: Action },
    Deviation { correct: Action },
}

/// Speed-drill score: zero on any miscount, otherwise base points per card
/// plus a clock bonus that decays to nothing at the thirty-second mark.
pub fn speed_score(num_cards: u8, elapsed_ms: u64, correct: bool) -> u32 {
    if !correct {
        return 0;
    }
    let base = BASE_PER_CARD * num_cards as u32;
    let bonus_ms = SPEED_BASELINE_MS.saturating_sub(elapsed_ms);
    let time_bonus = (bonus_ms * SPEED_BONUS_PER_SECOND / 1000) as u32;
    base + time_bonus + ACCURACY_BONUS
}

/// Generates drills and verifies answers. Each drill id is one-shot: a
/// verification consumes it, and a second attempt is a protocol error.
#[derive(Debug, Default)]
pub struct DrillStore {
    pending: HashMap<String, Pending>,
}

impl DrillStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn rng(seed: Option<u64>) -> ChaCha20Rng {
        match seed {
            Some(s) => ChaCha20Rng::seed_from_u64(s),
            None => ChaCha20Rng::seed_from_u64(rand::thread_rng().gen()),
        }
    }

    /// Deals `num_cards` from a shuffled single deck and records the exact
    /// expected running count for later verification.
    pub fn counting_drill(
        &mut self,
        num_cards: u8,
        system: CountingSystem,
        seed: Option<u64>,
    ) -> Result<CountingDrill, DrillError> {
        if num_cards == 0 || num_cards > 52 {
            return Err(DrillError::InvalidRequest(format!(
                "num_cards must be 1-52, got {num_cards}"
            )));
        }
        let shoe_seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
        let mut shoe = Shoe::new(1, 1.0, Some(shoe_seed))
            .map_err(|e| DrillError::InvalidRequest(e.to_string()))?;

        let mut count = CountState::new(system, 1);
        let mut cards = Vec::with_capacity(num_cards as usize);
        for _ in 0..num_cards {
            // A single deck always covers 1-52 cards.
            let card = shoe
                .deal()
                .map_err(|e| DrillError::InvalidRequest(e.to_string()))?;
            count.count_card(card);
            cards.push(card);
        }

        let id = Uuid::new_v4().to_string();
        self.pending.insert(
            id.clone(),
            Pending::Count {
                expected_x2: count.running_count_x2(),
                num_cards,
            },
        );
        Ok(CountingDrill {
            id,
            system,
            cards,
            expected_count: count.running_count(),
        })
    }

    /// Checks a user's count against the drill's expected value. Exact
    /// match required. A reported completion time turns the verification
    /// into a speed drill and yields a score.
    pub fn verify_count(
        &mut self,
        drill_id: &str,
        user_count: f64,
        elapsed_ms: Option<u64>,
    ) -> Result<VerifyOutcome, DrillError> {
        let pending = self
            .pending
            .remove(drill_id)
            .ok_or_else(|| DrillError::UnknownDrill(drill_id.to_string()))?;
        let (expected_x2, num_cards) = match pending {
            Pending::Count {
                expected_x2,
                num_cards,
            } => (expected_x2, num_cards),
            _ => return Err(DrillError::UnknownDrill(drill_id.to_string())),
        };

        let expected = expected_x2 as f64 / 2.0;
        let correct = (user_count * 2.0 - expected_x2 as f64).abs() < f64::EPSILON;
        let score = elapsed_ms.map(|ms| speed_score(num_cards, ms, correct));
        Ok(VerifyOutcome {
            correct,
            expected,
            score,
        })
    }

    /// Random legal two-card hand against a random upcard; the oracle is
    /// basic strategy under the drill's rules.
    pub fn strategy_drill(
        &mut self,
        rules: &RuleSet,
        seed: Option<u64>,
    ) -> Result<StrategyDrill, DrillError> {
        let shoe_seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
        let mut shoe = Shoe::new(1, 1.0, Some(shoe_seed))
            .map_err(|e| DrillError::InvalidRequest(e.to_string()))?;

        let mut hand = Hand::new(rules.min_bet);
        hand.add_card(shoe.deal().map_err(|e| DrillError::InvalidRequest(e.to_string()))?);
        hand.add_card(shoe.deal().map_err(|e| DrillError::InvalidRequest(e.to_string()))?);
        let dealer_upcard = shoe
            .deal()
            .map_err(|e| DrillError::InvalidRequest(e.to_string()))?;

        let hint = strategy_hint(&hand, dealer_upcard.value(), rules, None);
        let id = Uuid::new_v4().to_string();
        self.pending
            .insert(id.clone(), Pending::Strategy { correct: hint.basic });
        Ok(StrategyDrill {
            id,
            player_total: hand.total(),
            is_soft: hand.is_soft(),
            is_pair: hand.is_pair(),
            player_cards: hand.cards,
            dealer_upcard,
            correct_action: hint.basic,
        })
    }

    /// Samples an Illustrious 18 / Fab 4 situation and a true count in the
    /// configured range, biased toward plays whose index lies inside the
    /// range so the decision actually hinges on the count.
    pub fn deviation_drill(
        &mut self,
        tc_range: (f64, f64),
        include_surrender: bool,
        seed: Option<u64>,
    ) -> Result<DeviationDrill, DrillError> {
        let (lo, hi) = tc_range;
        if !(lo < hi) {
            return Err(DrillError::InvalidRequest(format!(
                "bad true-count range ({lo}, {hi})"
            )));
        }
        let mut rng = Self::rng(seed);

        let mut catalog: Vec<&'static IndexPlay> = ILLUSTRIOUS_18.iter().collect();
        if include_surrender {
            catalog.extend(FAB_4.iter());
        }
        let in_range: Vec<&'static IndexPlay> = catalog
            .iter()
            .copied()
            .filter(|p| p.index >= lo && p.index <= hi)
            .collect();
        let pool = if in_range.is_empty() { &catalog } else { &in_range };
        let play = pool
            .choose(&mut rng)
            .ok_or_else(|| DrillError::InvalidRequest("empty deviation catalog".into()))?;

        let true_count = rng.gen_range(lo..hi);
        let correct = if play.should_deviate(true_count) {
            play.deviation_action
        } else {
            play.basic_action
        };

        let id = Uuid::new_v4().to_string();
        self.pending
            .insert(id.clone(), Pending::Deviation { correct });
        Ok(DeviationDrill {
            id,
            player_total: play.player_total,
            is_soft: play.is_soft,
            is_pair: play.is_pair,
            dealer_upcard: play.dealer_upcard,
            true_count,
            correct_action: correct,
            basic_action: play.basic_action,
            description: play.description.to_string(),
        })
    }

    /// Checks a strategy or deviation drill answer. One-shot, like counts.
    pub fn verify_action(&mut self, drill_id: &str, action: Action) -> Result<bool, DrillError> {
        let pending = self
            .pending
            .remove(drill_id)
            .ok_or_else(|| DrillError::UnknownDrill(drill_id.to_string()))?;
        match pending {
            Pending::Strategy { correct } | Pending::Deviation { correct } => {
                Ok(action == correct)
            }
            _ => Err(DrillError::UnknownDrill(drill_id.to_string())),
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counting_drill_is_reproducible_from_its_seed() {
        let mut store = DrillStore::new();
        let a = store.counting_drill(20, CountingSystem::HiLo, Some(5)).unwrap();
        let b = store.counting_drill(20, CountingSystem::HiLo, Some(5)).unwrap();
        assert_eq!(a.cards, b.cards);
        assert_eq!(a.expected_count, b.expected_count);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn verification_is_exact_and_one_shot() {
        let mut store = DrillStore::new();
        let drill = store.counting_drill(10, CountingSystem::HiLo, Some(9)).unwrap();

        let ok = store
            .verify_count(&drill.id, drill.expected_count, None)
            .unwrap();
        assert!(ok.correct);
        assert_eq!(ok.expected, drill.expected_count);
        assert_eq!(ok.score, None);

        // The drill id is spent.
        assert_eq!(
            store.verify_count(&drill.id, drill.expected_count, None),
            Err(DrillError::UnknownDrill(drill.id.clone()))
        );
    }

    #[test]
    fn off_by_one_counts_are_wrong_even_by_a_half() {
        let mut store = DrillStore::new();
        let drill = store
            .counting_drill(15, CountingSystem::WongHalves, Some(3))
            .unwrap();
        let outcome = store
            .verify_count(&drill.id, drill.expected_count + 0.5, Some(5_000))
            .unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.score, Some(0));
    }

    #[test]
    fn speed_score_rewards_pace_and_zeroes_mistakes() {
        assert_eq!(speed_score(20, 10_000, true), 400 + 1000 + 500);
        assert_eq!(speed_score(20, 30_000, true), 400 + 500);
        assert_eq!(speed_score(20, 60_000, true), 400 + 500);
        assert_eq!(speed_score(20, 1_000, false), 0);
        // Faster beats slower.
        assert!(speed_score(20, 5_000, true) > speed_score(20, 25_000, true));
    }

    #[test]
    fn strategy_drill_oracle_agrees_with_the_hint_query() {
        let mut store = DrillStore::new();
        let rules = RuleSet::default();
        for seed in 0..30 {
            let drill = store.strategy_drill(&rules, Some(seed)).unwrap();
            let mut hand = Hand::new(rules.min_bet);
            for card in &drill.player_cards {
                hand.add_card(*card);
            }
            let hint = strategy_hint(&hand, drill.dealer_upcard.value(), &rules, None);
            assert_eq!(drill.correct_action, hint.basic, "seed {seed}");
            assert!(store.verify_action(&drill.id, drill.correct_action).unwrap());
        }
    }

    #[test]
    fn deviation_drill_stays_inside_the_catalog_and_range() {
        let mut store = DrillStore::new();
        for seed in 0..30 {
            let drill = store
                .deviation_drill((-2.0, 5.0), true, Some(seed))
                .unwrap();
            assert!(drill.true_count >= -2.0 && drill.true_count < 5.0);
            let known = ILLUSTRIOUS_18
                .iter()
                .chain(FAB_4.iter())
                .any(|p| {
                    p.player_total == drill.player_total
                        && p.dealer_upcard == drill.dealer_upcard
                        && p.is_pair == drill.is_pair
                });
            assert!(known, "seed {seed} produced an unknown situation");
        }
    }

    #[test]
    fn count_verification_against_an_action_drill_is_a_protocol_error() {
        let mut store = DrillStore::new();
        let drill = store.strategy_drill(&RuleSet::default(), Some(1)).unwrap();
        assert!(matches!(
            store.verify_count(&drill.id, 0.0, None),
            Err(DrillError::UnknownDrill(_))
        ));
        // The bad verification discarded the drill.
        assert_eq!(store.pending_count(), 0);
    }
}
