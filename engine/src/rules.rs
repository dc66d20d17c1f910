use serde::{Deserialize, Serialize};

use crate::errors::EngineError;
use crate::shoe::VALID_DECK_COUNTS;

/// Surrender availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surrender {
    None,
    Late,
    Early,
}

/// Payout for a natural blackjack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlackjackPayout {
    ThreeToTwo,
    SixToFive,
    EvenMoney,
}

impl BlackjackPayout {
    /// Winnings in cents for a natural on the given bet. Exact integer math.
    pub fn payout(self, bet: i64) -> i64 {
        match self {
            BlackjackPayout::ThreeToTwo => bet * 3 / 2,
            BlackjackPayout::SixToFive => bet * 6 / 5,
            BlackjackPayout::EvenMoney => bet,
        }
    }
}

/// Which two-card totals may be doubled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoubleRestriction {
    AnyTwo,
    NineToEleven,
    TenToEleven,
}

impl DoubleRestriction {
    pub fn permits(self, total: u8) -> bool {
        match self {
            DoubleRestriction::AnyTwo => true,
            DoubleRestriction::NineToEleven => (9..=11).contains(&total),
            DoubleRestriction::TenToEleven => (10..=11).contains(&total),
        }
    }
}

/// Blackjack table rules.
///
/// Everything that affects strategy, counting, and house edge. Unknown
/// fields are rejected when deserializing: configuration is an enumerated
/// record, not an open dictionary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSet {
    pub num_decks: u8,
    /// Cut-card depth as a fraction of the shoe.
    pub penetration: f64,
    /// Table limits in cents.
    pub min_bet: i64,
    pub max_bet: i64,
    /// H17 (true) vs S17 (false).
    pub dealer_hits_soft_17: bool,
    pub blackjack_payout: BlackjackPayout,
    pub double_after_split: bool,
    pub double_on: DoubleRestriction,
    pub resplit_aces: bool,
    pub hit_split_aces: bool,
    pub max_splits: u8,
    pub surrender: Surrender,
    pub insurance_allowed: bool,
    /// Dealer checks the hole card for a natural on a ten or ace upcard.
    pub dealer_peeks: bool,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            num_decks: 6,
            penetration: 0.75,
            min_bet: 10_00,
            max_bet: 1_000_00,
            dealer_hits_soft_17: true,
            blackjack_payout: BlackjackPayout::ThreeToTwo,
            double_after_split: true,
            double_on: DoubleRestriction::AnyTwo,
            resplit_aces: false,
            hit_split_aces: false,
            max_splits: 4,
            surrender: Surrender::Late,
            insurance_allowed: true,
            dealer_peeks: true,
        }
    }
}

impl RuleSet {
    /// Validates rule combinations; call after construction or deserialization.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !VALID_DECK_COUNTS.contains(&self.num_decks) {
            return Err(EngineError::Configuration(format!(
                "num_decks must be one of {:?}, got {}",
                VALID_DECK_COUNTS, self.num_decks
            )));
        }
        if !(self.penetration > 0.0 && self.penetration <= 1.0) {
            return Err(EngineError::Configuration(format!(
                "penetration must be in (0, 1], got {}",
                self.penetration
            )));
        }
        if self.min_bet <= 0 || self.max_bet < self.min_bet {
            return Err(EngineError::Configuration(format!(
                "bet limits invalid: min {} max {}",
                self.min_bet, self.max_bet
            )));
        }
        if self.max_splits < 1 {
            return Err(EngineError::Configuration(
                "max_splits must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Standard Vegas Strip rules: 6 decks, S17, late surrender.
    pub fn vegas_strip() -> Self {
        Self {
            dealer_hits_soft_17: false,
            ..Self::default()
        }
    }

    /// Downtown Las Vegas rules: H17 variant of the strip game.
    pub fn downtown_vegas() -> Self {
        Self::default()
    }

    /// Single deck, H17, no DAS, no surrender.
    pub fn single_deck() -> Self {
        Self {
            num_decks: 1,
            double_after_split: false,
            surrender: Surrender::None,
            ..Self::default()
        }
    }

    /// Atlantic City rules: 8 decks, S17, late surrender.
    pub fn atlantic_city() -> Self {
        Self {
            num_decks: 8,
            dealer_hits_soft_17: false,
            ..Self::default()
        }
    }
}
