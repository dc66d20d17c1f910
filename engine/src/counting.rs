use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};
use crate::errors::EngineError;

/// Running count where the KO system flips from house edge to player edge.
pub const KO_PIVOT: f64 = 4.0;
/// Running count at which KO play starts deviating upward.
pub const KO_KEY_COUNT: f64 = 3.0;

/// The four supported counting systems.
///
/// Variants are values, not types: all behavior lives in the shared
/// [`SystemSpec`] capability record each variant resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountingSystem {
    HiLo,
    Ko,
    OmegaII,
    WongHalves,
}

impl CountingSystem {
    pub fn all() -> [CountingSystem; 4] {
        [
            CountingSystem::HiLo,
            CountingSystem::Ko,
            CountingSystem::OmegaII,
            CountingSystem::WongHalves,
        ]
    }

    /// Capability record for this system.
    pub fn spec(self) -> &'static SystemSpec {
        match self {
            CountingSystem::HiLo => &HILO,
            CountingSystem::Ko => &KO,
            CountingSystem::OmegaII => &OMEGA_II,
            CountingSystem::WongHalves => &WONG_HALVES,
        }
    }

    pub fn is_balanced(self) -> bool {
        self.spec().balanced
    }

    /// Starting running count in points: 0 for balanced systems,
    /// `4 - 4 * num_decks` for KO.
    pub fn initial_running_count(self, num_decks: u8) -> i32 {
        if self == CountingSystem::Ko {
            4 - 4 * num_decks as i32
        } else {
            0
        }
    }
}

impl fmt::Display for CountingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.spec().name)
    }
}

impl FromStr for CountingSystem {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hilo" | "hi-lo" | "hi_lo" => Ok(CountingSystem::HiLo),
            "ko" | "knockout" | "knock-out" => Ok(CountingSystem::Ko),
            "omega2" | "omega_ii" | "omega-ii" | "omegaii" => Ok(CountingSystem::OmegaII),
            "wong_halves" | "wong-halves" | "halves" => Ok(CountingSystem::WongHalves),
            other => Err(EngineError::Configuration(format!(
                "unknown counting system: {other:?}"
            ))),
        }
    }
}

/// Static description of a counting system.
///
/// Tag values are stored doubled (half-point units) so Wong Halves stays
/// exact in integer arithmetic; divide by two before presenting.
#[derive(Debug, Clone)]
pub struct SystemSpec {
    pub name: &'static str,
    /// Doubled tag values indexed by [`Rank::index`] (Two = 0 .. Ace = 12).
    pub tags_x2: [i32; 13],
    pub balanced: bool,
    /// Omega II keeps a separate ace side count.
    pub ace_side_count: bool,
    pub betting_correlation: f64,
    pub playing_efficiency: f64,
}

impl SystemSpec {
    /// Doubled tag value for a card.
    pub fn tag_x2(&self, card: Card) -> i32 {
        self.tags_x2[card.rank.index()]
    }

    /// Tag value in points.
    pub fn tag(&self, card: Card) -> f64 {
        self.tag_x2(card) as f64 / 2.0
    }
}

//                      2   3   4   5   6   7   8   9  10   J   Q   K   A
static HILO: SystemSpec = SystemSpec {
    name: "Hi-Lo",
    tags_x2: [2, 2, 2, 2, 2, 0, 0, 0, -2, -2, -2, -2, -2],
    balanced: true,
    ace_side_count: false,
    betting_correlation: 0.97,
    playing_efficiency: 0.51,
};

static KO: SystemSpec = SystemSpec {
    name: "Knock-Out",
    tags_x2: [2, 2, 2, 2, 2, 2, 0, 0, -2, -2, -2, -2, -2],
    balanced: false,
    ace_side_count: false,
    betting_correlation: 0.98,
    playing_efficiency: 0.55,
};

static OMEGA_II: SystemSpec = SystemSpec {
    name: "Omega II",
    tags_x2: [2, 2, 4, 4, 4, 2, 0, -2, -4, -4, -4, -4, 0],
    balanced: true,
    ace_side_count: true,
    betting_correlation: 0.92,
    playing_efficiency: 0.67,
};

static WONG_HALVES: SystemSpec = SystemSpec {
    name: "Wong Halves",
    tags_x2: [1, 2, 2, 3, 2, 1, 0, -1, -2, -2, -2, -2, -2],
    balanced: true,
    ace_side_count: false,
    betting_correlation: 0.99,
    playing_efficiency: 0.57,
};

/// Mutable counting state bound to one shoe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountState {
    system: CountingSystem,
    /// Running count in doubled (half-point) units.
    rc_x2: i32,
    cards_seen: u32,
    aces_seen: u32,
    num_decks: u8,
}

impl CountState {
    pub fn new(system: CountingSystem, num_decks: u8) -> Self {
        Self {
            system,
            rc_x2: system.initial_running_count(num_decks) * 2,
            cards_seen: 0,
            aces_seen: 0,
            num_decks,
        }
    }

    pub fn system(&self) -> CountingSystem {
        self.system
    }

    /// Counts a seen card. Returns its tag value in points.
    pub fn count_card(&mut self, card: Card) -> f64 {
        let spec = self.system.spec();
        let tag = spec.tag_x2(card);
        self.rc_x2 += tag;
        self.cards_seen += 1;
        if card.rank == Rank::Ace {
            self.aces_seen += 1;
        }
        tag as f64 / 2.0
    }

    pub fn count_cards<'a>(&mut self, cards: impl IntoIterator<Item = &'a Card>) -> f64 {
        cards.into_iter().map(|&c| self.count_card(c)).sum()
    }

    /// Running count in points (may be a half-integer for Wong Halves).
    pub fn running_count(&self) -> f64 {
        self.rc_x2 as f64 / 2.0
    }

    /// Running count in exact half-point units.
    pub fn running_count_x2(&self) -> i32 {
        self.rc_x2
    }

    pub fn cards_seen(&self) -> u32 {
        self.cards_seen
    }

    pub fn aces_seen(&self) -> u32 {
        self.aces_seen
    }

    /// True count for balanced systems; the running count itself for
    /// unbalanced ones, where pivot and key points drive decisions.
    pub fn true_count(&self, decks_remaining: f64) -> f64 {
        if !self.system.is_balanced() {
            return self.running_count();
        }
        self.running_count() / decks_remaining.max(0.5)
    }

    /// Ace surplus relative to expectation: `aces_seen - cards_seen / 52 * 4`.
    /// Positive means the remaining shoe is ace-poor. Only meaningful for
    /// systems carrying an ace side count.
    pub fn ace_richness(&self) -> Option<f64> {
        if !self.system.spec().ace_side_count {
            return None;
        }
        Some(self.aces_seen as f64 - self.cards_seen as f64 / 52.0 * 4.0)
    }

    /// Resets to the system's IRC; called on every shoe reshuffle.
    pub fn reset_for_shoe(&mut self) {
        self.rc_x2 = self.system.initial_running_count(self.num_decks) * 2;
        self.cards_seen = 0;
        self.aces_seen = 0;
    }
}
