use serde::{Deserialize, Serialize};

use crate::hand::Hand;
use crate::rules::{RuleSet, Surrender};

/// A concrete player decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Hit,
    Stand,
    Double,
    Split,
    Surrender,
}

/// Strategy table cell. Conditional cells carry their fallback and are
/// resolved at lookup time against what the rules and the hand permit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    H,
    S,
    /// Double if allowed, else hit.
    Dh,
    /// Double if allowed, else stand.
    Ds,
    P,
    /// Surrender if allowed, else hit.
    Rh,
    /// Surrender if allowed, else stand.
    Rs,
    /// Surrender if allowed, else split.
    Rp,
}

/// Player hand classification for table lookup.
///
/// Pairs use the blackjack value of one card (aces are 11, all ten-value
/// ranks collapse to 10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "total")]
pub enum HandClass {
    Hard(u8),
    Soft(u8),
    Pair(u8),
}

/// Classifies a hand the way the strategy tables are keyed.
pub fn classify(hand: &Hand) -> HandClass {
    if hand.is_pair() {
        HandClass::Pair(hand.cards[0].value())
    } else if hand.is_soft() {
        HandClass::Soft(hand.total())
    } else {
        HandClass::Hard(hand.total())
    }
}

/// What the current hand and rules permit, computed by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionContext {
    pub can_double: bool,
    pub can_split: bool,
    pub can_surrender: bool,
}

/// One resolved rule variant: hard 5–21, soft 13–21, pairs 2–11,
/// dealer upcards 2–11 (ace is 11).
#[derive(Debug, Clone)]
struct Tables {
    hard: [[Entry; 10]; 17],
    soft: [[Entry; 10]; 9],
    pair: [[Entry; 10]; 10],
}

impl Tables {
    fn hard_cell(&self, total: u8, upcard: u8) -> Option<Entry> {
        if !(5..=21).contains(&total) || !(2..=11).contains(&upcard) {
            return None;
        }
        Some(self.hard[total as usize - 5][upcard as usize - 2])
    }

    fn soft_cell(&self, total: u8, upcard: u8) -> Option<Entry> {
        if !(13..=21).contains(&total) || !(2..=11).contains(&upcard) {
            return None;
        }
        Some(self.soft[total as usize - 13][upcard as usize - 2])
    }

    fn pair_cell(&self, value: u8, upcard: u8) -> Option<Entry> {
        if !(2..=11).contains(&value) || !(2..=11).contains(&upcard) {
            return None;
        }
        Some(self.pair[value as usize - 2][upcard as usize - 2])
    }
}

fn fill(row: &mut [Entry; 10], upcards: impl IntoIterator<Item = u8>, entry: Entry) {
    for u in upcards {
        row[u as usize - 2] = entry;
    }
}

fn build_hard(h17: bool, surrender: bool) -> [[Entry; 10]; 17] {
    use Entry::*;
    let mut t = [[H; 10]; 17];
    let row = |total: u8| total as usize - 5;

    // 5-8 stay all-hit.
    fill(&mut t[row(9)], 3..=6, Dh);
    fill(&mut t[row(10)], 2..=9, Dh);
    fill(&mut t[row(11)], 2..=10, Dh);
    if h17 {
        t[row(11)][11 - 2] = Dh;
    }
    fill(&mut t[row(12)], 4..=6, S);
    for total in 13..=16 {
        fill(&mut t[row(total)], 2..=6, S);
    }
    if surrender {
        t[row(16)][9 - 2] = Rh;
        t[row(16)][10 - 2] = Rh;
        t[row(16)][11 - 2] = Rh;
        t[row(15)][10 - 2] = Rh;
        if h17 {
            t[row(15)][11 - 2] = Rh;
        }
    }
    for total in 17..=21 {
        fill(&mut t[row(total)], 2..=11, S);
    }
    if surrender && h17 {
        t[row(17)][11 - 2] = Rs;
    }
    t
}

fn build_soft(h17: bool) -> [[Entry; 10]; 9] {
    use Entry::*;
    let mut t = [[H; 10]; 9];
    let row = |total: u8| total as usize - 13;

    fill(&mut t[row(13)], 5..=6, Dh);
    fill(&mut t[row(14)], 5..=6, Dh);
    fill(&mut t[row(15)], 4..=6, Dh);
    fill(&mut t[row(16)], 4..=6, Dh);
    fill(&mut t[row(17)], 3..=6, Dh);

    fill(&mut t[row(18)], 2..=6, Ds);
    fill(&mut t[row(18)], 7..=8, S);
    // 9, 10, A stay hit.

    fill(&mut t[row(19)], 2..=11, S);
    if h17 {
        t[row(19)][6 - 2] = Ds;
    }
    fill(&mut t[row(20)], 2..=11, S);
    fill(&mut t[row(21)], 2..=11, S);
    t
}

fn build_pair(h17: bool, das: bool, surrender: bool) -> [[Entry; 10]; 10] {
    use Entry::*;
    let mut t = [[H; 10]; 10];
    let row = |value: u8| value as usize - 2;

    for value in [2u8, 3] {
        fill(&mut t[row(value)], 2..=3, if das { P } else { H });
        fill(&mut t[row(value)], 4..=7, P);
    }
    fill(&mut t[row(4)], 5..=6, if das { P } else { H });
    // 5,5 plays as hard 10.
    fill(&mut t[row(5)], 2..=9, Dh);
    fill(&mut t[row(6)], 3..=6, P);
    t[row(6)][0] = if das { P } else { H };
    fill(&mut t[row(7)], 2..=7, P);
    fill(&mut t[row(8)], 2..=11, P);
    if surrender && h17 {
        t[row(8)][10 - 2] = Rp;
        t[row(8)][11 - 2] = Rp;
    }
    fill(&mut t[row(9)], 2..=6, P);
    fill(&mut t[row(9)], 8..=9, P);
    t[row(9)][7 - 2] = S;
    t[row(9)][10 - 2] = S;
    t[row(9)][11 - 2] = S;
    fill(&mut t[row(10)], 2..=11, S);
    fill(&mut t[row(11)], 2..=11, P);
    t
}

/// Basic strategy lookup for one rule set.
///
/// Both the S17 and H17 variants are materialized up front and the active
/// rule selects between them, so a hint query can ask about either dealer
/// rule without rebuilding.
#[derive(Debug, Clone)]
pub struct BasicStrategy {
    s17: Tables,
    h17: Tables,
    hits_soft_17: bool,
}

impl BasicStrategy {
    pub fn new(rules: &RuleSet) -> Self {
        let das = rules.double_after_split;
        let sur = rules.surrender != Surrender::None;
        Self {
            s17: Tables {
                hard: build_hard(false, sur),
                soft: build_soft(false),
                pair: build_pair(false, das, sur),
            },
            h17: Tables {
                hard: build_hard(true, sur),
                soft: build_soft(true),
                pair: build_pair(true, das, sur),
            },
            hits_soft_17: rules.dealer_hits_soft_17,
        }
    }

    fn tables(&self) -> &Tables {
        if self.hits_soft_17 {
            &self.h17
        } else {
            &self.s17
        }
    }

    /// Recommended action for a classified hand against a dealer upcard
    /// value (ace is 11), resolved against what the context permits.
    pub fn action(&self, class: HandClass, upcard: u8, ctx: ActionContext) -> Action {
        let tables = self.tables();
        let entry = match class {
            HandClass::Pair(value) if ctx.can_split => tables.pair_cell(value, upcard),
            // A pair that cannot be split plays as the equivalent
            // hard or soft total.
            HandClass::Pair(11) => tables.soft_cell(12, upcard),
            HandClass::Pair(value) => tables.hard_cell(value * 2, upcard),
            HandClass::Soft(total) => tables.soft_cell(total, upcard),
            HandClass::Hard(total) => tables.hard_cell(total, upcard),
        };

        let entry = match entry {
            Some(e) => e,
            // Off-table totals: stand on made hands, otherwise hit.
            None => {
                let total = match class {
                    HandClass::Hard(t) | HandClass::Soft(t) => t,
                    // Unsplittable aces are soft 12, not 22.
                    HandClass::Pair(11) => 12,
                    HandClass::Pair(v) => v * 2,
                };
                return if total >= 17 { Action::Stand } else { Action::Hit };
            }
        };

        match entry {
            Entry::H => Action::Hit,
            Entry::S => Action::Stand,
            Entry::P => Action::Split,
            Entry::Dh => {
                if ctx.can_double {
                    Action::Double
                } else {
                    Action::Hit
                }
            }
            Entry::Ds => {
                if ctx.can_double {
                    Action::Double
                } else {
                    Action::Stand
                }
            }
            Entry::Rh => {
                if ctx.can_surrender {
                    Action::Surrender
                } else {
                    Action::Hit
                }
            }
            Entry::Rs => {
                if ctx.can_surrender {
                    Action::Surrender
                } else {
                    Action::Stand
                }
            }
            Entry::Rp => {
                if ctx.can_surrender {
                    Action::Surrender
                } else {
                    Action::Split
                }
            }
        }
    }
}
