use serde::{Deserialize, Serialize};

use crate::hand::Hand;
use crate::rules::{RuleSet, Surrender};
use crate::strategy::{classify, Action, ActionContext, BasicStrategy, HandClass};

/// True count at or above which insurance becomes a positive-EV wager.
pub const INSURANCE_INDEX: f64 = 3.0;

/// Deviate when the true count is at/above or at/below the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    AtOrAbove,
    AtOrBelow,
}

/// A count-indexed override of basic strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndexPlay {
    pub player_total: u8,
    pub is_soft: bool,
    pub is_pair: bool,
    /// Dealer upcard value, ace as 11.
    pub dealer_upcard: u8,
    pub basic_action: Action,
    pub deviation_action: Action,
    pub index: f64,
    pub direction: Direction,
    pub description: &'static str,
}

impl IndexPlay {
    pub fn should_deviate(&self, true_count: f64) -> bool {
        match self.direction {
            Direction::AtOrAbove => true_count >= self.index,
            Direction::AtOrBelow => true_count <= self.index,
        }
    }

    fn matches(&self, class: HandClass, upcard: u8) -> bool {
        if self.dealer_upcard != upcard {
            return false;
        }
        match class {
            HandClass::Hard(t) => !self.is_soft && !self.is_pair && self.player_total == t,
            HandClass::Soft(t) => self.is_soft && !self.is_pair && self.player_total == t,
            HandClass::Pair(v) => self.is_pair && self.player_total == v * 2,
        }
    }
}

const ABOVE: Direction = Direction::AtOrAbove;
const BELOW: Direction = Direction::AtOrBelow;

macro_rules! play {
    ($total:expr, $soft:expr, $pair:expr, $up:expr, $basic:ident => $dev:ident @ $idx:expr, $dir:expr, $desc:expr) => {
        IndexPlay {
            player_total: $total,
            is_soft: $soft,
            is_pair: $pair,
            dealer_upcard: $up,
            basic_action: Action::$basic,
            deviation_action: Action::$dev,
            index: $idx,
            direction: $dir,
            description: $desc,
        }
    };
}

/// The Illustrious 18 playing deviations, ordered by expected-value gain.
/// Insurance (the most valuable entry) is handled separately via
/// [`insurance_recommended`].
pub const ILLUSTRIOUS_18: [IndexPlay; 17] = [
    play!(16, false, false, 10, Hit => Stand @ 0.0, ABOVE, "Stand on 16 vs 10 at TC 0 or higher"),
    play!(15, false, false, 10, Hit => Stand @ 4.0, ABOVE, "Stand on 15 vs 10 at TC +4 or higher"),
    play!(20, false, true, 5, Stand => Split @ 5.0, ABOVE, "Split 10s vs 5 at TC +5 or higher"),
    play!(20, false, true, 6, Stand => Split @ 4.0, ABOVE, "Split 10s vs 6 at TC +4 or higher"),
    play!(10, false, false, 10, Hit => Double @ 4.0, ABOVE, "Double 10 vs 10 at TC +4 or higher"),
    play!(12, false, false, 3, Hit => Stand @ 2.0, ABOVE, "Stand on 12 vs 3 at TC +2 or higher"),
    play!(12, false, false, 2, Hit => Stand @ 3.0, ABOVE, "Stand on 12 vs 2 at TC +3 or higher"),
    play!(11, false, false, 11, Hit => Double @ 1.0, ABOVE, "Double 11 vs A at TC +1 or higher"),
    play!(9, false, false, 2, Hit => Double @ 1.0, ABOVE, "Double 9 vs 2 at TC +1 or higher"),
    play!(10, false, false, 11, Hit => Double @ 4.0, ABOVE, "Double 10 vs A at TC +4 or higher"),
    play!(9, false, false, 7, Hit => Double @ 3.0, ABOVE, "Double 9 vs 7 at TC +3 or higher"),
    play!(16, false, false, 9, Hit => Stand @ 5.0, ABOVE, "Stand on 16 vs 9 at TC +5 or higher"),
    play!(13, false, false, 2, Stand => Hit @ -1.0, BELOW, "Hit 13 vs 2 at TC -1 or lower"),
    play!(12, false, false, 4, Stand => Hit @ 0.0, BELOW, "Hit 12 vs 4 at TC 0 or lower"),
    play!(12, false, false, 5, Stand => Hit @ -2.0, BELOW, "Hit 12 vs 5 at TC -2 or lower"),
    play!(12, false, false, 6, Stand => Hit @ -1.0, BELOW, "Hit 12 vs 6 at TC -1 or lower"),
    play!(13, false, false, 3, Stand => Hit @ -2.0, BELOW, "Hit 13 vs 3 at TC -2 or lower"),
];

/// The Fab 4 surrender deviations.
pub const FAB_4: [IndexPlay; 4] = [
    play!(14, false, false, 10, Hit => Surrender @ 3.0, ABOVE, "Surrender 14 vs 10 at TC +3 or higher"),
    play!(15, false, false, 9, Hit => Surrender @ 2.0, ABOVE, "Surrender 15 vs 9 at TC +2 or higher"),
    play!(15, false, false, 11, Hit => Surrender @ 1.0, ABOVE, "Surrender 15 vs A at TC +1 or higher"),
    play!(14, false, false, 11, Hit => Surrender @ 3.0, ABOVE, "Surrender 14 vs A at TC +3 or higher"),
];

/// Whether the insurance side bet should be taken at this true count.
pub fn insurance_recommended(true_count: f64) -> bool {
    true_count >= INSURANCE_INDEX
}

/// Finds the index play covering this situation, regardless of count.
pub fn find_play(
    class: HandClass,
    dealer_upcard: u8,
    include_surrender: bool,
) -> Option<&'static IndexPlay> {
    let i18 = ILLUSTRIOUS_18.iter().find(|p| p.matches(class, dealer_upcard));
    if i18.is_some() {
        return i18;
    }
    if include_surrender {
        return FAB_4.iter().find(|p| p.matches(class, dealer_upcard));
    }
    None
}

/// Rescales a balanced true-count index into running-count terms for an
/// unbalanced system: `index * decks_remaining + IRC`.
pub fn rescale_index(index: f64, decks_remaining: f64, irc: i32) -> f64 {
    index * decks_remaining + irc as f64
}

fn deviation_is_legal(action: Action, ctx: ActionContext) -> bool {
    match action {
        Action::Hit | Action::Stand => true,
        Action::Double => ctx.can_double,
        Action::Split => ctx.can_split,
        Action::Surrender => ctx.can_surrender,
    }
}

/// Applies any matching deviation on top of a basic-strategy action.
///
/// Returns the action to take and, when the count triggered an override,
/// the index play behind it. A deviation never enables an action the rules
/// forbid; an illegal deviation falls back to the basic action.
pub fn apply_deviation(
    class: HandClass,
    dealer_upcard: u8,
    true_count: f64,
    basic: Action,
    ctx: ActionContext,
) -> (Action, Option<&'static IndexPlay>) {
    // Basic strategy already surrenders the worst matchups; index plays
    // never downgrade a surrender.
    if basic == Action::Surrender {
        return (basic, None);
    }
    let play = match find_play(class, dealer_upcard, ctx.can_surrender) {
        Some(p) => p,
        None => return (basic, None),
    };
    if !play.should_deviate(true_count) {
        return (basic, None);
    }
    if !deviation_is_legal(play.deviation_action, ctx) {
        return (basic, None);
    }
    (play.deviation_action, Some(play))
}

/// Hint payload combining basic strategy with any count deviation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyHint {
    pub basic: Action,
    pub recommended: Action,
    pub is_deviation: bool,
    pub rationale: String,
}

/// Pure query: the recommended play for a hand against an upcard under the
/// given rules, at an optional true count.
///
/// The context is derived from the rules and hand alone (first decision of
/// the hand); the game state machine computes its own context when live.
pub fn strategy_hint(
    hand: &Hand,
    dealer_upcard: u8,
    rules: &RuleSet,
    true_count: Option<f64>,
) -> StrategyHint {
    let class = classify(hand);
    let two_cards = hand.num_cards() == 2;
    let ctx = ActionContext {
        can_double: two_cards
            && rules.double_on.permits(hand.total())
            && (!hand.from_split || rules.double_after_split),
        can_split: hand.is_pair() && !hand.from_split,
        can_surrender: rules.surrender != Surrender::None && two_cards && !hand.from_split,
    };

    let strategy = BasicStrategy::new(rules);
    let basic = strategy.action(class, dealer_upcard, ctx);

    let (recommended, play) = match true_count {
        Some(tc) => apply_deviation(class, dealer_upcard, tc, basic, ctx),
        None => (basic, None),
    };

    let rationale = match play {
        Some(p) => p.description.to_string(),
        None => "basic strategy".to_string(),
    };

    StrategyHint {
        basic,
        recommended,
        is_deviation: play.is_some(),
        rationale,
    }
}
