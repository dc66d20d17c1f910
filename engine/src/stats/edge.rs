use crate::rules::{BlackjackPayout, DoubleRestriction, RuleSet, Surrender};

/// Baseline house edge: six decks, S17, 3:2 blackjack, DAS, no surrender.
const BASELINE: f64 = 0.0050;

// Rule effects in edge fraction; positive favors the house.
const DECK_1: f64 = -0.0048;
const DECK_2: f64 = -0.0019;
const DECK_4: f64 = -0.0006;
const DECK_8: f64 = 0.0002;
const H17: f64 = 0.0022;
const BJ_6_5: f64 = 0.0139;
const BJ_1_1: f64 = 0.0227;
const NO_DAS: f64 = 0.0014;
const DOUBLE_10_11_ONLY: f64 = 0.0018;
const DOUBLE_9_11_ONLY: f64 = 0.0009;
const RESPLIT_ACES: f64 = -0.0008;
const HIT_SPLIT_ACES: f64 = -0.0019;
const LATE_SURRENDER: f64 = -0.0008;
const EARLY_SURRENDER: f64 = -0.0039;
const NO_PEEK: f64 = 0.0011;

/// Value of one true-count point to the player.
const EDGE_PER_TRUE_COUNT: f64 = 0.005;

/// House edge for a rule set, as a fraction (0.0042 = 0.42%), assuming
/// perfect basic strategy. Derived from the published rule-variation
/// adjustments off a six-deck baseline.
pub fn house_edge(rules: &RuleSet) -> f64 {
    let mut edge = BASELINE;

    edge += match rules.num_decks {
        1 => DECK_1,
        2 => DECK_2,
        4 => DECK_4,
        8 => DECK_8,
        _ => 0.0,
    };
    if rules.dealer_hits_soft_17 {
        edge += H17;
    }
    edge += match rules.blackjack_payout {
        BlackjackPayout::ThreeToTwo => 0.0,
        BlackjackPayout::SixToFive => BJ_6_5,
        BlackjackPayout::EvenMoney => BJ_1_1,
    };
    if !rules.double_after_split {
        edge += NO_DAS;
    }
    edge += match rules.double_on {
        DoubleRestriction::AnyTwo => 0.0,
        DoubleRestriction::NineToEleven => DOUBLE_9_11_ONLY,
        DoubleRestriction::TenToEleven => DOUBLE_10_11_ONLY,
    };
    if rules.resplit_aces {
        edge += RESPLIT_ACES;
    }
    if rules.hit_split_aces {
        edge += HIT_SPLIT_ACES;
    }
    edge += match rules.surrender {
        Surrender::None => 0.0,
        Surrender::Late => LATE_SURRENDER,
        Surrender::Early => EARLY_SURRENDER,
    };
    if !rules.dealer_peeks {
        edge += NO_PEEK;
    }
    edge
}

/// Player advantage at a true count: each point is worth about half a
/// percent against the base house edge. Positive means the player has the
/// edge.
pub fn player_advantage(true_count: f64, rules: &RuleSet) -> f64 {
    true_count * EDGE_PER_TRUE_COUNT - house_edge(rules)
}
