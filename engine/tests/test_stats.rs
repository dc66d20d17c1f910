use edgewise_engine::rules::{BlackjackPayout, RuleSet, Surrender};
use edgewise_engine::shoe::Composition;
use edgewise_engine::stats::{
    bet_spread, dealer_distribution, dealer_distribution_infinite, hands_to_double, house_edge,
    kelly_fraction, n_zero, player_advantage, recommended_bet, risk_of_ruin, BLACKJACK_VARIANCE,
};

#[test]
fn half_kelly_reference_bet() {
    // edge 1%, variance 1.3225, bankroll $10,000, half Kelly: ~$37.81.
    let bet = recommended_bet(0.01, 10_000_00, 0.5);
    assert_eq!(bet, 37_81);
    let f = kelly_fraction(0.01, BLACKJACK_VARIANCE);
    assert!((f - 0.007561).abs() < 1e-5);
}

#[test]
fn dealer_distributions_sum_to_one() {
    let full = Composition::full(6);
    for upcard in 2..=11u8 {
        let mut comp = full;
        comp.remove(upcard);
        for h17 in [false, true] {
            let exact = dealer_distribution(upcard, &comp, h17);
            assert!(
                (exact.sum() - 1.0).abs() < 1e-9,
                "exact upcard {upcard} h17 {h17}: {}",
                exact.sum()
            );
        }
    }
}

#[test]
fn base_table_tracks_exact_recursion_on_a_full_shoe() {
    let full = Composition::full(6);
    for upcard in 2..=11u8 {
        let mut comp = full;
        comp.remove(upcard);
        let exact = dealer_distribution(upcard, &comp, false);
        let table = dealer_distribution_infinite(upcard, false);
        assert!(
            (exact.bust - table.bust).abs() < 8e-3,
            "upcard {upcard}: exact bust {} vs table {}",
            exact.bust,
            table.bust
        );
    }
}

#[test]
fn composition_shifts_the_dealer_outcome() {
    // Strip every ten-value card from a single deck: the dealer stops
    // busting stiffs with tens, so the bust rate against a 6 collapses.
    let mut no_tens = Composition::full(1);
    for _ in 0..16 {
        no_tens.remove(10);
    }
    no_tens.remove(6);
    let depleted = dealer_distribution(6, &no_tens, false);

    let mut full = Composition::full(1);
    full.remove(6);
    let baseline = dealer_distribution(6, &full, false);
    assert!(depleted.bust < baseline.bust);
}

#[test]
fn house_edge_responds_to_rule_changes_in_the_right_direction() {
    let base = RuleSet::vegas_strip();
    let h17 = RuleSet {
        dealer_hits_soft_17: true,
        ..base.clone()
    };
    let six_five = RuleSet {
        blackjack_payout: BlackjackPayout::SixToFive,
        ..base.clone()
    };
    let no_surrender = RuleSet {
        surrender: Surrender::None,
        ..base.clone()
    };
    let single = RuleSet::single_deck();

    assert!(house_edge(&h17) > house_edge(&base));
    assert!(house_edge(&six_five) > house_edge(&base));
    assert!(house_edge(&no_surrender) > house_edge(&base));
    assert!(house_edge(&single) < house_edge(&RuleSet {
        num_decks: 6,
        ..RuleSet::single_deck()
    }));

    for rules in [base, h17, six_five, no_surrender, single] {
        let e = house_edge(&rules);
        assert!((-0.02..=0.05).contains(&e), "edge {e} out of envelope");
    }
}

#[test]
fn advantage_rises_half_a_point_per_true_count() {
    let rules = RuleSet::vegas_strip();
    let at0 = player_advantage(0.0, &rules);
    let at2 = player_advantage(2.0, &rules);
    assert!((at2 - at0 - 0.01).abs() < 1e-12);
}

#[test]
fn risk_of_ruin_shrinks_with_bankroll_and_edge() {
    let var = BLACKJACK_VARIANCE;
    assert_eq!(risk_of_ruin(0.0, 500.0, var), 1.0);
    let thin = risk_of_ruin(0.005, 200.0, var);
    let fat = risk_of_ruin(0.005, 800.0, var);
    assert!(fat < thin && thin < 1.0);
    assert!(hands_to_double(0.01, 400.0).unwrap() > 0);
    assert!(n_zero(0.01, var) > 10_000.0);
}

#[test]
fn bet_spread_follows_the_ramp() {
    let base = 10_00;
    assert_eq!(bet_spread(-2.0, base, 12, 1.0), base);
    assert_eq!(bet_spread(3.0, base, 12, 1.0), 3 * base);
    assert_eq!(bet_spread(50.0, base, 12, 1.0), 12 * base);
}
