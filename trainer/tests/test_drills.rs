use edgewise_engine::counting::{CountState, CountingSystem};
use edgewise_engine::rules::RuleSet;
use edgewise_engine::strategy::Action;
use edgewise_trainer::drills::{speed_score, DrillError, DrillStore};

#[test]
fn counting_drill_expected_count_matches_a_fresh_recount() {
    let mut store = DrillStore::new();
    for system in [
        CountingSystem::HiLo,
        CountingSystem::Ko,
        CountingSystem::OmegaII,
        CountingSystem::WongHalves,
    ] {
        let drill = store.counting_drill(30, system, Some(17)).unwrap();
        let mut recount = CountState::new(system, 1);
        for card in &drill.cards {
            recount.count_card(*card);
        }
        assert_eq!(
            drill.expected_count,
            recount.running_count(),
            "system {system}"
        );
        assert_eq!(drill.cards.len(), 30);
    }
}

#[test]
fn drill_cards_never_repeat_within_a_drill() {
    let mut store = DrillStore::new();
    let drill = store
        .counting_drill(52, CountingSystem::HiLo, Some(23))
        .unwrap();
    let mut seen = std::collections::HashSet::new();
    for card in &drill.cards {
        assert!(seen.insert(*card), "duplicate {card}");
    }
    // A whole single deck counts to zero under a balanced system.
    assert_eq!(drill.expected_count, 0.0);
}

#[test]
fn verify_count_scores_speed_attempts() {
    let mut store = DrillStore::new();
    let drill = store
        .counting_drill(20, CountingSystem::HiLo, Some(29))
        .unwrap();
    let outcome = store
        .verify_count(&drill.id, drill.expected_count, Some(12_000))
        .unwrap();
    assert!(outcome.correct);
    assert_eq!(outcome.score, Some(speed_score(20, 12_000, true)));
}

#[test]
fn expired_drill_ids_are_a_protocol_error() {
    let mut store = DrillStore::new();
    assert_eq!(
        store.verify_count("missing", 0.0, None),
        Err(DrillError::UnknownDrill("missing".to_string()))
    );
}

#[test]
fn strategy_drills_are_always_answerable() {
    let mut store = DrillStore::new();
    let rules = RuleSet::default();
    for seed in 0..50 {
        let drill = store.strategy_drill(&rules, Some(seed)).unwrap();
        assert_eq!(drill.player_cards.len(), 2);
        assert!(drill.player_total >= 4 && drill.player_total <= 21);
        assert!(matches!(
            drill.correct_action,
            Action::Hit | Action::Stand | Action::Double | Action::Split | Action::Surrender
        ));
    }
}

#[test]
fn deviation_drill_biases_toward_decidable_indices() {
    let mut store = DrillStore::new();
    // A tight range around zero: every sampled play must carry an index
    // inside the range, because the catalog has entries there.
    for seed in 0..40 {
        let drill = store
            .deviation_drill((-1.0, 1.0), true, Some(seed))
            .unwrap();
        let index_in_range = edgewise_engine::deviations::ILLUSTRIOUS_18
            .iter()
            .chain(edgewise_engine::deviations::FAB_4.iter())
            .any(|p| {
                p.player_total == drill.player_total
                    && p.dealer_upcard == drill.dealer_upcard
                    && (-1.0..=1.0).contains(&p.index)
            });
        assert!(index_in_range, "seed {seed} sampled an out-of-range index");
    }
}

#[test]
fn deviation_drill_oracle_respects_the_threshold() {
    let mut store = DrillStore::new();
    for seed in 0..40 {
        let drill = store
            .deviation_drill((-3.0, 6.0), true, Some(seed))
            .unwrap();
        if drill.correct_action != drill.basic_action {
            // The count must actually clear the play's threshold.
            let play = edgewise_engine::deviations::ILLUSTRIOUS_18
                .iter()
                .chain(edgewise_engine::deviations::FAB_4.iter())
                .find(|p| {
                    p.player_total == drill.player_total
                        && p.dealer_upcard == drill.dealer_upcard
                        && p.is_pair == drill.is_pair
                        && p.deviation_action == drill.correct_action
                })
                .expect("drill situation not in catalog");
            assert!(play.should_deviate(drill.true_count), "seed {seed}");
        }
    }
}
