use edgewise_engine::cards::{all_ranks, Card, Rank, Suit};
use edgewise_engine::counting::{CountState, CountingSystem, KO_KEY_COUNT, KO_PIVOT};
use edgewise_engine::shoe::Shoe;

#[test]
fn hilo_over_a_full_single_deck_ends_at_zero() {
    let mut shoe = Shoe::new(1, 1.0, Some(123)).unwrap();
    let mut count = CountState::new(CountingSystem::HiLo, 1);
    for _ in 0..52 {
        let card = shoe.deal().unwrap();
        count.count_card(card);
    }
    assert_eq!(count.running_count(), 0.0);
    assert_eq!(count.cards_seen(), 52);
}

#[test]
fn every_balanced_system_sums_to_zero_over_any_whole_shoe() {
    for num_decks in [1u8, 2, 6] {
        for system in [
            CountingSystem::HiLo,
            CountingSystem::OmegaII,
            CountingSystem::WongHalves,
        ] {
            let mut shoe = Shoe::new(num_decks, 1.0, Some(999)).unwrap();
            let mut count = CountState::new(system, num_decks);
            for _ in 0..shoe.total_cards() {
                count.count_card(shoe.deal().unwrap());
            }
            assert_eq!(
                count.running_count(),
                0.0,
                "{system} over {num_decks} decks"
            );
        }
    }
}

#[test]
fn ko_six_deck_shoe_runs_from_irc_to_plus_four() {
    let mut count = CountState::new(CountingSystem::Ko, 6);
    assert_eq!(count.running_count(), -20.0);

    // Low cards 2-7: 24 of each rank value, +1 apiece.
    for rank in [Rank::Two, Rank::Three, Rank::Four, Rank::Five, Rank::Six, Rank::Seven] {
        for _ in 0..24 {
            count.count_card(Card::new(rank, Suit::Clubs));
        }
    }
    assert_eq!(count.running_count(), -20.0 + 144.0);

    // The rest of the shoe: 8s and 9s are neutral, tens and aces count -1.
    for rank in [Rank::Eight, Rank::Nine] {
        for _ in 0..24 {
            count.count_card(Card::new(rank, Suit::Hearts));
        }
    }
    for rank in [Rank::Ten, Rank::Jack, Rank::Queen, Rank::King, Rank::Ace] {
        for _ in 0..24 {
            count.count_card(Card::new(rank, Suit::Diamonds));
        }
    }
    assert_eq!(count.cards_seen(), 312);
    assert_eq!(count.running_count(), 4.0);
    assert_eq!(count.running_count(), KO_PIVOT);
    assert!(KO_KEY_COUNT < KO_PIVOT);
}

#[test]
fn true_count_divides_by_decks_remaining_for_balanced_systems() {
    let mut count = CountState::new(CountingSystem::HiLo, 6);
    for _ in 0..10 {
        count.count_card(Card::new(Rank::Five, Suit::Spades));
    }
    assert_eq!(count.running_count(), 10.0);
    assert_eq!(count.true_count(5.0), 2.0);
    assert_eq!(count.true_count(2.5), 4.0);
    // Floor at half a deck.
    assert_eq!(count.true_count(0.1), 20.0);
}

#[test]
fn reset_for_shoe_restores_the_irc() {
    let mut count = CountState::new(CountingSystem::Ko, 2);
    assert_eq!(count.running_count(), -4.0);
    for &rank in &all_ranks() {
        count.count_card(Card::new(rank, Suit::Clubs));
    }
    assert_ne!(count.cards_seen(), 0);
    count.reset_for_shoe();
    assert_eq!(count.running_count(), -4.0);
    assert_eq!(count.cards_seen(), 0);
}

#[test]
fn wong_halves_full_deck_is_exact_at_every_prefix() {
    // Counting a full deck rank by rank must never drift off the half-unit
    // grid, and lands on zero.
    let mut count = CountState::new(CountingSystem::WongHalves, 1);
    for &rank in &all_ranks() {
        for &suit in &edgewise_engine::cards::all_suits() {
            count.count_card(Card::new(rank, suit));
            let doubled = count.running_count() * 2.0;
            assert_eq!(doubled, doubled.round());
        }
    }
    assert_eq!(count.running_count(), 0.0);
}

#[test]
fn system_metadata_is_published_values() {
    let hilo = CountingSystem::HiLo.spec();
    assert!(hilo.balanced);
    assert!((hilo.betting_correlation - 0.97).abs() < 1e-9);

    let ko = CountingSystem::Ko.spec();
    assert!(!ko.balanced);

    let omega = CountingSystem::OmegaII.spec();
    assert!(omega.ace_side_count);
    assert!(omega.playing_efficiency > hilo.playing_efficiency);
}
