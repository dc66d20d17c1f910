use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::cards::Card;
use crate::counting::{CountState, CountingSystem};
use crate::deviations::{apply_deviation, insurance_recommended, StrategyHint};
use crate::errors::EngineError;
use crate::events::{Event, EventKind};
use crate::hand::{compare, Hand, HandOutcome};
use crate::rules::{RuleSet, Surrender};
use crate::shoe::Shoe;
use crate::strategy::{classify, ActionContext, BasicStrategy};

/// Round lifecycle states.
///
/// `Dealing`, `Splitting`, and `Resolving` are transient: commands pass
/// through them and settle on a stable state before returning, so callers
/// only ever observe the states between commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    WaitingForBet,
    Dealing,
    OfferingInsurance,
    PlayerTurn,
    Splitting,
    DealerTurn,
    Resolving,
    RoundComplete,
    GameOver,
}

/// Commands a session accepts, used for the legality query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    PlaceBet,
    Insurance,
    Hit,
    Stand,
    Double,
    Split,
    Surrender,
    NewRound,
    ResetGame,
}

/// Outcome summary of the last settled round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    /// Signed net in cents, insurance included.
    pub net: i64,
    pub outcomes: Vec<HandOutcome>,
    pub dealer_total: u8,
    pub voided: bool,
}

/// A single-seat blackjack game: one shoe, one counting state, one bankroll.
///
/// Every command validates fully before mutating, returns the ordered
/// event log for the transition, and leaves the game in a stable state.
#[derive(Debug, Clone)]
pub struct Game {
    pub(crate) rules: RuleSet,
    pub(crate) strategy: BasicStrategy,
    pub(crate) shoe: Shoe,
    pub(crate) counting: CountState,
    pub(crate) state: GameState,
    pub(crate) hands: Vec<Hand>,
    pub(crate) current_hand: usize,
    pub(crate) dealer: Hand,
    pub(crate) hole_revealed: bool,
    /// Bankroll in cents; only changes at round resolution.
    pub(crate) bankroll: i64,
    pub(crate) starting_bankroll: i64,
    pub(crate) insurance_bet: i64,
    pub(crate) last_result: Option<RoundSummary>,
}

impl Game {
    pub fn new(
        rules: RuleSet,
        system: CountingSystem,
        starting_bankroll: i64,
        seed: Option<u64>,
    ) -> Result<Self, EngineError> {
        rules.validate()?;
        if starting_bankroll < rules.min_bet {
            return Err(EngineError::Configuration(format!(
                "starting bankroll {} below table minimum {}",
                starting_bankroll, rules.min_bet
            )));
        }
        let shoe = Shoe::new(rules.num_decks, rules.penetration, seed)?;
        let counting = CountState::new(system, rules.num_decks);
        let strategy = BasicStrategy::new(&rules);
        Ok(Self {
            rules,
            strategy,
            shoe,
            counting,
            state: GameState::WaitingForBet,
            hands: Vec::new(),
            current_hand: 0,
            dealer: Hand::default(),
            hole_revealed: false,
            bankroll: starting_bankroll,
            starting_bankroll,
            insurance_bet: 0,
            last_result: None,
        })
    }

    // --- accessors -------------------------------------------------------

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    /// Mutable shoe access, for stacking known deals in drills and tests.
    pub fn shoe_mut(&mut self) -> &mut Shoe {
        &mut self.shoe
    }

    pub fn counting(&self) -> &CountState {
        &self.counting
    }

    pub fn bankroll(&self) -> i64 {
        self.bankroll
    }

    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    pub fn current_hand_index(&self) -> usize {
        self.current_hand
    }

    pub fn dealer_hand(&self) -> &Hand {
        &self.dealer
    }

    pub fn hole_revealed(&self) -> bool {
        self.hole_revealed
    }

    pub fn insurance_bet(&self) -> i64 {
        self.insurance_bet
    }

    pub fn last_result(&self) -> Option<&RoundSummary> {
        self.last_result.as_ref()
    }

    fn current(&self) -> Option<&Hand> {
        self.hands.get(self.current_hand)
    }

    /// Effective true count: RC over decks remaining for balanced systems;
    /// for unbalanced systems the IRC-adjusted equivalent, so deviation
    /// indices compare correctly.
    pub fn true_count(&self) -> f64 {
        let decks = self.shoe.decks_remaining();
        if self.counting.system().is_balanced() {
            self.counting.true_count(decks)
        } else {
            let irc = self
                .counting
                .system()
                .initial_running_count(self.rules.num_decks);
            (self.counting.running_count() - irc as f64) / decks
        }
    }

    // --- action legality -------------------------------------------------

    pub fn can_hit(&self) -> bool {
        self.state == GameState::PlayerTurn
            && self.current().is_some_and(|h| !h.is_bust() && !h.stood)
    }

    pub fn can_stand(&self) -> bool {
        self.state == GameState::PlayerTurn
    }

    pub fn can_double(&self) -> bool {
        if self.state != GameState::PlayerTurn {
            return false;
        }
        let Some(hand) = self.current() else {
            return false;
        };
        hand.num_cards() == 2
            && !hand.doubled
            && self.rules.double_on.permits(hand.total())
            && (!hand.from_split || self.rules.double_after_split)
            && hand.bet <= self.bankroll
    }

    pub fn can_split(&self) -> bool {
        if self.state != GameState::PlayerTurn {
            return false;
        }
        let Some(hand) = self.current() else {
            return false;
        };
        if !hand.is_pair() || self.hands.len() >= self.rules.max_splits as usize {
            return false;
        }
        if hand.cards[0].is_ace() && hand.from_split && !self.rules.resplit_aces {
            return false;
        }
        hand.bet <= self.bankroll
    }

    pub fn can_surrender(&self) -> bool {
        if self.state != GameState::PlayerTurn || self.rules.surrender == Surrender::None {
            return false;
        }
        self.current()
            .is_some_and(|h| h.num_cards() == 2 && !h.from_split)
    }

    pub fn can_insure(&self) -> bool {
        self.state == GameState::OfferingInsurance
    }

    /// Exactly the commands that would not fail validation right now.
    pub fn available_actions(&self) -> Vec<ActionKind> {
        let mut actions = Vec::new();
        if self.state == GameState::WaitingForBet && self.bankroll >= self.rules.min_bet {
            actions.push(ActionKind::PlaceBet);
        }
        if self.can_insure() {
            actions.push(ActionKind::Insurance);
        }
        if self.can_hit() {
            actions.push(ActionKind::Hit);
        }
        if self.can_stand() {
            actions.push(ActionKind::Stand);
        }
        if self.can_double() {
            actions.push(ActionKind::Double);
        }
        if self.can_split() {
            actions.push(ActionKind::Split);
        }
        if self.can_surrender() {
            actions.push(ActionKind::Surrender);
        }
        if self.state == GameState::RoundComplete {
            actions.push(ActionKind::NewRound);
        }
        actions.push(ActionKind::ResetGame);
        actions
    }

    /// Recommended play for the current hand, count deviations included.
    pub fn hint(&self) -> Option<StrategyHint> {
        let hand = self.current()?;
        if self.state != GameState::PlayerTurn {
            return None;
        }
        let upcard = self.dealer.cards.first()?.value();
        let ctx = ActionContext {
            can_double: self.can_double(),
            can_split: self.can_split(),
            can_surrender: self.can_surrender(),
        };
        let class = classify(hand);
        let basic = self.strategy.action(class, upcard, ctx);
        let (recommended, play) = apply_deviation(class, upcard, self.true_count(), basic, ctx);
        Some(StrategyHint {
            basic,
            recommended,
            is_deviation: play.is_some(),
            rationale: play
                .map(|p| p.description.to_string())
                .unwrap_or_else(|| "basic strategy".to_string()),
        })
    }

    /// Whether the insurance side bet is advised at the current count.
    pub fn insurance_advised(&self) -> bool {
        insurance_recommended(self.true_count())
    }

    // --- internals -------------------------------------------------------

    fn count_and_log(&mut self, card: Card, to: &str, hand_index: usize, events: &mut Vec<Event>) {
        self.counting.count_card(card);
        events.push(Event::new(
            EventKind::CardDealt,
            json!({ "card": card.to_string(), "to": to, "hand": hand_index }),
        ));
    }

    fn reveal_hole(&mut self, events: &mut Vec<Event>) {
        if self.hole_revealed {
            return;
        }
        if let Some(&hole) = self.dealer.cards.get(1) {
            self.counting.count_card(hole);
            events.push(Event::new(
                EventKind::CardRevealed,
                json!({ "card": hole.to_string(), "to": "dealer" }),
            ));
        }
        self.hole_revealed = true;
    }

    fn reshuffle_if_needed(&mut self, events: &mut Vec<Event>) {
        if self.shoe.needs_shuffle() {
            self.shoe.reshuffle();
            self.counting.reset_for_shoe();
            events.push(Event::new(
                EventKind::ShoeShuffled,
                json!({ "decks": self.rules.num_decks }),
            ));
        }
    }

    /// The shoe ran dry mid-round: every wager pushes, with a diagnostic.
    fn void_round(&mut self, mut events: Vec<Event>) -> Vec<Event> {
        events.push(Event::new(
            EventKind::RoundVoided,
            json!({ "reason": "shoe exhausted" }),
        ));
        let outcomes: Vec<HandOutcome> = self.hands.iter().map(|_| HandOutcome::Push).collect();
        self.last_result = Some(RoundSummary {
            net: 0,
            outcomes: outcomes.clone(),
            dealer_total: self.dealer.total(),
            voided: true,
        });
        events.push(Event::new(
            EventKind::RoundEnded,
            json!({ "net": 0, "voided": true, "outcomes": outcomes }),
        ));
        self.insurance_bet = 0;
        self.state = GameState::RoundComplete;
        events
    }

    fn dealer_should_hit(&self) -> bool {
        let total = self.dealer.total();
        if total < 17 {
            return true;
        }
        total == 17 && self.dealer.is_soft() && self.rules.dealer_hits_soft_17
    }

    fn playable(hand: &Hand) -> bool {
        !hand.stood && !hand.surrendered && !hand.is_bust()
    }

    /// Moves to the next playable hand, or on to the dealer / resolution.
    fn advance(&mut self, mut events: Vec<Event>) -> Result<Vec<Event>, EngineError> {
        loop {
            self.current_hand += 1;
            let playable = self.hands.get(self.current_hand).map(Self::playable);
            match playable {
                Some(true) => {
                    self.state = GameState::PlayerTurn;
                    return Ok(events);
                }
                Some(false) => continue,
                None => break,
            }
        }

        let all_dead = self
            .hands
            .iter()
            .all(|h| h.is_bust() || h.surrendered);
        if all_dead {
            // Dealer does not play; the hole card still gets exposed.
            self.reveal_hole(&mut events);
            return Ok(self.resolve(events));
        }

        self.state = GameState::DealerTurn;
        self.play_dealer(events)
    }

    fn play_dealer(&mut self, mut events: Vec<Event>) -> Result<Vec<Event>, EngineError> {
        self.reveal_hole(&mut events);
        while self.dealer_should_hit() {
            match self.shoe.deal() {
                Ok(card) => {
                    self.dealer.add_card(card);
                    self.count_and_log(card, "dealer", 0, &mut events);
                }
                Err(EngineError::ShoeExhausted) => return Ok(self.void_round(events)),
                Err(e) => return Err(e),
            }
        }
        if self.dealer.is_bust() {
            events.push(Event::new(
                EventKind::Bust,
                json!({ "who": "dealer", "total": self.dealer.total() }),
            ));
        }
        Ok(self.resolve(events))
    }

    fn resolve(&mut self, mut events: Vec<Event>) -> Vec<Event> {
        self.state = GameState::Resolving;
        let mut net: i64 = 0;

        if self.insurance_bet > 0 {
            if self.dealer.is_blackjack() {
                net += self.insurance_bet * 2;
            } else {
                net -= self.insurance_bet;
            }
        }

        let mut outcomes = Vec::with_capacity(self.hands.len());
        for hand in &self.hands {
            let result = if hand.surrendered {
                outcomes.push(HandOutcome::Lose);
                -hand.bet / 2
            } else {
                let outcome = compare(hand, &self.dealer);
                outcomes.push(outcome);
                match outcome {
                    HandOutcome::Win => {
                        if hand.is_blackjack() {
                            self.rules.blackjack_payout.payout(hand.bet)
                        } else {
                            hand.bet
                        }
                    }
                    HandOutcome::Lose => -hand.bet,
                    HandOutcome::Push => 0,
                }
            };
            net += result;
        }

        self.bankroll += net;
        self.last_result = Some(RoundSummary {
            net,
            outcomes: outcomes.clone(),
            dealer_total: self.dealer.total(),
            voided: false,
        });
        self.insurance_bet = 0;

        events.push(Event::new(
            EventKind::RoundEnded,
            json!({
                "net": net,
                "dealer_total": self.dealer.total(),
                "outcomes": outcomes,
            }),
        ));
        events.push(Event::new(
            EventKind::BankrollChanged,
            json!({ "bankroll": self.bankroll, "delta": net }),
        ));

        if self.bankroll < self.rules.min_bet {
            self.state = GameState::GameOver;
        } else {
            self.state = GameState::RoundComplete;
        }
        events
    }

    // --- commands --------------------------------------------------------

    /// Places a bet (cents) and deals the round.
    pub fn place_bet(&mut self, amount: i64) -> Result<Vec<Event>, EngineError> {
        if self.state != GameState::WaitingForBet {
            return Err(EngineError::validation("cannot bet in the current state"));
        }
        if amount < self.rules.min_bet || amount > self.rules.max_bet {
            return Err(EngineError::Validation(format!(
                "bet must be between {} and {}",
                self.rules.min_bet, self.rules.max_bet
            )));
        }
        if amount > self.bankroll {
            return Err(EngineError::validation("bet exceeds bankroll"));
        }

        let mut events = Vec::new();
        self.reshuffle_if_needed(&mut events);

        self.state = GameState::Dealing;
        self.hands.clear();
        self.current_hand = 0;
        self.dealer = Hand::default();
        self.hole_revealed = false;
        self.insurance_bet = 0;
        self.last_result = None;
        self.hands.push(Hand::new(amount));

        // Player, dealer up, player, dealer hole.
        for step in 0..4u8 {
            let card = match self.shoe.deal() {
                Ok(c) => c,
                Err(EngineError::ShoeExhausted) => return Ok(self.void_round(events)),
                Err(e) => return Err(e),
            };
            match step {
                0 | 2 => {
                    self.hands[0].add_card(card);
                    self.count_and_log(card, "player", 0, &mut events);
                }
                1 => {
                    self.dealer.add_card(card);
                    self.count_and_log(card, "dealer", 0, &mut events);
                }
                _ => {
                    // Hole card stays face down and uncounted until revealed.
                    self.dealer.add_card(card);
                    events.push(Event::new(
                        EventKind::CardDealt,
                        json!({ "to": "dealer", "hidden": true }),
                    ));
                }
            }
        }

        let player_bj = self.hands[0].is_blackjack();
        let upcard = self.dealer.cards[0];

        if player_bj {
            events.push(Event::new(EventKind::PlayerBlackjack, json!({ "hand": 0 })));
        }

        if upcard.is_ace() && self.rules.insurance_allowed && !player_bj {
            self.state = GameState::OfferingInsurance;
            events.push(Event::new(
                EventKind::InsuranceOffered,
                json!({ "cost": self.hands[0].bet / 2 }),
            ));
            return Ok(events);
        }

        let peek = self.rules.dealer_peeks && (upcard.is_ace() || upcard.is_ten_value());
        if peek && self.dealer.is_blackjack() {
            events.push(Event::new(EventKind::DealerBlackjack, json!({})));
            self.reveal_hole(&mut events);
            return Ok(self.resolve(events));
        }

        if player_bj {
            self.reveal_hole(&mut events);
            return Ok(self.resolve(events));
        }

        self.state = GameState::PlayerTurn;
        Ok(events)
    }

    /// Takes or declines the offered insurance.
    pub fn insurance(&mut self, take: bool) -> Result<Vec<Event>, EngineError> {
        if self.state != GameState::OfferingInsurance {
            return Err(EngineError::validation("insurance is not being offered"));
        }
        let mut events = Vec::new();
        if take {
            let cost = self.hands[0].bet / 2;
            if cost > self.bankroll {
                return Err(EngineError::validation("insufficient bankroll for insurance"));
            }
            self.insurance_bet = cost;
            events.push(Event::new(
                EventKind::InsuranceTaken,
                json!({ "amount": cost }),
            ));
        }

        if self.rules.dealer_peeks && self.dealer.is_blackjack() {
            events.push(Event::new(EventKind::DealerBlackjack, json!({})));
            self.reveal_hole(&mut events);
            return Ok(self.resolve(events));
        }

        self.state = GameState::PlayerTurn;
        Ok(events)
    }

    /// Draws one card to the current hand.
    pub fn hit(&mut self) -> Result<Vec<Event>, EngineError> {
        if !self.can_hit() {
            return Err(EngineError::validation("cannot hit now"));
        }
        let mut events = Vec::new();
        let card = match self.shoe.deal() {
            Ok(c) => c,
            Err(EngineError::ShoeExhausted) => return Ok(self.void_round(events)),
            Err(e) => return Err(e),
        };
        let index = self.current_hand;
        self.hands[index].add_card(card);
        self.count_and_log(card, "player", index, &mut events);

        if self.hands[index].is_bust() {
            events.push(Event::new(
                EventKind::Bust,
                json!({ "who": "player", "hand": index, "total": self.hands[index].total() }),
            ));
            return self.advance(events);
        }
        Ok(events)
    }

    /// Ends play on the current hand.
    pub fn stand(&mut self) -> Result<Vec<Event>, EngineError> {
        if !self.can_stand() {
            return Err(EngineError::validation("cannot stand now"));
        }
        self.hands[self.current_hand].stood = true;
        self.advance(Vec::new())
    }

    /// Doubles the bet, draws exactly one card, and ends the hand.
    pub fn double_down(&mut self) -> Result<Vec<Event>, EngineError> {
        if !self.can_double() {
            return Err(EngineError::validation("cannot double now"));
        }
        let mut events = Vec::new();
        let card = match self.shoe.deal() {
            Ok(c) => c,
            Err(EngineError::ShoeExhausted) => return Ok(self.void_round(events)),
            Err(e) => return Err(e),
        };
        let index = self.current_hand;
        let hand = &mut self.hands[index];
        hand.bet *= 2;
        hand.doubled = true;
        hand.stood = true;
        hand.add_card(card);
        self.count_and_log(card, "player", index, &mut events);
        events.push(Event::new(
            EventKind::Doubled,
            json!({ "hand": index, "bet": self.hands[index].bet }),
        ));
        if self.hands[index].is_bust() {
            events.push(Event::new(
                EventKind::Bust,
                json!({ "who": "player", "hand": index, "total": self.hands[index].total() }),
            ));
        }
        self.advance(events)
    }

    /// Splits the current pair into two hands and deals one card to each.
    pub fn split(&mut self) -> Result<Vec<Event>, EngineError> {
        if !self.can_split() {
            return Err(EngineError::validation("cannot split now"));
        }
        self.state = GameState::Splitting;
        let mut events = Vec::new();
        let index = self.current_hand;

        let moved = self.hands[index]
            .cards
            .pop()
            .ok_or_else(|| EngineError::Invariant("split on empty hand".into()))?;
        let splitting_aces = moved.is_ace();
        let bet = self.hands[index].bet;
        self.hands[index].from_split = true;

        let mut sibling = Hand::new(bet);
        sibling.from_split = true;
        sibling.add_card(moved);
        self.hands.insert(index + 1, sibling);

        events.push(Event::new(
            EventKind::HandSplit,
            json!({ "hand": index, "card": moved.to_string() }),
        ));

        for offset in 0..2usize {
            let card = match self.shoe.deal() {
                Ok(c) => c,
                Err(EngineError::ShoeExhausted) => return Ok(self.void_round(events)),
                Err(e) => return Err(e),
            };
            self.hands[index + offset].add_card(card);
            self.count_and_log(card, "player", index + offset, &mut events);
        }

        if splitting_aces && !self.rules.hit_split_aces {
            // One card each, no further action on either hand.
            self.hands[index].stood = true;
            self.hands[index + 1].stood = true;
            self.current_hand = index;
            return self.advance(events);
        }

        self.state = GameState::PlayerTurn;
        Ok(events)
    }

    /// Gives up the current hand for half the bet.
    pub fn surrender(&mut self) -> Result<Vec<Event>, EngineError> {
        if !self.can_surrender() {
            return Err(EngineError::validation("cannot surrender now"));
        }
        let index = self.current_hand;
        self.hands[index].surrendered = true;
        let events = vec![Event::new(EventKind::Surrendered, json!({ "hand": index }))];
        self.advance(events)
    }

    /// Returns to the betting state, reshuffling behind the cut card.
    pub fn new_round(&mut self) -> Result<Vec<Event>, EngineError> {
        if self.state != GameState::RoundComplete {
            return Err(EngineError::validation("round is not complete"));
        }
        let mut events = Vec::new();
        self.hands.clear();
        self.current_hand = 0;
        self.dealer = Hand::default();
        self.hole_revealed = false;
        self.reshuffle_if_needed(&mut events);
        self.state = GameState::WaitingForBet;
        Ok(events)
    }

    /// Fresh shoe, fresh count, starting bankroll restored.
    pub fn reset_game(&mut self) -> Result<Vec<Event>, EngineError> {
        let mut events = Vec::new();
        self.shoe.reshuffle();
        self.counting.reset_for_shoe();
        events.push(Event::new(
            EventKind::ShoeShuffled,
            json!({ "decks": self.rules.num_decks }),
        ));
        self.hands.clear();
        self.current_hand = 0;
        self.dealer = Hand::default();
        self.hole_revealed = false;
        self.insurance_bet = 0;
        self.bankroll = self.starting_bankroll;
        self.last_result = None;
        self.state = GameState::WaitingForBet;
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game_with_seed(seed: u64) -> Game {
        Game::new(
            RuleSet::default(),
            CountingSystem::HiLo,
            1_000_00,
            Some(seed),
        )
        .unwrap()
    }

    #[test]
    fn bet_out_of_range_is_rejected_without_state_change() {
        let mut game = game_with_seed(1);
        assert!(game.place_bet(1).is_err());
        assert!(game.place_bet(10_000_00).is_err());
        assert_eq!(game.state(), GameState::WaitingForBet);
        assert_eq!(game.bankroll(), 1_000_00);
    }

    #[test]
    fn commands_outside_their_state_fail_validation() {
        let mut game = game_with_seed(2);
        assert!(game.hit().is_err());
        assert!(game.stand().is_err());
        assert!(game.insurance(true).is_err());
        assert!(game.new_round().is_err());
    }

    #[test]
    fn a_full_round_settles_the_bankroll_by_the_net() {
        let mut game = game_with_seed(3);
        let before = game.bankroll();
        game.place_bet(25_00).unwrap();
        while game.state() == GameState::OfferingInsurance {
            game.insurance(false).unwrap();
        }
        while game.state() == GameState::PlayerTurn {
            game.stand().unwrap();
        }
        assert!(matches!(
            game.state(),
            GameState::RoundComplete | GameState::GameOver
        ));
        let summary = game.last_result().unwrap().clone();
        assert_eq!(game.bankroll(), before + summary.net);
    }

    #[test]
    fn available_actions_match_command_validation() {
        let mut game = game_with_seed(4);
        game.place_bet(10_00).unwrap();
        let actions = game.available_actions();
        let state_snapshot = game.clone();

        let probes: Vec<(ActionKind, Box<dyn Fn(&mut Game) -> Result<Vec<Event>, EngineError>>)> = vec![
            (ActionKind::Hit, Box::new(|g: &mut Game| g.hit())),
            (ActionKind::Stand, Box::new(|g: &mut Game| g.stand())),
            (ActionKind::Double, Box::new(|g: &mut Game| g.double_down())),
            (ActionKind::Split, Box::new(|g: &mut Game| g.split())),
            (ActionKind::Surrender, Box::new(|g: &mut Game| g.surrender())),
            (
                ActionKind::Insurance,
                Box::new(|g: &mut Game| g.insurance(false)),
            ),
            (
                ActionKind::PlaceBet,
                Box::new(|g: &mut Game| g.place_bet(10_00)),
            ),
            (ActionKind::NewRound, Box::new(|g: &mut Game| g.new_round())),
        ];
        for (kind, run) in probes {
            let mut probe = state_snapshot.clone();
            let ok = run(&mut probe).is_ok();
            assert_eq!(
                ok,
                actions.contains(&kind),
                "{kind:?} legality mismatch in state {:?}",
                state_snapshot.state()
            );
        }
    }
}
