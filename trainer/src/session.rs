use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use edgewise_engine::counting::CountingSystem;
use edgewise_engine::errors::EngineError;
use edgewise_engine::events::{Event, EventKind};
use edgewise_engine::game::{ActionKind, Game};
use edgewise_engine::hand::HandOutcome;
use edgewise_engine::rules::RuleSet;
use edgewise_engine::snapshot::StateSnapshot;

use crate::config::TrainingConfig;
use crate::drills::{
    CountingDrill, DeviationDrill, DrillError, DrillStore, StrategyDrill, VerifyOutcome,
};
use crate::scores::HighScores;

pub type SessionId = String;

/// One command against a session's game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    PlaceBet { amount: i64 },
    Insurance { take: bool },
    Hit,
    Stand,
    Double,
    Split,
    Surrender,
    NewRound,
    ResetGame,
}

/// Per-drill attempt bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillTally {
    pub attempted: u32,
    pub correct: u32,
}

impl DrillTally {
    fn record(&mut self, correct: bool) {
        self.attempted += 1;
        if correct {
            self.correct += 1;
        }
    }
}

/// Kinds of drills a session tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillKind {
    Counting,
    Speed,
    Strategy,
    Deviation,
}

/// Session statistics, updated only from engine events and drill results.
/// Never mutates engine state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub hands_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub pushes: u32,
    pub blackjacks: u32,
    /// Signed cents over the session.
    pub net_result: i64,
    pub bankroll_history: Vec<i64>,
    pub counting: DrillTally,
    pub speed: DrillTally,
    pub strategy: DrillTally,
    pub deviation: DrillTally,
    pub speed_best_score: Option<u32>,
}

impl SessionStats {
    /// Folds one command's event log into the tallies.
    pub fn apply_events(&mut self, events: &[Event]) {
        for event in events {
            match event.kind {
                EventKind::PlayerBlackjack => self.blackjacks += 1,
                EventKind::RoundEnded => {
                    if let Some(net) = event.payload.get("net").and_then(|v| v.as_i64()) {
                        self.net_result += net;
                    }
                    if let Some(outcomes) = event.payload.get("outcomes") {
                        if let Ok(outcomes) =
                            serde_json::from_value::<Vec<HandOutcome>>(outcomes.clone())
                        {
                            for outcome in outcomes {
                                self.hands_played += 1;
                                match outcome {
                                    HandOutcome::Win => self.wins += 1,
                                    HandOutcome::Lose => self.losses += 1,
                                    HandOutcome::Push => self.pushes += 1,
                                }
                            }
                        }
                    }
                }
                EventKind::BankrollChanged => {
                    if let Some(bankroll) =
                        event.payload.get("bankroll").and_then(|v| v.as_i64())
                    {
                        self.bankroll_history.push(bankroll);
                    }
                }
                _ => {}
            }
        }
    }

    /// Folds one drill outcome into the tallies.
    pub fn record_drill(&mut self, kind: DrillKind, correct: bool, score: Option<u32>) {
        match kind {
            DrillKind::Counting => self.counting.record(correct),
            DrillKind::Speed => {
                self.speed.record(correct);
                if let Some(score) = score {
                    if self.speed_best_score.map_or(true, |best| score > best) {
                        self.speed_best_score = Some(score);
                    }
                }
            }
            DrillKind::Strategy => self.strategy.record(correct),
            DrillKind::Deviation => self.deviation.record(correct),
        }
    }
}

/// Result of applying one command: the ordered event log plus the state
/// the transport may render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutput {
    pub events: Vec<Event>,
    pub snapshot: StateSnapshot,
}

/// One training session: a game, its drills, and its statistics.
#[derive(Debug)]
pub struct TrainerSession {
    pub id: SessionId,
    config: TrainingConfig,
    game: Game,
    stats: SessionStats,
    drills: DrillStore,
}

impl TrainerSession {
    pub fn new(id: SessionId, config: TrainingConfig) -> Result<Self, SessionError> {
        config
            .validate()
            .map_err(|e| SessionError::Config(e.to_string()))?;
        let game = Game::new(
            config.rules.clone(),
            config.counting_system,
            config.starting_bankroll,
            config.seed,
        )?;
        Ok(Self {
            id,
            config,
            game,
            stats: SessionStats::default(),
            drills: DrillStore::new(),
        })
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.game.snapshot()
    }

    pub fn available_actions(&self) -> Vec<ActionKind> {
        self.game.available_actions()
    }

    /// Applies a command atomically: either the whole transition lands and
    /// the stats absorb its events, or the state is untouched.
    pub fn step(&mut self, command: Command) -> Result<StepOutput, SessionError> {
        let events = match command {
            Command::PlaceBet { amount } => self.game.place_bet(amount),
            Command::Insurance { take } => self.game.insurance(take),
            Command::Hit => self.game.hit(),
            Command::Stand => self.game.stand(),
            Command::Double => self.game.double_down(),
            Command::Split => self.game.split(),
            Command::Surrender => self.game.surrender(),
            Command::NewRound => self.game.new_round(),
            Command::ResetGame => self.game.reset_game(),
        }?;
        self.stats.apply_events(&events);
        Ok(StepOutput {
            events,
            snapshot: self.game.snapshot(),
        })
    }

    pub fn counting_drill(
        &mut self,
        num_cards: Option<u8>,
        system: Option<CountingSystem>,
        seed: Option<u64>,
    ) -> Result<CountingDrill, SessionError> {
        let num_cards = num_cards.unwrap_or(self.config.drill_cards);
        let system = system.unwrap_or(self.config.counting_system);
        Ok(self.drills.counting_drill(num_cards, system, seed)?)
    }

    /// Verifies a count and feeds the outcome into the session statistics.
    /// A reported time makes it a speed attempt and may reach the
    /// high-score board via the caller.
    pub fn verify_count(
        &mut self,
        drill_id: &str,
        user_count: f64,
        elapsed_ms: Option<u64>,
    ) -> Result<VerifyOutcome, SessionError> {
        let outcome = self.drills.verify_count(drill_id, user_count, elapsed_ms)?;
        let kind = if elapsed_ms.is_some() {
            DrillKind::Speed
        } else {
            DrillKind::Counting
        };
        self.stats.record_drill(kind, outcome.correct, outcome.score);
        Ok(outcome)
    }

    pub fn strategy_drill(&mut self, seed: Option<u64>) -> Result<StrategyDrill, SessionError> {
        let rules = self.config.rules.clone();
        Ok(self.drills.strategy_drill(&rules, seed)?)
    }

    pub fn deviation_drill(&mut self, seed: Option<u64>) -> Result<DeviationDrill, SessionError> {
        let include_surrender =
            self.config.rules.surrender != edgewise_engine::rules::Surrender::None;
        Ok(self
            .drills
            .deviation_drill(self.config.deviation_tc_range, include_surrender, seed)?)
    }

    pub fn verify_action(
        &mut self,
        drill_id: &str,
        kind: DrillKind,
        action: edgewise_engine::strategy::Action,
    ) -> Result<bool, SessionError> {
        let correct = self.drills.verify_action(drill_id, action)?;
        self.stats.record_drill(kind, correct, None);
        Ok(correct)
    }
}

/// Session registry keyed by id, shared across the transport.
///
/// Each session is its own single-threaded world behind a mutex; the
/// high-score board is the only cross-session state.
#[derive(Debug)]
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<TrainerSession>>>>,
    high_scores: Arc<HighScores>,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            high_scores: Arc::new(HighScores::default()),
        }
    }

    pub fn high_scores(&self) -> Arc<HighScores> {
        Arc::clone(&self.high_scores)
    }

    pub fn create_session(&self, config: TrainingConfig) -> Result<SessionId, SessionError> {
        let id = Uuid::new_v4().to_string();
        tracing::info!(
            session_id = %id,
            system = %config.counting_system,
            decks = config.rules.num_decks,
            "creating training session"
        );
        let session = TrainerSession::new(id.clone(), config)?;
        let mut guard = self
            .sessions
            .write()
            .map_err(|_| SessionError::StoragePoisoned)?;
        guard.insert(id.clone(), Arc::new(Mutex::new(session)));
        Ok(id)
    }

    pub fn get(&self, id: &str) -> Result<Arc<Mutex<TrainerSession>>, SessionError> {
        let guard = self
            .sessions
            .read()
            .map_err(|_| SessionError::StoragePoisoned)?;
        guard
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    pub fn step(&self, id: &str, command: Command) -> Result<StepOutput, SessionError> {
        let session = self.get(id)?;
        let mut session = session.lock().map_err(|_| SessionError::StoragePoisoned)?;
        tracing::debug!(session_id = %id, ?command, "processing command");
        session.step(command)
    }

    pub fn snapshot(&self, id: &str) -> Result<StateSnapshot, SessionError> {
        let session = self.get(id)?;
        let session = session.lock().map_err(|_| SessionError::StoragePoisoned)?;
        Ok(session.snapshot())
    }

    pub fn stats(&self, id: &str) -> Result<SessionStats, SessionError> {
        let session = self.get(id)?;
        let session = session.lock().map_err(|_| SessionError::StoragePoisoned)?;
        Ok(session.stats().clone())
    }

    /// Verifies a speed/counting drill and pushes qualifying speed scores
    /// onto the shared board.
    pub fn verify_count(
        &self,
        id: &str,
        drill_id: &str,
        user_count: f64,
        elapsed_ms: Option<u64>,
    ) -> Result<VerifyOutcome, SessionError> {
        let session = self.get(id)?;
        let mut session = session.lock().map_err(|_| SessionError::StoragePoisoned)?;
        let outcome = session.verify_count(drill_id, user_count, elapsed_ms)?;
        if let Some(score) = outcome.score {
            if score > 0 {
                self.high_scores.submit(score);
            }
        }
        Ok(outcome)
    }

    pub fn remove(&self, id: &str) -> Result<(), SessionError> {
        let mut guard = self
            .sessions
            .write()
            .map_err(|_| SessionError::StoragePoisoned)?;
        if guard.remove(id).is_none() {
            return Err(SessionError::NotFound(id.to_string()));
        }
        tracing::info!(session_id = %id, "session removed");
        Ok(())
    }

    pub fn active_sessions(&self) -> Vec<SessionId> {
        match self.sessions.read() {
            Ok(guard) => guard.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// Pure query passthroughs, re-exported for the transport layer.
pub mod queries {
    use super::*;
    use edgewise_engine::deviations::{strategy_hint as engine_hint, StrategyHint};
    use edgewise_engine::hand::Hand;
    use edgewise_engine::stats;

    pub fn strategy_hint(
        hand: &Hand,
        dealer_upcard: u8,
        rules: &RuleSet,
        true_count: Option<f64>,
    ) -> StrategyHint {
        engine_hint(hand, dealer_upcard, rules, true_count)
    }

    pub fn house_edge(rules: &RuleSet) -> f64 {
        stats::house_edge(rules)
    }

    pub fn kelly(edge: f64, bankroll: i64, fraction: f64) -> i64 {
        stats::recommended_bet(edge, bankroll, fraction)
    }

    pub fn bet_spread(true_count: f64, base_bet: i64, max_spread: u32) -> i64 {
        stats::bet_spread(true_count, base_bet, max_spread, 1.0)
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(SessionId),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Drill(#[from] DrillError),
    #[error("invalid session config: {0}")]
    Config(String),
    #[error("session storage poisoned")]
    StoragePoisoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_config(seed: u64) -> TrainingConfig {
        TrainingConfig {
            seed: Some(seed),
            ..TrainingConfig::default()
        }
    }

    #[test]
    fn create_step_and_read_stats() {
        let manager = SessionManager::new();
        let id = manager.create_session(seeded_config(1)).unwrap();

        let out = manager.step(&id, Command::PlaceBet { amount: 25_00 }).unwrap();
        assert!(!out.events.is_empty());
        let snapshot = manager.snapshot(&id).unwrap();
        assert_eq!(snapshot.player_hands.len(), 1);

        let stats = manager.stats(&id).unwrap();
        assert_eq!(stats.counting.attempted, 0);
    }

    #[test]
    fn rejected_commands_leave_the_session_unchanged() {
        let manager = SessionManager::new();
        let id = manager.create_session(seeded_config(2)).unwrap();
        let before = manager.snapshot(&id).unwrap();
        assert!(manager.step(&id, Command::Hit).is_err());
        assert_eq!(manager.snapshot(&id).unwrap(), before);
    }

    #[test]
    fn unknown_sessions_are_not_found() {
        let manager = SessionManager::new();
        assert!(matches!(
            manager.step("nope", Command::Hit),
            Err(SessionError::NotFound(_))
        ));
        assert!(manager.remove("nope").is_err());
    }

    #[test]
    fn speed_scores_reach_the_shared_board() {
        let manager = SessionManager::new();
        let id = manager.create_session(seeded_config(3)).unwrap();
        let drill = {
            let session = manager.get(&id).unwrap();
            let mut session = session.lock().unwrap();
            session.counting_drill(None, None, Some(7)).unwrap()
        };
        let outcome = manager
            .verify_count(&id, &drill.id, drill.expected_count, Some(8_000))
            .unwrap();
        assert!(outcome.correct);
        let score = outcome.score.unwrap();
        assert_eq!(manager.high_scores().best(), Some(score));

        let stats = manager.stats(&id).unwrap();
        assert_eq!(stats.speed.attempted, 1);
        assert_eq!(stats.speed.correct, 1);
        assert_eq!(stats.speed_best_score, Some(score));
    }

    #[test]
    fn stats_follow_round_events() {
        let manager = SessionManager::new();
        let id = manager.create_session(seeded_config(4)).unwrap();

        for _ in 0..3 {
            manager.step(&id, Command::PlaceBet { amount: 10_00 }).unwrap();
            loop {
                let snapshot = manager.snapshot(&id).unwrap();
                match snapshot.state {
                    edgewise_engine::game::GameState::OfferingInsurance => {
                        manager.step(&id, Command::Insurance { take: false }).unwrap();
                    }
                    edgewise_engine::game::GameState::PlayerTurn => {
                        manager.step(&id, Command::Stand).unwrap();
                    }
                    edgewise_engine::game::GameState::RoundComplete => {
                        manager.step(&id, Command::NewRound).unwrap();
                        break;
                    }
                    edgewise_engine::game::GameState::GameOver => break,
                    other => panic!("unexpected resting state {other:?}"),
                }
            }
        }

        let stats = manager.stats(&id).unwrap();
        assert_eq!(stats.hands_played, 3);
        assert_eq!(stats.wins + stats.losses + stats.pushes, 3);
        assert_eq!(stats.bankroll_history.len(), 3);
        let expected_net = *stats.bankroll_history.last().unwrap() - 1_000_00;
        assert_eq!(stats.net_result, expected_net);
    }
}
