//! # edgewise-engine: Blackjack Trainer Core
//!
//! A deterministic blackjack engine for a single seat against the dealer.
//! Provides the shoe and counting arithmetic, rule-aware basic strategy
//! with count deviations, composition-aware probability and edge math, and
//! a split-aware round state machine with exact integer-cent payouts.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and deck construction
//! - [`shoe`] - Multi-deck shoe with deterministic ChaCha20 shuffling and cut card
//! - [`hand`] - Hand totals, soft/hard/pair/natural detection, outcome comparison
//! - [`counting`] - Hi-Lo, KO, Omega II, and Wong Halves counting systems
//! - [`rules`] - Table rule configuration and named casino presets
//! - [`strategy`] - Basic strategy tables resolved for S17 and H17
//! - [`deviations`] - Illustrious 18 + Fab 4 index plays and hint queries
//! - [`stats`] - Dealer distributions, per-action EV, house edge, Kelly, risk of ruin
//! - [`game`] - Round lifecycle state machine and command surface
//! - [`events`] - Ordered per-command event log
//! - [`snapshot`] - State snapshots and versioned session persistence
//! - [`errors`] - Error taxonomy for all engine operations
//!
//! ## Deterministic Play
//!
//! All shoe orderings are reproducible from a seed:
//!
//! ```rust
//! use edgewise_engine::shoe::Shoe;
//!
//! let mut a = Shoe::new(6, 0.75, Some(42)).unwrap();
//! let mut b = Shoe::new(6, 0.75, Some(42)).unwrap();
//! assert_eq!(a.deal().unwrap(), b.deal().unwrap());
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use edgewise_engine::counting::CountingSystem;
//! use edgewise_engine::game::Game;
//! use edgewise_engine::rules::RuleSet;
//!
//! let mut game = Game::new(RuleSet::default(), CountingSystem::HiLo, 1_000_00, Some(7)).unwrap();
//! let events = game.place_bet(25_00).unwrap();
//! assert!(!events.is_empty());
//! let snapshot = game.snapshot();
//! assert_eq!(snapshot.player_hands.len(), 1);
//! ```

pub mod cards;
pub mod counting;
pub mod deviations;
pub mod errors;
pub mod events;
pub mod game;
pub mod hand;
pub mod rules;
pub mod shoe;
pub mod snapshot;
pub mod stats;
pub mod strategy;
