//! # edgewise-trainer: Card-Counting Training Layer
//!
//! Consumes the deterministic engine and adds everything a trainer needs
//! around it: counting/speed/strategy/deviation drills with exact oracles,
//! a cross-session high-score board, per-session statistics driven purely
//! by engine events, and the command surface a transport calls into.
//!
//! ## Modules
//!
//! - [`config`] - Validated training configuration
//! - [`drills`] - Drill generation, one-shot verification, speed scoring
//! - [`scores`] - Shared high-score board
//! - [`session`] - Sessions, statistics aggregation, command dispatch
//!
//! ## Quick Start
//!
//! ```rust
//! use edgewise_trainer::config::TrainingConfig;
//! use edgewise_trainer::session::{Command, SessionManager};
//!
//! let manager = SessionManager::new();
//! let config = TrainingConfig { seed: Some(42), ..TrainingConfig::default() };
//! let id = manager.create_session(config).unwrap();
//! let out = manager.step(&id, Command::PlaceBet { amount: 25_00 }).unwrap();
//! assert!(!out.events.is_empty());
//! ```

pub mod config;
pub mod drills;
pub mod scores;
pub mod session;
