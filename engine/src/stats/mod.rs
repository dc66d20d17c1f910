//! Probability, house-edge, and bankroll mathematics.
//!
//! Everything here is pure and float-based; payout math in the game layer
//! stays in integer cents.

pub mod bankroll;
pub mod edge;
pub mod kelly;
pub mod probability;

pub use bankroll::{hands_to_double, risk_of_ruin, session_stop_loss, session_win_goal};
pub use edge::{house_edge, player_advantage};
pub use kelly::{bet_spread, kelly_fraction, n_zero, recommended_bet, BLACKJACK_VARIANCE};
pub use probability::{
    action_evs, dealer_distribution, dealer_distribution_infinite, ActionEv, DealerDistribution,
    DealerOutcome,
};
