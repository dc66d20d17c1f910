/// Probability of losing the whole bankroll before the long run arrives:
/// `exp(-2 * edge * units / variance)` for a positive-expectation game,
/// certain ruin otherwise. `bankroll_units` is the bankroll divided by the
/// average bet.
pub fn risk_of_ruin(edge: f64, bankroll_units: f64, variance: f64) -> f64 {
    if edge <= 0.0 {
        return 1.0;
    }
    let exponent = -2.0 * edge * bankroll_units / variance;
    exponent.exp().clamp(0.0, 1.0)
}

/// Expected hands to double the bankroll at a positive edge.
pub fn hands_to_double(edge: f64, bankroll_units: f64) -> Option<u64> {
    if edge <= 0.0 {
        return None;
    }
    Some((bankroll_units / edge).round() as u64)
}

/// Recommended single-session stop-loss in cents.
pub fn session_stop_loss(bankroll: i64, session_fraction: f64) -> i64 {
    (bankroll as f64 * session_fraction).round() as i64
}

/// Session win goal as a multiple of the stop-loss.
pub fn session_win_goal(stop_loss: i64, win_ratio: f64) -> i64 {
    (stop_loss as f64 * win_ratio).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bigger_bankrolls_are_safer() {
        let var = crate::stats::kelly::BLACKJACK_VARIANCE;
        let small = risk_of_ruin(0.01, 100.0, var);
        let large = risk_of_ruin(0.01, 1000.0, var);
        assert!(large < small);
        assert!(small < 1.0 && large > 0.0);
    }

    #[test]
    fn negative_edge_means_certain_ruin() {
        assert_eq!(risk_of_ruin(-0.005, 1000.0, 1.3225), 1.0);
        assert_eq!(hands_to_double(-0.005, 1000.0), None);
    }

    #[test]
    fn session_limits_scale_with_bankroll() {
        let stop = session_stop_loss(10_000_00, 0.1);
        assert_eq!(stop, 1_000_00);
        assert_eq!(session_win_goal(stop, 1.5), 1_500_00);
    }
}
