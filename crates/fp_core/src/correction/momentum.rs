//! Momentum pullback
//!
//! Momentum is a decaying sum of past rating deltas. A player riding a long
//! hot streak whose rating stalls this season is pulled back instead of
//! being allowed to plateau.

use crate::config::{MomentumConfig, RatingConfig};

use super::rating::settle;

/// Returns the adjusted `(overall, delta)`.
pub fn fix_momentum(
    momentum: f64,
    current: f64,
    delta: f64,
    rating: &RatingConfig,
    cfg: &MomentumConfig,
) -> (f64, f64) {
    let momentum = if momentum.is_finite() { momentum } else { 0.0 };
    if momentum <= cfg.pullback_threshold || delta > cfg.pullback_max_delta {
        return settle(current, delta, rating);
    }

    let pullback = (momentum * cfg.pullback_rate).round().max(1.0);
    settle(current, delta.min(-pullback), rating)
}

/// Momentum carried into the next season.
pub fn next_momentum(previous: f64, delta: f64, cfg: &MomentumConfig) -> f64 {
    let previous = if previous.is_finite() { previous } else { 0.0 };
    (previous * cfg.decay + delta).clamp(-cfg.clamp, cfg.clamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pull(momentum: f64, current: f64, delta: f64) -> (f64, f64) {
        fix_momentum(momentum, current, delta, &RatingConfig::default(), &MomentumConfig::default())
    }

    #[test]
    fn test_no_pullback_below_threshold() {
        assert_eq!(pull(8.0, 80.0, 0.0), (80.0, 0.0));
        assert_eq!(pull(2.0, 80.0, -1.0), (79.0, -1.0));
    }

    #[test]
    fn test_stalled_hot_streak_pulls_back() {
        assert_eq!(pull(9.0, 80.0, 0.0), (79.0, -1.0));
        // a real decline already bigger than the pullback stays
        assert_eq!(pull(9.0, 80.0, -3.0), (77.0, -3.0));
        // growth is left alone
        assert_eq!(pull(10.0, 80.0, 1.0), (81.0, 1.0));
    }

    #[test]
    fn test_pullback_respects_legal_range() {
        assert_eq!(pull(10.0, 1.0, 0.0), (1.0, 0.0));
    }

    #[test]
    fn test_next_momentum_decays_and_clamps() {
        let cfg = MomentumConfig::default();
        assert!((next_momentum(5.0, 2.0, &cfg) - 5.5).abs() < 1e-9);
        assert_eq!(next_momentum(10.0, 4.0, &cfg), 10.0);
        assert_eq!(next_momentum(-10.0, -4.0, &cfg), -10.0);
        assert_eq!(next_momentum(f64::NAN, 1.0, &cfg), 1.0);
    }
}
