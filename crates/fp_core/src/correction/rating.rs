//! Overall rating correction
//!
//! 1. Pick the first band rule matching age / elite status / potential gap
//! 2. Transform the raw delta with it
//! 3. Round (sub-unit deltas become ±1 when enabled)
//! 4. Cap positive deltas near the top of the scale
//! 5. Stop growth at the soft ceiling, clamp to the legal range

use tracing::warn;

use crate::config::{DeltaTransform, RatingConfig, RatingRule};
use crate::estimator::Statistic;
use crate::inference::RawEstimates;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingInput {
    /// Current overall, already integral
    pub current: f64,
    pub potential: f64,
    pub age: f64,
    /// Elite tier for band selection, see [`is_elite`]
    pub elite: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RatingOutcome {
    pub overall: f64,
    pub delta: f64,
    /// Name of the band rule that fired
    pub rule: Option<String>,
}

/// Delta implied by the estimators: the overall estimate when available,
/// then the rating-change estimate, then zero.
pub fn raw_delta(current: f64, raw: &RawEstimates) -> f64 {
    if let Some(overall) = raw.get(Statistic::Overall).filter(|v| v.is_finite()) {
        return overall - current;
    }
    if let Some(change) = raw.get(Statistic::RatingChange).filter(|v| v.is_finite()) {
        return change;
    }
    if raw.is_failed(Statistic::Overall) || raw.is_failed(Statistic::RatingChange) {
        warn!("No usable overall or rating-change estimate, assuming no change");
    }
    0.0
}

impl RatingRule {
    pub fn matches(&self, age: f64, potential_gap: f64, elite: bool) -> bool {
        self.min_age.map_or(true, |min| age >= min)
            && self.max_age.map_or(true, |max| age < max)
            && self.elite.map_or(true, |want| want == elite)
            && self.min_potential_gap.map_or(true, |min| potential_gap >= min)
    }
}

impl DeltaTransform {
    pub fn apply(&self, delta: f64, potential_gap: f64) -> f64 {
        match *self {
            DeltaTransform::DevelopmentFloor { gap_factor, max_floor, max_delta } => {
                let floor = (potential_gap * gap_factor).ceil().min(max_floor).max(0.0);
                let ceiling = max_delta.min(potential_gap).max(floor);
                delta.max(floor).min(ceiling)
            }
            DeltaTransform::Clamp { min, max } => delta.clamp(min, max),
            DeltaTransform::Bias { bias, min, max } => (delta + bias).clamp(min, max),
        }
    }
}

pub fn round_delta(delta: f64, sub_unit_away: bool) -> f64 {
    if sub_unit_away && delta != 0.0 && delta.abs() < 1.0 {
        delta.signum()
    } else {
        delta.round()
    }
}

/// A player keeps the elite tier they entered the projection with, so an
/// ageing star is not moved to the harsher non-elite band after one dip.
pub fn is_elite(current: f64, first_overall: Option<f64>, cfg: &RatingConfig) -> bool {
    current.max(first_overall.unwrap_or(current)) >= cfg.elite_threshold
}

/// Tightest cap whose threshold the current rating has reached.
fn growth_cap(current: f64, cfg: &RatingConfig) -> Option<f64> {
    cfg.growth_caps
        .iter()
        .filter(|cap| current >= cap.min_overall)
        .max_by(|a, b| a.min_overall.total_cmp(&b.min_overall))
        .map(|cap| cap.max_delta)
}

/// Clamp `current + delta` to the legal range and re-derive the delta.
pub fn settle(current: f64, delta: f64, cfg: &RatingConfig) -> (f64, f64) {
    let overall = (current + delta).clamp(cfg.min_rating, cfg.max_rating);
    (overall, overall - current)
}

pub fn fix_overall(input: RatingInput, raw_delta: f64, cfg: &RatingConfig) -> RatingOutcome {
    let raw_delta = if raw_delta.is_finite() { raw_delta } else { 0.0 };
    let gap = input.potential - input.current;

    let rule = cfg.rules.iter().find(|rule| rule.matches(input.age, gap, input.elite));
    let banded = match rule {
        Some(rule) => rule.transform.apply(raw_delta, gap),
        None => raw_delta.clamp(-cfg.fallback_max_abs_delta, cfg.fallback_max_abs_delta),
    };

    let mut delta = round_delta(banded, cfg.round_sub_unit_away);

    if delta > 0.0 {
        if let Some(cap) = growth_cap(input.current, cfg) {
            delta = delta.min(cap);
        }
        let ceiling = input.current.max(cfg.soft_ceiling);
        delta = delta.min(ceiling - input.current);
    }

    let (overall, delta) = settle(input.current, delta, cfg);
    RatingOutcome { overall, delta, rule: rule.map(|r| r.name.clone()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix(current: f64, potential: f64, age: f64, raw: f64) -> RatingOutcome {
        let cfg = RatingConfig::default();
        let elite = is_elite(current, None, &cfg);
        fix_overall(RatingInput { current, potential, age, elite }, raw, &cfg)
    }

    #[test]
    fn test_raw_delta_sources() {
        let raw = RawEstimates::from_values([
            (Statistic::Overall, Some(82.4)),
            (Statistic::RatingChange, Some(-1.0)),
        ]);
        assert!((raw_delta(80.0, &raw) - 2.4).abs() < 1e-9);

        let raw = RawEstimates::from_values([
            (Statistic::Overall, None),
            (Statistic::RatingChange, Some(-1.0)),
        ]);
        assert_eq!(raw_delta(80.0, &raw), -1.0);

        let raw = RawEstimates::from_values([(Statistic::Overall, None)]);
        assert_eq!(raw_delta(80.0, &raw), 0.0);
    }

    #[test]
    fn test_youth_far_from_potential_is_floored() {
        let out = fix(80.0, 88.0, 22.0, -1.0);
        assert_eq!(out.rule.as_deref(), Some("youth_development"));
        assert_eq!(out.delta, 3.0);
        assert_eq!(out.overall, 83.0);

        // bigger gap, bigger floor, capped at 4
        assert_eq!(fix(60.0, 90.0, 19.0, 0.0).delta, 4.0);
        // a stronger raw delta survives the floor up to the band cap
        assert_eq!(fix(60.0, 90.0, 19.0, 3.6).delta, 4.0);
        assert_eq!(fix(60.0, 90.0, 19.0, 6.0).delta, 4.0);
    }

    #[test]
    fn test_development_growth_is_bounded() {
        // absurd estimate: one band step, not a jump to the ceiling
        let out = fix(60.0, 90.0, 19.0, 90.0);
        assert_eq!(out.rule.as_deref(), Some("youth_development"));
        assert_eq!(out.delta, 4.0);
        assert_eq!(out.overall, 64.0);

        // a looser band cap still stops at potential
        let loose =
            DeltaTransform::DevelopmentFloor { gap_factor: 0.34, max_floor: 4.0, max_delta: 10.0 };
        assert_eq!(loose.apply(12.0, 6.0), 6.0);
        assert_eq!(loose.apply(-3.0, 6.0), 3.0);
    }

    #[test]
    fn test_elite_tier_kept_from_first_season() {
        let cfg = RatingConfig::default();
        assert!(is_elite(84.0, Some(85.0), &cfg));
        assert!(is_elite(86.0, Some(80.0), &cfg));
        assert!(!is_elite(84.0, None, &cfg));

        let input = RatingInput { current: 80.0, potential: 80.0, age: 37.0, elite: true };
        let out = fix_overall(input, 0.0, &cfg);
        assert_eq!(out.rule.as_deref(), Some("old_elite"));
        assert_eq!(out.delta, -1.0);
    }

    #[test]
    fn test_youth_near_potential_is_dampened() {
        let out = fix(86.0, 86.0, 25.0, 5.0);
        assert_eq!(out.rule.as_deref(), Some("youth_settled"));
        assert_eq!(out.delta, 2.0);
        assert_eq!(fix(70.0, 70.0, 25.0, -6.0).delta, -2.0);
    }

    #[test]
    fn test_veterans_lean_negative() {
        assert_eq!(fix(80.0, 80.0, 32.0, 0.0).delta, -1.0);
        assert_eq!(fix(80.0, 80.0, 32.0, 3.0).delta, 0.0);
        // elite veteran may still gain a point
        let out = fix(86.0, 86.0, 32.0, 2.0);
        assert_eq!(out.rule.as_deref(), Some("veteran_elite"));
        assert_eq!(out.delta, 1.0);
        // elite decline is gentler
        assert!(fix(86.0, 86.0, 32.0, -2.0).delta > fix(80.0, 80.0, 32.0, -2.0).delta);
    }

    #[test]
    fn test_old_players_decline_elite_slower() {
        let elite = fix(85.0, 85.0, 36.0, 0.0);
        let regular = fix(80.0, 80.0, 36.0, 0.0);
        assert_eq!(elite.rule.as_deref(), Some("old_elite"));
        assert_eq!(elite.delta, -1.0);
        assert_eq!(regular.delta, -2.0);
        // never a gain past 35
        assert!(fix(70.0, 70.0, 38.0, 4.0).delta < 0.0);
    }

    #[test]
    fn test_sub_unit_rounding() {
        assert_eq!(round_delta(0.2, true), 1.0);
        assert_eq!(round_delta(-0.4, true), -1.0);
        assert_eq!(round_delta(0.0, true), 0.0);
        assert_eq!(round_delta(0.2, false), 0.0);
        assert_eq!(round_delta(2.5, true), 3.0);
        assert_eq!(round_delta(-1.5, true), -2.0);
    }

    #[test]
    fn test_top_end_caps_and_soft_ceiling() {
        // 89 sits in the 88 band: cap 2
        assert_eq!(fix(89.0, 89.0, 24.0, 2.0).delta, 2.0);
        assert_eq!(fix(88.0, 95.0, 24.0, 4.0).delta, 2.0);
        // 91: cap 1
        assert_eq!(fix(91.0, 99.0, 24.0, 4.0).delta, 1.0);
        // 92: one last point onto the ceiling, then growth stops
        let out = fix(92.0, 99.0, 24.0, 4.0);
        assert_eq!((out.delta, out.overall), (1.0, 93.0));
        assert_eq!(fix(93.0, 99.0, 24.0, 4.0).delta, 0.0);
        // a raised ceiling leaves the 92 cap in charge
        let cfg = RatingConfig { soft_ceiling: 99.0, ..RatingConfig::default() };
        let input = RatingInput { current: 94.0, potential: 99.0, age: 24.0, elite: true };
        assert_eq!(fix_overall(input, 4.0, &cfg).delta, 1.0);
        // above the ceiling nothing is taken away
        let out = fix(95.0, 95.0, 27.0, 0.0);
        assert_eq!(out.overall, 95.0);
    }

    #[test]
    fn test_legal_range_clamp() {
        let out = fix(2.0, 2.0, 38.0, -10.0);
        assert_eq!(out.overall, 1.0);
        assert_eq!(out.delta, -1.0);
    }

    #[test]
    fn test_non_finite_raw_is_neutral() {
        let out = fix(75.0, 75.0, 26.0, f64::NAN);
        assert_eq!(out.delta, 0.0);
        assert_eq!(out.overall, 75.0);
    }
}
