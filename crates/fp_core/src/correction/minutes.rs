//! Per-90 rates → season totals

use crate::config::MinutesConfig;
use crate::estimator::Statistic;
use crate::inference::RawEstimates;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SeasonTotals {
    pub minutes: f64,
    pub goals: f64,
    pub assists: f64,
    pub tackles: f64,
    pub interceptions: f64,
    pub key_passes: f64,
}

/// Minutes the season totals are computed from.
///
/// Actual minutes win for regular starters. Below the full-season threshold
/// the estimated minutes are used instead, capped, and never below what the
/// player actually played.
pub fn effective_minutes(actual: f64, estimated: Option<f64>, cfg: &MinutesConfig) -> f64 {
    let actual = if actual.is_finite() { actual.max(0.0) } else { 0.0 };
    if actual >= cfg.full_season_threshold {
        return actual;
    }
    match estimated {
        Some(est) if est.is_finite() => est.clamp(0.0, cfg.estimated_cap).max(actual),
        _ => actual,
    }
}

/// Negative rates are clamped to zero before scaling.
pub fn season_totals(raw: &RawEstimates, minutes: f64) -> SeasonTotals {
    let nineties = minutes / 90.0;
    let total = |stat: Statistic| raw.value_or_zero(stat).max(0.0) * nineties;

    SeasonTotals {
        minutes,
        goals: total(Statistic::Goals90),
        assists: total(Statistic::Assists90),
        tackles: total(Statistic::Tackles90),
        interceptions: total(Statistic::Interceptions90),
        key_passes: total(Statistic::KeyPasses90),
    }
}
