//! Market value correction

use crate::config::{AgeDecay, ValueConfig};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueInput {
    pub age: f64,
    /// Value entering the season
    pub current: f64,
    /// Corrected rating delta of the season
    pub delta: f64,
    /// Corrected overall of the season
    pub overall: f64,
    pub elite: bool,
    pub estimate: Option<f64>,
}

fn growth_multiplier(value: f64, cfg: &ValueConfig) -> f64 {
    cfg.growth_tiers
        .iter()
        .find(|tier| value > tier.min_value)
        .or_else(|| cfg.growth_tiers.last())
        .map_or(0.0, |tier| tier.multiplier)
}

fn by_delta(input: &ValueInput, cfg: &ValueConfig) -> f64 {
    let current = input.current;
    if input.delta >= 1.0 {
        current + input.delta.sqrt() * growth_multiplier(current, cfg) * current
    } else if input.delta <= -1.0 {
        let rate =
            if current > cfg.decline_high_value { cfg.decline_rate_high } else { cfg.decline_rate };
        current - input.delta.abs().sqrt() * rate * current
    } else {
        let estimate = input.estimate.filter(|v| v.is_finite()).unwrap_or(current);
        estimate * cfg.model_blend + current * (1.0 - cfg.model_blend)
    }
}

fn decay(value: f64, age: f64, elite: bool, rule: &AgeDecay) -> Option<f64> {
    if age < rule.min_age || value <= rule.min_value {
        return None;
    }
    let factor = if elite { rule.elite_factor } else { rule.factor };
    Some(value * factor.powf(age - rule.min_age))
}

fn rating_floor(overall: f64, cfg: &ValueConfig) -> f64 {
    cfg.rating_floors
        .iter()
        .filter(|floor| overall >= floor.min_overall)
        .map(|floor| floor.min_value)
        .fold(0.0, f64::max)
}

pub fn fix_value(input: ValueInput, cfg: &ValueConfig) -> f64 {
    let input = ValueInput {
        current: if input.current.is_finite() { input.current.max(0.0) } else { 0.0 },
        ..input
    };

    let mut value = by_delta(&input, cfg);

    value = decay(value, input.age, input.elite, &cfg.late_decay)
        .or_else(|| decay(value, input.age, input.elite, &cfg.early_decay))
        .unwrap_or(value);

    if input.age <= cfg.young_max_age {
        value = value.max(rating_floor(input.overall, cfg));
    }

    if input.delta < 0.0 {
        value = value.min(input.current);
    }

    value.max(cfg.floor)
}
