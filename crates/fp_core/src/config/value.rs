use serde::{Deserialize, Serialize};

/// Market value correction parameters. Amounts are EUR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueConfig {
    /// Absolute floor applied to every player
    pub floor: f64,
    /// Growth multiplier by current value, highest threshold first
    pub growth_tiers: Vec<ValueTier>,
    /// Decline rate for values above `decline_high_value`
    pub decline_rate_high: f64,
    pub decline_high_value: f64,
    /// Decline rate for everyone else
    pub decline_rate: f64,
    /// Weight of the model estimate when the rating barely moved
    pub model_blend: f64,
    /// Applied first; `early_decay` only when this does not match
    pub late_decay: AgeDecay,
    pub early_decay: AgeDecay,
    /// Players at or below this age get the rating-tier minimum
    pub young_max_age: f64,
    /// Minimum expected value by overall, highest threshold first
    pub rating_floors: Vec<RatingValueFloor>,
}

impl Default for ValueConfig {
    fn default() -> Self {
        Self {
            floor: 500_000.0,
            growth_tiers: vec![
                ValueTier { min_value: 150_000_000.0, multiplier: 0.06 },
                ValueTier { min_value: 100_000_000.0, multiplier: 0.08 },
                ValueTier { min_value: 50_000_000.0, multiplier: 0.10 },
                ValueTier { min_value: 0.0, multiplier: 0.12 },
            ],
            decline_rate_high: 0.03,
            decline_high_value: 80_000_000.0,
            decline_rate: 0.05,
            model_blend: 0.7,
            late_decay: AgeDecay {
                min_age: 33.0,
                min_value: 20_000_000.0,
                factor: 0.91,
                elite_factor: 0.93,
            },
            early_decay: AgeDecay {
                min_age: 30.0,
                min_value: 10_000_000.0,
                factor: 0.92,
                elite_factor: 0.95,
            },
            young_max_age: 29.0,
            rating_floors: vec![
                RatingValueFloor { min_overall: 88.0, min_value: 60_000_000.0 },
                RatingValueFloor { min_overall: 85.0, min_value: 35_000_000.0 },
                RatingValueFloor { min_overall: 82.0, min_value: 20_000_000.0 },
                RatingValueFloor { min_overall: 78.0, min_value: 10_000_000.0 },
                RatingValueFloor { min_overall: 75.0, min_value: 5_000_000.0 },
                RatingValueFloor { min_overall: 70.0, min_value: 2_000_000.0 },
            ],
        }
    }
}

impl ValueConfig {
    pub fn conservative() -> Self {
        let mut cfg = Self::default();
        for tier in &mut cfg.growth_tiers {
            tier.multiplier *= 0.75;
        }
        cfg.model_blend = 0.5;
        cfg
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueTier {
    pub min_value: f64,
    pub multiplier: f64,
}

/// value *= factor ^ (age - min_age) once age >= min_age and value > min_value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeDecay {
    pub min_age: f64,
    pub min_value: f64,
    pub factor: f64,
    pub elite_factor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingValueFloor {
    pub min_overall: f64,
    pub min_value: f64,
}
