//! Rating correction parameters
//!
//! The band table is evaluated top to bottom; the first rule whose predicate
//! matches transforms the raw delta. Ages are `min_age <= age < max_age`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingConfig {
    /// Lowest legal rating
    pub min_rating: f64,
    /// Highest legal rating
    pub max_rating: f64,
    /// Growth stops at this rating; existing ratings above it are kept
    pub soft_ceiling: f64,
    /// Overall at which a player counts as elite for band selection
    pub elite_threshold: f64,
    /// A non-zero delta inside (-1, 1) becomes -1 / +1 instead of 0
    pub round_sub_unit_away: bool,
    /// Clamp used when no band rule matches
    pub fallback_max_abs_delta: f64,
    /// Ordered age/potential band rules
    pub rules: Vec<RatingRule>,
    /// Positive-delta caps, checked from the highest threshold down. The
    /// 92 entry allows the last point up to the default soft ceiling of 93
    /// and only becomes binding when the ceiling is raised.
    pub growth_caps: Vec<GrowthCap>,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            min_rating: 1.0,
            max_rating: 99.0,
            soft_ceiling: 93.0,
            elite_threshold: 85.0,
            round_sub_unit_away: true,
            fallback_max_abs_delta: 3.0,
            rules: default_rules(),
            growth_caps: vec![
                GrowthCap { min_overall: 92.0, max_delta: 1.0 },
                GrowthCap { min_overall: 90.0, max_delta: 1.0 },
                GrowthCap { min_overall: 88.0, max_delta: 2.0 },
                GrowthCap { min_overall: 85.0, max_delta: 3.0 },
            ],
        }
    }
}

impl RatingConfig {
    /// Slower development, harsher decline
    pub fn conservative() -> Self {
        let mut cfg = Self::default();
        cfg.soft_ceiling = 92.0;
        for rule in &mut cfg.rules {
            match &mut rule.transform {
                DeltaTransform::DevelopmentFloor { gap_factor, max_floor, max_delta } => {
                    *gap_factor = 0.25;
                    *max_floor = 3.0;
                    *max_delta = 3.0;
                }
                DeltaTransform::Bias { bias, .. } => *bias -= 0.25,
                DeltaTransform::Clamp { .. } => {}
            }
        }
        cfg
    }
}

/// One band of the rating rule table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRule {
    pub name: String,
    #[serde(default)]
    pub min_age: Option<f64>,
    #[serde(default)]
    pub max_age: Option<f64>,
    /// Some(true) = elite only, Some(false) = non-elite only
    #[serde(default)]
    pub elite: Option<bool>,
    /// Minimum (potential - overall) gap
    #[serde(default)]
    pub min_potential_gap: Option<f64>,
    pub transform: DeltaTransform,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeltaTransform {
    /// min(ceil(gap * gap_factor), max_floor) <= delta <= min(max_delta, gap)
    DevelopmentFloor {
        gap_factor: f64,
        max_floor: f64,
        #[serde(default = "default_development_max_delta")]
        max_delta: f64,
    },
    /// delta clamped to [min, max]
    Clamp { min: f64, max: f64 },
    /// (delta + bias) clamped to [min, max]
    Bias { bias: f64, min: f64, max: f64 },
}

fn default_development_max_delta() -> f64 {
    4.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthCap {
    pub min_overall: f64,
    pub max_delta: f64,
}

fn rule(
    name: &str,
    min_age: Option<f64>,
    max_age: Option<f64>,
    elite: Option<bool>,
    min_potential_gap: Option<f64>,
    transform: DeltaTransform,
) -> RatingRule {
    RatingRule { name: name.to_string(), min_age, max_age, elite, min_potential_gap, transform }
}

fn default_rules() -> Vec<RatingRule> {
    vec![
        rule(
            "youth_development",
            None,
            Some(30.0),
            None,
            Some(4.0),
            DeltaTransform::DevelopmentFloor { gap_factor: 0.34, max_floor: 4.0, max_delta: 4.0 },
        ),
        rule(
            "youth_settled",
            None,
            Some(30.0),
            None,
            None,
            DeltaTransform::Clamp { min: -2.0, max: 2.0 },
        ),
        rule(
            "veteran_elite",
            Some(30.0),
            Some(35.0),
            Some(true),
            None,
            DeltaTransform::Bias { bias: -0.25, min: -2.0, max: 1.0 },
        ),
        rule(
            "veteran",
            Some(30.0),
            Some(35.0),
            None,
            None,
            DeltaTransform::Bias { bias: -0.5, min: -3.0, max: 0.0 },
        ),
        rule(
            "old_elite",
            Some(35.0),
            None,
            Some(true),
            None,
            DeltaTransform::Bias { bias: -0.5, min: -3.0, max: 0.0 },
        ),
        rule(
            "old",
            Some(35.0),
            None,
            None,
            None,
            DeltaTransform::Bias { bias: -1.5, min: -4.0, max: -1.0 },
        ),
    ]
}
