//! # Projection Configuration
//!
//! Every tuning constant of the correction pipeline lives here so that
//! thresholds and multipliers can be adjusted without touching the
//! correction code.
//!
//! ## Presets
//!
//! | Preset | Description |
//! |--------|-------------|
//! | `default` | Baseline heuristics |
//! | `conservative` | Slower development, lower value growth |
//!
//! ## Environment Variables
//!
//! - `FP_CONFIG_PATH`: JSON file with a full `ProjectionConfig`
//! - `FP_PROFILE`: preset name when no file is given (`default`, `conservative`)
//!
//! ```rust
//! use fp_core::config::ProjectionConfig;
//!
//! let config = ProjectionConfig::default();
//! assert!(config.validate().is_ok());
//! ```

mod rating;
mod value;

pub use rating::{DeltaTransform, GrowthCap, RatingConfig, RatingRule};
pub use value::{AgeDecay, RatingValueFloor, ValueConfig, ValueTier};

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

pub const CONFIG_PATH_ENV: &str = "FP_CONFIG_PATH";
pub const PROFILE_ENV: &str = "FP_PROFILE";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectionConfig {
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub minutes: MinutesConfig,
    #[serde(default)]
    pub rating: RatingConfig,
    #[serde(default)]
    pub momentum: MomentumConfig,
    #[serde(default)]
    pub value: ValueConfig,
    #[serde(default)]
    pub attributes: AttributeConfig,
}

impl ProjectionConfig {
    pub fn conservative() -> Self {
        Self {
            rating: RatingConfig::conservative(),
            momentum: MomentumConfig { pullback_threshold: 6.0, ..MomentumConfig::default() },
            value: ValueConfig::conservative(),
            ..Self::default()
        }
    }

    pub fn from_profile(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "" | "default" => Some(Self::default()),
            "conservative" => Some(Self::conservative()),
            _ => None,
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// `FP_CONFIG_PATH` first, then `FP_PROFILE`, then the default preset.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Self::from_json_file(Path::new(trimmed));
            }
        }
        let profile = env::var(PROFILE_ENV).unwrap_or_default();
        Self::from_profile(&profile)
            .ok_or_else(|| ConfigError::Invalid(format!("unknown profile '{}'", profile)))
    }

    pub fn from_env_or_default() -> Self {
        Self::from_env().unwrap_or_else(|err| {
            warn!("Falling back to default projection config: {}", err);
            Self::default()
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.inference.worker_threads == 0 {
            return invalid("inference.worker_threads must be at least 1");
        }
        let r = &self.rating;
        if r.min_rating >= r.max_rating {
            return invalid("rating.min_rating must be below rating.max_rating");
        }
        if r.soft_ceiling < r.min_rating || r.soft_ceiling > r.max_rating {
            return invalid("rating.soft_ceiling must lie inside the legal range");
        }
        if r.rules.is_empty() {
            return invalid("rating.rules must not be empty");
        }
        let m = &self.momentum;
        if !(0.0..=1.0).contains(&m.decay) {
            return invalid("momentum.decay must be within [0, 1]");
        }
        if m.clamp <= 0.0 {
            return invalid("momentum.clamp must be positive");
        }
        if self.value.floor <= 0.0 {
            return invalid("value.floor must be positive");
        }
        if !(0.0..=1.0).contains(&self.value.model_blend) {
            return invalid("value.model_blend must be within [0, 1]");
        }
        let a = &self.attributes;
        if a.required_at_or_above == 0 || a.required_at_or_above > 6 {
            return invalid("attributes.required_at_or_above must be between 1 and 6");
        }
        if a.priority_points <= 0.0 || a.other_points < 0.0 {
            return invalid("attributes point allocations must be positive");
        }
        if self.minutes.estimated_cap < 0.0 {
            return invalid("minutes.estimated_cap must not be negative");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Size of the per-season estimator worker pool
    pub worker_threads: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self { worker_threads: 4 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinutesConfig {
    /// Below this many actual minutes the estimated minutes are used
    pub full_season_threshold: f64,
    /// Upper bound on substituted estimated minutes
    pub estimated_cap: f64,
}

impl Default for MinutesConfig {
    fn default() -> Self {
        Self { full_season_threshold: 900.0, estimated_cap: 1800.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumConfig {
    /// Carry-over of last season's momentum
    pub decay: f64,
    /// Symmetric bound: momentum stays within [-clamp, clamp]
    pub clamp: f64,
    /// Momentum above this triggers the pullback
    pub pullback_threshold: f64,
    /// Pullback size per unit of momentum
    pub pullback_rate: f64,
    /// Deltas at or below this are pulled back
    pub pullback_max_delta: f64,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            decay: 0.7,
            clamp: 10.0,
            pullback_threshold: 8.0,
            pullback_rate: 0.1,
            pullback_max_delta: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeConfig {
    /// Attributes that must sit at or above overall
    pub required_at_or_above: usize,
    /// Points per iteration for the closest attributes
    pub priority_points: f64,
    /// Points per iteration for the rest
    pub other_points: f64,
    /// Share of the two closest gaps turned into budget
    pub budget_scale: f64,
    pub boost_divisor: f64,
    pub boost_exponent: f64,
    pub boost_weight: f64,
}

impl Default for AttributeConfig {
    fn default() -> Self {
        Self {
            required_at_or_above: 2,
            priority_points: 2.0,
            other_points: 1.0,
            budget_scale: 0.7,
            boost_divisor: 8.0,
            boost_exponent: 1.3,
            boost_weight: 0.2,
        }
    }
}
