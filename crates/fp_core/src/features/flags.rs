//! Engineered indicator flags
//!
//! Age bands and rating tiers are part of the training contract, so their
//! cut-offs are fixed here rather than in the tunable configuration.
//!
//! | Flag | Rule |
//! |------|------|
//! | is_youth | age < 23 |
//! | is_prime | 23 <= age <= 29 |
//! | is_veteran | age > 29 |
//! | is_elite | overall >= 85 |
//! | is_good | 75 <= overall < 85 |
//! | is_average | overall < 75 |

use serde::{Deserialize, Serialize};

use super::FeatureRecord;

/// First age that is no longer youth
pub const YOUTH_AGE_LIMIT: f64 = 23.0;
pub const PRIME_MAX_AGE: f64 = 29.0;
pub const ELITE_MIN_OVERALL: f64 = 85.0;
pub const GOOD_MIN_OVERALL: f64 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeBand {
    Youth,
    Prime,
    Veteran,
}

impl AgeBand {
    pub fn from_age(age: f64) -> Self {
        if age < YOUTH_AGE_LIMIT {
            AgeBand::Youth
        } else if age <= PRIME_MAX_AGE {
            AgeBand::Prime
        } else {
            AgeBand::Veteran
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatingTier {
    Elite,
    Good,
    Average,
}

impl RatingTier {
    pub fn from_overall(overall: f64) -> Self {
        if overall >= ELITE_MIN_OVERALL {
            RatingTier::Elite
        } else if overall >= GOOD_MIN_OVERALL {
            RatingTier::Good
        } else {
            RatingTier::Average
        }
    }
}

fn indicator(on: bool) -> f64 {
    if on {
        1.0
    } else {
        0.0
    }
}

/// Recompute `age_squared` and every age/rating indicator from the live
/// age and overall.
pub fn apply_derived_flags(record: &mut FeatureRecord) {
    record.age_squared = record.age * record.age;

    let band = AgeBand::from_age(record.age);
    record.is_youth = indicator(band == AgeBand::Youth);
    record.is_prime = indicator(band == AgeBand::Prime);
    record.is_veteran = indicator(band == AgeBand::Veteran);

    let tier = RatingTier::from_overall(record.overall);
    record.is_elite = indicator(tier == RatingTier::Elite);
    record.is_good = indicator(tier == RatingTier::Good);
    record.is_average = indicator(tier == RatingTier::Average);
}
