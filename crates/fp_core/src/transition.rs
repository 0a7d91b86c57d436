//! Season transition
//!
//! Builds next year's feature record from this year's record and its
//! corrected result. Columns that need cohort context (wage/value z-scores,
//! percentiles, position group) are carried over unchanged.

use crate::config::ProjectionConfig;
use crate::correction::momentum::next_momentum;
use crate::features::{apply_derived_flags, Attribute, FeatureRecord};
use crate::result::SeasonResult;

fn per_90(total: f64, minutes: f64) -> f64 {
    if minutes > 0.0 {
        total / minutes * 90.0
    } else {
        0.0
    }
}

pub fn next_season(
    record: &FeatureRecord,
    result: &SeasonResult,
    config: &ProjectionConfig,
) -> FeatureRecord {
    let mut next = record.clone();

    next.overall_lag1 = record.overall;
    next.age_lag1 = record.age;
    next.minutes_lag1 = record.minutes;
    next.goals_per90_lag1 = record.goals_per90;
    next.assists_per90_lag1 = record.assists_per90;
    next.goals_assists_per90_lag1 = record.goals_assists_per90;
    next.xg_per90_lag1 = record.xg_per90;
    next.value_eur_lag1 = record.value_eur;

    for attribute in Attribute::ALL {
        next.set_attribute(attribute, f64::from(result.attribute(attribute)));
    }
    next.overall = f64::from(result.overall);
    next.value_eur = result.value_eur;
    next.potential = f64::from(result.potential).max(record.potential_floor());
    next.original_potential = Some(record.potential_floor());

    let minutes = result.minutes;
    next.minutes = minutes;
    next.nineties = minutes / 90.0;
    next.goals_per90 = per_90(result.goals, minutes);
    next.assists_per90 = per_90(result.assists, minutes);
    next.goals_assists_per90 = next.goals_per90 + next.assists_per90;
    next.tackles_per90 = per_90(result.tackles, minutes);
    next.interceptions_per90 = per_90(result.interceptions, minutes);
    next.key_passes_per90 = per_90(result.key_passes, minutes);

    next.age = record.age + 1.0;
    apply_derived_flags(&mut next);

    next.rating_momentum =
        next_momentum(record.rating_momentum, f64::from(result.rating_change), &config.momentum);
    next.goals_trend = next.goals_per90 - next.goals_per90_lag1;
    next.minutes_trend = next.minutes - next.minutes_lag1;
    next.goals_vs_xg = next.goals_per90 - next.xg_per90;
    next.has_prior_season = 1.0;

    next
}
