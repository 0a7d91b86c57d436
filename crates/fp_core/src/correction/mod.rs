//! # Correction Pipeline
//!
//! Turns one season's raw estimates into a publishable [`SeasonResult`].
//!
//! ## Order
//!
//! 1. Per-90 rates → season totals ([`minutes`])
//! 2. Overall rating ([`rating`])
//! 3. Momentum pullback ([`momentum`])
//! 4. Market value ([`value`])
//! 5. Attribute coherence ([`attributes`])
//!
//! Potential is corrected alongside and never drops below what the player
//! has already shown. Every step clamps at the point of computation, so a
//! bad estimate degrades the season instead of aborting it.

pub mod attributes;
pub mod minutes;
pub mod momentum;
pub mod rating;
pub mod value;

use tracing::debug;

use crate::config::{ProjectionConfig, RatingConfig};
use crate::estimator::Statistic;
use crate::features::{Attribute, FeatureRecord};
use crate::inference::RawEstimates;
use crate::result::SeasonResult;

use self::attributes::{fix_attributes, ATTRIBUTE_COUNT};
use self::minutes::{effective_minutes, season_totals};
use self::momentum::fix_momentum;
use self::rating::{fix_overall, is_elite, raw_delta, RatingInput};
use self::value::{fix_value, ValueInput};

pub struct CorrectionPipeline<'a> {
    config: &'a ProjectionConfig,
}

impl<'a> CorrectionPipeline<'a> {
    pub fn new(config: &'a ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn apply(&self, year: u8, record: &FeatureRecord, raw: &RawEstimates) -> SeasonResult {
        let cfg = self.config;

        let minutes = effective_minutes(record.minutes, raw.get(Statistic::Minutes), &cfg.minutes);
        let totals = season_totals(raw, minutes);

        let current = legal_rating(record.overall.ceil(), &cfg.rating);
        let elite = is_elite(current, record.original_overall, &cfg.rating);
        let rating = fix_overall(
            RatingInput { current, potential: record.potential, age: record.age, elite },
            raw_delta(current, raw),
            &cfg.rating,
        );
        let (overall, delta) =
            fix_momentum(record.rating_momentum, current, rating.delta, &cfg.rating, &cfg.momentum);

        let value_eur = fix_value(
            ValueInput {
                age: record.age,
                current: record.value_eur,
                delta,
                overall,
                elite,
                estimate: raw.get(Statistic::ValueEur),
            },
            &cfg.value,
        );

        let potential =
            corrected_potential(raw.get(Statistic::Potential), record, overall, &cfg.rating);

        let mut estimated = [0.0; ATTRIBUTE_COUNT];
        for (slot, attribute) in estimated.iter_mut().zip(Attribute::ALL) {
            *slot = raw
                .get(Statistic::for_attribute(attribute))
                .filter(|v| v.is_finite())
                .unwrap_or_else(|| record.attribute(attribute));
        }
        let attributes = fix_attributes(estimated, overall, &cfg.attributes);

        debug!(
            year,
            overall,
            delta,
            rule = rating.rule.as_deref().unwrap_or("fallback"),
            value_eur,
            "Season corrected"
        );

        let mut result = SeasonResult {
            year,
            age: record.age.max(0.0).round() as u32,
            overall: to_rating(overall, &cfg.rating),
            rating_change: delta as i32,
            potential: to_rating(potential, &cfg.rating),
            value_eur,
            goals: totals.goals,
            assists: totals.assists,
            tackles: totals.tackles,
            interceptions: totals.interceptions,
            key_passes: totals.key_passes,
            minutes: totals.minutes,
            ..Default::default()
        };
        for (attribute, value) in Attribute::ALL.into_iter().zip(attributes) {
            result.set_attribute(attribute, to_rating(value, &cfg.rating));
        }
        result
    }
}

/// Never below current potential, the year-1 potential or the new overall.
pub fn corrected_potential(
    estimate: Option<f64>,
    record: &FeatureRecord,
    overall: f64,
    cfg: &RatingConfig,
) -> f64 {
    let estimate = estimate.filter(|v| v.is_finite()).map_or(f64::MIN, f64::round);
    let potential = estimate.max(record.potential_floor()).max(overall);
    legal_rating(potential.round(), cfg)
}

fn legal_rating(value: f64, cfg: &RatingConfig) -> f64 {
    if value.is_finite() {
        value.clamp(cfg.min_rating, cfg.max_rating)
    } else {
        cfg.min_rating
    }
}

fn to_rating(value: f64, cfg: &RatingConfig) -> u8 {
    legal_rating(value.round(), cfg) as u8
}
