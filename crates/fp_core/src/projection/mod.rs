//! # Projection Orchestrator
//!
//! Drives the nine-season recursion for one player:
//!
//! ```text
//! record ─▶ inference ─▶ correction ─▶ SeasonResult ─┐
//!   ▲                                                │
//!   └──────────────── transition ◀───────────────────┘
//! ```
//!
//! The last season skips the transition. Across players, [`Projector::project_batch`]
//! runs projections in parallel; a failing player never aborts the others.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

use crate::config::ProjectionConfig;
use crate::correction::CorrectionPipeline;
use crate::error::{ProjectionError, Result};
use crate::estimator::EstimatorSet;
use crate::features::FeatureRecord;
use crate::inference::InferenceStep;
use crate::result::SeasonResult;
use crate::transition::next_season;

#[cfg(test)]
mod tests;

pub const PROJECTION_YEARS: u8 = 9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRequest {
    pub player_id: u64,
    #[serde(default)]
    pub name: Option<String>,
    /// Latest season's features; `None` when the player has no stats row
    #[serde(default)]
    pub features: Option<FeatureRecord>,
}

impl ProjectionRequest {
    pub fn new(player_id: u64, features: FeatureRecord) -> Self {
        Self { player_id, name: None, features: Some(features) }
    }
}

/// Nine seasons in year order. Serialises as a plain JSON array.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Projection {
    seasons: Vec<SeasonResult>,
}

impl Projection {
    pub fn seasons(&self) -> &[SeasonResult] {
        &self.seasons
    }

    /// 1-based year lookup
    pub fn year(&self, year: u8) -> Option<&SeasonResult> {
        self.seasons.iter().find(|s| s.year == year)
    }

    pub fn first(&self) -> Option<&SeasonResult> {
        self.seasons.first()
    }

    pub fn len(&self) -> usize {
        self.seasons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seasons.is_empty()
    }
}

pub struct Projector {
    inference: InferenceStep,
    config: ProjectionConfig,
}

impl Projector {
    pub fn new(estimators: Arc<EstimatorSet>, config: ProjectionConfig) -> Result<Self> {
        config.validate()?;
        let missing = estimators.missing();
        if !missing.is_empty() {
            debug!("Estimator set has no entry for {:?}", missing);
        }
        let inference = InferenceStep::new(estimators, &config.inference)?;
        Ok(Self { inference, config })
    }

    pub fn estimators(&self) -> &EstimatorSet {
        self.inference.estimators()
    }

    pub fn project(&self, request: &ProjectionRequest) -> Result<Projection> {
        let features = request
            .features
            .clone()
            .ok_or(ProjectionError::MissingFeatureRecord { player_id: request.player_id })?;
        self.project_record(request.player_id, features)
    }

    pub fn project_record(&self, player_id: u64, mut record: FeatureRecord) -> Result<Projection> {
        let span = info_span!("projection", player_id);
        let _enter = span.enter();

        validate_mandatory(player_id, &record)?;
        let replaced = record.sanitize();
        if replaced > 0 {
            warn!("{} feature value(s) replaced before projecting", replaced);
        }
        record.original_potential = Some(record.potential_floor());
        record.original_overall = Some(record.original_overall.unwrap_or(record.overall));

        let pipeline = CorrectionPipeline::new(&self.config);
        let mut seasons = Vec::with_capacity(usize::from(PROJECTION_YEARS));

        for year in 1..=PROJECTION_YEARS {
            let raw = self.inference.run(&record);
            let result = pipeline.apply(year, &record, &raw);
            debug!(
                year,
                overall = result.overall,
                value_eur = result.value_eur,
                "Season projected"
            );

            if year < PROJECTION_YEARS {
                record = next_season(&record, &result, &self.config);
            }
            seasons.push(result);
        }

        if let (Some(first), Some(last)) = (seasons.first(), seasons.last()) {
            info!(
                "Projected {} seasons: overall {} → {}, value €{:.0} → €{:.0}",
                seasons.len(),
                first.overall,
                last.overall,
                first.value_eur,
                last.value_eur
            );
        }
        Ok(Projection { seasons })
    }

    /// Project many players in parallel on the global rayon pool.
    pub fn project_batch(&self, requests: &[ProjectionRequest]) -> BatchReport {
        let entries: Vec<BatchEntry> = requests
            .par_iter()
            .map(|request| BatchEntry {
                player_id: request.player_id,
                name: request.name.clone(),
                result: self.project(request),
            })
            .collect();

        let report = BatchReport { entries };
        info!("Batch finished: {} succeeded, {} failed", report.succeeded(), report.failed());
        report
    }
}

fn validate_mandatory(player_id: u64, record: &FeatureRecord) -> Result<()> {
    for (feature, value) in
        [("age", record.age), ("overall", record.overall), ("potential", record.potential)]
    {
        if !value.is_finite() || value <= 0.0 {
            return Err(ProjectionError::InvalidFeature { player_id, feature, value });
        }
    }
    Ok(())
}

#[derive(Debug)]
pub struct BatchEntry {
    pub player_id: u64,
    pub name: Option<String>,
    pub result: Result<Projection>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.entries.len() - self.succeeded()
    }

    /// Persistable records for every successful player.
    pub fn records(&self, computed_at: DateTime<Utc>) -> Vec<ProjectionRecord> {
        self.entries
            .iter()
            .filter_map(|entry| {
                let projection = entry.result.as_ref().ok()?;
                ProjectionRecord::from_projection(
                    entry.player_id,
                    entry.name.clone(),
                    projection,
                    computed_at,
                )
            })
            .collect()
    }
}

/// Unit a storage layer keeps per player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRecord {
    pub player_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub seasons: Vec<SeasonResult>,
    pub year1_overall: u8,
    pub year1_value_eur: f64,
    pub year1_goals: f64,
    pub year1_assists: f64,
    pub computed_at: DateTime<Utc>,
}

impl ProjectionRecord {
    /// `None` for an empty projection.
    pub fn from_projection(
        player_id: u64,
        name: Option<String>,
        projection: &Projection,
        computed_at: DateTime<Utc>,
    ) -> Option<Self> {
        let first = projection.first()?;
        Some(Self {
            player_id,
            name,
            year1_overall: first.overall,
            year1_value_eur: first.value_eur,
            year1_goals: first.goals,
            year1_assists: first.assists,
            seasons: projection.seasons.clone(),
            computed_at,
        })
    }
}
