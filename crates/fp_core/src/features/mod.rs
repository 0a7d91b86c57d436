//! Feature record: the fixed-schema input row shared by every estimator
//!
//! - `FeatureRecord` is the named, serde-friendly form the caller builds
//! - `FeatureRow` is the ordered 51-column projection handed to estimators
//! - `Attribute` names the six face attributes

mod columns;
pub mod flags;

pub use columns::{FeatureColumn, FEATURE_COUNT};
pub use flags::{apply_derived_flags, AgeBand, RatingTier};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// One (player, season) row.
///
/// Every model column is a plain `f64`; flags are 0.0 / 1.0. Missing JSON
/// fields deserialize to zero, and the orchestrator rejects records whose
/// mandatory fields (age, overall, potential) are not positive.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureRecord {
    pub age: f64,
    pub overall: f64,
    pub potential: f64,
    pub pace: f64,
    pub shooting: f64,
    pub passing: f64,
    pub dribbling: f64,
    pub defending: f64,
    pub physic: f64,

    pub minutes: f64,
    pub nineties: f64,
    pub goals_per90: f64,
    pub assists_per90: f64,
    pub goals_assists_per90: f64,
    pub non_penalty_goals_per90: f64,
    pub xg_per90: f64,
    pub xag_per90: f64,
    pub shots_per90: f64,
    pub shots_on_target_pct: f64,
    pub pass_completion_pct: f64,
    pub key_passes_per90: f64,
    pub progressive_passes_per90: f64,
    pub tackles_per90: f64,
    pub interceptions_per90: f64,
    pub sca_per90: f64,

    pub age_squared: f64,
    pub is_youth: f64,
    pub is_prime: f64,
    pub is_veteran: f64,
    pub is_elite: f64,
    pub is_good: f64,
    pub is_average: f64,

    pub wage_zscore: f64,
    pub wage_percentile: f64,
    pub value_zscore: f64,
    pub goals_vs_xg: f64,
    pub is_forward: f64,
    pub is_midfield: f64,
    pub is_defense: f64,

    pub overall_lag1: f64,
    pub age_lag1: f64,
    pub minutes_lag1: f64,
    pub goals_per90_lag1: f64,
    pub assists_per90_lag1: f64,
    pub goals_assists_per90_lag1: f64,
    pub xg_per90_lag1: f64,
    pub value_eur_lag1: f64,

    pub has_prior_season: f64,
    pub rating_momentum: f64,
    pub goals_trend: f64,
    pub minutes_trend: f64,

    /// Live market value in EUR. Not a model column.
    pub value_eur: f64,
    /// Year-1 potential, stamped by the orchestrator. Not a model column.
    pub original_potential: Option<f64>,
    /// Year-1 overall, stamped by the orchestrator. Not a model column.
    pub original_overall: Option<f64>,
}

impl FeatureRecord {
    /// Value of one model column.
    pub fn value(&self, column: FeatureColumn) -> f64 {
        match column {
            FeatureColumn::Age => self.age,
            FeatureColumn::Overall => self.overall,
            FeatureColumn::Potential => self.potential,
            FeatureColumn::Pace => self.pace,
            FeatureColumn::Shooting => self.shooting,
            FeatureColumn::Passing => self.passing,
            FeatureColumn::Dribbling => self.dribbling,
            FeatureColumn::Defending => self.defending,
            FeatureColumn::Physic => self.physic,
            FeatureColumn::Minutes => self.minutes,
            FeatureColumn::Nineties => self.nineties,
            FeatureColumn::GoalsPer90 => self.goals_per90,
            FeatureColumn::AssistsPer90 => self.assists_per90,
            FeatureColumn::GoalsAssistsPer90 => self.goals_assists_per90,
            FeatureColumn::NonPenaltyGoalsPer90 => self.non_penalty_goals_per90,
            FeatureColumn::XgPer90 => self.xg_per90,
            FeatureColumn::XagPer90 => self.xag_per90,
            FeatureColumn::ShotsPer90 => self.shots_per90,
            FeatureColumn::ShotsOnTargetPct => self.shots_on_target_pct,
            FeatureColumn::PassCompletionPct => self.pass_completion_pct,
            FeatureColumn::KeyPassesPer90 => self.key_passes_per90,
            FeatureColumn::ProgressivePassesPer90 => self.progressive_passes_per90,
            FeatureColumn::TacklesPer90 => self.tackles_per90,
            FeatureColumn::InterceptionsPer90 => self.interceptions_per90,
            FeatureColumn::ScaPer90 => self.sca_per90,
            FeatureColumn::AgeSquared => self.age_squared,
            FeatureColumn::IsYouth => self.is_youth,
            FeatureColumn::IsPrime => self.is_prime,
            FeatureColumn::IsVeteran => self.is_veteran,
            FeatureColumn::IsElite => self.is_elite,
            FeatureColumn::IsGood => self.is_good,
            FeatureColumn::IsAverage => self.is_average,
            FeatureColumn::WageZscore => self.wage_zscore,
            FeatureColumn::WagePercentile => self.wage_percentile,
            FeatureColumn::ValueZscore => self.value_zscore,
            FeatureColumn::GoalsVsXg => self.goals_vs_xg,
            FeatureColumn::IsForward => self.is_forward,
            FeatureColumn::IsMidfield => self.is_midfield,
            FeatureColumn::IsDefense => self.is_defense,
            FeatureColumn::OverallLag1 => self.overall_lag1,
            FeatureColumn::AgeLag1 => self.age_lag1,
            FeatureColumn::MinutesLag1 => self.minutes_lag1,
            FeatureColumn::GoalsPer90Lag1 => self.goals_per90_lag1,
            FeatureColumn::AssistsPer90Lag1 => self.assists_per90_lag1,
            FeatureColumn::GoalsAssistsPer90Lag1 => self.goals_assists_per90_lag1,
            FeatureColumn::XgPer90Lag1 => self.xg_per90_lag1,
            FeatureColumn::ValueEurLag1 => self.value_eur_lag1,
            FeatureColumn::HasPriorSeason => self.has_prior_season,
            FeatureColumn::RatingMomentum => self.rating_momentum,
            FeatureColumn::GoalsTrend => self.goals_trend,
            FeatureColumn::MinutesTrend => self.minutes_trend,
        }
    }

    fn value_mut(&mut self, column: FeatureColumn) -> &mut f64 {
        match column {
            FeatureColumn::Age => &mut self.age,
            FeatureColumn::Overall => &mut self.overall,
            FeatureColumn::Potential => &mut self.potential,
            FeatureColumn::Pace => &mut self.pace,
            FeatureColumn::Shooting => &mut self.shooting,
            FeatureColumn::Passing => &mut self.passing,
            FeatureColumn::Dribbling => &mut self.dribbling,
            FeatureColumn::Defending => &mut self.defending,
            FeatureColumn::Physic => &mut self.physic,
            FeatureColumn::Minutes => &mut self.minutes,
            FeatureColumn::Nineties => &mut self.nineties,
            FeatureColumn::GoalsPer90 => &mut self.goals_per90,
            FeatureColumn::AssistsPer90 => &mut self.assists_per90,
            FeatureColumn::GoalsAssistsPer90 => &mut self.goals_assists_per90,
            FeatureColumn::NonPenaltyGoalsPer90 => &mut self.non_penalty_goals_per90,
            FeatureColumn::XgPer90 => &mut self.xg_per90,
            FeatureColumn::XagPer90 => &mut self.xag_per90,
            FeatureColumn::ShotsPer90 => &mut self.shots_per90,
            FeatureColumn::ShotsOnTargetPct => &mut self.shots_on_target_pct,
            FeatureColumn::PassCompletionPct => &mut self.pass_completion_pct,
            FeatureColumn::KeyPassesPer90 => &mut self.key_passes_per90,
            FeatureColumn::ProgressivePassesPer90 => &mut self.progressive_passes_per90,
            FeatureColumn::TacklesPer90 => &mut self.tackles_per90,
            FeatureColumn::InterceptionsPer90 => &mut self.interceptions_per90,
            FeatureColumn::ScaPer90 => &mut self.sca_per90,
            FeatureColumn::AgeSquared => &mut self.age_squared,
            FeatureColumn::IsYouth => &mut self.is_youth,
            FeatureColumn::IsPrime => &mut self.is_prime,
            FeatureColumn::IsVeteran => &mut self.is_veteran,
            FeatureColumn::IsElite => &mut self.is_elite,
            FeatureColumn::IsGood => &mut self.is_good,
            FeatureColumn::IsAverage => &mut self.is_average,
            FeatureColumn::WageZscore => &mut self.wage_zscore,
            FeatureColumn::WagePercentile => &mut self.wage_percentile,
            FeatureColumn::ValueZscore => &mut self.value_zscore,
            FeatureColumn::GoalsVsXg => &mut self.goals_vs_xg,
            FeatureColumn::IsForward => &mut self.is_forward,
            FeatureColumn::IsMidfield => &mut self.is_midfield,
            FeatureColumn::IsDefense => &mut self.is_defense,
            FeatureColumn::OverallLag1 => &mut self.overall_lag1,
            FeatureColumn::AgeLag1 => &mut self.age_lag1,
            FeatureColumn::MinutesLag1 => &mut self.minutes_lag1,
            FeatureColumn::GoalsPer90Lag1 => &mut self.goals_per90_lag1,
            FeatureColumn::AssistsPer90Lag1 => &mut self.assists_per90_lag1,
            FeatureColumn::GoalsAssistsPer90Lag1 => &mut self.goals_assists_per90_lag1,
            FeatureColumn::XgPer90Lag1 => &mut self.xg_per90_lag1,
            FeatureColumn::ValueEurLag1 => &mut self.value_eur_lag1,
            FeatureColumn::HasPriorSeason => &mut self.has_prior_season,
            FeatureColumn::RatingMomentum => &mut self.rating_momentum,
            FeatureColumn::GoalsTrend => &mut self.goals_trend,
            FeatureColumn::MinutesTrend => &mut self.minutes_trend,
        }
    }

    /// Ordered model row.
    pub fn to_row(&self) -> FeatureRow {
        let mut values = [0.0; FEATURE_COUNT];
        for column in FeatureColumn::ALL {
            values[column.index()] = self.value(column);
        }
        FeatureRow { values }
    }

    /// Replace non-finite values with zero. Returns how many were replaced.
    pub fn sanitize(&mut self) -> usize {
        let mut replaced = 0;
        for column in FeatureColumn::ALL {
            let slot = self.value_mut(column);
            if !slot.is_finite() {
                warn!("Feature {} is not finite ({}), treating as 0", column, slot);
                *slot = 0.0;
                replaced += 1;
            }
        }
        if !self.value_eur.is_finite() {
            warn!("Feature value_eur is not finite ({}), treating as 0", self.value_eur);
            self.value_eur = 0.0;
            replaced += 1;
        }
        if let Some(original) = self.original_overall {
            if !original.is_finite() {
                warn!("original_overall is not finite ({}), dropping it", original);
                self.original_overall = None;
                replaced += 1;
            }
        }
        if let Some(original) = self.original_potential {
            if !original.is_finite() {
                warn!("original_potential is not finite ({}), dropping it", original);
                self.original_potential = None;
                replaced += 1;
            }
        }
        replaced
    }

    pub fn attribute(&self, attribute: Attribute) -> f64 {
        self.value(attribute.column())
    }

    pub fn set_attribute(&mut self, attribute: Attribute, value: f64) {
        *self.value_mut(attribute.column()) = value;
    }

    /// Potential ceiling the projection may never drop below.
    pub fn potential_floor(&self) -> f64 {
        self.original_potential.map_or(self.potential, |original| original.max(self.potential))
    }
}

/// Ordered model input, exactly [`FEATURE_COUNT`] values long.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    values: [f64; FEATURE_COUNT],
}

impl FeatureRow {
    pub fn get(&self, column: FeatureColumn) -> f64 {
        self.values[column.index()]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// The six face attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Pace,
    Shooting,
    Passing,
    Dribbling,
    Defending,
    Physic,
}

impl Attribute {
    pub const ALL: [Attribute; 6] = [
        Attribute::Pace,
        Attribute::Shooting,
        Attribute::Passing,
        Attribute::Dribbling,
        Attribute::Defending,
        Attribute::Physic,
    ];

    pub fn column(self) -> FeatureColumn {
        match self {
            Attribute::Pace => FeatureColumn::Pace,
            Attribute::Shooting => FeatureColumn::Shooting,
            Attribute::Passing => FeatureColumn::Passing,
            Attribute::Dribbling => FeatureColumn::Dribbling,
            Attribute::Defending => FeatureColumn::Defending,
            Attribute::Physic => FeatureColumn::Physic,
        }
    }

    pub fn key(self) -> &'static str {
        self.column().name()
    }
}
