//! Model column contract
//!
//! Column identity and order are fixed by the estimators' training data and
//! must never be reordered. Names are the training-time headers.

use serde::{Deserialize, Serialize};

/// Number of columns in a [`FeatureRow`](super::FeatureRow).
pub const FEATURE_COUNT: usize = 51;

/// One model column, in training order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeatureColumn {
    Age,
    Overall,
    Potential,
    Pace,
    Shooting,
    Passing,
    Dribbling,
    Defending,
    Physic,
    Minutes,
    Nineties,
    GoalsPer90,
    AssistsPer90,
    GoalsAssistsPer90,
    NonPenaltyGoalsPer90,
    XgPer90,
    XagPer90,
    ShotsPer90,
    ShotsOnTargetPct,
    PassCompletionPct,
    KeyPassesPer90,
    ProgressivePassesPer90,
    TacklesPer90,
    InterceptionsPer90,
    ScaPer90,
    AgeSquared,
    IsYouth,
    IsPrime,
    IsVeteran,
    IsElite,
    IsGood,
    IsAverage,
    WageZscore,
    WagePercentile,
    ValueZscore,
    GoalsVsXg,
    IsForward,
    IsMidfield,
    IsDefense,
    OverallLag1,
    AgeLag1,
    MinutesLag1,
    GoalsPer90Lag1,
    AssistsPer90Lag1,
    GoalsAssistsPer90Lag1,
    XgPer90Lag1,
    ValueEurLag1,
    HasPriorSeason,
    RatingMomentum,
    GoalsTrend,
    MinutesTrend,
}

impl FeatureColumn {
    /// Every column in training order.
    pub const ALL: [FeatureColumn; FEATURE_COUNT] = [
        FeatureColumn::Age,
        FeatureColumn::Overall,
        FeatureColumn::Potential,
        FeatureColumn::Pace,
        FeatureColumn::Shooting,
        FeatureColumn::Passing,
        FeatureColumn::Dribbling,
        FeatureColumn::Defending,
        FeatureColumn::Physic,
        FeatureColumn::Minutes,
        FeatureColumn::Nineties,
        FeatureColumn::GoalsPer90,
        FeatureColumn::AssistsPer90,
        FeatureColumn::GoalsAssistsPer90,
        FeatureColumn::NonPenaltyGoalsPer90,
        FeatureColumn::XgPer90,
        FeatureColumn::XagPer90,
        FeatureColumn::ShotsPer90,
        FeatureColumn::ShotsOnTargetPct,
        FeatureColumn::PassCompletionPct,
        FeatureColumn::KeyPassesPer90,
        FeatureColumn::ProgressivePassesPer90,
        FeatureColumn::TacklesPer90,
        FeatureColumn::InterceptionsPer90,
        FeatureColumn::ScaPer90,
        FeatureColumn::AgeSquared,
        FeatureColumn::IsYouth,
        FeatureColumn::IsPrime,
        FeatureColumn::IsVeteran,
        FeatureColumn::IsElite,
        FeatureColumn::IsGood,
        FeatureColumn::IsAverage,
        FeatureColumn::WageZscore,
        FeatureColumn::WagePercentile,
        FeatureColumn::ValueZscore,
        FeatureColumn::GoalsVsXg,
        FeatureColumn::IsForward,
        FeatureColumn::IsMidfield,
        FeatureColumn::IsDefense,
        FeatureColumn::OverallLag1,
        FeatureColumn::AgeLag1,
        FeatureColumn::MinutesLag1,
        FeatureColumn::GoalsPer90Lag1,
        FeatureColumn::AssistsPer90Lag1,
        FeatureColumn::GoalsAssistsPer90Lag1,
        FeatureColumn::XgPer90Lag1,
        FeatureColumn::ValueEurLag1,
        FeatureColumn::HasPriorSeason,
        FeatureColumn::RatingMomentum,
        FeatureColumn::GoalsTrend,
        FeatureColumn::MinutesTrend,
    ];

    /// Training-time column header.
    pub fn name(self) -> &'static str {
        match self {
            FeatureColumn::Age => "age_fifa",
            FeatureColumn::Overall => "overall",
            FeatureColumn::Potential => "potential",
            FeatureColumn::Pace => "pace",
            FeatureColumn::Shooting => "shooting",
            FeatureColumn::Passing => "passing",
            FeatureColumn::Dribbling => "dribbling",
            FeatureColumn::Defending => "defending",
            FeatureColumn::Physic => "physic",
            FeatureColumn::Minutes => "Playing Time_Min",
            FeatureColumn::Nineties => "Playing Time_90s",
            FeatureColumn::GoalsPer90 => "Per 90 Minutes_Gls",
            FeatureColumn::AssistsPer90 => "Per 90 Minutes_Ast",
            FeatureColumn::GoalsAssistsPer90 => "Per 90 Minutes_G+A",
            FeatureColumn::NonPenaltyGoalsPer90 => "Per 90 Minutes_G-PK",
            FeatureColumn::XgPer90 => "Per 90 Minutes_xG",
            FeatureColumn::XagPer90 => "Per 90 Minutes_xAG",
            FeatureColumn::ShotsPer90 => "Standard_Sh/90",
            FeatureColumn::ShotsOnTargetPct => "Standard_SoT%",
            FeatureColumn::PassCompletionPct => "Total_Cmp%",
            FeatureColumn::KeyPassesPer90 => "Per 90 Minutes_KP",
            FeatureColumn::ProgressivePassesPer90 => "Per 90 Minutes_PrgP",
            FeatureColumn::TacklesPer90 => "Per 90 Minutes_Tackles_Tkl",
            FeatureColumn::InterceptionsPer90 => "Per 90 Minutes_Int",
            FeatureColumn::ScaPer90 => "SCA_SCA90",
            FeatureColumn::AgeSquared => "age_squared",
            FeatureColumn::IsYouth => "is_youth",
            FeatureColumn::IsPrime => "is_prime",
            FeatureColumn::IsVeteran => "is_veteran",
            FeatureColumn::IsElite => "is_elite",
            FeatureColumn::IsGood => "is_good",
            FeatureColumn::IsAverage => "is_average",
            FeatureColumn::WageZscore => "wage_zscore",
            FeatureColumn::WagePercentile => "wage_percentile",
            FeatureColumn::ValueZscore => "value_zscore",
            FeatureColumn::GoalsVsXg => "goals_vs_xG",
            FeatureColumn::IsForward => "is_forward",
            FeatureColumn::IsMidfield => "is_midfield",
            FeatureColumn::IsDefense => "is_defense",
            FeatureColumn::OverallLag1 => "overall_lag1",
            FeatureColumn::AgeLag1 => "age_lag1",
            FeatureColumn::MinutesLag1 => "Playing Time_Min_lag1",
            FeatureColumn::GoalsPer90Lag1 => "Per 90 Minutes_Gls_lag1",
            FeatureColumn::AssistsPer90Lag1 => "Per 90 Minutes_Ast_lag1",
            FeatureColumn::GoalsAssistsPer90Lag1 => "Per 90 Minutes_G+A_lag1",
            FeatureColumn::XgPer90Lag1 => "Per 90 Minutes_xG_lag1",
            FeatureColumn::ValueEurLag1 => "value_eur_lag1",
            FeatureColumn::HasPriorSeason => "has_prior_season",
            FeatureColumn::RatingMomentum => "rating_momentum",
            FeatureColumn::GoalsTrend => "goals_trend",
            FeatureColumn::MinutesTrend => "minutes_trend",
        }
    }

    /// Resolve a training-time header.
    pub fn from_name(name: &str) -> Option<FeatureColumn> {
        Self::ALL.iter().copied().find(|col| col.name() == name)
    }

    /// Position of the column inside a row.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for FeatureColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
