//! Estimator set
//!
//! A fixed collection of independently trained scalar regressors, one per
//! [`Statistic`]. The set is built once per process, wrapped in an `Arc`
//! and shared read-only by every projection.

mod baseline;
mod linear;
mod loader;

pub use baseline::{ConstantEstimator, FnEstimator};
pub use linear::LinearArtifact;
pub use loader::{ModelManifest, MANIFEST_FILE};

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::EstimatorError;
use crate::features::{Attribute, FeatureRow, FEATURE_COUNT};

/// The statistic an estimator predicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    Pace,
    Shooting,
    Passing,
    Dribbling,
    Defending,
    Physic,
    RatingChange,
    Overall,
    ValueEur,
    Potential,
    Goals90,
    Assists90,
    Interceptions90,
    Tackles90,
    Minutes,
    KeyPasses90,
}

impl Statistic {
    pub const ALL: [Statistic; 16] = [
        Statistic::Pace,
        Statistic::Shooting,
        Statistic::Passing,
        Statistic::Dribbling,
        Statistic::Defending,
        Statistic::Physic,
        Statistic::RatingChange,
        Statistic::Overall,
        Statistic::ValueEur,
        Statistic::Potential,
        Statistic::Goals90,
        Statistic::Assists90,
        Statistic::Interceptions90,
        Statistic::Tackles90,
        Statistic::Minutes,
        Statistic::KeyPasses90,
    ];

    /// Artifact key used in manifests.
    pub fn key(self) -> &'static str {
        match self {
            Statistic::Pace => "pace",
            Statistic::Shooting => "shooting",
            Statistic::Passing => "passing",
            Statistic::Dribbling => "dribbling",
            Statistic::Defending => "defending",
            Statistic::Physic => "physic",
            Statistic::RatingChange => "rating_change",
            Statistic::Overall => "overall",
            Statistic::ValueEur => "value_eur",
            Statistic::Potential => "potential",
            Statistic::Goals90 => "g90",
            Statistic::Assists90 => "a90",
            Statistic::Interceptions90 => "int90",
            Statistic::Tackles90 => "tkl90",
            Statistic::Minutes => "minutes",
            Statistic::KeyPasses90 => "key90",
        }
    }

    pub fn from_key(key: &str) -> Option<Statistic> {
        Self::ALL.iter().copied().find(|stat| stat.key() == key)
    }

    pub fn for_attribute(attribute: Attribute) -> Statistic {
        match attribute {
            Attribute::Pace => Statistic::Pace,
            Attribute::Shooting => Statistic::Shooting,
            Attribute::Passing => Statistic::Passing,
            Attribute::Dribbling => Statistic::Dribbling,
            Attribute::Defending => Statistic::Defending,
            Attribute::Physic => Statistic::Physic,
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A trained scalar regressor.
///
/// `predict` is the primary, column-addressed convention. `predict_values`
/// is the positional fallback the inference step tries when `predict`
/// fails; implementations that only support one convention leave the other
/// returning [`EstimatorError::Unsupported`].
pub trait Estimator: Send + Sync + fmt::Debug {
    fn predict(&self, row: &FeatureRow) -> Result<f64, EstimatorError>;

    fn predict_values(&self, values: &[f64]) -> Result<f64, EstimatorError> {
        let _ = values;
        Err(EstimatorError::Unsupported)
    }

    /// Artifact version, for logging.
    fn version(&self) -> &str {
        "unversioned"
    }
}

/// Immutable statistic → estimator map.
#[derive(Debug, Clone, Default)]
pub struct EstimatorSet {
    estimators: BTreeMap<Statistic, Arc<dyn Estimator>>,
}

impl EstimatorSet {
    pub fn builder() -> EstimatorSetBuilder {
        EstimatorSetBuilder::default()
    }

    pub fn get(&self, statistic: Statistic) -> Option<&Arc<dyn Estimator>> {
        self.estimators.get(&statistic)
    }

    pub fn contains(&self, statistic: Statistic) -> bool {
        self.estimators.contains_key(&statistic)
    }

    pub fn len(&self) -> usize {
        self.estimators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.estimators.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Statistic, &Arc<dyn Estimator>)> + '_ {
        self.estimators.iter().map(|(stat, estimator)| (*stat, estimator))
    }

    /// Statistics with no registered estimator.
    pub fn missing(&self) -> Vec<Statistic> {
        Statistic::ALL.iter().copied().filter(|stat| !self.contains(*stat)).collect()
    }

    /// Baseline set that predicts "no change" from the row itself.
    ///
    /// Attributes, overall, potential, per-90 rates and minutes echo their
    /// current column; rating change is zero. Market value has no column in
    /// the row, so no value estimator is registered and value correction
    /// works from the live value.
    pub fn carry_forward() -> Self {
        use crate::features::FeatureColumn as C;

        let echo = |column: C| -> Arc<dyn Estimator> {
            Arc::new(FnEstimator::new("carry-forward", move |row: &FeatureRow| row.get(column)))
        };

        let mut builder = Self::builder();
        for attribute in Attribute::ALL {
            builder = builder.with(Statistic::for_attribute(attribute), echo(attribute.column()));
        }
        builder
            .with(Statistic::Overall, echo(C::Overall))
            .with(Statistic::Potential, echo(C::Potential))
            .with(Statistic::RatingChange, Arc::new(ConstantEstimator::new(0.0)))
            .with(Statistic::Goals90, echo(C::GoalsPer90))
            .with(Statistic::Assists90, echo(C::AssistsPer90))
            .with(Statistic::Interceptions90, echo(C::InterceptionsPer90))
            .with(Statistic::Tackles90, echo(C::TacklesPer90))
            .with(Statistic::KeyPasses90, echo(C::KeyPassesPer90))
            .with(Statistic::Minutes, echo(C::Minutes))
            .build()
    }
}

#[derive(Debug, Default)]
pub struct EstimatorSetBuilder {
    estimators: BTreeMap<Statistic, Arc<dyn Estimator>>,
}

impl EstimatorSetBuilder {
    pub fn with(mut self, statistic: Statistic, estimator: Arc<dyn Estimator>) -> Self {
        self.estimators.insert(statistic, estimator);
        self
    }

    pub fn build(self) -> EstimatorSet {
        EstimatorSet { estimators: self.estimators }
    }
}

/// Check a positional input against the model contract.
pub(crate) fn check_row_len(values: &[f64]) -> Result<(), EstimatorError> {
    if values.len() == FEATURE_COUNT {
        Ok(())
    } else {
        Err(EstimatorError::ShapeMismatch { expected: FEATURE_COUNT, found: values.len() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureRecord;

    #[test]
    fn test_statistic_keys_round_trip() {
        for stat in Statistic::ALL {
            assert_eq!(Statistic::from_key(stat.key()), Some(stat));
        }
        assert_eq!(Statistic::from_key("wage"), None);
    }

    #[test]
    fn test_carry_forward_echoes_row() {
        let set = EstimatorSet::carry_forward();
        let record = FeatureRecord {
            overall: 78.0,
            pace: 81.0,
            goals_per90: 0.42,
            minutes: 2400.0,
            ..FeatureRecord::default()
        };
        let row = record.to_row();

        let predict = |stat| set.get(stat).unwrap().predict(&row).unwrap();
        assert_eq!(predict(Statistic::Overall), 78.0);
        assert_eq!(predict(Statistic::Pace), 81.0);
        assert_eq!(predict(Statistic::Goals90), 0.42);
        assert_eq!(predict(Statistic::Minutes), 2400.0);
        assert_eq!(predict(Statistic::RatingChange), 0.0);
        assert_eq!(set.missing(), vec![Statistic::ValueEur]);
    }

    #[test]
    fn test_builder_replaces_duplicates() {
        let set = EstimatorSet::builder()
            .with(Statistic::Overall, Arc::new(ConstantEstimator::new(70.0)))
            .with(Statistic::Overall, Arc::new(ConstantEstimator::new(71.0)))
            .build();
        let row = FeatureRecord::default().to_row();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(Statistic::Overall).unwrap().predict(&row).unwrap(), 71.0);
    }
}
