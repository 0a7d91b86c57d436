//! Inference step
//!
//! Fans every estimator of the set out over a bounded rayon pool and joins
//! the results into a [`RawEstimates`] bundle. A failing estimator is retried
//! once through the positional convention; if that fails too its entry is
//! recorded as absent and the other estimators are unaffected.

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, warn};

use crate::config::InferenceConfig;
use crate::error::{EstimatorError, ProjectionError};
use crate::estimator::{Estimator, EstimatorSet, Statistic};
use crate::features::{FeatureRecord, FeatureRow};

/// Raw, uncorrected estimator outputs for one season.
///
/// A statistic maps to `Some(value)` when its estimator answered, `None`
/// when it failed, and is missing from the map when no estimator is
/// registered for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEstimates {
    values: BTreeMap<Statistic, Option<f64>>,
}

impl RawEstimates {
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = (Statistic, Option<f64>)>,
    {
        Self { values: values.into_iter().collect() }
    }

    pub fn get(&self, statistic: Statistic) -> Option<f64> {
        self.values.get(&statistic).copied().flatten()
    }

    /// The estimator ran and failed.
    pub fn is_failed(&self, statistic: Statistic) -> bool {
        matches!(self.values.get(&statistic), Some(None))
    }

    pub fn failures(&self) -> Vec<Statistic> {
        self.values.iter().filter(|(_, v)| v.is_none()).map(|(stat, _)| *stat).collect()
    }

    /// Value for rate-like statistics where absence means zero.
    pub fn value_or_zero(&self, statistic: Statistic) -> f64 {
        match self.values.get(&statistic) {
            Some(Some(value)) => *value,
            Some(None) => {
                warn!("Estimate {} unavailable, treating as 0", statistic);
                0.0
            }
            None => 0.0,
        }
    }
}

pub struct InferenceStep {
    estimators: Arc<EstimatorSet>,
    pool: ThreadPool,
}

impl InferenceStep {
    pub fn new(
        estimators: Arc<EstimatorSet>,
        config: &InferenceConfig,
    ) -> Result<Self, ProjectionError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.worker_threads.max(1))
            .thread_name(|i| format!("fp-inference-{}", i))
            .build()?;
        Ok(Self { estimators, pool })
    }

    pub fn estimators(&self) -> &EstimatorSet {
        &self.estimators
    }

    /// Run every estimator against one record and wait for all of them.
    pub fn run(&self, record: &FeatureRecord) -> RawEstimates {
        let row = record.to_row();
        let jobs: Vec<_> = self.estimators.iter().collect();

        let values: Vec<(Statistic, Option<f64>)> = self.pool.install(|| {
            jobs.into_par_iter()
                .map(|(statistic, estimator)| {
                    (statistic, invoke(statistic, estimator.as_ref(), &row))
                })
                .collect()
        });

        let estimates = RawEstimates::from_values(values);
        let failures = estimates.failures();
        if !failures.is_empty() {
            warn!("{} estimator(s) failed this season: {:?}", failures.len(), failures);
        }
        estimates
    }
}

fn invoke(statistic: Statistic, estimator: &dyn Estimator, row: &FeatureRow) -> Option<f64> {
    let primary = match guarded(|| estimator.predict(row)) {
        Ok(value) => return Some(value),
        Err(err) => err,
    };
    debug!(
        "{} ({}) named call failed: {}, trying positional",
        statistic,
        estimator.version(),
        primary
    );

    match guarded(|| estimator.predict_values(row.as_slice())) {
        Ok(value) => Some(value),
        Err(secondary) => {
            warn!(
                "{} ({}) failed under both conventions: {} / {}",
                statistic,
                estimator.version(),
                primary,
                secondary
            );
            None
        }
    }
}

/// Run one call, turning panics and non-finite output into errors.
fn guarded<F>(call: F) -> Result<f64, EstimatorError>
where
    F: FnOnce() -> Result<f64, EstimatorError>,
{
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(value)) if value.is_finite() => Ok(value),
        Ok(Ok(value)) => Err(EstimatorError::NonFinite(value)),
        Ok(Err(err)) => Err(err),
        Err(payload) => Err(EstimatorError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::{ConstantEstimator, FnEstimator};
    use crate::features::FEATURE_COUNT;

    /// Fails the named call, answers positionally.
    #[derive(Debug)]
    struct PositionalOnly;

    impl Estimator for PositionalOnly {
        fn predict(&self, _row: &FeatureRow) -> Result<f64, EstimatorError> {
            Err(EstimatorError::UnknownFeature("Per 90 Minutes_Gls".to_string()))
        }

        fn predict_values(&self, values: &[f64]) -> Result<f64, EstimatorError> {
            if values.len() == FEATURE_COUNT {
                Ok(values[1] + 0.5)
            } else {
                Err(EstimatorError::ShapeMismatch { expected: FEATURE_COUNT, found: values.len() })
            }
        }
    }

    #[derive(Debug)]
    struct Broken;

    impl Estimator for Broken {
        fn predict(&self, _row: &FeatureRow) -> Result<f64, EstimatorError> {
            panic!("model blew up")
        }
    }

    fn step(set: EstimatorSet) -> InferenceStep {
        InferenceStep::new(Arc::new(set), &InferenceConfig { worker_threads: 2 }).unwrap()
    }

    #[test]
    fn test_collects_every_estimator() {
        let set = EstimatorSet::builder()
            .with(Statistic::Overall, Arc::new(ConstantEstimator::new(81.0)))
            .with(Statistic::Goals90, Arc::new(ConstantEstimator::new(0.3)))
            .build();
        let raw = step(set).run(&FeatureRecord::default());

        assert_eq!(raw.get(Statistic::Overall), Some(81.0));
        assert_eq!(raw.get(Statistic::Goals90), Some(0.3));
        assert_eq!(raw.get(Statistic::Pace), None);
        assert!(!raw.is_failed(Statistic::Pace));
        assert!(raw.failures().is_empty());
    }

    #[test]
    fn test_positional_fallback() {
        let set =
            EstimatorSet::builder().with(Statistic::Overall, Arc::new(PositionalOnly)).build();
        let record = FeatureRecord { overall: 77.0, ..Default::default() };
        assert_eq!(step(set).run(&record).get(Statistic::Overall), Some(77.5));
    }

    #[test]
    fn test_failure_is_isolated() {
        let set = EstimatorSet::builder()
            .with(Statistic::Overall, Arc::new(Broken))
            .with(Statistic::ValueEur, Arc::new(FnEstimator::new("nan", |_: &FeatureRow| f64::NAN)))
            .with(Statistic::Pace, Arc::new(ConstantEstimator::new(70.0)))
            .build();
        let raw = step(set).run(&FeatureRecord::default());

        assert!(raw.is_failed(Statistic::Overall));
        assert!(raw.is_failed(Statistic::ValueEur));
        assert_eq!(raw.get(Statistic::Pace), Some(70.0));
        assert_eq!(raw.failures(), vec![Statistic::Overall, Statistic::ValueEur]);
        assert_eq!(raw.value_or_zero(Statistic::Overall), 0.0);
    }

    #[test]
    fn test_repeated_runs_identical() {
        let inference = step(EstimatorSet::carry_forward());
        let record =
            FeatureRecord { overall: 80.0, pace: 88.0, minutes: 2000.0, ..Default::default() };
        assert_eq!(inference.run(&record), inference.run(&record));
    }
}
