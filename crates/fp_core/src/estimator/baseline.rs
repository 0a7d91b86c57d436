//! Deterministic estimators for baselines and tests

use std::fmt;

use crate::error::EstimatorError;
use crate::features::FeatureRow;

/// Always predicts the same value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantEstimator {
    value: f64,
}

impl ConstantEstimator {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl super::Estimator for ConstantEstimator {
    fn predict(&self, _row: &FeatureRow) -> Result<f64, EstimatorError> {
        Ok(self.value)
    }

    fn predict_values(&self, values: &[f64]) -> Result<f64, EstimatorError> {
        super::check_row_len(values)?;
        Ok(self.value)
    }

    fn version(&self) -> &str {
        "constant"
    }
}

/// Wraps a plain function of the row.
pub struct FnEstimator<F> {
    label: &'static str,
    func: F,
}

impl<F> FnEstimator<F>
where
    F: Fn(&FeatureRow) -> f64 + Send + Sync,
{
    pub fn new(label: &'static str, func: F) -> Self {
        Self { label, func }
    }
}

impl<F> fmt::Debug for FnEstimator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnEstimator").field("label", &self.label).finish()
    }
}

impl<F> super::Estimator for FnEstimator<F>
where
    F: Fn(&FeatureRow) -> f64 + Send + Sync,
{
    fn predict(&self, row: &FeatureRow) -> Result<f64, EstimatorError> {
        Ok((self.func)(row))
    }

    fn version(&self) -> &str {
        self.label
    }
}
