//! Linear regression artifact
//!
//! JSON layout:
//!
//! ```json
//! {
//!   "statistic": "overall",
//!   "version": "2025.1",
//!   "feature_names": ["age_fifa", "overall", "..."],
//!   "feature_means": [25.1, 71.3, "..."],
//!   "feature_stds": [4.2, 6.8, "..."],
//!   "coefficients": [-0.21, 0.97, "..."],
//!   "intercept": 0.4
//! }
//! ```
//!
//! Means/stds are optional; when present each input is standardised before
//! the dot product.

use serde::{Deserialize, Serialize};

use super::{check_row_len, Estimator, Statistic};
use crate::error::EstimatorError;
use crate::features::{FeatureColumn, FeatureRow};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearArtifact {
    pub statistic: Statistic,
    pub version: String,
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub feature_means: Vec<f64>,
    #[serde(default)]
    pub feature_stds: Vec<f64>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearArtifact {
    /// Structural problems that make the artifact unusable under either
    /// invocation convention.
    pub fn validate(&self) -> Result<(), String> {
        let n = self.coefficients.len();
        if n == 0 {
            return Err("no coefficients".to_string());
        }
        if self.feature_names.len() != n {
            return Err(format!(
                "{} feature names for {} coefficients",
                self.feature_names.len(),
                n
            ));
        }
        if !self.feature_means.is_empty() && self.feature_means.len() != n {
            return Err(format!("{} means for {} coefficients", self.feature_means.len(), n));
        }
        if !self.feature_stds.is_empty() && self.feature_stds.len() != n {
            return Err(format!("{} stds for {} coefficients", self.feature_stds.len(), n));
        }
        if self.feature_stds.iter().any(|s| *s == 0.0 || !s.is_finite()) {
            return Err("zero or non-finite standard deviation".to_string());
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err("non-finite coefficient".to_string());
        }
        Ok(())
    }

    fn standardise(&self, i: usize, x: f64) -> f64 {
        let mean = self.feature_means.get(i).copied().unwrap_or(0.0);
        let std = self.feature_stds.get(i).copied().unwrap_or(1.0);
        (x - mean) / std
    }

    fn finish(&self, sum: f64) -> Result<f64, EstimatorError> {
        let y = sum + self.intercept;
        if y.is_finite() {
            Ok(y)
        } else {
            Err(EstimatorError::NonFinite(y))
        }
    }
}

impl Estimator for LinearArtifact {
    fn predict(&self, row: &FeatureRow) -> Result<f64, EstimatorError> {
        let mut sum = 0.0;
        for (i, (name, coef)) in self.feature_names.iter().zip(&self.coefficients).enumerate() {
            let column = FeatureColumn::from_name(name)
                .ok_or_else(|| EstimatorError::UnknownFeature(name.clone()))?;
            sum += coef * self.standardise(i, row.get(column));
        }
        self.finish(sum)
    }

    fn predict_values(&self, values: &[f64]) -> Result<f64, EstimatorError> {
        check_row_len(values)?;
        if self.coefficients.len() != values.len() {
            return Err(EstimatorError::ShapeMismatch {
                expected: self.coefficients.len(),
                found: values.len(),
            });
        }
        let sum = values
            .iter()
            .zip(&self.coefficients)
            .enumerate()
            .map(|(i, (x, coef))| coef * self.standardise(i, *x))
            .sum::<f64>();
        self.finish(sum)
    }

    fn version(&self) -> &str {
        &self.version
    }
}
