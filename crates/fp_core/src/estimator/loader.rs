//! Model directory loader
//!
//! A model directory holds a `manifest.json` naming one artifact file per
//! statistic:
//!
//! ```json
//! {
//!   "version": "2025.1",
//!   "artifacts": { "overall": "overall.v3.json", "pace": "pace.v2.json" }
//! }
//! ```
//!
//! Every statistic must be present; a partial set is rejected at load time
//! rather than discovered season by season.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{EstimatorSet, LinearArtifact, Statistic};
use crate::error::ArtifactError;

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelManifest {
    pub version: String,
    /// Statistic key → artifact file name relative to the manifest.
    pub artifacts: BTreeMap<String, String>,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let display = path.display().to_string();
    let raw = fs::read_to_string(path)
        .map_err(|source| ArtifactError::Io { path: display.clone(), source })?;
    serde_json::from_str(&raw).map_err(|source| ArtifactError::Parse { path: display, source })
}

impl ModelManifest {
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        read_json(&dir.join(MANIFEST_FILE))
    }
}

impl EstimatorSet {
    /// Load every artifact listed in `dir/manifest.json`.
    pub fn load_dir(dir: &Path) -> Result<Self, ArtifactError> {
        let manifest = ModelManifest::load(dir)?;
        info!(
            "Loading model set {} ({} artifacts) from {}",
            manifest.version,
            manifest.artifacts.len(),
            dir.display()
        );

        let mut builder = EstimatorSet::builder();
        let mut seen = Vec::with_capacity(manifest.artifacts.len());

        for (key, file) in &manifest.artifacts {
            let statistic = Statistic::from_key(key)
                .ok_or_else(|| ArtifactError::UnknownStatistic(key.clone()))?;
            let path = dir.join(file);
            let artifact: LinearArtifact = read_json(&path)?;

            if artifact.statistic != statistic {
                return Err(ArtifactError::StatisticMismatch {
                    path: path.display().to_string(),
                    expected: statistic,
                    found: artifact.statistic,
                });
            }
            artifact.validate().map_err(|reason| ArtifactError::Invalid {
                path: path.display().to_string(),
                reason,
            })?;

            debug!("Loaded {} v{} from {}", statistic, artifact.version, path.display());
            seen.push(statistic);
            builder = builder.with(statistic, Arc::new(artifact));
        }

        if let Some(missing) = Statistic::ALL.iter().find(|stat| !seen.contains(stat)) {
            return Err(ArtifactError::MissingArtifact(*missing));
        }

        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureRecord;
    use tempfile::TempDir;

    fn write_artifact(dir: &Path, statistic: Statistic, intercept: f64) -> String {
        let file = format!("{}.v1.json", statistic.key());
        let artifact = LinearArtifact {
            statistic,
            version: "1".to_string(),
            feature_names: vec!["overall".to_string()],
            feature_means: vec![],
            feature_stds: vec![],
            coefficients: vec![0.0],
            intercept,
        };
        fs::write(dir.join(&file), serde_json::to_string(&artifact).unwrap()).unwrap();
        file
    }

    fn write_model_dir(skip: Option<Statistic>) -> TempDir {
        let dir = TempDir::new().unwrap();
        let mut artifacts = BTreeMap::new();
        for (i, stat) in Statistic::ALL.iter().enumerate() {
            if Some(*stat) == skip {
                continue;
            }
            let file = write_artifact(dir.path(), *stat, i as f64);
            artifacts.insert(stat.key().to_string(), file);
        }
        let manifest = ModelManifest { version: "test".to_string(), artifacts };
        fs::write(dir.path().join(MANIFEST_FILE), serde_json::to_string(&manifest).unwrap())
            .unwrap();
        dir
    }

    #[test]
    fn test_load_full_directory() {
        let dir = write_model_dir(None);
        let set = EstimatorSet::load_dir(dir.path()).unwrap();

        assert_eq!(set.len(), Statistic::ALL.len());
        let row = FeatureRecord::default().to_row();
        let overall = set.get(Statistic::Overall).unwrap();
        assert_eq!(overall.predict(&row).unwrap(), 7.0);
        assert_eq!(overall.version(), "1");
    }

    #[test]
    fn test_missing_statistic_rejected() {
        let dir = write_model_dir(Some(Statistic::Minutes));
        let err = EstimatorSet::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::MissingArtifact(Statistic::Minutes)));
    }

    #[test]
    fn test_mismatched_statistic_rejected() {
        let dir = write_model_dir(None);
        // Point the pace entry at the shooting artifact
        let mut manifest = ModelManifest::load(dir.path()).unwrap();
        let shooting = manifest.artifacts["shooting"].clone();
        manifest.artifacts.insert("pace".to_string(), shooting);
        fs::write(dir.path().join(MANIFEST_FILE), serde_json::to_string(&manifest).unwrap())
            .unwrap();

        let err = EstimatorSet::load_dir(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            ArtifactError::StatisticMismatch { expected: Statistic::Pace, .. }
        ));
    }

    #[test]
    fn test_missing_manifest_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = EstimatorSet::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Io { .. }));
    }
}
