//! Projection CLI plumbing
//!
//! File and model-directory handling behind the `fp` binary. Kept out of
//! `main.rs` so it can be tested without argument parsing.

pub mod logging;

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use fp_core::estimator::ModelManifest;
use fp_core::{
    EstimatorSet, Projection, ProjectionConfig, ProjectionRecord, ProjectionRequest, Projector,
    Statistic,
};

/// Trained set from `models`, or the carry-forward baseline.
pub fn load_estimators(models: Option<&Path>) -> Result<Arc<EstimatorSet>> {
    match models {
        Some(dir) => {
            let set = EstimatorSet::load_dir(dir)
                .with_context(|| format!("Failed to load models from {}", dir.display()))?;
            Ok(Arc::new(set))
        }
        None => {
            warn!("No model directory given, using the carry-forward baseline");
            Ok(Arc::new(EstimatorSet::carry_forward()))
        }
    }
}

/// Explicit file first, then `FP_CONFIG_PATH` / `FP_PROFILE`.
pub fn load_config(path: Option<&Path>) -> Result<ProjectionConfig> {
    match path {
        Some(path) => ProjectionConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(ProjectionConfig::from_env_or_default()),
    }
}

pub fn build_projector(models: Option<&Path>, config: Option<&Path>) -> Result<Projector> {
    let estimators = load_estimators(models)?;
    let config = load_config(config)?;
    let projector = Projector::new(estimators, config).context("Failed to build projector")?;
    info!("Projector ready with {} estimator(s)", projector.estimators().len());
    Ok(projector)
}

pub fn read_request(path: &Path) -> Result<ProjectionRequest> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read request {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid request JSON in {}", path.display()))
}

pub fn read_requests(path: &Path) -> Result<Vec<ProjectionRequest>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read requests {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Expected a JSON array of requests in {}", path.display()))
}

/// Pretty JSON to `out`, or stdout when `None`.
pub fn write_json<T: Serialize>(value: &T, out: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }
    Ok(())
}

pub fn run_project(projector: &Projector, input: &Path, out: Option<&Path>) -> Result<Projection> {
    let request = read_request(input)?;
    let projection = projector
        .project(&request)
        .with_context(|| format!("Projection failed for player {}", request.player_id))?;
    write_json(&projection, out)?;
    Ok(projection)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// (player id, error message)
    pub failures: Vec<(u64, String)>,
}

pub fn run_batch(projector: &Projector, input: &Path, out: Option<&Path>) -> Result<BatchSummary> {
    let requests = read_requests(input)?;
    info!("Projecting {} players", requests.len());

    let report = projector.project_batch(&requests);
    let records: Vec<ProjectionRecord> = report.records(Utc::now());
    write_json(&records, out)?;

    let failures = report
        .entries
        .iter()
        .filter_map(|entry| {
            entry.result.as_ref().err().map(|err| (entry.player_id, err.to_string()))
        })
        .collect();

    Ok(BatchSummary {
        total: report.entries.len(),
        succeeded: report.succeeded(),
        failed: report.failed(),
        failures,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub set_version: Option<String>,
    pub estimators: Vec<(String, String)>,
    pub missing: Vec<String>,
}

pub fn inspect_models(models: Option<&Path>) -> Result<ModelSummary> {
    let set = load_estimators(models)?;
    let set_version = match models {
        Some(dir) => Some(ModelManifest::load(dir)?.version),
        None => None,
    };

    Ok(ModelSummary {
        set_version,
        estimators: set
            .iter()
            .map(|(statistic, estimator)| {
                (statistic.key().to_string(), estimator.version().to_string())
            })
            .collect(),
        missing: set.missing().into_iter().map(|s: Statistic| s.key().to_string()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fp_core::FeatureRecord;
    use tempfile::TempDir;

    fn request(player_id: u64) -> ProjectionRequest {
        ProjectionRequest::new(
            player_id,
            FeatureRecord {
                age: 25.0,
                overall: 78.0,
                potential: 82.0,
                pace: 80.0,
                shooting: 79.0,
                passing: 70.0,
                dribbling: 77.0,
                defending: 40.0,
                physic: 65.0,
                minutes: 2000.0,
                value_eur: 12_000_000.0,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_project_writes_year_list() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("request.json");
        let out = dir.path().join("projection.json");
        fs::write(&input, serde_json::to_string(&request(1)).unwrap()).unwrap();

        let projector = build_projector(None, None).unwrap();
        assert_eq!(projector.estimators().len(), Statistic::ALL.len());
        run_project(&projector, &input, Some(&out)).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written.as_array().unwrap().len(), 9);
    }

    #[test]
    fn test_batch_reports_failures() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("requests.json");
        let out = dir.path().join("records.json");
        let requests = vec![
            request(1),
            ProjectionRequest { player_id: 2, name: None, features: None },
            request(3),
        ];
        fs::write(&input, serde_json::to_string(&requests).unwrap()).unwrap();

        let projector = build_projector(None, None).unwrap();
        let summary = run_batch(&projector, &input, Some(&out)).unwrap();

        assert_eq!((summary.total, summary.succeeded, summary.failed), (3, 2, 1));
        assert_eq!(summary.failures[0].0, 2);

        let written: Vec<serde_json::Value> =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written.len(), 2);
        assert!(written[0]["computed_at"].is_string());
    }

    #[test]
    fn test_bad_request_has_context() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("broken.json");
        fs::write(&input, "{ not json").unwrap();

        let err = read_request(&input).unwrap_err();
        assert!(err.to_string().contains("Invalid request JSON"));
    }

    #[test]
    fn test_inspect_baseline() {
        let summary = inspect_models(None).unwrap();
        assert_eq!(summary.set_version, None);
        assert_eq!(summary.missing, vec!["value_eur".to_string()]);
        assert_eq!(summary.estimators.len(), 15);
    }
}
