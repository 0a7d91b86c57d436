use thiserror::Error;

use crate::estimator::Statistic;

/// Failure of a single estimator invocation.
///
/// Never fatal for a season: the inference step records the statistic as
/// absent and carries on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimatorError {
    #[error("Shape mismatch: expected {expected} features, found {found}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("Unknown feature column: {0}")]
    UnknownFeature(String),

    #[error("Estimator produced a non-finite value: {0}")]
    NonFinite(f64),

    #[error("Invocation convention not supported")]
    Unsupported,

    #[error("Estimator panicked: {0}")]
    Panicked(String),
}

/// Failure while loading model artifacts from disk.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("No artifact for statistic {0}")]
    MissingArtifact(Statistic),

    #[error("Unknown statistic key: {0}")]
    UnknownStatistic(String),

    #[error("Artifact {path} predicts {found}, manifest expects {expected}")]
    StatisticMismatch { path: String, expected: Statistic, found: Statistic },

    #[error("Invalid artifact {path}: {reason}")]
    Invalid { path: String, reason: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors that abort one player's projection.
#[derive(Error, Debug)]
pub enum ProjectionError {
    #[error("Player {player_id} has no feature record")]
    MissingFeatureRecord { player_id: u64 },

    #[error("Player {player_id}: invalid mandatory feature {feature} = {value}")]
    InvalidFeature { player_id: u64, feature: &'static str, value: f64 },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build inference worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl ProjectionError {
    /// True when the failure belongs to one player's input rather than the engine.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ProjectionError::MissingFeatureRecord { .. } | ProjectionError::InvalidFeature { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ProjectionError>;
