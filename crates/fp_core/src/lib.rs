//! # fp_core - Multi-Year Football Player Projection Engine
//!
//! Projects a player's attributes, overall rating, potential, market value
//! and per-season output nine seasons ahead. Each season runs a set of
//! independent estimators, corrects their raw output into plausible values
//! and feeds the result back as next season's input.
//!
//! ## Features
//! - Pluggable estimators (linear JSON artifacts or in-process stubs)
//! - Rule-table rating correction, momentum, value and attribute coherence
//! - Every tuning constant configurable, with presets
//! - Deterministic: same record + same estimators = same projection

// Config structs are filled field by field in tests and presets
#![allow(clippy::field_reassign_with_default)]

pub mod config;
pub mod correction;
pub mod error;
pub mod estimator;
pub mod features;
pub mod inference;
pub mod projection;
pub mod result;
pub mod transition;

pub use config::ProjectionConfig;
pub use error::{ArtifactError, ConfigError, EstimatorError, ProjectionError, Result};
pub use estimator::{Estimator, EstimatorSet, Statistic};
pub use features::{FeatureColumn, FeatureRecord, FeatureRow, FEATURE_COUNT};
pub use projection::{
    BatchReport, Projection, ProjectionRecord, ProjectionRequest, Projector, PROJECTION_YEARS,
};
pub use result::SeasonResult;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
