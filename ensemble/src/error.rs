use clusens_learner::LearnerError;
use thiserror::Error;

/// Errors returned by ensemble operations.
///
/// Missing regions and unlabeled items are not errors; they produce empty
/// results instead.
#[derive(Debug, Error)]
pub enum EnsembleError {
    #[error("ensemble: cannot build model for region {region}: {source}")]
    ModelConstruction {
        region: String,
        source: LearnerError,
    },

    #[error("ensemble: invalid config: {0}")]
    Config(#[from] serde_json::Error),
}
