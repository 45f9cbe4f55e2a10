use thiserror::Error;

/// Errors returned by learner construction.
#[derive(Debug, Error)]
pub enum LearnerError {
    #[error("learner: invalid config: {0}")]
    InvalidConfig(String),

    #[error("learner: construction failed: {0}")]
    Construction(String),

    #[error("learner: parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
