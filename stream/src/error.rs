use thiserror::Error;

/// Errors returned by stream operations.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("invalid index config: {0}")]
    Config(#[from] serde_json::Error),
}
