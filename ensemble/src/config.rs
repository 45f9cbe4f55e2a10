use serde::{Deserialize, Serialize};

use crate::error::EnsembleError;

/// Which regions' models learn from a training item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainPolicy {
    /// Every region with positive inclusion degree trains its model, while
    /// prediction consults only the first matching region.
    #[default]
    AllMatching,

    /// Only the region prediction would route to trains its model.
    FirstMatch,
}

/// Controls coordinator behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default: [`TrainPolicy::AllMatching`].
    pub train_policy: TrainPolicy,

    /// Number of training steps after initialization during which
    /// prediction reports no owning region. 0 disables the window;
    /// `u64::MAX` keeps routing disabled for the whole run.
    /// Default: 0.
    pub routing_warmup: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            train_policy: TrainPolicy::AllMatching,
            routing_warmup: 0,
        }
    }
}

impl Config {
    /// Parses a JSON config. Missing fields take their defaults.
    pub fn from_json(s: &str) -> Result<Self, EnsembleError> {
        Ok(serde_json::from_str(s)?)
    }
}
