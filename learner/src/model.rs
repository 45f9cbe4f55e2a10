use serde::{Deserialize, Serialize};

use crate::error::LearnerError;
use crate::majority::MajorityClass;
use crate::naive_bayes::NaiveBayes;

/// An incrementally trained classifier.
pub trait Model: Send {
    /// Short learner name, used in descriptions.
    fn name(&self) -> &str;

    /// Resets to an untrained state and checks the configuration.
    /// Called once before the model receives any training.
    fn prepare(&mut self) -> Result<(), LearnerError>;

    /// Learns from one labeled example.
    fn train(&mut self, features: &[f64], label: usize);

    /// Returns per-class scores, indexed by class. Empty means no opinion.
    fn predict(&self, features: &[f64]) -> Vec<f64>;
}

/// Builds identically configured, untrained models.
pub trait ModelFactory: Send {
    fn create(&self) -> Result<Box<dyn Model>, LearnerError>;
}

impl<F> ModelFactory for F
where
    F: Fn() -> Result<Box<dyn Model>, LearnerError> + Send,
{
    fn create(&self) -> Result<Box<dyn Model>, LearnerError> {
        self()
    }
}

fn default_min_variance() -> f64 {
    NaiveBayes::DEFAULT_MIN_VARIANCE
}

/// Selects and configures one of the built-in learners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LearnerConfig {
    /// Always votes with the class counts seen so far.
    MajorityClass,

    /// Gaussian naive Bayes.
    NaiveBayes {
        /// Variance floor for every attribute.
        #[serde(default = "default_min_variance")]
        min_variance: f64,
    },
}

impl Default for LearnerConfig {
    fn default() -> Self {
        LearnerConfig::NaiveBayes {
            min_variance: NaiveBayes::DEFAULT_MIN_VARIANCE,
        }
    }
}

impl LearnerConfig {
    pub fn from_json(s: &str) -> Result<Self, LearnerError> {
        Ok(serde_json::from_str(s)?)
    }
}

impl ModelFactory for LearnerConfig {
    fn create(&self) -> Result<Box<dyn Model>, LearnerError> {
        match self {
            LearnerConfig::MajorityClass => Ok(Box::new(MajorityClass::new())),
            LearnerConfig::NaiveBayes { min_variance } => {
                Ok(Box::new(NaiveBayes::new(*min_variance)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_parses_naive_bayes_with_default_variance() {
        let cfg = LearnerConfig::from_json(r#"{"kind": "naive_bayes"}"#).unwrap();
        assert_eq!(
            cfg,
            LearnerConfig::NaiveBayes {
                min_variance: NaiveBayes::DEFAULT_MIN_VARIANCE
            }
        );
        assert_eq!(cfg.create().unwrap().name(), "naive_bayes");
    }

    #[test]
    fn config_rejects_unknown_kind() {
        let err = LearnerConfig::from_json(r#"{"kind": "hoeffding_tree"}"#).unwrap_err();
        assert!(matches!(err, LearnerError::Parse(_)));
    }

    #[test]
    fn closure_is_a_factory() {
        let factory = || -> Result<Box<dyn Model>, LearnerError> { Ok(Box::new(MajorityClass::new())) };
        let model = factory.create().unwrap();
        assert_eq!(model.name(), "majority_class");
    }

    #[test]
    fn failing_closure_surfaces_error() {
        let factory = || -> Result<Box<dyn Model>, LearnerError> {
            Err(LearnerError::Construction("no such learner".into()))
        };
        let err = factory.create().err().unwrap();
        assert_eq!(err.to_string(), "learner: construction failed: no such learner");
    }

    #[test]
    fn invalid_variance_fails_on_prepare() {
        let cfg = LearnerConfig::NaiveBayes { min_variance: 0.0 };
        let mut model = cfg.create().unwrap();
        assert!(matches!(model.prepare(), Err(LearnerError::InvalidConfig(_))));
    }
}
