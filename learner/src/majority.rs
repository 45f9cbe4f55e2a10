use crate::error::LearnerError;
use crate::model::Model;

/// Votes with the class distribution observed so far, ignoring features.
#[derive(Debug, Clone, Default)]
pub struct MajorityClass {
    counts: Vec<f64>,
}

impl MajorityClass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of training examples seen.
    pub fn seen(&self) -> f64 {
        self.counts.iter().sum()
    }
}

impl Model for MajorityClass {
    fn name(&self) -> &str {
        "majority_class"
    }

    fn prepare(&mut self) -> Result<(), LearnerError> {
        self.counts.clear();
        Ok(())
    }

    fn train(&mut self, _features: &[f64], label: usize) {
        if self.counts.len() <= label {
            self.counts.resize(label + 1, 0.0);
        }
        self.counts[label] += 1.0;
    }

    fn predict(&self, _features: &[f64]) -> Vec<f64> {
        self.counts.clone()
    }
}
