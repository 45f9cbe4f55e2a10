use std::f64::consts::PI;

use crate::error::LearnerError;
use crate::model::Model;

/// Running mean and variance of one attribute (Welford).
#[derive(Debug, Clone, Default)]
struct Gaussian {
    n: f64,
    mean: f64,
    m2: f64,
}

impl Gaussian {
    fn push(&mut self, x: f64) {
        self.n += 1.0;
        let delta = x - self.mean;
        self.mean += delta / self.n;
        self.m2 += delta * (x - self.mean);
    }

    fn variance(&self) -> f64 {
        if self.n > 1.0 {
            self.m2 / (self.n - 1.0)
        } else {
            0.0
        }
    }

    fn log_density(&self, x: f64, min_variance: f64) -> f64 {
        let var = self.variance().max(min_variance);
        let d = x - self.mean;
        -0.5 * (2.0 * PI * var).ln() - d * d / (2.0 * var)
    }
}

#[derive(Debug, Clone, Default)]
struct ClassStats {
    count: f64,
    attrs: Vec<Gaussian>,
}

/// Gaussian naive Bayes, trained one example at a time.
///
/// Classes are discovered from training labels. [`Model::predict`] returns
/// posterior probabilities indexed by class; classes never seen score 0.
#[derive(Debug, Clone)]
pub struct NaiveBayes {
    min_variance: f64,
    classes: Vec<ClassStats>,
    total: f64,
}

impl NaiveBayes {
    pub const DEFAULT_MIN_VARIANCE: f64 = 1e-6;

    pub fn new(min_variance: f64) -> Self {
        Self {
            min_variance,
            classes: Vec::new(),
            total: 0.0,
        }
    }

    /// Number of training examples seen.
    pub fn seen(&self) -> f64 {
        self.total
    }
}

impl Default for NaiveBayes {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_VARIANCE)
    }
}

impl Model for NaiveBayes {
    fn name(&self) -> &str {
        "naive_bayes"
    }

    fn prepare(&mut self) -> Result<(), LearnerError> {
        if !(self.min_variance.is_finite() && self.min_variance > 0.0) {
            return Err(LearnerError::InvalidConfig(format!(
                "min_variance must be positive, got {}",
                self.min_variance
            )));
        }
        self.classes.clear();
        self.total = 0.0;
        Ok(())
    }

    fn train(&mut self, features: &[f64], label: usize) {
        if self.classes.len() <= label {
            self.classes.resize_with(label + 1, ClassStats::default);
        }
        let stats = &mut self.classes[label];
        if stats.attrs.len() < features.len() {
            stats.attrs.resize_with(features.len(), Gaussian::default);
        }
        for (g, &x) in stats.attrs.iter_mut().zip(features) {
            g.push(x);
        }
        stats.count += 1.0;
        self.total += 1.0;
    }

    fn predict(&self, features: &[f64]) -> Vec<f64> {
        if self.total == 0.0 {
            return Vec::new();
        }

        let log_scores: Vec<Option<f64>> = self
            .classes
            .iter()
            .map(|c| {
                if c.count == 0.0 {
                    return None;
                }
                let prior = (c.count / self.total).ln();
                let likelihood: f64 = c
                    .attrs
                    .iter()
                    .zip(features)
                    .map(|(g, &x)| g.log_density(x, self.min_variance))
                    .sum();
                Some(prior + likelihood)
            })
            .collect();

        let max = log_scores
            .iter()
            .flatten()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);

        let mut votes: Vec<f64> = log_scores
            .iter()
            .map(|s| s.map_or(0.0, |s| (s - max).exp()))
            .collect();
        let sum: f64 = votes.iter().sum();
        if sum > 0.0 {
            for v in votes.iter_mut() {
                *v /= sum;
            }
        }
        votes
    }
}
