//! Incremental classifiers for per-region ensembles.
//!
//! Every learner implements [`Model`]: it is trained one labeled example at
//! a time and answers with a vector of class scores, where an empty vector
//! means "no opinion yet".
//!
//! Learners are produced by a [`ModelFactory`]. A closure returning
//! `Result<Box<dyn Model>, LearnerError>` is a factory, and so is a
//! [`LearnerConfig`], which selects one of the built-in learners from a
//! serde-friendly description:
//!
//! ```
//! use clusens_learner::{LearnerConfig, ModelFactory};
//!
//! let cfg = LearnerConfig::from_json(r#"{"kind": "majority_class"}"#).unwrap();
//! let mut model = cfg.create().unwrap();
//! model.prepare().unwrap();
//! model.train(&[0.0, 1.0], 2);
//! assert_eq!(model.predict(&[0.0, 1.0]), vec![0.0, 0.0, 1.0]);
//! ```

mod error;
mod majority;
mod model;
mod naive_bayes;

pub use error::LearnerError;
pub use majority::MajorityClass;
pub use model::{LearnerConfig, Model, ModelFactory};
pub use naive_bayes::NaiveBayes;
