//! Online classification ensemble with one model per clustering region.
//!
//! An [`EnsembleCoordinator`] owns a [`StreamingClusterIndex`] and a
//! [`ModelRegistry`]. Each training item updates the index; every region of
//! the resulting snapshot that covers the item gets a model (built lazily by
//! a [`ModelFactory`]) and, if the item is labeled, trains it. Models of
//! regions missing from the snapshot are retired. Prediction [`route`]s the
//! item to the first covering region and returns that model's votes.
//!
//! # Usage
//!
//! ```
//! use clusens_ensemble::{Config, EnsembleCoordinator};
//! use clusens_learner::LearnerConfig;
//! use clusens_stream::{IndexConfig, Item};
//!
//! let mut ens = EnsembleCoordinator::with_micro_clusters(
//!     Config::default(),
//!     IndexConfig::default(),
//!     LearnerConfig::MajorityClass,
//! );
//!
//! // Nothing learned yet: no opinion.
//! assert!(ens.predict(&Item::unlabeled(vec![0.0, 0.0])).is_empty());
//!
//! ens.train(&Item::labeled(vec![0.0, 0.0], 1)).unwrap();
//! ens.train(&Item::labeled(vec![0.1, 0.0], 1)).unwrap();
//! assert_eq!(ens.predict(&Item::unlabeled(vec![0.05, 0.0])), vec![0.0, 2.0]);
//! ```
//!
//! # Training vs. prediction
//!
//! Training reaches every covering region ([`TrainPolicy::AllMatching`]),
//! prediction asks only the first. Overlapping regions therefore all learn
//! from an item but only one answers for it. [`TrainPolicy::FirstMatch`]
//! makes both paths use the same region.
//!
//! [`StreamingClusterIndex`]: clusens_stream::StreamingClusterIndex
//! [`ModelFactory`]: clusens_learner::ModelFactory

mod config;
mod coordinator;
mod error;
mod registry;
mod router;

pub use config::{Config, TrainPolicy};
pub use coordinator::{EnsembleCoordinator, Measurements};
pub use error::EnsembleError;
pub use registry::ModelRegistry;
pub use router::{qualifying, route};
