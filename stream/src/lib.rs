//! Stream items, region snapshots and online micro-clustering.
//!
//! A [`StreamingClusterIndex`] ingests [`Item`]s one at a time and exposes
//! its current regions as a [`Snapshot`]. Each region can tell how strongly
//! a feature vector belongs to it ([`Region::inclusion_degree`]).
//!
//! # Usage
//!
//! ```
//! use clusens_stream::{IndexConfig, Item, MicroClusterIndex, Region, StreamingClusterIndex};
//!
//! let mut index = MicroClusterIndex::new(IndexConfig {
//!     max_radius: 1.0,
//!     ..IndexConfig::default()
//! });
//!
//! index.update(Item::unlabeled(vec![0.0, 0.0]));
//! index.update(Item::unlabeled(vec![0.1, 0.0]));
//!
//! let snapshot = index.snapshot();
//! assert_eq!(snapshot.len(), 1);
//! assert!(snapshot.regions()[0].inclusion_degree(&[0.05, 0.0]) > 0.0);
//! ```
//!
//! # Identity
//!
//! Consumers key long-lived state on [`Region::id`], so implementations must
//! assign an identifier once per region and keep it across absorb, decay and
//! merge. Deriving the id from mutable cluster state makes every update look
//! like a new region.

mod distance;
mod error;
mod item;
mod microcluster;
mod region;

pub use distance::{euclidean, squared_euclidean};
pub use error::StreamError;
pub use item::Item;
pub use microcluster::{IndexConfig, MicroCluster, MicroClusterIndex};
pub use region::{Region, Snapshot, StreamingClusterIndex};
