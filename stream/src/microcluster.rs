use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::distance::euclidean;
use crate::error::StreamError;
use crate::item::Item;
use crate::region::{Region, Snapshot, StreamingClusterIndex};

/// Controls micro-clustering behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// An item is absorbed by the nearest micro-cluster whose center is
    /// within this distance; otherwise it starts a new one.
    /// Default: 1.0.
    pub max_radius: f64,

    /// Lower bound of a micro-cluster's inclusion radius, so that clusters
    /// with a single point still cover a neighborhood.
    /// Default: 0.5.
    pub min_radius: f64,

    /// Inclusion radius as a multiple of the RMS deviation.
    /// Default: 2.0.
    pub radius_factor: f64,

    /// Fading rate λ. Every update multiplies all weights by 2^-λ.
    /// 0 disables fading. Default: 0.0.
    pub decay: f64,

    /// Micro-clusters whose weight falls below this are dropped.
    /// Default: 0.0 (never).
    pub min_weight: f64,

    /// Upper bound on the number of micro-clusters. The closest pair is
    /// merged while the bound is exceeded.
    /// Default: 100.
    pub max_clusters: usize,

    /// Prepended to generated IDs (e.g. "region" -> "region:001").
    pub prefix: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_radius: 1.0,
            min_radius: 0.5,
            radius_factor: 2.0,
            decay: 0.0,
            min_weight: 0.0,
            max_clusters: 100,
            prefix: "region".into(),
        }
    }
}

impl IndexConfig {
    /// Parses a JSON config. Missing fields take their defaults.
    pub fn from_json(s: &str) -> Result<Self, StreamError> {
        let cfg: IndexConfig = serde_json::from_str(s)?;
        Ok(cfg.with_defaults())
    }

    fn with_defaults(mut self) -> Self {
        if self.max_radius <= 0.0 {
            self.max_radius = 1.0;
        }
        if self.radius_factor <= 0.0 {
            self.radius_factor = 2.0;
        }
        if self.min_radius < 0.0 {
            self.min_radius = 0.0;
        }
        if self.min_radius > self.max_radius {
            self.min_radius = self.max_radius;
        }
        if self.decay < 0.0 {
            self.decay = 0.0;
        }
        if self.max_clusters == 0 {
            self.max_clusters = 100;
        }
        self
    }
}

/// A weighted summary of nearby stream items.
///
/// Keeps the cluster feature (weight, linear sum, squared sum) so that
/// absorbing, fading and merging are all O(dim).
#[derive(Clone)]
pub struct MicroCluster {
    id: String,
    weight: f64,
    linear_sum: Vec<f64>,
    squared_sum: Vec<f64>,
    created_at: u64,
    min_radius: f64,
    max_radius: f64,
    radius_factor: f64,
}

impl fmt::Debug for MicroCluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MicroCluster")
            .field("id", &self.id)
            .field("weight", &self.weight)
            .field("created_at", &self.created_at)
            .field("dim", &self.linear_sum.len())
            .finish()
    }
}

impl MicroCluster {
    fn seed(id: String, features: &[f64], step: u64, cfg: &IndexConfig) -> Self {
        Self {
            id,
            weight: 1.0,
            linear_sum: features.to_vec(),
            squared_sum: features.iter().map(|x| x * x).collect(),
            created_at: step,
            min_radius: cfg.min_radius,
            max_radius: cfg.max_radius,
            radius_factor: cfg.radius_factor,
        }
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Index step at which this micro-cluster was created.
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Weighted mean of the absorbed items.
    pub fn center(&self) -> Vec<f64> {
        if self.weight <= 0.0 {
            return vec![0.0; self.linear_sum.len()];
        }
        self.linear_sum.iter().map(|s| s / self.weight).collect()
    }

    /// Root mean square deviation of the absorbed items from the center.
    pub fn deviation(&self) -> f64 {
        let dim = self.linear_sum.len();
        if dim == 0 || self.weight <= 0.0 {
            return 0.0;
        }
        let mut total = 0.0;
        for (ls, ss) in self.linear_sum.iter().zip(self.squared_sum.iter()) {
            let mean = ls / self.weight;
            let var = ss / self.weight - mean * mean;
            // Rounding can push a zero variance slightly negative.
            if var > 0.0 {
                total += var;
            }
        }
        (total / dim as f64).sqrt()
    }

    /// Radius inside which an item counts as included.
    pub fn radius(&self) -> f64 {
        (self.radius_factor * self.deviation())
            .max(self.min_radius)
            .min(self.max_radius)
    }

    fn absorb(&mut self, features: &[f64]) {
        self.weight += 1.0;
        for (i, x) in features.iter().enumerate() {
            self.linear_sum[i] += x;
            self.squared_sum[i] += x * x;
        }
    }

    fn fade(&mut self, factor: f64) {
        self.weight *= factor;
        for v in self.linear_sum.iter_mut() {
            *v *= factor;
        }
        for v in self.squared_sum.iter_mut() {
            *v *= factor;
        }
    }

    fn merge(&mut self, other: &MicroCluster) {
        self.weight += other.weight;
        for (a, b) in self.linear_sum.iter_mut().zip(other.linear_sum.iter()) {
            *a += b;
        }
        for (a, b) in self.squared_sum.iter_mut().zip(other.squared_sum.iter()) {
            *a += b;
        }
    }
}

impl Region for MicroCluster {
    fn id(&self) -> &str {
        &self.id
    }

    fn inclusion_degree(&self, features: &[f64]) -> f64 {
        if features.len() != self.linear_sum.len() {
            return 0.0;
        }
        if euclidean(features, &self.center()) <= self.radius() {
            1.0
        } else {
            0.0
        }
    }
}

/// Online micro-clustering index with stable region IDs.
///
/// Each micro-cluster receives an ID once, at creation, and keeps it while
/// it absorbs items, fades and swallows merged neighbors. When two
/// micro-clusters merge, the older one's ID survives.
pub struct MicroClusterIndex {
    cfg: IndexConfig,
    clusters: Vec<MicroCluster>,
    next_id: usize,
    dim: Option<usize>,
    step: u64,
}

impl MicroClusterIndex {
    pub fn new(cfg: IndexConfig) -> Self {
        Self {
            cfg: cfg.with_defaults(),
            clusters: Vec::new(),
            next_id: 0,
            dim: None,
            step: 0,
        }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.cfg
    }

    /// Returns all current micro-clusters in creation order.
    pub fn clusters(&self) -> &[MicroCluster] {
        &self.clusters
    }

    /// Returns the micro-cluster with the given ID, or None if not found.
    pub fn cluster_of(&self, id: &str) -> Option<&MicroCluster> {
        self.clusters.iter().find(|c| c.id == id)
    }

    /// Returns the number of micro-clusters.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Number of items absorbed so far.
    pub fn steps(&self) -> u64 {
        self.step
    }

    /// Clears all micro-clusters and restarts ID assignment.
    pub fn reset(&mut self) {
        self.clusters.clear();
        self.next_id = 0;
        self.dim = None;
        self.step = 0;
    }

    fn new_id(&mut self) -> String {
        self.next_id += 1;
        if self.cfg.prefix.is_empty() {
            format!("{:03}", self.next_id)
        } else {
            format!("{}:{:03}", self.cfg.prefix, self.next_id)
        }
    }

    fn nearest(&self, features: &[f64]) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (i, c) in self.clusters.iter().enumerate() {
            let d = euclidean(features, &c.center());
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }
        best
    }

    fn prune(&mut self) {
        let min_weight = self.cfg.min_weight;
        if min_weight <= 0.0 {
            return;
        }
        self.clusters.retain(|c| {
            let keep = c.weight >= min_weight;
            if !keep {
                trace!(id = %c.id, weight = c.weight, "pruned micro-cluster");
            }
            keep
        });
    }

    fn merge_closest(&mut self) {
        while self.clusters.len() > self.cfg.max_clusters {
            let mut best: Option<(usize, usize, f64)> = None;
            let centers: Vec<Vec<f64>> = self.clusters.iter().map(|c| c.center()).collect();
            for i in 0..centers.len() {
                for j in (i + 1)..centers.len() {
                    let d = euclidean(&centers[i], &centers[j]);
                    if best.is_none_or(|(_, _, bd)| d < bd) {
                        best = Some((i, j, d));
                    }
                }
            }
            let Some((i, j, _)) = best else {
                return;
            };
            // Clusters stay in creation order, so i is the older one.
            let absorbed = self.clusters.remove(j);
            trace!(into = %self.clusters[i].id, from = %absorbed.id, "merged micro-clusters");
            self.clusters[i].merge(&absorbed);
        }
    }
}

impl Default for MicroClusterIndex {
    fn default() -> Self {
        Self::new(IndexConfig::default())
    }
}

impl StreamingClusterIndex for MicroClusterIndex {
    type Region = MicroCluster;

    fn prepare(&mut self) {
        self.reset();
    }

    fn update(&mut self, item: Item) {
        let features = item.features;
        if features.is_empty() {
            warn!("ignoring item with no features");
            return;
        }
        match self.dim {
            Some(dim) if dim != features.len() => {
                warn!(expected = dim, got = features.len(), "ignoring item with mismatched dimension");
                return;
            }
            Some(_) => {}
            None => self.dim = Some(features.len()),
        }

        self.step += 1;

        if self.cfg.decay > 0.0 {
            let factor = (-self.cfg.decay).exp2();
            for c in self.clusters.iter_mut() {
                c.fade(factor);
            }
        }

        match self.nearest(&features) {
            Some((idx, d)) if d <= self.cfg.max_radius => {
                self.clusters[idx].absorb(&features);
            }
            _ => {
                let id = self.new_id();
                trace!(id = %id, step = self.step, "created micro-cluster");
                let cluster = MicroCluster::seed(id, &features, self.step, &self.cfg);
                self.clusters.push(cluster);
            }
        }

        self.prune();
        self.merge_closest();
    }

    fn snapshot(&self) -> Snapshot<MicroCluster> {
        Snapshot::new(self.clusters.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(max_radius: f64) -> MicroClusterIndex {
        MicroClusterIndex::new(IndexConfig {
            max_radius,
            min_radius: max_radius / 2.0,
            prefix: "mc".into(),
            ..IndexConfig::default()
        })
    }

    #[test]
    fn empty_before_first_item() {
        let idx = index(1.0);
        assert!(idx.is_empty());
        assert!(idx.snapshot().is_empty());
    }

    #[test]
    fn nearby_items_share_cluster() {
        let mut idx = index(1.0);
        idx.update(Item::unlabeled(vec![0.0, 0.0]));
        idx.update(Item::unlabeled(vec![0.2, 0.0]));
        idx.update(Item::unlabeled(vec![0.0, 0.2]));
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.clusters()[0].weight(), 3.0);
        assert_eq!(idx.clusters()[0].id(), "mc:001");
    }

    #[test]
    fn distant_item_starts_cluster() {
        let mut idx = index(1.0);
        idx.update(Item::unlabeled(vec![0.0, 0.0]));
        idx.update(Item::unlabeled(vec![5.0, 5.0]));
        let ids: Vec<&str> = idx.clusters().iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["mc:001", "mc:002"]);
    }

    #[test]
    fn ids_are_stable_while_absorbing() {
        let mut idx = index(1.0);
        idx.update(Item::unlabeled(vec![0.0]));
        let first = idx.clusters()[0].id().to_string();
        for i in 1..20 {
            idx.update(Item::unlabeled(vec![(i % 3) as f64 * 0.1]));
        }
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.clusters()[0].id(), first);
    }

    #[test]
    fn inclusion_degree_inside_and_outside() {
        let mut idx = index(1.0);
        idx.update(Item::unlabeled(vec![0.0, 0.0]));
        let c = &idx.clusters()[0];
        // Single point: radius is min_radius = 0.5.
        assert_eq!(c.radius(), 0.5);
        assert_eq!(c.inclusion_degree(&[0.3, 0.0]), 1.0);
        assert_eq!(c.inclusion_degree(&[0.6, 0.0]), 0.0);
        assert_eq!(c.inclusion_degree(&[0.0]), 0.0, "wrong dimension is never included");
    }

    #[test]
    fn mismatched_dimension_is_ignored() {
        let mut idx = index(1.0);
        idx.update(Item::unlabeled(vec![0.0, 0.0]));
        idx.update(Item::unlabeled(vec![0.0, 0.0, 0.0]));
        idx.update(Item::unlabeled(vec![]));
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.steps(), 1);
    }

    #[test]
    fn fading_prunes_stale_clusters() {
        let mut idx = MicroClusterIndex::new(IndexConfig {
            max_radius: 1.0,
            decay: 1.0,
            min_weight: 0.3,
            ..IndexConfig::default()
        });
        idx.update(Item::unlabeled(vec![0.0]));
        let stale = idx.clusters()[0].id().to_string();
        // Weight of the stale cluster halves per update: 0.5, 0.25 -> pruned.
        idx.update(Item::unlabeled(vec![10.0]));
        assert!(idx.cluster_of(&stale).is_some());
        idx.update(Item::unlabeled(vec![10.0]));
        assert!(idx.cluster_of(&stale).is_none());
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn overflow_merges_closest_pair_keeping_older_id() {
        let mut idx = MicroClusterIndex::new(IndexConfig {
            max_radius: 0.5,
            min_radius: 0.5,
            max_clusters: 2,
            prefix: "r".into(),
            ..IndexConfig::default()
        });
        idx.update(Item::unlabeled(vec![0.0]));
        idx.update(Item::unlabeled(vec![10.0]));
        idx.update(Item::unlabeled(vec![11.0]));
        let ids: Vec<&str> = idx.clusters().iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["r:001", "r:002"]);
        let merged = idx.cluster_of("r:002").unwrap();
        assert_eq!(merged.weight(), 2.0);
        assert_eq!(merged.center(), vec![10.5]);
    }

    #[test]
    fn reset_restarts_ids() {
        let mut idx = index(1.0);
        idx.update(Item::unlabeled(vec![0.0]));
        idx.update(Item::unlabeled(vec![9.0]));
        idx.reset();
        assert!(idx.is_empty());
        idx.update(Item::unlabeled(vec![0.0, 1.0]));
        assert_eq!(idx.clusters()[0].id(), "mc:001");
    }

    #[test]
    fn empty_prefix_id_format() {
        let mut idx = MicroClusterIndex::new(IndexConfig {
            prefix: String::new(),
            ..IndexConfig::default()
        });
        idx.update(Item::unlabeled(vec![0.0]));
        assert_eq!(idx.clusters()[0].id(), "001");
    }

    #[test]
    fn config_from_json_fills_defaults() {
        let cfg = IndexConfig::from_json(r#"{"max_radius": 2.0, "max_clusters": 0}"#).unwrap();
        assert_eq!(cfg.max_radius, 2.0);
        assert_eq!(cfg.max_clusters, 100);
        assert_eq!(cfg.min_radius, 0.5);
        assert_eq!(cfg.prefix, "region");
    }

    #[test]
    fn config_from_json_rejects_garbage() {
        assert!(IndexConfig::from_json("{not json").is_err());
    }
}
