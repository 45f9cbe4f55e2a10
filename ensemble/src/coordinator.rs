use std::fmt::Write as _;

use clusens_learner::{LearnerConfig, ModelFactory};
use clusens_stream::{IndexConfig, Item, MicroClusterIndex, StreamingClusterIndex};
use serde::Serialize;
use tracing::debug;

use crate::config::{Config, TrainPolicy};
use crate::error::EnsembleError;
use crate::registry::ModelRegistry;
use crate::router;

/// Counters describing the state of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Measurements {
    /// Training items seen since initialization.
    pub items_seen: u64,
    /// Training items that carried a label.
    pub labeled_seen: u64,
    /// Models currently held by the registry.
    pub active_models: usize,
    pub models_created: u64,
    pub models_retired: u64,
    /// Regions in the snapshot taken by the last training step.
    pub regions: usize,
}

/// Maintains one model per region of a streaming clustering index.
///
/// Training updates the index, lets every qualifying region's model learn
/// from the item and retires models whose regions have disappeared.
/// Prediction routes the item to the first region that covers it and
/// returns that region's model's votes, or an empty vector.
///
/// The index is created lazily by the first [`train`](Self::train) (or by
/// [`init`](Self::init)). Region identities reported by the index must be
/// stable across snapshots; an index that re-derives them from changing
/// state causes models to be retired and rebuilt on every step.
pub struct EnsembleCoordinator<I: StreamingClusterIndex> {
    cfg: Config,
    new_index: Box<dyn Fn() -> I + Send>,
    factory: Box<dyn ModelFactory>,
    index: Option<I>,
    registry: ModelRegistry,
    items_seen: u64,
    labeled_seen: u64,
    last_regions: usize,
}

impl<I: StreamingClusterIndex> EnsembleCoordinator<I> {
    /// Creates an uninitialized coordinator. `new_index` builds a fresh,
    /// empty index; `factory` builds the per-region models.
    pub fn new(
        cfg: Config,
        new_index: impl Fn() -> I + Send + 'static,
        factory: impl ModelFactory + 'static,
    ) -> Self {
        Self {
            cfg,
            new_index: Box::new(new_index),
            factory: Box::new(factory),
            index: None,
            registry: ModelRegistry::new(),
            items_seen: 0,
            labeled_seen: 0,
            last_regions: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn is_initialized(&self) -> bool {
        self.index.is_some()
    }

    /// Creates and prepares the index. No-op if already initialized.
    pub fn init(&mut self) {
        self.index_mut();
    }

    /// Drops the index and every model; the next call to
    /// [`train`](Self::train) starts a new run.
    pub fn reset(&mut self) {
        debug!("ensemble reset");
        self.index = None;
        self.registry = ModelRegistry::new();
        self.items_seen = 0;
        self.labeled_seen = 0;
        self.last_regions = 0;
    }

    fn index_mut(&mut self) -> &mut I {
        if self.index.is_none() {
            debug!(
                train_policy = ?self.cfg.train_policy,
                routing_warmup = self.cfg.routing_warmup,
                "ensemble initialized"
            );
        }
        let new_index = &self.new_index;
        self.index.get_or_insert_with(|| {
            let mut index = new_index();
            index.prepare();
            index
        })
    }

    /// Processes one training item.
    ///
    /// Unlabeled items still update the index and the region bookkeeping.
    /// Fails only when a model cannot be built.
    pub fn train(&mut self, item: &Item) -> Result<(), EnsembleError> {
        let index = self.index_mut();
        index.update(item.clone());
        let snapshot = index.snapshot();

        self.items_seen += 1;
        if item.is_labeled() {
            self.labeled_seen += 1;
        }
        self.last_regions = snapshot.len();

        if snapshot.is_empty() {
            return Ok(());
        }

        let targets: Vec<&str> = match self.cfg.train_policy {
            TrainPolicy::AllMatching => router::qualifying(&snapshot, &item.features),
            TrainPolicy::FirstMatch => router::route(&snapshot, &item.features)
                .into_iter()
                .collect(),
        };
        for region in targets {
            let model = self.registry.get_or_create(region, self.factory.as_ref())?;
            if let Some(label) = item.label {
                model.train(&item.features, label);
            }
        }

        self.registry.retire_missing(&snapshot.ids());
        Ok(())
    }

    /// Returns the votes of the model owning the item's region. Empty when
    /// no region covers the item, the region has no model yet, or routing
    /// is still inside the post-initialization window.
    pub fn predict(&self, item: &Item) -> Vec<f64> {
        let Some(index) = self.index.as_ref() else {
            return Vec::new();
        };
        if self.routing_suppressed() {
            return Vec::new();
        }
        let snapshot = index.snapshot();
        let Some(region) = router::route(&snapshot, &item.features) else {
            return Vec::new();
        };
        match self.registry.get(region) {
            Some(model) => model.predict(&item.features),
            None => Vec::new(),
        }
    }

    fn routing_suppressed(&self) -> bool {
        self.items_seen < self.cfg.routing_warmup
    }

    /// The coordinator makes no random choices of its own.
    pub fn is_randomizable(&self) -> bool {
        false
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn index(&self) -> Option<&I> {
        self.index.as_ref()
    }

    pub fn measurements(&self) -> Measurements {
        Measurements {
            items_seen: self.items_seen,
            labeled_seen: self.labeled_seen,
            active_models: self.registry.len(),
            models_created: self.registry.created(),
            models_retired: self.registry.retired(),
            regions: self.last_regions,
        }
    }

    /// Human-readable summary, each line indented by `indent` spaces.
    pub fn describe(&self, indent: usize) -> String {
        let pad = " ".repeat(indent);
        let policy = match self.cfg.train_policy {
            TrainPolicy::AllMatching => "every covering region",
            TrainPolicy::FirstMatch => "first covering region",
        };
        let mut out = String::new();
        let _ = writeln!(out, "{pad}Clustered ensemble: one model per streaming cluster region.");
        let _ = writeln!(out, "{pad} - trains: {policy}; predicts: first covering region");
        let _ = writeln!(out, "{pad} - routing warmup: {} steps", self.cfg.routing_warmup);
        let _ = writeln!(
            out,
            "{pad} - regions: {}, models: {} (created {}, retired {})",
            self.last_regions,
            self.registry.len(),
            self.registry.created(),
            self.registry.retired()
        );
        out
    }
}

impl EnsembleCoordinator<MicroClusterIndex> {
    /// Coordinator over a [`MicroClusterIndex`] with one of the built-in
    /// learners.
    pub fn with_micro_clusters(cfg: Config, index_cfg: IndexConfig, learner: LearnerConfig) -> Self {
        Self::new(cfg, move || MicroClusterIndex::new(index_cfg.clone()), learner)
    }
}
