use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use clusens_learner::{Model, ModelFactory};
use tracing::debug;

use crate::error::EnsembleError;

/// Owns one model per live region identity.
#[derive(Default)]
pub struct ModelRegistry {
    models: HashMap<String, Box<dyn Model>>,
    created: u64,
    retired: u64,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the model for `region`, building and preparing one with
    /// `factory` if the region has none yet.
    ///
    /// A factory or prepare failure is returned as
    /// [`EnsembleError::ModelConstruction`] and nothing is inserted.
    pub fn get_or_create(
        &mut self,
        region: &str,
        factory: &dyn ModelFactory,
    ) -> Result<&mut dyn Model, EnsembleError> {
        let model = match self.models.entry(region.to_string()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                let model = build(region, factory)?;
                debug!(region = %region, learner = model.name(), "created model");
                self.created += 1;
                e.insert(model)
            }
        };
        Ok(&mut **model)
    }

    /// Looks up the model for `region` without creating one.
    pub fn get(&self, region: &str) -> Option<&dyn Model> {
        match self.models.get(region) {
            Some(model) => Some(&**model),
            None => None,
        }
    }

    pub fn contains(&self, region: &str) -> bool {
        self.models.contains_key(region)
    }

    /// Removes every model whose region is not in `live` and returns the
    /// retired identities, sorted. An empty `live` set removes nothing.
    pub fn retire_missing(&mut self, live: &HashSet<&str>) -> Vec<String> {
        if live.is_empty() {
            return Vec::new();
        }
        let mut retired: Vec<String> = self
            .models
            .keys()
            .filter(|id| !live.contains(id.as_str()))
            .cloned()
            .collect();
        retired.sort();
        for id in &retired {
            self.models.remove(id);
            debug!(region = %id, "retired model");
        }
        self.retired += retired.len() as u64;
        retired
    }

    /// Returns the identities that currently own a model, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.models.keys().map(|k| k.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Total number of models built since construction.
    pub fn created(&self) -> u64 {
        self.created
    }

    /// Total number of models retired since construction.
    pub fn retired(&self) -> u64 {
        self.retired
    }
}

fn build(region: &str, factory: &dyn ModelFactory) -> Result<Box<dyn Model>, EnsembleError> {
    let construction = |source| EnsembleError::ModelConstruction {
        region: region.to_string(),
        source,
    };
    let mut model = factory.create().map_err(construction)?;
    model.prepare().map_err(construction)?;
    Ok(model)
}
