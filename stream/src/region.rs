use std::collections::HashSet;

use crate::item::Item;

/// A transient region of the input space reported by a clustering index.
pub trait Region {
    /// Identifier assigned by the index. Must stay the same for as long as
    /// the index considers this the same region.
    fn id(&self) -> &str;

    /// How strongly `features` belongs to this region. Never negative;
    /// 0 means the region does not cover the point.
    fn inclusion_degree(&self, features: &[f64]) -> f64;
}

/// Regions known to an index at one instant, in the index's enumeration
/// order. An index with no regions yet produces an empty snapshot.
#[derive(Debug, Clone)]
pub struct Snapshot<R> {
    regions: Vec<R>,
}

impl<R> Snapshot<R> {
    pub fn new(regions: Vec<R>) -> Self {
        Self { regions }
    }

    pub fn empty() -> Self {
        Self {
            regions: Vec::new(),
        }
    }

    pub fn regions(&self) -> &[R] {
        &self.regions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl<R: Region> Snapshot<R> {
    /// Returns the set of region identifiers in this snapshot.
    pub fn ids(&self) -> HashSet<&str> {
        self.regions.iter().map(|r| r.id()).collect()
    }
}

impl<R> Default for Snapshot<R> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<R> From<Vec<R>> for Snapshot<R> {
    fn from(regions: Vec<R>) -> Self {
        Self::new(regions)
    }
}

impl<'a, R> IntoIterator for &'a Snapshot<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}

/// Incrementally maintained clustering over a stream of items.
///
/// Implementations are driven from a single thread, one item at a time.
pub trait StreamingClusterIndex: Send {
    type Region: Region;

    /// Prepares a freshly constructed index for use.
    fn prepare(&mut self) {}

    /// Incorporates one item. Must be safe to call before any region exists.
    fn update(&mut self, item: Item);

    /// Returns the current regions. Empty until the index has formed one.
    fn snapshot(&self) -> Snapshot<Self::Region>;
}
