//! # Sketch pool
//!
//! The pool is the ground truth of which sketches are known to the installation. It only grows:
//! entries are appended in arrival order, deduplicated by key, and never removed or mutated.
//! The ingestor owns writing, the simulator only ever reads.

use std::sync::Arc;

use crate::{id::SketchKey, sketch::Sketch};

/// How a sketch reached the pool.
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::AsRefStr)]
pub enum Arrival {
    /// Part of the snapshot read at startup.
    Historical,
    /// Pushed by the live feed after startup.
    Live,
}

#[derive(Clone, Debug)]
pub struct PoolEntry {
    pub sketch: Arc<Sketch>,
    pub arrival: Arrival,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0} is already pooled")]
pub struct DuplicateKey(pub SketchKey);

#[derive(Default)]
pub struct SketchPool {
    entries: Vec<PoolEntry>,
    by_key: hashbrown::HashMap<SketchKey, usize>,
    /// Indices into `entries` of sketches that draw something.
    displayable: Vec<usize>,
}
impl SketchPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Append a sketch. If one with this key exists already, the pool is left untouched.
    pub fn insert(&mut self, sketch: Sketch, arrival: Arrival) -> Result<(), DuplicateKey> {
        match self.by_key.entry(sketch.key().clone()) {
            hashbrown::hash_map::Entry::Occupied(o) => Err(DuplicateKey(o.key().clone())),
            hashbrown::hash_map::Entry::Vacant(v) => {
                let index = self.entries.len();
                v.insert(index);
                if sketch.is_displayable() {
                    self.displayable.push(index);
                }
                self.entries.push(PoolEntry {
                    sketch: Arc::new(sketch),
                    arrival,
                });
                Ok(())
            }
        }
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    #[must_use]
    pub fn contains(&self, key: &SketchKey) -> bool {
        self.by_key.contains_key(key)
    }
    #[must_use]
    pub fn get(&self, key: &SketchKey) -> Option<&Arc<Sketch>> {
        self.by_key.get(key).map(|&idx| &self.entries[idx].sketch)
    }
    /// Entries in arrival order.
    pub fn entries(&self) -> &[PoolEntry] {
        &self.entries
    }
    /// Entries in arrival order, starting from an arrival index. Out-of-bounds starts are empty.
    pub fn entries_since(&self, start: usize) -> &[PoolEntry] {
        self.entries.get(start..).unwrap_or(&[])
    }
    /// Number of sketches eligible for display.
    #[must_use]
    pub fn displayable_len(&self) -> usize {
        self.displayable.len()
    }
    /// The `nth` displayable sketch, in arrival order.
    #[must_use]
    pub fn displayable(&self, nth: usize) -> Option<&Arc<Sketch>> {
        self.displayable
            .get(nth)
            .map(|&idx| &self.entries[idx].sketch)
    }
}

/// A pool shared between the ingestor and the simulator.
/// Writes are exclusive appends, reads may be shared.
#[derive(Clone, Default)]
pub struct SharedPool(Arc<parking_lot::RwLock<SketchPool>>);
impl SharedPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    pub fn read(&self) -> parking_lot::RwLockReadGuard<'_, SketchPool> {
        self.0.read()
    }
    pub fn insert(&self, sketch: Sketch, arrival: Arrival) -> Result<(), DuplicateKey> {
        self.0.write().insert(sketch, arrival)
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.read().len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }
}
