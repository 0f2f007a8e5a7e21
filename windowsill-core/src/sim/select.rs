//! Choosing which sketch to show next.

use std::{collections::VecDeque, sync::Arc};

use crate::{
    pool::{Arrival, SketchPool},
    sketch::Sketch,
};

#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPolicy {
    /// Uniformly random among every displayable sketch currently pooled.
    #[default]
    Uniform,
    /// Live arrivals that haven't been shown yet go first, oldest first.
    /// Falls back to [`Self::Uniform`].
    Spotlight,
}

#[derive(Clone, Debug, Default)]
pub struct Selector {
    policy: SelectionPolicy,
    /// Arrival index up to which the pool has been scanned for live sketches.
    scanned: usize,
    spotlight: VecDeque<Arc<Sketch>>,
}
impl Selector {
    #[must_use]
    pub fn new(policy: SelectionPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }
    /// Pick the next sketch, or `None` if nothing displayable is pooled.
    pub fn select<R: rand::Rng + ?Sized>(
        &mut self,
        pool: &SketchPool,
        rng: &mut R,
    ) -> Option<Arc<Sketch>> {
        if self.policy == SelectionPolicy::Spotlight {
            self.scan(pool);
            if let Some(sketch) = self.spotlight.pop_front() {
                log::debug!("Spotlighting newly arrived {}", sketch.key());
                return Some(sketch);
            }
        }
        let len = pool.displayable_len();
        if len == 0 {
            return None;
        }
        pool.displayable(rng.gen_range(0..len)).cloned()
    }
    fn scan(&mut self, pool: &SketchPool) {
        let fresh = pool
            .entries_since(self.scanned)
            .iter()
            .filter(|entry| entry.arrival == Arrival::Live && entry.sketch.is_displayable())
            .map(|entry| entry.sketch.clone());
        self.spotlight.extend(fresh);
        self.scanned = pool.len();
    }
}
