//! # Ingestion
//!
//! Reads the historical snapshot once, then follows the live feed for the lifetime of the process,
//! appending every acceptable record to the [`SharedPool`].
//!
//! Transport failures are not retried here, they end ingestion and are reported to the caller.
//! Malformed records are reported and skipped without disturbing the stream.

use crate::{
    id::SketchKey,
    pool::{Arrival, SharedPool},
    sketch::Sketch,
    source::{SketchSource, SourceEntry, SourceError},
};

#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    #[error("reading historical sketches failed: {0}")]
    Historical(#[source] SourceError),
    #[error("subscribing to new sketches failed: {0}")]
    Subscribe(#[source] SourceError),
    #[error("live sketch feed closed")]
    FeedClosed,
}

/// Outcome of loading the historical snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub accepted: usize,
    pub rejected: usize,
    /// Greatest key seen in the snapshot, accepted or not.
    pub last_key: Option<SketchKey>,
}

/// What happened to a single record.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Accepted {
    Pooled,
    Duplicate,
    Malformed,
}

pub struct Ingestor<S> {
    source: S,
    pool: SharedPool,
}
impl<S: SketchSource> Ingestor<S> {
    pub fn new(source: S, pool: SharedPool) -> Self {
        Self { source, pool }
    }
    #[must_use]
    pub fn pool(&self) -> &SharedPool {
        &self.pool
    }
    /// Load the full snapshot, recording the last key seen.
    pub async fn load_historical(&self) -> Result<Snapshot, IngestError> {
        let entries = self
            .source
            .read_all()
            .await
            .map_err(IngestError::Historical)?;
        let mut snapshot = Snapshot::default();
        for entry in entries {
            if snapshot.last_key.as_ref().map_or(true, |last| entry.key > *last) {
                snapshot.last_key = Some(entry.key.clone());
            }
            match self.accept(entry, Arrival::Historical) {
                Accepted::Pooled => snapshot.accepted += 1,
                Accepted::Malformed => snapshot.rejected += 1,
                Accepted::Duplicate => (),
            }
        }
        log::info!(
            "Loaded {} historical sketches ({} rejected)",
            snapshot.accepted,
            snapshot.rejected
        );
        Ok(snapshot)
    }
    /// Follow the feed of appended records. Anything keyed at or before `after` is a re-delivery
    /// of the snapshot, and is dropped.
    ///
    /// Only returns on failure - the feed is unbounded.
    pub async fn follow(&self, after: Option<SketchKey>) -> Result<(), IngestError> {
        let mut feed = self
            .source
            .subscribe_appended(after.clone())
            .await
            .map_err(IngestError::Subscribe)?;
        while let Some(entry) = feed.recv().await {
            if after.as_ref().is_some_and(|after| entry.key <= *after) {
                log::trace!("Skipping re-delivered {}", entry.key);
                continue;
            }
            self.accept(entry, Arrival::Live);
        }
        Err(IngestError::FeedClosed)
    }
    /// Load the snapshot, then follow the feed forever.
    pub async fn run(&self) -> Result<(), IngestError> {
        let snapshot = self.load_historical().await?;
        self.follow(snapshot.last_key).await
    }
    fn accept(&self, entry: SourceEntry, arrival: Arrival) -> Accepted {
        let SourceEntry { key, record } = entry;
        let sketch = match Sketch::from_record(key.clone(), record) {
            Ok(sketch) => sketch,
            Err(e) => {
                log::warn!("Rejected malformed {key}: {e}");
                return Accepted::Malformed;
            }
        };
        let vertices = sketch.vertex_count();
        match self.pool.insert(sketch, arrival) {
            Ok(()) => {
                log::debug!(
                    "Pooled {} {key} with {vertices} vertices",
                    arrival.as_ref()
                );
                Accepted::Pooled
            }
            Err(e) => {
                log::trace!("{e}");
                Accepted::Duplicate
            }
        }
    }
}
