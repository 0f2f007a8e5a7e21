//! # Sources
//!
//! A source is an ordered, key-addressable, append-only collection of sketch records.
//! It supports reading everything at once, and subscribing to records appended later.
//! Sources make no promises about duplicates - a subscription may re-deliver records that
//! were already present in a snapshot, and the ingestor filters those.

use crate::{id::SketchKey, sketch::SketchRecord};

/// One stored item.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceEntry {
    pub key: SketchKey,
    pub record: SketchRecord,
}

/// Live feed of appended entries. Closing of the channel means the feed has ended.
pub type Subscription = tokio::sync::mpsc::UnboundedReceiver<SourceEntry>;

#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

#[async_trait::async_trait]
pub trait SketchSource: Send + Sync {
    /// Read every entry currently stored, in key order.
    async fn read_all(&self) -> Result<Vec<SourceEntry>, SourceError>;
    /// Subscribe to entries appended after `after`. `None` means from the beginning.
    async fn subscribe_appended(&self, after: Option<SketchKey>)
        -> Result<Subscription, SourceError>;
}

#[derive(Default)]
struct MemorySourceInner {
    entries: Vec<SourceEntry>,
    subscribers: Vec<tokio::sync::mpsc::UnboundedSender<SourceEntry>>,
    unavailable: bool,
    hung_up: bool,
}

/// A source that keeps entries in-memory. Subscriptions re-deliver *every* stored
/// entry before following new ones, like a child-added feed does.
#[derive(Default)]
pub struct MemorySource {
    inner: parking_lot::Mutex<MemorySourceInner>,
}
impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Append a record, notifying subscribers.
    pub fn push(&self, key: impl Into<SketchKey>, record: SketchRecord) {
        let entry = SourceEntry {
            key: key.into(),
            record,
        };
        let mut inner = self.inner.lock();
        // Drop subscribers that hung up.
        inner
            .subscribers
            .retain(|subscriber| subscriber.send(entry.clone()).is_ok());
        inner.entries.push(entry);
    }
    /// Make every future request fail, as if the transport went away.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.lock().unavailable = unavailable;
    }
    /// Close every live subscription. Later subscriptions end after re-delivering what is stored.
    pub fn hang_up(&self) {
        let mut inner = self.inner.lock();
        inner.hung_up = true;
        inner.subscribers.clear();
    }
}

#[async_trait::async_trait]
impl SketchSource for MemorySource {
    async fn read_all(&self) -> Result<Vec<SourceEntry>, SourceError> {
        let inner = self.inner.lock();
        if inner.unavailable {
            return Err(SourceError::Unavailable("memory source disabled".to_owned()));
        }
        let mut entries = inner.entries.clone();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }
    async fn subscribe_appended(
        &self,
        _after: Option<SketchKey>,
    ) -> Result<Subscription, SourceError> {
        let mut inner = self.inner.lock();
        if inner.unavailable {
            return Err(SourceError::Unavailable("memory source disabled".to_owned()));
        }
        let (send, recv) = tokio::sync::mpsc::unbounded_channel();
        for entry in &inner.entries {
            // Can't fail, we hold the receiver.
            let _ = send.send(entry.clone());
        }
        if !inner.hung_up {
            inner.subscribers.push(send);
        }
        Ok(recv)
    }
}
