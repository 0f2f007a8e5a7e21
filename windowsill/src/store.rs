//! # JSON-lines store
//!
//! An append-only file of sketches, one JSON object per line:
//! `{"key": "12", "points": [..], "penColor": "#fff", "backgroundColor": "#000", "caption": ..}`.
//! Writers append whole lines. A line without its trailing newline is still being written, and is
//! left for a later read.

use std::path::{Path, PathBuf};

use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use windowsill_core::{
    id::SketchKey,
    sketch::SketchRecord,
    source::{SketchSource, SourceEntry, SourceError, Subscription},
};

#[derive(serde::Deserialize)]
struct Line {
    key: SketchKey,
    #[serde(flatten)]
    record: SketchRecord,
}
#[derive(serde::Serialize)]
struct LineRef<'a> {
    key: &'a SketchKey,
    #[serde(flatten)]
    record: &'a SketchRecord,
}

/// Decode every complete line of `bytes`, returning the entries and the number of bytes consumed.
fn decode_complete(bytes: &[u8]) -> (Vec<SourceEntry>, usize) {
    let complete = bytes
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |newline| newline + 1);
    let entries = bytes[..complete]
        .split(|&b| b == b'\n')
        .filter_map(|line| match std::str::from_utf8(line) {
            Ok(line) => Some(line.trim_end_matches('\r')),
            Err(e) => {
                log::warn!("Skipping store line that isn't UTF-8: {e}");
                None
            }
        })
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match serde_json::from_str::<Line>(line) {
            Ok(Line { key, record }) => Some(SourceEntry { key, record }),
            Err(e) => {
                log::warn!("Skipping undecodable store line: {e}");
                None
            }
        })
        .collect();
    (entries, complete)
}

/// Read everything from `offset` onwards. A missing file reads as empty.
async fn read_from(path: &Path, offset: u64) -> Result<Vec<u8>, SourceError> {
    let mut file = match tokio::fs::File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let len = file.metadata().await?.len();
    if len < offset {
        return Err(SourceError::Unavailable(format!(
            "{} shrank from {offset} to {len} bytes",
            path.display()
        )));
    }
    file.seek(std::io::SeekFrom::Start(offset)).await?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).await?;
    Ok(bytes)
}

pub struct JsonLinesStore {
    path: PathBuf,
    poll: std::time::Duration,
}
impl JsonLinesStore {
    /// A store at `path`, checked for new lines every `poll`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, poll: std::time::Duration) -> Self {
        Self {
            path: path.into(),
            poll,
        }
    }
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
    /// Append a record to the end of the store, creating it if needed.
    pub async fn append(&self, key: &SketchKey, record: &SketchRecord) -> Result<(), SourceError> {
        let mut line =
            serde_json::to_string(&LineRef { key, record }).map_err(std::io::Error::from)?;
        line.push('\n');
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl SketchSource for JsonLinesStore {
    async fn read_all(&self) -> Result<Vec<SourceEntry>, SourceError> {
        let bytes = read_from(&self.path, 0).await?;
        if bytes.is_empty() {
            log::info!("Store {} is empty", self.path.display());
        }
        let (mut entries, _) = decode_complete(&bytes);
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }
    async fn subscribe_appended(
        &self,
        after: Option<SketchKey>,
    ) -> Result<Subscription, SourceError> {
        let (send, recv) = tokio::sync::mpsc::unbounded_channel();
        let path = self.path.clone();
        let mut interval = tokio::time::interval(self.poll);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        tokio::spawn(async move {
            let mut offset = 0u64;
            loop {
                interval.tick().await;
                if send.is_closed() {
                    return;
                }
                let bytes = match read_from(&path, offset).await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        // Dropping the sender ends the feed.
                        log::error!("Stopped watching {}: {e}", path.display());
                        return;
                    }
                };
                let (entries, consumed) = decode_complete(&bytes);
                offset += consumed as u64;
                for entry in entries {
                    if after.as_ref().is_some_and(|after| entry.key <= *after) {
                        continue;
                    }
                    if send.send(entry).is_err() {
                        return;
                    }
                }
            }
        });
        Ok(recv)
    }
}
