//! Bounded in-memory reading log with autosave.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use contracts::{Channel, HistoryConfig, Reading, TelemetryError};

use crate::persist;

/// Append-only reading log, capped at `max_len` entries.
///
/// On overflow the oldest half is dropped in one step, so append stays
/// amortized O(1) instead of shifting the whole buffer every sample.
/// Every `autosave_every` appends the full log is rewritten to the
/// configured CSV file, best-effort.
#[derive(Debug)]
pub struct HistoryStore {
    readings: Vec<Reading>,
    config: HistoryConfig,
    pending_since_save: usize,
}

impl HistoryStore {
    /// Create an empty store (ignores any existing file).
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            readings: Vec::new(),
            config,
            pending_since_save: 0,
        }
    }

    /// Create a store, restoring from the persisted file when present.
    ///
    /// A missing file starts empty; an unreadable file is logged and also
    /// starts empty, since the running process is the source of truth.
    pub fn load_or_default(config: HistoryConfig) -> Self {
        let readings = match &config.persist_path {
            Some(path) if path.exists() => match persist::load_csv(path) {
                Ok(readings) => {
                    info!(
                        rows = readings.len(),
                        path = %path.display(),
                        "history restored from disk"
                    );
                    readings
                }
                Err(error) => {
                    warn!(%error, "failed to restore history, starting empty");
                    Vec::new()
                }
            },
            _ => Vec::new(),
        };

        Self {
            readings,
            config,
            pending_since_save: 0,
        }
    }

    /// Append one reading, truncating and autosaving as configured.
    pub fn append(&mut self, reading: Reading) {
        self.readings.push(reading);

        if self.readings.len() > self.config.max_len {
            let keep = self.config.max_len / 2;
            let dropped = self.readings.len() - keep;
            self.readings.drain(..dropped);
            debug!(dropped, kept = keep, "history truncated");
        }

        self.pending_since_save += 1;
        if self.pending_since_save >= self.config.autosave_every {
            self.autosave();
            self.pending_since_save = 0;
        }
    }

    /// All readings, oldest first.
    pub fn all(&self) -> &[Reading] {
        &self.readings
    }

    /// The trailing `n` readings, oldest first.
    pub fn tail(&self, n: usize) -> &[Reading] {
        &self.readings[self.readings.len().saturating_sub(n)..]
    }

    /// The most recent reading.
    pub fn latest(&self) -> Option<&Reading> {
        self.readings.last()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Per-channel anomaly-flag counts over the trailing `window` readings.
    pub fn anomaly_counts(&self, window: usize) -> BTreeMap<Channel, u64> {
        let mut counts: BTreeMap<Channel, u64> =
            Channel::ALL.iter().map(|&channel| (channel, 0)).collect();
        for reading in self.tail(window) {
            for (&channel, &flagged) in &reading.anomalies {
                if flagged {
                    *counts.entry(channel).or_insert(0) += 1;
                }
            }
        }
        counts
    }

    /// Drop all readings and delete the persisted file.
    pub fn clear(&mut self) {
        self.readings.clear();
        self.pending_since_save = 0;

        if let Some(path) = &self.config.persist_path {
            if path.exists() {
                if let Err(error) = std::fs::remove_file(path) {
                    warn!(%error, path = %path.display(), "failed to delete persisted history");
                }
            }
        }
    }

    /// Force a save regardless of the autosave counter.
    ///
    /// # Errors
    /// Propagates the persistence failure; a no-op `Ok` when persistence
    /// is not configured.
    pub fn flush(&mut self) -> Result<(), TelemetryError> {
        if let Some(path) = &self.config.persist_path {
            persist::save_csv(path, &self.readings)?;
            self.pending_since_save = 0;
        }
        Ok(())
    }

    /// Best-effort save: a failure is logged and skipped, the next
    /// threshold of appends will try again with the current state.
    fn autosave(&self) {
        let Some(path) = &self.config.persist_path else {
            return;
        };
        match persist::save_csv(path, &self.readings) {
            Ok(()) => debug!(rows = self.readings.len(), path = %path.display(), "history autosaved"),
            Err(error) => warn!(%error, "autosave failed, skipping this cycle"),
        }
    }
}
