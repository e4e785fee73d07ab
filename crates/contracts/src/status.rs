//! EngineStatus - scheduler/run-state snapshot for the presentation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of the engine's run state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineStatus {
    /// Whether the scheduler is producing samples
    pub running: bool,

    /// Next sample index to be produced
    pub sample_index: u64,

    /// Readings currently held in the history
    pub history_len: usize,

    /// Instant of the most recently produced sample
    pub last_sample_at: Option<DateTime<Utc>>,

    /// Next scheduled sample instant; unset until the first started tick
    pub next_sample_due: Option<DateTime<Utc>>,

    /// Configured cadence in seconds
    pub interval_s: f64,
}
