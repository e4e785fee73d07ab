//! Engine configuration contracts that can be shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::Thresholds;

/// Telemetry engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Safety thresholds
    #[serde(default)]
    pub thresholds: Thresholds,

    /// Sampling cadence configuration
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Anomaly baseline configuration
    #[serde(default)]
    pub baseline: BaselineConfig,

    /// History retention and persistence configuration
    #[serde(default)]
    pub history: HistoryConfig,

    /// Simulate sensor dropouts on the optional channels
    #[serde(default)]
    pub dropout_enabled: bool,

    /// Compute per-channel z-score anomaly flags
    #[serde(default = "default_true")]
    pub anomaly_enabled: bool,

    /// RNG seed; `None` seeds from the OS
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_true() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            scheduler: SchedulerConfig::default(),
            baseline: BaselineConfig::default(),
            history: HistoryConfig::default(),
            dropout_enabled: false,
            anomaly_enabled: true,
            seed: None,
        }
    }
}

/// Sampling scheduler configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Seconds between samples
    pub interval_s: f64,

    /// Catch-up lag bound, in multiples of the interval: a tick stops
    /// producing once the just-produced slot is this far behind `now`
    pub catchup_intervals: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_s: 5.0,
            catchup_intervals: 3.0,
        }
    }
}

/// Anomaly baseline configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BaselineConfig {
    /// Minimum recorded values before flagging starts
    pub min_samples: usize,

    /// Rolling window capacity per channel (FIFO eviction)
    pub max_window: usize,

    /// Absolute z-score above which a value is flagged
    pub z_threshold: f64,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            min_samples: 30,
            max_window: 300,
            z_threshold: 2.5,
        }
    }
}

/// History retention and persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum in-memory readings; overflow truncates to the most
    /// recent `max_len / 2`
    pub max_len: usize,

    /// Autosave after this many appends since the last save
    pub autosave_every: usize,

    /// Durable CSV location; `None` disables persistence
    #[serde(default)]
    pub persist_path: Option<PathBuf>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_len: 5000,
            autosave_every: 25,
            persist_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.scheduler.interval_s, 5.0);
        assert_eq!(config.baseline.min_samples, 30);
        assert_eq!(config.baseline.max_window, 300);
        assert_eq!(config.history.max_len, 5000);
        assert_eq!(config.history.autosave_every, 25);
        assert!(config.history.persist_path.is_none());
        assert!(!config.dropout_enabled);
    }

    #[test]
    fn test_anomaly_enabled_defaults_on_when_omitted() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert!(config.anomaly_enabled);
    }
}
