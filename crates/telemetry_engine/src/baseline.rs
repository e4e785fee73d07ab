//! Rolling per-channel baseline for z-score anomaly flags.

use std::collections::{BTreeMap, VecDeque};

use contracts::{BaselineConfig, Channel, Reading};

/// Floor substituted for a zero standard deviation.
const STDEV_EPSILON: f64 = 1e-6;

/// Per-channel rolling window of recent values.
///
/// A value is flagged when its absolute z-score against the window exceeds
/// the configured threshold; the first `min_samples` recorded values are
/// never flagged. The value is recorded after flagging, so a sample is not
/// judged against a window that already contains it.
#[derive(Debug)]
pub struct BaselineTracker {
    config: BaselineConfig,
    enabled: bool,
    windows: BTreeMap<Channel, VecDeque<f64>>,
}

impl BaselineTracker {
    pub fn new(config: BaselineConfig, enabled: bool) -> Self {
        Self {
            config,
            enabled,
            windows: BTreeMap::new(),
        }
    }

    /// Toggle flag computation; a disabled tracker records nothing.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flag every channel of `reading` and record the observed values.
    ///
    /// Leaves the anomaly map empty while disabled.
    pub fn annotate(&mut self, reading: &mut Reading) {
        if !self.enabled {
            return;
        }
        for channel in Channel::ALL {
            let flagged = self.flag(channel, reading.value(channel));
            reading.anomalies.insert(channel, flagged);
        }
    }

    /// Flag one observation and record it into the channel's window.
    ///
    /// Absent values are neither flagged nor recorded.
    pub fn flag(&mut self, channel: Channel, value: Option<f64>) -> bool {
        let Some(value) = value else {
            return false;
        };

        let window = self.windows.entry(channel).or_default();

        let flagged = if window.len() >= self.config.min_samples {
            let mean = window.iter().sum::<f64>() / window.len() as f64;
            let variance =
                window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / window.len() as f64;
            let mut stdev = variance.sqrt();
            if stdev == 0.0 {
                stdev = STDEV_EPSILON;
            }
            ((value - mean) / stdev).abs() > self.config.z_threshold
        } else {
            false
        };

        window.push_back(value);
        if window.len() > self.config.max_window {
            window.pop_front();
        }

        flagged
    }

    /// Number of recorded values for a channel.
    pub fn recorded(&self, channel: Channel) -> usize {
        self.windows.get(&channel).map_or(0, VecDeque::len)
    }

    /// Clear all windows.
    pub fn reset(&mut self) {
        self.windows.clear();
    }
}
