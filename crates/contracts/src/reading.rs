//! Reading - Signal Source output
//!
//! One simulated sensor + position sample.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::Channel;

/// One timestamped telemetry sample.
///
/// Created exclusively by the signal generator and immutable once appended
/// to the history. Optional channels model simulated sensor dropout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Sample instant (UTC, stamped at generation time)
    pub timestamp: DateTime<Utc>,

    /// Cargo temperature in °C; `None` when the sensor dropped out
    pub temperature: Option<f64>,

    /// Relative humidity in %; `None` when the sensor dropped out
    pub humidity: Option<f64>,

    /// Shock magnitude; never absent
    pub shock: f64,

    /// Vehicle latitude (degrees)
    pub latitude: f64,

    /// Vehicle longitude (degrees)
    pub longitude: f64,

    /// Per-channel z-score anomaly flags; empty when anomaly
    /// detection is disabled
    #[serde(default)]
    pub anomalies: BTreeMap<Channel, bool>,
}

impl Reading {
    /// Value of the given channel, `None` for dropped-out optional channels.
    pub fn value(&self, channel: Channel) -> Option<f64> {
        match channel {
            Channel::Temperature => self.temperature,
            Channel::Humidity => self.humidity,
            Channel::Shock => Some(self.shock),
        }
    }

    /// Whether the given channel was flagged anomalous on this reading.
    pub fn is_anomalous(&self, channel: Channel) -> bool {
        self.anomalies.get(&channel).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Reading {
        Reading {
            timestamp: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            temperature: Some(5.2),
            humidity: None,
            shock: 1.3,
            latitude: 28.61,
            longitude: 77.21,
            anomalies: BTreeMap::from([(Channel::Shock, true)]),
        }
    }

    #[test]
    fn test_channel_values() {
        let r = sample();
        assert_eq!(r.value(Channel::Temperature), Some(5.2));
        assert_eq!(r.value(Channel::Humidity), None);
        assert_eq!(r.value(Channel::Shock), Some(1.3));
    }

    #[test]
    fn test_anomaly_lookup_defaults_false() {
        let r = sample();
        assert!(r.is_anomalous(Channel::Shock));
        assert!(!r.is_anomalous(Channel::Temperature));
    }

    #[test]
    fn test_serde_round_trip() {
        let r = sample();
        let json = serde_json::to_string(&r).unwrap();
        let back: Reading = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
