//! Channel - the monitored sensor channels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A monitored telemetry channel.
///
/// Temperature and humidity can drop out (simulated sensor failure),
/// shock is always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Cargo temperature (°C)
    #[serde(rename = "Temp")]
    Temperature,

    /// Relative humidity (%)
    Humidity,

    /// Shock / vibration magnitude (unitless)
    Shock,
}

impl Channel {
    /// All channels, in canonical order.
    pub const ALL: [Channel; 3] = [Channel::Temperature, Channel::Humidity, Channel::Shock];

    /// Short label used in persisted columns and metric tags.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Temperature => "Temp",
            Channel::Humidity => "Humidity",
            Channel::Shock => "Shock",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(Channel::Temperature.as_str(), "Temp");
        assert_eq!(Channel::Humidity.as_str(), "Humidity");
        assert_eq!(Channel::Shock.as_str(), "Shock");
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&Channel::Temperature).unwrap();
        assert_eq!(json, "\"Temp\"");
        let parsed: Channel = serde_json::from_str("\"Shock\"").unwrap();
        assert_eq!(parsed, Channel::Shock);
    }
}
