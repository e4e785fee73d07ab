//! Thresholds - configured safety bounds per channel.

use serde::{Deserialize, Serialize};

use crate::TelemetryError;

/// Safety thresholds for the monitored channels.
///
/// Defaults match the cold-chain profile: 2–8 °C, 30–50 %RH, shock ≤ 5.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Minimum allowed temperature (°C)
    pub temp_min: f64,

    /// Maximum allowed temperature (°C)
    pub temp_max: f64,

    /// Minimum allowed humidity (%)
    pub hum_min: f64,

    /// Maximum allowed humidity (%)
    pub hum_max: f64,

    /// Maximum allowed shock magnitude
    pub shock_limit: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            temp_min: 2.0,
            temp_max: 8.0,
            hum_min: 30.0,
            hum_max: 50.0,
            shock_limit: 5.0,
        }
    }
}

impl Thresholds {
    /// Check the min ≤ max invariants.
    ///
    /// # Errors
    /// Returns the first violated field as a validation error.
    pub fn validate(&self) -> Result<(), TelemetryError> {
        if self.temp_min > self.temp_max {
            return Err(TelemetryError::config_validation(
                "temp_min / temp_max",
                format!(
                    "temp_min ({}) must be <= temp_max ({})",
                    self.temp_min, self.temp_max
                ),
            ));
        }
        if self.hum_min > self.hum_max {
            return Err(TelemetryError::config_validation(
                "hum_min / hum_max",
                format!(
                    "hum_min ({}) must be <= hum_max ({})",
                    self.hum_min, self.hum_max
                ),
            ));
        }
        Ok(())
    }

    /// Whether a temperature value lies within bounds.
    pub fn temp_in_range(&self, value: f64) -> bool {
        (self.temp_min..=self.temp_max).contains(&value)
    }

    /// Whether a humidity value lies within bounds.
    pub fn hum_in_range(&self, value: f64) -> bool {
        (self.hum_min..=self.hum_max).contains(&value)
    }

    /// Whether a shock value is acceptable.
    pub fn shock_in_range(&self, value: f64) -> bool {
        value <= self.shock_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        assert!(Thresholds::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_temp_range_rejected() {
        let t = Thresholds {
            temp_min: 9.0,
            temp_max: 2.0,
            ..Default::default()
        };
        let err = t.validate().unwrap_err().to_string();
        assert!(err.contains("temp_min"), "got: {err}");
    }

    #[test]
    fn test_range_checks_are_inclusive() {
        let t = Thresholds::default();
        assert!(t.temp_in_range(2.0));
        assert!(t.temp_in_range(8.0));
        assert!(!t.temp_in_range(8.01));
        assert!(t.shock_in_range(5.0));
        assert!(!t.shock_in_range(5.1));
    }
}
