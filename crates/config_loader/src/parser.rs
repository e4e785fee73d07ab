//! Config parsing module
//!
//! Supports JSON (primary, matches the exported config object) and TOML.

use contracts::TelemetryError;
use serde::{Deserialize, Serialize};

use contracts::EngineConfig;

/// Config file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format (what `export_json` emits)
    Json,
    /// TOML format
    Toml,
}

impl ConfigFormat {
    /// Infer format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Partial configuration: every key optional, absent keys leave the
/// current value untouched on apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_min: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_max: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hum_min: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hum_max: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shock_limit: Option<f64>,

    /// Sampling cadence in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampling_interval: Option<f64>,
}

impl ConfigPatch {
    /// Overlay the present keys onto `config`.
    pub fn apply_to(&self, config: &mut EngineConfig) {
        if let Some(v) = self.temp_min {
            config.thresholds.temp_min = v;
        }
        if let Some(v) = self.temp_max {
            config.thresholds.temp_max = v;
        }
        if let Some(v) = self.hum_min {
            config.thresholds.hum_min = v;
        }
        if let Some(v) = self.hum_max {
            config.thresholds.hum_max = v;
        }
        if let Some(v) = self.shock_limit {
            config.thresholds.shock_limit = v;
        }
        if let Some(v) = self.sampling_interval {
            config.scheduler.interval_s = v;
        }
    }

    /// Snapshot all six keys from a resolved config (export direction).
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            temp_min: Some(config.thresholds.temp_min),
            temp_max: Some(config.thresholds.temp_max),
            hum_min: Some(config.thresholds.hum_min),
            hum_max: Some(config.thresholds.hum_max),
            shock_limit: Some(config.thresholds.shock_limit),
            sampling_interval: Some(config.scheduler.interval_s),
        }
    }
}

/// Parse JSON config content
pub fn parse_json(content: &str) -> Result<ConfigPatch, TelemetryError> {
    serde_json::from_str(content).map_err(|e| TelemetryError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse TOML config content
pub fn parse_toml(content: &str) -> Result<ConfigPatch, TelemetryError> {
    toml::from_str(content).map_err(|e| TelemetryError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse content in the given format
pub fn parse(content: &str, format: ConfigFormat) -> Result<ConfigPatch, TelemetryError> {
    match format {
        ConfigFormat::Json => parse_json(content),
        ConfigFormat::Toml => parse_toml(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_partial() {
        let patch = parse_json(r#"{ "temp_max": 10.0, "sampling_interval": 10 }"#).unwrap();
        assert_eq!(patch.temp_max, Some(10.0));
        assert_eq!(patch.sampling_interval, Some(10.0));
        assert_eq!(patch.temp_min, None);
        assert_eq!(patch.shock_limit, None);
    }

    #[test]
    fn test_parse_toml_partial() {
        let patch = parse_toml("hum_min = 25.0\nhum_max = 60.0\n").unwrap();
        assert_eq!(patch.hum_min, Some(25.0));
        assert_eq!(patch.hum_max, Some(60.0));
        assert_eq!(patch.temp_min, None);
    }

    #[test]
    fn test_parse_json_syntax_error() {
        let result = parse_json("{ not json");
        assert!(matches!(
            result.unwrap_err(),
            TelemetryError::ConfigParse { .. }
        ));
    }

    #[test]
    fn test_apply_leaves_absent_keys_untouched() {
        let mut config = EngineConfig::default();
        let patch = ConfigPatch {
            temp_max: Some(12.0),
            ..Default::default()
        };
        patch.apply_to(&mut config);
        assert_eq!(config.thresholds.temp_max, 12.0);
        assert_eq!(config.thresholds.temp_min, 2.0);
        assert_eq!(config.scheduler.interval_s, 5.0);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_extension("json"),
            Some(ConfigFormat::Json)
        );
        assert_eq!(
            ConfigFormat::from_extension("TOML"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}
