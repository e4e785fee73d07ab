//! # Config Loader
//!
//! Threshold/cadence configuration import and export.
//!
//! Responsibilities:
//! - Parse JSON/TOML config files into a [`ConfigPatch`]
//! - Overlay a patch onto an [`EngineConfig`] (absent keys keep their
//!   current values)
//! - Validate the resolved configuration
//! - Export the six-key config object for round-tripping
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use contracts::EngineConfig;
//! use std::path::Path;
//!
//! let patch = ConfigLoader::load_from_path(Path::new("config.json")).unwrap();
//! let config = ConfigLoader::resolve(EngineConfig::default(), &patch).unwrap();
//! println!("interval: {}s", config.scheduler.interval_s);
//! ```

mod parser;
mod validator;

pub use parser::{ConfigFormat, ConfigPatch};
pub use validator::validate;

use contracts::{EngineConfig, TelemetryError};
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a config patch from a file path
    ///
    /// Automatically detects format from file extension (.json / .toml).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    pub fn load_from_path(path: &Path) -> Result<ConfigPatch, TelemetryError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load a config patch from a string
    ///
    /// # Errors
    /// - Parse failure
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<ConfigPatch, TelemetryError> {
        parser::parse(content, format)
    }

    /// Overlay `patch` onto `base` and validate the result.
    ///
    /// # Errors
    /// - Validation failure on the resolved config
    pub fn resolve(mut base: EngineConfig, patch: &ConfigPatch) -> Result<EngineConfig, TelemetryError> {
        patch.apply_to(&mut base);
        validator::validate(&base)?;
        Ok(base)
    }

    /// Serialize the six-key config object to a JSON string
    pub fn export_json(config: &EngineConfig) -> Result<String, TelemetryError> {
        serde_json::to_string_pretty(&ConfigPatch::from_config(config))
            .map_err(|e| TelemetryError::config_parse(format!("JSON serialize error: {e}")))
    }

    /// Serialize the six-key config object to a TOML string
    pub fn export_toml(config: &EngineConfig) -> Result<String, TelemetryError> {
        toml::to_string_pretty(&ConfigPatch::from_config(config))
            .map_err(|e| TelemetryError::config_parse(format!("TOML serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, TelemetryError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            TelemetryError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            TelemetryError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, TelemetryError> {
        Ok(std::fs::read_to_string(path)?)
    }
}
