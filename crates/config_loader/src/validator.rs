//! Config validation module
//!
//! Validation rules:
//! - temp_min <= temp_max, hum_min <= hum_max
//! - interval_s finite and > 0
//! - catchup_intervals >= 1
//! - baseline: max_window > 0, min_samples <= max_window, z_threshold > 0
//! - history: max_len > 0, autosave_every > 0

use contracts::{EngineConfig, TelemetryError};

/// Validate a resolved engine configuration.
///
/// Returns the first error encountered, or `Ok(())`.
pub fn validate(config: &EngineConfig) -> Result<(), TelemetryError> {
    config.thresholds.validate()?;
    validate_scheduler(config)?;
    validate_baseline(config)?;
    validate_history(config)?;
    Ok(())
}

fn validate_scheduler(config: &EngineConfig) -> Result<(), TelemetryError> {
    let scheduler = &config.scheduler;
    if !scheduler.interval_s.is_finite() || scheduler.interval_s <= 0.0 {
        return Err(TelemetryError::config_validation(
            "scheduler.interval_s",
            format!("interval_s must be > 0, got {}", scheduler.interval_s),
        ));
    }
    if scheduler.catchup_intervals < 1.0 {
        return Err(TelemetryError::config_validation(
            "scheduler.catchup_intervals",
            format!(
                "catchup_intervals must be >= 1, got {}",
                scheduler.catchup_intervals
            ),
        ));
    }
    Ok(())
}

fn validate_baseline(config: &EngineConfig) -> Result<(), TelemetryError> {
    let baseline = &config.baseline;
    if baseline.max_window == 0 {
        return Err(TelemetryError::config_validation(
            "baseline.max_window",
            "max_window must be > 0",
        ));
    }
    if baseline.min_samples > baseline.max_window {
        return Err(TelemetryError::config_validation(
            "baseline.min_samples / baseline.max_window",
            format!(
                "min_samples ({}) must be <= max_window ({})",
                baseline.min_samples, baseline.max_window
            ),
        ));
    }
    if baseline.z_threshold <= 0.0 {
        return Err(TelemetryError::config_validation(
            "baseline.z_threshold",
            format!("z_threshold must be > 0, got {}", baseline.z_threshold),
        ));
    }
    Ok(())
}

fn validate_history(config: &EngineConfig) -> Result<(), TelemetryError> {
    let history = &config.history;
    if history.max_len == 0 {
        return Err(TelemetryError::config_validation(
            "history.max_len",
            "max_len must be > 0",
        ));
    }
    if history.autosave_every == 0 {
        return Err(TelemetryError::config_validation(
            "history.autosave_every",
            "autosave_every must be > 0",
        ));
    }
    Ok(())
}
