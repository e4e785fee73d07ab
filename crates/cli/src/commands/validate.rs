//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use config_loader::ConfigLoader;
use contracts::EngineConfig;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    temp_range: [f64; 2],
    hum_range: [f64; 2],
    shock_limit: f64,
    sampling_interval_s: f64,
}

impl From<&EngineConfig> for ConfigSummary {
    fn from(config: &EngineConfig) -> Self {
        Self {
            temp_range: [config.thresholds.temp_min, config.thresholds.temp_max],
            hum_range: [config.thresholds.hum_min, config.thresholds.hum_max],
            shock_limit: config.thresholds.shock_limit,
            sampling_interval_s: config.scheduler.interval_s,
        }
    }
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            summary: None,
        };
    }

    // The file is a patch over defaults; validation runs on the resolved config
    let resolved = ConfigLoader::load_from_path(&args.config)
        .and_then(|patch| ConfigLoader::resolve(EngineConfig::default(), &patch));

    match resolved {
        Ok(config) => ValidationResult {
            valid: true,
            config_path,
            error: None,
            summary: Some(ConfigSummary::from(&config)),
        },
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            summary: None,
        },
    }
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!(
                "\n  Temp range: {}–{} °C",
                summary.temp_range[0], summary.temp_range[1]
            );
            println!(
                "  Humidity range: {}–{} %",
                summary.hum_range[0], summary.hum_range[1]
            );
            println!("  Shock limit: {}", summary.shock_limit);
            println!("  Sampling interval: {}s", summary.sampling_interval_s);
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
