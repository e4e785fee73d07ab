//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;

use config_loader::ConfigLoader;
use contracts::EngineConfig;

use crate::cli::InfoArgs;

#[derive(Serialize)]
struct InfoReport {
    config: EngineConfig,
    exported: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    history: Option<HistoryInfo>,
}

#[derive(Serialize)]
struct HistoryInfo {
    path: String,
    exists: bool,
    rows: usize,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    let mut config = EngineConfig::default();
    if let Some(path) = &args.config {
        let patch = ConfigLoader::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
        config = ConfigLoader::resolve(config, &patch)?;
    }

    let history = args.history_file.as_ref().map(|path| {
        let rows = if path.exists() {
            history_store::load_csv(path).map(|r| r.len()).unwrap_or(0)
        } else {
            0
        };
        HistoryInfo {
            path: path.display().to_string(),
            exists: path.exists(),
            rows,
        }
    });

    let exported = ConfigLoader::export_json(&config)?;
    let report = InfoReport {
        config,
        exported,
        history,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_info(&report);
    }
    Ok(())
}

fn print_info(report: &InfoReport) {
    let thresholds = &report.config.thresholds;

    println!("=== Resolved Configuration ===\n");
    println!(
        "Thresholds: temp {}–{} °C, humidity {}–{} %, shock <= {}",
        thresholds.temp_min,
        thresholds.temp_max,
        thresholds.hum_min,
        thresholds.hum_max,
        thresholds.shock_limit
    );
    println!(
        "Scheduler: every {}s, catch-up bound {}x interval",
        report.config.scheduler.interval_s, report.config.scheduler.catchup_intervals
    );
    println!(
        "Baseline: warmup {} samples, window {}, |z| > {}",
        report.config.baseline.min_samples,
        report.config.baseline.max_window,
        report.config.baseline.z_threshold
    );
    println!(
        "History: cap {}, autosave every {} samples",
        report.config.history.max_len, report.config.history.autosave_every
    );

    if let Some(ref history) = report.history {
        if history.exists {
            println!("Persisted history: {} ({} rows)", history.path, history.rows);
        } else {
            println!("Persisted history: {} (not found)", history.path);
        }
    }

    println!("\n=== Exported config (JSON) ===\n{}", report.exported);
}
