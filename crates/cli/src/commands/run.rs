//! `run` command implementation.
//!
//! The host loop: a tokio interval polls the engine, the engine's
//! scheduler decides how many samples are actually due. Polling faster
//! than the sampling cadence keeps the schedule tight without busy-waiting.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use config_loader::ConfigLoader;
use contracts::{AlertTransition, EngineConfig, TickReport};
use observability::TelemetryAggregator;
use telemetry_engine::TelemetryEngine;

use crate::cli::RunArgs;

/// Execute the `run` command
pub async fn run_simulation(args: &RunArgs) -> Result<()> {
    let config = build_config(args)?;

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    info!(
        interval_s = config.scheduler.interval_s,
        dropout = config.dropout_enabled,
        anomaly = config.anomaly_enabled,
        history = ?config.history.persist_path,
        "Configuration resolved"
    );

    let mut engine = TelemetryEngine::new(config);
    let mut aggregator = TelemetryAggregator::new();

    engine.start(Utc::now());

    let poll = poll_interval(engine.config().scheduler.interval_s);
    let mut ticker = tokio::time::interval(poll);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let started = tokio::time::Instant::now();
    let deadline = (args.duration > 0).then(|| started + Duration::from_secs(args.duration));

    info!(poll_ms = poll.as_millis() as u64, "Simulation loop started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let report = engine.tick(Utc::now());
                digest_tick(&engine, &report, &mut aggregator);

                if args.max_samples > 0 && engine.status().sample_index >= args.max_samples {
                    info!(samples = engine.status().sample_index, "Sample limit reached");
                    break;
                }
                if deadline.is_some_and(|d| tokio::time::Instant::now() >= d) {
                    info!(seconds = args.duration, "Duration limit reached");
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupt received, stopping simulation");
                break;
            }
        }
    }

    engine.stop();
    if let Err(error) = engine.flush_history() {
        warn!(%error, "Final history save failed");
    }

    print_summary(&engine, &aggregator, args.window);
    info!("Coldchain finished");
    Ok(())
}

/// Fold one tick's output into logs and the run aggregator.
fn digest_tick(engine: &TelemetryEngine, report: &TickReport, aggregator: &mut TelemetryAggregator) {
    for reading in engine.tail(report.produced.len()) {
        aggregator.observe_reading(reading);
    }

    if let Some(kpi) = &report.kpi {
        observability::record_kpi_metrics(kpi);
    }

    if let Some(alert) = &report.alert {
        aggregator.observe_alert(alert);
        match alert {
            AlertTransition::Breach(messages) => {
                warn!(alerts = %messages.join(" | "), "Threshold breach");
            }
            AlertTransition::AllClear => info!("All conditions normal"),
        }
    }
}

/// Resolve defaults + config file + CLI overrides into an engine config.
fn build_config(args: &RunArgs) -> Result<EngineConfig> {
    let mut config = EngineConfig::default();

    if let Some(path) = &args.config {
        if !path.exists() {
            anyhow::bail!("Configuration file not found: {}", path.display());
        }
        let patch = ConfigLoader::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
        patch.apply_to(&mut config);
    }

    if let Some(interval) = args.interval {
        config.scheduler.interval_s = interval;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.dropout {
        config.dropout_enabled = true;
    }
    if args.no_anomaly {
        config.anomaly_enabled = false;
    }
    config.history.persist_path = args.history_file.clone();

    config_loader::validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Poll cadence for the host loop: faster refresh for shorter sampling
/// intervals without redraw spam.
fn poll_interval(interval_s: f64) -> Duration {
    let ms = if interval_s <= 5.0 {
        1000
    } else if interval_s <= 10.0 {
        1500
    } else {
        2500
    };
    Duration::from_millis(ms)
}

/// Print the end-of-run summary.
fn print_summary(engine: &TelemetryEngine, aggregator: &TelemetryAggregator, window: usize) {
    let status = engine.status();

    println!("\n=== Simulation Status ===");
    println!("Samples produced: {}", status.sample_index);
    println!("History length: {}", status.history_len);
    match status.last_sample_at {
        Some(at) => println!("Last sample: {}", at.format("%H:%M:%S")),
        None => println!("Last sample: —"),
    }
    println!("Interval: {}s", status.interval_s);

    if let Some(kpi) = engine.latest_kpi() {
        println!("\n=== Compliance (full history) ===");
        print_compliance("Temp", kpi.compliance.temperature);
        print_compliance("Humidity", kpi.compliance.humidity);
        print_compliance("Shock", kpi.compliance.shock);
    }

    println!();
    print!("{}", aggregator.summary());

    let counts = engine.anomaly_counts(window);
    let flagged: u64 = counts.values().sum();
    if flagged > 0 {
        println!("Anomalies (last {window} readings):");
        for (channel, count) in &counts {
            println!("  {channel}: {count}");
        }
    }
}

fn print_compliance(label: &str, value: Option<f64>) {
    match value {
        Some(pct) => println!("{label}: {pct:.1}%"),
        None => println!("{label}: n/a"),
    }
}
