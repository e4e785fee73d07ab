//! Main telemetry engine facade.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use contracts::{
    AlertTransition, Channel, EngineConfig, EngineStatus, KpiReport, Reading, TelemetryError,
    Thresholds, TickReport,
};
use history_store::HistoryStore;
use signal_source::SignalGenerator;

use crate::baseline::BaselineTracker;
use crate::kpi::{evaluate, AlertLatch};
use crate::scheduler::SampleScheduler;

/// Tick-driven simulation engine.
///
/// Owns the generator, scheduler, baseline, history and alert latch; all
/// work happens synchronously inside [`TelemetryEngine::tick`]. The host
/// owns the instance and supplies `now` on every call, so the engine never
/// reads a clock and never sleeps.
pub struct TelemetryEngine {
    config: EngineConfig,
    generator: SignalGenerator,
    scheduler: SampleScheduler,
    baseline: BaselineTracker,
    history: HistoryStore,
    alerts: AlertLatch,
}

impl TelemetryEngine {
    /// Build an engine, restoring persisted history when configured.
    ///
    /// The sample counter continues from the restored history length, so
    /// signal shapes pick up where the previous run left off.
    pub fn new(config: EngineConfig) -> Self {
        let history = HistoryStore::load_or_default(config.history.clone());
        let mut scheduler = SampleScheduler::new(config.scheduler);
        scheduler.resume_at(history.len() as u64);

        Self {
            generator: SignalGenerator::new(config.seed, config.dropout_enabled),
            baseline: BaselineTracker::new(config.baseline, config.anomaly_enabled),
            alerts: AlertLatch::new(),
            scheduler,
            history,
            config,
        }
    }

    /// Begin producing samples.
    pub fn start(&mut self, now: DateTime<Utc>) {
        info!(interval_s = self.config.scheduler.interval_s, "simulation started");
        self.scheduler.start(now);
    }

    /// Freeze production; state and history are kept.
    pub fn stop(&mut self) {
        info!(samples = self.scheduler.sample_index(), "simulation stopped");
        self.scheduler.stop();
    }

    /// Return everything to the initial state: empty history (persisted
    /// file deleted), cleared baselines, scheduler at index 0, alert latch
    /// back to all-ok.
    pub fn reset(&mut self) {
        self.scheduler.reset();
        self.history.clear();
        self.baseline.reset();
        self.alerts.reset();
        info!("simulation reset");
    }

    /// Run one tick: produce due samples, annotate, append, evaluate.
    ///
    /// Returns the produced sample indices plus the current KPI report and
    /// any alert transition. Safe to call on any cadence; produces nothing
    /// while stopped.
    #[instrument(name = "engine_tick", level = "debug", skip(self), fields(now = %now))]
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickReport {
        let due = self.scheduler.due(now);
        let mut produced = Vec::with_capacity(due.len());

        for slot in due {
            let mut reading = self.generator.generate(slot.index, now);
            self.baseline.annotate(&mut reading);
            self.scheduler.mark_sampled(reading.timestamp);
            record_reading_metrics(&reading);
            self.history.append(reading);
            produced.push(slot.index);
        }

        if !produced.is_empty() {
            metrics::counter!("coldchain_samples_total").increment(produced.len() as u64);
            metrics::histogram!("coldchain_tick_batch_size").record(produced.len() as f64);
            metrics::gauge!("coldchain_history_len").set(self.history.len() as f64);
            if produced.len() > 1 {
                debug!(batch = produced.len(), "catch-up tick");
            }
        }

        let kpi = evaluate(self.history.all(), &self.config.thresholds);
        let alert = kpi
            .as_ref()
            .and_then(|report| self.alerts.observe(report, &self.config.thresholds));
        if let Some(transition) = &alert {
            record_alert_metrics(transition);
        }

        TickReport {
            produced,
            kpi,
            alert,
        }
    }

    // ===== Host commands =====

    /// Replace the thresholds.
    ///
    /// # Errors
    /// Rejects an inverted range without touching the current values.
    pub fn set_thresholds(&mut self, thresholds: Thresholds) -> Result<(), TelemetryError> {
        thresholds.validate()?;
        self.config.thresholds = thresholds;
        Ok(())
    }

    /// Change the sampling cadence.
    ///
    /// # Errors
    /// Rejects a non-positive or non-finite interval.
    pub fn set_interval(&mut self, interval_s: f64) -> Result<(), TelemetryError> {
        if !interval_s.is_finite() || interval_s <= 0.0 {
            return Err(TelemetryError::config_validation(
                "scheduler.interval_s",
                format!("interval_s must be > 0, got {interval_s}"),
            ));
        }
        self.config.scheduler.interval_s = interval_s;
        self.scheduler.set_interval(interval_s);
        Ok(())
    }

    /// Toggle simulated sensor dropouts.
    pub fn set_dropout(&mut self, enabled: bool) {
        self.config.dropout_enabled = enabled;
        self.generator.set_dropout(enabled);
    }

    /// Toggle anomaly flagging.
    pub fn set_anomaly_enabled(&mut self, enabled: bool) {
        self.config.anomaly_enabled = enabled;
        self.baseline.set_enabled(enabled);
    }

    /// Re-seed the generator (`None` seeds from the OS).
    pub fn set_seed(&mut self, seed: Option<u64>) {
        self.config.seed = seed;
        self.generator.reseed(seed);
    }

    // ===== Presentation queries =====

    /// Run-state snapshot.
    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            running: self.scheduler.is_running(),
            sample_index: self.scheduler.sample_index(),
            history_len: self.history.len(),
            last_sample_at: self.scheduler.last_sample_at(),
            next_sample_due: self.scheduler.next_sample_due(),
            interval_s: self.scheduler.interval_s(),
        }
    }

    /// Full history, oldest first.
    pub fn history(&self) -> &[Reading] {
        self.history.all()
    }

    /// Trailing `n` readings, oldest first.
    pub fn tail(&self, n: usize) -> &[Reading] {
        self.history.tail(n)
    }

    /// Per-channel anomaly counts over the trailing `window` readings.
    pub fn anomaly_counts(&self, window: usize) -> BTreeMap<Channel, u64> {
        self.history.anomaly_counts(window)
    }

    /// Current KPI report without advancing the simulation.
    pub fn latest_kpi(&self) -> Option<KpiReport> {
        evaluate(self.history.all(), &self.config.thresholds)
    }

    /// Current configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Force a history save regardless of the autosave counter.
    ///
    /// # Errors
    /// Propagates the persistence failure (autosaves never do).
    pub fn flush_history(&mut self) -> Result<(), TelemetryError> {
        self.history.flush()
    }
}

fn record_reading_metrics(reading: &Reading) {
    for (&channel, &flagged) in &reading.anomalies {
        if flagged {
            metrics::counter!("coldchain_anomalies_total", "channel" => channel.as_str())
                .increment(1);
        }
    }
}

fn record_alert_metrics(transition: &AlertTransition) {
    let kind = match transition {
        AlertTransition::Breach(_) => "breach",
        AlertTransition::AllClear => "all_clear",
    };
    metrics::counter!("coldchain_alert_transitions_total", "kind" => kind).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    fn engine() -> TelemetryEngine {
        TelemetryEngine::new(EngineConfig {
            seed: Some(42),
            ..Default::default()
        })
    }

    #[test]
    fn test_ten_on_time_ticks_from_fresh_reset() {
        let mut engine = engine();
        engine.reset();
        engine.start(t0());

        let mut last = TickReport::default();
        for n in 0..10 {
            last = engine.tick(t0() + Duration::seconds(n * 5));
        }

        let status = engine.status();
        assert_eq!(engine.history().len(), 10);
        assert_eq!(status.sample_index, 10);
        assert_eq!(last.produced, vec![9]);

        let kpi = last.kpi.expect("non-empty history");
        assert_eq!(&kpi.latest, engine.history().last().unwrap());
        assert_eq!(kpi.latest.timestamp, t0() + Duration::seconds(45));
    }

    #[test]
    fn test_ticks_while_stopped_produce_nothing() {
        let mut engine = engine();
        engine.start(t0());
        engine.tick(t0());
        engine.stop();

        for n in 1..=5 {
            let report = engine.tick(t0() + Duration::seconds(n * 5));
            assert!(report.produced.is_empty());
        }
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn test_reset_clears_all_state() {
        let mut engine = engine();
        engine.start(t0());
        for n in 0..100 {
            engine.tick(t0() + Duration::seconds(n * 5));
        }
        assert_eq!(engine.history().len(), 100);

        engine.reset();
        let status = engine.status();
        assert_eq!(engine.history().len(), 0);
        assert_eq!(status.sample_index, 0);
        assert!(!status.running);
        assert!(status.last_sample_at.is_none());
        assert!(status.next_sample_due.is_none());
    }

    #[test]
    fn test_catch_up_after_gap() {
        let mut engine = engine();
        engine.start(t0());
        engine.tick(t0());

        let report = engine.tick(t0() + Duration::seconds(17));
        assert_eq!(report.produced, vec![1, 2, 3]);
        assert_eq!(engine.history().len(), 4);
    }

    #[test]
    fn test_alert_edges_through_the_engine() {
        let mut engine = engine();
        // Impossible temperature band: every sample breaches it
        engine
            .set_thresholds(Thresholds {
                temp_min: -200.0,
                temp_max: -100.0,
                hum_min: 0.0,
                hum_max: 100.0,
                shock_limit: 1000.0,
            })
            .unwrap();
        engine.start(t0());

        let report = engine.tick(t0());
        match report.alert {
            Some(AlertTransition::Breach(ref messages)) => {
                assert_eq!(messages.len(), 1);
                assert!(messages[0].starts_with("Temp"), "got: {messages:?}");
            }
            other => panic!("expected breach, got {other:?}"),
        }

        // Breach persists: later ticks stay silent
        let report = engine.tick(t0() + Duration::seconds(5));
        assert!(report.alert.is_none());

        // Widen the band: single all-clear edge
        engine
            .set_thresholds(Thresholds {
                temp_min: -200.0,
                temp_max: 200.0,
                hum_min: 0.0,
                hum_max: 100.0,
                shock_limit: 1000.0,
            })
            .unwrap();
        let report = engine.tick(t0() + Duration::seconds(10));
        assert_eq!(report.alert, Some(AlertTransition::AllClear));
    }

    #[test]
    fn test_invalid_commands_leave_config_untouched() {
        let mut engine = engine();
        assert!(engine.set_interval(0.0).is_err());
        assert_eq!(engine.config().scheduler.interval_s, 5.0);

        let inverted = Thresholds {
            temp_min: 10.0,
            temp_max: 2.0,
            ..Default::default()
        };
        assert!(engine.set_thresholds(inverted).is_err());
        assert_eq!(engine.config().thresholds.temp_min, 2.0);
    }

    #[test]
    fn test_persistence_restores_history_and_counter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        let config = EngineConfig {
            seed: Some(42),
            history: contracts::HistoryConfig {
                max_len: 5000,
                autosave_every: 10,
                persist_path: Some(path.clone()),
            },
            ..Default::default()
        };

        let mut engine = TelemetryEngine::new(config.clone());
        engine.start(t0());
        for n in 0..30 {
            engine.tick(t0() + Duration::seconds(n * 5));
        }
        assert!(path.exists());

        let restored = TelemetryEngine::new(config);
        assert_eq!(restored.history().len(), 30);
        assert_eq!(restored.status().sample_index, 30);
        assert_eq!(restored.history(), engine.history());
    }
}
