//! # Integration Tests
//!
//! Cross-crate end-to-end tests:
//! - Full tick flow: generator -> baseline -> history -> KPI -> alerts
//! - Persistence across engine instances
//! - Config import/export round trips

#[cfg(test)]
mod e2e_tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use contracts::{AlertTransition, Channel, EngineConfig, HistoryConfig, Thresholds};
    use observability::TelemetryAggregator;
    use telemetry_engine::TelemetryEngine;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    fn seeded_config() -> EngineConfig {
        EngineConfig {
            seed: Some(42),
            ..Default::default()
        }
    }

    /// Baseline scenario: seed=42, interval=5s, default thresholds, 10
    /// on-time ticks from a fresh reset.
    #[test]
    fn test_e2e_ten_tick_run() {
        let mut engine = TelemetryEngine::new(seeded_config());
        engine.reset();
        engine.start(t0());

        let mut last = None;
        for n in 0..10 {
            last = Some(engine.tick(t0() + Duration::seconds(n * 5)));
        }
        let last = last.unwrap();

        let status = engine.status();
        assert_eq!(engine.history().len(), 10);
        assert_eq!(status.sample_index, 10);
        assert!(status.running);

        let kpi = last.kpi.expect("history is non-empty");
        assert_eq!(&kpi.latest, &engine.history()[9]);

        for pct in [
            kpi.compliance.temperature,
            kpi.compliance.humidity,
            kpi.compliance.shock,
        ] {
            let pct = pct.expect("all channels have values");
            assert!((0.0..=100.0).contains(&pct), "got {pct}");
        }
    }

    #[test]
    fn test_e2e_stop_freezes_and_restart_resumes() {
        let mut engine = TelemetryEngine::new(seeded_config());
        engine.start(t0());
        engine.tick(t0());
        engine.stop();

        for n in 1..=5 {
            assert!(engine
                .tick(t0() + Duration::seconds(n * 5))
                .produced
                .is_empty());
        }
        assert_eq!(engine.history().len(), 1);

        // Restart keeps the original schedule and counters
        engine.start(t0() + Duration::seconds(26));
        let report = engine.tick(t0() + Duration::seconds(26));
        assert!(!report.produced.is_empty());
        assert_eq!(report.produced[0], 1);
    }

    #[test]
    fn test_e2e_catch_up_respects_bound() {
        let mut engine = TelemetryEngine::new(seeded_config());
        engine.start(t0());
        engine.tick(t0());

        // 17 s gap at a 5 s interval: exactly floor(17/5) catch-up samples
        let report = engine.tick(t0() + Duration::seconds(17));
        assert_eq!(report.produced.len(), 3);

        // A much longer outage still produces a bounded batch per tick
        let report = engine.tick(t0() + Duration::seconds(500));
        assert_eq!(report.produced.len(), 1);
    }

    #[test]
    fn test_e2e_history_cap_keeps_recent_half() {
        let mut config = seeded_config();
        config.history.max_len = 50;
        let mut engine = TelemetryEngine::new(config);
        engine.start(t0());

        for n in 0..51 {
            engine.tick(t0() + Duration::seconds(n * 5));
        }

        assert_eq!(engine.history().len(), 25);
        // Newest reading survived, order preserved
        let history = engine.history();
        assert_eq!(history.last().unwrap().timestamp, t0() + Duration::seconds(250));
        for pair in history.windows(2) {
            assert!(pair[0].timestamp < pair[1].timestamp);
        }
        // Sample counter is unaffected by truncation
        assert_eq!(engine.status().sample_index, 51);
    }

    #[test]
    fn test_e2e_persistence_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        let config = EngineConfig {
            seed: Some(42),
            history: HistoryConfig {
                max_len: 5000,
                autosave_every: 25,
                persist_path: Some(path.clone()),
            },
            ..Default::default()
        };

        let mut engine = TelemetryEngine::new(config.clone());
        engine.start(t0());
        for n in 0..25 {
            engine.tick(t0() + Duration::seconds(n * 5));
        }
        assert!(path.exists(), "autosave after 25 appends");

        let restored = TelemetryEngine::new(config);
        assert_eq!(restored.history().len(), 25);
        assert_eq!(restored.history(), engine.history());
        assert_eq!(restored.status().sample_index, 25);
    }

    #[test]
    fn test_e2e_reset_clears_state_and_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        let config = EngineConfig {
            seed: Some(7),
            history: HistoryConfig {
                max_len: 5000,
                autosave_every: 10,
                persist_path: Some(path.clone()),
            },
            ..Default::default()
        };

        let mut engine = TelemetryEngine::new(config);
        engine.start(t0());
        for n in 0..100 {
            engine.tick(t0() + Duration::seconds(n * 5));
        }
        assert_eq!(engine.history().len(), 100);
        assert!(path.exists());

        engine.reset();
        assert_eq!(engine.history().len(), 0);
        assert_eq!(engine.status().sample_index, 0);
        assert!(!engine.status().running);
        assert!(!path.exists(), "reset deletes the persisted file");

        // Anomaly baselines restarted: flags need a fresh warmup
        engine.start(t0());
        let report = engine.tick(t0());
        let reading = &engine.history()[0];
        assert_eq!(report.produced, vec![0]);
        assert!(Channel::ALL.iter().all(|&c| !reading.is_anomalous(c)));
    }

    #[test]
    fn test_e2e_breach_alerts_are_edge_triggered() {
        let mut engine = TelemetryEngine::new(seeded_config());
        engine
            .set_thresholds(Thresholds {
                temp_min: -100.0,
                temp_max: 100.0,
                hum_min: 0.0,
                hum_max: 100.0,
                shock_limit: -1.0, // impossible: every sample breaches shock
            })
            .unwrap();
        engine.start(t0());

        let mut breaches = 0;
        let mut clears = 0;
        for n in 0..20 {
            let report = engine.tick(t0() + Duration::seconds(n * 5));
            match report.alert {
                Some(AlertTransition::Breach(_)) => breaches += 1,
                Some(AlertTransition::AllClear) => clears += 1,
                None => {}
            }
        }
        assert_eq!(breaches, 1, "persistent breach alerts once");
        assert_eq!(clears, 0);
    }

    #[test]
    fn test_e2e_aggregator_digests_engine_output() {
        let mut engine = TelemetryEngine::new(seeded_config());
        let mut aggregator = TelemetryAggregator::new();
        engine.start(t0());

        for n in 0..40 {
            let report = engine.tick(t0() + Duration::seconds(n * 5));
            for reading in engine.tail(report.produced.len()) {
                aggregator.observe_reading(reading);
            }
            if let Some(alert) = &report.alert {
                aggregator.observe_alert(alert);
            }
        }

        let summary = aggregator.summary();
        assert_eq!(summary.total_samples, 40);
        assert_eq!(summary.shock.count, 40);
        assert!(summary.temperature.mean > 2.0 && summary.temperature.mean < 8.0);
        assert!(!format!("{summary}").is_empty());
    }
}

#[cfg(test)]
mod config_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::EngineConfig;
    use telemetry_engine::TelemetryEngine;

    #[test]
    fn test_imported_interval_reaches_the_scheduler() {
        let patch = ConfigLoader::load_from_str(
            r#"{ "sampling_interval": 30, "shock_limit": 9.0 }"#,
            ConfigFormat::Json,
        )
        .unwrap();
        let config = ConfigLoader::resolve(EngineConfig::default(), &patch).unwrap();

        let engine = TelemetryEngine::new(config);
        assert_eq!(engine.status().interval_s, 30.0);
        assert_eq!(engine.config().thresholds.shock_limit, 9.0);
    }

    #[test]
    fn test_export_import_round_trip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = EngineConfig::default();
        config.thresholds.temp_max = 12.5;
        config.scheduler.interval_s = 10.0;
        std::fs::write(&path, ConfigLoader::export_json(&config).unwrap()).unwrap();

        let patch = ConfigLoader::load_from_path(&path).unwrap();
        let restored = ConfigLoader::resolve(EngineConfig::default(), &patch).unwrap();
        assert_eq!(restored.thresholds, config.thresholds);
        assert_eq!(restored.scheduler.interval_s, 10.0);
    }

    #[test]
    fn test_exported_config_has_all_six_keys() {
        let exported = ConfigLoader::export_json(&EngineConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&exported).unwrap();
        let object = value.as_object().unwrap();
        for key in [
            "temp_min",
            "temp_max",
            "hum_min",
            "hum_max",
            "shock_limit",
            "sampling_interval",
        ] {
            assert!(object.contains_key(key), "missing {key}");
        }
        assert_eq!(object.len(), 6);
    }
}

#[cfg(test)]
mod dropout_tests {
    use chrono::{Duration, TimeZone, Utc};

    use contracts::EngineConfig;
    use telemetry_engine::TelemetryEngine;

    /// Dropouts must flow through the whole pipeline as absent values:
    /// excluded from compliance, never flagged, serialized as empty.
    #[test]
    fn test_e2e_dropout_flow() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        let mut config = EngineConfig {
            seed: Some(9),
            ..Default::default()
        };
        config.dropout_enabled = true;
        config.history.autosave_every = 1;
        config.history.persist_path = Some(path.clone());

        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut engine = TelemetryEngine::new(config);
        engine.start(t0);
        for n in 0..200 {
            engine.tick(t0 + Duration::seconds(n * 5));
        }

        let dropped: usize = engine
            .history()
            .iter()
            .filter(|r| r.temperature.is_none() || r.humidity.is_none())
            .count();
        assert!(dropped > 0, "expected some dropouts at 2% over 200 samples");

        // Absent values never carry an anomaly flag
        for reading in engine.history() {
            if reading.temperature.is_none() {
                assert!(!reading.is_anomalous(contracts::Channel::Temperature));
            }
        }

        // And they survive a persistence round trip as absent
        let restored = history_store::load_csv(&path).unwrap();
        assert_eq!(restored.len(), engine.history().len());
        assert_eq!(restored, engine.history());
    }
}
