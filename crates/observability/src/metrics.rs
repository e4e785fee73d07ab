//! Telemetry metrics collection
//!
//! Prometheus-facing record helpers plus an in-memory aggregator for the
//! host's end-of-run summary.

use std::collections::BTreeMap;

use metrics::gauge;

use contracts::{AlertTransition, Channel, KpiReport, Reading};

/// Record KPI gauges from an evaluation.
///
/// Call once per tick when a report is available.
pub fn record_kpi_metrics(report: &KpiReport) {
    if let Some(v) = report.latest.temperature {
        gauge!("coldchain_latest_value", "channel" => Channel::Temperature.as_str()).set(v);
    }
    if let Some(v) = report.latest.humidity {
        gauge!("coldchain_latest_value", "channel" => Channel::Humidity.as_str()).set(v);
    }
    gauge!("coldchain_latest_value", "channel" => Channel::Shock.as_str()).set(report.latest.shock);

    let compliance = [
        (Channel::Temperature, report.compliance.temperature),
        (Channel::Humidity, report.compliance.humidity),
        (Channel::Shock, report.compliance.shock),
    ];
    for (channel, value) in compliance {
        if let Some(pct) = value {
            gauge!("coldchain_compliance_pct", "channel" => channel.as_str()).set(pct);
        }
    }
}

/// In-memory run aggregator.
///
/// Collects per-reading statistics and alert counts so the host can print
/// a summary without replaying the history.
#[derive(Debug, Clone, Default)]
pub struct TelemetryAggregator {
    /// Total readings observed
    pub total_samples: u64,

    /// Readings with at least one dropped-out channel
    pub samples_with_dropout: u64,

    /// Breach transitions
    pub breaches: u64,

    /// All-clear transitions
    pub all_clears: u64,

    /// Anomaly flag counts per channel
    pub anomaly_counts: BTreeMap<Channel, u64>,

    /// Temperature value statistics
    pub temperature_stats: RunningStats,

    /// Humidity value statistics
    pub humidity_stats: RunningStats,

    /// Shock value statistics
    pub shock_stats: RunningStats,
}

impl TelemetryAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one reading into the aggregate.
    pub fn observe_reading(&mut self, reading: &Reading) {
        self.total_samples += 1;

        if reading.temperature.is_none() || reading.humidity.is_none() {
            self.samples_with_dropout += 1;
        }
        if let Some(v) = reading.temperature {
            self.temperature_stats.push(v);
        }
        if let Some(v) = reading.humidity {
            self.humidity_stats.push(v);
        }
        self.shock_stats.push(reading.shock);

        for (&channel, &flagged) in &reading.anomalies {
            if flagged {
                *self.anomaly_counts.entry(channel).or_insert(0) += 1;
            }
        }
    }

    /// Fold one alert transition into the aggregate.
    pub fn observe_alert(&mut self, transition: &AlertTransition) {
        match transition {
            AlertTransition::Breach(_) => self.breaches += 1,
            AlertTransition::AllClear => self.all_clears += 1,
        }
    }

    /// Produce the summary report.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            total_samples: self.total_samples,
            samples_with_dropout: self.samples_with_dropout,
            dropout_rate: if self.total_samples > 0 {
                self.samples_with_dropout as f64 / self.total_samples as f64 * 100.0
            } else {
                0.0
            },
            breaches: self.breaches,
            all_clears: self.all_clears,
            temperature: StatsSummary::from(&self.temperature_stats),
            humidity: StatsSummary::from(&self.humidity_stats),
            shock: StatsSummary::from(&self.shock_stats),
            anomaly_counts: self.anomaly_counts.clone(),
        }
    }

    /// Reset all aggregates.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Aggregated run summary
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub total_samples: u64,
    pub samples_with_dropout: u64,
    pub dropout_rate: f64,
    pub breaches: u64,
    pub all_clears: u64,
    pub temperature: StatsSummary,
    pub humidity: StatsSummary,
    pub shock: StatsSummary,
    pub anomaly_counts: BTreeMap<Channel, u64>,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Telemetry Run Summary ===")?;
        writeln!(f, "Samples: {}", self.total_samples)?;
        writeln!(
            f,
            "Dropouts: {} ({:.2}%)",
            self.samples_with_dropout, self.dropout_rate
        )?;
        writeln!(
            f,
            "Alert transitions: {} breach / {} all-clear",
            self.breaches, self.all_clears
        )?;
        writeln!(f, "Temp (°C): {}", self.temperature)?;
        writeln!(f, "Humidity (%): {}", self.humidity)?;
        writeln!(f, "Shock: {}", self.shock)?;

        if !self.anomaly_counts.is_empty() {
            writeln!(f, "Anomaly flags:")?;
            for (channel, count) in &self.anomaly_counts {
                writeln!(f, "  {channel}: {count}")?;
            }
        }

        Ok(())
    }
}

/// Statistics snapshot
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics calculator (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a value
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
