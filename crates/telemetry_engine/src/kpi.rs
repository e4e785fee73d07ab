//! KPI/compliance evaluation and the edge-triggered alert latch.

use contracts::{
    AlertTransition, ChannelFlags, Compliance, KpiReport, Reading, Thresholds,
};

/// Evaluate the KPI summary over the full history.
///
/// Returns `None` for an empty history. Compliance is computed over every
/// recorded value, not just a display window; absent values are excluded.
pub fn evaluate(history: &[Reading], thresholds: &Thresholds) -> Option<KpiReport> {
    let latest = history.last()?.clone();

    let flags = ChannelFlags {
        temp_ok: latest
            .temperature
            .is_some_and(|v| thresholds.temp_in_range(v)),
        hum_ok: latest.humidity.is_some_and(|v| thresholds.hum_in_range(v)),
        shock_ok: thresholds.shock_in_range(latest.shock),
    };

    let compliance = Compliance {
        temperature: percent_within(history.iter().filter_map(|r| r.temperature), |v| {
            thresholds.temp_in_range(v)
        }),
        humidity: percent_within(history.iter().filter_map(|r| r.humidity), |v| {
            thresholds.hum_in_range(v)
        }),
        shock: percent_within(history.iter().map(|r| r.shock), |v| {
            thresholds.shock_in_range(v)
        }),
    };

    Some(KpiReport {
        latest,
        flags,
        compliance,
    })
}

fn percent_within(
    values: impl Iterator<Item = f64>,
    in_range: impl Fn(f64) -> bool,
) -> Option<f64> {
    let (mut total, mut ok) = (0u64, 0u64);
    for value in values {
        total += 1;
        if in_range(value) {
            ok += 1;
        }
    }
    (total > 0).then(|| ok as f64 / total as f64 * 100.0)
}

/// Edge-triggered alert state.
///
/// Tracks the last seen flag tuple; a transition is emitted only when the
/// tuple changes, so a breach that persists across many evaluations raises
/// a single alert (and a single all-clear on recovery).
#[derive(Debug, Default)]
pub struct AlertLatch {
    last: ChannelFlags,
}

impl AlertLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare the report's flags against the latched tuple.
    pub fn observe(
        &mut self,
        report: &KpiReport,
        thresholds: &Thresholds,
    ) -> Option<AlertTransition> {
        if report.flags == self.last {
            return None;
        }
        self.last = report.flags;

        if report.flags.all_ok() {
            return Some(AlertTransition::AllClear);
        }
        Some(AlertTransition::Breach(breach_messages(report, thresholds)))
    }

    /// Return to the initial all-ok tuple.
    pub fn reset(&mut self) {
        self.last = ChannelFlags::default();
    }
}

fn breach_messages(report: &KpiReport, thresholds: &Thresholds) -> Vec<String> {
    let latest = &report.latest;
    let mut messages = Vec::new();

    if !report.flags.temp_ok {
        messages.push(match latest.temperature {
            Some(v) => format!("Temp {v}°C out of range"),
            None => "Temp reading missing".to_string(),
        });
    }
    if !report.flags.hum_ok {
        messages.push(match latest.humidity {
            Some(v) => format!("Humidity {v}% out of range"),
            None => "Humidity reading missing".to_string(),
        });
    }
    if !report.flags.shock_ok {
        messages.push(format!(
            "Shock {} > {}",
            latest.shock, thresholds.shock_limit
        ));
    }

    messages
}
