//! KpiReport / TickReport - Telemetry Engine output
//!
//! Summary structures consumed by the presentation layer.

use serde::{Deserialize, Serialize};

use crate::Reading;

/// Latest-value pass/fail flags per channel.
///
/// The default (all `true`) is also the initial alert-latch state, so the
/// first evaluation of a healthy history produces no transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelFlags {
    /// Temperature present and within bounds
    pub temp_ok: bool,

    /// Humidity present and within bounds
    pub hum_ok: bool,

    /// Shock at or below the limit
    pub shock_ok: bool,
}

impl Default for ChannelFlags {
    fn default() -> Self {
        Self {
            temp_ok: true,
            hum_ok: true,
            shock_ok: true,
        }
    }
}

impl ChannelFlags {
    /// All channels within bounds.
    pub fn all_ok(&self) -> bool {
        self.temp_ok && self.hum_ok && self.shock_ok
    }
}

/// Rolling compliance percentages over the entire history.
///
/// A channel is `None` when it has no recorded (non-absent) values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Compliance {
    /// % of recorded temperatures within bounds
    pub temperature: Option<f64>,

    /// % of recorded humidities within bounds
    pub humidity: Option<f64>,

    /// % of shock values at or below the limit
    pub shock: Option<f64>,
}

/// KPI summary derived from the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiReport {
    /// Most recent reading
    pub latest: Reading,

    /// Latest-value threshold flags
    pub flags: ChannelFlags,

    /// Whole-history compliance percentages
    pub compliance: Compliance,
}

/// Edge-triggered alert transition.
///
/// Emitted only when the flag tuple changes between evaluations, so a
/// persisting breach raises exactly one alert and one recovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "messages")]
pub enum AlertTransition {
    /// One or more channels left their bounds
    Breach(Vec<String>),

    /// All channels returned within bounds
    AllClear,
}

/// Outcome of one engine tick.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// Sample indices produced on this tick (empty while stopped or
    /// between due instants)
    pub produced: Vec<u64>,

    /// Current KPI summary; `None` while the history is empty
    pub kpi: Option<KpiReport>,

    /// Alert transition, if the flag tuple changed
    pub alert: Option<AlertTransition>,
}
