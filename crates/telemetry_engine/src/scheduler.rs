//! Wall-clock sampling scheduler with bounded catch-up.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use contracts::SchedulerConfig;

/// One sample the scheduler decided is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueSample {
    /// Sample index to generate
    pub index: u64,

    /// The slot's scheduled instant (not the generation instant)
    pub due_at: DateTime<Utc>,
}

/// Fixed-cadence scheduler state.
///
/// `next_sample_due` advances by exactly one interval per produced sample
/// and is never snapped to `now`, so slow ticks cause catch-up instead of
/// cumulative drift. Catch-up within one tick stops once the just-produced
/// slot lags `now` by more than `catchup_intervals` intervals; the
/// remaining backlog drains across subsequent ticks.
#[derive(Debug)]
pub struct SampleScheduler {
    interval_s: f64,
    catchup_intervals: f64,
    running: bool,
    sample_index: u64,
    last_sample_at: Option<DateTime<Utc>>,
    next_sample_due: Option<DateTime<Utc>>,
}

impl SampleScheduler {
    /// Create a stopped scheduler in its initial state.
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            interval_s: config.interval_s,
            catchup_intervals: config.catchup_intervals,
            running: false,
            sample_index: 0,
            last_sample_at: None,
            next_sample_due: None,
        }
    }

    /// Continue counting from `index` (used after a history restore).
    pub fn resume_at(&mut self, index: u64) {
        self.sample_index = index;
    }

    /// Begin producing; an engine with no prior sample gets its first one
    /// on the next tick rather than after a full interval.
    pub fn start(&mut self, now: DateTime<Utc>) {
        self.running = true;
        if self.last_sample_at.is_none() {
            self.next_sample_due = Some(now);
        }
    }

    /// Freeze production without touching counters or the schedule.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Return to the initial state: index 0, no schedule, stopped.
    pub fn reset(&mut self) {
        self.running = false;
        self.sample_index = 0;
        self.last_sample_at = None;
        self.next_sample_due = None;
    }

    /// Change the cadence; takes effect from the next produced sample.
    pub fn set_interval(&mut self, interval_s: f64) {
        self.interval_s = interval_s;
    }

    /// Record the instant of a produced reading.
    pub fn mark_sampled(&mut self, at: DateTime<Utc>) {
        self.last_sample_at = Some(at);
    }

    /// Samples due at `now`, advancing the schedule for each.
    ///
    /// Returns nothing while stopped. An unset schedule initializes to
    /// `now`, which forces an immediate first sample.
    pub fn due(&mut self, now: DateTime<Utc>) -> Vec<DueSample> {
        if !self.running || !(self.interval_s > 0.0) {
            return Vec::new();
        }

        let interval = Duration::milliseconds((self.interval_s * 1000.0).round() as i64);
        let max_lag_s = self.interval_s * self.catchup_intervals;

        let mut next = self.next_sample_due.unwrap_or(now);
        let mut due = Vec::new();

        while now >= next {
            due.push(DueSample {
                index: self.sample_index,
                due_at: next,
            });
            self.sample_index += 1;

            let lag_s = (now - next).num_milliseconds() as f64 / 1000.0;
            next += interval;

            if lag_s > max_lag_s {
                debug!(lag_s, max_lag_s, "catch-up bound hit, deferring backlog");
                break;
            }
        }

        self.next_sample_due = Some(next);
        due
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn sample_index(&self) -> u64 {
        self.sample_index
    }

    pub fn interval_s(&self) -> f64 {
        self.interval_s
    }

    pub fn last_sample_at(&self) -> Option<DateTime<Utc>> {
        self.last_sample_at
    }

    pub fn next_sample_due(&self) -> Option<DateTime<Utc>> {
        self.next_sample_due
    }
}
