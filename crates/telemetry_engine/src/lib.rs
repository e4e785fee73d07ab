//! # Telemetry Engine
//!
//! Tick-driven simulation core: wall-clock sampling scheduler, rolling
//! z-score anomaly baseline, KPI/compliance evaluation, and the
//! [`TelemetryEngine`] facade that wires them to the signal generator and
//! the history store.
//!
//! The engine is single-threaded and owns all of its state; the host calls
//! [`TelemetryEngine::tick`] with the current instant on whatever cadence
//! it likes, and the scheduler decides how many samples are due (including
//! bounded catch-up after a gap).

mod baseline;
mod engine;
mod kpi;
mod scheduler;

pub use baseline::BaselineTracker;
pub use engine::TelemetryEngine;
pub use kpi::{evaluate, AlertLatch};
pub use scheduler::{DueSample, SampleScheduler};
