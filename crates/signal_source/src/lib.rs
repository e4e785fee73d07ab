//! # Signal Source
//!
//! Synthetic telemetry generation for the simulated transport vehicle.
//!
//! Produces one [`contracts::Reading`] per sample index: slowly drifting
//! temperature and humidity with uniform noise, mostly-low shock with
//! occasional spikes, and a jittered circular route around a fixed center.
//! Deterministic for a given seed and draw sequence.

mod generator;

pub use generator::SignalGenerator;
