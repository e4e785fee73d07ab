//! Seeded synthetic signal generator.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use contracts::Reading;

// Temperature: slow sinusoidal drift around the cold-chain setpoint.
const TEMP_BASE: f64 = 5.0;
const TEMP_DRIFT_AMPLITUDE: f64 = 1.2;
const TEMP_DRIFT_PERIOD: f64 = 18.0;
const TEMP_NOISE: f64 = 1.2;

// Humidity: wider drift, clamped to the sensor's reporting range.
const HUM_BASE: f64 = 40.0;
const HUM_DRIFT_AMPLITUDE: f64 = 6.0;
const HUM_DRIFT_PERIOD: f64 = 27.0;
const HUM_NOISE: f64 = 4.5;
const HUM_FLOOR: f64 = 5.0;
const HUM_CEIL: f64 = 95.0;

// Shock: mostly low-level vibration, occasional spike events.
const SHOCK_SPIKE_PROB: f64 = 0.05;
const SHOCK_SPIKE_MIN: f64 = 6.0;
const SHOCK_SPIKE_MAX: f64 = 11.0;
const SHOCK_BASE_MAX: f64 = 4.5;

// Probability that an optional channel drops out, per reading.
const DROPOUT_PROB: f64 = 0.02;

// Route: circular drift around a fixed depot with per-axis GPS jitter.
const ROUTE_CENTER_LAT: f64 = 28.61;
const ROUTE_CENTER_LON: f64 = 77.21;
const ROUTE_RADIUS: f64 = 0.004;
const ROUTE_ANGLE_PERIOD: f64 = 24.0;
const ROUTE_JITTER: f64 = 0.0007;

/// Synthetic reading generator.
///
/// Owns the RNG; the draw sequence per reading is fixed, so two generators
/// with the same seed produce identical series for the same indices.
#[derive(Debug)]
pub struct SignalGenerator {
    rng: StdRng,
    dropout_enabled: bool,
}

impl SignalGenerator {
    /// Create a generator; `None` seeds from the OS.
    pub fn new(seed: Option<u64>, dropout_enabled: bool) -> Self {
        Self {
            rng: Self::rng_from(seed),
            dropout_enabled,
        }
    }

    /// Replace the RNG with a freshly seeded one.
    pub fn reseed(&mut self, seed: Option<u64>) {
        debug!(?seed, "signal generator reseeded");
        self.rng = Self::rng_from(seed);
    }

    /// Toggle simulated sensor dropouts on the optional channels.
    pub fn set_dropout(&mut self, enabled: bool) {
        self.dropout_enabled = enabled;
    }

    /// Produce the reading for `index`, stamped with `at`.
    pub fn generate(&mut self, index: u64, at: DateTime<Utc>) -> Reading {
        let idx = index as f64;

        let base_temp = TEMP_BASE + (idx / TEMP_DRIFT_PERIOD).sin() * TEMP_DRIFT_AMPLITUDE;
        let temp = round2(base_temp + self.rng.random_range(-TEMP_NOISE..=TEMP_NOISE));

        let base_hum = HUM_BASE + (idx / HUM_DRIFT_PERIOD).sin() * HUM_DRIFT_AMPLITUDE;
        let hum = round2(base_hum + self.rng.random_range(-HUM_NOISE..=HUM_NOISE))
            .clamp(HUM_FLOOR, HUM_CEIL);

        let shock = if self.rng.random::<f64>() < SHOCK_SPIKE_PROB {
            round2(self.rng.random_range(SHOCK_SPIKE_MIN..=SHOCK_SPIKE_MAX))
        } else {
            round2(self.rng.random_range(0.0..=SHOCK_BASE_MAX))
        };

        let temperature = self.maybe_drop(temp);
        let humidity = self.maybe_drop(hum);

        let angle = idx / ROUTE_ANGLE_PERIOD;
        let latitude = round6(
            ROUTE_CENTER_LAT
                + ROUTE_RADIUS * angle.cos()
                + self.rng.random_range(-ROUTE_JITTER..=ROUTE_JITTER),
        );
        let longitude = round6(
            ROUTE_CENTER_LON
                + ROUTE_RADIUS * angle.sin()
                + self.rng.random_range(-ROUTE_JITTER..=ROUTE_JITTER),
        );

        Reading {
            timestamp: at,
            temperature,
            humidity,
            shock,
            latitude,
            longitude,
            anomalies: Default::default(),
        }
    }

    /// Drop the value with `DROPOUT_PROB` when dropouts are enabled.
    ///
    /// The draw is independent per channel and only taken while enabled,
    /// so the dropout-off draw sequence is unaffected by the toggle.
    fn maybe_drop(&mut self, value: f64) -> Option<f64> {
        if self.dropout_enabled && self.rng.random::<f64>() < DROPOUT_PROB {
            None
        } else {
            Some(value)
        }
    }

    fn rng_from(seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}
