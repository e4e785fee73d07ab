//! CSV codec for the persisted history file.
//!
//! One row per reading: `timestamp,Temp,Humidity,Shock,lat,lon` plus the
//! optional `Anomaly<Channel>` boolean columns. Absent values serialize as
//! empty fields.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use contracts::{Channel, Reading, TelemetryError};

/// Flattened CSV row schema.
#[derive(Debug, Serialize, Deserialize)]
struct HistoryRow {
    timestamp: DateTime<Utc>,

    #[serde(rename = "Temp")]
    temperature: Option<f64>,

    #[serde(rename = "Humidity")]
    humidity: Option<f64>,

    #[serde(rename = "Shock")]
    shock: f64,

    lat: f64,
    lon: f64,

    #[serde(rename = "AnomalyTemp")]
    anomaly_temp: Option<bool>,

    #[serde(rename = "AnomalyHumidity")]
    anomaly_humidity: Option<bool>,

    #[serde(rename = "AnomalyShock")]
    anomaly_shock: Option<bool>,
}

impl From<&Reading> for HistoryRow {
    fn from(reading: &Reading) -> Self {
        Self {
            timestamp: reading.timestamp,
            temperature: reading.temperature,
            humidity: reading.humidity,
            shock: reading.shock,
            lat: reading.latitude,
            lon: reading.longitude,
            anomaly_temp: reading.anomalies.get(&Channel::Temperature).copied(),
            anomaly_humidity: reading.anomalies.get(&Channel::Humidity).copied(),
            anomaly_shock: reading.anomalies.get(&Channel::Shock).copied(),
        }
    }
}

impl From<HistoryRow> for Reading {
    fn from(row: HistoryRow) -> Self {
        let mut anomalies = BTreeMap::new();
        if let Some(flag) = row.anomaly_temp {
            anomalies.insert(Channel::Temperature, flag);
        }
        if let Some(flag) = row.anomaly_humidity {
            anomalies.insert(Channel::Humidity, flag);
        }
        if let Some(flag) = row.anomaly_shock {
            anomalies.insert(Channel::Shock, flag);
        }

        Reading {
            timestamp: row.timestamp,
            temperature: row.temperature,
            humidity: row.humidity,
            shock: row.shock,
            latitude: row.lat,
            longitude: row.lon,
            anomalies,
        }
    }
}

/// Rewrite `path` with the full history.
///
/// # Errors
/// Returns a persistence error on any IO or serialization failure; the
/// caller decides whether the failure is fatal (it is not for autosave).
pub fn save_csv(path: &Path, readings: &[Reading]) -> Result<(), TelemetryError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| TelemetryError::persistence(path, e.to_string()))?;

    for reading in readings {
        writer
            .serialize(HistoryRow::from(reading))
            .map_err(|e| TelemetryError::persistence(path, e.to_string()))?;
    }

    writer
        .flush()
        .map_err(|e| TelemetryError::persistence(path, e.to_string()))?;
    Ok(())
}

/// Load the full history from `path`.
///
/// # Errors
/// Returns a persistence error when the file cannot be read or a row does
/// not match the schema.
pub fn load_csv(path: &Path) -> Result<Vec<Reading>, TelemetryError> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| TelemetryError::persistence(path, e.to_string()))?;

    let mut readings = Vec::new();
    for row in reader.deserialize::<HistoryRow>() {
        let row = row.map_err(|e| TelemetryError::persistence(path, e.to_string()))?;
        readings.push(row.into());
    }
    Ok(readings)
}
