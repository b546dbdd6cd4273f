use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One environmental snapshot. Replaced wholesale on each poll, never
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    /// Road-surface temperature in Celsius.
    pub surface_temp: f64,
    /// Air temperature in Celsius.
    pub air_temp: f64,
    /// Relative humidity, 0-100.
    pub humidity: f64,
    /// Barometric pressure in hPa.
    pub pressure: f64,
    /// Solar radiation in W/m².
    pub solar_radiation: f64,
    pub observed_at: DateTime<Utc>,
}
