use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, RwLock};

use crate::models::SensorReading;

/// Connection and reading state shared between the sensing loops and
/// everything that consumes sensor data.
///
/// `is_connected == false` while a reading is present means the reading is
/// synthetic fallback data, not a live measurement.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorSnapshot {
    pub reading: Option<SensorReading>,
    pub is_connected: bool,
    pub last_error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    pub retry_count: u32,
}

/// Single owner of the latest sensor snapshot. Writers are the poll and
/// health loops; readers are the walk ticker and the display layer.
#[derive(Clone, Default)]
pub struct SensorHub {
    inner: Arc<RwLock<SensorSnapshot>>,
}

impl SensorHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SensorSnapshot {
        self.inner.read().unwrap().clone()
    }

    /// Surface temperature of the most recent reading, live or synthetic.
    pub fn surface_temp(&self) -> Option<f64> {
        self.inner
            .read()
            .unwrap()
            .reading
            .as_ref()
            .map(|reading| reading.surface_temp)
    }

    pub fn is_connected(&self) -> bool {
        self.inner.read().unwrap().is_connected
    }

    pub fn record_success(&self, reading: SensorReading) {
        let mut guard = self.inner.write().unwrap();
        guard.reading = Some(reading);
        guard.is_connected = true;
        guard.last_error = None;
        guard.last_updated = Some(Utc::now());
        guard.retry_count = 0;
    }

    /// Records a failed poll together with the synthetic reading that stands
    /// in for it, so consumers stay populated while clearly disconnected.
    pub fn record_failure(&self, error: String, fallback: SensorReading) {
        let mut guard = self.inner.write().unwrap();
        guard.reading = Some(fallback);
        guard.is_connected = false;
        guard.last_error = Some(error);
        guard.last_updated = Some(Utc::now());
        guard.retry_count = guard.retry_count.saturating_add(1);
    }

    /// Health-check result; only touches the connection flag, never the
    /// cached reading.
    pub fn record_health(&self, connected: bool, error: Option<String>) {
        let mut guard = self.inner.write().unwrap();
        guard.is_connected = connected;
        if connected {
            guard.last_error = None;
        } else if let Some(message) = error {
            guard.last_error = Some(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reading(surface_temp: f64) -> SensorReading {
        SensorReading {
            surface_temp,
            air_temp: 26.0,
            humidity: 65.0,
            pressure: 1013.0,
            solar_radiation: 650.0,
            observed_at: Utc.with_ymd_and_hms(2025, 8, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn starts_empty_and_disconnected() {
        let hub = SensorHub::new();
        let snapshot = hub.snapshot();

        assert!(snapshot.reading.is_none());
        assert!(!snapshot.is_connected);
        assert!(hub.surface_temp().is_none());
    }

    #[test]
    fn success_marks_connected_and_resets_retries() {
        let hub = SensorHub::new();
        hub.record_failure("down".into(), reading(28.0));
        hub.record_failure("down".into(), reading(28.0));
        assert_eq!(hub.snapshot().retry_count, 2);

        hub.record_success(reading(31.5));

        let snapshot = hub.snapshot();
        assert!(snapshot.is_connected);
        assert_eq!(snapshot.retry_count, 0);
        assert!(snapshot.last_error.is_none());
        assert_eq!(hub.surface_temp(), Some(31.5));
    }

    #[test]
    fn failure_keeps_data_visible_but_disconnected() {
        let hub = SensorHub::new();
        hub.record_failure("connection refused".into(), reading(27.2));

        let snapshot = hub.snapshot();
        assert!(!hub.is_connected());
        assert_eq!(snapshot.last_error.as_deref(), Some("connection refused"));
        assert_eq!(hub.surface_temp(), Some(27.2));
    }

    #[test]
    fn health_check_does_not_replace_reading() {
        let hub = SensorHub::new();
        hub.record_success(reading(30.0));

        hub.record_health(false, Some("timeout".into()));

        let snapshot = hub.snapshot();
        assert!(!snapshot.is_connected);
        assert_eq!(hub.surface_temp(), Some(30.0));
    }
}
