use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::models::{SensorReading, WalkReport};

/// Raw sensor payload as the endpoint serves it, nested by sensor chip.
/// Missing chips or fields decode as zero.
#[derive(Debug, Default, Deserialize)]
struct SensorPayload {
    #[serde(default)]
    mlx90614: Mlx90614Payload,
    #[serde(default)]
    bme280: Bme280Payload,
    #[serde(default)]
    solar_radiation: f64,
    #[serde(default)]
    timestamp: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Mlx90614Payload {
    /// Pavement (object) temperature in Celsius.
    #[serde(default)]
    object_temperature: f64,
    /// Ambient air temperature in Celsius.
    #[serde(default)]
    ambient_temperature: f64,
}

#[derive(Debug, Default, Deserialize)]
struct Bme280Payload {
    #[serde(default)]
    humidity: f64,
    #[serde(default)]
    pressure: f64,
}

#[derive(Debug, Deserialize)]
pub struct HealthPayload {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Walk report shape the server expects on upload.
#[derive(Debug, Serialize)]
struct WalkUpload<'a> {
    start_time: String,
    end_time: String,
    duration: u64,
    safe_time: u64,
    caution_time: u64,
    danger_time: u64,
    memo: &'a str,
}

impl<'a> From<&'a WalkReport> for WalkUpload<'a> {
    fn from(report: &'a WalkReport) -> Self {
        Self {
            start_time: report.started_at.to_rfc3339(),
            end_time: report.ended_at.to_rfc3339(),
            duration: report.duration_seconds,
            safe_time: report.tier_seconds.safe,
            caution_time: report.tier_seconds.caution,
            danger_time: report.tier_seconds.danger,
            memo: &report.memo,
        }
    }
}

#[derive(Clone)]
pub struct SensorClient {
    http: Client,
    base_url: String,
}

impl SensorClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
        })
    }

    /// Fetches the latest sensor snapshot. Non-2xx responses and timeouts
    /// are errors; the caller decides how to degrade.
    pub async fn fetch_data(&self) -> Result<SensorReading> {
        let url = format!("{}/api/sensors/data/", self.base_url);
        let payload: SensorPayload = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("sensor request to {url} failed"))?
            .error_for_status()
            .context("sensor endpoint returned an error status")?
            .json()
            .await
            .context("sensor payload was not valid JSON")?;

        Ok(map_payload(payload, Utc::now()))
    }

    /// Lightweight liveness probe; any 2xx `{status, timestamp}` counts as
    /// healthy.
    pub async fn check_health(&self) -> Result<HealthPayload> {
        let url = format!("{}/api/sensors/health/", self.base_url);
        self.http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("health request to {url} failed"))?
            .error_for_status()
            .context("health endpoint returned an error status")?
            .json()
            .await
            .context("health payload was not valid JSON")
    }

    /// Mirrors a completed walk to the server. Best-effort only; the local
    /// history store stays the source of truth.
    pub async fn upload_walk(&self, report: &WalkReport) -> Result<()> {
        let url = format!("{}/api/walks/", self.base_url);
        self.http
            .post(&url)
            .json(&WalkUpload::from(report))
            .send()
            .await
            .with_context(|| format!("walk upload to {url} failed"))?
            .error_for_status()
            .context("walk endpoint rejected the report")?;
        Ok(())
    }
}

fn map_payload(payload: SensorPayload, received_at: DateTime<Utc>) -> SensorReading {
    let observed_at = payload
        .timestamp
        .as_deref()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(received_at);

    SensorReading {
        surface_temp: payload.mlx90614.object_temperature,
        air_temp: payload.mlx90614.ambient_temperature,
        humidity: payload.bme280.humidity,
        pressure: payload.bme280.pressure,
        solar_radiation: payload.solar_radiation,
        observed_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn maps_nested_payload_to_flat_reading() {
        let json = r#"{
            "mlx90614": { "object_temperature": 41.2, "ambient_temperature": 33.5 },
            "bme280": { "humidity": 58.0, "pressure": 1009.4 },
            "solar_radiation": 712.0,
            "timestamp": "2025-08-01T12:30:00+09:00"
        }"#;

        let payload: SensorPayload = serde_json::from_str(json).unwrap();
        let received_at = Utc.with_ymd_and_hms(2025, 8, 1, 4, 0, 0).unwrap();
        let reading = map_payload(payload, received_at);

        assert_eq!(reading.surface_temp, 41.2);
        assert_eq!(reading.air_temp, 33.5);
        assert_eq!(reading.humidity, 58.0);
        assert_eq!(reading.pressure, 1009.4);
        assert_eq!(reading.solar_radiation, 712.0);
        assert_eq!(
            reading.observed_at,
            Utc.with_ymd_and_hms(2025, 8, 1, 3, 30, 0).unwrap()
        );
    }

    #[test]
    fn missing_chips_decode_to_zero() {
        let payload: SensorPayload = serde_json::from_str("{}").unwrap();
        let received_at = Utc.with_ymd_and_hms(2025, 8, 1, 4, 0, 0).unwrap();
        let reading = map_payload(payload, received_at);

        assert_eq!(reading.surface_temp, 0.0);
        assert_eq!(reading.humidity, 0.0);
        assert_eq!(reading.observed_at, received_at);
    }

    #[test]
    fn bad_timestamp_falls_back_to_receive_time() {
        let json = r#"{ "timestamp": "yesterday-ish" }"#;
        let payload: SensorPayload = serde_json::from_str(json).unwrap();
        let received_at = Utc.with_ymd_and_hms(2025, 8, 1, 4, 0, 0).unwrap();

        assert_eq!(map_payload(payload, received_at).observed_at, received_at);
    }

    #[test]
    fn walk_upload_uses_server_field_names() {
        let started_at = Utc.with_ymd_and_hms(2025, 8, 1, 9, 0, 0).unwrap();
        let report = WalkReport {
            id: started_at.to_rfc3339(),
            started_at,
            ended_at: started_at + chrono::Duration::seconds(300),
            duration_seconds: 300,
            tier_seconds: crate::models::TierSeconds {
                safe: 100,
                caution: 150,
                danger: 50,
            },
            memo: "around the block".to_string(),
        };

        let value = serde_json::to_value(WalkUpload::from(&report)).unwrap();
        assert_eq!(value["duration"], 300);
        assert_eq!(value["safe_time"], 100);
        assert_eq!(value["caution_time"], 150);
        assert_eq!(value["danger_time"], 50);
        assert_eq!(value["memo"], "around the block");
        assert!(value["start_time"].as_str().unwrap().starts_with("2025-08-01T09:00:00"));
    }
}
