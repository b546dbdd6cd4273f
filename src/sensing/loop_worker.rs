use log::{debug, info, warn};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::client::SensorClient;
use super::hub::SensorHub;
use super::synthetic;

/// Polls the sensor endpoint on a fixed interval until cancelled. Failures
/// never escape this loop: the hub is marked disconnected and a synthetic
/// reading keeps the consumer side populated.
pub async fn poll_loop(
    client: SensorClient,
    hub: SensorHub,
    interval: Duration,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match client.fetch_data().await {
                    Ok(reading) => {
                        debug!(
                            "sensor poll ok: surface {:.1}C air {:.1}C",
                            reading.surface_temp, reading.air_temp
                        );
                        hub.record_success(reading);
                    }
                    Err(err) => {
                        let retries = hub.snapshot().retry_count + 1;
                        warn!("sensor poll failed (attempt {retries}), substituting synthetic data: {err:#}");
                        hub.record_failure(format!("{err:#}"), synthetic::plausible_reading());
                    }
                }
            }
            _ = cancel_token.cancelled() => {
                info!("sensor poll loop shutting down");
                break;
            }
        }
    }
}

/// Independent low-frequency probe that only refreshes the connection flag.
pub async fn health_loop(
    client: SensorClient,
    hub: SensorHub,
    interval: Duration,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match client.check_health().await {
                    Ok(health) => {
                        debug!("sensor health ok: {}", health.status);
                        hub.record_health(true, None);
                    }
                    Err(err) => {
                        warn!("sensor health check failed: {err:#}");
                        hub.record_health(false, Some(format!("{err:#}")));
                    }
                }
            }
            _ = cancel_token.cancelled() => {
                info!("sensor health loop shutting down");
                break;
            }
        }
    }
}
