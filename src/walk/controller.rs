use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use log::{info, warn};
use tokio::{sync::Mutex, task::JoinHandle, time};

use crate::{
    classifier::{classify, SafetyTier},
    history::HistoryStore,
    models::WalkReport,
    sensing::{SensorClient, SensorHub},
    settings::SettingsStore,
};

use super::state::{WalkState, WalkStatus};

/// Surface temperature at which a long walk earns a reminder.
const WALK_TIME_ALERT_MIN_SURFACE_C: f64 = 30.0;
const WALK_TIME_ALERT_SECS: u64 = 20 * 60;

/// Single mutation entry point for the walk lifecycle. Every transition is
/// validated here; nothing else touches the accumulator.
#[derive(Clone)]
pub struct WalkController {
    state: Arc<Mutex<WalkState>>,
    history: HistoryStore,
    settings: SettingsStore,
    hub: SensorHub,
    client: SensorClient,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    tick_interval: Duration,
    pending_report: Arc<Mutex<Option<WalkReport>>>,
}

impl WalkController {
    pub fn new(
        history: HistoryStore,
        settings: SettingsStore,
        hub: SensorHub,
        client: SensorClient,
        tick_interval: Duration,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(WalkState::new())),
            history,
            settings,
            hub,
            client,
            ticker: Arc::new(Mutex::new(None)),
            tick_interval,
            pending_report: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn get_state(&self) -> WalkState {
        self.state.lock().await.clone()
    }

    pub async fn start_walk(&self) -> Result<WalkState> {
        {
            let state = self.state.lock().await;
            if state.status != WalkStatus::Idle {
                return Err(anyhow!("walk already in progress"));
            }
        }

        let started_at = Utc::now();
        {
            let mut state = self.state.lock().await;
            state.begin_walk(started_at);
        }

        self.spawn_ticker().await;
        info!("walk started at {started_at}");

        Ok(self.get_state().await)
    }

    /// Ends the active walk: tears the ticker down, resets the accumulator,
    /// then appends the report to history. The accumulator is reset before
    /// the append, so a failed save can never double-count ticks; the built
    /// report is retained for [`Self::retry_pending_save`].
    pub async fn end_walk(&self) -> Result<WalkReport> {
        let ended_at = Utc::now();

        let report = {
            let mut state = self.state.lock().await;
            if state.status == WalkStatus::Idle {
                return Err(anyhow!("no active walk to end"));
            }
            let report = state.to_report(ended_at);
            state.reset();
            report
        };

        self.cancel_ticker().await;
        info!(
            "walk ended: {}s total ({}s safe, {}s caution, {}s danger)",
            report.duration_seconds,
            report.tier_seconds.safe,
            report.tier_seconds.caution,
            report.tier_seconds.danger
        );

        if let Err(err) = self.history.append(report.clone()) {
            *self.pending_report.lock().await = Some(report);
            return Err(anyhow::Error::new(err)
                .context("walk ended but the report could not be saved; retry to save it"));
        }

        self.mirror_to_server(report.clone());
        Ok(report)
    }

    /// Re-attempts the append of a report whose save failed at walk end.
    /// Returns `Ok(None)` when there is nothing pending.
    pub async fn retry_pending_save(&self) -> Result<Option<WalkReport>> {
        let mut pending = self.pending_report.lock().await;
        let Some(report) = pending.clone() else {
            return Ok(None);
        };

        self.history
            .append(report.clone())
            .context("retrying the walk report save failed")?;
        *pending = None;

        self.mirror_to_server(report.clone());
        Ok(Some(report))
    }

    /// App teardown: halts the ticker without persisting anything. An
    /// abandoned walk in progress is lost, matching a closed browser tab.
    pub async fn shutdown(&self) {
        self.cancel_ticker().await;
        let mut state = self.state.lock().await;
        if state.is_active() {
            warn!("shutting down with a walk in progress; discarding it");
            state.reset();
        }
    }

    fn mirror_to_server(&self, report: WalkReport) {
        let client = self.client.clone();
        tokio::spawn(async move {
            if let Err(err) = client.upload_walk(&report).await {
                warn!("best-effort walk upload failed: {err:#}");
            }
        });
    }

    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let state = self.state.clone();
        let hub = self.hub.clone();
        let settings = self.settings.clone();
        let tick_interval = self.tick_interval;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(tick_interval);
            // The first tick completes immediately; swallow it so a second
            // is only attributed after a full interval has passed.
            interval.tick().await;

            let mut previous_tier: Option<SafetyTier> = None;
            let mut walk_time_alert_fired = false;

            loop {
                interval.tick().await;

                // A missing cache (no poll completed yet) classifies as
                // Danger, same as any unreadable temperature.
                let surface_temp = hub.surface_temp().unwrap_or(f64::NAN);
                let tier = classify(surface_temp);

                let elapsed = {
                    let mut guard = state.lock().await;
                    if guard.status != WalkStatus::Active {
                        break;
                    }
                    guard.tick(tier);
                    guard.elapsed_seconds
                };

                let prefs = settings.current();

                if prefs.danger_alert_enabled
                    && tier == SafetyTier::Danger
                    && previous_tier != Some(SafetyTier::Danger)
                {
                    warn!("surface temperature entered the danger tier ({surface_temp:.1}C)");
                }
                previous_tier = Some(tier);

                if prefs.walk_time_alert_enabled
                    && !walk_time_alert_fired
                    && elapsed >= WALK_TIME_ALERT_SECS
                    && surface_temp >= WALK_TIME_ALERT_MIN_SURFACE_C
                {
                    warn!(
                        "walk has reached {} minutes on hot pavement; consider heading home",
                        elapsed / 60
                    );
                    walk_time_alert_fired = true;
                }
            }
        });

        *ticker_guard = Some(handle);
    }

    async fn cancel_ticker(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use std::path::PathBuf;

    fn scratch_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pawsense-walk-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    fn build_controller(test_name: &str) -> (WalkController, HistoryStore) {
        let history = HistoryStore::new(scratch_path(&format!("{test_name}-history.json"))).unwrap();
        let settings =
            SettingsStore::new(scratch_path(&format!("{test_name}-settings.json"))).unwrap();
        let hub = SensorHub::new();
        let client = SensorClient::new(&AppConfig::default()).unwrap();
        let controller = WalkController::new(
            history.clone(),
            settings,
            hub,
            client,
            Duration::from_secs(1),
        );
        (controller, history)
    }

    #[tokio::test]
    async fn start_while_active_is_rejected() {
        let (controller, _) = build_controller("double-start");

        controller.start_walk().await.unwrap();
        let err = controller.start_walk().await.unwrap_err();
        assert!(err.to_string().contains("already in progress"));

        controller.shutdown().await;
    }

    #[tokio::test]
    async fn end_while_idle_is_rejected() {
        let (controller, _) = build_controller("idle-end");

        let err = controller.end_walk().await.unwrap_err();
        assert!(err.to_string().contains("no active walk"));
    }

    #[tokio::test]
    async fn immediate_end_records_zero_duration_walk() {
        let (controller, history) = build_controller("zero-duration");

        let state = controller.start_walk().await.unwrap();
        assert!(state.is_active());

        let report = controller.end_walk().await.unwrap();
        assert_eq!(report.duration_seconds, 0);
        assert_eq!(report.tier_seconds.total(), 0);

        let listed = history.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], report);

        assert!(!controller.get_state().await.is_active());
    }

    #[tokio::test]
    async fn ended_walk_is_newest_in_history() {
        let (controller, history) = build_controller("newest-first");

        controller.start_walk().await.unwrap();
        let first = controller.end_walk().await.unwrap();

        controller.start_walk().await.unwrap();
        let second = controller.end_walk().await.unwrap();

        let listed = history.list();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].started_at, second.started_at);
        assert_eq!(listed[1].started_at, first.started_at);
    }

    #[tokio::test]
    async fn retry_with_nothing_pending_is_a_no_op() {
        let (controller, _) = build_controller("no-pending");
        assert!(controller.retry_pending_save().await.unwrap().is_none());
    }
}
