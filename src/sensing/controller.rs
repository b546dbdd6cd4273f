use anyhow::{bail, Context, Result};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::client::SensorClient;
use super::hub::SensorHub;
use super::loop_worker::{health_loop, poll_loop};

/// Owns the data-poll and health-check tasks. Both run under one
/// cancellation token so stopping the controller tears down every loop
/// rather than leaving orphaned tickers behind.
pub struct SensingController {
    handles: Vec<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl SensingController {
    pub fn new() -> Self {
        Self {
            handles: Vec::new(),
            cancel_token: None,
        }
    }

    pub fn start(
        &mut self,
        client: SensorClient,
        hub: SensorHub,
        poll_interval: Duration,
        health_interval: Duration,
    ) -> Result<()> {
        if self.cancel_token.is_some() {
            bail!("sensing already active");
        }

        let cancel_token = CancellationToken::new();

        self.handles.push(tokio::spawn(poll_loop(
            client.clone(),
            hub.clone(),
            poll_interval,
            cancel_token.clone(),
        )));
        self.handles.push(tokio::spawn(health_loop(
            client,
            hub,
            health_interval,
            cancel_token.clone(),
        )));

        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        for handle in self.handles.drain(..) {
            handle
                .await
                .context("sensing loop task failed to join")?;
        }
        Ok(())
    }
}

impl Default for SensingController {
    fn default() -> Self {
        Self::new()
    }
}
