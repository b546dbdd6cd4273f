use std::{path::PathBuf, time::Duration};

const DEFAULT_API_BASE_URL: &str = "http://localhost:8001";
const DEFAULT_DATA_DIR: &str = ".pawsense";
const DEFAULT_POLL_SECS: u64 = 2;
const DEFAULT_HEALTH_SECS: u64 = 30;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the sensor endpoint.
    pub api_base_url: String,
    /// Directory holding settings.json and walk_reports.json.
    pub data_dir: PathBuf,
    /// Period of the sensor data poll.
    pub poll_interval: Duration,
    /// Period of the connection health check.
    pub health_interval: Duration,
    /// Period of the walk accumulator tick.
    pub walk_tick_interval: Duration,
    /// Upper bound on any single sensor request.
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            poll_interval: Duration::from_secs(DEFAULT_POLL_SECS),
            health_interval: Duration::from_secs(DEFAULT_HEALTH_SECS),
            walk_tick_interval: Duration::from_secs(1),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    /// Builds the config from the environment, falling back to defaults for
    /// anything unset or unparseable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("PAWSENSE_API_URL") {
            if !url.trim().is_empty() {
                config.api_base_url = url.trim_end_matches('/').to_string();
            }
        }

        if let Ok(dir) = std::env::var("PAWSENSE_DATA_DIR") {
            if !dir.trim().is_empty() {
                config.data_dir = PathBuf::from(dir);
            }
        }

        if let Some(secs) = env_u64("PAWSENSE_POLL_SECS") {
            // The sensor feed updates every couple of seconds; polling
            // outside 1-60s is either hammering or stale.
            if (1..=60).contains(&secs) {
                config.poll_interval = Duration::from_secs(secs);
            }
        }

        config
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join("settings.json")
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join("walk_reports.json")
    }
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok()?.trim().parse().ok()
}
