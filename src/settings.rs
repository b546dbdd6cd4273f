use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::Arc, sync::RwLock};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ko,
    En,
    Ja,
    Zh,
}

impl Default for Language {
    fn default() -> Self {
        Language::En
    }
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
            Language::Ja => "ja",
            Language::Zh => "zh",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ko" => Some(Language::Ko),
            "en" => Some(Language::En),
            "ja" => Some(Language::Ja),
            "zh" => Some(Language::Zh),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Unit {
    C,
    F,
}

impl Default for Unit {
    fn default() -> Self {
        Unit::C
    }
}

impl Unit {
    /// Converts a Celsius value into this display unit.
    pub fn convert(&self, celsius: f64) -> f64 {
        match self {
            Unit::C => celsius,
            Unit::F => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    pub fn format(&self, celsius: f64) -> String {
        match self {
            Unit::C => format!("{:.1}°C", celsius),
            Unit::F => format!("{:.1}°F", self.convert(celsius)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub language: Language,
    pub unit: Unit,
    pub danger_alert_enabled: bool,
    pub walk_time_alert_enabled: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            language: Language::default(),
            unit: Unit::default(),
            danger_alert_enabled: true,
            walk_time_alert_enabled: true,
        }
    }
}

struct SettingsInner {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

/// File-backed preference store. The whole value is overwritten on every
/// change; callers construct the full settings object, the store never
/// merges field-by-field.
#[derive(Clone)]
pub struct SettingsStore {
    inner: Arc<SettingsInner>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(err) => {
                    warn!("Corrupt settings file {}; using defaults: {err}", path.display());
                    UserSettings::default()
                }
            }
        } else {
            UserSettings::default()
        };

        Ok(Self {
            inner: Arc::new(SettingsInner {
                path,
                data: RwLock::new(data),
            }),
        })
    }

    pub fn current(&self) -> UserSettings {
        self.inner.data.read().unwrap().clone()
    }

    pub fn update(&self, settings: UserSettings) -> Result<()> {
        let mut guard = self.inner.data.write().unwrap();
        *guard = settings;
        self.persist(&guard)
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.inner.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.inner.path.display()))
    }
}
