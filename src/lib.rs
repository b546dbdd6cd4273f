pub mod classifier;
pub mod config;
pub mod history;
pub mod i18n;
pub mod models;
pub mod sensing;
pub mod settings;
pub mod walk;

use anyhow::{Context, Result};
use log::info;
use tokio::io::{AsyncBufReadExt, BufReader};

use classifier::{classify, SafetyTier};
use config::AppConfig;
use history::{HistoryError, HistoryStore};
use i18n::translate;
use sensing::{SensingController, SensorClient, SensorHub};
use settings::{Language, SettingsStore, Unit, UserSettings};
use walk::WalkController;

pub struct App {
    pub config: AppConfig,
    pub settings: SettingsStore,
    pub history: HistoryStore,
    pub hub: SensorHub,
    pub walk: WalkController,
    sensing: SensingController,
}

impl App {
    /// Builds every store and controller without spawning anything.
    pub fn bootstrap(config: AppConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir).with_context(|| {
            format!("failed to create data directory {}", config.data_dir.display())
        })?;

        let settings = SettingsStore::new(config.settings_path())?;
        let history = HistoryStore::new(config.history_path())?;
        let hub = SensorHub::new();
        let client = SensorClient::new(&config)?;
        let walk = WalkController::new(
            history.clone(),
            settings.clone(),
            hub.clone(),
            client,
            config.walk_tick_interval,
        );

        Ok(Self {
            config,
            settings,
            history,
            hub,
            walk,
            sensing: SensingController::new(),
        })
    }

    pub fn start_sensing(&mut self) -> Result<()> {
        let client = SensorClient::new(&self.config)?;
        self.sensing.start(
            client,
            self.hub.clone(),
            self.config.poll_interval,
            self.config.health_interval,
        )
    }

    pub async fn stop_sensing(&mut self) -> Result<()> {
        self.sensing.stop().await
    }
}

pub async fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = AppConfig::from_env();
    info!(
        "pawsense starting up; sensor endpoint {}",
        config.api_base_url
    );

    let mut app = App::bootstrap(config)?;
    app.start_sensing()?;

    println!("pawsense - pavement safety monitor. Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if handle_command(&app, line.trim()).await == Flow::Quit {
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }

    // Tear every timer down before exit so no orphaned ticks survive.
    app.walk.shutdown().await;
    app.stop_sensing().await?;
    info!("pawsense shut down");
    Ok(())
}

#[derive(PartialEq)]
enum Flow {
    Continue,
    Quit,
}

async fn handle_command(app: &App, line: &str) -> Flow {
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or("");

    match command {
        "" => {}
        "help" => print_help(),
        "status" => print_status(app).await,
        "start" => match app.walk.start_walk().await {
            Ok(_) => println!("{}", localized(app, "walkStarted")),
            Err(err) => println!("error: {err:#}"),
        },
        "stop" => match app.walk.end_walk().await {
            Ok(report) => {
                println!("{}", localized(app, "walkEnded"));
                print_report(app, &report);
            }
            Err(err) => println!("error: {err:#}"),
        },
        "retry" => match app.walk.retry_pending_save().await {
            Ok(Some(report)) => {
                println!("pending report saved");
                print_report(app, &report);
            }
            Ok(None) => println!("nothing pending"),
            Err(err) => println!("error: {err:#}"),
        },
        "history" => print_history(app),
        "memo" => {
            let id = parts.next().unwrap_or("");
            let memo = parts.collect::<Vec<_>>().join(" ");
            if id.is_empty() {
                println!("usage: memo <report-id> <text>");
            } else {
                match app.history.update_memo(id, &memo) {
                    Ok(()) => println!("memo saved"),
                    Err(HistoryError::NotFound { id }) => {
                        println!("no walk report with id {id}")
                    }
                    Err(err) => println!("error: {err}"),
                }
            }
        }
        "lang" => match parts.next().and_then(Language::from_code) {
            Some(language) => {
                let updated = UserSettings {
                    language,
                    ..app.settings.current()
                };
                apply_settings(app, updated);
            }
            None => println!("usage: lang <ko|en|ja|zh>"),
        },
        "unit" => match parts.next() {
            Some("C") | Some("c") => {
                let updated = UserSettings {
                    unit: Unit::C,
                    ..app.settings.current()
                };
                apply_settings(app, updated);
            }
            Some("F") | Some("f") => {
                let updated = UserSettings {
                    unit: Unit::F,
                    ..app.settings.current()
                };
                apply_settings(app, updated);
            }
            _ => println!("usage: unit <C|F>"),
        },
        "alerts" => {
            let which = parts.next().unwrap_or("");
            let enabled = match parts.next() {
                Some("on") => true,
                Some("off") => false,
                _ => {
                    println!("usage: alerts <danger|walktime> <on|off>");
                    return Flow::Continue;
                }
            };
            let mut updated = app.settings.current();
            match which {
                "danger" => updated.danger_alert_enabled = enabled,
                "walktime" => updated.walk_time_alert_enabled = enabled,
                _ => {
                    println!("usage: alerts <danger|walktime> <on|off>");
                    return Flow::Continue;
                }
            }
            apply_settings(app, updated);
        }
        "quit" | "exit" => return Flow::Quit,
        other => println!("unknown command '{other}'; type 'help'"),
    }

    Flow::Continue
}

fn apply_settings(app: &App, settings: UserSettings) {
    match app.settings.update(settings) {
        Ok(()) => println!("settings saved"),
        Err(err) => println!("error: {err:#}"),
    }
}

fn print_help() {
    println!("commands:");
    println!("  status                         current reading and walk state");
    println!("  start / stop                   begin or end a walk");
    println!("  retry                          retry a failed report save");
    println!("  history                        recorded walks, newest first");
    println!("  memo <report-id> <text>        annotate a recorded walk");
    println!("  lang <ko|en|ja|zh>             display language");
    println!("  unit <C|F>                     temperature unit");
    println!("  alerts <danger|walktime> <on|off>");
    println!("  quit");
}

fn localized(app: &App, key: &str) -> String {
    translate(app.settings.current().language, key).to_string()
}

fn tier_message_key(tier: SafetyTier) -> &'static str {
    match tier {
        SafetyTier::Safe => "safeMessage",
        SafetyTier::Caution => "cautionMessage",
        SafetyTier::Danger => "dangerMessage",
    }
}

async fn print_status(app: &App) {
    let snapshot = app.hub.snapshot();
    let settings = app.settings.current();
    let lang = settings.language;

    let connection_key = if snapshot.is_connected {
        "connected"
    } else {
        "disconnected"
    };
    println!("[{}]", translate(lang, connection_key));
    if let Some(error) = &snapshot.last_error {
        println!("  last error: {error}");
    }

    match &snapshot.reading {
        Some(reading) => {
            let tier = classify(reading.surface_temp);
            println!(
                "  {}: {} ({})",
                translate(lang, "surfaceTemp"),
                settings.unit.format(reading.surface_temp),
                translate(lang, tier.as_str())
            );
            println!(
                "  {}: {}   {}: {:.0}%",
                translate(lang, "airTemp"),
                settings.unit.format(reading.air_temp),
                translate(lang, "humidity"),
                reading.humidity
            );
            println!(
                "  {}: {:.0} W/m²",
                translate(lang, "solarRadiation"),
                reading.solar_radiation
            );
            println!("  {}", translate(lang, tier_message_key(tier)));
        }
        None => println!("  no sensor reading yet"),
    }

    let walk = app.walk.get_state().await;
    if walk.is_active() {
        println!(
            "  walking: {}s ({}s safe / {}s caution / {}s danger)",
            walk.elapsed_seconds,
            walk.tier_seconds.safe,
            walk.tier_seconds.caution,
            walk.tier_seconds.danger
        );
    }
}

fn print_history(app: &App) {
    let lang = app.settings.current().language;
    let reports = app.history.list();
    if reports.is_empty() {
        println!("{}", translate(lang, "noWalksFound"));
        return;
    }

    for report in reports {
        println!(
            "{}  {}s ({}s/{}s/{}s)",
            report.id,
            report.duration_seconds,
            report.tier_seconds.safe,
            report.tier_seconds.caution,
            report.tier_seconds.danger
        );
        if !report.memo.is_empty() {
            println!("    {}: {}", translate(lang, "walkMemo"), report.memo);
        }
    }
}

fn print_report(app: &App, report: &models::WalkReport) {
    let lang = app.settings.current().language;
    println!(
        "  {}: {}s ({}s safe / {}s caution / {}s danger)",
        translate(lang, "totalDuration"),
        report.duration_seconds,
        report.tier_seconds.safe,
        report.tier_seconds.caution,
        report.tier_seconds.danger
    );
    println!("  id: {}", report.id);
}
