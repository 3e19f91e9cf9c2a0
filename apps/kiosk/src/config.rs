use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use command_channel::CommandChannelConfig;
use navigation::{MachineConfig, DEFAULT_ANGLE_THRESHOLD};
use serde::Deserialize;
use shared::domain::{SymbolId, DEFAULT_RECOGNIZED_SYMBOL};
use tracing::{debug, warn};
use tuio_integration::DEFAULT_TRACKING_PORT;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CarSettings {
    pub name: String,
    #[serde(default)]
    pub frames_dir: Option<PathBuf>,
    #[serde(default)]
    pub video_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tracking_port: u16,
    pub command_bind: String,
    pub command_read_timeout_ms: u64,
    pub recognized_symbol: i64,
    pub angle_threshold: f64,
    pub refresh_interval_ms: u64,
    pub player_program: String,
    pub player_args: Vec<String>,
    pub cars: Vec<CarSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tracking_port: DEFAULT_TRACKING_PORT,
            command_bind: "0.0.0.0:9000".into(),
            command_read_timeout_ms: 5_000,
            recognized_symbol: DEFAULT_RECOGNIZED_SYMBOL.0,
            angle_threshold: DEFAULT_ANGLE_THRESHOLD,
            refresh_interval_ms: 33,
            player_program: "cvlc".into(),
            player_args: vec!["--fullscreen".into(), "--play-and-exit".into()],
            cars: vec![
                CarSettings {
                    name: "Ford F-150".into(),
                    frames_dir: Some("assets/ford".into()),
                    video_path: Some("videos/ford_f150.mp4".into()),
                },
                CarSettings {
                    name: "Jeep Wrangler".into(),
                    frames_dir: Some("assets/jeep".into()),
                    video_path: Some("videos/jeep_wrangler.mp4".into()),
                },
                CarSettings {
                    name: "Other Car".into(),
                    frames_dir: None,
                    video_path: None,
                },
            ],
        }
    }
}

impl Settings {
    pub fn machine_config(&self) -> MachineConfig {
        MachineConfig {
            recognized_symbol: self.recognized_symbol(),
            angle_threshold: self.angle_threshold,
        }
    }

    pub fn recognized_symbol(&self) -> SymbolId {
        SymbolId(self.recognized_symbol)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms.max(1))
    }

    pub fn command_channel_config(&self) -> anyhow::Result<CommandChannelConfig> {
        let bind_addr: SocketAddr = self
            .command_bind
            .parse()
            .with_context(|| format!("invalid command_bind '{}'", self.command_bind))?;
        Ok(CommandChannelConfig {
            bind_addr,
            read_timeout: Duration::from_millis(self.command_read_timeout_ms),
        })
    }
}

/// Defaults, then the optional TOML file, then `KIOSK__*` environment variables.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => toml::from_str::<Settings>(&raw)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?,
        Err(err) => {
            debug!(path = %path.display(), "no config file, using defaults: {err}");
            Settings::default()
        }
    };
    if !settings.angle_threshold.is_finite() {
        warn!(
            value = settings.angle_threshold,
            "angle_threshold must be finite, using default"
        );
        settings.angle_threshold = DEFAULT_ANGLE_THRESHOLD;
    }
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

pub fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("KIOSK__TRACKING_PORT") {
        override_parsed(&mut settings.tracking_port, "KIOSK__TRACKING_PORT", &v);
    }
    if let Some(v) = lookup("KIOSK__COMMAND_BIND") {
        settings.command_bind = v;
    }
    if let Some(v) = lookup("KIOSK__COMMAND_READ_TIMEOUT_MS") {
        override_parsed(
            &mut settings.command_read_timeout_ms,
            "KIOSK__COMMAND_READ_TIMEOUT_MS",
            &v,
        );
    }
    if let Some(v) = lookup("KIOSK__RECOGNIZED_SYMBOL") {
        override_parsed(&mut settings.recognized_symbol, "KIOSK__RECOGNIZED_SYMBOL", &v);
    }
    if let Some(v) = lookup("KIOSK__ANGLE_THRESHOLD") {
        match v.trim().parse::<f64>() {
            Ok(threshold) if threshold.is_finite() => settings.angle_threshold = threshold,
            _ => warn!(key = "KIOSK__ANGLE_THRESHOLD", value = %v, "ignoring non-finite override"),
        }
    }
    if let Some(v) = lookup("KIOSK__REFRESH_INTERVAL_MS") {
        override_parsed(
            &mut settings.refresh_interval_ms,
            "KIOSK__REFRESH_INTERVAL_MS",
            &v,
        );
    }
    if let Some(v) = lookup("KIOSK__PLAYER_PROGRAM") {
        settings.player_program = v;
    }
}

fn override_parsed<T: std::str::FromStr>(slot: &mut T, key: &str, raw: &str) {
    match raw.trim().parse::<T>() {
        Ok(parsed) => *slot = parsed,
        Err(_) => warn!(key, value = raw, "ignoring unparseable override"),
    }
}

/// CLI tracking port: anything missing, unparseable or zero falls back.
pub fn resolve_tracking_port(arg: Option<&str>, fallback: u16) -> u16 {
    arg.and_then(|raw| raw.trim().parse::<u16>().ok())
        .filter(|port| *port != 0)
        .unwrap_or(fallback)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
