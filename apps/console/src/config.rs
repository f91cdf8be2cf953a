use std::{fs, io, path::Path};

use anyhow::Context;
use client_core::timer::ACTION_TICK;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: String,
    pub device_port: u16,
    /// Seconds of silence before a terminal is shown offline; 0 keeps it online.
    pub presence_timeout_secs: u64,
    pub tick_interval_ms: u64,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:1234".into(),
            device_port: 1234,
            presence_timeout_secs: 0,
            tick_interval_ms: ACTION_TICK.as_millis() as u64,
            log_level: "info".into(),
        }
    }
}

/// `console.toml` layout. Every key is optional.
#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    device_port: Option<u16>,
    presence_timeout_secs: Option<u64>,
    tick_interval_ms: Option<u64>,
    log_level: Option<String>,
}

/// Defaults, then the TOML file (if present), then the process environment.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()))
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file.bind_addr {
        settings.bind_addr = v;
    }
    if let Some(v) = file.device_port {
        settings.device_port = v;
    }
    if let Some(v) = file.presence_timeout_secs {
        settings.presence_timeout_secs = v;
    }
    if let Some(v) = file.tick_interval_ms {
        settings.tick_interval_ms = v;
    }
    if let Some(v) = file.log_level {
        settings.log_level = v;
    }
    Ok(())
}

/// `CONSOLE_*` first, then `APP__*`, so the `APP__` form wins when both are set.
fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    let lookup = |name: &str| {
        var(&format!("APP__{name}")).or_else(|| var(&format!("CONSOLE_{name}")))
    };

    if let Some(v) = lookup("BIND_ADDR") {
        settings.bind_addr = v;
    }
    if let Some(v) = lookup("DEVICE_PORT") {
        if let Ok(parsed) = v.trim().parse() {
            settings.device_port = parsed;
        }
    }
    if let Some(v) = lookup("PRESENCE_TIMEOUT_SECS") {
        if let Ok(parsed) = v.trim().parse() {
            settings.presence_timeout_secs = parsed;
        }
    }
    if let Some(v) = lookup("TICK_INTERVAL_MS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            if parsed > 0 {
                settings.tick_interval_ms = parsed;
            }
        }
    }
    if let Some(v) = lookup("LOG_LEVEL") {
        settings.log_level = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
