use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::Context;
use client_core::ClientSettings;

pub const DEFAULT_CONFIG_PATH: &str = "activities.toml";

/// Defaults, then the optional toml file, then `APP__*` environment variables.
pub fn load_settings(config_path: &Path) -> anyhow::Result<ClientSettings> {
    let mut settings = ClientSettings::default();

    match fs::read_to_string(config_path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .with_context(|| format!("failed to parse '{}'", config_path.display()))?,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
        Err(error) => {
            return Err(error)
                .with_context(|| format!("failed to read '{}'", config_path.display()))
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

fn apply_file(settings: &mut ClientSettings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: HashMap<String, toml::Value> = toml::from_str(raw)?;
    if let Some(v) = file_cfg.get("server_url").and_then(toml::Value::as_str) {
        settings.server_url = v.to_string();
    }
    if let Some(v) = file_cfg.get("message_hide_ms") {
        let ms = v
            .as_integer()
            .and_then(|ms| u64::try_from(ms).ok())
            .context("message_hide_ms must be a non-negative integer")?;
        settings.message_hide_delay = Duration::from_millis(ms);
    }
    Ok(())
}

fn apply_env(
    settings: &mut ClientSettings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__MESSAGE_HIDE_MS") {
        let ms: u64 = v
            .parse()
            .with_context(|| format!("APP__MESSAGE_HIDE_MS is not a number: '{v}'"))?;
        settings.message_hide_delay = Duration::from_millis(ms);
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
