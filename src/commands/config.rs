//! Configuration commands.
//!
//! - `config show`: Display current configuration
//! - `config get`: Print one value
//! - `config set`: Set a configuration value
//! - `config path`: Print the config file location

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::config::{CONFIG_KEYS, Config};
use crate::error::{RbacError, Result};

/// Reject underscore spellings of dotted keys, e.g. `auth_token`
fn validate_config_key(key: &str) -> Result<&str> {
    if CONFIG_KEYS.contains(&key) {
        return Ok(key);
    }

    if let Some(dotted) = CONFIG_KEYS
        .iter()
        .find(|k| k.contains('.') && k.replacen('.', "_", 1) == key)
    {
        return Err(RbacError::Config(format!(
            "invalid config key '{key}'. Use dot notation: '{dotted}'"
        )));
    }

    Err(RbacError::Config(format!(
        "unknown config key '{key}'. Valid keys: {}",
        CONFIG_KEYS.join(", ")
    )))
}

/// Show current configuration
pub fn cmd_config_show(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let path = Config::config_path()?;
    let entries = config.display_entries();

    let mut values = serde_json::Map::new();
    for (key, value) in &entries {
        values.insert(key.to_string(), json!(value));
    }
    let json_output = json!({
        "values": values,
        "token_configured": config.api_token().is_some(),
        "config_file": path.to_string_lossy(),
    });

    let mut text_output = format!("{}\n\n", "Configuration:".cyan().bold());
    for (key, value) in &entries {
        let value = if value == "not set" {
            value.dimmed().to_string()
        } else {
            value.to_string()
        };
        text_output.push_str(&format!("  {}: {}\n", key.cyan(), value));
    }
    text_output.push('\n');
    text_output.push_str(&format!(
        "{}",
        format!("Config file: {}", path.display()).dimmed()
    ));

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(output)
}

/// Get a specific configuration value. The token is masked.
pub fn cmd_config_get(key: &str, output: OutputOptions) -> Result<()> {
    validate_config_key(key)?;
    let config = Config::load()?;

    let value = config
        .display_entries()
        .into_iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
        .ok_or_else(|| RbacError::Config(format!("{key} not set")))?;

    CommandOutput::new(json!({
        "key": key,
        "value": value,
        "masked": key == "auth.token",
    }))
    .with_text(value.clone())
    .print(output)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output: OutputOptions) -> Result<()> {
    validate_config_key(key)?;

    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;
    tracing::info!("config key {key} updated");

    let text = if key == "auth.token" {
        format!("Set {}", key.cyan())
    } else {
        format!("Set {} to {}", key.cyan(), value)
    };
    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "success": true,
    }))
    .with_text(text)
    .print(output)
}

pub fn cmd_config_path(output: OutputOptions) -> Result<()> {
    let path = Config::config_path()?;
    CommandOutput::new(json!({ "config_file": path.to_string_lossy() }))
        .with_text(path.display().to_string())
        .print(output)
}
