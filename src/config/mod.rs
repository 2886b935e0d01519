pub mod init;
mod schema;

pub use schema::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::scoring::validate_weights;

/// Get the config directory path (~/.config/opp-eval/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("opp-eval"))
}

/// Get the default config file path (~/.config/opp-eval/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/opp-eval/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
///
/// A missing default config file is not an error: built-in defaults apply.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let mut config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    if let Some(data_path) = config.data_path.take() {
        config.data_path = Some(resolve_relative(&config_path, data_path));
    }

    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
}

fn resolve_relative(config_path: &Path, data_path: PathBuf) -> PathBuf {
    if data_path.is_absolute() {
        return data_path;
    }
    match config_path.parent() {
        Some(dir) => dir.join(data_path),
        None => data_path,
    }
}

/// Validate config values at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref weights) = config.weights {
        if let Err(weight_errors) = validate_weights(weights) {
            errors.extend(weight_errors);
        }
    }

    if config.top_n == Some(0) {
        errors.push("top_n: must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
