use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::{get_config_path, Config};
use crate::scoring::{WeightSet, WeightsConfig};
use crate::usecase::Factor;

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Parse a weight typed at the prompt.
fn parse_weight(input: &str) -> Result<f64, String> {
    match input.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        Ok(_) => Err("must be a non-negative number".to_string()),
        Err(_) => Err("not a number".to_string()),
    }
}

/// The config written when every prompt is accepted.
pub fn default_config() -> Config {
    Config {
        weights: Some(WeightSet::default().into()),
        data_path: None,
        top_n: Some(5),
    }
}

/// Serialize `config` and write it atomically, creating parent directories.
/// Refuses to replace an existing file unless `force` is set.
pub fn write_config(path: &Path, config: &Config, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    Ok(())
}

/// Run the init wizard to create a config file.
///
/// With `accept_defaults`, no prompts are shown and the default config is
/// written to `default_path` (or ~/.config/opp-eval/config.yaml).
pub fn run_init_wizard(default_path: Option<PathBuf>, accept_defaults: bool, force: bool) -> Result<()> {
    let default_config_path = match default_path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if accept_defaults {
        write_config(&default_config_path, &default_config(), force)?;
        println!("Config written to {}", default_config_path.display());
        return Ok(());
    }

    println!();
    println!("Opportunity Evaluator Configuration");
    println!("===================================");
    println!();

    // 1. Weights
    println!("Weights control how strongly each rating moves the Priority Score.");
    println!("Change Impact and Risk are penalties: higher weight pushes risky bets down.");
    let defaults = WeightSet::default();
    let configure_weights = prompt_yes_no("Configure weights? (n accepts defaults)", false)?;

    let weights = if configure_weights {
        let mut weights = defaults;
        for factor in Factor::ALL {
            let label = if factor.is_penalty() {
                format!("{} weight (penalty)", factor.label())
            } else {
                format!("{} weight", factor.label())
            };
            let value = loop {
                let input = prompt_with_default(&label, &defaults.get(factor).to_string())?;
                match parse_weight(&input) {
                    Ok(v) => break v,
                    Err(e) => println!("  Invalid: {}. Try again.", e),
                }
            };
            weights.set(factor, value);
        }
        WeightsConfig::from(weights)
    } else {
        defaults.into()
    };

    // 2. Seed file
    println!();
    println!("A seed CSV provides the starting use cases. Columns:");
    println!("  Use Case, Business Value (1-5), Technical Feasibility (1-5), Data Readiness (1-5),");
    println!("  Change Impact (1-5), Risk (1-5), Owner, Notes");
    let data_path = prompt_with_default("Seed CSV path ('none' for built-in examples)", "none")?;
    let data_path = if data_path == "none" || data_path.is_empty() {
        None
    } else {
        Some(PathBuf::from(data_path))
    };

    // 3. Summary size
    println!();
    let top_n: usize = loop {
        let input = prompt_with_default("Top opportunities shown in the summary", "5")?;
        match input.parse::<usize>() {
            Ok(v) if v >= 1 => break v,
            _ => println!("  Invalid: must be a whole number of at least 1. Try again."),
        }
    };

    // 4. Config path
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    let mut force = force;
    if config_path.exists() && !force {
        force = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !force {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 5. Write config
    let config = Config {
        weights: Some(weights),
        data_path,
        top_n: Some(top_n),
    };
    write_config(&config_path, &config, force)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `opp-eval tui` to start a session.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;

    #[test]
    fn test_parse_weight() {
        assert_eq!(parse_weight("2.5"), Ok(2.5));
        assert_eq!(parse_weight(" 0 "), Ok(0.0));
        assert!(parse_weight("-1").is_err());
        assert!(parse_weight("heavy").is_err());
        assert!(parse_weight("inf").is_err());
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        write_config(&path, &default_config(), false).unwrap();

        let loaded = load_config(Some(path)).unwrap();
        assert_eq!(loaded, default_config());
    }

    #[test]
    fn test_write_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "top_n: 2\n").unwrap();

        assert!(write_config(&path, &default_config(), false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "top_n: 2\n");

        write_config(&path, &default_config(), true).unwrap();
        let loaded = load_config(Some(path)).unwrap();
        assert_eq!(loaded.top_n, Some(5));
    }

    #[test]
    fn test_run_init_accept_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        run_init_wizard(Some(path.clone()), true, false).unwrap();
        assert!(path.exists());
    }
}
