use std::path::PathBuf;

use anyhow::{Context, Result};

use scpgen_core::config::{Config, ConfigPaths};

/// Loads the config the CLI would run with: `--config` when given, otherwise
/// the per-user config file, otherwise built-in defaults.
pub fn load_effective(config_path: Option<PathBuf>) -> Result<Config> {
    match config_path {
        Some(path) => {
            Config::load(&path).with_context(|| format!("load config {}", path.display()))
        }
        None => {
            let paths = ConfigPaths::resolve()?;
            Config::load_or_default(&paths.config_path)
                .with_context(|| format!("load config {}", paths.config_path.display()))
        }
    }
}

pub fn print_effective(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_effective(config_path)?;
    let output = config.to_toml_string()?;
    println!("{}", output);
    Ok(())
}
