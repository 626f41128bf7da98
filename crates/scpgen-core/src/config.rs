use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::report::ReportSelection;

pub const DEFAULT_MODE: &str = "Allow";
pub const DEFAULT_INPUT_PATH: &str = "./s3_usage.json";
pub const DEFAULT_THRESHOLD: i64 = 10;
pub const DEFAULT_OUTPUT_PATH: &str = "testSCP.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub policy: PolicyConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// `Allow` or `Deny`, any case. Validated when the pipeline runs.
    pub mode: String,
    pub threshold: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub selection: ReportSelection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_path: PathBuf,
}

impl Config {
    pub fn default_config() -> Self {
        Self {
            policy: PolicyConfig {
                mode: DEFAULT_MODE.to_string(),
                threshold: DEFAULT_THRESHOLD,
            },
            input: InputConfig {
                path: PathBuf::from(DEFAULT_INPUT_PATH),
                selection: ReportSelection::First,
            },
            output: OutputConfig {
                path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            },
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("parse config TOML")?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        let output = toml::to_string_pretty(self).context("render config TOML")?;
        Ok(output)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read config at {}", path.display()))?;
        Self::from_toml_str(&contents)
    }

    /// Loads `path` when it exists, otherwise falls back to the built-in defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default_config());
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create config dir {}", parent.display()))?;
            }
        }
        let contents = self.to_toml_string()?;
        fs::write(path, contents).with_context(|| format!("write config at {}", path.display()))?;
        Ok(())
    }
}

impl ConfigPaths {
    pub fn resolve() -> Result<Self> {
        let project_dirs = ProjectDirs::from("io", "scpgen", "scpgen")
            .ok_or_else(|| anyhow::anyhow!("unable to determine project directories"))?;
        Ok(Self {
            config_path: project_dirs.config_dir().join("config.toml"),
        })
    }
}
