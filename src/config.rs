use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{LexanaError, Result};
use crate::output::OutputFormat;

pub const CONFIG_ENV: &str = "LEXANA_CONFIG";
pub const RESULTS_DIR_ENV: &str = "LEXANA_RESULTS_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub skip_unrecognized: bool,
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

impl Default for Config {
    fn default() -> Self {
        Config {
            results_dir: default_results_dir(),
            format: OutputFormat::default(),
            skip_unrecognized: false,
        }
    }
}

impl Config {
    /// Loads the config file (defaults when it does not exist) and applies
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from_path(&Self::get_config_path())?;
        config.apply_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(RESULTS_DIR_ENV).filter(|d| !d.is_empty()) {
            self.results_dir = PathBuf::from(dir);
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::get_config_path())
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn get_config_path() -> PathBuf {
        if let Ok(path) = env::var(CONFIG_ENV) {
            return PathBuf::from(path);
        }

        let home = if cfg!(windows) {
            env::var("USERPROFILE")
        } else {
            env::var("HOME")
        };
        PathBuf::from(home.unwrap_or_else(|_| String::from(".")))
            .join(".lexana")
            .join("config.json")
    }

    pub fn validate(&self) -> Result<()> {
        if self.results_dir.as_os_str().is_empty() {
            return Err(LexanaError::Config(
                "results_dir must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
