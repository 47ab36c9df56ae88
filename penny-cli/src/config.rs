use anyhow::{Context, Result};
use penny_ingest::ExtractOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{ensure_penny_home, resolve};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsSection,
    pub extract: ExtractOptions,
    pub log: LogSection,
}

/// Data files. Relative entries live under the penny home directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsSection {
    pub sms_file: PathBuf,
    pub ledger_file: PathBuf,
    pub budget_file: PathBuf,
    pub transactions_file: PathBuf,
    pub alert_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    pub level: String,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            sms_file: PathBuf::from("mock_sms.json"),
            ledger_file: PathBuf::from("processed_sms_ids.json"),
            budget_file: PathBuf::from("budget.json"),
            transactions_file: PathBuf::from("transactions.json"),
            alert_file: PathBuf::from("alert_log.json"),
        }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl PathsSection {
    /// Anchor every relative path at `home`.
    pub fn resolved(&self, home: &Path) -> Self {
        Self {
            sms_file: resolve(home, &self.sms_file),
            ledger_file: resolve(home, &self.ledger_file),
            budget_file: resolve(home, &self.budget_file),
            transactions_file: resolve(home, &self.transactions_file),
            alert_file: resolve(home, &self.alert_file),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_penny_home()?.join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    save_config(path, &Config::default())?;
    println!("Wrote {}", path.display());
    Ok(())
}
