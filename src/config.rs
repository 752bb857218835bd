//! Runtime settings. Everything lives in one hidden folder under the user's
//! home directory unless `VERSE_TAP_DATA_DIR` points elsewhere.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".verse-tap";
/// SQLite file backing the key-value store.
const DB_FILE_NAME: &str = "verse-tap.sqlite";
/// Log file; the terminal belongs to the UI so logs never go to stdout.
const LOG_FILE_NAME: &str = "verse-tap.log";
const DEFAULT_LOG_FILTER: &str = "info";

pub const DATA_DIR_ENV: &str = "VERSE_TAP_DATA_DIR";
pub const LOG_FILTER_ENV: &str = "VERSE_TAP_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    /// `tracing` env-filter directive, e.g. `verse_tap=debug`.
    pub log_filter: String,
}

impl Config {
    /// Read overrides from the environment and fall back to the defaults.
    pub fn from_env() -> Result<Self> {
        let data_dir = match env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => default_data_dir()?,
        };
        let log_filter = env::var(LOG_FILTER_ENV).ok();
        Ok(Self::new(data_dir, log_filter))
    }

    pub fn new(data_dir: impl Into<PathBuf>, log_filter: Option<String>) -> Self {
        let log_filter = log_filter
            .map(|filter| filter.trim().to_string())
            .filter(|filter| !filter.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        Self {
            data_dir: data_dir.into(),
            log_filter,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Resolve `~/.verse-tap`.
fn default_data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}
