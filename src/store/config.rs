//! Configuration record persistence.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use super::atomic::write_atomic;
use super::error::StoreError;
use crate::types::{Config, ConfigUpdate};

/// Reads and writes the settings file.
///
/// Loading never fails from the caller's point of view: every well-formed
/// stored field is merged over [`Config::default`], the rest is defaulted.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the settings file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored record, reporting why it could not be read.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, or not JSON.
    /// Individually invalid fields are not an error; they are defaulted.
    pub fn try_load(&self) -> Result<Config, StoreError> {
        let text = fs::read_to_string(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        let value: Value =
            serde_json::from_str(&text).map_err(|e| StoreError::parse(&self.path, e))?;
        Ok(Config::default().merged(&ConfigUpdate::from_json(&value)))
    }

    /// Loads the configuration, falling back to defaults on any failure.
    #[must_use]
    pub fn load(&self) -> Config {
        match self.try_load() {
            Ok(config) => config,
            Err(e) if e.is_not_found() => {
                debug!("Settings file not found, using defaults: {}", self.path.display());
                Config::default()
            }
            Err(e) => {
                warn!("設定ファイルを読み込めません。デフォルト値を使用します: {}", e);
                Config::default()
            }
        }
    }

    /// Loads the configuration for a live reload.
    ///
    /// Returns `None` if the file cannot be read or parsed right now, which
    /// during a hot reload usually means an editor is mid-write.
    #[must_use]
    pub fn reload(&self) -> Option<Config> {
        match self.try_load() {
            Ok(config) => Some(config),
            Err(e) => {
                debug!("Ignoring unreadable settings during reload: {}", e);
                None
            }
        }
    }

    /// Loads the configuration and writes defaults if no usable file exists.
    ///
    /// Writing is best effort; a failure is logged and the defaults are
    /// still returned.
    #[must_use]
    pub fn load_or_init(&self) -> Config {
        match self.try_load() {
            Ok(config) => config,
            Err(e) => {
                if !e.is_not_found() {
                    warn!("設定ファイルが不正なため初期化します: {}", e);
                }
                let config = Config::default();
                match self.save(&config) {
                    Ok(()) => info!("Wrote default settings to {}", self.path.display()),
                    Err(e) => warn!("デフォルト設定を書き込めません: {}", e),
                }
                config
            }
        }
    }

    /// Writes the full record atomically as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, config: &Config) -> Result<(), StoreError> {
        let mut json =
            serde_json::to_string_pretty(config).map_err(|e| StoreError::parse(&self.path, e))?;
        json.push('\n');
        write_atomic(&self.path, json.as_bytes())
    }

    /// Merges `update` into the stored record and writes it back.
    ///
    /// # Errors
    ///
    /// Returns an error if the merged record cannot be written.
    pub fn update(&self, update: &ConfigUpdate) -> Result<Config, StoreError> {
        let config = self.load().merged(update);
        self.save(&config)?;
        Ok(config)
    }
}
