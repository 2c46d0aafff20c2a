//! Locations of the files the timer keeps on disk.
//!
//! Both records live side by side in one application directory:
//! `<config_dir>/pomodoro-timer/settings.json` and `timer_state.json`.
//! `POMODORO_TIMER_DIR` or the `--dir` flag replace the directory.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

/// Application directory name under the platform config directory.
pub const APP_DIR_NAME: &str = "pomodoro-timer";
/// Configuration record file name.
pub const SETTINGS_FILE: &str = "settings.json";
/// Timer snapshot file name.
pub const STATE_FILE: &str = "timer_state.json";
/// Environment override for the application directory.
pub const DIR_ENV: &str = "POMODORO_TIMER_DIR";

/// Resolved file locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    dir: PathBuf,
}

impl AppPaths {
    /// Uses `dir` as the application directory.
    #[must_use]
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Resolves the directory: explicit override, then the environment,
    /// then the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no override is given and the platform has no
    /// config directory.
    pub fn resolve(dir_override: Option<&Path>) -> Result<Self> {
        if let Some(dir) = dir_override {
            return Ok(Self::in_dir(dir));
        }
        if let Some(dir) = std::env::var_os(DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::in_dir(dir));
        }
        let base = dirs::config_dir().ok_or_else(|| anyhow!("設定ディレクトリが見つかりません"))?;
        Ok(Self::in_dir(base.join(APP_DIR_NAME)))
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The configuration record.
    #[must_use]
    pub fn settings_file(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE)
    }

    /// The persisted timer snapshot.
    #[must_use]
    pub fn state_file(&self) -> PathBuf {
        self.dir.join(STATE_FILE)
    }
}
