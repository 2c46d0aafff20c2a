//! Display utilities for the Pomodoro Timer CLI.
//!
//! This module provides formatted output for:
//! - The persisted timer status
//! - The settings record
//! - Success and error messages of the settings editor

use std::path::Path;

use crate::display::{format_time, progress_text, status_text};
use crate::types::{Config, TimerState};

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows the saved timer state, if any.
    pub fn show_status(state: Option<&TimerState>, config: &Config) {
        print!("{}", Self::status_lines(state, config));
    }

    /// Shows every setting with its stored key.
    pub fn show_config(config: &Config, path: &Path) {
        print!("{}", Self::config_lines(config, path));
    }

    /// Shows a success message after `config set`.
    pub fn show_config_saved(config: &Config, path: &Path) {
        println!("* 設定を保存しました");
        print!("{}", Self::config_lines(config, path));
    }

    /// Shows a success message after `config reset`.
    pub fn show_config_reset(path: &Path) {
        println!("* 設定を初期値に戻しました: {}", path.display());
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("エラー: {}", message);
    }

    fn status_lines(state: Option<&TimerState>, config: &Config) -> String {
        let mut out = String::from("ポモドーロタイマー ステータス\n");
        out.push_str("─────────────────────────────\n");

        let Some(state) = state else {
            out.push_str("保存されたタイマー状態はありません\n");
            return out;
        };

        out.push_str(&format!("状態: {}\n", status_text(state)));
        out.push_str(&format!("残り時間: {}\n", format_time(state.remaining_seconds)));
        out.push_str(&format!("{}\n", progress_text(state, config.total_rounds)));
        out
    }

    fn config_lines(config: &Config, path: &Path) -> String {
        let mut out = format!("設定ファイル: {}\n", path.display());
        let rows: [(&str, String); 9] = [
            ("totalRounds", config.total_rounds.to_string()),
            ("workDuration", Self::duration(config.work_duration)),
            ("breakDuration", Self::duration(config.break_duration)),
            ("longBreakDuration", Self::duration(config.long_break_duration)),
            ("soundEnabled", config.sound_enabled.to_string()),
            ("soundFile", config.sound_file.display().to_string()),
            ("indicatorPosition", config.indicator_position.to_string()),
            ("indicatorIndex", config.indicator_index.to_string()),
            ("showTimeAlways", config.show_time_always.to_string()),
        ];
        for (key, value) in rows {
            out.push_str(&format!("  {:<18} {}\n", key, value));
        }
        out
    }

    fn duration(seconds: u32) -> String {
        format!("{} ({}秒)", format_time(seconds), seconds)
    }
}

// ============================================================================
// Tests
// ============================================================================
