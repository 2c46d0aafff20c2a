//! Command definitions for the Pomodoro Timer CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::{ConfigUpdate, IndicatorPosition};

// ============================================================================
// CLI Structure
// ============================================================================

/// Pomodoro Timer CLI - work/break rounds with live settings reload
#[derive(Parser, Debug)]
#[command(
    name = "pomodoro-timer",
    version,
    about = "ポモドーロタイマー",
    long_about = "作業と休憩を交互に繰り返すシンプルなポモドーロタイマー。\n\
                  設定ファイルの変更は実行中のタイマーに即座に反映されます。",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding settings.json and timer_state.json
    #[arg(long, global = true, value_name = "PATH")]
    pub dir: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the timer in this terminal
    Run(RunArgs),

    /// Show the persisted timer state
    Status,

    /// Show or edit the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Continue from the last saved state (comes back paused)
    #[arg(long)]
    pub restore: bool,
}

/// Settings editor actions
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the current settings
    Show,

    /// Print the settings file path
    Path,

    /// Change one or more settings
    Set(SetArgs),

    /// Restore the default settings
    Reset,
}

// ============================================================================
// Set Command Arguments
// ============================================================================

/// Arguments for `config set`; durations are given in minutes
#[derive(Args, Debug, Clone, Default)]
pub struct SetArgs {
    /// Work sessions per cycle (1-10)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=10))]
    pub rounds: Option<u32>,

    /// Work duration in minutes (1-60)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=60))]
    pub work: Option<u32>,

    /// Short break duration in minutes (1-30)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=30))]
    pub break_time: Option<u32>,

    /// Long break duration in minutes (10-60)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(10..=60))]
    pub long_break: Option<u32>,

    /// Play a sound when a phase completes
    #[arg(long, value_name = "BOOL")]
    pub sound: Option<bool>,

    /// Sound file played on phase completion
    #[arg(long, value_name = "FILE")]
    pub sound_file: Option<PathBuf>,

    /// Indicator position (left, center, right)
    #[arg(long)]
    pub position: Option<IndicatorPosition>,

    /// Indicator offset within its position (-1000 to 1000)
    #[arg(
        long,
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(i32).range(-1000..=1000)
    )]
    pub index: Option<i32>,

    /// Show the remaining time even while stopped
    #[arg(long, value_name = "BOOL")]
    pub show_time_always: Option<bool>,
}

impl SetArgs {
    /// Converts the arguments into a partial configuration update.
    #[must_use]
    pub fn to_update(&self) -> ConfigUpdate {
        ConfigUpdate {
            total_rounds: self.rounds,
            work_duration: self.work.map(minutes),
            break_duration: self.break_time.map(minutes),
            long_break_duration: self.long_break.map(minutes),
            sound_enabled: self.sound,
            sound_file: self.sound_file.clone(),
            indicator_position: self.position,
            indicator_index: self.index,
            show_time_always: self.show_time_always,
        }
    }
}

fn minutes(value: u32) -> u32 {
    value * 60
}

// ============================================================================
// Tests
// ============================================================================
