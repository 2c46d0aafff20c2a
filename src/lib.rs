//! Pomodoro Timer Library
//!
//! This library provides the core functionality for the Pomodoro Timer CLI.
//! It includes:
//! - Timer engine with work/break phase transitions
//! - Runtime loop serializing ticks, commands and settings reloads
//! - Settings and timer-state persistence with atomic writes
//! - Settings file watching with live reconciliation
//! - Sound notification through a fallback chain of players
//! - Display formatting and a terminal display surface
//! - CLI command parsing and display utilities

pub mod cli;
pub mod daemon;
pub mod display;
pub mod paths;
pub mod process;
pub mod sound;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    Config, ConfigUpdate, IndicatorPosition, Mode, PersistedSnapshot, Phase, TimerState,
};

// Re-export engine and runtime types
pub use daemon::{
    reconcile, Command, ConfigChanged, ConfigWatcher, Daemon, DaemonChannels, EditorLauncher,
    MockSettingsLauncher, Reconciliation, SettingsLauncher, TimerEngine, TimerEvent, WatchError,
};

// Re-export persistence types
pub use store::{ConfigStore, FileSnapshotStore, MemorySnapshotStore, SnapshotStore, StoreError};

// Re-export sound types
pub use sound::{
    MockNotifier, MockPlaybackBackend, NotificationDispatcher, PhaseNotifier, PlaybackBackend,
    SoundError,
};

// Re-export display types
pub use display::{DisplaySnapshot, DisplayUpdate, MenuAction, MenuConfig, TerminalDisplay};

pub use paths::AppPaths;
