//! Daemon module for the Pomodoro Timer.
//!
//! This module contains the core daemon functionality:
//! - `timer`: Timer engine with phase transitions and countdown logic
//! - `watcher`: Settings file observation and reconciliation
//! - `runtime`: The event loop serializing ticks, commands and reloads
//! - `settings`: Launching the external settings editor

pub mod error;
pub mod runtime;
pub mod settings;
pub mod timer;
pub mod watcher;

pub use error::WatchError;
pub use runtime::{Command, Daemon, DaemonChannels, BLINK_PERIOD, TICK_PERIOD};
pub use settings::{EditorLauncher, MockSettingsLauncher, SettingsLauncher};
pub use timer::{TimerEngine, TimerEvent};
pub use watcher::{reconcile, ConfigChanged, ConfigWatcher, Reconciliation};
