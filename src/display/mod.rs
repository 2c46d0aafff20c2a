//! Display surface for the Pomodoro Timer.
//!
//! This module provides:
//! - Display-signal formatting (`MM:SS`, icon tag, status, round progress)
//! - The command-surface menu model
//! - A terminal display surface driven over a crossbeam channel
//!
//! # Architecture
//!
//! The runtime (tokio, single thread) owns the engine and pushes
//! [`DisplayUpdate`]s; the display runs on its own thread and never touches
//! timer logic. The only message flowing back is
//! [`Command::DisplayReattached`](crate::daemon::Command::DisplayReattached)
//! after a relocation.
//!
//! ```ignore
//! let (tx, rx) = crossbeam_channel::unbounded();
//! let display = TerminalDisplay::new(std::io::stdout(), rx, command_tx, placement, false);
//! std::thread::spawn(move || display.run());
//! tx.send(DisplayUpdate::Render(snapshot))?;
//! ```

pub mod format;
pub mod menu;
pub mod terminal;

pub use format::{
    format_time, progress_text, status_text, time_visible, toggle_label, DisplayMode,
    DisplaySnapshot, IconTag,
};
pub use menu::{MenuAction, MenuConfig, MenuItemConfig};
pub use terminal::{Placement, TerminalDisplay};

use crate::types::IndicatorPosition;

/// Messages from the runtime to the display surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayUpdate {
    /// Draw this frame
    Render(DisplaySnapshot),
    /// Destroy and recreate the indicator at a new placement
    Relocate {
        position: IndicatorPosition,
        index: i32,
    },
    /// Presentation-only `showTimeAlways` hint
    SetTimeAlwaysVisible(bool),
    /// Stop the display thread
    Shutdown,
}
