//! Command-surface model.
//!
//! This module handles:
//! - The user actions the menu offers and their textual command names
//! - Menu item labels and enabled state derived from the current frame

use std::fmt;
use std::str::FromStr;

use super::format::DisplaySnapshot;
use crate::types::Mode;

// ============================================================================
// MenuAction
// ============================================================================

/// Actions the user can trigger from the command surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Start, pause, or resume depending on the mode
    Toggle,
    Start,
    Pause,
    Resume,
    Stop,
    Reset,
    /// Open the settings editor
    Settings,
    Quit,
}

impl MenuAction {
    /// Every action, in menu order.
    pub const ALL: [MenuAction; 8] = [
        MenuAction::Toggle,
        MenuAction::Start,
        MenuAction::Pause,
        MenuAction::Resume,
        MenuAction::Stop,
        MenuAction::Reset,
        MenuAction::Settings,
        MenuAction::Quit,
    ];

    /// Returns the command word for this action.
    pub fn as_command(&self) -> &'static str {
        match self {
            MenuAction::Toggle => "toggle",
            MenuAction::Start => "start",
            MenuAction::Pause => "pause",
            MenuAction::Resume => "resume",
            MenuAction::Stop => "stop",
            MenuAction::Reset => "reset",
            MenuAction::Settings => "settings",
            MenuAction::Quit => "quit",
        }
    }
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_command())
    }
}

impl FromStr for MenuAction {
    type Err = String;

    /// Parses a line typed on the command surface.
    ///
    /// An empty line is the toggle slot; `q` and `exit` are accepted for quit.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let word = s.trim().to_ascii_lowercase();
        match word.as_str() {
            "" | "toggle" => Ok(MenuAction::Toggle),
            "q" | "exit" => Ok(MenuAction::Quit),
            other => MenuAction::ALL
                .into_iter()
                .find(|action| action.as_command() == other)
                .ok_or_else(|| format!("unknown command: {}", other)),
        }
    }
}

// ============================================================================
// MenuItemConfig / MenuConfig
// ============================================================================

/// Configuration for a menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItemConfig {
    /// Display text for the menu item
    pub text: String,
    /// Whether the menu item is enabled (clickable)
    pub enabled: bool,
}

impl MenuItemConfig {
    pub fn new(text: impl Into<String>, enabled: bool) -> Self {
        Self {
            text: text.into(),
            enabled,
        }
    }
}

/// Complete menu configuration for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuConfig {
    /// Title item (never enabled)
    pub title: MenuItemConfig,
    /// Status line (never enabled)
    pub status: MenuItemConfig,
    /// Round progress (never enabled)
    pub progress: MenuItemConfig,
    /// Start/Pause/Resume slot
    pub toggle: MenuItemConfig,
    pub stop: MenuItemConfig,
    pub reset: MenuItemConfig,
    pub settings: MenuItemConfig,
}

impl MenuConfig {
    /// Builds the menu for `snapshot`.
    pub fn build(snapshot: &DisplaySnapshot) -> Self {
        Self {
            title: MenuItemConfig::new("Pomodoro Timer", false),
            status: MenuItemConfig::new(snapshot.status, false),
            progress: MenuItemConfig::new(snapshot.progress.clone(), false),
            toggle: MenuItemConfig::new(snapshot.toggle_label(), true),
            stop: MenuItemConfig::new("Stop", snapshot.timer_mode != Mode::Stopped),
            reset: MenuItemConfig::new("Reset", true),
            settings: MenuItemConfig::new("Settings", true),
        }
    }

    /// Returns the clickable items in menu order.
    pub fn actions(&self) -> Vec<&MenuItemConfig> {
        [&self.toggle, &self.stop, &self.reset, &self.settings]
            .into_iter()
            .filter(|item| item.enabled)
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Config, Phase, TimerState};

    mod menu_action_tests {
        use super::*;

        #[test]
        fn test_parse_words() {
            assert_eq!("start".parse(), Ok(MenuAction::Start));
            assert_eq!(" Pause \n".parse(), Ok(MenuAction::Pause));
            assert_eq!("settings".parse(), Ok(MenuAction::Settings));
            assert_eq!("q".parse(), Ok(MenuAction::Quit));
        }

        #[test]
        fn test_empty_line_is_toggle() {
            assert_eq!("".parse(), Ok(MenuAction::Toggle));
            assert_eq!("\n".parse(), Ok(MenuAction::Toggle));
        }

        #[test]
        fn test_unknown_word() {
            assert!("launch".parse::<MenuAction>().is_err());
        }

        #[test]
        fn test_display_matches_command() {
            for action in MenuAction::ALL {
                assert_eq!(action.to_string(), action.as_command());
                assert_eq!(action.as_command().parse(), Ok(action));
            }
        }
    }

    mod menu_config_tests {
        use super::*;

        fn snapshot(mode: Mode) -> DisplaySnapshot {
            let state = TimerState {
                phase: Phase::Work,
                mode,
                current_round: 1,
                remaining_seconds: 1500,
            };
            DisplaySnapshot::capture(&state, &Config::default(), None)
        }

        #[test]
        fn test_build_stopped() {
            let menu = MenuConfig::build(&snapshot(Mode::Stopped));
            assert_eq!(menu.title.text, "Pomodoro Timer");
            assert!(!menu.title.enabled);
            assert_eq!(menu.status.text, "Ready to work");
            assert_eq!(menu.progress.text, "Round: 1/4");
            assert_eq!(menu.toggle.text, "Start");
            assert!(!menu.stop.enabled);

            let labels: Vec<_> = menu.actions().iter().map(|i| i.text.as_str()).collect();
            assert_eq!(labels, vec!["Start", "Reset", "Settings"]);
        }

        #[test]
        fn test_build_running() {
            let menu = MenuConfig::build(&snapshot(Mode::Running));
            assert_eq!(menu.toggle.text, "Pause");
            assert!(menu.stop.enabled);
        }

        #[test]
        fn test_build_paused() {
            let menu = MenuConfig::build(&snapshot(Mode::Paused));
            assert_eq!(menu.toggle.text, "Resume");
            assert_eq!(menu.status.text, "Paused");
        }
    }
}
