//! Display-signal formatting.
//!
//! This module turns the engine's state into the strings and flags a display
//! surface renders:
//! - Remaining time as `MM:SS`
//! - Icon tag (`Work` / `Break`)
//! - Status line and round progress
//! - Blink/steady display mode
//!
//! Everything here is pure and fully testable.

use std::fmt;

use crate::types::{Config, Mode, Phase, TimerState};

// ============================================================================
// Constants
// ============================================================================

/// Emoji for a work phase
const WORK_EMOJI: &str = "🍅";

/// Emoji for either break phase
const BREAK_EMOJI: &str = "☕";

// ============================================================================
// IconTag
// ============================================================================

/// Which icon the display surface shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconTag {
    Work,
    Break,
}

impl IconTag {
    /// Returns the tag for `phase`.
    pub fn for_phase(phase: Phase) -> Self {
        if phase.is_break() {
            IconTag::Break
        } else {
            IconTag::Work
        }
    }

    /// Returns the emoji drawn for this tag.
    pub fn emoji(&self) -> &'static str {
        match self {
            IconTag::Work => WORK_EMOJI,
            IconTag::Break => BREAK_EMOJI,
        }
    }
}

impl fmt::Display for IconTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconTag::Work => write!(f, "Work"),
            IconTag::Break => write!(f, "Break"),
        }
    }
}

// ============================================================================
// DisplayMode
// ============================================================================

/// Steady rendering, or the blink cue that asks for the next start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Steady,
    /// Blinking; `dimmed` is the current half of the cycle
    Blink { dimmed: bool },
}

impl DisplayMode {
    pub fn is_blinking(&self) -> bool {
        matches!(self, DisplayMode::Blink { .. })
    }
}

// ============================================================================
// Formatting functions
// ============================================================================

/// Formats remaining time as MM:SS.
///
/// Minutes are not wrapped into hours, so 3600 seconds renders as `60:00`.
pub fn format_time(remaining_seconds: u32) -> String {
    let minutes = remaining_seconds / 60;
    let seconds = remaining_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

/// Returns the menu status line for `state`.
pub fn status_text(state: &TimerState) -> &'static str {
    match (state.mode, state.phase) {
        (Mode::Paused, _) => "Paused",
        (Mode::Running, Phase::Work) => "Working...",
        (Mode::Running, Phase::ShortBreak) => "Short break...",
        (Mode::Running, Phase::LongBreak) => "Long break...",
        (Mode::Stopped, Phase::Work) => "Ready to work",
        (Mode::Stopped, Phase::ShortBreak) => "Ready for break",
        (Mode::Stopped, Phase::LongBreak) => "Ready for long break",
    }
}

/// Returns the round progress line.
pub fn progress_text(state: &TimerState, total_rounds: u32) -> String {
    if state.phase == Phase::LongBreak {
        "Long break".to_string()
    } else {
        format!("Round: {}/{}", state.current_round, total_rounds)
    }
}

/// Returns the label of the single start/pause/resume menu slot.
pub fn toggle_label(mode: Mode) -> &'static str {
    match mode {
        Mode::Stopped => "Start",
        Mode::Running => "Pause",
        Mode::Paused => "Resume",
    }
}

/// Returns true if the remaining time should be shown.
pub fn time_visible(show_time_always: bool, mode: Mode) -> bool {
    show_time_always || mode != Mode::Stopped
}

// ============================================================================
// DisplaySnapshot
// ============================================================================

/// Everything a display surface needs to render one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySnapshot {
    /// Remaining time, `MM:SS`
    pub time_text: String,
    /// Icon/state tag
    pub icon: IconTag,
    /// Status line
    pub status: &'static str,
    /// Round progress line
    pub progress: String,
    /// Blink or steady
    pub display_mode: DisplayMode,
    /// Engine mode, for time visibility and the toggle label
    pub timer_mode: Mode,
}

impl DisplaySnapshot {
    /// Captures the display signals for the current engine state.
    ///
    /// `blink` is `Some(dimmed)` while the blink cue is active.
    pub fn capture(state: &TimerState, config: &Config, blink: Option<bool>) -> Self {
        Self {
            time_text: format_time(state.remaining_seconds),
            icon: IconTag::for_phase(state.phase),
            status: status_text(state),
            progress: progress_text(state, config.total_rounds),
            display_mode: match blink {
                Some(dimmed) => DisplayMode::Blink { dimmed },
                None => DisplayMode::Steady,
            },
            timer_mode: state.mode,
        }
    }

    /// Returns the toggle slot label for this frame.
    pub fn toggle_label(&self) -> &'static str {
        toggle_label(self.timer_mode)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn state(phase: Phase, mode: Mode, round: u32, remaining: u32) -> TimerState {
        TimerState {
            phase,
            mode,
            current_round: round,
            remaining_seconds: remaining,
        }
    }

    mod format_time_tests {
        use super::*;

        #[test]
        fn test_format_time() {
            assert_eq!(format_time(0), "00:00");
            assert_eq!(format_time(59), "00:59");
            assert_eq!(format_time(60), "01:00");
            assert_eq!(format_time(1500), "25:00");
            assert_eq!(format_time(930), "15:30");
        }

        #[test]
        fn test_format_time_over_an_hour() {
            assert_eq!(format_time(3600), "60:00");
            assert_eq!(format_time(3661), "61:01");
        }
    }

    mod status_tests {
        use super::*;

        #[test]
        fn test_status_text_all_combinations() {
            let cases = [
                (Phase::Work, Mode::Running, "Working..."),
                (Phase::ShortBreak, Mode::Running, "Short break..."),
                (Phase::LongBreak, Mode::Running, "Long break..."),
                (Phase::Work, Mode::Paused, "Paused"),
                (Phase::LongBreak, Mode::Paused, "Paused"),
                (Phase::Work, Mode::Stopped, "Ready to work"),
                (Phase::ShortBreak, Mode::Stopped, "Ready for break"),
                (Phase::LongBreak, Mode::Stopped, "Ready for long break"),
            ];
            for (phase, mode, expected) in cases {
                assert_eq!(status_text(&state(phase, mode, 1, 10)), expected);
            }
        }

        #[test]
        fn test_progress_text() {
            assert_eq!(
                progress_text(&state(Phase::Work, Mode::Running, 2, 10), 4),
                "Round: 2/4"
            );
            assert_eq!(
                progress_text(&state(Phase::ShortBreak, Mode::Stopped, 3, 10), 4),
                "Round: 3/4"
            );
            assert_eq!(
                progress_text(&state(Phase::LongBreak, Mode::Running, 4, 10), 4),
                "Long break"
            );
        }

        #[test]
        fn test_toggle_label() {
            assert_eq!(toggle_label(Mode::Stopped), "Start");
            assert_eq!(toggle_label(Mode::Running), "Pause");
            assert_eq!(toggle_label(Mode::Paused), "Resume");
        }

        #[test]
        fn test_time_visible() {
            assert!(!time_visible(false, Mode::Stopped));
            assert!(time_visible(false, Mode::Running));
            assert!(time_visible(false, Mode::Paused));
            assert!(time_visible(true, Mode::Stopped));
        }
    }

    mod snapshot_tests {
        use super::*;

        #[test]
        fn test_icon_tag() {
            assert_eq!(IconTag::for_phase(Phase::Work), IconTag::Work);
            assert_eq!(IconTag::for_phase(Phase::ShortBreak), IconTag::Break);
            assert_eq!(IconTag::for_phase(Phase::LongBreak), IconTag::Break);
            assert_eq!(IconTag::Work.to_string(), "Work");
            assert_eq!(IconTag::Break.emoji(), "☕");
        }

        #[test]
        fn test_capture_steady() {
            let config = Config::default();
            let snapshot =
                DisplaySnapshot::capture(&state(Phase::Work, Mode::Running, 1, 930), &config, None);

            assert_eq!(snapshot.time_text, "15:30");
            assert_eq!(snapshot.icon, IconTag::Work);
            assert_eq!(snapshot.status, "Working...");
            assert_eq!(snapshot.progress, "Round: 1/4");
            assert_eq!(snapshot.display_mode, DisplayMode::Steady);
            assert_eq!(snapshot.toggle_label(), "Pause");
        }

        #[test]
        fn test_capture_blinking() {
            let config = Config::default();
            let snapshot = DisplaySnapshot::capture(
                &state(Phase::ShortBreak, Mode::Stopped, 1, 300),
                &config,
                Some(true),
            );

            assert!(snapshot.display_mode.is_blinking());
            assert_eq!(snapshot.display_mode, DisplayMode::Blink { dimmed: true });
            assert_eq!(snapshot.status, "Ready for break");
        }
    }
}
