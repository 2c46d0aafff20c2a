//! Core data types for the Pomodoro Timer.
//!
//! This module defines the data structures used for:
//! - Timer phase/mode state management
//! - The user-tunable configuration record and its partial updates
//! - The persisted timer snapshot schema

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::sound::default_sound_file;

// ============================================================================
// Phase
// ============================================================================

/// What the countdown currently represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Focused work session
    Work,
    /// Short break between two work sessions
    ShortBreak,
    /// Long break closing a full cycle
    LongBreak,
}

impl Phase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Work => "work",
            Phase::ShortBreak => "short_break",
            Phase::LongBreak => "long_break",
        }
    }

    /// Returns true for both kinds of break.
    pub fn is_break(&self) -> bool {
        matches!(self, Phase::ShortBreak | Phase::LongBreak)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Work
    }
}

// ============================================================================
// Mode
// ============================================================================

/// Whether the countdown is advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Idle, showing the full duration of the current phase
    Stopped,
    /// Counting down once per second
    Running,
    /// Countdown halted, remaining time retained
    Paused,
}

impl Mode {
    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Stopped => "stopped",
            Mode::Running => "running",
            Mode::Paused => "paused",
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Stopped
    }
}

// ============================================================================
// IndicatorPosition
// ============================================================================

/// Placement hint for the display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorPosition {
    Left,
    Center,
    Right,
}

impl IndicatorPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorPosition::Left => "left",
            IndicatorPosition::Center => "center",
            IndicatorPosition::Right => "right",
        }
    }
}

impl Default for IndicatorPosition {
    fn default() -> Self {
        IndicatorPosition::Right
    }
}

impl fmt::Display for IndicatorPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndicatorPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(IndicatorPosition::Left),
            "center" => Ok(IndicatorPosition::Center),
            "right" => Ok(IndicatorPosition::Right),
            other => Err(format!("不明な表示位置です: {}", other)),
        }
    }
}

// ============================================================================
// Config
// ============================================================================

/// Default number of work sessions per cycle.
pub const DEFAULT_TOTAL_ROUNDS: u32 = 4;
/// Default work duration in seconds.
pub const DEFAULT_WORK_DURATION: u32 = 25 * 60;
/// Default short break duration in seconds.
pub const DEFAULT_BREAK_DURATION: u32 = 5 * 60;
/// Default long break duration in seconds.
pub const DEFAULT_LONG_BREAK_DURATION: u32 = 15 * 60;

/// The user-tunable configuration record.
///
/// Always fully populated: loading goes through [`ConfigUpdate`] merged over
/// [`Config::default`], so a partially initialized record never exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Work sessions per full cycle (>= 1)
    pub total_rounds: u32,
    /// Work duration in seconds (> 0)
    pub work_duration: u32,
    /// Short break duration in seconds (> 0)
    pub break_duration: u32,
    /// Long break duration in seconds (> 0)
    pub long_break_duration: u32,
    /// Whether to play a sound on phase completion
    pub sound_enabled: bool,
    /// Sound played on phase completion
    pub sound_file: PathBuf,
    /// Display surface placement
    pub indicator_position: IndicatorPosition,
    /// Display surface placement index within its position
    pub indicator_index: i32,
    /// Show the remaining time even while stopped
    pub show_time_always: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            total_rounds: DEFAULT_TOTAL_ROUNDS,
            work_duration: DEFAULT_WORK_DURATION,
            break_duration: DEFAULT_BREAK_DURATION,
            long_break_duration: DEFAULT_LONG_BREAK_DURATION,
            sound_enabled: true,
            sound_file: default_sound_file(),
            indicator_position: IndicatorPosition::Right,
            indicator_index: 0,
            show_time_always: false,
        }
    }
}

impl Config {
    /// Returns the configured duration of `phase` in seconds.
    pub fn duration_of(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.work_duration,
            Phase::ShortBreak => self.break_duration,
            Phase::LongBreak => self.long_break_duration,
        }
    }

    /// Merges every present field of `update` into this record.
    pub fn apply(&mut self, update: &ConfigUpdate) {
        if let Some(v) = update.total_rounds {
            self.total_rounds = v;
        }
        if let Some(v) = update.work_duration {
            self.work_duration = v;
        }
        if let Some(v) = update.break_duration {
            self.break_duration = v;
        }
        if let Some(v) = update.long_break_duration {
            self.long_break_duration = v;
        }
        if let Some(v) = update.sound_enabled {
            self.sound_enabled = v;
        }
        if let Some(ref v) = update.sound_file {
            self.sound_file = v.clone();
        }
        if let Some(v) = update.indicator_position {
            self.indicator_position = v;
        }
        if let Some(v) = update.indicator_index {
            self.indicator_index = v;
        }
        if let Some(v) = update.show_time_always {
            self.show_time_always = v;
        }
    }

    /// Returns a copy with `update` merged in.
    #[must_use]
    pub fn merged(mut self, update: &ConfigUpdate) -> Self {
        self.apply(update);
        self
    }

    /// Computes the field-level delta from `self` to `other`.
    ///
    /// Only fields whose value differs are present in the result.
    pub fn diff(&self, other: &Config) -> ConfigUpdate {
        fn changed<T: PartialEq + Clone>(old: &T, new: &T) -> Option<T> {
            (old != new).then(|| new.clone())
        }

        ConfigUpdate {
            total_rounds: changed(&self.total_rounds, &other.total_rounds),
            work_duration: changed(&self.work_duration, &other.work_duration),
            break_duration: changed(&self.break_duration, &other.break_duration),
            long_break_duration: changed(&self.long_break_duration, &other.long_break_duration),
            sound_enabled: changed(&self.sound_enabled, &other.sound_enabled),
            sound_file: changed(&self.sound_file, &other.sound_file),
            indicator_position: changed(&self.indicator_position, &other.indicator_position),
            indicator_index: changed(&self.indicator_index, &other.indicator_index),
            show_time_always: changed(&self.show_time_always, &other.show_time_always),
        }
    }
}

// ============================================================================
// ConfigUpdate
// ============================================================================

/// A partial configuration update; every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_rounds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub break_duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_break_duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicator_position: Option<IndicatorPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicator_index: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_time_always: Option<bool>,
}

impl ConfigUpdate {
    /// Extracts every well-formed field from a stored JSON record.
    ///
    /// A field is kept only when it has the right JSON type and satisfies the
    /// data-model bounds; anything else (including a non-object root) is
    /// dropped so the default fills in for that single field.
    pub fn from_json(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        let positive = |key: &str| {
            obj.get(key)
                .and_then(Value::as_u64)
                .filter(|v| *v > 0)
                .and_then(|v| u32::try_from(v).ok())
        };
        let flag = |key: &str| obj.get(key).and_then(Value::as_bool);

        Self {
            total_rounds: positive("totalRounds"),
            work_duration: positive("workDuration"),
            break_duration: positive("breakDuration"),
            long_break_duration: positive("longBreakDuration"),
            sound_enabled: flag("soundEnabled"),
            sound_file: obj
                .get("soundFile")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            indicator_position: obj
                .get("indicatorPosition")
                .and_then(Value::as_str)
                .and_then(|s| s.parse().ok()),
            indicator_index: obj
                .get("indicatorIndex")
                .and_then(Value::as_i64)
                .and_then(|v| i32::try_from(v).ok()),
            show_time_always: flag("showTimeAlways"),
        }
    }

    /// Returns true if no field is present.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns true if the display placement is part of this update.
    pub fn changes_placement(&self) -> bool {
        self.indicator_position.is_some() || self.indicator_index.is_some()
    }

    /// Returns true if any phase duration is part of this update.
    pub fn changes_durations(&self) -> bool {
        self.work_duration.is_some()
            || self.break_duration.is_some()
            || self.long_break_duration.is_some()
    }
}

impl From<&Config> for ConfigUpdate {
    /// Every field present, as used by a full reload.
    fn from(config: &Config) -> Self {
        Self {
            total_rounds: Some(config.total_rounds),
            work_duration: Some(config.work_duration),
            break_duration: Some(config.break_duration),
            long_break_duration: Some(config.long_break_duration),
            sound_enabled: Some(config.sound_enabled),
            sound_file: Some(config.sound_file.clone()),
            indicator_position: Some(config.indicator_position),
            indicator_index: Some(config.indicator_index),
            show_time_always: Some(config.show_time_always),
        }
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// The engine's runtime record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// What the countdown represents
    pub phase: Phase,
    /// Whether the countdown is advancing
    pub mode: Mode,
    /// Current work session within the cycle (1..=total_rounds)
    pub current_round: u32,
    /// Remaining seconds in the current phase
    pub remaining_seconds: u32,
}

impl TimerState {
    /// Creates the fresh-start state: first work session, stopped, full duration.
    pub fn new(config: &Config) -> Self {
        Self {
            phase: Phase::Work,
            mode: Mode::Stopped,
            current_round: 1,
            remaining_seconds: config.work_duration,
        }
    }

    /// Returns true if the countdown is advancing.
    pub fn is_running(&self) -> bool {
        self.mode == Mode::Running
    }

    /// Returns true if the countdown is halted mid-phase.
    pub fn is_paused(&self) -> bool {
        self.mode == Mode::Paused
    }

    /// Returns true if the timer is idle.
    pub fn is_stopped(&self) -> bool {
        self.mode == Mode::Stopped
    }

    /// Decrements the countdown by one second.
    ///
    /// Returns true if the countdown has reached zero.
    pub fn tick(&mut self) -> bool {
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.remaining_seconds == 0
    }

    /// Rewinds the countdown to the full duration of the current phase.
    pub fn rewind(&mut self, config: &Config) {
        self.remaining_seconds = config.duration_of(self.phase);
    }

    /// Pulls round/phase/remaining back inside the bounds implied by `config`.
    ///
    /// Used after the round count changes and when adopting a restored snapshot.
    pub fn clamp_to(&mut self, config: &Config) {
        let total = config.total_rounds.max(1);
        self.current_round = self.current_round.clamp(1, total);
        if self.phase == Phase::LongBreak {
            self.current_round = total;
        }
        let duration = config.duration_of(self.phase);
        if self.remaining_seconds == 0 || self.remaining_seconds > duration {
            self.remaining_seconds = duration;
        }
    }
}

// ============================================================================
// PersistedSnapshot
// ============================================================================

/// On-disk schema of the timer snapshot.
///
/// The phase is encoded as two booleans: `Work → (false, false)`,
/// `ShortBreak → (true, false)`, `LongBreak → (true, true)`.
/// A paused countdown is stored with both `isRunning` and `isPaused` set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSnapshot {
    pub current_round: u32,
    pub is_break_time: bool,
    pub is_long_break: bool,
    pub is_running: bool,
    pub is_paused: bool,
    pub remaining_seconds: u32,
}

impl From<&TimerState> for PersistedSnapshot {
    fn from(state: &TimerState) -> Self {
        let (is_break_time, is_long_break) = match state.phase {
            Phase::Work => (false, false),
            Phase::ShortBreak => (true, false),
            Phase::LongBreak => (true, true),
        };
        let (is_running, is_paused) = match state.mode {
            Mode::Stopped => (false, false),
            Mode::Running => (true, false),
            Mode::Paused => (true, true),
        };

        Self {
            current_round: state.current_round,
            is_break_time,
            is_long_break,
            is_running,
            is_paused,
            remaining_seconds: state.remaining_seconds,
        }
    }
}

impl TryFrom<PersistedSnapshot> for TimerState {
    type Error = String;

    fn try_from(snapshot: PersistedSnapshot) -> Result<Self, Self::Error> {
        let phase = match (snapshot.is_break_time, snapshot.is_long_break) {
            (false, false) => Phase::Work,
            (true, false) => Phase::ShortBreak,
            (true, true) => Phase::LongBreak,
            (false, true) => {
                return Err("isLongBreak is set without isBreakTime".to_string());
            }
        };
        let mode = match (snapshot.is_running, snapshot.is_paused) {
            (_, true) => Mode::Paused,
            (true, false) => Mode::Running,
            (false, false) => Mode::Stopped,
        };
        if snapshot.current_round == 0 {
            return Err("currentRound must be at least 1".to_string());
        }

        Ok(Self {
            phase,
            mode,
            current_round: snapshot.current_round,
            remaining_seconds: snapshot.remaining_seconds,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
