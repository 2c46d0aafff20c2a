//! Timer engine for the Pomodoro Timer.
//!
//! This module provides the phase/countdown state machine:
//! - Work → ShortBreak → Work ... → LongBreak → (reset) cycle
//! - Commands validated against the current mode (invalid ones are no-ops)
//! - Snapshot persistence on pause/stop/phase completion
//! - Live configuration merging without disturbing an in-flight countdown
//!
//! The engine is purely synchronous. Scheduling of the one-second tick and
//! of the blink cue belongs to [`super::runtime`]; the engine only reports
//! what happened through [`TimerEvent`]s.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::sound::PhaseNotifier;
use crate::store::SnapshotStore;
use crate::types::{Config, ConfigUpdate, Mode, Phase, TimerState};

// ============================================================================
// TimerEvent
// ============================================================================

/// Events emitted by the engine after each state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Countdown started from Stopped
    Started {
        phase: Phase,
        remaining_seconds: u32,
    },
    /// Countdown halted
    Paused { remaining_seconds: u32 },
    /// Countdown continued from Paused
    Resumed { remaining_seconds: u32 },
    /// Countdown canceled and rewound to the full phase duration
    Stopped {
        phase: Phase,
        remaining_seconds: u32,
    },
    /// Returned to the fresh-start state
    Reset,
    /// One second elapsed
    Tick { remaining_seconds: u32 },
    /// A phase ran to zero
    PhaseCompleted {
        completed: Phase,
        next: Phase,
        round: u32,
    },
    /// The long break finished and the cycle restarted idle
    CycleCompleted,
    /// The next phase is ready and waits for a human to start it
    AwaitingStart { phase: Phase },
    /// A configuration update was merged
    ConfigApplied { remaining_recomputed: bool },
}

// ============================================================================
// TimerEngine
// ============================================================================

/// The phase/countdown state machine.
pub struct TimerEngine {
    /// Current timer state
    state: TimerState,
    /// Currently applied configuration
    config: Config,
    /// Set after a phase completion until the next command
    awaiting_start: bool,
    /// Snapshot persistence
    snapshots: Box<dyn SnapshotStore>,
    /// Completion cue
    notifier: Box<dyn PhaseNotifier>,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl TimerEngine {
    /// Creates an engine in the fresh-start state.
    ///
    /// The stored snapshot is left untouched; call [`Self::start_fresh`] or
    /// [`Self::restore`] to decide what to do with it.
    pub fn new(
        config: Config,
        snapshots: Box<dyn SnapshotStore>,
        notifier: Box<dyn PhaseNotifier>,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        Self {
            state: TimerState::new(&config),
            config,
            awaiting_start: false,
            snapshots,
            notifier,
            event_tx,
        }
    }

    /// Discards any stored snapshot so nothing stale can be resumed later.
    pub fn start_fresh(&mut self) {
        if let Err(e) = self.snapshots.clear() {
            warn!("タイマー状態を削除できません: {}", e);
        }
    }

    /// Adopts the stored snapshot, if any.
    ///
    /// The snapshot is clamped to the current configuration. A countdown that
    /// was running or paused comes back as Paused; an idle one is rewound to
    /// the configured duration. Returns true if a snapshot was adopted.
    pub fn restore(&mut self) -> bool {
        let Some(mut restored) = self.snapshots.load() else {
            debug!("No snapshot to restore");
            return false;
        };

        restored.clamp_to(&self.config);
        match restored.mode {
            Mode::Stopped => restored.rewind(&self.config),
            Mode::Running | Mode::Paused => restored.mode = Mode::Paused,
        }

        info!(
            "タイマー状態を復元しました: {} round {} ({}s)",
            restored.phase.as_str(),
            restored.current_round,
            restored.remaining_seconds
        );
        self.state = restored;
        self.awaiting_start = false;
        self.check_invariants();
        true
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Starts the countdown for the current phase. Only valid from Stopped.
    pub fn start(&mut self) {
        self.awaiting_start = false;
        if self.state.mode != Mode::Stopped {
            debug!("start ignored in mode {}", self.state.mode.as_str());
            return;
        }

        self.state.mode = Mode::Running;
        info!(
            "Started {} (round {}/{})",
            self.state.phase.as_str(),
            self.state.current_round,
            self.config.total_rounds
        );
        self.emit(TimerEvent::Started {
            phase: self.state.phase,
            remaining_seconds: self.state.remaining_seconds,
        });
    }

    /// Halts the countdown and persists it. Only valid from Running.
    pub fn pause(&mut self) {
        self.awaiting_start = false;
        if self.state.mode != Mode::Running {
            debug!("pause ignored in mode {}", self.state.mode.as_str());
            return;
        }

        self.state.mode = Mode::Paused;
        self.persist();
        self.emit(TimerEvent::Paused {
            remaining_seconds: self.state.remaining_seconds,
        });
    }

    /// Continues the countdown from the retained remaining time. Only valid from Paused.
    pub fn resume(&mut self) {
        if self.state.mode != Mode::Paused {
            debug!("resume ignored in mode {}", self.state.mode.as_str());
            return;
        }

        self.state.mode = Mode::Running;
        self.emit(TimerEvent::Resumed {
            remaining_seconds: self.state.remaining_seconds,
        });
    }

    /// Single start/pause/resume slot of the menu.
    pub fn toggle(&mut self) {
        match self.state.mode {
            Mode::Running => self.pause(),
            Mode::Paused => self.resume(),
            Mode::Stopped => self.start(),
        }
    }

    /// Cancels the countdown and rewinds it to the full phase duration.
    ///
    /// Phase and round are preserved.
    pub fn stop(&mut self) {
        self.awaiting_start = false;
        self.state.mode = Mode::Stopped;
        self.state.rewind(&self.config);
        self.persist();
        self.check_invariants();
        self.emit(TimerEvent::Stopped {
            phase: self.state.phase,
            remaining_seconds: self.state.remaining_seconds,
        });
    }

    /// Returns to the fresh-start state and deletes the stored snapshot.
    pub fn reset(&mut self) {
        self.reset_state();
        self.emit(TimerEvent::Reset);
    }

    /// Advances the countdown by one second. Ignored unless Running.
    pub fn tick(&mut self) {
        if self.state.mode != Mode::Running {
            debug!("tick ignored in mode {}", self.state.mode.as_str());
            return;
        }

        let finished = self.state.tick();
        self.emit(TimerEvent::Tick {
            remaining_seconds: self.state.remaining_seconds,
        });

        if finished {
            self.complete_phase();
        }
    }

    /// Merges a partial configuration update.
    ///
    /// An idle timer immediately mirrors the new duration of its phase. A
    /// running or paused countdown keeps its remaining time; new durations
    /// take effect from the next phase.
    pub fn apply_config(&mut self, update: &ConfigUpdate) {
        if update.is_empty() {
            return;
        }

        self.config.apply(update);

        let total = self.config.total_rounds.max(1);
        self.state.current_round = self.state.current_round.clamp(1, total);
        if self.state.phase == Phase::LongBreak {
            self.state.current_round = total;
        }

        let recomputed = self.state.mode == Mode::Stopped;
        if recomputed {
            self.state.rewind(&self.config);
        }

        info!(
            "設定を反映しました (remaining {}s{})",
            self.state.remaining_seconds,
            if recomputed { ", recomputed" } else { "" }
        );
        self.check_invariants();
        self.emit(TimerEvent::ConfigApplied {
            remaining_recomputed: recomputed,
        });
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Returns the current timer state.
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Returns the currently applied configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns true while a completed phase waits for the next start.
    pub fn awaiting_start(&self) -> bool {
        self.awaiting_start
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn complete_phase(&mut self) {
        let completed = self.state.phase;
        self.state.mode = Mode::Stopped;

        match completed {
            Phase::LongBreak => {
                self.reset_state();
                self.notify();
                info!("Cycle completed");
                self.emit(TimerEvent::PhaseCompleted {
                    completed,
                    next: Phase::Work,
                    round: 1,
                });
                self.emit(TimerEvent::CycleCompleted);
                return;
            }
            Phase::ShortBreak => {
                self.state.current_round = (self.state.current_round + 1).min(self.config.total_rounds);
                self.state.phase = Phase::Work;
            }
            Phase::Work => {
                self.state.phase = if self.state.current_round >= self.config.total_rounds {
                    self.state.current_round = self.config.total_rounds;
                    Phase::LongBreak
                } else {
                    Phase::ShortBreak
                };
            }
        }

        self.state.rewind(&self.config);
        self.persist();
        self.notify();
        self.awaiting_start = true;
        self.check_invariants();

        info!(
            "{} completed, next: {} (round {}/{})",
            completed.as_str(),
            self.state.phase.as_str(),
            self.state.current_round,
            self.config.total_rounds
        );
        self.emit(TimerEvent::PhaseCompleted {
            completed,
            next: self.state.phase,
            round: self.state.current_round,
        });
        self.emit(TimerEvent::AwaitingStart {
            phase: self.state.phase,
        });
    }

    fn reset_state(&mut self) {
        self.state = TimerState::new(&self.config);
        self.awaiting_start = false;
        if let Err(e) = self.snapshots.clear() {
            warn!("タイマー状態を削除できません: {}", e);
        }
        self.check_invariants();
    }

    fn persist(&self) {
        if let Err(e) = self.snapshots.save(&self.state) {
            warn!("タイマー状態を保存できません: {}", e);
        }
    }

    fn notify(&self) {
        self.notifier
            .notify_phase_complete(self.config.sound_enabled, &self.config.sound_file);
    }

    fn emit(&self, event: TimerEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("Timer event receiver dropped");
        }
    }

    fn check_invariants(&self) {
        let total = self.config.total_rounds;
        debug_assert!(
            (1..=total).contains(&self.state.current_round),
            "round {} outside 1..={}",
            self.state.current_round,
            total
        );
        debug_assert!(
            self.state.phase != Phase::LongBreak || self.state.current_round == total,
            "long break outside the last round"
        );
        debug_assert!(
            self.state.mode != Mode::Stopped
                || self.state.remaining_seconds <= self.config.duration_of(self.state.phase),
            "idle countdown exceeds its phase duration"
        );
    }
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("state", &self.state)
            .field("config", &self.config)
            .field("awaiting_start", &self.awaiting_start)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::MockNotifier;
    use crate::store::MemorySnapshotStore;

    struct Harness {
        engine: TimerEngine,
        rx: mpsc::UnboundedReceiver<TimerEvent>,
        snapshots: MemorySnapshotStore,
        notifier: MockNotifier,
    }

    impl Harness {
        fn drain(&mut self) -> Vec<TimerEvent> {
            let mut events = Vec::new();
            while let Ok(event) = self.rx.try_recv() {
                events.push(event);
            }
            events
        }

        fn ticks(&mut self, n: u32) {
            for _ in 0..n {
                self.engine.tick();
            }
        }
    }

    fn small_config() -> Config {
        Config {
            total_rounds: 2,
            work_duration: 5,
            break_duration: 2,
            long_break_duration: 3,
            ..Config::default()
        }
    }

    fn create_engine_with_config(config: Config) -> Harness {
        let (tx, rx) = mpsc::unbounded_channel();
        let snapshots = MemorySnapshotStore::new();
        let notifier = MockNotifier::new();
        let engine = TimerEngine::new(
            config,
            Box::new(snapshots.clone()),
            Box::new(notifier.clone()),
            tx,
        );
        Harness {
            engine,
            rx,
            snapshots,
            notifier,
        }
    }

    fn create_engine() -> Harness {
        create_engine_with_config(small_config())
    }

    // ------------------------------------------------------------------------
    // Command Tests
    // ------------------------------------------------------------------------

    mod command_tests {
        use super::*;

        #[test]
        fn test_new_engine() {
            let h = create_engine();
            assert_eq!(h.engine.state().phase, Phase::Work);
            assert_eq!(h.engine.state().mode, Mode::Stopped);
            assert_eq!(h.engine.state().current_round, 1);
            assert_eq!(h.engine.state().remaining_seconds, 5);
            assert!(!h.engine.awaiting_start());
        }

        #[test]
        fn test_start() {
            let mut h = create_engine();
            h.engine.start();

            assert_eq!(h.engine.state().mode, Mode::Running);
            assert_eq!(
                h.drain(),
                vec![TimerEvent::Started {
                    phase: Phase::Work,
                    remaining_seconds: 5
                }]
            );
        }

        #[test]
        fn test_start_while_running_is_noop() {
            let mut h = create_engine();
            h.engine.start();
            h.drain();

            h.engine.start();
            assert!(h.drain().is_empty());
            assert_eq!(h.engine.state().mode, Mode::Running);
        }

        #[test]
        fn test_start_while_paused_is_noop() {
            let mut h = create_engine();
            h.engine.start();
            h.engine.pause();
            h.drain();

            h.engine.start();
            assert!(h.drain().is_empty());
            assert_eq!(h.engine.state().mode, Mode::Paused);
        }

        #[test]
        fn test_pause_persists() {
            let mut h = create_engine();
            h.engine.start();
            h.ticks(2);
            h.engine.pause();

            assert_eq!(h.engine.state().mode, Mode::Paused);
            assert_eq!(h.snapshots.load(), Some(*h.engine.state()));
            assert_eq!(h.snapshots.save_count(), 1);
        }

        #[test]
        fn test_pause_while_stopped_is_noop() {
            let mut h = create_engine();
            h.engine.pause();

            assert_eq!(h.engine.state().mode, Mode::Stopped);
            assert_eq!(h.snapshots.save_count(), 0);
            assert!(h.drain().is_empty());
        }

        #[test]
        fn test_resume_keeps_remaining() {
            let mut h = create_engine();
            h.engine.start();
            h.ticks(3);
            h.engine.pause();
            h.drain();

            h.engine.resume();
            assert_eq!(h.engine.state().mode, Mode::Running);
            assert_eq!(
                h.drain(),
                vec![TimerEvent::Resumed {
                    remaining_seconds: 2
                }]
            );
        }

        #[test]
        fn test_resume_while_stopped_is_noop() {
            let mut h = create_engine();
            h.engine.resume();
            assert_eq!(h.engine.state().mode, Mode::Stopped);
            assert!(h.drain().is_empty());
        }

        #[test]
        fn test_toggle_cycles_through_modes() {
            let mut h = create_engine();

            h.engine.toggle();
            assert_eq!(h.engine.state().mode, Mode::Running);
            h.engine.toggle();
            assert_eq!(h.engine.state().mode, Mode::Paused);
            h.engine.toggle();
            assert_eq!(h.engine.state().mode, Mode::Running);
        }

        #[test]
        fn test_stop_rewinds_but_keeps_phase_and_round() {
            let mut h = create_engine();
            h.engine.start();
            h.ticks(5);
            h.engine.start();
            h.ticks(1);

            h.engine.stop();
            let state = h.engine.state();
            assert_eq!(state.phase, Phase::ShortBreak);
            assert_eq!(state.current_round, 1);
            assert_eq!(state.mode, Mode::Stopped);
            assert_eq!(state.remaining_seconds, 2);
            assert_eq!(h.snapshots.load(), Some(*state));
        }

        #[test]
        fn test_stop_from_paused() {
            let mut h = create_engine();
            h.engine.start();
            h.ticks(2);
            h.engine.pause();
            h.engine.stop();

            assert_eq!(h.engine.state().mode, Mode::Stopped);
            assert_eq!(h.engine.state().remaining_seconds, 5);
        }

        #[test]
        fn test_stop_then_start_replays_full_duration() {
            let mut h = create_engine();
            h.engine.start();
            h.ticks(3);
            h.engine.stop();
            h.engine.start();

            assert_eq!(h.engine.state().remaining_seconds, 5);
            h.ticks(4);
            assert_eq!(h.engine.state().remaining_seconds, 1);
            assert_eq!(h.engine.state().phase, Phase::Work);
        }

        #[test]
        fn test_reset_clears_snapshot() {
            let mut h = create_engine();
            h.engine.start();
            h.ticks(5);
            assert!(h.snapshots.load().is_some());

            h.engine.reset();
            assert_eq!(*h.engine.state(), TimerState::new(&small_config()));
            assert!(h.snapshots.load().is_none());
            assert!(!h.engine.awaiting_start());
        }
    }

    // ------------------------------------------------------------------------
    // Tick / Phase Completion Tests
    // ------------------------------------------------------------------------

    mod phase_tests {
        use super::*;

        #[test]
        fn test_tick_ignored_unless_running() {
            let mut h = create_engine();
            h.engine.tick();
            assert_eq!(h.engine.state().remaining_seconds, 5);

            h.engine.start();
            h.engine.pause();
            h.engine.tick();
            assert_eq!(h.engine.state().remaining_seconds, 5);
        }

        #[test]
        fn test_tick_is_monotonic_until_transition() {
            let mut h = create_engine();
            h.engine.start();

            let mut last = h.engine.state().remaining_seconds;
            for _ in 0..4 {
                h.engine.tick();
                let now = h.engine.state().remaining_seconds;
                assert!(now <= last);
                last = now;
            }
        }

        #[test]
        fn test_work_completion_to_short_break() {
            let mut h = create_engine();
            h.engine.start();
            h.ticks(5);

            let state = h.engine.state();
            assert_eq!(state.phase, Phase::ShortBreak);
            assert_eq!(state.mode, Mode::Stopped);
            assert_eq!(state.current_round, 1);
            assert_eq!(state.remaining_seconds, 2);
            assert!(h.engine.awaiting_start());
            assert_eq!(h.notifier.notify_count(), 1);
            assert_eq!(h.snapshots.load(), Some(*state));

            let events = h.drain();
            assert!(events.contains(&TimerEvent::PhaseCompleted {
                completed: Phase::Work,
                next: Phase::ShortBreak,
                round: 1
            }));
            assert_eq!(
                events.last(),
                Some(&TimerEvent::AwaitingStart {
                    phase: Phase::ShortBreak
                })
            );
        }

        #[test]
        fn test_short_break_completion_advances_round() {
            let mut h = create_engine();
            h.engine.start();
            h.ticks(5);
            h.engine.start();
            h.ticks(2);

            let state = h.engine.state();
            assert_eq!(state.phase, Phase::Work);
            assert_eq!(state.current_round, 2);
            assert_eq!(state.remaining_seconds, 5);
            assert!(h.engine.awaiting_start());
        }

        #[test]
        fn test_last_work_completion_to_long_break() {
            let mut h = create_engine();
            h.engine.start();
            h.ticks(5);
            h.engine.start();
            h.ticks(2);
            h.engine.start();
            h.ticks(5);

            let state = h.engine.state();
            assert_eq!(state.phase, Phase::LongBreak);
            assert_eq!(state.current_round, 2);
            assert_eq!(state.remaining_seconds, 3);
        }

        #[test]
        fn test_long_break_completion_resets_silently() {
            let mut h = create_engine();
            for ticks in [5, 2, 5] {
                h.engine.start();
                h.ticks(ticks);
            }
            h.engine.start();
            h.drain();
            h.ticks(3);

            assert_eq!(*h.engine.state(), TimerState::new(&small_config()));
            assert!(!h.engine.awaiting_start());
            assert!(h.snapshots.load().is_none());
            assert_eq!(h.notifier.notify_count(), 4);

            let events = h.drain();
            assert!(events.contains(&TimerEvent::CycleCompleted));
            assert!(!events
                .iter()
                .any(|e| matches!(e, TimerEvent::AwaitingStart { .. })));
        }

        #[test]
        fn test_completion_never_auto_starts() {
            let mut h = create_engine();
            h.engine.start();
            h.ticks(5);
            h.ticks(10);

            assert_eq!(h.engine.state().mode, Mode::Stopped);
            assert_eq!(h.engine.state().remaining_seconds, 2);
        }

        #[test]
        fn test_notifier_receives_sound_settings() {
            let mut h = create_engine_with_config(Config {
                sound_enabled: false,
                ..small_config()
            });
            h.engine.start();
            h.ticks(5);

            let calls = h.notifier.calls();
            assert_eq!(calls.len(), 1);
            assert!(!calls[0].sound_enabled);
        }

        #[test]
        fn test_command_clears_awaiting_start() {
            for command in [
                TimerEngine::start as fn(&mut TimerEngine),
                TimerEngine::pause,
                TimerEngine::stop,
                TimerEngine::reset,
            ] {
                let mut h = create_engine();
                h.engine.start();
                h.ticks(5);
                assert!(h.engine.awaiting_start());

                command(&mut h.engine);
                assert!(!h.engine.awaiting_start());
            }
        }
    }

    // ------------------------------------------------------------------------
    // Config Tests
    // ------------------------------------------------------------------------

    mod config_tests {
        use super::*;

        fn work(seconds: u32) -> ConfigUpdate {
            ConfigUpdate {
                work_duration: Some(seconds),
                ..Default::default()
            }
        }

        #[test]
        fn test_apply_while_stopped_recomputes() {
            let mut h = create_engine();
            h.engine.apply_config(&work(30));

            assert_eq!(h.engine.state().remaining_seconds, 30);
            assert_eq!(h.engine.config().work_duration, 30);
            assert_eq!(
                h.drain(),
                vec![TimerEvent::ConfigApplied {
                    remaining_recomputed: true
                }]
            );
        }

        #[test]
        fn test_apply_while_running_keeps_countdown() {
            let mut h = create_engine();
            h.engine.start();
            h.ticks(1);
            h.engine.apply_config(&work(30));

            assert_eq!(h.engine.state().remaining_seconds, 4);
            assert_eq!(h.engine.config().work_duration, 30);
        }

        #[test]
        fn test_apply_while_paused_keeps_countdown() {
            let mut h = create_engine();
            h.engine.start();
            h.ticks(2);
            h.engine.pause();
            h.engine.apply_config(&work(1));

            assert_eq!(h.engine.state().remaining_seconds, 3);
        }

        #[test]
        fn test_new_durations_apply_to_next_phase() {
            let mut h = create_engine();
            h.engine.start();
            h.engine.apply_config(&ConfigUpdate {
                break_duration: Some(9),
                ..Default::default()
            });
            h.ticks(5);

            assert_eq!(h.engine.state().phase, Phase::ShortBreak);
            assert_eq!(h.engine.state().remaining_seconds, 9);
        }

        #[test]
        fn test_empty_update_is_noop() {
            let mut h = create_engine();
            h.engine.apply_config(&ConfigUpdate::default());
            assert!(h.drain().is_empty());
        }

        #[test]
        fn test_shrinking_rounds_clamps_current_round() {
            let mut h = create_engine_with_config(Config {
                total_rounds: 4,
                ..small_config()
            });
            for _ in 0..2 {
                h.engine.start();
                h.ticks(5);
                h.engine.start();
                h.ticks(2);
            }
            assert_eq!(h.engine.state().current_round, 3);

            h.engine.apply_config(&ConfigUpdate {
                total_rounds: Some(2),
                ..Default::default()
            });
            assert_eq!(h.engine.state().current_round, 2);

            h.engine.start();
            h.ticks(5);
            assert_eq!(h.engine.state().phase, Phase::LongBreak);
        }

        #[test]
        fn test_shrinking_rounds_during_short_break() {
            let mut h = create_engine_with_config(Config {
                total_rounds: 3,
                ..small_config()
            });
            h.engine.start();
            h.ticks(5);
            h.engine.start();
            h.ticks(2);
            h.engine.start();
            h.ticks(5);
            assert_eq!(h.engine.state().phase, Phase::ShortBreak);
            assert_eq!(h.engine.state().current_round, 2);

            h.engine.start();
            h.engine.apply_config(&ConfigUpdate {
                total_rounds: Some(2),
                ..Default::default()
            });
            h.ticks(2);

            assert_eq!(h.engine.state().phase, Phase::Work);
            assert_eq!(h.engine.state().current_round, 2);
        }
    }

    // ------------------------------------------------------------------------
    // Startup Tests
    // ------------------------------------------------------------------------

    mod startup_tests {
        use super::*;

        #[test]
        fn test_start_fresh_clears_snapshot() {
            let mut h = create_engine();
            h.snapshots
                .save(&TimerState {
                    phase: Phase::ShortBreak,
                    mode: Mode::Paused,
                    current_round: 1,
                    remaining_seconds: 1,
                })
                .unwrap();

            h.engine.start_fresh();
            assert!(h.snapshots.load().is_none());
            assert_eq!(h.engine.state().phase, Phase::Work);
        }

        #[test]
        fn test_restore_absent_snapshot() {
            let mut h = create_engine();
            assert!(!h.engine.restore());
            assert_eq!(*h.engine.state(), TimerState::new(&small_config()));
        }

        #[test]
        fn test_restore_running_snapshot_comes_back_paused() {
            let mut h = create_engine();
            h.snapshots
                .save(&TimerState {
                    phase: Phase::ShortBreak,
                    mode: Mode::Running,
                    current_round: 1,
                    remaining_seconds: 1,
                })
                .unwrap();

            assert!(h.engine.restore());
            let state = h.engine.state();
            assert_eq!(state.phase, Phase::ShortBreak);
            assert_eq!(state.mode, Mode::Paused);
            assert_eq!(state.remaining_seconds, 1);
        }

        #[test]
        fn test_restore_clamps_to_config() {
            let mut h = create_engine();
            h.snapshots
                .save(&TimerState {
                    phase: Phase::Work,
                    mode: Mode::Stopped,
                    current_round: 7,
                    remaining_seconds: 1000,
                })
                .unwrap();

            assert!(h.engine.restore());
            let state = h.engine.state();
            assert_eq!(state.current_round, 2);
            assert_eq!(state.remaining_seconds, 5);
        }
    }
}
