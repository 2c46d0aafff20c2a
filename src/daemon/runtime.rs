//! The timer runtime.
//!
//! A single task owns the engine and serializes everything that can touch
//! it: user commands, the one-second countdown tick, the blink toggle, and
//! settings-file changes. Each input is handled to completion before the
//! next one is polled, so a tick can never interleave with a command.
//!
//! After every input the runtime re-derives its schedules from the engine:
//! - countdown interval exists iff the engine is Running
//! - blink interval exists iff a completed phase awaits its start
//!
//! so pause/stop/reset cancel pending ticks and any command cancels the blink.

use std::future::pending;

use crossbeam_channel::Sender;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, trace};

use super::settings::SettingsLauncher;
use super::timer::{TimerEngine, TimerEvent};
use super::watcher::{reconcile, ConfigChanged, Reconciliation};
use crate::display::{DisplaySnapshot, DisplayUpdate, MenuAction};
use crate::store::ConfigStore;
use crate::types::ConfigUpdate;

/// Countdown cadence.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Half-cycle of the blink cue.
pub const BLINK_PERIOD: Duration = Duration::from_millis(500);

// ============================================================================
// Command
// ============================================================================

/// Inputs from the command surface (and the display surface).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Resume,
    Toggle,
    Stop,
    Reset,
    OpenSettings,
    /// The display finished relocating; perform the deferred full reload
    DisplayReattached,
    Quit,
}

impl From<MenuAction> for Command {
    fn from(action: MenuAction) -> Self {
        match action {
            MenuAction::Toggle => Command::Toggle,
            MenuAction::Start => Command::Start,
            MenuAction::Pause => Command::Pause,
            MenuAction::Resume => Command::Resume,
            MenuAction::Stop => Command::Stop,
            MenuAction::Reset => Command::Reset,
            MenuAction::Settings => Command::OpenSettings,
            MenuAction::Quit => Command::Quit,
        }
    }
}

// ============================================================================
// Daemon
// ============================================================================

/// Channels connecting the runtime to its collaborators.
pub struct DaemonChannels {
    /// Engine events
    pub events_rx: mpsc::UnboundedReceiver<TimerEvent>,
    /// User commands
    pub commands_rx: mpsc::UnboundedReceiver<Command>,
    /// Settings-file change notifications
    pub changes_rx: mpsc::UnboundedReceiver<ConfigChanged>,
    /// Display surface
    pub display_tx: Sender<DisplayUpdate>,
}

/// The single-threaded event loop around a [`TimerEngine`].
pub struct Daemon {
    engine: TimerEngine,
    channels: DaemonChannels,
    config_store: ConfigStore,
    launcher: Box<dyn SettingsLauncher>,
    countdown: Option<Interval>,
    blink: Option<Interval>,
    blink_dimmed: bool,
    watching: bool,
}

impl Daemon {
    pub fn new(
        engine: TimerEngine,
        channels: DaemonChannels,
        config_store: ConfigStore,
        launcher: Box<dyn SettingsLauncher>,
    ) -> Self {
        Self {
            engine,
            channels,
            config_store,
            launcher,
            countdown: None,
            blink: None,
            blink_dimmed: false,
            watching: true,
        }
    }

    /// Runs until `Quit` or until every command sender is gone.
    ///
    /// Returns the engine so its final state can be inspected.
    pub async fn run(mut self) -> TimerEngine {
        self.after_input();

        loop {
            tokio::select! {
                biased;

                command = self.channels.commands_rx.recv() => match command {
                    Some(Command::Quit) | None => break,
                    Some(command) => self.handle_command(command),
                },
                _ = next_tick(&mut self.countdown) => self.engine.tick(),
                _ = next_tick(&mut self.blink) => self.blink_dimmed = !self.blink_dimmed,
                change = self.channels.changes_rx.recv(), if self.watching => match change {
                    Some(ConfigChanged) => {
                        while self.channels.changes_rx.try_recv().is_ok() {}
                        self.handle_config_change();
                    }
                    None => {
                        debug!("Settings watcher gone");
                        self.watching = false;
                    }
                },
            }

            self.after_input();
        }

        info!("タイマーを終了します");
        self.send_display(DisplayUpdate::Shutdown);
        self.engine
    }

    fn handle_command(&mut self, command: Command) {
        debug!("Command: {:?}", command);
        match command {
            Command::Start => self.engine.start(),
            Command::Pause => self.engine.pause(),
            Command::Resume => self.engine.resume(),
            Command::Toggle => self.engine.toggle(),
            Command::Stop => self.engine.stop(),
            Command::Reset => self.engine.reset(),
            Command::OpenSettings => self.launcher.open(self.config_store.path()),
            Command::DisplayReattached => self.apply_full_reload(),
            Command::Quit => {}
        }
    }

    fn handle_config_change(&mut self) {
        let Some(reloaded) = self.config_store.reload() else {
            return;
        };

        match reconcile(self.engine.config(), &reloaded) {
            Reconciliation::Unchanged => debug!("Settings unchanged"),
            Reconciliation::Relocate { position, index } => {
                info!("Display placement changed, deferring other settings");
                self.send_display(DisplayUpdate::Relocate { position, index });
            }
            Reconciliation::Apply {
                update,
                show_time_always,
            } => {
                self.engine.apply_config(&update);
                self.send_display(DisplayUpdate::SetTimeAlwaysVisible(show_time_always));
            }
        }
    }

    fn apply_full_reload(&mut self) {
        let Some(config) = self.config_store.reload() else {
            return;
        };
        self.engine.apply_config(&ConfigUpdate::from(&config));
        self.send_display(DisplayUpdate::SetTimeAlwaysVisible(config.show_time_always));
    }

    fn after_input(&mut self) {
        while let Ok(event) = self.channels.events_rx.try_recv() {
            trace!("Timer event: {:?}", event);
        }
        self.sync_schedules();

        let blink = self.blink.as_ref().map(|_| self.blink_dimmed);
        let frame = DisplaySnapshot::capture(self.engine.state(), self.engine.config(), blink);
        self.send_display(DisplayUpdate::Render(frame));
    }

    fn sync_schedules(&mut self) {
        if self.engine.state().is_running() {
            if self.countdown.is_none() {
                self.countdown = Some(periodic(TICK_PERIOD));
            }
        } else {
            self.countdown = None;
        }

        if self.engine.awaiting_start() {
            if self.blink.is_none() {
                self.blink = Some(periodic(BLINK_PERIOD));
                self.blink_dimmed = false;
            }
        } else {
            self.blink = None;
            self.blink_dimmed = false;
        }
    }

    fn send_display(&self, update: DisplayUpdate) {
        if self.channels.display_tx.send(update).is_err() {
            trace!("Display receiver dropped");
        }
    }
}

impl std::fmt::Debug for Daemon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Daemon")
            .field("engine", &self.engine)
            .field("counting", &self.countdown.is_some())
            .field("blinking", &self.blink.is_some())
            .finish_non_exhaustive()
    }
}

/// An interval whose first tick is one full period from now.
fn periodic(period: Duration) -> Interval {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

async fn next_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => pending::<()>().await,
    }
}

// ============================================================================
// Tests
// ============================================================================
