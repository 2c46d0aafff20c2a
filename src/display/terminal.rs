//! Terminal display surface.
//!
//! Renders frames on a single status line of a terminal. Runs on its own
//! thread and receives [`DisplayUpdate`]s over a crossbeam channel, the same
//! way a tray icon would be driven from the timer runtime.

use std::io::Write;

use crossbeam_channel::{Receiver, TryRecvError};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::format::{time_visible, DisplayMode, DisplaySnapshot};
use super::menu::MenuConfig;
use super::DisplayUpdate;
use crate::daemon::Command;
use crate::types::IndicatorPosition;

/// Column width the indicator is aligned within.
const LINE_WIDTH: usize = 72;

/// Erase the current line and return the cursor to column 0.
const CLEAR_LINE: &str = "\r\x1b[2K";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Placement of the indicator on the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub position: IndicatorPosition,
    pub index: i32,
}

/// A display surface that draws onto any writer.
pub struct TerminalDisplay<W: Write> {
    out: W,
    update_rx: Receiver<DisplayUpdate>,
    command_tx: mpsc::UnboundedSender<Command>,
    placement: Placement,
    show_time_always: bool,
    last_frame: Option<DisplaySnapshot>,
    attached: bool,
}

impl<W: Write> TerminalDisplay<W> {
    /// Creates a display; nothing is drawn until the first frame arrives.
    pub fn new(
        out: W,
        update_rx: Receiver<DisplayUpdate>,
        command_tx: mpsc::UnboundedSender<Command>,
        placement: Placement,
        show_time_always: bool,
    ) -> Self {
        Self {
            out,
            update_rx,
            command_tx,
            placement,
            show_time_always,
            last_frame: None,
            attached: true,
        }
    }

    /// Blocks on the update channel until shutdown or disconnection.
    pub fn run(mut self) {
        while let Ok(update) = self.update_rx.recv() {
            if !self.handle_update(update) {
                break;
            }
        }
        self.detach();
    }

    /// Processes a pending update from the channel.
    ///
    /// Returns `true` if an update was processed.
    pub fn process_pending_update(&mut self) -> bool {
        match self.update_rx.try_recv() {
            Ok(update) => {
                self.handle_update(update);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                warn!("表示更新チャネルが切断されました");
                false
            }
        }
    }

    /// Applies one update. Returns false once the display should stop.
    pub fn handle_update(&mut self, update: DisplayUpdate) -> bool {
        match update {
            DisplayUpdate::Render(frame) => {
                self.draw(&frame);
                self.last_frame = Some(frame);
            }
            DisplayUpdate::SetTimeAlwaysVisible(visible) => {
                debug!("showTimeAlways = {}", visible);
                self.show_time_always = visible;
                self.redraw();
            }
            DisplayUpdate::Relocate { position, index } => {
                self.relocate(Placement { position, index });
            }
            DisplayUpdate::Shutdown => {
                info!("表示をシャットダウン");
                return false;
            }
        }
        true
    }

    /// Returns the current placement.
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Returns whether the time is shown while stopped.
    pub fn show_time_always(&self) -> bool {
        self.show_time_always
    }

    /// Returns the writer.
    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Formats the status line for `frame` without drawing it.
    pub fn render_line(&self, frame: &DisplaySnapshot) -> String {
        let mut body = frame.icon.emoji().to_string();
        if time_visible(self.show_time_always, frame.timer_mode) {
            body.push(' ');
            body.push_str(&frame.time_text);
        }
        body.push_str("  ");
        body.push_str(frame.status);
        body.push_str(" | ");
        body.push_str(&frame.progress);

        let menu = MenuConfig::build(frame);
        let hints: Vec<String> = menu
            .actions()
            .iter()
            .map(|item| format!("[{}]", item.text.to_lowercase()))
            .collect();
        let body = format!("{}  {}", body, hints.join(" "));

        let body = match frame.display_mode {
            DisplayMode::Blink { dimmed: true } => format!("{}{}{}", DIM, body, RESET),
            DisplayMode::Blink { dimmed: false } | DisplayMode::Steady => body,
        };

        format!("{}{}", self.padding(&body), body)
    }

    fn padding(&self, body: &str) -> String {
        let width = body.chars().count();
        let free = LINE_WIDTH.saturating_sub(width);
        let base = match self.placement.position {
            IndicatorPosition::Left => 0,
            IndicatorPosition::Center => free / 2,
            IndicatorPosition::Right => free,
        };
        let offset = usize::try_from(self.placement.index.max(0)).unwrap_or(0);
        " ".repeat(base.saturating_sub(offset))
    }

    fn draw(&mut self, frame: &DisplaySnapshot) {
        if !self.attached {
            return;
        }
        let line = self.render_line(frame);
        if let Err(e) = write!(self.out, "{}{}", CLEAR_LINE, line).and_then(|_| self.out.flush()) {
            debug!("Failed to draw frame: {}", e);
        }
    }

    fn redraw(&mut self) {
        if let Some(frame) = self.last_frame.take() {
            self.draw(&frame);
            self.last_frame = Some(frame);
        }
    }

    /// Tears the indicator down and recreates it at `placement`, then asks
    /// the runtime for the deferred full settings reload.
    fn relocate(&mut self, placement: Placement) {
        info!(
            "表示位置を変更します: {} (index {})",
            placement.position, placement.index
        );
        self.detach();
        self.placement = placement;
        self.attached = true;
        self.redraw();

        if self.command_tx.send(Command::DisplayReattached).is_err() {
            debug!("Runtime gone, skipping reattach notification");
        }
    }

    fn detach(&mut self) {
        if self.attached {
            let _ = write!(self.out, "{}", CLEAR_LINE).and_then(|_| self.out.flush());
            self.attached = false;
        }
    }
}

impl<W: Write> std::fmt::Debug for TerminalDisplay<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalDisplay")
            .field("placement", &self.placement)
            .field("show_time_always", &self.show_time_always)
            .field("attached", &self.attached)
            .finish_non_exhaustive()
    }
}
