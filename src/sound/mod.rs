//! Sound notification system for the Pomodoro Timer.
//!
//! Phase completion is signalled by a best-effort audio cue:
//!
//! ```text
//! ┌────────────────────────┐
//! │ NotificationDispatcher │ ← PhaseNotifier used by the engine
//! └───────────┬────────────┘
//!             │ tries in order, stops at first success
//!             ▼
//!   paplay → aplay → ffplay → (afplay) → rodio
//! ```
//!
//! Failures never propagate: a cue that cannot be played is logged and
//! dropped. The chain runs on a background thread so a slow backend cannot
//! delay the countdown.

mod backend;
mod error;
mod player;
mod source;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use tracing::{debug, warn};

pub use backend::CommandBackend;
pub use error::SoundError;
pub use player::RodioBackend;
pub use source::{default_sound_file, sound_file_exists, FREEDESKTOP_ALARM_SOUND, MACOS_ALARM_SOUND};

/// One way of playing a sound file.
pub trait PlaybackBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Starts playback of `file`.
    ///
    /// # Errors
    ///
    /// Returns an error if this backend cannot play the file.
    fn play(&self, file: &Path) -> Result<(), SoundError>;
}

/// Receives phase-completion notifications from the timer engine.
pub trait PhaseNotifier: Send {
    /// Emits the completion cue. Never fails and never blocks for long.
    fn notify_phase_complete(&self, sound_enabled: bool, sound_file: &Path);
}

// ============================================================================
// NotificationDispatcher
// ============================================================================

/// Plays the completion cue through an ordered fallback chain.
#[derive(Clone)]
pub struct NotificationDispatcher {
    backends: Arc<Vec<Box<dyn PlaybackBackend>>>,
    background: bool,
}

impl NotificationDispatcher {
    /// Creates a dispatcher over an explicit backend chain.
    ///
    /// Dispatch happens on the calling thread; see [`Self::in_background`].
    #[must_use]
    pub fn new(backends: Vec<Box<dyn PlaybackBackend>>) -> Self {
        Self {
            backends: Arc::new(backends),
            background: false,
        }
    }

    /// Creates the production chain for this platform, dispatching in the background.
    #[must_use]
    pub fn with_default_backends() -> Self {
        let mut backends: Vec<Box<dyn PlaybackBackend>> = vec![
            Box::new(CommandBackend::paplay()),
            Box::new(CommandBackend::aplay()),
            Box::new(CommandBackend::ffplay()),
        ];
        if cfg!(target_os = "macos") {
            backends.push(Box::new(CommandBackend::afplay()));
        }
        backends.push(Box::new(RodioBackend::new()));

        Self::new(backends).in_background()
    }

    /// Runs each dispatch on a detached thread.
    #[must_use]
    pub fn in_background(mut self) -> Self {
        self.background = true;
        self
    }

    /// Returns the backend names in fallback order.
    #[must_use]
    pub fn backend_names(&self) -> Vec<String> {
        self.backends.iter().map(|b| b.name().to_string()).collect()
    }

    /// Tries each backend in order and returns the name of the one that played.
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` if the file is missing, or `Exhausted` if every
    /// backend failed.
    pub fn dispatch(&self, file: &Path) -> Result<String, SoundError> {
        if !sound_file_exists(file) {
            return Err(SoundError::FileNotFound(file.display().to_string()));
        }

        for backend in self.backends.iter() {
            match backend.play(file) {
                Ok(()) => {
                    debug!("サウンドを再生しました ({})", backend.name());
                    return Ok(backend.name().to_string());
                }
                Err(e) => debug!("{} で再生できませんでした: {}", backend.name(), e),
            }
        }

        Err(SoundError::Exhausted(self.backends.len()))
    }

    fn dispatch_logged(&self, file: &Path) {
        if let Err(e) = self.dispatch(file) {
            warn!("通知サウンドを再生できません: {} ({})", e, e.suggestion());
        }
    }
}

impl PhaseNotifier for NotificationDispatcher {
    fn notify_phase_complete(&self, sound_enabled: bool, sound_file: &Path) {
        if !sound_enabled {
            debug!("Sound disabled, skipping completion cue");
            return;
        }

        if !self.background {
            self.dispatch_logged(sound_file);
            return;
        }

        let dispatcher = self.clone();
        let file = sound_file.to_path_buf();
        let spawned = thread::Builder::new()
            .name("sound-dispatch".to_string())
            .spawn(move || dispatcher.dispatch_logged(&file));
        if let Err(e) = spawned {
            warn!("サウンド再生スレッドを起動できません: {}", e);
        }
    }
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("backends", &self.backend_names())
            .field("background", &self.background)
            .finish()
    }
}

// ============================================================================
// Test doubles
// ============================================================================

/// Mock playback backend for testing.
#[derive(Debug, Clone)]
pub struct MockPlaybackBackend {
    name: &'static str,
    plays: Arc<Mutex<Vec<std::path::PathBuf>>>,
    should_fail: Arc<AtomicBool>,
}

impl MockPlaybackBackend {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            plays: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates a backend that always fails.
    #[must_use]
    pub fn failing(name: &'static str) -> Self {
        let backend = Self::new(name);
        backend.set_should_fail(true);
        backend
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Number of play attempts, including failed ones.
    #[must_use]
    pub fn play_count(&self) -> usize {
        self.plays.lock().unwrap().len()
    }
}

impl PlaybackBackend for MockPlaybackBackend {
    fn name(&self) -> &str {
        self.name
    }

    fn play(&self, file: &Path) -> Result<(), SoundError> {
        self.plays.lock().unwrap().push(file.to_path_buf());
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::DeviceNotAvailable(format!("mock {}", self.name)));
        }
        Ok(())
    }
}

/// A recorded `notify_phase_complete` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyCall {
    pub sound_enabled: bool,
    pub sound_file: std::path::PathBuf,
}

/// Mock phase notifier for testing; clones share the same call log.
#[derive(Debug, Clone, Default)]
pub struct MockNotifier {
    calls: Arc<Mutex<Vec<NotifyCall>>>,
}

impl MockNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn notify_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    #[must_use]
    pub fn calls(&self) -> Vec<NotifyCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl PhaseNotifier for MockNotifier {
    fn notify_phase_complete(&self, sound_enabled: bool, sound_file: &Path) {
        self.calls.lock().unwrap().push(NotifyCall {
            sound_enabled,
            sound_file: sound_file.to_path_buf(),
        });
    }
}
