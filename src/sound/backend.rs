//! External-program playback backends.
//!
//! Each backend launches one audio player with the sound file as its last
//! argument. A backend "fails" only if its program cannot be launched; the
//! child's own exit status is not awaited.

use std::path::Path;

use tracing::debug;

use super::error::SoundError;
use super::PlaybackBackend;
use crate::process::ExternalCommand;

/// A backend that hands the file to an external player program.
#[derive(Debug, Clone)]
pub struct CommandBackend {
    name: &'static str,
    command: ExternalCommand,
}

impl CommandBackend {
    /// Creates a backend running `command` followed by the sound file path.
    #[must_use]
    pub fn new(name: &'static str, command: ExternalCommand) -> Self {
        Self { name, command }
    }

    /// PulseAudio / PipeWire player.
    #[must_use]
    pub fn paplay() -> Self {
        Self::new("paplay", ExternalCommand::new("paplay"))
    }

    /// ALSA player.
    #[must_use]
    pub fn aplay() -> Self {
        Self::new("aplay", ExternalCommand::new("aplay"))
    }

    /// FFmpeg player without a window, exiting at end of stream.
    #[must_use]
    pub fn ffplay() -> Self {
        Self::new(
            "ffplay",
            ExternalCommand::new("ffplay").arg("-nodisp").arg("-autoexit"),
        )
    }

    /// macOS player.
    #[must_use]
    pub fn afplay() -> Self {
        Self::new("afplay", ExternalCommand::new("afplay"))
    }

    /// Returns the full command for `file`.
    #[must_use]
    pub fn command_for(&self, file: &Path) -> ExternalCommand {
        self.command.clone().arg(file)
    }
}

impl PlaybackBackend for CommandBackend {
    fn name(&self) -> &str {
        self.name
    }

    fn play(&self, file: &Path) -> Result<(), SoundError> {
        let command = self.command_for(file);
        let pid = command
            .spawn_detached()
            .map_err(|source| SoundError::SpawnFailed {
                program: self.name.to_string(),
                source,
            })?;
        debug!("{} を起動しました (pid {})", command, pid);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_for_appends_file() {
        let backend = CommandBackend::ffplay();
        let cmd = backend.command_for(Path::new("/tmp/x.oga"));
        assert_eq!(cmd.to_string(), "ffplay -nodisp -autoexit /tmp/x.oga");
        assert_eq!(backend.name(), "ffplay");
    }

    #[test]
    fn test_missing_program_reports_spawn_failure() {
        let backend = CommandBackend::new(
            "missing",
            ExternalCommand::new("pomodoro-timer-no-such-player"),
        );
        let err = backend.play(Path::new("/tmp/x.oga")).unwrap_err();
        assert!(matches!(err, SoundError::SpawnFailed { .. }));
    }
}
