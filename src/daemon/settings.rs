//! Launching the external settings editor.
//!
//! The timer never edits settings itself; `openSettings` only hands the
//! settings file to whatever editor the desktop provides and returns.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use crate::process::ExternalCommand;

/// Opens the settings editor on a file.
pub trait SettingsLauncher: Send {
    /// Launches the editor; failures are logged, never returned.
    fn open(&self, settings_path: &Path);
}

// ============================================================================
// EditorLauncher
// ============================================================================

/// Tries the desktop opener, then `$VISUAL`, then `$EDITOR`.
#[derive(Debug, Clone)]
pub struct EditorLauncher {
    opener: &'static str,
    visual: Option<String>,
    editor: Option<String>,
}

impl EditorLauncher {
    /// Creates a launcher from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(std::env::var("VISUAL").ok(), std::env::var("EDITOR").ok())
    }

    /// Creates a launcher with explicit editor commands.
    #[must_use]
    pub fn new(visual: Option<String>, editor: Option<String>) -> Self {
        let opener = if cfg!(target_os = "macos") {
            "open"
        } else {
            "xdg-open"
        };
        Self {
            opener,
            visual,
            editor,
        }
    }

    /// Returns the commands tried for `settings_path`, in order.
    #[must_use]
    pub fn candidates(&self, settings_path: &Path) -> Vec<ExternalCommand> {
        let mut candidates = vec![ExternalCommand::new(self.opener).arg(settings_path)];
        for value in [&self.visual, &self.editor].into_iter().flatten() {
            if let Some(cmd) = parse_editor(value) {
                candidates.push(cmd.arg(settings_path));
            }
        }
        candidates
    }
}

impl SettingsLauncher for EditorLauncher {
    fn open(&self, settings_path: &Path) {
        for command in self.candidates(settings_path) {
            match command.spawn_detached() {
                Ok(_) => {
                    info!("設定エディタを起動しました: {}", command);
                    return;
                }
                Err(e) => debug!("{} を起動できません: {}", command, e),
            }
        }
        warn!("設定エディタを起動できません: {}", settings_path.display());
    }
}

/// Splits an `$EDITOR`-style value like `code --wait` into program and args.
fn parse_editor(value: &str) -> Option<ExternalCommand> {
    let mut words = value.split_whitespace();
    let program = words.next()?;
    Some(words.fold(ExternalCommand::new(program), |cmd, word| cmd.arg(word)))
}

// ============================================================================
// MockSettingsLauncher
// ============================================================================

/// Mock launcher for testing; clones share the same call log.
#[derive(Debug, Clone, Default)]
pub struct MockSettingsLauncher {
    opened: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockSettingsLauncher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn open_count(&self) -> usize {
        self.opened.lock().unwrap().len()
    }

    #[must_use]
    pub fn opened(&self) -> Vec<PathBuf> {
        self.opened.lock().unwrap().clone()
    }
}

impl SettingsLauncher for MockSettingsLauncher {
    fn open(&self, settings_path: &Path) {
        self.opened.lock().unwrap().push(settings_path.to_path_buf());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_order() {
        let launcher = EditorLauncher::new(Some("code --wait".into()), Some("vi".into()));
        let names: Vec<String> = launcher
            .candidates(Path::new("/cfg/settings.json"))
            .iter()
            .map(ToString::to_string)
            .collect();

        assert_eq!(names.len(), 3);
        assert!(names[0].ends_with("open /cfg/settings.json"));
        assert_eq!(names[1], "code --wait /cfg/settings.json");
        assert_eq!(names[2], "vi /cfg/settings.json");
    }

    #[test]
    fn test_blank_editor_is_skipped() {
        let launcher = EditorLauncher::new(Some("   ".into()), None);
        assert_eq!(launcher.candidates(Path::new("/s.json")).len(), 1);
    }

    #[test]
    fn test_open_with_nothing_available_does_not_panic() {
        let launcher = EditorLauncher {
            opener: "pomodoro-timer-no-such-opener",
            visual: None,
            editor: Some("pomodoro-timer-no-such-editor".into()),
        };
        launcher.open(Path::new("/tmp/settings.json"));
    }

    #[test]
    fn test_mock_records_paths() {
        let mock = MockSettingsLauncher::new();
        mock.clone().open(Path::new("/a.json"));
        assert_eq!(mock.opened(), vec![PathBuf::from("/a.json")]);
        assert_eq!(mock.open_count(), 1);
    }
}
