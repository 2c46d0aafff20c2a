//! Detached external process invocation.
//!
//! Used for the sound playback fallback chain and for launching the
//! settings editor. A spawn never blocks the caller: the child is handed to
//! a short-lived reaper thread so no zombie is left behind.

use std::ffi::OsString;
use std::fmt;
use std::io;
use std::process::{Command, Stdio};
use std::thread;

use tracing::debug;

/// A program plus its arguments, spawned fire-and-forget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    program: OsString,
    args: Vec<OsString>,
}

impl ExternalCommand {
    /// Creates a command without arguments.
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Returns the program name.
    pub fn program(&self) -> &OsString {
        &self.program
    }

    /// Returns the arguments.
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Spawns the command detached from the caller.
    ///
    /// Only a failure to launch (typically: the program is not installed) is
    /// reported. The exit status of the child is logged and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns the spawn error if the program could not be started.
    pub fn spawn_detached(&self) -> io::Result<u32> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        let pid = child.id();
        let label = self.to_string();
        thread::Builder::new()
            .name("reaper".to_string())
            .spawn(move || match child.wait() {
                Ok(status) => debug!("{} (pid {}) exited: {}", label, pid, status),
                Err(e) => debug!("{} (pid {}) wait failed: {}", label, pid, e),
            })?;

        Ok(pid)
    }
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}
