//! Shell adapter that spawns real processes.

use std::process::{Command, Stdio};

use tracing::{debug, info, instrument};

use railkit_core::{
    application::{
        ApplicationError,
        ports::{CommandLine, CommandStatus, Shell},
    },
    error::RailkitResult,
};

/// Runs commands with inherited stdio so tool output reaches the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessShell {
    /// Capture and discard output of `run` as well as `probe`.
    quiet: bool,
}

impl ProcessShell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    fn command(line: &CommandLine) -> Command {
        let mut command = Command::new(&line.program);
        command.args(&line.args);
        if let Some(dir) = &line.cwd {
            command.current_dir(dir);
        }
        command
    }
}

impl Shell for ProcessShell {
    #[instrument(skip_all, fields(command = %line))]
    fn run(&self, line: &CommandLine) -> RailkitResult<CommandStatus> {
        info!("run {line}");
        let mut command = Self::command(line);
        if self.quiet {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }
        let status = command
            .status()
            .map_err(|e| ApplicationError::CommandSpawn {
                command: line.to_string(),
                reason: e.to_string(),
            })?;
        debug!(code = ?status.code(), "exited");
        Ok(CommandStatus {
            code: status.code(),
        })
    }

    fn probe(&self, line: &CommandLine) -> bool {
        let ok = Self::command(line)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false);
        debug!(command = %line, ok, "probe");
        ok
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn non_zero_exit_is_a_status_not_an_error() {
        let status = ProcessShell::new()
            .quiet(true)
            .run(&CommandLine::new("sh").args(["-c", "exit 3"]))
            .unwrap();
        assert_eq!(status, CommandStatus::failure(3));
    }

    #[test]
    fn spawn_failure_is_an_error() {
        let result = ProcessShell::new().run(&CommandLine::new("railkit-no-such-binary"));
        assert!(result.is_err());
    }

    #[test]
    fn probe_runs_in_cwd() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Gemfile"), "").unwrap();
        let shell = ProcessShell::new();
        assert!(shell.probe(&CommandLine::new("test").args(["-f", "Gemfile"]).current_dir(dir.path())));
        assert!(!shell.probe(&CommandLine::new("test").args(["-f", "Nope"]).current_dir(dir.path())));
    }
}
