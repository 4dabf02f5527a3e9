//! Driven (output) ports - implemented by infrastructure.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::InstallReport;
use crate::error::RailkitResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `railkit_adapters::filesystem::LocalFilesystem` (production)
/// - `railkit_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Paths are absolute; callers join project-relative paths onto the
/// project root before calling in.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    fn read_to_string(&self, path: &Path) -> RailkitResult<String>;

    /// Write content to a file, creating parent directories as needed.
    fn write_file(&self, path: &Path, content: &str) -> RailkitResult<()>;

    fn exists(&self, path: &Path) -> bool;

    fn create_dir_all(&self, path: &Path) -> RailkitResult<()>;

    fn remove_file(&self, path: &Path) -> RailkitResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> RailkitResult<()>;

    /// File names directly inside `path`, sorted. Empty when `path` is absent.
    fn list_dir(&self, path: &Path) -> RailkitResult<Vec<String>>;
}

/// A command to run inside the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Exit state of a finished command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl CommandStatus {
    pub const SUCCESS: Self = Self { code: Some(0) };

    pub fn failure(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(self) -> bool {
        self.code == Some(0)
    }
}

/// Port for running external commands.
///
/// A non-zero exit is reported through [`CommandStatus`]; only a failure to
/// start the process is an error.
#[cfg_attr(test, mockall::automock)]
pub trait Shell: Send + Sync {
    fn run(&self, command: &CommandLine) -> RailkitResult<CommandStatus>;

    /// Silent capability check: does the command exit successfully?
    fn probe(&self, command: &CommandLine) -> bool;
}

/// Port for checkpointing the project tree.
#[cfg_attr(test, mockall::automock)]
pub trait VersionControl: Send + Sync {
    fn init(&self, root: &Path) -> RailkitResult<()>;

    /// Stage everything and commit with `message`.
    ///
    /// Returns `false` when nothing was staged and no commit was made.
    fn checkpoint(&self, root: &Path, message: &str) -> RailkitResult<bool>;
}

/// Port for interactive questions.
pub trait Prompter: Send + Sync {
    /// Yes/no question. Anything but an explicit yes is `false`.
    fn confirm(&self, prompt: &str) -> RailkitResult<bool>;

    /// Single-letter question. Must return one of `tokens`.
    fn choose(&self, prompt: &str, tokens: &[&str]) -> RailkitResult<String>;
}

/// Progress callbacks for the driving UI.
pub trait RunObserver: Send + Sync {
    fn step_started(&self, _step: &str) {}

    fn feature_finished(&self, _report: &InstallReport) {}

    fn run_finished(&self) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_display_quotes_spaced_args() {
        let cmd = CommandLine::new("git").args(["commit", "-m", "initial commit"]);
        assert_eq!(cmd.to_string(), "git commit -m \"initial commit\"");
    }

    #[test]
    fn status_success_requires_zero() {
        assert!(CommandStatus::SUCCESS.success());
        assert!(!CommandStatus::failure(1).success());
        assert!(!CommandStatus { code: None }.success());
    }
}
