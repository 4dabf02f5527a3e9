//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while driving the project tree and external tools.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// An external command could not be spawned.
    #[error("Failed to run `{command}`: {reason}")]
    CommandSpawn { command: String, reason: String },

    /// An external command ran and exited unsuccessfully.
    #[error("`{command}` exited with status {code}")]
    CommandFailed { command: String, code: i32 },

    /// Version control operation failed.
    #[error("Version control error: {reason}")]
    VersionControl { reason: String },

    /// Interactive prompt could not be shown or answered.
    #[error("Prompt failed: {reason}")]
    PromptFailed { reason: String },

    /// Target directory is not a Rails project.
    #[error("{path} does not look like a Rails project (no Gemfile)")]
    NotAProject { path: PathBuf },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::CommandSpawn { command, .. } => vec![
                format!("Could not start: {}", command),
                "Ensure ruby, bundler and git are installed and in your PATH".into(),
            ],
            Self::CommandFailed { command, .. } => vec![
                format!("Command failed: {}", command),
                "Check the command output above for details".into(),
                "Re-run railkit afterwards; completed features are skipped".into(),
            ],
            Self::VersionControl { .. } => vec![
                "Check that git is installed and user.name/user.email are set".into(),
            ],
            Self::PromptFailed { .. } => vec![
                "Run from an interactive terminal".into(),
                "Or pass --non-interactive and use FEATURE=true|false overrides".into(),
            ],
            Self::NotAProject { .. } => vec![
                "Run `rails new <app>` first, then point railkit at the app directory".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotAProject { .. } => ErrorCategory::NotFound,
            Self::PromptFailed { .. } => ErrorCategory::Validation,
            Self::FilesystemError { .. }
            | Self::CommandSpawn { .. }
            | Self::CommandFailed { .. }
            | Self::VersionControl { .. } => ErrorCategory::Internal,
        }
    }
}
