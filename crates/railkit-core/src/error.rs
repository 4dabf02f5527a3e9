//! Unified error handling for Railkit Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Railkit Core operations.
#[derive(Debug, Error, Clone)]
pub enum RailkitError {
    /// Errors from the domain layer (rule violations).
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (tooling and I/O failures).
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl RailkitError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Internal { .. } => vec![
                "This appears to be a bug in Railkit".into(),
                "Please report this issue at: https://github.com/railkit/railkit/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Prerequisite => ErrorCategory::Prerequisite,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Prerequisite,
    Internal,
}

/// Convenient result type alias.
pub type RailkitResult<T> = Result<T, RailkitError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn prerequisite_maps_to_prerequisite_category() {
        let err: RailkitError = DomainError::PrerequisiteMissing {
            feature: "admin",
            requires: "devise",
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Prerequisite);
        assert!(err.suggestions().iter().any(|s| s.contains("railkit install devise")));
    }

    #[test]
    fn not_a_project_is_not_found() {
        let err: RailkitError = ApplicationError::NotAProject {
            path: PathBuf::from("/tmp/x"),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }
}
