// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (reports carry them by value)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Unknown feature '{0}'")]
    UnknownFeature(String),

    #[error("Unknown preset '{0}'")]
    UnknownPreset(String),

    #[error("Unsupported Rails version '{0}'")]
    UnsupportedRailsVersion(String),

    #[error("'{token}' is not one of: {allowed}")]
    InvalidChoice { token: String, allowed: String },

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("{feature} requires {requires} to be installed first")]
    PrerequisiteMissing {
        feature: &'static str,
        requires: &'static str,
    },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnknownFeature(name) => vec![
                format!("'{}' is not a known feature", name),
                "Try: railkit features".into(),
            ],
            Self::UnknownPreset(_) => vec!["Available presets: custom, bootstrap, tailwind".into()],
            Self::UnsupportedRailsVersion(_) => vec!["Supported Rails versions: 7, 8".into()],
            Self::InvalidChoice { allowed, .. } => vec![format!("Answer with one of: {}", allowed)],
            Self::PrerequisiteMissing { requires, .. } => vec![
                format!("Install {} first", requires),
                format!("Try: railkit install {}", requires),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownFeature(_) => ErrorCategory::NotFound,
            Self::PrerequisiteMissing { .. } => ErrorCategory::Prerequisite,
            _ => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Prerequisite,
    Internal,
}
