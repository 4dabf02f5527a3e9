//! Application layer for Railkit.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (SetupOrchestrator, InstallService)
//! - **Installers**: One [`FeatureInstaller`] per optional feature
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! Business rules that need no I/O (manifest editing, selection keys,
//! outcomes) live in `crate::domain`.

pub mod error;
pub mod installers;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export main services
pub use services::{
    DependencyLedger, FeatureInstaller, FeatureSelector, FeatureStatus, InstallContext,
    InstallService, Project, SelectionPlan, SetupOrchestrator, WriteEffect, feature_status,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    CommandLine, CommandStatus, Filesystem, NoopObserver, Prompter, RunObserver, Shell,
    VersionControl,
};

pub use error::ApplicationError;
