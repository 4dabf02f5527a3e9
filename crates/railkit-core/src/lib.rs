//! Railkit Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Railkit
//! Rails starter-kit installer, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           railkit-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (SetupOrchestrator, InstallService,     │
//! │  FeatureSelector, DependencyLedger)     │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, Shell, VersionControl,     │
//! │  Prompter, RunObserver)                 │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    railkit-adapters (Infrastructure)    │
//! │  (LocalFilesystem, ProcessShell, Git)   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (Feature, Manifest, DependencySpec,    │
//! │   InstallOutcome, RunReport)            │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use railkit_core::prelude::*;
//!
//! # fn run(fs: std::sync::Arc<dyn Filesystem>, shell: std::sync::Arc<dyn Shell>,
//! #        vcs: std::sync::Arc<dyn VersionControl>, prompter: std::sync::Arc<dyn Prompter>)
//! #        -> RailkitResult<()> {
//! let project = Project::open("./blog", fs, shell)?;
//! let report = SetupOrchestrator::new(project, vcs, prompter).run(&SetupOptions::default())?;
//! println!("{} checkpoints", report.checkpoints.len());
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod domain;
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        FeatureStatus, InstallService, Project, SetupOrchestrator, feature_status,
        installers::installer_for,
        ports::{CommandLine, CommandStatus, Filesystem, Prompter, RunObserver, Shell, VersionControl},
    };
    pub use crate::domain::{
        ExecutionMode, Feature, InstallOutcome, InstallReport, Overrides, Preset, RailsVersion,
        RunReport, SetupOptions,
    };
    pub use crate::error::{RailkitError, RailkitResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
