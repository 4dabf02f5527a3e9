//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "set up a project" or "install one feature".

pub mod installer;
pub mod ledger;
pub mod orchestrator;
pub mod project;
pub mod selector;

pub use installer::{FeatureInstaller, InstallContext, InstallService};
pub use ledger::DependencyLedger;
pub use orchestrator::{FeatureStatus, SetupOrchestrator, feature_status};
pub use project::{Project, WriteEffect};
pub use selector::{FeatureSelector, SelectionPlan};
