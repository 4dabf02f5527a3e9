//! Infrastructure adapters for Railkit.
//!
//! This crate implements the ports defined in `railkit-core::application::ports`.
//! It contains all external process spawning and I/O operations.

pub mod filesystem;
pub mod prompt;
pub mod shell;
pub mod vcs;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use prompt::ScriptedPrompter;
pub use shell::{ProcessShell, RecordingShell};
pub use vcs::{GitCli, RecordingVcs};
