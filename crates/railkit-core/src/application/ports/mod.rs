//! Application ports (traits) for external collaborators.
//!
//! The application drives the Rails project exclusively through these
//! traits. Adapters in `railkit-adapters` implement them.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: called by the application
//!   - `Filesystem`: reads and writes inside the project tree
//!   - `Shell`: `bundle`, `bin/rails` and friends
//!   - `VersionControl`: repository init and checkpoints
//!   - `Prompter`: yes/no and single-letter questions
//!   - `RunObserver`: progress callbacks for the driving UI

pub mod output;

pub use output::{
    CommandLine, CommandStatus, Filesystem, NoopObserver, Prompter, RunObserver, Shell,
    VersionControl,
};

#[cfg(test)]
pub use output::{MockFilesystem, MockShell, MockVersionControl};
