//! One module per subcommand. Handlers translate arguments into core calls
//! and render the result; no business logic lives here.

pub mod completions;
pub mod config;
pub mod features;
pub mod init;
pub mod install;
pub mod setup;
pub mod status;

use std::path::Path;
use std::sync::Arc;

use railkit_adapters::{LocalFilesystem, ProcessShell};
use railkit_core::application::Project;

use crate::error::{CliResult, IntoCli};

/// Open the Rails app at `path` with real filesystem and process adapters.
///
/// `quiet_tools` discards the output of `bundle`/`bin/rails`, used when
/// stdout carries JSON.
pub(crate) fn open_project(path: &Path, quiet_tools: bool) -> CliResult<Project> {
    let root = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .with_cli_context(|| "resolving the current directory")?
            .join(path)
    };
    Project::open(
        root,
        Arc::new(LocalFilesystem::new()),
        Arc::new(ProcessShell::new().quiet(quiet_tools)),
    )
    .with_cli_context(|| format!("opening {}", path.display()))
}
