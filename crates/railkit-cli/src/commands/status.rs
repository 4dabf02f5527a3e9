//! `railkit status`: guard results for every feature, read-only.

use tracing::instrument;

use railkit_core::application::feature_status;

use crate::{cli::StatusArgs, commands::open_project, error::CliResult, output::OutputManager};

#[instrument(skip_all, fields(path = %args.path.display()))]
pub fn execute(args: StatusArgs, output: OutputManager) -> CliResult<()> {
    let project = open_project(&args.path, true)?;
    output.feature_status(&feature_status(&project))?;
    Ok(())
}
