//! `railkit features`: the installable features and their override names.

use crate::{error::CliResult, output::OutputManager};

pub fn execute(output: OutputManager) -> CliResult<()> {
    output.feature_list()?;
    Ok(())
}
