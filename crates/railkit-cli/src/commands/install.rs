//! `railkit install <FEATURE>`: one installer in standalone mode.

use tracing::{info, instrument};

use railkit_core::application::InstallService;
use railkit_core::domain::InstallOutcome;

use crate::{
    cli::InstallArgs,
    commands::open_project,
    config::AppConfig,
    error::{CliError, CliResult},
    output::{OutputManager, abort_message},
};

#[instrument(skip_all, fields(feature = %args.feature, path = %args.path.display()))]
pub fn execute(args: InstallArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let project = open_project(&args.path, output.is_json())?;
    let target_model = args.target_model.unwrap_or(config.features.target_model);

    if !output.is_json() {
        output.info(&format!("Installing {}...", args.feature.display_name()))?;
    }

    let report = InstallService::new(project, target_model).install(args.feature);
    info!(outcome = ?report.outcome, "standalone install finished");
    output.install_report(&report)?;

    match report.outcome {
        InstallOutcome::Aborted(reason) => Err(CliError::FeatureAborted {
            feature: report.feature,
            reason: abort_message(&reason),
        }),
        InstallOutcome::Installed | InstallOutcome::Skipped { .. } => Ok(()),
    }
}
