//! `railkit setup`: the full orchestrated run.
//!
//! Override precedence, highest first: `--enable/--disable`, environment
//! variables (`DEVISE=true`), the `[overrides]` table of the config file.

use std::sync::Arc;

use tracing::{debug, instrument};

use railkit_adapters::GitCli;
use railkit_core::application::SetupOrchestrator;
use railkit_core::domain::{AbortReason, Feature, InstallOutcome, Overrides, SetupOptions};

use crate::{
    cli::{GATE_KEYS, SetupArgs},
    commands::open_project,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    progress::{SpinnerObserver, spinner},
    prompt::prompter_for,
};

#[instrument(skip_all, fields(path = %args.path.display(), dry_run = args.dry_run))]
pub fn execute(args: SetupArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let project = open_project(&args.path, output.is_json())?;
    let options = build_options(&args, &config, std::env::vars())?;
    debug!(?options, "setup options resolved");

    let bar = spinner(!output.is_quiet() && !output.is_json());
    let prompter = prompter_for(args.non_interactive, &bar)?;
    let orchestrator = SetupOrchestrator::new(project, Arc::new(GitCli::default()), prompter)
        .with_observer(Arc::new(SpinnerObserver::new(bar.clone())));

    let result = orchestrator.run(&options);
    bar.finish_and_clear();
    let report = result?;

    output.run_report(&report)?;

    let failed: Vec<&str> = report
        .aborted()
        .filter(|r| matches!(r.outcome, InstallOutcome::Aborted(AbortReason::Failed { .. })))
        .map(|r| r.feature.key())
        .collect();
    if !failed.is_empty() {
        return Err(CliError::SetupIncomplete {
            count: failed.len(),
            features: failed.join(", "),
        });
    }
    Ok(())
}

fn build_options<I, K, V>(args: &SetupArgs, config: &AppConfig, env: I) -> CliResult<SetupOptions>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let keys: Vec<&str> = Feature::ALL
        .iter()
        .map(|f| f.key())
        .chain(GATE_KEYS)
        .collect();

    let overrides = flag_overrides(args)?
        .layered_over(&Overrides::from_env(env, &keys))
        .layered_over(&config.overrides());

    Ok(SetupOptions {
        rails_version: args
            .rails
            .map(Into::into)
            .unwrap_or(config.project.rails_version),
        preset: args.preset.map(Into::into).unwrap_or(config.project.preset),
        overrides,
        target_model: args
            .target_model
            .clone()
            .unwrap_or_else(|| config.features.target_model.clone()),
        dry_run: args.dry_run,
    })
}

fn flag_overrides(args: &SetupArgs) -> CliResult<Overrides> {
    if let Some(key) = args.enable.iter().find(|k| args.disable.contains(k)) {
        return Err(CliError::InvalidInput {
            message: format!("'{key}' is both enabled and disabled"),
            source: None,
        });
    }
    let enabled = args.enable.iter().map(|k| (k.clone(), true));
    let disabled = args.disable.iter().map(|k| (k.clone(), false));
    Ok(enabled.chain(disabled).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use railkit_core::domain::{Preset, RailsVersion};

    use crate::cli::{PresetArg, RailsArg};

    fn args() -> SetupArgs {
        SetupArgs {
            path: PathBuf::from("."),
            rails: None,
            preset: None,
            target_model: None,
            dry_run: false,
            non_interactive: true,
            enable: Vec::new(),
            disable: Vec::new(),
        }
    }

    const NO_ENV: [(&str, &str); 0] = [];

    #[test]
    fn config_supplies_defaults() {
        let mut config = AppConfig::default();
        config.project.preset = Preset::Bootstrap;
        config.features.target_model = "Account".into();
        let options = build_options(&args(), &config, NO_ENV).unwrap();
        assert_eq!(options.preset, Preset::Bootstrap);
        assert_eq!(options.rails_version, RailsVersion::Eight);
        assert_eq!(options.target_model, "Account");
    }

    #[test]
    fn flags_beat_config() {
        let mut setup = args();
        setup.rails = Some(RailsArg::Seven);
        setup.preset = Some(PresetArg::Tailwind);
        let options = build_options(&setup, &AppConfig::default(), NO_ENV).unwrap();
        assert_eq!(options.rails_version, RailsVersion::Seven);
        assert_eq!(options.preset, Preset::Tailwind);
    }

    #[test]
    fn override_layers_resolve_in_order() {
        let mut config = AppConfig::default();
        config.overrides.insert("devise".into(), false);
        config.overrides.insert("testing".into(), true);
        config.overrides.insert("pagination".into(), true);

        let mut setup = args();
        setup.disable.push("pagination".into());
        let env = [("DEVISE", "true"), ("CSS", "false"), ("HOME", "/root")];

        let options = build_options(&setup, &config, env).unwrap();
        let overrides = &options.overrides;
        assert_eq!(overrides.get("pagination"), Some(false));
        assert_eq!(overrides.get("devise"), Some(true));
        assert_eq!(overrides.get("testing"), Some(true));
        assert_eq!(overrides.get("css"), Some(false));
        assert_eq!(overrides.get("admin"), None);
    }

    #[test]
    fn conflicting_flags_are_rejected() {
        let mut setup = args();
        setup.enable.push("admin".into());
        setup.disable.push("admin".into());
        let err = build_options(&setup, &AppConfig::default(), NO_ENV).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
