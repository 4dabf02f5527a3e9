//! The shape every feature installer follows.
//!
//! ```text
//! ENTRY -> GUARD -> SKIPPED
//!                -> PREREQUISITE -> ABORTED
//!                -> DEPENDENCIES (standalone) -> ARTIFACTS -> MIGRATION -> DONE
//! ```
//!
//! Concrete installers only describe their guard, dependencies and artifact
//! writes; [`InstallService::apply`] drives the state machine and turns every
//! failure into a structured [`InstallReport`].

use tracing::{info, instrument, warn};

use crate::application::installers::installer_for;
use crate::application::services::project::{Project, WriteEffect};
use crate::domain::{
    AbortReason, DependencySpec, ExecutionMode, Feature, InstallOutcome, InstallReport, Notice,
    NoticeLevel,
};
use crate::error::RailkitResult;

/// One optional feature's installation logic.
pub trait FeatureInstaller: Send + Sync {
    fn feature(&self) -> Feature;

    /// `true` only when every defining artifact is present.
    ///
    /// Must not write anything.
    fn is_installed(&self, project: &Project) -> bool;

    /// A feature that has to be installed before this one, if it is absent.
    fn missing_prerequisite(&self, _project: &Project) -> Option<Feature> {
        None
    }

    /// Dependencies declared when running standalone.
    fn dependencies(&self) -> &'static [DependencySpec] {
        &[]
    }

    /// Dependencies removed when running standalone.
    fn retired_dependencies(&self) -> &'static [&'static str] {
        &[]
    }

    /// Create the feature's files. Each write is individually guarded.
    fn write_artifacts(&self, ctx: &mut InstallContext<'_>) -> RailkitResult<()>;
}

/// What an installer sees while writing artifacts.
pub struct InstallContext<'a> {
    pub project: &'a Project,
    pub mode: ExecutionMode,
    /// Model that per-model features attach to.
    pub target_model: &'a str,
    notices: Vec<Notice>,
}

impl<'a> InstallContext<'a> {
    pub fn new(project: &'a Project, mode: ExecutionMode, target_model: &'a str) -> Self {
        Self {
            project,
            mode,
            target_model,
            notices: Vec::new(),
        }
    }

    pub fn note(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice::new(level, message));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.note(NoticeLevel::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{message}");
        self.note(NoticeLevel::Warning, message);
    }

    /// Record the effect of a guarded write on `what`.
    pub fn track(&mut self, effect: WriteEffect, what: &str) {
        match effect {
            WriteEffect::Created => self.info(format!("Created {what}")),
            WriteEffect::Updated => self.info(format!("Updated {what}")),
            WriteEffect::Unchanged => {}
            WriteEffect::AnchorMissing => self.warn(format!("Could not update {what}; left as is")),
        }
    }

    /// Run `rails generate <generator> <args>` if the generator loads.
    ///
    /// An unavailable generator is a warning, not a failure.
    pub fn generate_if_available(&mut self, generator: &str, args: &[&str]) -> RailkitResult<bool> {
        if !self.project.generator_available(generator) {
            self.warn(format!(
                "`{generator}` generator unavailable. Run `bundle install` first."
            ));
            return Ok(false);
        }
        self.project
            .generate(std::iter::once(generator).chain(args.iter().copied()))?;
        Ok(true)
    }

    /// Run `rails <task>` if the task loads.
    pub fn task_if_available(&mut self, task: &str) -> RailkitResult<bool> {
        if !self.project.task_available(task) {
            self.warn(format!("`{task}` unavailable. Run `bundle install` first."));
            return Ok(false);
        }
        self.project.rails([task])?;
        Ok(true)
    }

    pub fn into_notices(self) -> Vec<Notice> {
        self.notices
    }
}

/// Drives installers against one project.
#[derive(Debug, Clone)]
pub struct InstallService {
    project: Project,
    target_model: String,
}

impl InstallService {
    pub fn new(project: Project, target_model: impl Into<String>) -> Self {
        Self {
            project,
            target_model: target_model.into(),
        }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Install one feature on its own: dependencies, artifacts, migration.
    pub fn install(&self, feature: Feature) -> InstallReport {
        self.apply(installer_for(feature).as_ref(), ExecutionMode::Standalone)
    }

    /// Run one installer to completion. Never fails: errors end up in the
    /// report as [`AbortReason::Failed`].
    #[instrument(skip_all, fields(feature = %installer.feature(), mode = ?mode))]
    pub fn apply(&self, installer: &dyn FeatureInstaller, mode: ExecutionMode) -> InstallReport {
        let feature = installer.feature();
        let mut ctx = InstallContext::new(&self.project, mode, &self.target_model);

        let outcome = match self.drive(installer, &mut ctx) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "Installer failed");
                ctx.note(
                    NoticeLevel::Error,
                    format!("{} installation failed: {err}", feature.display_name()),
                );
                InstallOutcome::Aborted(AbortReason::Failed {
                    message: err.to_string(),
                })
            }
        };

        InstallReport {
            feature,
            mode,
            outcome,
            notices: ctx.into_notices(),
        }
    }

    fn drive(
        &self,
        installer: &dyn FeatureInstaller,
        ctx: &mut InstallContext<'_>,
    ) -> RailkitResult<InstallOutcome> {
        let feature = installer.feature();
        let name = feature.display_name();

        if installer.is_installed(&self.project) {
            let reason = format!("{name} already installed, skipping.");
            info!("{reason}");
            ctx.note(NoticeLevel::Warning, reason.clone());
            return Ok(InstallOutcome::Skipped { reason });
        }

        if let Some(requires) = installer.missing_prerequisite(&self.project) {
            ctx.note(
                NoticeLevel::Error,
                format!(
                    "{} is required, aborting {name} installation.",
                    requires.display_name()
                ),
            );
            return Ok(InstallOutcome::Aborted(AbortReason::PrerequisiteMissing {
                requires,
            }));
        }

        if ctx.mode == ExecutionMode::Standalone {
            self.ensure_dependencies(installer, ctx)?;
        }

        installer.write_artifacts(ctx)?;

        match ctx.mode {
            ExecutionMode::Standalone => {
                ctx.info("Standalone mode, running db:migrate");
                self.project.rails(["db:migrate"])?;
            }
            ExecutionMode::Embedded => ctx.info("Embedded mode, migration deferred"),
        }

        ctx.note(NoticeLevel::Success, format!("{name} installation complete!"));
        Ok(InstallOutcome::Installed)
    }

    fn ensure_dependencies(
        &self,
        installer: &dyn FeatureInstaller,
        ctx: &mut InstallContext<'_>,
    ) -> RailkitResult<()> {
        if installer.dependencies().is_empty() && installer.retired_dependencies().is_empty() {
            return Ok(());
        }
        let ledger = self.project.ledger();
        let added = ledger.declare_all(installer.dependencies())?;
        let mut changed = !added.is_empty();
        if changed {
            ctx.info(format!("Added {}", added.join(", ")));
        }
        for name in installer.retired_dependencies() {
            if ledger.retire(name)? {
                ctx.info(format!("Removed {name}"));
                changed = true;
            }
        }
        if changed {
            ledger.install_if_stale()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{CommandStatus, MockFilesystem, MockShell};
    use crate::application::ApplicationError;
    use std::sync::Arc;

    struct Fixed {
        installed: bool,
        prerequisite: Option<Feature>,
        fail: bool,
    }

    impl FeatureInstaller for Fixed {
        fn feature(&self) -> Feature {
            Feature::RubyLlm
        }

        fn is_installed(&self, _: &Project) -> bool {
            self.installed
        }

        fn missing_prerequisite(&self, _: &Project) -> Option<Feature> {
            self.prerequisite
        }

        fn write_artifacts(&self, ctx: &mut InstallContext<'_>) -> RailkitResult<()> {
            if self.fail {
                return Err(ApplicationError::CommandFailed {
                    command: "bundle exec rails generate x".into(),
                    code: 1,
                }
                .into());
            }
            ctx.info("wrote");
            Ok(())
        }
    }

    fn silent_project() -> Project {
        let mut fs = MockFilesystem::new();
        fs.expect_write_file().never();
        let mut shell = MockShell::new();
        shell.expect_run().never();
        Project::new("/app", Arc::new(fs), Arc::new(shell))
    }

    #[test]
    fn guard_short_circuits_with_notice() {
        let service = InstallService::new(silent_project(), "User");
        let installer = Fixed {
            installed: true,
            prerequisite: None,
            fail: false,
        };
        let report = service.apply(&installer, ExecutionMode::Standalone);
        assert!(matches!(report.outcome, InstallOutcome::Skipped { .. }));
        assert_eq!(report.notices.len(), 1);
        assert!(report.notices[0].message.contains("already installed"));
    }

    #[test]
    fn missing_prerequisite_aborts_before_writing() {
        let service = InstallService::new(silent_project(), "User");
        let installer = Fixed {
            installed: false,
            prerequisite: Some(Feature::Devise),
            fail: false,
        };
        let report = service.apply(&installer, ExecutionMode::Standalone);
        assert_eq!(
            report.outcome,
            InstallOutcome::Aborted(AbortReason::PrerequisiteMissing {
                requires: Feature::Devise
            })
        );
        assert!(!report.notices.iter().any(|n| n.message == "wrote"));
    }

    #[test]
    fn embedded_defers_migration() {
        let service = InstallService::new(silent_project(), "User");
        let installer = Fixed {
            installed: false,
            prerequisite: None,
            fail: false,
        };
        let report = service.apply(&installer, ExecutionMode::Embedded);
        assert!(report.outcome.is_installed());
        assert!(report.notices.iter().any(|n| n.message.contains("deferred")));
    }

    #[test]
    fn standalone_migrates() {
        let mut shell = MockShell::new();
        shell
            .expect_run()
            .withf(|cmd| cmd.to_string() == "bundle exec rails db:migrate")
            .times(1)
            .returning(|_| Ok(CommandStatus::SUCCESS));
        let project = Project::new("/app", Arc::new(MockFilesystem::new()), Arc::new(shell));
        let service = InstallService::new(project, "User");
        let installer = Fixed {
            installed: false,
            prerequisite: None,
            fail: false,
        };
        assert!(service.apply(&installer, ExecutionMode::Standalone).outcome.is_installed());
    }

    #[test]
    fn artifact_failure_becomes_failed_outcome() {
        let service = InstallService::new(silent_project(), "User");
        let installer = Fixed {
            installed: false,
            prerequisite: None,
            fail: true,
        };
        let report = service.apply(&installer, ExecutionMode::Embedded);
        match report.outcome {
            InstallOutcome::Aborted(AbortReason::Failed { message }) => {
                assert!(message.contains("exited with status 1"));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(report.notices.last().unwrap().level, NoticeLevel::Error);
    }
}
