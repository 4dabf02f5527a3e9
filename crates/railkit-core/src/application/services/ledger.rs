//! Dependency ledger: the Gemfile as the record of what a run requested.

use tracing::{debug, info, instrument};

use crate::application::ApplicationError;
use crate::application::services::project::{GEMFILE, Project};
use crate::domain::{BatchInstall, DependencySpec, GemLine, Manifest};
use crate::error::RailkitResult;

/// Reads and extends the project's dependency manifest.
///
/// Every query parses the Gemfile again so declarations made earlier in the
/// same run are visible immediately.
#[derive(Debug, Clone)]
pub struct DependencyLedger {
    project: Project,
}

impl DependencyLedger {
    pub fn new(project: Project) -> Self {
        Self { project }
    }

    pub fn manifest(&self) -> RailkitResult<Manifest> {
        if !self.project.exists(GEMFILE) {
            return Err(ApplicationError::NotAProject {
                path: self.project.root().to_path_buf(),
            }
            .into());
        }
        Ok(Manifest::parse(&self.project.read(GEMFILE)?))
    }

    /// `false` when the manifest cannot be read.
    pub fn is_declared(&self, name: &str) -> bool {
        self.manifest().map(|m| m.declares(name)).unwrap_or(false)
    }

    pub fn gem(&self, name: &str) -> Option<GemLine> {
        self.manifest().ok()?.gem(name).cloned()
    }

    /// Is `name` declared with exactly `constraint`?
    pub fn is_pinned(&self, name: &str, constraint: &str) -> bool {
        self.gem(name)
            .and_then(|gem| gem.constraint)
            .is_some_and(|c| c == constraint)
    }

    /// Insert `spec` at its anchor unless a line for that name exists.
    /// Returns whether the manifest changed.
    pub fn declare(&self, spec: &DependencySpec) -> RailkitResult<bool> {
        let mut manifest = self.manifest()?;
        if !manifest.insert(spec) {
            debug!(gem = spec.name, "Already declared");
            return Ok(false);
        }
        self.project.force_file(GEMFILE, &manifest.to_string())?;
        info!(gem = spec.name, "Declared dependency");
        Ok(true)
    }

    /// Declare several specs. Returns the names that were newly added.
    pub fn declare_all(&self, specs: &[DependencySpec]) -> RailkitResult<Vec<&'static str>> {
        let mut manifest = self.manifest()?;
        let added: Vec<&'static str> = specs
            .iter()
            .filter(|spec| manifest.insert(spec))
            .map(|spec| spec.name)
            .collect();
        if !added.is_empty() {
            self.project.force_file(GEMFILE, &manifest.to_string())?;
            info!(gems = ?added, "Declared dependencies");
        }
        Ok(added)
    }

    /// Drop a pre-existing declaration the project is moving away from.
    pub fn retire(&self, name: &str) -> RailkitResult<bool> {
        let mut manifest = self.manifest()?;
        if !manifest.remove(name) {
            return Ok(false);
        }
        self.project.force_file(GEMFILE, &manifest.to_string())?;
        info!(gem = name, "Removed dependency");
        Ok(true)
    }

    /// Run `bundle install` unless `bundle check` says the lock state
    /// already satisfies the manifest.
    #[instrument(skip(self), fields(root = %self.project.root().display()))]
    pub fn install_if_stale(&self) -> RailkitResult<BatchInstall> {
        if self.project.probe(&self.project.command("bundle").arg("check")) {
            info!("Bundle already satisfied");
            return Ok(BatchInstall::AlreadySatisfied);
        }
        self.project
            .run(&self.project.command("bundle").arg("install"))?;
        info!("Bundle installed");
        Ok(BatchInstall::Installed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{CommandStatus, MockFilesystem, MockShell};
    use std::sync::{Arc, Mutex};

    const GEMFILE_TEXT: &str = "source \"https://rubygems.org\"\n\ngem \"rails\"\n\ngroup :development, :test do\n  gem \"debug\"\nend\n";

    /// Filesystem mock backed by a single mutable Gemfile.
    fn gemfile_fs(initial: &str) -> (MockFilesystem, Arc<Mutex<String>>) {
        let text = Arc::new(Mutex::new(initial.to_string()));
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(true);
        let read = Arc::clone(&text);
        fs.expect_read_to_string()
            .returning(move |_| Ok(read.lock().unwrap().clone()));
        let write = Arc::clone(&text);
        fs.expect_write_file().returning(move |_, content| {
            *write.lock().unwrap() = content.to_string();
            Ok(())
        });
        (fs, text)
    }

    #[test]
    fn declarations_are_visible_to_the_next_query() {
        let (fs, _) = gemfile_fs(GEMFILE_TEXT);
        let ledger = Project::new("/app", Arc::new(fs), Arc::new(MockShell::new())).ledger();

        assert!(!ledger.is_declared("pagy"));
        assert!(ledger.declare(&DependencySpec::runtime("pagy")).unwrap());
        assert!(ledger.is_declared("pagy"));
        assert!(!ledger.declare(&DependencySpec::runtime("pagy")).unwrap());
    }

    #[test]
    fn declare_all_reports_only_new_names() {
        let (fs, text) = gemfile_fs(GEMFILE_TEXT);
        let ledger = Project::new("/app", Arc::new(fs), Arc::new(MockShell::new())).ledger();

        let added = ledger
            .declare_all(&[
                DependencySpec::development_test("debug"),
                DependencySpec::development_test("faker"),
            ])
            .unwrap();
        assert_eq!(added, vec!["faker"]);
        assert_eq!(text.lock().unwrap().matches("gem \"debug\"").count(), 1);
    }

    #[test]
    fn pinned_constraint_is_exact() {
        let (fs, _) = gemfile_fs("gem \"devise\", \"~> 4.9\"\n");
        let ledger = Project::new("/app", Arc::new(fs), Arc::new(MockShell::new())).ledger();
        assert!(ledger.is_pinned("devise", "~> 4.9"));
        assert!(!ledger.is_pinned("devise", "~> 4.8"));
        assert!(!ledger.is_pinned("pagy", "~> 4.9"));
    }

    #[test]
    fn fresh_lock_skips_install() {
        let mut shell = MockShell::new();
        shell.expect_probe().times(1).return_const(true);
        shell.expect_run().never();
        let ledger = Project::new("/app", Arc::new(MockFilesystem::new()), Arc::new(shell)).ledger();
        assert_eq!(
            ledger.install_if_stale().unwrap(),
            BatchInstall::AlreadySatisfied
        );
    }

    #[test]
    fn stale_lock_runs_bundle_install_once() {
        let mut shell = MockShell::new();
        shell.expect_probe().return_const(false);
        shell
            .expect_run()
            .withf(|cmd| cmd.to_string() == "bundle install")
            .times(1)
            .returning(|_| Ok(CommandStatus::SUCCESS));
        let ledger = Project::new("/app", Arc::new(MockFilesystem::new()), Arc::new(shell)).ledger();
        assert_eq!(ledger.install_if_stale().unwrap(), BatchInstall::Installed);
    }
}
