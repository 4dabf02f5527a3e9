//! Git through its command line.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use railkit_core::{
    application::{
        ApplicationError,
        ports::{CommandLine, Shell, VersionControl},
    },
    error::RailkitResult,
};

use crate::shell::ProcessShell;

/// Checkpoints are `git add .` followed by `git commit -m`.
#[derive(Clone)]
pub struct GitCli {
    shell: Arc<dyn Shell>,
}

impl std::fmt::Debug for GitCli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitCli").finish_non_exhaustive()
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new(Arc::new(ProcessShell::new().quiet(true)))
    }
}

impl GitCli {
    pub fn new(shell: Arc<dyn Shell>) -> Self {
        Self { shell }
    }

    fn git(root: &Path) -> CommandLine {
        CommandLine::new("git").current_dir(root)
    }

    fn run(&self, command: CommandLine) -> RailkitResult<()> {
        let status = self.shell.run(&command)?;
        if status.success() {
            return Ok(());
        }
        Err(ApplicationError::VersionControl {
            reason: format!(
                "`{command}` exited with status {}",
                status.code.map_or_else(|| "signal".to_string(), |c| c.to_string())
            ),
        }
        .into())
    }
}

impl VersionControl for GitCli {
    #[instrument(skip(self), fields(root = %root.display()))]
    fn init(&self, root: &Path) -> RailkitResult<()> {
        if root.join(".git").exists() {
            debug!("Repository already initialized");
            return Ok(());
        }
        self.run(Self::git(root).arg("init"))
    }

    #[instrument(skip(self), fields(root = %root.display()))]
    fn checkpoint(&self, root: &Path, message: &str) -> RailkitResult<bool> {
        self.run(Self::git(root).args(["add", "."]))?;
        // `diff --cached --quiet` exits 0 when nothing is staged.
        if self
            .shell
            .probe(&Self::git(root).args(["diff", "--cached", "--quiet"]))
        {
            debug!(message, "Nothing staged, checkpoint skipped");
            return Ok(false);
        }
        self.run(Self::git(root).args(["commit", "-m", message]))?;
        info!(message, "Committed");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::RecordingShell;

    #[test]
    fn checkpoint_stages_then_commits() {
        let shell = RecordingShell::new().answer_probe("git diff", false);
        let git = GitCli::new(Arc::new(shell.clone()));
        assert!(git.checkpoint(Path::new("/app"), "feat: install devise.").unwrap());
        assert_eq!(
            shell.ran(),
            vec!["git add .", "git commit -m \"feat: install devise.\""]
        );
    }

    #[test]
    fn clean_tree_skips_commit() {
        let shell = RecordingShell::new();
        let git = GitCli::new(Arc::new(shell.clone()));
        assert!(!git.checkpoint(Path::new("/app"), "feat: install devise.").unwrap());
        assert_eq!(shell.ran(), vec!["git add ."]);
    }

    #[test]
    fn failed_commit_is_a_version_control_error() {
        let shell = RecordingShell::new()
            .answer_probe("git diff", false)
            .fail("git commit", 128);
        let git = GitCli::new(Arc::new(shell));
        let err = git.checkpoint(Path::new("/app"), "x").unwrap_err();
        assert!(err.to_string().contains("status 128"));
    }
}
