//! Handle on one Rails project tree.
//!
//! Every read goes to the filesystem port fresh; nothing is cached between
//! calls. Every write is conditional on what is on disk at the moment of the
//! write, so a repeated call is a no-op rather than a duplicate.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::application::ApplicationError;
use crate::application::ports::{CommandLine, Filesystem, Shell};
use crate::application::services::ledger::DependencyLedger;
use crate::error::RailkitResult;

pub const GEMFILE: &str = "Gemfile";
pub const LAYOUT: &str = "app/views/layouts/application.html.erb";
pub const ROUTES: &str = "config/routes.rb";
pub const APPLICATION_CONFIG: &str = "config/application.rb";
pub const APPLICATION_CONTROLLER: &str = "app/controllers/application_controller.rb";

/// What a conditional write actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteEffect {
    Created,
    Updated,
    /// The content was already there.
    Unchanged,
    /// The file or the anchor text to patch at does not exist.
    AnchorMissing,
}

impl WriteEffect {
    pub fn changed(self) -> bool {
        matches!(self, Self::Created | Self::Updated)
    }
}

/// A Rails project on disk plus the tools to drive it.
#[derive(Clone)]
pub struct Project {
    root: PathBuf,
    fs: Arc<dyn Filesystem>,
    shell: Arc<dyn Shell>,
}

impl fmt::Debug for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Project").field("root", &self.root).finish()
    }
}

impl Project {
    pub fn new(root: impl Into<PathBuf>, fs: Arc<dyn Filesystem>, shell: Arc<dyn Shell>) -> Self {
        Self {
            root: root.into(),
            fs,
            shell,
        }
    }

    /// Like [`Project::new`], but refuses a directory without a Gemfile.
    pub fn open(
        root: impl Into<PathBuf>,
        fs: Arc<dyn Filesystem>,
        shell: Arc<dyn Shell>,
    ) -> RailkitResult<Self> {
        let project = Self::new(root, fs, shell);
        if !project.exists(GEMFILE) {
            return Err(ApplicationError::NotAProject {
                path: project.root.clone(),
            }
            .into());
        }
        Ok(project)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    pub fn ledger(&self) -> DependencyLedger {
        DependencyLedger::new(self.clone())
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn exists(&self, rel: &str) -> bool {
        self.fs.exists(&self.path(rel))
    }

    pub fn read(&self, rel: &str) -> RailkitResult<String> {
        self.fs.read_to_string(&self.path(rel))
    }

    pub fn read_or_empty(&self, rel: &str) -> RailkitResult<String> {
        if self.exists(rel) {
            self.read(rel)
        } else {
            Ok(String::new())
        }
    }

    /// Substring check. Unreadable or absent files contain nothing.
    pub fn contains(&self, rel: &str, needle: &str) -> bool {
        match self.read(rel) {
            Ok(text) => text.contains(needle),
            Err(_) => false,
        }
    }

    /// Does any entry directly inside `dir` satisfy `pred`?
    pub fn any_entry(&self, dir: &str, pred: impl Fn(&str) -> bool) -> bool {
        match self.fs.list_dir(&self.path(dir)) {
            Ok(entries) => entries.iter().any(|name| pred(name)),
            Err(err) => {
                debug!(dir, error = %err, "Listing failed; treating as empty");
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Guarded writes
    // ------------------------------------------------------------------

    /// Write `content` unless the file already exists.
    pub fn create_file(&self, rel: &str, content: &str) -> RailkitResult<WriteEffect> {
        if self.exists(rel) {
            return Ok(WriteEffect::Unchanged);
        }
        self.fs.write_file(&self.path(rel), content)?;
        debug!(file = rel, "Created");
        Ok(WriteEffect::Created)
    }

    /// Write `content`, replacing any different existing content.
    pub fn force_file(&self, rel: &str, content: &str) -> RailkitResult<WriteEffect> {
        if !self.exists(rel) {
            self.fs.write_file(&self.path(rel), content)?;
            return Ok(WriteEffect::Created);
        }
        if self.read(rel)? == content {
            return Ok(WriteEffect::Unchanged);
        }
        self.fs.write_file(&self.path(rel), content)?;
        Ok(WriteEffect::Updated)
    }

    /// Append `text` unless the file already contains it. Creates the file.
    pub fn append_once(&self, rel: &str, text: &str) -> RailkitResult<WriteEffect> {
        let current = self.read_or_empty(rel)?;
        if current.contains(text.trim()) {
            return Ok(WriteEffect::Unchanged);
        }
        let effect = if self.exists(rel) {
            WriteEffect::Updated
        } else {
            WriteEffect::Created
        };
        let mut updated = current;
        if !updated.is_empty() && !updated.ends_with('\n') {
            updated.push('\n');
        }
        updated.push_str(text);
        self.fs.write_file(&self.path(rel), &updated)?;
        Ok(effect)
    }

    /// Insert `text` right after the first occurrence of `anchor`.
    pub fn inject_after(&self, rel: &str, anchor: &str, text: &str) -> RailkitResult<WriteEffect> {
        self.inject(rel, anchor, text, true)
    }

    /// Insert `text` right before the first occurrence of `anchor`.
    pub fn inject_before(&self, rel: &str, anchor: &str, text: &str) -> RailkitResult<WriteEffect> {
        self.inject(rel, anchor, text, false)
    }

    fn inject(&self, rel: &str, anchor: &str, text: &str, after: bool) -> RailkitResult<WriteEffect> {
        if !self.exists(rel) {
            warn!(file = rel, "Cannot patch missing file");
            return Ok(WriteEffect::AnchorMissing);
        }
        let current = self.read(rel)?;
        if current.contains(text.trim()) {
            return Ok(WriteEffect::Unchanged);
        }
        let Some(idx) = current.find(anchor) else {
            warn!(file = rel, anchor, "Anchor not found");
            return Ok(WriteEffect::AnchorMissing);
        };
        let at = if after { idx + anchor.len() } else { idx };
        let mut updated = String::with_capacity(current.len() + text.len());
        updated.push_str(&current[..at]);
        updated.push_str(text);
        updated.push_str(&current[at..]);
        self.fs.write_file(&self.path(rel), &updated)?;
        Ok(WriteEffect::Updated)
    }

    /// Replace the first occurrence of `from` with `to`.
    pub fn replace(&self, rel: &str, from: &str, to: &str) -> RailkitResult<WriteEffect> {
        if !self.exists(rel) {
            return Ok(WriteEffect::AnchorMissing);
        }
        let current = self.read(rel)?;
        if current.contains(to) {
            return Ok(WriteEffect::Unchanged);
        }
        if !current.contains(from) {
            return Ok(WriteEffect::AnchorMissing);
        }
        let updated = current.replacen(from, to, 1);
        self.fs.write_file(&self.path(rel), &updated)?;
        Ok(WriteEffect::Updated)
    }

    pub fn remove(&self, rel: &str) -> RailkitResult<WriteEffect> {
        if !self.exists(rel) {
            return Ok(WriteEffect::Unchanged);
        }
        self.fs.remove_file(&self.path(rel))?;
        Ok(WriteEffect::Updated)
    }

    pub fn remove_dir(&self, rel: &str) -> RailkitResult<WriteEffect> {
        if !self.exists(rel) {
            return Ok(WriteEffect::Unchanged);
        }
        self.fs.remove_dir_all(&self.path(rel))?;
        Ok(WriteEffect::Updated)
    }

    /// Add a line inside the configure block of one environment, or inside
    /// the application class when `env` is `None`.
    pub fn environment(&self, text: &str, env: Option<&str>) -> RailkitResult<WriteEffect> {
        match env {
            Some(env) => {
                let block = indent(text, 2);
                self.inject_after(
                    &format!("config/environments/{env}.rb"),
                    "Rails.application.configure do\n",
                    &block,
                )
            }
            None => {
                let block = indent(text, 4);
                self.inject_after(
                    APPLICATION_CONFIG,
                    "class Application < Rails::Application\n",
                    &block,
                )
            }
        }
    }

    /// Add a line at the top of the routes block.
    pub fn route(&self, text: &str) -> RailkitResult<WriteEffect> {
        self.inject_after(
            ROUTES,
            "Rails.application.routes.draw do\n",
            &format!("  {text}\n"),
        )
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    pub fn command(&self, program: &str) -> CommandLine {
        CommandLine::new(program).current_dir(&self.root)
    }

    /// `bundle exec <args>`.
    pub fn bundle_exec<I, S>(&self, args: I) -> CommandLine
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command("bundle").arg("exec").args(args)
    }

    /// `bundle exec rails <args>`.
    pub fn rails_command<I, S>(&self, args: I) -> CommandLine
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bundle_exec(["rails"]).args(args)
    }

    /// Run a command; a non-zero exit becomes [`ApplicationError::CommandFailed`].
    pub fn run(&self, command: &CommandLine) -> RailkitResult<()> {
        debug!(%command, "Running");
        let status = self.shell.run(command)?;
        if status.success() {
            Ok(())
        } else {
            Err(ApplicationError::CommandFailed {
                command: command.to_string(),
                code: status.code.unwrap_or(-1),
            }
            .into())
        }
    }

    pub fn rails<I, S>(&self, args: I) -> RailkitResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run(&self.rails_command(args))
    }

    pub fn generate<I, S>(&self, args: I) -> RailkitResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run(&self.rails_command(["generate"]).args(args))
    }

    pub fn probe(&self, command: &CommandLine) -> bool {
        self.shell.probe(command)
    }

    /// Is the `rails generate <name>` generator loadable right now?
    pub fn generator_available(&self, name: &str) -> bool {
        self.probe(&self.rails_command(["generate", name, "--help"]))
    }

    /// Is the `rails <task>` task loadable right now?
    pub fn task_available(&self, task: &str) -> bool {
        self.probe(&self.rails_command([task, "--help"]))
    }
}

fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    let mut out = String::new();
    for line in text.lines() {
        if line.is_empty() {
            out.push('\n');
        } else {
            out.push_str(&pad);
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}
