//! In-crate test doubles for the filesystem and shell ports.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::application::ApplicationError;
use crate::application::ports::{CommandLine, CommandStatus, Filesystem, Shell};
use crate::application::services::project::Project;
use crate::error::RailkitResult;

pub const ROOT: &str = "/app";

pub const RAILS_GEMFILE: &str = r#"source "https://rubygems.org"

gem "rails", "~> 8.0.2"
gem "propshaft"

group :development, :test do
  gem "debug", platforms: %i[ mri windows ], require: "debug/prelude"
end

group :development do
  gem "web-console"
end
"#;

#[derive(Default)]
pub struct MemFs {
    files: Mutex<BTreeMap<PathBuf, String>>,
}

impl MemFs {
    pub fn get(&self, rel: &str) -> Option<String> {
        self.files.lock().unwrap().get(&Path::new(ROOT).join(rel)).cloned()
    }

    pub fn put(&self, rel: &str, content: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(Path::new(ROOT).join(rel), content.to_string());
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

impl Filesystem for MemFs {
    fn read_to_string(&self, path: &Path) -> RailkitResult<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| {
                ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "not found".into(),
                }
                .into()
            })
    }

    fn write_file(&self, path: &Path, content: &str) -> RailkitResult<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files
            .lock()
            .unwrap()
            .keys()
            .any(|p| p == path || p.starts_with(path))
    }

    fn create_dir_all(&self, _path: &Path) -> RailkitResult<()> {
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> RailkitResult<()> {
        self.files.lock().unwrap().remove(path);
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> RailkitResult<()> {
        self.files.lock().unwrap().retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> RailkitResult<Vec<String>> {
        let mut names: Vec<String> = self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter_map(|p| p.strip_prefix(path).ok())
            .filter_map(|rest| rest.components().next())
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }
}

/// Shell that succeeds at everything and remembers what it ran.
#[derive(Default)]
pub struct OkShell {
    pub probes_pass: bool,
    pub ran: Mutex<Vec<String>>,
}

impl OkShell {
    pub fn ran(&self) -> Vec<String> {
        self.ran.lock().unwrap().clone()
    }
}

impl Shell for OkShell {
    fn run(&self, command: &CommandLine) -> RailkitResult<CommandStatus> {
        self.ran.lock().unwrap().push(command.to_string());
        Ok(CommandStatus::SUCCESS)
    }

    fn probe(&self, _command: &CommandLine) -> bool {
        self.probes_pass
    }
}

pub fn project(probes_pass: bool) -> (Project, Arc<MemFs>, Arc<OkShell>) {
    let fs = Arc::new(MemFs::default());
    fs.put("Gemfile", RAILS_GEMFILE);
    let shell = Arc::new(OkShell {
        probes_pass,
        ..OkShell::default()
    });
    let project = Project::new(ROOT, fs.clone(), shell.clone());
    (project, fs, shell)
}
