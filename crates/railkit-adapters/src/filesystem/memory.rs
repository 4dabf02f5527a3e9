//! In-memory filesystem adapter for testing and dry inspection.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use railkit_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{RailkitError, RailkitResult},
};

/// In-memory filesystem for testing.
///
/// Clones share the same tree, so a test can hand one clone to a
/// [`Project`](railkit_core::application::Project) and inspect another.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    writes: usize,
}

impl MemoryFilesystemInner {
    fn add_parents(&mut self, path: &Path) {
        let mut current = path.parent();
        while let Some(dir) = current {
            if dir.as_os_str().is_empty() || !self.directories.insert(dir.to_path_buf()) {
                break;
            }
            current = dir.parent();
        }
    }
}

fn poisoned() -> RailkitError {
    RailkitError::Internal {
        message: "memory filesystem lock poisoned".into(),
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `root`-relative files.
    pub fn with_files<'a>(
        root: impl AsRef<Path>,
        files: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let fs = Self::new();
        for (rel, content) in files {
            fs.seed(root.as_ref().join(rel), content);
        }
        fs
    }

    /// Put a file in place without counting it as a write.
    pub fn seed(&self, path: impl AsRef<Path>, content: &str) {
        if let Ok(mut inner) = self.inner.write() {
            inner.add_parents(path.as_ref());
            inner
                .files
                .insert(path.as_ref().to_path_buf(), content.to_string());
        }
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path.as_ref()).cloned()
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of `write_file`/`remove_*` calls that changed something.
    pub fn write_count(&self) -> usize {
        self.inner.read().map(|inner| inner.writes).unwrap_or_default()
    }
}

impl Filesystem for MemoryFilesystem {
    fn read_to_string(&self, path: &Path) -> RailkitResult<String> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        inner.files.get(path).cloned().ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "No such file".into(),
            }
            .into()
        })
    }

    fn write_file(&self, path: &Path, content: &str) -> RailkitResult<()> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        if inner.directories.contains(path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "Is a directory".into(),
            }
            .into());
        }
        inner.add_parents(path);
        inner.files.insert(path.to_path_buf(), content.to_string());
        inner.writes += 1;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn create_dir_all(&self, path: &Path) -> RailkitResult<()> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        inner.directories.insert(path.to_path_buf());
        inner.add_parents(path);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> RailkitResult<()> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        if inner.files.remove(path).is_some() {
            inner.writes += 1;
        }
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> RailkitResult<()> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        let before = inner.files.len() + inner.directories.len();
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        if inner.files.len() + inner.directories.len() != before {
            inner.writes += 1;
        }
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> RailkitResult<Vec<String>> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        let children = inner
            .files
            .keys()
            .chain(inner.directories.iter())
            .filter(|p| p.parent() == Some(path))
            .filter_map(|p| p.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect::<BTreeSet<_>>();
        Ok(children.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_create_listable_parents() {
        let fs = MemoryFilesystem::new();
        fs.write_file(Path::new("/app/db/migrate/1_a.rb"), "").unwrap();

        assert!(fs.exists(Path::new("/app/db")));
        assert_eq!(fs.list_dir(Path::new("/app/db")).unwrap(), vec!["migrate"]);
        assert_eq!(
            fs.list_dir(Path::new("/app/db/migrate")).unwrap(),
            vec!["1_a.rb"]
        );
    }

    #[test]
    fn seeding_is_not_a_write() {
        let fs = MemoryFilesystem::with_files("/app", [("Gemfile", "gem \"rails\"\n")]);
        assert_eq!(fs.write_count(), 0);
        fs.remove_file(Path::new("/app/missing")).unwrap();
        assert_eq!(fs.write_count(), 0);
        fs.remove_dir_all(Path::new("/app")).unwrap();
        assert_eq!(fs.write_count(), 1);
        assert!(fs.list_files().is_empty());
    }
}
