//! Version control double that remembers checkpoints.

use std::path::Path;
use std::sync::{Arc, Mutex};

use railkit_core::{application::ports::VersionControl, error::RailkitResult};

/// Commits only when something was marked as staged since the last
/// checkpoint, the way `git commit` refuses an empty index.
#[derive(Debug, Clone, Default)]
pub struct RecordingVcs {
    inner: Arc<Mutex<Recorded>>,
}

#[derive(Debug, Default)]
struct Recorded {
    initialized: bool,
    clean: bool,
    commits: Vec<String>,
}

impl RecordingVcs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat the tree as committed: the next checkpoint finds nothing staged.
    pub fn mark_clean(&self) {
        if let Ok(mut recorded) = self.inner.lock() {
            recorded.clean = true;
        }
    }

    pub fn initialized(&self) -> bool {
        self.inner.lock().map(|r| r.initialized).unwrap_or(false)
    }

    pub fn commits(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|r| r.commits.clone())
            .unwrap_or_default()
    }
}

impl VersionControl for RecordingVcs {
    fn init(&self, _root: &Path) -> RailkitResult<()> {
        if let Ok(mut recorded) = self.inner.lock() {
            recorded.initialized = true;
        }
        Ok(())
    }

    fn checkpoint(&self, _root: &Path, message: &str) -> RailkitResult<bool> {
        let Ok(mut recorded) = self.inner.lock() else {
            return Ok(false);
        };
        if recorded.clean {
            return Ok(false);
        }
        recorded.commits.push(message.to_string());
        Ok(true)
    }
}
