//! Scriptable shell for tests: records every command, runs nothing.

use std::sync::{Arc, Mutex};

use railkit_core::{
    application::ports::{CommandLine, CommandStatus, Shell},
    error::RailkitResult,
};

/// Side effect standing in for what a real tool would have written.
pub type ShellEffect = Arc<dyn Fn(&CommandLine) + Send + Sync>;

#[derive(Default)]
struct Script {
    ran: Vec<String>,
    probed: Vec<String>,
    failures: Vec<(String, i32)>,
    probe_answers: Vec<(String, bool)>,
    effects: Vec<(String, ShellEffect)>,
}

/// Shell double. Commands are matched by prefix of their display form,
/// e.g. `"bundle exec rails generate devise"`.
#[derive(Clone)]
pub struct RecordingShell {
    script: Arc<Mutex<Script>>,
    probe_default: bool,
}

impl std::fmt::Debug for RecordingShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingShell")
            .field("ran", &self.ran())
            .finish()
    }
}

impl Default for RecordingShell {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingShell {
    /// Every probe succeeds unless scripted otherwise.
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(Script::default())),
            probe_default: true,
        }
    }

    pub fn probes_fail_by_default(mut self) -> Self {
        self.probe_default = false;
        self
    }

    pub fn fail(self, prefix: &str, code: i32) -> Self {
        self.with(|s| s.failures.push((prefix.to_string(), code)))
    }

    pub fn answer_probe(self, prefix: &str, answer: bool) -> Self {
        self.with(|s| s.probe_answers.push((prefix.to_string(), answer)))
    }

    pub fn on_run(self, prefix: &str, effect: impl Fn(&CommandLine) + Send + Sync + 'static) -> Self {
        let effect: ShellEffect = Arc::new(effect);
        self.with(|s| s.effects.push((prefix.to_string(), effect)))
    }

    /// Commands passed to `run`, in order.
    pub fn ran(&self) -> Vec<String> {
        self.script
            .lock()
            .map(|s| s.ran.clone())
            .unwrap_or_default()
    }

    /// Commands passed to `probe`, in order.
    pub fn probed(&self) -> Vec<String> {
        self.script
            .lock()
            .map(|s| s.probed.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, command: &str) -> usize {
        self.ran().iter().filter(|c| c.as_str() == command).count()
    }

    fn with(self, f: impl FnOnce(&mut Script)) -> Self {
        if let Ok(mut script) = self.script.lock() {
            f(&mut script);
        }
        self
    }
}

impl Shell for RecordingShell {
    fn run(&self, command: &CommandLine) -> RailkitResult<CommandStatus> {
        let line = command.to_string();
        let (status, effects) = {
            let Ok(mut script) = self.script.lock() else {
                return Ok(CommandStatus::failure(-1));
            };
            script.ran.push(line.clone());
            let status = script
                .failures
                .iter()
                .find(|(prefix, _)| line.starts_with(prefix.as_str()))
                .map_or(CommandStatus::SUCCESS, |(_, code)| {
                    CommandStatus::failure(*code)
                });
            let effects: Vec<ShellEffect> = script
                .effects
                .iter()
                .filter(|(prefix, _)| line.starts_with(prefix.as_str()))
                .map(|(_, effect)| effect.clone())
                .collect();
            (status, effects)
        };
        if status.success() {
            for effect in effects {
                effect(command);
            }
        }
        Ok(status)
    }

    fn probe(&self, command: &CommandLine) -> bool {
        let line = command.to_string();
        let Ok(mut script) = self.script.lock() else {
            return false;
        };
        script.probed.push(line.clone());
        script
            .probe_answers
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map_or(self.probe_default, |(_, answer)| *answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn scripted_failures_and_effects() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let shell = RecordingShell::new()
            .fail("bundle install", 5)
            .on_run("git", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        let status = shell.run(&CommandLine::new("bundle").arg("install")).unwrap();
        assert_eq!(status.code, Some(5));
        shell.run(&CommandLine::new("git").arg("init")).unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(shell.ran(), vec!["bundle install", "git init"]);
    }

    #[test]
    fn probe_answers_override_default() {
        let shell = RecordingShell::new().answer_probe("bundle check", false);
        assert!(!shell.probe(&CommandLine::new("bundle").arg("check")));
        assert!(shell.probe(&CommandLine::new("pkill")));
    }
}
