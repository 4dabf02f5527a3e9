//! Spinner that follows a setup run through the `RunObserver` port.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use railkit_core::application::RunObserver;
use railkit_core::domain::{InstallOutcome, InstallReport};

use crate::output::abort_message;

const TICK: Duration = Duration::from_millis(120);

/// A spinner, or a hidden bar when output is quiet or machine-readable.
pub fn spinner(visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    bar.set_style(style);
    bar.enable_steady_tick(TICK);
    bar
}

pub struct SpinnerObserver {
    bar: ProgressBar,
}

impl SpinnerObserver {
    pub fn new(bar: ProgressBar) -> Self {
        Self { bar }
    }
}

impl RunObserver for SpinnerObserver {
    fn step_started(&self, step: &str) {
        self.bar.set_message(step.to_string());
    }

    fn feature_finished(&self, report: &InstallReport) {
        self.bar.println(summary_line(report));
    }

    fn run_finished(&self) {
        self.bar.finish_and_clear();
    }
}

fn summary_line(report: &InstallReport) -> String {
    let name = report.feature.display_name();
    match &report.outcome {
        InstallOutcome::Installed => format!("  \u{2713} {name}"),
        InstallOutcome::Skipped { .. } => format!("  - {name} (already installed)"),
        InstallOutcome::Aborted(reason) => format!("  \u{2717} {name}: {}", abort_message(reason)),
    }
}
