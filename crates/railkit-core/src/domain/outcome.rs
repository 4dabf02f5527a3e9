//! Structured results of installer and setup runs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::feature::Feature;
use crate::domain::profile::ExecutionMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Human-readable status line emitted while a step runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Why an installer stopped without finishing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AbortReason {
    /// A required predecessor feature is absent. Nothing was written.
    PrerequisiteMissing { requires: Feature },
    /// A step failed part-way; re-running resumes from the guards.
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InstallOutcome {
    Installed,
    /// The idempotency guard found every defining artifact in place.
    Skipped { reason: String },
    Aborted(AbortReason),
}

impl InstallOutcome {
    pub fn is_installed(&self) -> bool {
        matches!(self, Self::Installed)
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted(_))
    }
}

/// What happened to one feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    pub feature: Feature,
    pub mode: ExecutionMode,
    pub outcome: InstallOutcome,
    pub notices: Vec<Notice>,
}

/// A single resolved question from the selection phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub key: String,
    pub answer: String,
    /// `true` when an override answered without prompting.
    pub overridden: bool,
}

/// Outcome of the single batch dependency installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchInstall {
    /// The lock state already matched the manifest.
    AlreadySatisfied,
    Installed,
}

/// Everything one setup run did, in order.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub dry_run: bool,
    pub selections: Vec<Selection>,
    pub planned: Vec<Feature>,
    /// Number of batch installation invocations; one per real run.
    pub install_invocations: u32,
    pub batch_install: Option<BatchInstall>,
    pub features: Vec<InstallReport>,
    pub checkpoints: Vec<String>,
    pub notices: Vec<Notice>,
}

impl RunReport {
    pub fn start(dry_run: bool) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            dry_run,
            selections: Vec::new(),
            planned: Vec::new(),
            install_invocations: 0,
            batch_install: None,
            features: Vec::new(),
            checkpoints: Vec::new(),
            notices: Vec::new(),
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn report_for(&self, feature: Feature) -> Option<&InstallReport> {
        self.features.iter().find(|r| r.feature == feature)
    }

    pub fn aborted(&self) -> impl Iterator<Item = &InstallReport> {
        self.features.iter().filter(|r| r.outcome.is_aborted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_serializes_with_status_tag() {
        let aborted = InstallOutcome::Aborted(AbortReason::PrerequisiteMissing {
            requires: Feature::Devise,
        });
        let json = serde_json::to_value(&aborted).unwrap();
        assert_eq!(json["status"], "aborted");
        assert_eq!(json["kind"], "prerequisite_missing");
        assert_eq!(json["requires"], "devise");
    }

    #[test]
    fn report_lookup_and_aborted_filter() {
        let mut report = RunReport::start(false);
        report.features.push(InstallReport {
            feature: Feature::Admin,
            mode: ExecutionMode::Embedded,
            outcome: InstallOutcome::Aborted(AbortReason::Failed {
                message: "boom".into(),
            }),
            notices: vec![],
        });
        report.features.push(InstallReport {
            feature: Feature::Pagination,
            mode: ExecutionMode::Embedded,
            outcome: InstallOutcome::Installed,
            notices: vec![],
        });
        assert!(report.report_for(Feature::Pagination).unwrap().outcome.is_installed());
        assert_eq!(report.aborted().count(), 1);
        assert!(report.finished_at.is_none());
        report.finish();
        assert!(report.finished_at.is_some());
    }
}
