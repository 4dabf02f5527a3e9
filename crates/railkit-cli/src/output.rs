//! Output management and formatting.

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::OwoColorize;
use serde::Serialize;

use railkit_core::application::FeatureStatus;
use railkit_core::domain::{
    AbortReason, BatchInstall, Feature, InstallOutcome, InstallReport, Notice, NoticeLevel,
    RunReport,
};

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let requested = if args.output_format == OutputFormat::Auto {
            match config.output.format.as_str() {
                "json" => OutputFormat::Json,
                "plain" => OutputFormat::Plain,
                _ => OutputFormat::Auto,
            }
        } else {
            args.output_format
        };

        // Resolve Auto → Human (TTY) or Plain (piped/redirected).
        let resolved_format = if requested == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            requested
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}") // ✓
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// Error indicator: `✗ <msg>`.  *Not* suppressed in quiet mode.
    pub fn error(&self, msg: &str) -> io::Result<()> {
        let line = if self.no_color {
            format!("\u{2717} {msg}") // ✗
        } else {
            format!("{} {}", "\u{2717}".red().bold(), msg.red())
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}") // ⚠
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2139} {msg}") // ℹ
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Pretty JSON on stdout. Written even in quiet mode.
    pub fn json<T: Serialize>(&self, value: &T) -> io::Result<()> {
        let body = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.term.write_line(&body)
    }

    pub fn notice(&self, notice: &Notice) -> io::Result<()> {
        match notice.level {
            NoticeLevel::Info => self.info(&notice.message),
            NoticeLevel::Success => self.success(&notice.message),
            NoticeLevel::Warning => self.warning(&notice.message),
            NoticeLevel::Error => self.error(&notice.message),
        }
    }

    // ── Reports ───────────────────────────────────────────────────────────

    pub fn run_report(&self, report: &RunReport) -> io::Result<()> {
        if self.is_json() {
            return self.json(report);
        }

        if report.dry_run {
            self.header("Planned features (dry run):")?;
            if report.planned.is_empty() {
                self.print("  (none)")?;
            }
            for feature in &report.planned {
                self.print(&format!("  - {} ({})", feature.display_name(), feature.key()))?;
            }
            return Ok(());
        }

        for notice in &report.notices {
            self.notice(notice)?;
        }
        if report.batch_install == Some(BatchInstall::Installed) {
            self.success("Dependencies installed")?;
        }

        self.header("Features:")?;
        for feature_report in &report.features {
            self.feature_line(feature_report)?;
        }

        let elapsed = report
            .finished_at
            .map(|finished| (finished - report.started_at).num_seconds());
        let summary = match elapsed {
            Some(secs) => format!(
                "{} feature(s) processed, {} checkpoint(s) in {secs}s",
                report.features.len(),
                report.checkpoints.len()
            ),
            None => format!("{} feature(s) processed", report.features.len()),
        };
        self.print(&summary)
    }

    pub fn install_report(&self, report: &InstallReport) -> io::Result<()> {
        if self.is_json() {
            return self.json(report);
        }
        for notice in &report.notices {
            self.notice(notice)?;
        }
        self.feature_line(report)
    }

    pub fn feature_status(&self, statuses: &[FeatureStatus]) -> io::Result<()> {
        if self.is_json() {
            return self.json(&statuses);
        }
        self.header(&format!("{:<28} {:<10} {}", "FEATURE", "REQUESTED", "INSTALLED"))?;
        for status in statuses {
            self.print(&format!(
                "{:<28} {:<10} {}",
                status.feature.key(),
                yes_no(status.requested),
                yes_no(status.installed)
            ))?;
        }
        Ok(())
    }

    pub fn feature_list(&self) -> io::Result<()> {
        if self.is_json() {
            let rows: Vec<FeatureRow> = Feature::ALL.into_iter().map(FeatureRow::from).collect();
            return self.json(&rows);
        }
        for feature in Feature::ALL {
            self.print(&format!(
                "{:<28} {:<32} {}",
                feature.key(),
                feature.display_name(),
                feature.env_var()
            ))?;
        }
        Ok(())
    }

    fn feature_line(&self, report: &InstallReport) -> io::Result<()> {
        let name = report.feature.display_name();
        match &report.outcome {
            InstallOutcome::Installed => self.success(&format!("{name} installed")),
            InstallOutcome::Skipped { reason } => self.info(&format!("{name}: {reason}")),
            InstallOutcome::Aborted(reason) => {
                self.error(&format!("{name} aborted: {}", abort_message(reason)))
            }
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn is_json(&self) -> bool {
        self.resolved_format == OutputFormat::Json
    }
}

#[derive(Serialize)]
struct FeatureRow {
    key: &'static str,
    name: &'static str,
    env: String,
}

impl From<Feature> for FeatureRow {
    fn from(feature: Feature) -> Self {
        Self {
            key: feature.key(),
            name: feature.display_name(),
            env: feature.env_var(),
        }
    }
}

pub fn abort_message(reason: &AbortReason) -> String {
    match reason {
        AbortReason::PrerequisiteMissing { requires } => {
            format!("requires {} to be installed first", requires.display_name())
        }
        AbortReason::Failed { message } => message.clone(),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

// ── tests ─────────────────────────────────────────────────────────────────────
