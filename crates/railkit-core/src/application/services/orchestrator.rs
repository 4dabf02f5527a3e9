//! Setup orchestrator - drives one complete project setup run.
//!
//! The run is strictly linear:
//! 1. Stop stale spring processes (best effort)
//! 2. Baseline artifacts (dotenv, flashes, README, generators block)
//! 3. Feature selection, then one declaration per selected feature
//! 4. One batch dependency installation
//! 5. Baseline post-install steps and the initial checkpoint
//! 6. Each declared feature's installer in embedded mode, one checkpoint each
//! 7. Final migration and checkpoint
//!
//! Feature failures are recorded in the [`RunReport`] and the run moves on.
//! Failures of the baseline steps or of version control end the run.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::application::installers::{NAVBAR_TEMPLATE, installer_for};
use crate::application::ports::{NoopObserver, Prompter, RunObserver, VersionControl};
use crate::application::services::installer::InstallService;
use crate::application::services::ledger::DependencyLedger;
use crate::application::services::project::{LAYOUT, Project, WriteEffect};
use crate::application::services::selector::{FeatureSelector, SelectionPlan};
use crate::domain::{
    BatchInstall, DependencySpec, Detection, DeviseVersion, ExecutionMode, Feature, Manifest,
    NATIVE_AUTH_MARKER, NAVBAR_PARTIAL, Notice, NoticeLevel, Preset, RunReport, SetupOptions,
};
use crate::error::RailkitResult;

const PAGES_CONTROLLER: &str = "app/controllers/pages_controller.rb";
const FLASHES_PARTIAL: &str = "app/views/shared/_flashes.html.erb";
const SPRING_BINSTUB: &str = "bin/spring";
const SPRING_PROCESS_PATTERN: &str = "^spring (server|app) ";

const VIEWPORT_DEFAULT: &str = r#"<meta name="viewport" content="width=device-width,initial-scale=1">"#;
const VIEWPORT_PATCHED: &str =
    r#"<meta name="viewport" content="width=device-width, initial-scale=1, shrink-to-fit=no">"#;

const FLASHES_RENDER: &str = "    <%= render \"shared/flashes\" %>\n";

const GENERATORS_BLOCK: &str = "config.generators do |generate|
  generate.assets false
  generate.helper false
  generate.test_framework :test_unit, fixture: false
end
";

const GITIGNORE_ADDITIONS: &str = "
# Ignore .env file containing credentials.
.env*

# Ignore Mac and Linux file system files
*.swp
.DS_Store
";

const DEV_MAILER: &str =
    r#"config.action_mailer.default_url_options = { host: "http://localhost:3000" }"#;
const PROD_MAILER: &str =
    r#"config.action_mailer.default_url_options = { host: "http://TODO_PUT_YOUR_DOMAIN_HERE" }"#;

const FINAL_CHECKPOINT: &str = "feat: add migration after initial setup.";

fn flashes_partial(preset: Preset) -> &'static str {
    match preset {
        Preset::Bootstrap => {
            r#"<% if notice %>
  <div class="alert alert-info alert-dismissible fade show m-1" role="alert">
    <%= notice %>
    <button type="button" class="btn-close" data-bs-dismiss="alert" aria-label="Close"></button>
  </div>
<% end %>
<% if alert %>
  <div class="alert alert-warning alert-dismissible fade show m-1" role="alert">
    <%= alert %>
    <button type="button" class="btn-close" data-bs-dismiss="alert" aria-label="Close"></button>
  </div>
<% end %>
"#
        }
        Preset::Tailwind => {
            r#"<% if notice %>
  <div class="m-2 rounded-md bg-blue-50 px-4 py-3 text-blue-800" role="status"><%= notice %></div>
<% end %>
<% if alert %>
  <div class="m-2 rounded-md bg-yellow-50 px-4 py-3 text-yellow-800" role="alert"><%= alert %></div>
<% end %>
"#
        }
        Preset::Custom => {
            r#"<% if notice %>
  <div class="flash flash-notice" role="status"><%= notice %></div>
<% end %>
<% if alert %>
  <div class="flash flash-alert" role="alert"><%= alert %></div>
<% end %>
"#
        }
    }
}

const PAGES_CLASS_LINE: &str = "class PagesController < ApplicationController";
const PAGES_CONTROLLER_BODY: &str =
    "class PagesController < ApplicationController\n  def home\n  end\nend\n";
const DEVISE_PUBLIC_HOME: &str = "\n  skip_before_action :authenticate_user!, only: [ :home ]\n";

/// Whether one feature's defining artifacts are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureStatus {
    pub feature: Feature,
    /// Selected for this project (dependency declared or marker present).
    pub requested: bool,
    pub installed: bool,
}

/// Report every feature's guard result without writing anything.
pub fn feature_status(project: &Project) -> Vec<FeatureStatus> {
    let ledger = project.ledger();
    Feature::ALL
        .into_iter()
        .map(|feature| FeatureStatus {
            feature,
            requested: is_requested(project, &ledger, feature),
            installed: installer_for(feature).is_installed(project),
        })
        .collect()
}

/// Was `feature` selected, judging by the project state alone?
fn is_requested(project: &Project, ledger: &DependencyLedger, feature: Feature) -> bool {
    match feature.detection() {
        Detection::Dependency(names) => names.iter().any(|name| ledger.is_declared(name)),
        Detection::Marker(path) => project.exists(path),
    }
}

/// Runs the full setup sequence against one project.
pub struct SetupOrchestrator {
    project: Project,
    vcs: Arc<dyn VersionControl>,
    prompter: Arc<dyn Prompter>,
    observer: Arc<dyn RunObserver>,
}

impl SetupOrchestrator {
    pub fn new(
        project: Project,
        vcs: Arc<dyn VersionControl>,
        prompter: Arc<dyn Prompter>,
    ) -> Self {
        Self {
            project,
            vcs,
            prompter,
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    #[instrument(
        skip_all,
        fields(
            root = %self.project.root().display(),
            rails = %options.rails_version,
            preset = %options.preset,
            dry_run = options.dry_run
        )
    )]
    pub fn run(&self, options: &SetupOptions) -> RailkitResult<RunReport> {
        let mut report = RunReport::start(options.dry_run);
        let ledger = self.project.ledger();

        // Selection sees the manifest as it was before this run touched it.
        let before = ledger.manifest()?;

        if !options.dry_run {
            self.observer.step_started("Stopping spring");
            self.stop_spring();
            self.observer.step_started("Baseline setup");
            self.baseline(options.preset, &mut report)?;
        }

        self.observer.step_started("Selecting features");
        let plan = FeatureSelector::new(self.prompter.clone(), options.overrides.clone())
            .plan(options, &before)?;
        report.selections = plan.selections.clone();
        report.planned = plan.features.clone();

        if options.dry_run {
            info!(planned = ?report.planned, "Dry run, nothing written");
            report.finish();
            self.observer.run_finished();
            return Ok(report);
        }

        self.declare(&plan, &mut report)?;

        self.observer.step_started("Installing dependencies");
        let batch = ledger.install_if_stale()?;
        report.install_invocations += 1;
        report.batch_install = Some(batch);
        if batch == BatchInstall::AlreadySatisfied {
            note(&mut report, NoticeLevel::Info, "Dependencies already satisfied");
        }

        self.observer.step_started("Post-install setup");
        self.post_install(options.preset, &mut report)?;

        let installs = InstallService::new(self.project.clone(), options.target_model.clone());
        for feature in Feature::ALL {
            if !is_requested(&self.project, &ledger, feature) {
                continue;
            }
            self.observer.step_started(feature.display_name());
            let installer = installer_for(feature);
            let outcome = installs.apply(installer.as_ref(), ExecutionMode::Embedded);

            if feature == Feature::Authentication {
                self.project.remove(NATIVE_AUTH_MARKER)?;
            }
            self.observer.feature_finished(&outcome);

            if outcome.outcome.is_installed() {
                self.checkpoint(feature.checkpoint_message(), &mut report)?;
            } else if outcome.outcome.is_aborted() {
                warn!(%feature, "Feature aborted, continuing");
            }
            report.features.push(outcome);
        }

        self.observer.step_started("Final migration");
        self.project.rails(["db:migrate", "db:seed"])?;
        self.checkpoint(FINAL_CHECKPOINT, &mut report)?;

        report.finish();
        self.observer.run_finished();
        info!(
            installed = report.features.iter().filter(|r| r.outcome.is_installed()).count(),
            aborted = report.aborted().count(),
            "Setup complete"
        );
        Ok(report)
    }

    /// Only this project's spring, or spring server processes by title.
    fn stop_spring(&self) {
        let stop = if self.project.exists(SPRING_BINSTUB) {
            self.project.command("ruby").args([SPRING_BINSTUB, "stop"])
        } else {
            self.project
                .command("pkill")
                .args(["-f", SPRING_PROCESS_PATTERN])
        };
        if !self.project.probe(&stop) {
            debug!("No spring process to stop");
        }
    }

    fn baseline(&self, preset: Preset, report: &mut RunReport) -> RailkitResult<()> {
        let project = &self.project;

        if project
            .ledger()
            .declare(&DependencySpec::development_test("dotenv-rails"))?
        {
            note(report, NoticeLevel::Info, "Added dotenv-rails");
        }

        let effect = project.replace(LAYOUT, VIEWPORT_DEFAULT, VIEWPORT_PATCHED)?;
        track(report, effect, "viewport meta tag");

        let effect = project.create_file(FLASHES_PARTIAL, flashes_partial(preset))?;
        track(report, effect, FLASHES_PARTIAL);

        let effect = project.inject_after(LAYOUT, "<body>\n", FLASHES_RENDER)?;
        track(report, effect, "layout flashes");

        let readme = format!(
            "Rails app generated with railkit, using the {} template.\n",
            preset.name()
        );
        let effect = project.force_file("README.md", &readme)?;
        track(report, effect, "README.md");

        let effect = project.environment(GENERATORS_BLOCK, None)?;
        track(report, effect, "generators configuration");
        Ok(())
    }

    /// Turn the plan into manifest declarations and selection markers.
    fn declare(&self, plan: &SelectionPlan, report: &mut RunReport) -> RailkitResult<()> {
        let ledger = self.project.ledger();
        let devise_constraint = plan.devise_version.and_then(DeviseVersion::constraint);

        for &feature in &plan.features {
            let installer = installer_for(feature);
            for spec in installer.dependencies() {
                let spec = if feature == Feature::Devise {
                    spec.with_constraint(devise_constraint)
                } else {
                    *spec
                };
                if ledger.declare(&spec)? {
                    note(report, NoticeLevel::Info, format!("Declared {}", spec.name));
                }
            }
            for name in installer.retired_dependencies() {
                if ledger.retire(name)? {
                    note(report, NoticeLevel::Info, format!("Removed {name}"));
                }
            }

            match feature {
                Feature::Authentication => {
                    self.project.create_file(NATIVE_AUTH_MARKER, "")?;
                }
                Feature::Navbar => {
                    self.project.create_file(NAVBAR_PARTIAL, NAVBAR_TEMPLATE)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn post_install(&self, preset: Preset, report: &mut RunReport) -> RailkitResult<()> {
        let project = &self.project;
        let manifest: Manifest = project.ledger().manifest()?;

        project.rails(["db:drop", "db:create", "db:migrate"])?;

        if !manifest.declares("bootstrap") && !manifest.declares("tailwindcss-rails") {
            if project.generator_available("simple_form:install") {
                project.generate(["simple_form:install"])?;
            } else {
                note(
                    report,
                    NoticeLevel::Warning,
                    "`simple_form:install` generator unavailable, skipping.",
                );
            }
        }

        if !project.exists(PAGES_CONTROLLER) {
            project.generate([
                "controller",
                "pages",
                "home",
                "--skip-routes",
                "--no-test-framework",
            ])?;
        }
        // Installers patch this file later; never rewrite it.
        let effect = project.create_file(PAGES_CONTROLLER, PAGES_CONTROLLER_BODY)?;
        track(report, effect, "pages controller");
        if manifest.declares("devise") {
            let effect =
                project.inject_after(PAGES_CONTROLLER, PAGES_CLASS_LINE, DEVISE_PUBLIC_HOME)?;
            track(report, effect, "public home page");
        }

        let effect = project.route(r#"root to: "pages#home""#)?;
        track(report, effect, "root route");

        let effect = project.append_once(".gitignore", GITIGNORE_ADDITIONS)?;
        track(report, effect, ".gitignore");

        let effect = project.environment(DEV_MAILER, Some("development"))?;
        track(report, effect, "development mailer host");
        let effect = project.environment(PROD_MAILER, Some("production"))?;
        track(report, effect, "production mailer host");

        project.run(
            &project
                .command("bundle")
                .args(["lock", "--add-platform", "x86_64-linux"]),
        )?;

        let effect = project.create_file(".env", "")?;
        track(report, effect, ".env");

        self.vcs.init(project.root())?;
        let message = format!(
            "initial commit: new rails app setup with {} template.",
            preset.name()
        );
        self.checkpoint(&message, report)
    }

    fn checkpoint(&self, message: &str, report: &mut RunReport) -> RailkitResult<()> {
        if self.vcs.checkpoint(self.project.root(), message)? {
            info!(message, "Checkpoint recorded");
            report.checkpoints.push(message.to_string());
        } else {
            debug!(message, "Nothing to commit");
        }
        Ok(())
    }
}

fn note(report: &mut RunReport, level: NoticeLevel, message: impl Into<String>) {
    report.notices.push(Notice::new(level, message));
}

fn track(report: &mut RunReport, effect: WriteEffect, what: &str) {
    match effect {
        WriteEffect::Created => note(report, NoticeLevel::Info, format!("Created {what}")),
        WriteEffect::Updated => note(report, NoticeLevel::Info, format!("Updated {what}")),
        WriteEffect::Unchanged => {}
        WriteEffect::AnchorMissing => note(
            report,
            NoticeLevel::Warning,
            format!("Could not update {what}; left as is"),
        ),
    }
}
