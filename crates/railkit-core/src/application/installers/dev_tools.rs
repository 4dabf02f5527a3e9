use crate::application::services::installer::{FeatureInstaller, InstallContext};
use crate::application::services::project::Project;
use crate::domain::{DependencySpec, Feature};
use crate::error::RailkitResult;

const DEPENDENCIES: &[DependencySpec] = &[
    DependencySpec::development("better_errors"),
    DependencySpec::development("binding_of_caller"),
    DependencySpec::development("annotate"),
    DependencySpec::development("pry-byebug"),
    DependencySpec::development("pry-rails").no_require(),
    DependencySpec::development("awesome_print").no_require(),
    DependencySpec::development_test("rubocop").no_require(),
    DependencySpec::development_test("rubocop-rails").no_require(),
];

const ANNOTATE_INITIALIZER: &str = "config/initializers/annotate.rb";
const RUBOCOP_CONFIG: &str = ".rubocop.yml";
const PRYRC: &str = ".pryrc";
const DEVELOPMENT_ENV: &str = "config/environments/development.rb";

const RUBOCOP_DEFAULT: &str = r#"plugins:
  - rubocop-rails

AllCops:
  NewCops: enable
  Exclude:
    - "bin/**/*"
    - "db/**/*"
    - "config/**/*"
    - "node_modules/**/*"
    - "vendor/**/*"

Style/Documentation:
  Enabled: false

Style/FrozenStringLiteralComment:
  Enabled: false

Layout/LineLength:
  Max: 120

Metrics/MethodLength:
  Max: 20
"#;

const BETTER_ERRORS_NOTE: &str = "
  # Better Errors is enabled in development only.
  # Configure allowed IPs if you use Docker / VMs:
  # if defined?(BetterErrors)
  #   BetterErrors::Middleware.allow_ip! '0.0.0.0/0'
  # end
";

const PRYRC_BODY: &str = "# Pry aliases for easier debugging.
alias s step
alias n next
alias c continue
alias ls ls -M
alias wt whereis
";

const AWESOME_PRINT_HOOK: &str = "\n# Auto-load Awesome Print\nAwesomePrint.pry!\n";

pub struct DevToolsInstaller;

impl FeatureInstaller for DevToolsInstaller {
    fn feature(&self) -> Feature {
        Feature::DevTools
    }

    fn is_installed(&self, project: &Project) -> bool {
        project.exists(ANNOTATE_INITIALIZER) && project.exists(RUBOCOP_CONFIG)
    }

    fn dependencies(&self) -> &'static [DependencySpec] {
        DEPENDENCIES
    }

    fn write_artifacts(&self, ctx: &mut InstallContext<'_>) -> RailkitResult<()> {
        let project = ctx.project;

        if !project.exists(ANNOTATE_INITIALIZER) {
            if project.probe(&project.bundle_exec(["annotate", "--help"])) {
                project.run(&project.bundle_exec(["annotate", "--install"]))?;
                ctx.info("Installed annotate initializer");
            } else {
                ctx.warn("Annotate not available yet. Skipping annotate install.");
            }
        }

        let effect = project.create_file(RUBOCOP_CONFIG, RUBOCOP_DEFAULT)?;
        ctx.track(effect, RUBOCOP_CONFIG);

        if project.exists(DEVELOPMENT_ENV) && !project.contains(DEVELOPMENT_ENV, "BetterErrors") {
            let effect =
                project.inject_after(DEVELOPMENT_ENV, "Rails.application.configure do\n", BETTER_ERRORS_NOTE)?;
            ctx.track(effect, "Better Errors note");
        }

        let pry_ready = project.probe(&project.rails_command(["console", "--help"]))
            && project.probe(&project.bundle_exec(["pry", "--help"]));
        if pry_ready {
            let effect = project.create_file(PRYRC, PRYRC_BODY)?;
            ctx.track(effect, PRYRC);
        } else {
            ctx.warn("Pry not available yet. Skipping Pry config.");
        }

        let awesome_print = project.bundle_exec(["ruby", "-e", "require 'awesome_print'"]);
        if project.probe(&awesome_print) {
            if project.exists(PRYRC) {
                let effect = project.append_once(PRYRC, AWESOME_PRINT_HOOK)?;
                ctx.track(effect, "Awesome Print hook");
            }
        } else {
            ctx.warn("Awesome Print not available yet. Skipping.");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fixtures;
    use crate::domain::ExecutionMode;

    #[test]
    fn guard_needs_both_configs() {
        let (project, fs, _) = fixtures::project(true);
        fs.put(RUBOCOP_CONFIG, "");
        assert!(!DevToolsInstaller.is_installed(&project));
        fs.put(ANNOTATE_INITIALIZER, "");
        assert!(DevToolsInstaller.is_installed(&project));
    }

    #[test]
    fn rerun_does_not_duplicate_hooks() {
        let (project, fs, _) = fixtures::project(true);
        fs.put(DEVELOPMENT_ENV, "Rails.application.configure do\nend\n");
        for _ in 0..2 {
            let mut ctx = InstallContext::new(&project, ExecutionMode::Embedded, "User");
            DevToolsInstaller.write_artifacts(&mut ctx).unwrap();
        }
        assert_eq!(fs.get(PRYRC).unwrap().matches("AwesomePrint.pry!").count(), 1);
        assert_eq!(
            fs.get(DEVELOPMENT_ENV).unwrap().matches("BetterErrors::Middleware").count(),
            1
        );
    }
}
