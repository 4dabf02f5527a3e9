use crate::application::services::installer::{FeatureInstaller, InstallContext};
use crate::application::services::project::Project;
use crate::domain::{DependencySpec, Feature};
use crate::error::RailkitResult;

const DEPENDENCIES: &[DependencySpec] = &[
    DependencySpec::development_test("rspec-rails"),
    DependencySpec::development_test("factory_bot_rails"),
    DependencySpec::development_test("faker"),
    DependencySpec::development_test("shoulda-matchers"),
];

const RAILS_HELPER: &str = "spec/rails_helper.rb";
const FACTORY_BOT_SUPPORT: &str = "spec/support/factory_bot.rb";

const FACTORY_BOT_BODY: &str = "RSpec.configure do |config|
  config.include FactoryBot::Syntax::Methods
end
";

const SUPPORT_REQUIRE: &str =
    "\nRails.root.glob(\"spec/support/**/*.rb\").sort_by(&:to_s).each { |f| require f }\n";

const SHOULDA_CONFIG: &str = "
Shoulda::Matchers.configure do |config|
  config.integrate do |with|
    with.test_framework :rspec
    with.library :rails
  end
end
";

/// RSpec with factories, fake data and matchers.
pub struct TestingInstaller;

impl FeatureInstaller for TestingInstaller {
    fn feature(&self) -> Feature {
        Feature::Testing
    }

    fn is_installed(&self, project: &Project) -> bool {
        project.ledger().is_declared("rspec-rails") && project.exists(RAILS_HELPER)
    }

    fn dependencies(&self) -> &'static [DependencySpec] {
        DEPENDENCIES
    }

    fn write_artifacts(&self, ctx: &mut InstallContext<'_>) -> RailkitResult<()> {
        let project = ctx.project;

        if !project.exists(RAILS_HELPER) {
            ctx.generate_if_available("rspec:install", &[])?;
        }

        let effect = project.create_file(FACTORY_BOT_SUPPORT, FACTORY_BOT_BODY)?;
        ctx.track(effect, FACTORY_BOT_SUPPORT);

        // Appending to a missing helper would fake the guard's marker.
        if !project.exists(RAILS_HELPER) {
            ctx.warn("spec/rails_helper.rb missing, skipping RSpec configuration.");
            return Ok(());
        }
        let effect = project.append_once(RAILS_HELPER, SUPPORT_REQUIRE)?;
        ctx.track(effect, "support file loading");
        let effect = project.append_once(RAILS_HELPER, SHOULDA_CONFIG)?;
        ctx.track(effect, "shoulda-matchers configuration");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fixtures;
    use crate::domain::ExecutionMode;

    #[test]
    fn never_creates_rails_helper_itself() {
        let (project, fs, _) = fixtures::project(false);
        let mut ctx = InstallContext::new(&project, ExecutionMode::Embedded, "User");
        TestingInstaller.write_artifacts(&mut ctx).unwrap();
        assert!(fs.get(RAILS_HELPER).is_none());
        assert!(fs.get(FACTORY_BOT_SUPPORT).is_some());
    }

    #[test]
    fn configures_existing_helper_once() {
        let (project, fs, _) = fixtures::project(true);
        fs.put(RAILS_HELPER, "require \"spec_helper\"\n");
        for _ in 0..2 {
            let mut ctx = InstallContext::new(&project, ExecutionMode::Embedded, "User");
            TestingInstaller.write_artifacts(&mut ctx).unwrap();
        }
        let helper = fs.get(RAILS_HELPER).unwrap();
        assert_eq!(helper.matches("Shoulda::Matchers.configure").count(), 1);
    }
}
