use crate::application::services::installer::{FeatureInstaller, InstallContext};
use crate::application::services::project::Project;
use crate::domain::{DependencySpec, Feature};
use crate::error::RailkitResult;

const DEPENDENCIES: &[DependencySpec] = &[DependencySpec::runtime("ruby_llm")];

const INITIALIZER: &str = "config/initializers/ruby_llm.rb";
const INITIALIZER_BODY: &str = r#"RubyLLM.configure do |config|
  # Add keys ONLY for the providers you intend to use.
  # Using environment variables is highly recommended.
  config.openai_api_key = ENV.fetch('OPENAI_API_KEY', nil)
  # config.anthropic_api_key = ENV.fetch('ANTHROPIC_API_KEY', nil)
end
"#;
const ENV_PLACEHOLDER: &str = "# OPENAI_API_KEY=replace_with_your_openai_key\n";

pub struct RubyLlmInstaller;

impl FeatureInstaller for RubyLlmInstaller {
    fn feature(&self) -> Feature {
        Feature::RubyLlm
    }

    fn is_installed(&self, project: &Project) -> bool {
        project.exists(INITIALIZER)
    }

    fn dependencies(&self) -> &'static [DependencySpec] {
        DEPENDENCIES
    }

    fn write_artifacts(&self, ctx: &mut InstallContext<'_>) -> RailkitResult<()> {
        let effect = ctx.project.create_file(INITIALIZER, INITIALIZER_BODY)?;
        ctx.track(effect, INITIALIZER);
        let effect = ctx.project.append_once(".env", ENV_PLACEHOLDER)?;
        ctx.track(effect, ".env OpenAI key");
        Ok(())
    }
}
