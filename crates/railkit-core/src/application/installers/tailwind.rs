use crate::application::installers::TAILWIND_CONFIG;
use crate::application::services::installer::{FeatureInstaller, InstallContext};
use crate::application::services::project::Project;
use crate::domain::{DependencySpec, Feature};
use crate::error::RailkitResult;

const DEPENDENCIES: &[DependencySpec] = &[
    DependencySpec::runtime("tailwindcss-rails"),
    DependencySpec::runtime("simple_form").github("heartcombo/simple_form"),
];

const SIMPLE_FORM_TAILWIND: &str = "config/initializers/simple_form_tailwind.rb";

const SIMPLE_FORM_TAILWIND_BODY: &str = r#"# Use this setup block to configure all options available in SimpleForm.
SimpleForm.setup do |config|
  # Tailwind CSS configuration
  config.wrappers :tailwind, class: 'mb-4' do |b|
    b.use :html5
    b.use :placeholder
    b.optional :maxlength
    b.optional :minlength
    b.optional :pattern
    b.optional :min_max
    b.optional :readonly
    b.use :label, class: 'block text-sm font-medium text-gray-700 mb-1'
    b.use :input, class: 'mt-1 block w-full rounded-md border-gray-300 shadow-sm focus:border-indigo-300 focus:ring focus:ring-indigo-200 focus:ring-opacity-50', error_class: 'border-red-500'
    b.use :error, wrap_with: { tag: 'p', class: 'mt-2 text-sm text-red-600' }
    b.use :hint, wrap_with: { tag: 'p', class: 'mt-2 text-sm text-gray-500' }
  end

  config.default_wrapper = :tailwind
end
"#;

pub struct TailwindInstaller;

impl FeatureInstaller for TailwindInstaller {
    fn feature(&self) -> Feature {
        Feature::Tailwind
    }

    fn is_installed(&self, project: &Project) -> bool {
        project.exists(TAILWIND_CONFIG)
    }

    fn dependencies(&self) -> &'static [DependencySpec] {
        DEPENDENCIES
    }

    fn write_artifacts(&self, ctx: &mut InstallContext<'_>) -> RailkitResult<()> {
        ctx.task_if_available("tailwindcss:install")?;

        if !ctx.project.exists("config/initializers/simple_form.rb") {
            ctx.generate_if_available("simple_form:install", &[])?;
        }

        let effect = ctx
            .project
            .create_file(SIMPLE_FORM_TAILWIND, SIMPLE_FORM_TAILWIND_BODY)?;
        ctx.track(effect, SIMPLE_FORM_TAILWIND);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fixtures;
    use crate::domain::{ExecutionMode, NoticeLevel};

    #[test]
    fn unavailable_generators_warn_but_still_write_initializer() {
        let (project, fs, shell) = fixtures::project(false);
        let mut ctx = InstallContext::new(&project, ExecutionMode::Embedded, "User");
        TailwindInstaller.write_artifacts(&mut ctx).unwrap();

        assert!(fs.get(SIMPLE_FORM_TAILWIND).is_some());
        assert!(shell.ran().is_empty());
        let warnings = ctx
            .into_notices()
            .into_iter()
            .filter(|n| n.level == NoticeLevel::Warning)
            .count();
        assert_eq!(warnings, 2);
    }
}
