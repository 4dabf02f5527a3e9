use crate::application::installers::{MIGRATIONS_DIR, model_path, table_name};
use crate::application::services::installer::{FeatureInstaller, InstallContext};
use crate::application::services::project::Project;
use crate::domain::{DependencySpec, Feature};
use crate::error::RailkitResult;

const DEPENDENCIES: &[DependencySpec] = &[DependencySpec::runtime("friendly_id")];

const INITIALIZER: &str = "config/initializers/friendly_id.rb";

/// Slug from the first human-readable attribute the model has.
const MODEL_HOOK: &str = "  extend FriendlyId
  friendly_id :slug_source, use: :slugged

  def slug_source
    %i[name title email email_address].each do |attr|
      return public_send(attr) if respond_to?(attr) && public_send(attr).present?
    end
    SecureRandom.hex(4)
  end
";

pub struct FriendlyUrlsInstaller;

impl FeatureInstaller for FriendlyUrlsInstaller {
    fn feature(&self) -> Feature {
        Feature::FriendlyUrls
    }

    fn is_installed(&self, project: &Project) -> bool {
        project.ledger().is_declared("friendly_id") && project.exists(INITIALIZER)
    }

    fn dependencies(&self) -> &'static [DependencySpec] {
        DEPENDENCIES
    }

    fn write_artifacts(&self, ctx: &mut InstallContext<'_>) -> RailkitResult<()> {
        let project = ctx.project;

        if !project.exists(INITIALIZER) {
            ctx.generate_if_available("friendly_id", &[])?;
        }

        let model = ctx.target_model.to_string();
        let path = model_path(&model);
        if !project.exists(&path) {
            ctx.warn(format!(
                "{model} model not found, skipping slugs. Add them to a model later."
            ));
            return Ok(());
        }

        let effect = project.inject_after(
            &path,
            &format!("class {model} < ApplicationRecord\n"),
            MODEL_HOOK,
        )?;
        ctx.track(effect, &format!("{model} slug"));

        let table = table_name(&model);
        let migration = format!("add_slug_to_{table}");
        if !project.any_entry(MIGRATIONS_DIR, |name| name.contains(&migration)) {
            let name = format!("AddSlugTo{}", camelize(&table));
            project.generate(["migration", name.as_str(), "slug:uniq"])?;
            ctx.info(format!("Generated {name} migration"));
        }
        Ok(())
    }
}

fn camelize(snake: &str) -> String {
    snake
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}
