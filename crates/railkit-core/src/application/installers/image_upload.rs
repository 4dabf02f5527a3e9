use crate::application::installers::{MIGRATIONS_DIR, model_path};
use crate::application::services::installer::{FeatureInstaller, InstallContext};
use crate::application::services::project::Project;
use crate::domain::{DependencySpec, Feature};
use crate::error::RailkitResult;

const DEPENDENCIES: &[DependencySpec] = &[DependencySpec::runtime("cloudinary")];

const STORAGE_CONFIG: &str = "config/storage.yml";
const STORAGE_MIGRATION: &str = "_create_active_storage_tables";

const ENV_PLACEHOLDER: &str = "# CLOUDINARY_URL=replace_with_your_cloudinary_api_key\n";
const CLOUDINARY_SERVICE: &str = "cloudinary:\n  service: Cloudinary\n  folder: <%= Rails.env %>\n";

const LOCAL_SERVICE: &str = "config.active_storage.service = :local";
const CLOUDINARY_SWITCH: &str = "config.active_storage.service = :cloudinary";

/// Active Storage backed by Cloudinary.
pub struct ImageUploadInstaller;

fn has_storage_migration(project: &Project) -> bool {
    project.any_entry(MIGRATIONS_DIR, |name| {
        name.contains(STORAGE_MIGRATION) && name.ends_with(".rb")
    })
}

impl FeatureInstaller for ImageUploadInstaller {
    fn feature(&self) -> Feature {
        Feature::ImageUpload
    }

    fn is_installed(&self, project: &Project) -> bool {
        project.exists(STORAGE_CONFIG)
            && has_storage_migration(project)
            && project.ledger().is_declared("cloudinary")
    }

    fn dependencies(&self) -> &'static [DependencySpec] {
        DEPENDENCIES
    }

    fn write_artifacts(&self, ctx: &mut InstallContext<'_>) -> RailkitResult<()> {
        let project = ctx.project;

        let effect = project.append_once(".env", ENV_PLACEHOLDER)?;
        ctx.track(effect, ".env Cloudinary key");

        if !has_storage_migration(project) {
            project.rails(["active_storage:install"])?;
            ctx.info("Installed Active Storage");
        }

        let effect = project.append_once(STORAGE_CONFIG, CLOUDINARY_SERVICE)?;
        ctx.track(effect, "Cloudinary storage service");

        for env in ["development", "production"] {
            let file = format!("config/environments/{env}.rb");
            let effect = project.replace(&file, LOCAL_SERVICE, CLOUDINARY_SWITCH)?;
            ctx.track(effect, &format!("{env} storage service"));
        }

        let model = ctx.target_model.to_string();
        let path = model_path(&model);
        if project.exists(&path) {
            let effect = project.inject_after(
                &path,
                &format!("class {model} < ApplicationRecord\n"),
                "  has_one_attached :photo\n",
            )?;
            ctx.track(effect, &format!("{model} photo attachment"));
        } else {
            ctx.warn(format!(
                "{model} model not found, skipping photo attachment."
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fixtures;

    #[test]
    fn guard_is_conjunctive() {
        let (project, fs, _) = fixtures::project(true);
        fs.put(STORAGE_CONFIG, "local:\n  service: Disk\n");
        fs.put("db/migrate/20260213010234_create_active_storage_tables.active_storage.rb", "");
        assert!(!ImageUploadInstaller.is_installed(&project), "gem not declared");

        project
            .ledger()
            .declare(&DependencySpec::runtime("cloudinary"))
            .unwrap();
        assert!(ImageUploadInstaller.is_installed(&project));
    }
}
