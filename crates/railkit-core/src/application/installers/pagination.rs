use crate::application::services::installer::{FeatureInstaller, InstallContext};
use crate::application::services::project::{APPLICATION_CONTROLLER, Project};
use crate::domain::{DependencySpec, Feature};
use crate::error::RailkitResult;

const DEPENDENCIES: &[DependencySpec] = &[DependencySpec::runtime("pagy")];

const INITIALIZER: &str = "config/initializers/pagy.rb";
const APPLICATION_HELPER: &str = "app/helpers/application_helper.rb";

pub struct PaginationInstaller;

impl FeatureInstaller for PaginationInstaller {
    fn feature(&self) -> Feature {
        Feature::Pagination
    }

    fn is_installed(&self, project: &Project) -> bool {
        project.ledger().is_declared("pagy") && project.exists(INITIALIZER)
    }

    fn dependencies(&self) -> &'static [DependencySpec] {
        DEPENDENCIES
    }

    fn write_artifacts(&self, ctx: &mut InstallContext<'_>) -> RailkitResult<()> {
        let project = ctx.project;

        if !project.exists(INITIALIZER) {
            ctx.generate_if_available("pagy:install", &[])?;
        }

        let effect = project.inject_after(
            APPLICATION_CONTROLLER,
            "class ApplicationController < ActionController::Base",
            "\n  include Pagy::Backend",
        )?;
        ctx.track(effect, "Pagy backend");

        let effect = project.inject_after(
            APPLICATION_HELPER,
            "module ApplicationHelper",
            "\n  include Pagy::Frontend",
        )?;
        ctx.track(effect, "Pagy frontend");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fixtures;

    #[test]
    fn declared_gem_without_initializer_resumes() {
        let (project, fs, _) = fixtures::project(true);
        project
            .ledger()
            .declare(&DependencySpec::runtime("pagy"))
            .unwrap();
        assert!(!PaginationInstaller.is_installed(&project));
        fs.put(INITIALIZER, "");
        assert!(PaginationInstaller.is_installed(&project));
    }
}
