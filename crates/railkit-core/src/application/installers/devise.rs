use crate::application::installers::{DEVISE_INITIALIZER, USER_MODEL};
use crate::application::services::installer::{FeatureInstaller, InstallContext};
use crate::application::services::project::{APPLICATION_CONTROLLER, Project};
use crate::domain::{DependencySpec, ExecutionMode, Feature};
use crate::error::RailkitResult;

const DEPENDENCIES: &[DependencySpec] = &[DependencySpec::runtime("devise")];

const REGISTRATION_EDIT: &str = "app/views/devise/registrations/edit.html.erb";

const CANCEL_LINK: &str = r#"<div>Unhappy? <%= button_to "Cancel my account", registration_path(resource_name), data: { confirm: "Are you sure?", turbo_confirm: "Are you sure?" }, method: :delete %></div>"#;

const CANCEL_BUTTON: &str = r#"<div class="d-flex align-items-center">
  <div>Unhappy?</div>
  <%= button_to "Cancel my account", registration_path(resource_name), data: { confirm: "Are you sure?" }, method: :delete, class: "btn btn-link" %>
</div>"#;

pub struct DeviseInstaller;

impl FeatureInstaller for DeviseInstaller {
    fn feature(&self) -> Feature {
        Feature::Devise
    }

    fn is_installed(&self, project: &Project) -> bool {
        project.ledger().is_declared("devise")
            && project.exists(DEVISE_INITIALIZER)
            && project.exists(USER_MODEL)
    }

    fn dependencies(&self) -> &'static [DependencySpec] {
        DEPENDENCIES
    }

    fn write_artifacts(&self, ctx: &mut InstallContext<'_>) -> RailkitResult<()> {
        let project = ctx.project;

        if !project.exists(DEVISE_INITIALIZER) {
            ctx.generate_if_available("devise:install", &[])?;
        }
        if !project.exists(USER_MODEL) {
            ctx.generate_if_available("devise", &["User"])?;
        }

        let effect = project.inject_after(
            APPLICATION_CONTROLLER,
            "class ApplicationController < ActionController::Base",
            "\n  before_action :authenticate_user!",
        )?;
        ctx.track(effect, "application controller authentication");

        // Views need the users table; embedded runs migrate once at the end.
        if ctx.mode == ExecutionMode::Standalone {
            project.rails(["db:migrate"])?;
        }

        if !project.exists("app/views/devise") {
            ctx.generate_if_available("devise:views", &[])?;
        }
        let effect = project.replace(REGISTRATION_EDIT, CANCEL_LINK, CANCEL_BUTTON)?;
        if effect.changed() {
            ctx.info("Restyled account cancel button");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fixtures;

    #[test]
    fn guard_needs_gem_initializer_and_model() {
        let (project, fs, _) = fixtures::project(true);
        fs.put(DEVISE_INITIALIZER, "");
        fs.put(USER_MODEL, "class User < ApplicationRecord\nend\n");
        assert!(!DeviseInstaller.is_installed(&project), "gem missing");

        project.ledger().declare(&DependencySpec::runtime("devise")).unwrap();
        assert!(DeviseInstaller.is_installed(&project));
    }

    #[test]
    fn embedded_mode_does_not_migrate() {
        let (project, fs, shell) = fixtures::project(true);
        fs.put(
            APPLICATION_CONTROLLER,
            "class ApplicationController < ActionController::Base\nend\n",
        );
        let mut ctx = InstallContext::new(&project, ExecutionMode::Embedded, "User");
        DeviseInstaller.write_artifacts(&mut ctx).unwrap();

        assert!(!shell.ran().iter().any(|c| c.contains("db:migrate")));
        assert!(shell.ran().iter().any(|c| c.ends_with("generate devise User")));
        assert_eq!(
            fs.get(APPLICATION_CONTROLLER).unwrap(),
            "class ApplicationController < ActionController::Base\n  before_action :authenticate_user!\nend\n"
        );
    }
}
