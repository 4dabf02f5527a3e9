use crate::application::installers::{DEVISE_INITIALIZER, USER_MODEL};
use crate::application::services::installer::{FeatureInstaller, InstallContext};
use crate::application::services::project::{Project, ROUTES};
use crate::domain::{DependencySpec, Feature};
use crate::error::RailkitResult;

const DEPENDENCIES: &[DependencySpec] = &[DependencySpec::runtime("activeadmin")];

const INITIALIZER: &str = "config/initializers/active_admin.rb";
const ADMIN_USER_MODEL: &str = "app/models/admin_user.rb";

/// ActiveAdmin on top of an existing Devise user model.
pub struct AdminInstaller;

impl FeatureInstaller for AdminInstaller {
    fn feature(&self) -> Feature {
        Feature::Admin
    }

    fn is_installed(&self, project: &Project) -> bool {
        project.exists(INITIALIZER)
    }

    fn missing_prerequisite(&self, project: &Project) -> Option<Feature> {
        if project.exists(DEVISE_INITIALIZER) || project.exists(USER_MODEL) {
            None
        } else {
            Some(Feature::Devise)
        }
    }

    fn dependencies(&self) -> &'static [DependencySpec] {
        DEPENDENCIES
    }

    fn write_artifacts(&self, ctx: &mut InstallContext<'_>) -> RailkitResult<()> {
        let project = ctx.project;

        ctx.generate_if_available("active_admin:install", &[])?;

        if !project.exists(ADMIN_USER_MODEL) {
            ctx.generate_if_available("devise", &["AdminUser"])?;
            let effect = project.replace(
                ROUTES,
                "devise_for :admin_users\n",
                "devise_for :admin_users, ActiveAdmin::Devise.config\n",
            )?;
            ctx.track(effect, "admin routes");
        }

        ctx.info("Dashboard available at /admin");
        Ok(())
    }
}
