use crate::application::services::installer::{FeatureInstaller, InstallContext};
use crate::application::services::project::{LAYOUT, Project};
use crate::domain::{Feature, NAVBAR_PARTIAL};
use crate::error::RailkitResult;

const RENDER_LINE: &str = "<%= render \"shared/navbar\" %>\n";

/// Bootstrap navbar partial.
pub const NAVBAR_TEMPLATE: &str = r##"<div class="navbar navbar-expand-sm navbar-light navbar-lewagon">
  <div class="container-fluid">
    <%= link_to root_path, class: "navbar-brand" do %>
      <%= image_tag "https://raw.githubusercontent.com/lewagon/fullstack-images/master/uikit/logo.png" %>
    <% end %>

    <button class="navbar-toggler" type="button" data-bs-toggle="collapse" data-bs-target="#navbarSupportedContent" aria-controls="navbarSupportedContent" aria-expanded="false" aria-label="Toggle navigation">
      <span class="navbar-toggler-icon"></span>
    </button>

    <div class="collapse navbar-collapse" id="navbarSupportedContent">
      <ul class="navbar-nav me-auto">
        <li class="nav-item active">
          <%= link_to "Home", root_path, class: "nav-link" %>
        </li>
      </ul>
    </div>
  </div>
</div>
"##;

pub struct NavbarInstaller;

impl FeatureInstaller for NavbarInstaller {
    fn feature(&self) -> Feature {
        Feature::Navbar
    }

    fn is_installed(&self, project: &Project) -> bool {
        project.exists(NAVBAR_PARTIAL) && project.contains(LAYOUT, RENDER_LINE.trim())
    }

    fn write_artifacts(&self, ctx: &mut InstallContext<'_>) -> RailkitResult<()> {
        let effect = ctx.project.create_file(NAVBAR_PARTIAL, NAVBAR_TEMPLATE)?;
        ctx.track(effect, NAVBAR_PARTIAL);

        let effect = ctx.project.inject_after(LAYOUT, "<body>\n", RENDER_LINE)?;
        ctx.track(effect, "layout navbar");
        Ok(())
    }
}
