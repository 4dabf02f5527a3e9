use crate::application::installers::detect_style;
use crate::application::services::installer::{FeatureInstaller, InstallContext};
use crate::application::services::project::Project;
use crate::domain::{CssFramework, Feature};
use crate::error::RailkitResult;

/// Any of these means some authentication is already in place.
const EXISTING_AUTH: &[&str] = &[
    "app/controllers/concerns/authentication.rb",
    "app/models/session.rb",
    "app/models/current.rb",
];

const REGISTRATIONS_CONTROLLER: &str = "app/controllers/registrations_controller.rb";
const REGISTRATIONS_CONTROLLER_BODY: &str = r#"class RegistrationsController < ApplicationController
  allow_unauthenticated_access

  def new
    @user = User.new
  end

  def create
    @user = User.new(user_params)
    if @user.save
      start_new_session_for(@user)
      redirect_to root_path, notice: "Welcome!"
    else
      render :new, status: :unprocessable_content
    end
  end

  private

  def user_params
    params.require(:user).permit(:email_address, :password, :password_confirmation)
  end
end
"#;

const SIGN_UP_VIEW: &str = "app/views/registrations/new.html.erb";
const PAGES_CONTROLLER: &str = "app/controllers/pages_controller.rb";

fn sign_up_view(style: CssFramework) -> String {
    let button = match style {
        CssFramework::Bootstrap => r#"<%= f.button :submit, "Sign up", class: "btn btn-primary my-3" %>"#,
        CssFramework::Tailwind => {
            r#"<%= f.button :submit, "Sign up", class: "bg-blue-500 hover:bg-blue-700 text-white font-bold py-2 px-4 rounded my-3" %>"#
        }
        CssFramework::Vanilla => r#"<%= f.button :submit, "Sign up" %>"#,
    };
    format!(
        r#"<%= render "shared/flashes" %>
<h1>Sign up</h1>
<%= simple_form_for @user, url: registration_path do |f| %>
  <%= f.input :email_address %>
  <%= f.input :password %>
  <%= f.input :password_confirmation %>
  {button}
<% end %>
"#
    )
}

/// Rails 8 built-in authentication plus a sign-up flow.
pub struct AuthenticationInstaller;

impl FeatureInstaller for AuthenticationInstaller {
    fn feature(&self) -> Feature {
        Feature::Authentication
    }

    /// Satisfied by either flavour: native files or a Devise declaration.
    fn is_installed(&self, project: &Project) -> bool {
        project.ledger().is_declared("devise") || EXISTING_AUTH.iter().any(|f| project.exists(f))
    }

    fn write_artifacts(&self, ctx: &mut InstallContext<'_>) -> RailkitResult<()> {
        let project = ctx.project;

        ctx.generate_if_available("authentication", &[])?;

        let effect = project.route("resource :registration, only: [:new, :create]")?;
        ctx.track(effect, "registration route");

        let effect = project.create_file(REGISTRATIONS_CONTROLLER, REGISTRATIONS_CONTROLLER_BODY)?;
        ctx.track(effect, REGISTRATIONS_CONTROLLER);

        let style = detect_style(project);
        let effect = project.create_file(SIGN_UP_VIEW, &sign_up_view(style))?;
        ctx.track(effect, &format!("{SIGN_UP_VIEW} ({style})"));

        if project.exists(PAGES_CONTROLLER) {
            let effect = project.inject_after(
                PAGES_CONTROLLER,
                "class PagesController < ApplicationController",
                "\n  allow_unauthenticated_access only: :home",
            )?;
            ctx.track(effect, "public home page");
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
    fn any_existing_auth_satisfies_guard() {
        let (project, fs, _) = fixtures::project(true);
        assert!(!AuthenticationInstaller.is_installed(&project));
        fs.put("app/models/current.rb", "");
        assert!(AuthenticationInstaller.is_installed(&project));
    }

    #[test]
    fn sign_up_view_follows_styling_on_disk() {
        let (project, fs, _) = fixtures::project(true);
        fs.put("config/tailwind.config.js", "");
        fs.put("config/routes.rb", "Rails.application.routes.draw do\nend\n");
        let mut ctx = InstallContext::new(&project, ExecutionMode::Embedded, "User");
        AuthenticationInstaller.write_artifacts(&mut ctx).unwrap();

        let view = fs.get(SIGN_UP_VIEW).unwrap();
        assert!(view.contains("bg-blue-500"));
        assert!(
            fs.get("config/routes.rb")
                .unwrap()
                .contains("  resource :registration, only: [:new, :create]\n")
        );
    }

    #[test]
    fn vanilla_button_has_no_classes() {
        assert!(sign_up_view(CssFramework::Vanilla).contains(r#"f.button :submit, "Sign up" %>"#));
    }
}
