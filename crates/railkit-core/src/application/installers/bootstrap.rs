use crate::application::installers::{STYLESHEETS_DIR, has_bootstrap_stylesheets};
use crate::application::services::installer::{FeatureInstaller, InstallContext};
use crate::application::services::project::{LAYOUT, Project};
use crate::domain::{DependencySpec, Feature};
use crate::error::RailkitResult;

const DEPENDENCIES: &[DependencySpec] = &[
    DependencySpec::runtime("sprockets-rails"),
    DependencySpec::runtime("bootstrap").version("~> 5.3"),
    DependencySpec::runtime("autoprefixer-rails"),
    DependencySpec::runtime("font-awesome-sass").version("~> 6.1"),
    DependencySpec::runtime("simple_form").github("heartcombo/simple_form"),
    DependencySpec::runtime("sassc-rails"),
];

/// Sprockets replaces the default asset pipeline.
const RETIRED: &[&str] = &["propshaft"];

const STYLESHEETS_ARCHIVE: &str = "https://github.com/lewagon/rails-stylesheets/archive/rails-8.zip";
const ARCHIVE_DIR: &str = "app/assets/rails-stylesheets-rails-8";

const SPROCKETS_MANIFEST: &str = "app/assets/config/manifest.js";
const SPROCKETS_MANIFEST_BODY: &str = "//= link_tree ../images\n//= link_directory ../stylesheets .css\n";
const SPROCKETS_LINKS: &str = "//= link popper.js\n//= link bootstrap.min.js\n";

const PRECOMPILE: &str =
    "Rails.application.config.assets.precompile += %w(bootstrap.min.js popper.js)\n";
const JS_IMPORTS: &str = "import \"@popperjs/core\"\nimport \"bootstrap\"\n";

pub struct BootstrapInstaller;

impl FeatureInstaller for BootstrapInstaller {
    fn feature(&self) -> Feature {
        Feature::Bootstrap
    }

    fn is_installed(&self, project: &Project) -> bool {
        has_bootstrap_stylesheets(project)
    }

    fn dependencies(&self) -> &'static [DependencySpec] {
        DEPENDENCIES
    }

    fn retired_dependencies(&self) -> &'static [&'static str] {
        RETIRED
    }

    fn write_artifacts(&self, ctx: &mut InstallContext<'_>) -> RailkitResult<()> {
        let project = ctx.project;

        project.remove_dir(STYLESHEETS_DIR)?;
        project.run(&project.command("curl").args(["-L", STYLESHEETS_ARCHIVE, "-o", "stylesheets.zip"]))?;
        project.run(
            &project
                .command("unzip")
                .args(["-o", "stylesheets.zip", "-d", "app/assets"]),
        )?;
        project.remove("stylesheets.zip")?;
        project.remove(&format!("{ARCHIVE_DIR}/README.md"))?;
        project.run(&project.command("mv").args([ARCHIVE_DIR, STYLESHEETS_DIR]))?;
        ctx.info("Installed Bootstrap stylesheets");

        let effect = project.create_file(SPROCKETS_MANIFEST, SPROCKETS_MANIFEST_BODY)?;
        ctx.track(effect, SPROCKETS_MANIFEST);

        let effect = project.replace(
            LAYOUT,
            "stylesheet_link_tag :app",
            "stylesheet_link_tag \"application\"",
        )?;
        ctx.track(effect, "layout stylesheet tag");

        if !project.exists("config/initializers/simple_form_bootstrap.rb") {
            ctx.generate_if_available("simple_form:install", &["--bootstrap"])?;
        }

        let effect = project.append_once("config/initializers/assets.rb", PRECOMPILE)?;
        ctx.track(effect, "asset precompile list");
        let effect = project.append_once("app/javascript/application.js", JS_IMPORTS)?;
        ctx.track(effect, "JavaScript imports");
        let effect = project.append_once(SPROCKETS_MANIFEST, SPROCKETS_LINKS)?;
        ctx.track(effect, "Sprockets links");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fixtures;

    #[test]
    fn guard_looks_for_bootstrap_stylesheets() {
        let (project, fs, _) = fixtures::project(true);
        assert!(!BootstrapInstaller.is_installed(&project));
        fs.put("app/assets/stylesheets/application.scss", "");
        assert!(!BootstrapInstaller.is_installed(&project));
        fs.put("app/assets/stylesheets/_bootstrap_variables.scss", "");
        assert!(BootstrapInstaller.is_installed(&project));
    }

    #[test]
    fn declares_sprockets_stack_and_retires_propshaft() {
        let names: Vec<_> = BootstrapInstaller.dependencies().iter().map(|d| d.name).collect();
        assert!(names.contains(&"bootstrap"));
        assert!(names.contains(&"sprockets-rails"));
        assert_eq!(BootstrapInstaller.retired_dependencies(), &["propshaft"]);
    }
}
