//! Concrete feature installers.
//!
//! One module per feature. Each holds its guard, its dependency list and the
//! payload it writes.

mod admin;
mod authentication;
mod bootstrap;
mod dev_tools;
mod devise;
mod friendly_urls;
mod image_upload;
mod navbar;
mod pagination;
mod ruby_llm;
mod security;
mod testing;
mod tailwind;

pub use admin::AdminInstaller;
pub use authentication::AuthenticationInstaller;
pub use bootstrap::BootstrapInstaller;
pub use dev_tools::DevToolsInstaller;
pub use devise::DeviseInstaller;
pub use friendly_urls::FriendlyUrlsInstaller;
pub use image_upload::ImageUploadInstaller;
pub use navbar::{NAVBAR_TEMPLATE, NavbarInstaller};
pub use pagination::PaginationInstaller;
pub use ruby_llm::RubyLlmInstaller;
pub use security::SecurityInstaller;
pub use tailwind::TailwindInstaller;
pub use testing::TestingInstaller;

use crate::application::services::installer::FeatureInstaller;
use crate::application::services::project::Project;
use crate::domain::{CssFramework, Feature};

pub(crate) const STYLESHEETS_DIR: &str = "app/assets/stylesheets";
pub(crate) const TAILWIND_CONFIG: &str = "config/tailwind.config.js";
pub(crate) const DEVISE_INITIALIZER: &str = "config/initializers/devise.rb";
pub(crate) const USER_MODEL: &str = "app/models/user.rb";
pub(crate) const MIGRATIONS_DIR: &str = "db/migrate";

pub fn installer_for(feature: Feature) -> Box<dyn FeatureInstaller> {
    match feature {
        Feature::Bootstrap => Box::new(BootstrapInstaller),
        Feature::Tailwind => Box::new(TailwindInstaller),
        Feature::Devise => Box::new(DeviseInstaller),
        Feature::Authentication => Box::new(AuthenticationInstaller),
        Feature::Admin => Box::new(AdminInstaller),
        Feature::DevTools => Box::new(DevToolsInstaller),
        Feature::FriendlyUrls => Box::new(FriendlyUrlsInstaller),
        Feature::ImageUpload => Box::new(ImageUploadInstaller),
        Feature::Navbar => Box::new(NavbarInstaller),
        Feature::Pagination => Box::new(PaginationInstaller),
        Feature::RubyLlm => Box::new(RubyLlmInstaller),
        Feature::Security => Box::new(SecurityInstaller),
        Feature::Testing => Box::new(TestingInstaller),
    }
}

/// Which styling the project uses right now, judged from files on disk.
///
/// Installers call this at write time instead of trusting the selection,
/// so the same installer behaves the same standalone and embedded. If files
/// change between selection and installation the two can disagree.
pub fn detect_style(project: &Project) -> CssFramework {
    if has_bootstrap_stylesheets(project) {
        CssFramework::Bootstrap
    } else if project.exists(TAILWIND_CONFIG) {
        CssFramework::Tailwind
    } else {
        CssFramework::Vanilla
    }
}

pub(crate) fn has_bootstrap_stylesheets(project: &Project) -> bool {
    project.any_entry(STYLESHEETS_DIR, |name| name.contains("bootstrap"))
}

/// `AdminUser` -> `admin_user`.
pub(crate) fn underscore(model: &str) -> String {
    let mut out = String::with_capacity(model.len() + 4);
    for (idx, ch) in model.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if idx > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

pub(crate) fn model_path(model: &str) -> String {
    format!("app/models/{}.rb", underscore(model))
}

/// Naive table name: `User` -> `users`, `Category` -> `categories`, `Day` -> `days`.
pub(crate) fn table_name(model: &str) -> String {
    let base = underscore(model);
    let consonant_y = base
        .strip_suffix('y')
        .and_then(|stem| stem.chars().last())
        .is_some_and(|c| !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'));
    if consonant_y {
        format!("{}ies", &base[..base.len() - 1])
    } else if base.ends_with('s') {
        format!("{base}es")
    } else {
        format!("{base}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_every_feature() {
        for feature in Feature::ALL {
            assert_eq!(installer_for(feature).feature(), feature);
        }
    }

    #[test]
    fn model_names_map_to_files_and_tables() {
        assert_eq!(model_path("User"), "app/models/user.rb");
        assert_eq!(model_path("AdminUser"), "app/models/admin_user.rb");
        assert_eq!(table_name("User"), "users");
        assert_eq!(table_name("Category"), "categories");
        assert_eq!(table_name("Address"), "addresses");
        assert_eq!(table_name("Day"), "days");
        assert_eq!(table_name("ApiKey"), "api_keys");
        assert_eq!(table_name("Journey"), "journeys");
    }
}
