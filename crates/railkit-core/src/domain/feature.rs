//! Optional features and the selection gates that precede them.
//!
//! # Adding a feature
//!
//! 1. Add the variant here, in installation order
//! 2. Fill in every `const fn` arm below
//! 3. Add an installer in `application::installers` and register it

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

/// An optional, independently installable piece of starter functionality.
///
/// Variant order is installation order: the orchestrator walks
/// [`Feature::ALL`] front to back, so a feature must come after anything it
/// relies on (admin after devise, navbar after bootstrap).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Bootstrap,
    Tailwind,
    Devise,
    Authentication,
    Admin,
    DevTools,
    FriendlyUrls,
    #[serde(rename = "image_uploading_cloudinary")]
    ImageUpload,
    Navbar,
    Pagination,
    RubyLlm,
    Security,
    Testing,
}

/// How the orchestrator tells, after selection, that a feature was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    /// Requested when any of these dependencies is declared in the manifest.
    Dependency(&'static [&'static str]),
    /// Requested when this project-relative file exists.
    Marker(&'static str),
}

impl Feature {
    pub const ALL: [Feature; 13] = [
        Self::Bootstrap,
        Self::Tailwind,
        Self::Devise,
        Self::Authentication,
        Self::Admin,
        Self::DevTools,
        Self::FriendlyUrls,
        Self::ImageUpload,
        Self::Navbar,
        Self::Pagination,
        Self::RubyLlm,
        Self::Security,
        Self::Testing,
    ];

    /// Stable key: CLI argument, override name and report field.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Bootstrap => "bootstrap",
            Self::Tailwind => "tailwind",
            Self::Devise => "devise",
            Self::Authentication => "authentication",
            Self::Admin => "admin",
            Self::DevTools => "dev_tools",
            Self::FriendlyUrls => "friendly_urls",
            Self::ImageUpload => "image_uploading_cloudinary",
            Self::Navbar => "navbar",
            Self::Pagination => "pagination",
            Self::RubyLlm => "ruby_llm",
            Self::Security => "security",
            Self::Testing => "testing",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Bootstrap => "Bootstrap",
            Self::Tailwind => "Tailwind",
            Self::Devise => "Devise",
            Self::Authentication => "Rails 8 native authentication",
            Self::Admin => "ActiveAdmin",
            Self::DevTools => "Dev tools",
            Self::FriendlyUrls => "Friendly URLs",
            Self::ImageUpload => "Image upload (Cloudinary)",
            Self::Navbar => "NavBar",
            Self::Pagination => "Pagination (Pagy)",
            Self::RubyLlm => "ruby_llm",
            Self::Security => "Security",
            Self::Testing => "Testing",
        }
    }

    /// Yes/no question asked when no override is present.
    pub const fn prompt(self) -> &'static str {
        match self {
            Self::Bootstrap => "Install Bootstrap? (y/n)",
            Self::Tailwind => "Install Tailwind? (y/n)",
            Self::Devise => "Install Devise? (y/n)",
            Self::Authentication => "Install Rails 8 native authentication? (y/n)",
            Self::Admin => "Install Active Admin (devise required)? (y/n)",
            Self::DevTools => "Install dev tools ('Better Errors', 'Annotate', 'Rubocop')? (y/n)",
            Self::FriendlyUrls => "Install Friendly URLs (FriendlyId)? (y/n)",
            Self::ImageUpload => "Install image uploading with Cloudinary? (y/n)",
            Self::Navbar => "Install NavBar? (y/n)",
            Self::Pagination => "Install Pagy pagination? (y/n)",
            Self::RubyLlm => "Install ruby_llm? (y/n)",
            Self::Security => "Install security? (y/n)",
            Self::Testing => "Install testing? (y/n)",
        }
    }

    /// Commit message recorded after the feature installs during setup.
    pub const fn checkpoint_message(self) -> &'static str {
        match self {
            Self::Bootstrap => "feat: install bootstrap.",
            Self::Tailwind => "feat: install tailwind.",
            Self::Devise => "feat: install devise.",
            Self::Authentication => "feat: install rails 8 native authentication.",
            Self::Admin => "feat: install active admin.",
            Self::DevTools => {
                "feat: install dev_tools template gems (annotate, better errors, pry, awesome print, rubocop)."
            }
            Self::FriendlyUrls => "feat: install friendly id.",
            Self::ImageUpload => "feat: install active storage and cloudinary.",
            Self::Navbar => "feat: add navbar.",
            Self::Pagination => "feat: install pagy pagination.",
            Self::RubyLlm => "feat: install ruby_llm.",
            Self::Security => "feat: install security.",
            Self::Testing => "feat: install testing.",
        }
    }

    pub const fn detection(self) -> Detection {
        match self {
            Self::Bootstrap => Detection::Dependency(&["bootstrap"]),
            Self::Tailwind => Detection::Dependency(&["tailwindcss-rails"]),
            Self::Devise => Detection::Dependency(&["devise"]),
            Self::Authentication => Detection::Marker(NATIVE_AUTH_MARKER),
            Self::Admin => Detection::Dependency(&["activeadmin"]),
            Self::DevTools => Detection::Dependency(&["better_errors", "annotate"]),
            Self::FriendlyUrls => Detection::Dependency(&["friendly_id"]),
            Self::ImageUpload => Detection::Dependency(&["cloudinary"]),
            Self::Navbar => Detection::Marker(NAVBAR_PARTIAL),
            Self::Pagination => Detection::Dependency(&["pagy"]),
            Self::RubyLlm => Detection::Dependency(&["ruby_llm"]),
            Self::Security => Detection::Dependency(&["secure_headers"]),
            Self::Testing => Detection::Dependency(&["rspec-rails"]),
        }
    }

    /// Name of the environment override (`dev_tools` -> `DEV_TOOLS`).
    pub fn env_var(self) -> String {
        override_var(self.key())
    }
}

/// Marker written at selection time for native authentication, which has no gem.
pub const NATIVE_AUTH_MARKER: &str = "tmp/railkit/native_auth";

/// The navbar partial doubles as its own selection marker.
pub const NAVBAR_PARTIAL: &str = "app/views/shared/_navbar.html.erb";

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Feature {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        match wanted.as_str() {
            "image_upload" | "cloudinary" => return Ok(Self::ImageUpload),
            "auth_native" | "native_auth" => return Ok(Self::Authentication),
            "admin_dashboard" | "activeadmin" => return Ok(Self::Admin),
            _ => {}
        }
        Self::ALL
            .into_iter()
            .find(|f| f.key() == wanted)
            .ok_or_else(|| DomainError::UnknownFeature(s.to_string()))
    }
}

/// A yes/no question that only opens a choice group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Css,
    Auth,
}

impl Gate {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::Auth => "auth",
        }
    }

    pub const fn prompt(self) -> &'static str {
        match self {
            Self::Css => "Install CSS framework? (y/n)",
            Self::Auth => "Install authentication? (y/n)",
        }
    }
}

/// Override variable name for any selection key.
pub fn override_var(key: &str) -> String {
    key.to_ascii_uppercase()
}
