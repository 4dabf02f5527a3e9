//! Run configuration: Rails version, preset, overrides and execution mode.
//!
//! Everything the orchestrator and installers used to read from ambient
//! process state is carried here explicitly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::choice::CssFramework;
use crate::domain::error::DomainError;
use crate::domain::feature::override_var;

/// Rails major version the target project was generated with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RailsVersion {
    #[serde(rename = "7")]
    Seven,
    #[default]
    #[serde(rename = "8")]
    Eight,
}

impl RailsVersion {
    /// Native authentication generator only ships with Rails 8.
    pub const fn has_native_authentication(self) -> bool {
        matches!(self, Self::Eight)
    }
}

impl fmt::Display for RailsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Seven => "7",
            Self::Eight => "8",
        })
    }
}

impl FromStr for RailsVersion {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "7" | "rails-7" => Ok(Self::Seven),
            "8" | "rails-8" => Ok(Self::Eight),
            other => Err(DomainError::UnsupportedRailsVersion(other.to_string())),
        }
    }
}

/// Starter flavour. `Custom` asks for the CSS framework, the others fix it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    Custom,
    Bootstrap,
    Tailwind,
}

impl Preset {
    pub const fn fixed_css(self) -> Option<CssFramework> {
        match self {
            Self::Custom => None,
            Self::Bootstrap => Some(CssFramework::Bootstrap),
            Self::Tailwind => Some(CssFramework::Tailwind),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Custom => "Custom",
            Self::Bootstrap => "Bootstrap",
            Self::Tailwind => "Tailwind",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name().to_ascii_lowercase())
    }
}

impl FromStr for Preset {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "custom" => Ok(Self::Custom),
            "bootstrap" => Ok(Self::Bootstrap),
            "tailwind" => Ok(Self::Tailwind),
            other => Err(DomainError::UnknownPreset(other.to_string())),
        }
    }
}

/// Whether an installer runs on its own or as one step of a setup run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Invoked directly against an existing project; installs its own
    /// dependencies and migrates before returning.
    Standalone,
    /// Invoked by the orchestrator; dependency installation and migration
    /// are done once by the caller.
    Embedded,
}

/// Explicit answers that bypass prompting, keyed by feature or gate key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overrides(BTreeMap<String, bool>);

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the exact literals `"true"` and `"false"` count.
    pub fn parse_literal(value: &str) -> Option<bool> {
        match value {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    /// Collect overrides for `keys` from environment-style pairs
    /// (`DEVISE=true`). Unrecognised values are ignored.
    pub fn from_env<I, K, V>(vars: I, keys: &[&str]) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let wanted: BTreeMap<String, &str> = keys.iter().map(|k| (override_var(k), *k)).collect();
        let mut overrides = Self::new();
        for (name, value) in vars {
            let Some(key) = wanted.get(name.as_ref()) else {
                continue;
            };
            if let Some(flag) = Self::parse_literal(value.as_ref()) {
                overrides.set(*key, flag);
            }
        }
        overrides
    }

    pub fn set(&mut self, key: impl Into<String>, value: bool) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<bool> {
        self.0.get(key).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fill gaps in `self` from a lower-priority source.
    pub fn layered_over(mut self, lower: &Overrides) -> Self {
        for (key, value) in &lower.0 {
            self.0.entry(key.clone()).or_insert(*value);
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, bool)> for Overrides {
    fn from_iter<T: IntoIterator<Item = (String, bool)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Model that optional per-model features (slugs, attachments) target.
pub const DEFAULT_TARGET_MODEL: &str = "User";

/// Options for one orchestrated setup run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupOptions {
    pub rails_version: RailsVersion,
    pub preset: Preset,
    pub overrides: Overrides,
    pub target_model: String,
    /// Resolve selections and report the plan without touching the project.
    pub dry_run: bool,
}

impl Default for SetupOptions {
    fn default() -> Self {
        Self {
            rails_version: RailsVersion::default(),
            preset: Preset::default(),
            overrides: Overrides::default(),
            target_model: DEFAULT_TARGET_MODEL.to_string(),
            dry_run: false,
        }
    }
}
