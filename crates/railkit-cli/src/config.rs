//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `RAILKIT__PROJECT__PRESET=tailwind`
//! 3. Config file: `--config FILE`, or the user config plus `./railkit.toml`
//! 4. Built-in defaults (always present)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use railkit_core::domain::{DEFAULT_TARGET_MODEL, Overrides, Preset, RailsVersion};
use serde::{Deserialize, Serialize};

/// File name used by `railkit init --local` and picked up from the CWD.
pub const LOCAL_CONFIG: &str = "railkit.toml";

const ENV_PREFIX: &str = "RAILKIT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Defaults for `railkit setup`.
    pub project: ProjectConfig,
    pub features: FeaturesConfig,
    pub output: OutputConfig,
    /// Pre-answered selection questions, keyed by feature or gate key.
    #[serde(default)]
    pub overrides: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub rails_version: RailsVersion,
    pub preset: Preset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturesConfig {
    pub target_model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project: ProjectConfig {
                rails_version: RailsVersion::default(),
                preset: Preset::default(),
            },
            features: FeaturesConfig {
                target_model: DEFAULT_TARGET_MODEL.into(),
            },
            output: OutputConfig {
                no_color: false,
                format: "human".into(),
            },
            overrides: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration, starting from defaults.
    ///
    /// An explicit `config_file` must exist; the implicit locations are
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        Self::load_with(
            config_file.map(PathBuf::as_path),
            Environment::with_prefix(ENV_PREFIX).separator("__"),
        )
    }

    fn load_with(config_file: Option<&Path>, env: Environment) -> anyhow::Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        builder = match config_file {
            Some(path) => builder.add_source(File::from(path).format(FileFormat::Toml)),
            None => builder
                .add_source(
                    File::from(Self::config_path())
                        .format(FileFormat::Toml)
                        .required(false),
                )
                .add_source(
                    File::from(Path::new(LOCAL_CONFIG))
                        .format(FileFormat::Toml)
                        .required(false),
                ),
        };

        let config = builder.add_source(env).build()?.try_deserialize()?;
        Ok(config)
    }

    /// Configured overrides as the lowest-priority override layer.
    pub fn overrides(&self) -> Overrides {
        self.overrides
            .iter()
            .map(|(key, value)| (key.clone(), *value))
            .collect()
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `railkit.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "railkit", "railkit")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .source(Some(config::Map::new()))
    }

    fn write_config(body: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("railkit.toml");
        std::fs::write(&path, body).unwrap();
        (dir, path)
    }

    #[test]
    fn defaults_target_rails_eight_custom() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.project.rails_version, RailsVersion::Eight);
        assert_eq!(cfg.project.preset, Preset::Custom);
        assert_eq!(cfg.features.target_model, "User");
    }

    #[test]
    fn file_values_override_defaults() {
        let (_dir, path) = write_config(
            "[project]\nrails_version = \"7\"\npreset = \"tailwind\"\n\n[overrides]\ndevise = true\n",
        );
        let cfg = AppConfig::load_with(Some(&path), no_env()).unwrap();
        assert_eq!(cfg.project.rails_version, RailsVersion::Seven);
        assert_eq!(cfg.project.preset, Preset::Tailwind);
        assert_eq!(cfg.features.target_model, "User");
        assert_eq!(cfg.overrides().get("devise"), Some(true));
    }

    #[test]
    fn environment_beats_file() {
        let (_dir, path) = write_config("[project]\npreset = \"tailwind\"\n");
        let mut vars = config::Map::new();
        vars.insert("RAILKIT__PROJECT__PRESET".to_string(), "bootstrap".to_string());
        let env = Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .source(Some(vars));
        let cfg = AppConfig::load_with(Some(&path), env).unwrap();
        assert_eq!(cfg.project.preset, Preset::Bootstrap);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let missing = Path::new("/nonexistent/railkit/config.toml");
        assert!(AppConfig::load_with(Some(missing), no_env()).is_err());
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let rendered = toml::to_string_pretty(&AppConfig::default()).unwrap();
        let parsed: AppConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
