//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use railkit_core::domain::{Feature, Preset, RailsVersion};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "railkit",
    bin_name = "railkit",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Idempotent Rails starter setup",
    long_about = "Railkit turns a freshly generated Rails application into a \
                  configured starter app. Every feature is guarded, so running \
                  it again only finishes what is missing.",
    after_help = "EXAMPLES:\n\
        \x20 railkit setup ./blog --rails 8 --preset bootstrap\n\
        \x20 railkit setup --enable devise --disable admin --non-interactive\n\
        \x20 railkit install pagination ./blog\n\
        \x20 railkit status ./blog --output-format json",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full setup sequence on a Rails project.
    #[command(
        visible_alias = "s",
        about = "Set up a freshly generated Rails app",
        after_help = "EXAMPLES:\n\
            \x20 railkit setup\n\
            \x20 railkit setup ./blog --rails 7 --preset tailwind\n\
            \x20 railkit setup ./blog --dry-run --enable testing"
    )]
    Setup(SetupArgs),

    /// Install a single feature into an existing project.
    #[command(
        visible_alias = "i",
        about = "Install one feature",
        after_help = "EXAMPLES:\n\
            \x20 railkit install devise\n\
            \x20 railkit install friendly_urls ./blog --target-model Post"
    )]
    Install(InstallArgs),

    /// Show which features are requested and installed.
    #[command(visible_alias = "st", about = "Show feature status")]
    Status(StatusArgs),

    /// List the features railkit knows about.
    #[command(visible_alias = "ls", about = "List available features")]
    Features,

    /// Initialise a Railkit configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 railkit init           # default location\n\
            \x20 railkit init --local   # railkit.toml in CWD"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 railkit completions bash > ~/.local/share/bash-completion/completions/railkit\n\
            \x20 railkit completions zsh  > ~/.zfunc/_railkit\n\
            \x20 railkit completions fish > ~/.config/fish/completions/railkit.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Railkit configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 railkit config get project.preset\n\
            \x20 railkit config list\n\
            \x20 railkit config path"
    )]
    Config(ConfigCommands),
}

// ── setup ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SetupArgs {
    /// Root of the Rails application.
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Rails major version the app was generated with.
    #[arg(long = "rails", value_name = "VERSION", value_enum)]
    pub rails: Option<RailsArg>,

    /// Starter preset.
    #[arg(short = 'p', long = "preset", value_name = "PRESET", value_enum)]
    pub preset: Option<PresetArg>,

    /// Model targeted by slugs and image attachments.
    #[arg(long = "target-model", value_name = "MODEL")]
    pub target_model: Option<String>,

    /// Resolve selections and print the plan without writing anything.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Answer every remaining question with its default (no).
    #[arg(short = 'y', long = "non-interactive")]
    pub non_interactive: bool,

    /// Select a feature or gate (`css`, `auth`) without asking.
    #[arg(long = "enable", value_name = "KEY", value_parser = parse_selection_key)]
    pub enable: Vec<String>,

    /// Decline a feature or gate without asking.
    #[arg(long = "disable", value_name = "KEY", value_parser = parse_selection_key)]
    pub disable: Vec<String>,
}

// ── install ───────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InstallArgs {
    /// Feature key, e.g. `devise` or `image_uploading_cloudinary`.
    #[arg(value_name = "FEATURE", value_parser = parse_feature)]
    pub feature: Feature,

    /// Root of the Rails application.
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Model targeted by slugs and image attachments.
    #[arg(long = "target-model", value_name = "MODEL")]
    pub target_model: Option<String>,
}

// ── status ────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Root of the Rails application.
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,
}

// ── init ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `railkit.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `project.preset` or `overrides.devise`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the default configuration file.
    Path,
}

// ── value enums ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RailsArg {
    #[value(name = "7")]
    Seven,
    #[value(name = "8")]
    Eight,
}

impl From<RailsArg> for RailsVersion {
    fn from(arg: RailsArg) -> Self {
        match arg {
            RailsArg::Seven => RailsVersion::Seven,
            RailsArg::Eight => RailsVersion::Eight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum PresetArg {
    Custom,
    Bootstrap,
    Tailwind,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Custom => Preset::Custom,
            PresetArg::Bootstrap => Preset::Bootstrap,
            PresetArg::Tailwind => Preset::Tailwind,
        }
    }
}

/// Gate keys that may be overridden alongside feature keys.
pub const GATE_KEYS: [&str; 2] = ["css", "auth"];

fn parse_feature(value: &str) -> Result<Feature, String> {
    value.parse::<Feature>().map_err(|e| e.to_string())
}

/// Normalises a feature alias to its key; gate keys pass through.
fn parse_selection_key(value: &str) -> Result<String, String> {
    let lowered = value.trim().to_ascii_lowercase();
    if GATE_KEYS.contains(&lowered.as_str()) {
        return Ok(lowered);
    }
    parse_feature(value).map(|feature| feature.key().to_string())
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_setup_defaults() {
        let cli = Cli::parse_from(["railkit", "setup"]);
        let Commands::Setup(args) = cli.command else {
            panic!("expected Setup command");
        };
        assert_eq!(args.path, PathBuf::from("."));
        assert!(args.rails.is_none());
        assert!(!args.dry_run);
    }

    #[test]
    fn parse_setup_flags() {
        let cli = Cli::parse_from([
            "railkit",
            "setup",
            "./blog",
            "--rails",
            "7",
            "--preset",
            "tailwind",
            "--enable",
            "Image-Upload",
            "--disable",
            "css",
        ]);
        let Commands::Setup(args) = cli.command else {
            panic!("expected Setup command");
        };
        assert_eq!(args.rails, Some(RailsArg::Seven));
        assert_eq!(args.preset, Some(PresetArg::Tailwind));
        assert_eq!(args.enable, vec!["image_uploading_cloudinary"]);
        assert_eq!(args.disable, vec!["css"]);
    }

    #[test]
    fn unknown_selection_key_is_rejected() {
        let result = Cli::try_parse_from(["railkit", "setup", "--enable", "sidekiq"]);
        assert!(result.is_err());
    }

    #[test]
    fn install_parses_feature_alias() {
        let cli = Cli::parse_from(["railkit", "install", "activeadmin", "/srv/app"]);
        let Commands::Install(args) = cli.command else {
            panic!("expected Install command");
        };
        assert_eq!(args.feature, Feature::Admin);
        assert_eq!(args.path, PathBuf::from("/srv/app"));
    }

    #[test]
    fn rails_arg_converts() {
        assert_eq!(RailsVersion::from(RailsArg::Eight), RailsVersion::Eight);
        assert_eq!(Preset::from(PresetArg::Custom), Preset::Custom);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["railkit", "--quiet", "--verbose", "features"]);
        assert!(result.is_err());
    }
}
