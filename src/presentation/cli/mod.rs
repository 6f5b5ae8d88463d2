pub mod commands;
pub mod context;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::process::exit;

use crate::infrastructure::filesystem::config_store::ConfigSource;
use crate::presentation::ui::display::DisplayHelper;

use commands::{
    CheckArgs, CheckCommand, CheckinArgs, CheckinCommand, CheckoutArgs, CheckoutCommand,
    LocationsArgs, LocationsCommand, ReleaseArgs, ReleaseCommand, TagArgs, TagCommand,
    UpdateArgs, UpdateCommand,
};
use context::CommandContext;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    " ",
    env!("BUILD_DATE"),
    ")"
);

/// Output format options for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

impl OutputFormat {
    /// Serialize `value`, or `None` for text output which callers render themselves
    pub fn serialize<T: Serialize>(&self, value: &T) -> Result<Option<String>> {
        match self {
            OutputFormat::Text => Ok(None),
            OutputFormat::Json => Ok(Some(serde_json::to_string_pretty(value)?)),
            OutputFormat::Yaml => Ok(Some(serde_yaml::to_string(value)?)),
        }
    }
}

/// mkrelease - release a package from a Subversion sandbox
#[derive(Debug, Parser)]
#[command(name = "mkrelease")]
#[command(about = "Release a package: check the sandbox, tag, build and upload")]
#[command(version, long_version = LONG_VERSION)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print warnings and errors, and hide build output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file (defaults to $MKRELEASE_CONFIG or ~/.mkrelease.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default tracing filter for the selected verbosity
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Commit, tag, build and upload a release
    Release(ReleaseArgs),

    /// Show the state of a sandbox
    Check(CheckArgs),

    /// Create the release tag for a version
    Tag(TagArgs),

    /// Commit all local changes of a sandbox
    Checkin(CheckinArgs),

    /// Update a sandbox from the repository
    Update(UpdateArgs),

    /// Check out a repository URL
    Checkout(CheckoutArgs),

    /// List the configured upload locations
    Locations(LocationsArgs),
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
}

impl CliApp {
    pub fn new() -> Self {
        Self::from_cli(Cli::parse())
    }

    pub fn from_cli(cli: Cli) -> Self {
        Self { cli }
    }

    pub fn cli(&self) -> &Cli {
        &self.cli
    }

    pub async fn run(self) -> Result<()> {
        if self.cli.no_color {
            colored::control::set_override(false);
        }
        let display = DisplayHelper::new(!self.cli.no_color);

        match self.handle_command(display).await {
            Ok(_) => Ok(()),
            Err(e) => {
                display.error(&format!("{:#}", e));
                exit(1);
            }
        }
    }

    async fn handle_command(&self, display: DisplayHelper) -> Result<()> {
        let source = ConfigSource::locate(self.cli.config.as_deref());
        let context = CommandContext::load(&source, display, self.cli.verbose, self.cli.quiet)?;

        match &self.cli.command {
            Commands::Release(args) => ReleaseCommand::new(args.clone()).execute(&context).await,
            Commands::Check(args) => CheckCommand::new(args.clone()).execute(&context).await,
            Commands::Tag(args) => TagCommand::new(args.clone()).execute(&context).await,
            Commands::Checkin(args) => CheckinCommand::new(args.clone()).execute(&context).await,
            Commands::Update(args) => UpdateCommand::new(args.clone()).execute(&context).await,
            Commands::Checkout(args) => CheckoutCommand::new(args.clone()).execute(&context).await,
            Commands::Locations(args) => {
                LocationsCommand::new(args.clone()).execute(&context).await
            }
        }
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_release_flags() {
        let cli = Cli::try_parse_from([
            "mkrelease",
            "-q",
            "release",
            "svn://host/pkg/trunk",
            "-C",
            "-T",
            "-e",
            "-s",
            "-i",
            "me@jarn.com",
            "-d",
            "public",
            "-d",
            "jarn.com:eggs",
            "-o",
            "json",
        ])
        .unwrap();

        assert!(cli.quiet);
        assert_eq!(cli.log_level(), "warn");
        let Commands::Release(args) = cli.command else {
            panic!("Expected release");
        };
        assert_eq!(args.source.as_deref(), Some("svn://host/pkg/trunk"));
        assert!(args.no_commit && args.no_tag && !args.no_upload);
        assert!(args.develop && args.sign);
        assert_eq!(args.identity.as_deref(), Some("me@jarn.com"));
        assert_eq!(args.dist_location, vec!["public", "jarn.com:eggs"]);
        assert_eq!(args.output, OutputFormat::Json);
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["mkrelease", "-v", "-q", "locations"]).is_err());

        let cli = Cli::try_parse_from(["mkrelease", "check", "-v"]).unwrap();
        assert_eq!(cli.log_level(), "debug");
    }

    #[test]
    fn test_tag_requires_name() {
        assert!(Cli::try_parse_from(["mkrelease", "tag", "1.0"]).is_err());
        assert!(Cli::try_parse_from(["mkrelease", "tag", "1.0", "--name", "pkg"]).is_ok());
    }

    #[test]
    fn test_version_positionals() {
        let cli = Cli::try_parse_from(["mkrelease", "tag", "1.0", "--name", "pkg"]).unwrap();
        let Commands::Tag(args) = cli.command else {
            panic!("Expected tag");
        };
        assert_eq!(args.version, "1.0");
        assert_eq!(args.name, "pkg");

        let cli =
            Cli::try_parse_from(["mkrelease", "checkin", "1.0", "sandbox", "--name", "pkg"])
                .unwrap();
        let Commands::Checkin(args) = cli.command else {
            panic!("Expected checkin");
        };
        assert_eq!(args.version, "1.0");
        assert_eq!(args.sandbox.as_deref(), Some(std::path::Path::new("sandbox")));

        // --version still reports the program version
        let err = Cli::try_parse_from(["mkrelease", "tag", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_output_format_serialize() {
        #[derive(Serialize)]
        struct Sample {
            name: &'static str,
        }

        let sample = Sample { name: "pkg" };
        assert_eq!(OutputFormat::Text.serialize(&sample).unwrap(), None);
        assert_eq!(
            OutputFormat::Json.serialize(&sample).unwrap().as_deref(),
            Some("{\n  \"name\": \"pkg\"\n}")
        );
        assert_eq!(
            OutputFormat::Yaml.serialize(&sample).unwrap().as_deref(),
            Some("name: pkg\n")
        );
    }
}
