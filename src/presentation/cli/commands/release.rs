use anyhow::Result;
use clap::Args;

use crate::application::use_cases::release_package::{
    ReleaseOptions, ReleasePackageUseCase, ReleaseReport,
};
use crate::presentation::cli::context::CommandContext;
use crate::presentation::cli::OutputFormat;

/// Release command arguments
#[derive(Debug, Clone, Args)]
pub struct ReleaseArgs {
    /// Sandbox directory or repository URL (defaults to the current directory)
    pub source: Option<String>,

    /// Do not commit local changes
    #[arg(short = 'C', long)]
    pub no_commit: bool,

    /// Do not tag the release
    #[arg(short = 'T', long)]
    pub no_tag: bool,

    /// Do not build and upload the distribution
    #[arg(short = 'S', long)]
    pub no_upload: bool,

    /// Dry run; no commit, tag or upload
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Push commits and tags upstream
    #[arg(long)]
    pub push: bool,

    /// Allow development versions
    #[arg(short = 'e', long)]
    pub develop: bool,

    /// Keep the temporary checkout of a URL source
    #[arg(short = 'k', long)]
    pub keep_temp: bool,

    /// Sign the distribution with GnuPG
    #[arg(short = 's', long)]
    pub sign: bool,

    /// GnuPG key to sign with
    #[arg(short = 'i', long)]
    pub identity: Option<String>,

    /// Upload location, index server or alias; may be given more than once
    #[arg(short = 'd', long)]
    pub dist_location: Vec<String>,

    /// Package name, instead of asking the build system
    #[arg(long)]
    pub name: Option<String>,

    /// Package version, instead of asking the build system
    #[arg(long)]
    pub release_version: Option<String>,

    /// Output format (text, json, yaml)
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Handler for the release command
pub struct ReleaseCommand {
    args: ReleaseArgs,
}

impl ReleaseCommand {
    pub fn new(args: ReleaseArgs) -> Self {
        Self { args }
    }

    /// Combine configuration defaults with the command line
    pub fn options(&self, context: &CommandContext) -> Result<ReleaseOptions> {
        let args = &self.args;
        let mut options = ReleaseOptions::from_config(&context.config);

        if let Some(source) = &args.source {
            options = options.with_source(source.clone());
        }
        if args.no_commit {
            options = options.with_commit(false);
        }
        if args.no_tag {
            options = options.with_tag(false);
        }
        if args.no_upload {
            options = options.with_upload(false);
        }
        if args.push {
            options = options.with_push(true);
        }
        if args.develop {
            options = options.with_develop(true);
        }
        if args.sign {
            options = options.with_sign(true);
        }
        if context.quiet {
            options = options.with_quiet(true);
        }
        if let Some(identity) = &args.identity {
            options = options.with_identity(identity.clone());
        }
        if let Some(name) = &args.name {
            options = options.with_name(name.clone());
        }
        if let Some(version) = &args.release_version {
            options = options.with_version(version.clone());
        }
        options = options
            .with_keep_temp(args.keep_temp)
            .with_dry_run(args.dry_run);

        // Locations only matter when something gets uploaded
        if options.upload {
            let locations = context.config.resolve_locations(&args.dist_location)?;
            options = options.with_locations(locations);
        }

        Ok(options)
    }

    pub async fn execute(&self, context: &CommandContext) -> Result<()> {
        let options = self.options(context)?;
        let use_case = ReleasePackageUseCase::new(
            options,
            context.scm.clone(),
            context.process.clone(),
        );

        let report = use_case.execute().await?;

        match self.args.output.serialize(&report)? {
            Some(rendered) => println!("{}", rendered.trim_end()),
            None => self.print_report(context, &report),
        }
        Ok(())
    }

    fn print_report(&self, context: &CommandContext, report: &ReleaseReport) {
        let display = &context.display;

        if self.args.dry_run {
            display.info("Dry run, nothing was committed, tagged or uploaded");
        }
        display.success(&format!("Released {} {}", report.name, report.version));

        if let Some(tag_id) = &report.tag_id {
            display.key_value("Tag", &display.format_url(tag_id));
        }
        if report.committed {
            display.key_value("Commit", "local changes committed");
        }
        for artifact in &report.artifacts {
            display.key_value("File", &display.format_path(&artifact.display().to_string()));
        }
        for location in &report.uploaded_to {
            display.key_value("Upload", location);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::release_config::ReleaseConfig;
    use crate::domain::value_objects::dist_location::DistLocation;
    use crate::infrastructure::process::CommandExecutor;
    use crate::presentation::cli::{Cli, Commands};
    use crate::presentation::ui::display::DisplayHelper;
    use clap::Parser;
    use std::sync::Arc;

    fn context(config: ReleaseConfig) -> CommandContext {
        CommandContext::with_process(
            config,
            Arc::new(CommandExecutor::new()),
            DisplayHelper::new(false),
            false,
            false,
        )
        .unwrap()
    }

    fn release_args(argv: &[&str]) -> ReleaseArgs {
        let mut full = vec!["mkrelease", "release"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Commands::Release(args) => args,
            _ => panic!("Expected release"),
        }
    }

    #[test]
    fn test_options_follow_config_and_flags() {
        let mut config = ReleaseConfig::default();
        config.defaults.dist_location = Some("public".to_string());
        config
            .aliases
            .insert("public".to_string(), vec!["jarn.com:eggs".to_string()]);

        let command = ReleaseCommand::new(release_args(&["-T", "--push", "-i", "me"]));
        let options = command.options(&context(config)).unwrap();

        assert!(options.commit);
        assert!(!options.tag);
        assert!(options.push);
        assert_eq!(options.identity.as_deref(), Some("me"));
        assert_eq!(
            options.locations,
            vec![DistLocation::parse("jarn.com:eggs").unwrap()]
        );
    }

    #[test]
    fn test_dry_run_skips_locations() {
        let command = ReleaseCommand::new(release_args(&["-n", "-d", "nowhere"]));
        let options = command.options(&context(ReleaseConfig::default())).unwrap();

        assert!(!options.upload);
        assert!(options.locations.is_empty());
    }

    #[test]
    fn test_unknown_location() {
        let command = ReleaseCommand::new(release_args(&["-d", "nowhere"]));
        let error = command
            .options(&context(ReleaseConfig::default()))
            .unwrap_err();

        assert_eq!(error.to_string(), "Unknown location: nowhere");
    }
}
