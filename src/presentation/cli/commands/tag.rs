use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::domain::value_objects::release_version::ReleaseVersion;
use crate::presentation::cli::context::CommandContext;

/// Tag command arguments
#[derive(Debug, Clone, Args)]
pub struct TagArgs {
    /// Version to tag
    #[arg(id = "release_version", value_name = "VERSION")]
    pub version: String,

    /// Sandbox directory (defaults to the current directory)
    pub sandbox: Option<PathBuf>,

    /// Package name used in the tag message
    #[arg(long)]
    pub name: String,

    /// Push the tag upstream
    #[arg(long)]
    pub push: bool,

    /// Allow development versions
    #[arg(short = 'e', long)]
    pub develop: bool,
}

/// Handler for the tag command
pub struct TagCommand {
    args: TagArgs,
}

impl TagCommand {
    pub fn new(args: TagArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, context: &CommandContext) -> Result<()> {
        let args = &self.args;
        let dir = CommandContext::sandbox_path(args.sandbox.as_deref());
        let version = ReleaseVersion::new(&args.version, args.develop)?;

        context.scm.check_valid_sandbox(&dir).await?;
        let tag_id = context.scm.get_tag_id(&dir, version.as_str()).await?;
        context
            .scm
            .create_tag(&dir, &tag_id, &args.name, version.as_str(), args.push)
            .await?;

        context.display.success(&format!(
            "Tagged {} {} as {}",
            args.name,
            version,
            context.display.format_url(&tag_id)
        ));
        Ok(())
    }
}
