use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::presentation::cli::context::CommandContext;

/// Checkin command arguments
#[derive(Debug, Clone, Args)]
pub struct CheckinArgs {
    /// Version used in the commit message
    #[arg(id = "release_version", value_name = "VERSION")]
    pub version: String,

    /// Sandbox directory (defaults to the current directory)
    pub sandbox: Option<PathBuf>,

    /// Package name used in the commit message
    #[arg(long)]
    pub name: String,

    /// Push the commit upstream
    #[arg(long)]
    pub push: bool,
}

/// Handler for the checkin command
pub struct CheckinCommand {
    args: CheckinArgs,
}

impl CheckinCommand {
    pub fn new(args: CheckinArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, context: &CommandContext) -> Result<()> {
        let args = &self.args;
        let dir = CommandContext::sandbox_path(args.sandbox.as_deref());

        context
            .scm
            .checkin_sandbox(&dir, &args.name, &args.version, args.push)
            .await?;

        context
            .display
            .success(&format!("Committed {} {}", args.name, args.version));
        Ok(())
    }
}
