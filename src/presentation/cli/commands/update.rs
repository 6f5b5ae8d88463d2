use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::presentation::cli::context::CommandContext;

/// Update command arguments
#[derive(Debug, Clone, Args)]
pub struct UpdateArgs {
    /// Sandbox directory (defaults to the current directory)
    pub sandbox: Option<PathBuf>,
}

/// Handler for the update command
pub struct UpdateCommand {
    args: UpdateArgs,
}

impl UpdateCommand {
    pub fn new(args: UpdateArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, context: &CommandContext) -> Result<()> {
        let dir = CommandContext::sandbox_path(self.args.sandbox.as_deref());
        context.scm.update_sandbox(&dir).await?;

        context.display.success(&format!(
            "Updated {}",
            context.display.format_path(&dir.display().to_string())
        ));
        Ok(())
    }
}
