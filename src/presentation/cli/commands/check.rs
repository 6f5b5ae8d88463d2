use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::application::use_cases::check_sandbox::{CheckSandboxUseCase, SandboxReport};
use crate::infrastructure::scm::ScmError;
use crate::presentation::cli::context::CommandContext;
use crate::presentation::cli::OutputFormat;

/// Check command arguments
#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Sandbox directory (defaults to the current directory)
    pub sandbox: Option<PathBuf>,

    /// Output format (text, json, yaml)
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Handler for the check command
///
/// Fails when the directory is not a sandbox or has uncommitted changes, so
/// it can guard scripts.
pub struct CheckCommand {
    args: CheckArgs,
}

impl CheckCommand {
    pub fn new(args: CheckArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, context: &CommandContext) -> Result<()> {
        let dir = CommandContext::sandbox_path(self.args.sandbox.as_deref());
        let report = CheckSandboxUseCase::new(context.scm.clone())
            .execute(&dir)
            .await?;

        match self.args.output.serialize(&report)? {
            Some(rendered) => println!("{}", rendered.trim_end()),
            None => self.print_report(context, &report),
        }

        if !report.valid {
            if !dir.is_dir() {
                return Err(ScmError::not_a_directory(&dir).into());
            }
            return Err(ScmError::not_a_sandbox(context.scm.scm_type(), &dir).into());
        }
        if report.unclean {
            let entries = report.offending_entries().map(|e| e.to_string()).collect();
            return Err(ScmError::uncommitted_changes(&dir, entries).into());
        }
        Ok(())
    }

    fn print_report(&self, context: &CommandContext, report: &SandboxReport) {
        let display = &context.display;
        let path = report.path.display().to_string();

        display.key_value("Sandbox", &display.format_path(&path));
        if !report.valid {
            return;
        }

        if let Some(url) = &report.url {
            display.key_value("URL", &display.format_url(url));
        }

        let state = if !report.status_known {
            "unknown"
        } else if report.dirty {
            "dirty"
        } else if report.unclean {
            "unclean"
        } else {
            "clean"
        };
        display.key_value("State", state);

        for entry in &report.entries {
            if context.verbose || entry.kind.is_unclean() {
                println!("    {}", display.format_entry(entry));
            }
        }
    }
}
