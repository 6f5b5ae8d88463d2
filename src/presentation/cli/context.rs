use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::entities::release_config::ReleaseConfig;
use crate::domain::value_objects::scm_type::ScmType;
use crate::infrastructure::filesystem::config_store::{ConfigSource, ConfigStore};
use crate::infrastructure::process::{CommandExecutor, ProcessRunner};
use crate::infrastructure::scm::{ScmFactory, SourceControlDriver};
use crate::presentation::ui::display::DisplayHelper;

/// Everything a subcommand needs: configuration, driver and process runner
pub struct CommandContext {
    pub config: ReleaseConfig,
    pub process: Arc<dyn ProcessRunner>,
    pub scm: Arc<dyn SourceControlDriver>,
    pub display: DisplayHelper,
    pub verbose: bool,
    pub quiet: bool,
}

impl CommandContext {
    /// Load the configuration from `source` and set up the Subversion driver
    pub fn load(
        source: &ConfigSource,
        display: DisplayHelper,
        verbose: bool,
        quiet: bool,
    ) -> Result<Self> {
        let config = ConfigStore::new().load_from(source).with_context(|| {
            match source.path() {
                Some(path) => format!("Failed to load configuration {}", path.display()),
                None => "Failed to load configuration".to_string(),
            }
        })?;

        let process: Arc<dyn ProcessRunner> = Arc::new(CommandExecutor::new());
        Self::with_process(config, process, display, verbose, quiet)
    }

    /// Context running every external command through `process`
    pub fn with_process(
        config: ReleaseConfig,
        process: Arc<dyn ProcessRunner>,
        display: DisplayHelper,
        verbose: bool,
        quiet: bool,
    ) -> Result<Self> {
        let scm = ScmFactory::create_scm_with_process(ScmType::Svn, Arc::clone(&process))?;
        Ok(Self {
            config,
            process,
            scm,
            display,
            verbose,
            quiet,
        })
    }

    /// Sandbox argument, or the current directory
    pub fn sandbox_path(sandbox: Option<&Path>) -> PathBuf {
        sandbox
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
