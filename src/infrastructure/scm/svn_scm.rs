use super::scm_interface::{SandboxStatus, ScmError, SourceControlDriver};
use super::svn_status::parse_status;
use crate::domain::value_objects::scm_type::ScmType;
use crate::domain::value_objects::scm_url::ScmUrl;
use crate::infrastructure::process::{
    CommandExecutor, CommandLine, Echo, ProcessError, ProcessOutput, ProcessRunner,
};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// SVN (Subversion) implementation of the source control driver
pub struct SvnScm {
    svn_executable: String,
    process: Arc<dyn ProcessRunner>,
}

impl Default for SvnScm {
    fn default() -> Self {
        Self {
            svn_executable: ScmType::Svn.executable_name().to_string(),
            process: Arc::new(CommandExecutor::new()),
        }
    }
}

impl SvnScm {
    /// Create a new SVN SCM instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new SVN SCM instance with custom executable path
    pub fn with_executable(executable: impl Into<String>) -> Self {
        Self {
            svn_executable: executable.into(),
            ..Self::default()
        }
    }

    /// Run svn through the given process runner
    pub fn with_process(mut self, process: Arc<dyn ProcessRunner>) -> Self {
        self.process = process;
        self
    }

    pub fn executable(&self) -> &str {
        &self.svn_executable
    }

    /// Build an svn invocation that never prompts
    fn svn_command(&self, subcommand: &str) -> CommandLine {
        CommandLine::new(&self.svn_executable)
            .arg(subcommand)
            .arg("--non-interactive")
    }

    /// Execute an SVN command
    async fn execute_svn_command(
        &self,
        command: &CommandLine,
        echo: Echo,
    ) -> Result<ProcessOutput, ScmError> {
        Ok(self.process.popen(command, echo).await?)
    }

    /// Execute an SVN command and check for success
    async fn execute_svn_command_checked(
        &self,
        command: &CommandLine,
        echo: Echo,
    ) -> Result<ProcessOutput, ScmError> {
        let output = self.execute_svn_command(command, echo).await?;

        if !output.success() {
            return Err(ScmError::command_failed(
                command.to_string(),
                output.exit_code,
                output.error_summary(),
            ));
        }

        Ok(output)
    }

    async fn svn_info(&self, dir: &Path) -> Result<ProcessOutput, ScmError> {
        let command = self.svn_command("info").arg(svn_target(dir)?);
        self.execute_svn_command_checked(&command, Echo::Off).await
    }
}

/// Working copy path as an svn target
///
/// svn reads an `@` in a target as the start of a peg revision; a trailing
/// `@` keeps such paths intact.
fn svn_target(path: &Path) -> Result<String, ScmError> {
    let target = path
        .to_str()
        .ok_or_else(|| ProcessError::NonUtf8Path(path.to_path_buf()))?;
    if target.contains('@') {
        Ok(format!("{}@", target))
    } else {
        Ok(target.to_string())
    }
}

#[async_trait]
impl SourceControlDriver for SvnScm {
    fn scm_type(&self) -> ScmType {
        ScmType::Svn
    }

    fn is_valid_url(&self, url: &str) -> bool {
        ScmType::Svn.is_valid_url_scheme(url)
    }

    async fn is_valid_sandbox(&self, dir: &Path) -> bool {
        if !dir.is_dir() {
            return false;
        }

        match self.svn_info(dir).await {
            Ok(_) => true,
            Err(e) => {
                debug!("{} is not a sandbox: {}", dir.display(), e);
                false
            }
        }
    }

    async fn check_valid_sandbox(&self, dir: &Path) -> Result<(), ScmError> {
        if !dir.is_dir() {
            return Err(ScmError::not_a_directory(dir));
        }

        if !self.is_valid_sandbox(dir).await {
            return Err(ScmError::not_a_sandbox(ScmType::Svn, dir));
        }

        Ok(())
    }

    async fn get_url_from_sandbox(&self, dir: &Path) -> Result<String, ScmError> {
        let output = self
            .svn_info(dir)
            .await
            .map_err(|e| ScmError::url_not_found(dir, e.to_string()))?;

        output
            .lines
            .iter()
            .find_map(|line| line.strip_prefix("URL: "))
            .map(|url| url.trim().to_string())
            .ok_or_else(|| ScmError::url_not_found(dir, "no URL in svn info output"))
    }

    async fn is_remote_sandbox(&self, _dir: &Path) -> bool {
        // Subversion sandboxes always have a server
        true
    }

    async fn sandbox_status(&self, dir: &Path) -> Result<SandboxStatus, ScmError> {
        if !dir.is_dir() {
            return Err(ScmError::not_a_directory(dir));
        }

        let command = self.svn_command("status").arg(svn_target(dir)?);
        let output = self.execute_svn_command(&command, Echo::Off).await?;

        // Older clients exit with zero and warn about non-sandboxes
        let warned = output
            .stderr_lines
            .iter()
            .any(|line| line.starts_with("svn: warning:"));

        if !output.success() || warned {
            return Err(ScmError::status_failed(output.error_summary()));
        }

        Ok(parse_status(&output.lines))
    }

    async fn update_sandbox(&self, dir: &Path) -> Result<(), ScmError> {
        if !dir.is_dir() {
            info!("Skipping update of {}: not a directory", dir.display());
            return Ok(());
        }

        let command = self.svn_command("update").arg(svn_target(dir)?);
        self.execute_svn_command_checked(&command, Echo::On)
            .await
            .map_err(|e| ScmError::update_failed(e.to_string()))?;

        Ok(())
    }

    async fn checkin_sandbox(
        &self,
        dir: &Path,
        name: &str,
        version: &str,
        push: bool,
    ) -> Result<(), ScmError> {
        self.check_valid_sandbox(dir).await?;

        info!("Checking in {}", dir.display());
        let command = self
            .svn_command("commit")
            .arg("-m")
            .arg(format!("Prepare {} {}.", name, version))
            .arg(svn_target(dir)?);

        self.execute_svn_command_checked(&command, Echo::On)
            .await
            .map_err(|e| ScmError::commit_failed(e.to_string()))?;

        if push {
            debug!("Subversion commits go to the server, nothing to push");
        }

        Ok(())
    }

    async fn tag_exists(&self, dir: &Path, tag_id: &str) -> bool {
        if !self.is_valid_sandbox(dir).await {
            return false;
        }

        let command = self.svn_command("list").arg(tag_id);
        match self.execute_svn_command(&command, Echo::Off).await {
            Ok(output) => output.success(),
            Err(e) => {
                debug!("Assuming {} does not exist: {}", tag_id, e);
                false
            }
        }
    }

    async fn get_tag_id(&self, dir: &Path, version: &str) -> Result<String, ScmError> {
        let url = self.get_url_from_sandbox(dir).await?;
        let url = ScmUrl::new(&url)?;
        Ok(url.tag_url(version)?)
    }

    async fn create_tag(
        &self,
        dir: &Path,
        tag_id: &str,
        name: &str,
        version: &str,
        push: bool,
    ) -> Result<(), ScmError> {
        let url = self.get_url_from_sandbox(dir).await?;

        if self.tag_exists(dir, tag_id).await {
            return Err(ScmError::tag_exists(tag_id));
        }

        info!("Tagging {} {}", name, version);
        let command = self
            .svn_command("copy")
            .arg("-m")
            .arg(format!("Tagged {} {}.", name, version))
            .arg(url)
            .arg(tag_id);

        self.execute_svn_command_checked(&command, Echo::On)
            .await
            .map_err(|e| ScmError::tag_failed(e.to_string()))?;

        if push {
            debug!("Subversion tags are created on the server, nothing to push");
        }

        Ok(())
    }

    async fn checkout_url(&self, url: &str, dest: &Path) -> Result<(), ScmError> {
        if !self.is_valid_url(url) {
            return Err(ScmError::InvalidUrl {
                url: url.to_string(),
            });
        }

        info!("Checking out {}", url);
        let command = self.svn_command("checkout").arg(url).arg(svn_target(dest)?);

        self.execute_svn_command_checked(&command, Echo::On)
            .await
            .map_err(|e| ScmError::checkout_failed(e.to_string()))?;

        Ok(())
    }

    async fn check_availability(&self) -> Result<(), ScmError> {
        let command = CommandLine::new(&self.svn_executable)
            .arg("--version")
            .arg("--quiet");

        match self.execute_svn_command(&command, Echo::Off).await {
            Ok(output) if output.success() => Ok(()),
            _ => Err(ScmError::executable_not_found(&self.svn_executable)),
        }
    }
}
