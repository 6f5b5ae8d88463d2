use crate::domain::value_objects::scm_type::ScmType;
use crate::domain::value_objects::scm_url::ScmUrlError;
use crate::infrastructure::process::ProcessError;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Operations a release needs from a source control system
///
/// Query operations (`is_*`, `tag_exists`) never fail: an unknown answer
/// collapses to `false` (to `true` for [`is_remote_sandbox`]) and is logged at
/// debug level. Check and action operations return an [`ScmError`] the caller
/// is expected to report and stop on.
///
/// [`is_remote_sandbox`]: SourceControlDriver::is_remote_sandbox
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SourceControlDriver: Send + Sync {
    /// Get the SCM type this implementation handles
    fn scm_type(&self) -> ScmType;

    /// Whether `url` uses a scheme this SCM can check out from
    fn is_valid_url(&self, url: &str) -> bool;

    /// Whether `dir` is an existing directory under version control
    async fn is_valid_sandbox(&self, dir: &Path) -> bool;

    /// Fail unless `dir` is an existing directory under version control
    async fn check_valid_sandbox(&self, dir: &Path) -> Result<(), ScmError>;

    /// Remote URL the sandbox was checked out from
    async fn get_url_from_sandbox(&self, dir: &Path) -> Result<String, ScmError>;

    /// Whether the sandbox has a remote to push to
    async fn is_remote_sandbox(&self, dir: &Path) -> bool;

    /// Local changes of the sandbox; `Err` when the state cannot be determined
    async fn sandbox_status(&self, dir: &Path) -> Result<SandboxStatus, ScmError>;

    /// Whether tracked files were modified, added, removed or conflicted
    async fn is_dirty_sandbox(&self, dir: &Path) -> bool {
        match self.sandbox_status(dir).await {
            Ok(status) => status.is_dirty(),
            Err(e) => {
                debug!("Reporting {} as clean: {}", dir.display(), e);
                false
            }
        }
    }

    /// Whether the sandbox is dirty or has missing or obstructed files
    async fn is_unclean_sandbox(&self, dir: &Path) -> bool {
        match self.sandbox_status(dir).await {
            Ok(status) => status.is_unclean(),
            Err(e) => {
                debug!("Reporting {} as clean: {}", dir.display(), e);
                false
            }
        }
    }

    /// Fail when the sandbox is dirty
    async fn check_dirty_sandbox(&self, dir: &Path) -> Result<(), ScmError> {
        match self.sandbox_status(dir).await {
            Ok(status) if status.is_dirty() => Err(ScmError::uncommitted_changes(
                dir,
                status.dirty_entries().map(StatusEntry::to_string).collect(),
            )),
            Ok(_) => Ok(()),
            Err(e) => {
                debug!("Reporting {} as clean: {}", dir.display(), e);
                Ok(())
            }
        }
    }

    /// Fail when the sandbox is unclean
    async fn check_unclean_sandbox(&self, dir: &Path) -> Result<(), ScmError> {
        match self.sandbox_status(dir).await {
            Ok(status) if status.is_unclean() => Err(ScmError::uncommitted_changes(
                dir,
                status.unclean_entries().map(StatusEntry::to_string).collect(),
            )),
            Ok(_) => Ok(()),
            Err(e) => {
                debug!("Reporting {} as clean: {}", dir.display(), e);
                Ok(())
            }
        }
    }

    /// Bring the sandbox up to date; a missing directory is skipped
    async fn update_sandbox(&self, dir: &Path) -> Result<(), ScmError>;

    /// Commit all local changes with message `Prepare <name> <version>.`
    async fn checkin_sandbox(
        &self,
        dir: &Path,
        name: &str,
        version: &str,
        push: bool,
    ) -> Result<(), ScmError>;

    /// Whether `tag_id` exists in the repository of the sandbox
    async fn tag_exists(&self, dir: &Path, tag_id: &str) -> bool;

    /// Fail when `tag_id` exists
    async fn check_tag_exists(&self, dir: &Path, tag_id: &str) -> Result<(), ScmError> {
        if self.tag_exists(dir, tag_id).await {
            return Err(ScmError::tag_exists(tag_id));
        }
        Ok(())
    }

    /// Tag location for releasing `version` from the sandbox
    async fn get_tag_id(&self, dir: &Path, version: &str) -> Result<String, ScmError>;

    /// Create `tag_id` from the sandbox URL with message `Tagged <name> <version>.`
    async fn create_tag(
        &self,
        dir: &Path,
        tag_id: &str,
        name: &str,
        version: &str,
        push: bool,
    ) -> Result<(), ScmError>;

    /// Check out `url` into `dest`
    async fn checkout_url(&self, url: &str, dest: &Path) -> Result<(), ScmError>;

    /// Fail when the SCM executable cannot be run
    async fn check_availability(&self) -> Result<(), ScmError>;
}

/// Kind of a local change reported by the SCM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Conflicted,
    Deleted,
    Modified,
    Replaced,
    /// Only properties changed
    PropertyModified,
    /// Tracked but deleted from disk
    Missing,
    /// Tracked item replaced by an item of another kind
    Obstructed,
    Unversioned,
    Ignored,
    External,
}

impl ChangeKind {
    /// Whether the change is committable
    pub fn is_dirty(&self) -> bool {
        matches!(
            self,
            ChangeKind::Added
                | ChangeKind::Conflicted
                | ChangeKind::Deleted
                | ChangeKind::Modified
                | ChangeKind::Replaced
                | ChangeKind::PropertyModified
        )
    }

    /// Whether the change keeps the sandbox from being clean
    pub fn is_unclean(&self) -> bool {
        self.is_dirty() || matches!(self, ChangeKind::Missing | ChangeKind::Obstructed)
    }
}

/// One line of sandbox status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEntry {
    pub kind: ChangeKind,
    pub path: String,
}

impl StatusEntry {
    pub fn new(kind: ChangeKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

impl fmt::Display for StatusEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.kind {
            ChangeKind::Added => "A",
            ChangeKind::Conflicted => "C",
            ChangeKind::Deleted => "D",
            ChangeKind::Modified => "M",
            ChangeKind::Replaced => "R",
            ChangeKind::PropertyModified => " M",
            ChangeKind::Missing => "!",
            ChangeKind::Obstructed => "~",
            ChangeKind::Unversioned => "?",
            ChangeKind::Ignored => "I",
            ChangeKind::External => "X",
        };
        write!(f, "{:<8}{}", marker, self.path)
    }
}

/// Parsed local changes of a sandbox
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SandboxStatus {
    pub entries: Vec<StatusEntry>,
}

impl SandboxStatus {
    pub fn new(entries: Vec<StatusEntry>) -> Self {
        Self { entries }
    }

    pub fn is_dirty(&self) -> bool {
        self.entries.iter().any(|entry| entry.kind.is_dirty())
    }

    pub fn is_unclean(&self) -> bool {
        self.entries.iter().any(|entry| entry.kind.is_unclean())
    }

    pub fn dirty_entries(&self) -> impl Iterator<Item = &StatusEntry> {
        self.entries.iter().filter(|entry| entry.kind.is_dirty())
    }

    pub fn unclean_entries(&self) -> impl Iterator<Item = &StatusEntry> {
        self.entries.iter().filter(|entry| entry.kind.is_unclean())
    }
}

/// Errors that can occur during SCM operations
#[derive(Debug, thiserror::Error)]
pub enum ScmError {
    #[error("Not a directory: {path}")]
    NotADirectory { path: String },

    #[error("Not a {} sandbox: {path}", .scm_type.display_name())]
    NotASandbox { scm_type: ScmType, path: String },

    #[error("Failed to get URL of {path}: {message}")]
    UrlNotFound { path: String, message: String },

    #[error("Status check failed: {message}")]
    StatusFailed { message: String },

    #[error("Uncommitted changes in {path}{}", format_entries(.entries))]
    UncommittedChanges { path: String, entries: Vec<String> },

    #[error("Update failed: {message}")]
    UpdateFailed { message: String },

    #[error("Commit failed: {message}")]
    CommitFailed { message: String },

    #[error("Tag exists: {tag_id}")]
    TagExists { tag_id: String },

    #[error("Tag failed: {message}")]
    TagFailed { message: String },

    #[error("Checkout failed: {message}")]
    CheckoutFailed { message: String },

    #[error("Invalid URL format: {url}")]
    InvalidUrl { url: String },

    #[error(transparent)]
    BadUrl(#[from] ScmUrlError),

    #[error("SCM executable not found: {executable}")]
    ExecutableNotFound { executable: String },

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("Command execution failed: {command}, exit code: {exit_code}, stderr: {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },
}

fn format_entries(entries: &[String]) -> String {
    entries.iter().map(|entry| format!("\n{}", entry)).collect()
}

impl ScmError {
    pub fn not_a_directory(path: &Path) -> Self {
        Self::NotADirectory {
            path: path.display().to_string(),
        }
    }

    pub fn not_a_sandbox(scm_type: ScmType, path: &Path) -> Self {
        Self::NotASandbox {
            scm_type,
            path: path.display().to_string(),
        }
    }

    pub fn url_not_found(path: &Path, message: impl Into<String>) -> Self {
        Self::UrlNotFound {
            path: path.display().to_string(),
            message: message.into(),
        }
    }

    pub fn status_failed(message: impl Into<String>) -> Self {
        Self::StatusFailed {
            message: message.into(),
        }
    }

    pub fn uncommitted_changes(path: &Path, entries: Vec<String>) -> Self {
        Self::UncommittedChanges {
            path: path.display().to_string(),
            entries,
        }
    }

    pub fn update_failed(message: impl Into<String>) -> Self {
        Self::UpdateFailed {
            message: message.into(),
        }
    }

    pub fn commit_failed(message: impl Into<String>) -> Self {
        Self::CommitFailed {
            message: message.into(),
        }
    }

    pub fn tag_exists(tag_id: impl Into<String>) -> Self {
        Self::TagExists {
            tag_id: tag_id.into(),
        }
    }

    pub fn tag_failed(message: impl Into<String>) -> Self {
        Self::TagFailed {
            message: message.into(),
        }
    }

    pub fn checkout_failed(message: impl Into<String>) -> Self {
        Self::CheckoutFailed {
            message: message.into(),
        }
    }

    /// Create an executable not found error
    pub fn executable_not_found(executable: impl Into<String>) -> Self {
        Self::ExecutableNotFound {
            executable: executable.into(),
        }
    }

    /// Create a command failed error
    pub fn command_failed(
        command: impl Into<String>,
        exit_code: i32,
        stderr: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            command: command.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }
}
