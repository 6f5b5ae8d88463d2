use crate::infrastructure::scm::{ScmError, SourceControlDriver, StatusEntry};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// State of a sandbox as seen by the source control driver
#[derive(Debug, Clone, Serialize)]
pub struct SandboxReport {
    pub path: PathBuf,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// False when the status query failed and the state is unknown
    pub status_known: bool,
    pub dirty: bool,
    pub unclean: bool,
    pub entries: Vec<StatusEntry>,
}

impl SandboxReport {
    fn invalid(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            valid: false,
            url: None,
            status_known: false,
            dirty: false,
            unclean: false,
            entries: Vec::new(),
        }
    }

    /// Entries that make the sandbox unclean
    pub fn offending_entries(&self) -> impl Iterator<Item = &StatusEntry> {
        self.entries.iter().filter(|entry| entry.kind.is_unclean())
    }
}

/// Inspect a sandbox without changing it
pub struct CheckSandboxUseCase {
    scm: Arc<dyn SourceControlDriver>,
}

impl CheckSandboxUseCase {
    pub fn new(scm: Arc<dyn SourceControlDriver>) -> Self {
        Self { scm }
    }

    /// Report on `dir`; an invalid sandbox is a report, not an error
    pub async fn execute(&self, dir: &Path) -> Result<SandboxReport, ScmError> {
        if !self.scm.is_valid_sandbox(dir).await {
            return Ok(SandboxReport::invalid(dir));
        }

        let url = self.scm.get_url_from_sandbox(dir).await?;

        let mut report = SandboxReport {
            path: dir.to_path_buf(),
            valid: true,
            url: Some(url),
            status_known: false,
            dirty: false,
            unclean: false,
            entries: Vec::new(),
        };

        match self.scm.sandbox_status(dir).await {
            Ok(status) => {
                report.status_known = true;
                report.dirty = status.is_dirty();
                report.unclean = status.is_unclean();
                report.entries = status.entries;
            }
            Err(e) => debug!("Status of {} unknown: {}", dir.display(), e),
        }

        Ok(report)
    }
}
