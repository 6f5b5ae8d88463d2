use crate::domain::value_objects::scm_url::ScmUrl;
use std::path::{Path, PathBuf};

/// Working copy a release is made from
///
/// The remote URL is queried from the source control driver the first time
/// it is needed and cached here afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sandbox {
    path: PathBuf,
    url: Option<ScmUrl>,
    temporary: bool,
}

impl Sandbox {
    /// A sandbox that already exists on disk
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            url: None,
            temporary: false,
        }
    }

    /// A sandbox checked out from `url` into a temporary directory
    pub fn checked_out(path: impl Into<PathBuf>, url: ScmUrl) -> Self {
        Self {
            path: path.into(),
            url: Some(url),
            temporary: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached remote URL, if it has been queried
    pub fn url(&self) -> Option<&ScmUrl> {
        self.url.as_ref()
    }

    pub fn cache_url(&mut self, url: ScmUrl) {
        self.url = Some(url);
    }

    /// Whether the sandbox was created by this run and may be removed
    pub fn is_temporary(&self) -> bool {
        self.temporary
    }

    /// Absolute or sandbox-relative dist directory
    pub fn dist_dir(&self, dist_dir: &str) -> PathBuf {
        let dist_dir = Path::new(dist_dir);
        if dist_dir.is_absolute() {
            dist_dir.to_path_buf()
        } else {
            self.path.join(dist_dir)
        }
    }

    /// Render `file` relative to the sandbox for messages
    pub fn display_relative(&self, file: &Path) -> String {
        pathdiff::diff_paths(file, &self.path)
            .filter(|relative| !relative.starts_with(".."))
            .unwrap_or_else(|| file.to_path_buf())
            .display()
            .to_string()
    }
}
