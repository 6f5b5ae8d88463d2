use super::scm_type::ScmType;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use url::Url;

/// Repository layout markers recognised in a Subversion URL
const LAYOUT_PATTERN: &str = r"^(.*)/(trunk|branches/[^/]+|tags/[^/]+)(/.*)?$";

/// Errors parsing a repository URL
#[derive(Debug, Error, PartialEq)]
pub enum ScmUrlError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Bad URL: {0}")]
    MissingLayout(String),

    #[error("Invalid layout pattern: {0}")]
    Pattern(String),
}

/// Position of a URL inside the conventional trunk/branches/tags layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLayout {
    /// Everything before the layout marker
    pub root: String,
    /// The marker itself: `trunk`, `branches/<name>` or `tags/<name>`
    pub location: String,
}

/// Subversion repository URL
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScmUrl {
    url: String,
}

impl ScmUrl {
    /// Create a URL, validating its scheme
    pub fn new(url: &str) -> Result<Self, ScmUrlError> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err(ScmUrlError::InvalidFormat("Empty URL".to_string()));
        }

        if !ScmType::Svn.is_valid_url_scheme(trimmed) {
            return Err(ScmUrlError::UnsupportedScheme(trimmed.to_string()));
        }

        Ok(Self {
            url: trimmed.trim_end_matches('/').to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// URL scheme, e.g. `svn+ssh`
    pub fn scheme(&self) -> &str {
        self.url.split("://").next().unwrap_or_default()
    }

    /// Host name, when the URL has one (`file://` URLs usually don't)
    pub fn host(&self) -> Option<String> {
        Url::parse(&self.url)
            .ok()
            .and_then(|parsed| parsed.host_str().map(str::to_string))
            .filter(|host| !host.is_empty())
    }

    /// Locate the last trunk/branches/tags marker in the URL
    pub fn layout(&self) -> Result<RepositoryLayout, ScmUrlError> {
        let pattern =
            Regex::new(LAYOUT_PATTERN).map_err(|e| ScmUrlError::Pattern(e.to_string()))?;

        let captures = pattern
            .captures(&self.url)
            .ok_or_else(|| ScmUrlError::MissingLayout(self.url.clone()))?;

        match (captures.get(1), captures.get(2)) {
            (Some(root), Some(location)) => Ok(RepositoryLayout {
                root: root.as_str().to_string(),
                location: location.as_str().to_string(),
            }),
            _ => Err(ScmUrlError::MissingLayout(self.url.clone())),
        }
    }

    /// Derive the tag URL for `version`
    ///
    /// The last `/trunk`, `/branches/X` or `/tags/X` segment and everything
    /// after it is replaced with `/tags/<version>`.
    pub fn tag_url(&self, version: &str) -> Result<String, ScmUrlError> {
        let layout = self.layout()?;
        Ok(format!("{}/tags/{}", layout.root, version))
    }
}

impl fmt::Display for ScmUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

impl TryFrom<&str> for ScmUrl {
    type Error = ScmUrlError;

    fn try_from(url: &str) -> Result<Self, Self::Error> {
        Self::new(url)
    }
}
