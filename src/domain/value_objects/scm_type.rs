use serde::{Deserialize, Serialize};
use std::fmt;

/// Source control system backing a sandbox
///
/// Subversion is the only backend shipped; further systems are added as
/// sibling variants with their own driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum ScmType {
    /// Subversion (SVN) version control system
    #[default]
    Svn,
}

impl fmt::Display for ScmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScmType::Svn => write!(f, "svn"),
        }
    }
}

impl ScmType {
    /// Human readable name used in messages
    pub fn display_name(&self) -> &'static str {
        match self {
            ScmType::Svn => "Subversion",
        }
    }

    /// Get the standard executable name for this SCM
    pub fn executable_name(&self) -> &'static str {
        match self {
            ScmType::Svn => "svn",
        }
    }

    /// Check if the URL scheme is appropriate for this SCM type
    pub fn is_valid_url_scheme(&self, url: &str) -> bool {
        match self {
            ScmType::Svn => {
                url.starts_with("https://")
                    || url.starts_with("http://")
                    || url.starts_with("svn://")
                    || url.starts_with("svn+ssh://")
                    || url.starts_with("file://")
            }
        }
    }
}
