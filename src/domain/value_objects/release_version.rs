use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ReleaseVersionError {
    #[error("Bad version: empty")]
    Empty,

    #[error("Bad version: {0}")]
    InvalidCharacter(String),

    #[error("Version is a development version: {0} (use -e to allow)")]
    Development(String),
}

/// Version string of a package about to be released
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReleaseVersion {
    version: String,
}

impl ReleaseVersion {
    /// Validate a version; development versions are accepted only with `develop`
    pub fn new(version: &str, develop: bool) -> Result<Self, ReleaseVersionError> {
        let version = version.trim();
        if version.is_empty() {
            return Err(ReleaseVersionError::Empty);
        }

        if version
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '\\'))
        {
            return Err(ReleaseVersionError::InvalidCharacter(version.to_string()));
        }

        if !develop && Self::is_development(version) {
            return Err(ReleaseVersionError::Development(version.to_string()));
        }

        Ok(Self {
            version: version.to_string(),
        })
    }

    /// Whether the version carries a `dev` marker or a `-r<rev>` suffix
    pub fn is_development(version: &str) -> bool {
        if version.contains("dev") {
            return true;
        }
        Regex::new(r"-r\d+$")
            .map(|pattern| pattern.is_match(version))
            .unwrap_or(false)
    }

    pub fn as_str(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version)
    }
}
