use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq)]
pub enum DistLocationError {
    #[error("Location is empty")]
    Empty,

    #[error("Unknown location: {0}")]
    Unrecognized(String),

    #[error("Missing host in location: {0}")]
    MissingHost(String),
}

/// Upload destination for distribution files
///
/// File server locations are parsed from their text; package index
/// locations are names of configured index servers and are only produced
/// by resolving names against the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DistLocation {
    /// `host:path` or `user@host:path`, uploaded with scp
    Scp(String),
    /// `sftp://host/path`, uploaded with an sftp batch
    Sftp(String),
    /// Named package index server, uploaded with the index upload command
    Index(String),
}

impl DistLocation {
    pub fn parse(location: &str) -> Result<Self, DistLocationError> {
        let trimmed = location.trim();
        if trimmed.is_empty() {
            return Err(DistLocationError::Empty);
        }

        if trimmed.starts_with("sftp://") {
            let parsed = Url::parse(trimmed)
                .map_err(|_| DistLocationError::Unrecognized(trimmed.to_string()))?;
            if parsed.host_str().map_or(true, str::is_empty) {
                return Err(DistLocationError::MissingHost(trimmed.to_string()));
            }
            return Ok(Self::Sftp(trimmed.to_string()));
        }

        if trimmed.contains("://") {
            return Err(DistLocationError::Unrecognized(trimmed.to_string()));
        }

        match trimmed.split_once(':') {
            Some((host, _)) if !host.is_empty() && !host.contains('/') => {
                Ok(Self::Scp(trimmed.to_string()))
            }
            Some((host, _)) if host.is_empty() => {
                Err(DistLocationError::MissingHost(trimmed.to_string()))
            }
            _ => Err(DistLocationError::Unrecognized(trimmed.to_string())),
        }
    }

    /// Package index server `name`
    pub fn index(name: impl Into<String>) -> Self {
        Self::Index(name.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Scp(location) | Self::Sftp(location) | Self::Index(location) => location,
        }
    }

    /// Transport used for this location
    pub fn transport(&self) -> &'static str {
        match self {
            Self::Scp(_) => "scp",
            Self::Sftp(_) => "sftp",
            Self::Index(_) => "index",
        }
    }

    /// Whether files are copied to a server rather than registered with an index
    pub fn is_file_server(&self) -> bool {
        !matches!(self, Self::Index(_))
    }
}

impl fmt::Display for DistLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DistLocation {
    type Err = DistLocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
