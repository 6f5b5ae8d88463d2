use crate::domain::value_objects::dist_location::{DistLocation, DistLocationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use validator::Validate;

#[derive(Debug, Error, PartialEq)]
pub enum ReleaseConfigError {
    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    #[error("Bad location in alias '{alias}': {source}")]
    InvalidAlias {
        alias: String,
        #[source]
        source: DistLocationError,
    },

    #[error("Alias '{0}' has no locations")]
    EmptyAlias(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Release switches used when the command line does not override them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseDefaults {
    /// Commit local changes before tagging
    pub commit: bool,
    /// Create a release tag
    pub tag: bool,
    /// Build and upload the distribution
    pub upload: bool,
    /// Push commits and tags upstream
    pub push: bool,
    /// Allow development versions
    pub develop: bool,
    /// Suppress process output
    pub quiet: bool,
    /// Sign the distribution with GnuPG
    pub sign: bool,
    /// GnuPG key used for signing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    /// Alias or location used when none is given on the command line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dist_location: Option<String>,
}

impl Default for ReleaseDefaults {
    fn default() -> Self {
        Self {
            commit: true,
            tag: true,
            upload: true,
            push: false,
            develop: false,
            quiet: false,
            sign: false,
            identity: None,
            dist_location: None,
        }
    }
}

/// Commands that produce and describe the distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct BuildSettings {
    #[validate(length(min = 1))]
    pub command: String,

    /// Directory, relative to the sandbox, the build writes into
    #[validate(length(min = 1))]
    pub dist_dir: String,

    #[validate(length(min = 1))]
    pub name_command: String,

    #[validate(length(min = 1))]
    pub version_command: String,

    /// Command uploading to a package index, run as
    /// `<upload_command> -r <index> <files>...`
    #[validate(length(min = 1))]
    pub upload_command: String,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            command: "python setup.py sdist".to_string(),
            dist_dir: "dist".to_string(),
            name_command: "python setup.py --name".to_string(),
            version_command: "python setup.py --version".to_string(),
            upload_command: "twine upload".to_string(),
        }
    }
}

/// mkrelease configuration file contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    pub defaults: ReleaseDefaults,
    pub build: BuildSettings,
    /// Package index servers known to the upload command
    pub index_servers: Vec<String>,
    /// Alias name to one or more locations or index servers
    pub aliases: BTreeMap<String, Vec<String>>,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            defaults: ReleaseDefaults::default(),
            build: BuildSettings::default(),
            index_servers: vec!["pypi".to_string()],
            aliases: BTreeMap::new(),
        }
    }
}

impl ReleaseConfig {
    /// Check build commands and aliases
    pub fn validate(&self) -> Result<(), ReleaseConfigError> {
        self.build
            .validate()
            .map_err(|e| ReleaseConfigError::ValidationFailed(e.to_string()))?;

        for (alias, locations) in &self.aliases {
            if locations.is_empty() {
                return Err(ReleaseConfigError::EmptyAlias(alias.clone()));
            }
            for location in locations {
                self.location(location)
                    .map_err(|source| ReleaseConfigError::InvalidAlias {
                        alias: alias.clone(),
                        source,
                    })?;
            }
        }

        Ok(())
    }

    /// A configured index server by name, or a file server location
    pub fn location(&self, name: &str) -> Result<DistLocation, DistLocationError> {
        let name = name.trim();
        if self.index_servers.iter().any(|server| server == name) {
            return Ok(DistLocation::index(name));
        }
        DistLocation::parse(name)
    }

    /// Expand aliases, index servers and locations into upload destinations
    ///
    /// With no names the configured default location is used. Alias entries
    /// must be locations or index servers themselves; aliases do not nest.
    pub fn resolve_locations(
        &self,
        names: &[String],
    ) -> Result<Vec<DistLocation>, ReleaseConfigError> {
        let names: Vec<&str> = if names.is_empty() {
            self.defaults.dist_location.as_deref().into_iter().collect()
        } else {
            names.iter().map(String::as_str).collect()
        };

        let mut resolved: Vec<DistLocation> = Vec::new();
        for name in names {
            let expanded = match self.aliases.get(name) {
                Some(locations) => locations
                    .iter()
                    .map(|location| {
                        self.location(location)
                            .map_err(|source| ReleaseConfigError::InvalidAlias {
                                alias: name.to_string(),
                                source,
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()?,
                None => vec![self
                    .location(name)
                    .map_err(|_| ReleaseConfigError::UnknownLocation(name.to_string()))?],
            };

            for location in expanded {
                if !resolved.contains(&location) {
                    resolved.push(location);
                }
            }
        }

        Ok(resolved)
    }

    /// Alias names in sorted order
    pub fn alias_names(&self) -> Vec<&str> {
        self.aliases.keys().map(String::as_str).collect()
    }
}
