use crate::domain::entities::release_config::ReleaseConfig;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Environment variable naming the configuration file
pub const CONFIG_ENV_VAR: &str = "MKRELEASE_CONFIG";

/// Configuration file looked up in the home directory
pub const DEFAULT_CONFIG_FILE: &str = ".mkrelease.yaml";

/// Configuration store related errors
#[derive(Debug, Error)]
pub enum ConfigStoreError {
    #[error("Configuration file not found at path: {0}")]
    ConfigFileNotFound(String),

    #[error("Configuration file read failed: {0}")]
    ReadFailed(String),

    #[error("Configuration file write failed: {0}")]
    WriteFailed(String),

    #[error("YAML parsing failed: {0}")]
    YamlParsingFailed(String),

    #[error("YAML serialization failed: {0}")]
    YamlSerializationFailed(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Configuration directory creation failed: {0}")]
    DirectoryCreationFailed(String),
}

/// Where the configuration comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Named on the command line or in the environment; must exist
    Explicit(PathBuf),
    /// The per-user file; built-in defaults apply when it is missing
    UserDefault(PathBuf),
    /// No home directory, built-in defaults only
    BuiltIn,
}

impl ConfigSource {
    /// Pick the configuration file: command line, then environment, then home
    pub fn locate(explicit: Option<&Path>) -> Self {
        Self::locate_with(
            explicit,
            std::env::var_os(CONFIG_ENV_VAR),
            dirs::home_dir(),
        )
    }

    fn locate_with(
        explicit: Option<&Path>,
        env_value: Option<OsString>,
        home: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = explicit {
            return Self::Explicit(path.to_path_buf());
        }

        if let Some(value) = env_value.filter(|value| !value.is_empty()) {
            return Self::Explicit(PathBuf::from(value));
        }

        match home {
            Some(home) => Self::UserDefault(home.join(DEFAULT_CONFIG_FILE)),
            None => Self::BuiltIn,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(path) | Self::UserDefault(path) => Some(path),
            Self::BuiltIn => None,
        }
    }
}

/// Configuration store for the mkrelease YAML file
pub struct ConfigStore {
    /// Whether to validate configuration on read
    validate_on_read: bool,
}

impl ConfigStore {
    /// Create a new configuration store with default settings
    pub fn new() -> Self {
        Self {
            validate_on_read: true,
        }
    }

    /// Create a store that accepts whatever parses
    pub fn without_validation() -> Self {
        Self {
            validate_on_read: false,
        }
    }

    /// Read configuration from a YAML file that must exist
    pub fn load<P: AsRef<Path>>(&self, config_path: P) -> Result<ReleaseConfig, ConfigStoreError> {
        let config_path = config_path.as_ref();

        if !config_path.exists() {
            return Err(ConfigStoreError::ConfigFileNotFound(
                config_path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(config_path)
            .map_err(|e| ConfigStoreError::ReadFailed(e.to_string()))?;

        // An empty file is a valid, default configuration
        let config: ReleaseConfig = if contents.trim().is_empty() {
            ReleaseConfig::default()
        } else {
            serde_yaml::from_str(&contents)
                .map_err(|e| ConfigStoreError::YamlParsingFailed(e.to_string()))?
        };

        if self.validate_on_read {
            config
                .validate()
                .map_err(|e| ConfigStoreError::ValidationFailed(e.to_string()))?;
        }

        debug!("Loaded configuration from {}", config_path.display());
        Ok(config)
    }

    /// Read configuration from `source`
    pub fn load_from(&self, source: &ConfigSource) -> Result<ReleaseConfig, ConfigStoreError> {
        match source {
            ConfigSource::Explicit(path) => self.load(path),
            ConfigSource::UserDefault(path) if path.exists() => self.load(path),
            ConfigSource::UserDefault(path) => {
                debug!("No configuration at {}, using defaults", path.display());
                Ok(ReleaseConfig::default())
            }
            ConfigSource::BuiltIn => Ok(ReleaseConfig::default()),
        }
    }

    /// Write configuration to a YAML file
    pub fn write<P: AsRef<Path>>(
        &self,
        config_path: P,
        config: &ReleaseConfig,
    ) -> Result<(), ConfigStoreError> {
        let config_path = config_path.as_ref();

        config
            .validate()
            .map_err(|e| ConfigStoreError::ValidationFailed(e.to_string()))?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigStoreError::DirectoryCreationFailed(e.to_string()))?;
        }

        let yaml_content = serde_yaml::to_string(config)
            .map_err(|e| ConfigStoreError::YamlSerializationFailed(e.to_string()))?;

        fs::write(config_path, yaml_content)
            .map_err(|e| ConfigStoreError::WriteFailed(e.to_string()))?;

        Ok(())
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}
