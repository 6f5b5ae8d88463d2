use crate::domain::entities::release_config::ReleaseConfigError;
use crate::domain::value_objects::release_version::ReleaseVersionError;
use crate::infrastructure::filesystem::config_store::ConfigStoreError;
use crate::infrastructure::process::ProcessError;
use crate::infrastructure::scm::ScmError;
use crate::infrastructure::upload::UploadError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error(transparent)]
    Scm(#[from] ScmError),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Config(#[from] ConfigStoreError),

    #[error(transparent)]
    Locations(#[from] ReleaseConfigError),

    #[error(transparent)]
    Version(#[from] ReleaseVersionError),

    #[error("Failed to get package {field}: {message}")]
    PackageInfo { field: String, message: String },

    #[error("Build failed: {message}")]
    BuildFailed { message: String, command: String },

    #[error("No distribution found in {}", .dist_dir.display())]
    NoDistribution { dist_dir: PathBuf },

    #[error("Signing failed: {message}")]
    SignFailed { message: String },

    #[error("No upload location given")]
    NoLocations,

    #[error("File system operation failed: {message}")]
    FileSystemError {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl ReleaseError {
    pub fn package_info(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PackageInfo {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn build_failed(message: impl Into<String>, command: impl Into<String>) -> Self {
        Self::BuildFailed {
            message: message.into(),
            command: command.into(),
        }
    }

    pub fn no_distribution(dist_dir: impl Into<PathBuf>) -> Self {
        Self::NoDistribution {
            dist_dir: dist_dir.into(),
        }
    }

    pub fn sign_failed(message: impl Into<String>) -> Self {
        Self::SignFailed {
            message: message.into(),
        }
    }

    pub fn filesystem_error(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: None,
        }
    }

    pub fn filesystem_error_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: Some(source),
        }
    }
}

impl From<std::io::Error> for ReleaseError {
    fn from(error: std::io::Error) -> Self {
        Self::filesystem_error_with_source("File system operation failed", None, error)
    }
}
