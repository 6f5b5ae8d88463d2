use crate::domain::value_objects::dist_location::DistLocation;
use crate::infrastructure::process::{CommandLine, Echo, ProcessError, ProcessRunner};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("scp failed: {message}")]
    ScpFailed { message: String },

    #[error("sftp failed: {message}")]
    SftpFailed { message: String },

    #[error("Upload to {index} failed: {message}")]
    IndexFailed { index: String, message: String },

    #[error("Not a file server location: {0}")]
    UnsupportedLocation(String),

    #[error("Failed to write sftp batch file: {0}")]
    BatchFile(#[from] std::io::Error),

    #[error(transparent)]
    Process(#[from] ProcessError),
}

/// Copies distribution files to scp and sftp locations
pub struct ScpUploader {
    process: Arc<dyn ProcessRunner>,
    base_dir: Option<PathBuf>,
}

impl ScpUploader {
    pub fn new(process: Arc<dyn ProcessRunner>) -> Self {
        Self {
            process,
            base_dir: None,
        }
    }

    /// Report uploaded files relative to `base_dir`
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    /// Upload `distfile` to `location` with the matching transport
    pub async fn upload(&self, distfile: &Path, location: &DistLocation) -> Result<(), UploadError> {
        match location {
            DistLocation::Scp(target) => self.run_scp(distfile, target).await,
            DistLocation::Sftp(target) => self.run_sftp(distfile, target).await,
            DistLocation::Index(name) => Err(UploadError::UnsupportedLocation(name.clone())),
        }
    }

    /// `scp <distfile> <location>`
    pub async fn run_scp(&self, distfile: &Path, location: &str) -> Result<(), UploadError> {
        info!("Uploading {} to {}", self.display_name(distfile), location);

        let command = CommandLine::new("scp").path_arg(distfile)?.arg(location);
        let output = self.process.popen(&command, Echo::Off).await?;

        if !output.success() {
            return Err(UploadError::ScpFailed {
                message: output.error_summary(),
            });
        }

        info!("OK");
        Ok(())
    }

    /// `sftp -b <batch> <location>` with a batch that puts `distfile`
    pub async fn run_sftp(&self, distfile: &Path, location: &str) -> Result<(), UploadError> {
        info!("Uploading {} to {}", self.display_name(distfile), location);

        let mut batch = tempfile::Builder::new().prefix("sftp-").tempfile()?;
        write!(batch, "{}", sftp_batch(distfile))?;
        batch.flush()?;

        let command = CommandLine::new("sftp")
            .arg("-b")
            .path_arg(batch.path())?
            .arg(location);
        let output = self.process.popen(&command, Echo::Off).await?;

        if !output.success() {
            return Err(UploadError::SftpFailed {
                message: output.error_summary(),
            });
        }

        info!("OK");
        Ok(())
    }

    fn display_name(&self, distfile: &Path) -> String {
        self.base_dir
            .as_deref()
            .and_then(|base| pathdiff::diff_paths(distfile, base))
            .filter(|relative| !relative.starts_with(".."))
            .unwrap_or_else(|| distfile.to_path_buf())
            .display()
            .to_string()
    }
}

/// sftp batch commands uploading one file
pub fn sftp_batch(distfile: &Path) -> String {
    format!("put \"{}\"\nbye\n", distfile.display())
}
