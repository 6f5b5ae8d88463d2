use super::UploadError;
use crate::infrastructure::process::{CommandLine, Echo, ProcessError, ProcessRunner};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Uploads distribution files to a package index with an external command
///
/// The command is split on whitespace and run as
/// `<upload_command> -r <index> <files>...`. Index names are resolved by the
/// tool itself, e.g. from twine's `.pypirc`.
pub struct IndexUploader {
    process: Arc<dyn ProcessRunner>,
    upload_command: String,
}

impl IndexUploader {
    pub fn new(process: Arc<dyn ProcessRunner>, upload_command: impl Into<String>) -> Self {
        Self {
            process,
            upload_command: upload_command.into(),
        }
    }

    pub fn command_line(&self, files: &[PathBuf], index: &str) -> Result<CommandLine, ProcessError> {
        let mut words = self.upload_command.split_whitespace();
        let program = words
            .next()
            .ok_or_else(|| ProcessError::InvalidCommand("Upload command is empty".to_string()))?;

        let mut command = words
            .fold(CommandLine::new(program), |command, word| command.arg(word))
            .arg("-r")
            .arg(index);
        for file in files {
            command = command.path_arg(file)?;
        }
        Ok(command)
    }

    /// Upload all `files` to `index` in one run
    pub async fn upload(&self, files: &[PathBuf], index: &str) -> Result<(), UploadError> {
        info!("Uploading {} file(s) to {}", files.len(), index);

        let command = self.command_line(files, index)?;
        let output = self.process.popen(&command, Echo::On).await?;

        if !output.success() {
            return Err(UploadError::IndexFailed {
                index: index.to_string(),
                message: output.error_summary(),
            });
        }

        info!("OK");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::process::command_executor::MockProcessRunner;
    use crate::infrastructure::process::ProcessOutput;

    fn distfiles() -> Vec<PathBuf> {
        vec![
            PathBuf::from("/work/pkg/dist/pkg-1.0.tar.gz"),
            PathBuf::from("/work/pkg/dist/pkg-1.0.tar.gz.asc"),
        ]
    }

    #[test]
    fn test_command_line() {
        let uploader = IndexUploader::new(Arc::new(MockProcessRunner::new()), "twine upload");
        let command = uploader.command_line(&distfiles(), "pypi").unwrap();

        assert_eq!(command.program(), "twine");
        assert_eq!(
            command.arguments(),
            [
                "upload",
                "-r",
                "pypi",
                "/work/pkg/dist/pkg-1.0.tar.gz",
                "/work/pkg/dist/pkg-1.0.tar.gz.asc"
            ]
        );
    }

    #[test]
    fn test_empty_command() {
        let uploader = IndexUploader::new(Arc::new(MockProcessRunner::new()), "  ");
        assert!(matches!(
            uploader.command_line(&distfiles(), "pypi"),
            Err(ProcessError::InvalidCommand(_))
        ));
    }

    #[tokio::test]
    async fn test_upload() {
        let mut process = MockProcessRunner::new();
        process
            .expect_popen()
            .withf(|command, echo| {
                command.program() == "twine"
                    && command.arguments()[..3] == ["upload", "-r", "testpypi"]
                    && *echo == Echo::On
            })
            .times(1)
            .returning(|_, _| Ok(ProcessOutput::new(0, vec![])));

        let uploader = IndexUploader::new(Arc::new(process), "twine upload");
        assert!(uploader.upload(&distfiles(), "testpypi").await.is_ok());
    }

    #[tokio::test]
    async fn test_upload_failure() {
        let mut process = MockProcessRunner::new();
        process.expect_popen().returning(|_, _| {
            Ok(ProcessOutput::new(1, vec![]).with_stderr(vec!["403 Forbidden".to_string()]))
        });

        let uploader = IndexUploader::new(Arc::new(process), "twine upload");
        let err = uploader.upload(&distfiles(), "pypi").await.unwrap_err();
        assert_eq!(err.to_string(), "Upload to pypi failed: 403 Forbidden");
    }
}
