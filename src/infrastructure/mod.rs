/// Infrastructure layer modules
///
/// This layer provides concrete implementations for external system interactions:
/// - Source control drivers (Subversion)
/// - Process execution
/// - Distribution upload (scp, sftp, package indexes)
/// - Configuration files
pub mod filesystem;
pub mod process;
pub mod scm;
pub mod upload;

// Re-export commonly used types
pub use filesystem::{ConfigSource, ConfigStore, ConfigStoreError};
pub use process::{CommandExecutor, CommandLine, Echo, ProcessError, ProcessOutput, ProcessRunner};
pub use scm::{ScmError, ScmFactory, SourceControlDriver, SvnScm};
pub use upload::{IndexUploader, ScpUploader, UploadError};
