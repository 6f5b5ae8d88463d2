use crate::common::error::ReleaseError;

/// Result type used throughout mkrelease
///
/// # Examples
///
/// ```
/// use mkrelease::common::result::ReleaseResult;
/// use mkrelease::common::error::ReleaseError;
///
/// fn example_function() -> ReleaseResult<String> {
///     Ok("success".to_string())
/// }
///
/// fn example_with_error() -> ReleaseResult<()> {
///     Err(ReleaseError::NoLocations)
/// }
/// ```
pub type ReleaseResult<T> = Result<T, ReleaseError>;

/// Conversion from `Option` to [`ReleaseResult`]
pub trait OptionExt<T> {
    /// Convert `None` into `error`
    fn ok_or_release(self, error: impl FnOnce() -> ReleaseError) -> ReleaseResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_release(self, error: impl FnOnce() -> ReleaseError) -> ReleaseResult<T> {
        self.ok_or_else(error)
    }
}

/// Conversion from I/O results
pub trait ResultExt<T> {
    /// Wrap the error as a file system error about `path`
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> ReleaseResult<T>;
}

impl<T> ResultExt<T> for Result<T, std::io::Error> {
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> ReleaseResult<T> {
        self.map_err(|e| ReleaseError::filesystem_error_with_source(message, path, e))
    }
}
