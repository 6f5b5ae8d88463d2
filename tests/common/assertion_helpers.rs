//! Assertion helpers for testing

use mkrelease::infrastructure::scm::SourceControlDriver;
use std::path::Path;

/// Assert that a directory exists
#[macro_export]
macro_rules! assert_dir_exists {
    ($path:expr) => {
        assert!(
            $path.is_dir(),
            "Directory should exist: {}",
            $path.display()
        );
    };
}

/// Assert that a path does not exist
#[macro_export]
macro_rules! assert_not_exists {
    ($path:expr) => {
        assert!(!$path.exists(), "Path should not exist: {}", $path.display());
    };
}

/// Assert that the error message of a `Result` contains `expected`
#[macro_export]
macro_rules! assert_err_contains {
    ($result:expr, $expected:expr) => {
        match $result {
            Ok(_) => panic!("Expected an error containing {:?}", $expected),
            Err(e) => assert!(
                e.to_string().contains($expected),
                "Error {:?} does not contain {:?}",
                e.to_string(),
                $expected
            ),
        }
    };
}

/// Assert the dirty/unclean state the driver reports for `dir`
pub async fn assert_sandbox_state(
    scm: &dyn SourceControlDriver,
    dir: &Path,
    dirty: bool,
    unclean: bool,
) {
    assert_eq!(
        scm.is_dirty_sandbox(dir).await,
        dirty,
        "dirty state of {}",
        dir.display()
    );
    assert_eq!(
        scm.is_unclean_sandbox(dir).await,
        unclean,
        "unclean state of {}",
        dir.display()
    );
}
