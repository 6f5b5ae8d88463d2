/// Application layer
///
/// Use cases that sequence source control, build and upload operations.
pub mod use_cases;

pub use use_cases::{
    CheckSandboxUseCase, ReleaseOptions, ReleasePackageUseCase, ReleaseReport, SandboxReport,
};
