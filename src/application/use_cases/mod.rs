pub mod check_sandbox;
pub mod release_package;

pub use check_sandbox::{CheckSandboxUseCase, SandboxReport};
pub use release_package::{ReleaseOptions, ReleasePackageUseCase, ReleaseReport};
