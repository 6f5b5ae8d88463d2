pub mod release_config;
pub mod sandbox;

pub use release_config::{BuildSettings, ReleaseConfig, ReleaseConfigError, ReleaseDefaults};
pub use sandbox::Sandbox;
