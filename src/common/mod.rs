//! Shared error handling

pub mod error;
pub mod result;

pub use error::ReleaseError;
pub use result::{OptionExt, ReleaseResult, ResultExt};
