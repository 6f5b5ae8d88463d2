//! Source control drivers
//!
//! [`SourceControlDriver`] is the contract the release workflow works
//! against; [`SvnScm`] implements it on top of the `svn` command line client.

pub mod scm_factory;
pub mod scm_interface;
pub mod svn_scm;
pub mod svn_status;

pub use scm_factory::ScmFactory;
pub use scm_interface::{ChangeKind, SandboxStatus, ScmError, SourceControlDriver, StatusEntry};
pub use svn_scm::SvnScm;
