pub mod dist_location;
pub mod release_version;
pub mod scm_type;
pub mod scm_url;

pub use dist_location::{DistLocation, DistLocationError};
pub use release_version::{ReleaseVersion, ReleaseVersionError};
pub use scm_type::ScmType;
pub use scm_url::{RepositoryLayout, ScmUrl, ScmUrlError};
