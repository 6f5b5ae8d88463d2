use super::scm_interface::{ScmError, SourceControlDriver};
use super::svn_scm::SvnScm;
use crate::domain::value_objects::scm_type::ScmType;
use crate::infrastructure::process::ProcessRunner;
use std::sync::Arc;

/// Factory for creating source control drivers
pub struct ScmFactory;

impl ScmFactory {
    /// Create a driver that runs its executable through `process`
    pub fn create_scm_with_process(
        scm_type: ScmType,
        process: Arc<dyn ProcessRunner>,
    ) -> Result<Arc<dyn SourceControlDriver>, ScmError> {
        match scm_type {
            ScmType::Svn => Ok(Arc::new(SvnScm::new().with_process(process))),
        }
    }
}
