//! # mkrelease - release packages from Subversion
//!
//! `mkrelease` checks a Subversion sandbox for uncommitted changes, commits
//! and tags the release, builds the distribution and uploads it to scp or
//! sftp locations and package indexes.
//!
//! ## Quick Start
//!
//! 1. Describe the build and the upload locations in `~/.mkrelease.yaml`:
//!
//! ```yaml
//! defaults:
//!   dist_location: public
//! build:
//!   command: python setup.py sdist
//! aliases:
//!   public:
//!     - jarn.com:eggs
//! ```
//!
//! 2. Release from the sandbox:
//!
//! ```bash
//! mkrelease release
//! ```
//!
//! ## Architecture
//!
//! The crate is organized using clean architecture principles:
//!
//! - [`domain`]: Release configuration, sandboxes and value objects
//! - [`application`]: The release and check workflows
//! - [`infrastructure`]: Subversion driver, process execution, uploads and configuration files
//! - [`presentation`]: CLI interface and terminal output
//! - [`common`]: Shared error handling
//!
//! The source control driver is the [`infrastructure::scm::SourceControlDriver`]
//! trait; [`infrastructure::scm::SvnScm`] implements it by running `svn` through
//! an [`infrastructure::process::ProcessRunner`].
//!
//! ## Examples
//!
//! ```rust,no_run
//! use mkrelease::application::use_cases::release_package::{
//!     ReleaseOptions, ReleasePackageUseCase,
//! };
//! use mkrelease::domain::value_objects::ScmType;
//! use mkrelease::infrastructure::process::{CommandExecutor, ProcessRunner};
//! use mkrelease::infrastructure::scm::ScmFactory;
//! use std::sync::Arc;
//!
//! # async fn example() -> mkrelease::Result<()> {
//! let process: Arc<dyn ProcessRunner> = Arc::new(CommandExecutor::new());
//! let scm = ScmFactory::create_scm_with_process(ScmType::Svn, process.clone())?;
//!
//! let options = ReleaseOptions::default()
//!     .with_source("svn://svn.example.com/pkg/trunk")
//!     .with_dry_run(true);
//!
//! let report = ReleasePackageUseCase::new(options, scm, process)
//!     .execute()
//!     .await?;
//! println!("Would release {} {}", report.name, report.version);
//! # Ok(())
//! # }
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types for convenience
pub use crate::common::error::ReleaseError;
pub use crate::common::result::ReleaseResult as Result;
