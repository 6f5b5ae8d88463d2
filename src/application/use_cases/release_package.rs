use crate::common::error::ReleaseError;
use crate::common::result::{OptionExt, ReleaseResult, ResultExt};
use crate::domain::entities::release_config::{BuildSettings, ReleaseConfig};
use crate::domain::entities::sandbox::Sandbox;
use crate::domain::value_objects::dist_location::DistLocation;
use crate::domain::value_objects::release_version::ReleaseVersion;
use crate::domain::value_objects::scm_url::ScmUrl;
use crate::infrastructure::process::{CommandLine, Echo, ProcessRunner};
use crate::infrastructure::scm::{ScmError, SourceControlDriver};
use crate::infrastructure::upload::{IndexUploader, ScpUploader};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tempfile::TempDir;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Release settings, usually built from the configuration file and the
/// command line
#[derive(Debug, Clone)]
pub struct ReleaseOptions {
    /// Sandbox path or repository URL; the current directory when `None`
    pub source: Option<String>,
    pub commit: bool,
    pub tag: bool,
    pub upload: bool,
    pub push: bool,
    /// Allow development versions
    pub develop: bool,
    /// Keep the temporary checkout of a URL source
    pub keep_temp: bool,
    pub sign: bool,
    /// Run the build without echoing its output
    pub quiet: bool,
    pub identity: Option<String>,
    pub locations: Vec<DistLocation>,
    pub build: BuildSettings,
    /// Package name, instead of running the name command
    pub name: Option<String>,
    /// Package version, instead of running the version command
    pub version: Option<String>,
}

impl Default for ReleaseOptions {
    fn default() -> Self {
        Self::from_config(&ReleaseConfig::default())
    }
}

impl ReleaseOptions {
    /// Options taken from the configuration defaults
    ///
    /// Locations are not resolved here; see [`ReleaseOptions::with_locations`].
    pub fn from_config(config: &ReleaseConfig) -> Self {
        let defaults = &config.defaults;
        Self {
            source: None,
            commit: defaults.commit,
            tag: defaults.tag,
            upload: defaults.upload,
            push: defaults.push,
            develop: defaults.develop,
            keep_temp: false,
            sign: defaults.sign,
            quiet: defaults.quiet,
            identity: defaults.identity.clone(),
            locations: Vec::new(),
            build: config.build.clone(),
            name: None,
            version: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_commit(mut self, commit: bool) -> Self {
        self.commit = commit;
        self
    }

    pub fn with_tag(mut self, tag: bool) -> Self {
        self.tag = tag;
        self
    }

    pub fn with_upload(mut self, upload: bool) -> Self {
        self.upload = upload;
        self
    }

    pub fn with_push(mut self, push: bool) -> Self {
        self.push = push;
        self
    }

    pub fn with_develop(mut self, develop: bool) -> Self {
        self.develop = develop;
        self
    }

    pub fn with_keep_temp(mut self, keep_temp: bool) -> Self {
        self.keep_temp = keep_temp;
        self
    }

    pub fn with_sign(mut self, sign: bool) -> Self {
        self.sign = sign;
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    pub fn with_locations(mut self, locations: Vec<DistLocation>) -> Self {
        self.locations = locations;
        self
    }

    pub fn with_build(mut self, build: BuildSettings) -> Self {
        self.build = build;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// A dry run neither commits, tags nor uploads
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        if dry_run {
            self.commit = false;
            self.tag = false;
            self.upload = false;
        }
        self
    }
}

/// Outcome of a release
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseReport {
    pub name: String,
    pub version: String,
    pub source: String,
    pub sandbox: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_id: Option<String>,
    pub committed: bool,
    pub tagged: bool,
    /// Distribution file followed by its signature, if any
    pub artifacts: Vec<PathBuf>,
    pub uploaded_to: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Check, commit, tag, build, sign and upload a package
pub struct ReleasePackageUseCase {
    options: ReleaseOptions,
    scm: Arc<dyn SourceControlDriver>,
    process: Arc<dyn ProcessRunner>,
}

impl ReleasePackageUseCase {
    pub fn new(
        options: ReleaseOptions,
        scm: Arc<dyn SourceControlDriver>,
        process: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            options,
            scm,
            process,
        }
    }

    pub fn options(&self) -> &ReleaseOptions {
        &self.options
    }

    /// Run the release
    ///
    /// A temporary checkout is removed when this returns, whether the
    /// release succeeded or not, unless `keep_temp` is set.
    pub async fn execute(&self) -> ReleaseResult<ReleaseReport> {
        if self.options.upload && self.options.locations.is_empty() {
            return Err(ReleaseError::NoLocations);
        }

        let source = self.options.source.clone().unwrap_or_else(|| ".".to_string());
        let (sandbox, temp_dir) = self.prepare_sandbox(&source).await?;

        let result = self.release(&source, &sandbox).await;

        if let Some(temp_dir) = temp_dir {
            if self.options.keep_temp {
                let kept = temp_dir.keep();
                info!("Keeping {}", kept.display());
            } else {
                debug!("Removing {}", temp_dir.path().display());
                if let Err(e) = temp_dir.close() {
                    warn!("Failed to remove temporary checkout: {}", e);
                }
            }
        }

        result
    }

    async fn prepare_sandbox(&self, source: &str) -> ReleaseResult<(Sandbox, Option<TempDir>)> {
        if self.scm.is_valid_url(source) {
            let url = ScmUrl::new(source).map_err(ScmError::from)?;
            let temp_dir = tempfile::Builder::new()
                .prefix("mkrelease-")
                .tempdir()
                .with_filesystem_error("Failed to create temporary directory", None)?;

            info!("Checking out {}", url);
            self.scm.checkout_url(url.as_str(), temp_dir.path()).await?;

            return Ok((Sandbox::checked_out(temp_dir.path(), url), Some(temp_dir)));
        }

        let path = PathBuf::from(source);
        self.scm.check_valid_sandbox(&path).await?;
        Ok((Sandbox::new(path), None))
    }

    async fn release(&self, source: &str, sandbox: &Sandbox) -> ReleaseResult<ReleaseReport> {
        let options = &self.options;
        let dir = sandbox.path();

        // Nothing to commit into when the sandbox was checked out for this run
        let commit = options.commit && !sandbox.is_temporary();

        let name = self
            .package_info("name", options.name.as_deref(), &options.build.name_command, dir)
            .await?;
        let version = self
            .package_info(
                "version",
                options.version.as_deref(),
                &options.build.version_command,
                dir,
            )
            .await?;
        let version = ReleaseVersion::new(&version, options.develop)?;
        info!("Releasing {} {}", name, version);

        let tag_id = if options.tag {
            let tag_id = self.scm.get_tag_id(dir, version.as_str()).await?;
            self.scm.check_tag_exists(dir, &tag_id).await?;
            Some(tag_id)
        } else {
            None
        };

        let mut committed = false;
        if commit && self.scm.is_dirty_sandbox(dir).await {
            self.scm
                .checkin_sandbox(dir, &name, version.as_str(), options.push)
                .await?;
            committed = true;
        }
        self.scm.check_unclean_sandbox(dir).await?;

        let mut tagged = false;
        if let Some(tag_id) = &tag_id {
            self.scm
                .create_tag(dir, tag_id, &name, version.as_str(), options.push)
                .await?;
            tagged = true;
        }

        let mut artifacts = Vec::new();
        let mut uploaded_to = Vec::new();
        if options.upload {
            let distfile = self.build(sandbox).await?;
            artifacts.push(distfile.clone());

            if options.sign {
                artifacts.push(self.sign(&distfile).await?);
            }

            let uploader = ScpUploader::new(Arc::clone(&self.process)).with_base_dir(dir);
            let index_uploader =
                IndexUploader::new(Arc::clone(&self.process), &options.build.upload_command);
            for location in &options.locations {
                debug!("Uploading to {} via {}", location, location.transport());
                if location.is_file_server() {
                    for artifact in &artifacts {
                        uploader.upload(artifact, location).await?;
                    }
                } else {
                    index_uploader.upload(&artifacts, location.as_str()).await?;
                }
                uploaded_to.push(location.to_string());
            }
        }

        Ok(ReleaseReport {
            name,
            version: version.to_string(),
            source: source.to_string(),
            sandbox: dir.to_path_buf(),
            tag_id,
            committed,
            tagged,
            artifacts,
            uploaded_to,
            timestamp: Utc::now(),
        })
    }

    async fn package_info(
        &self,
        field: &str,
        given: Option<&str>,
        command: &str,
        dir: &Path,
    ) -> ReleaseResult<String> {
        if let Some(value) = given {
            return Ok(value.to_string());
        }

        let command_line = CommandLine::shell(command)?.with_working_directory(dir);
        let value = self.process.pipe(&command_line).await;
        let value = value.trim();
        if value.is_empty() {
            return Err(ReleaseError::package_info(
                field,
                format!("'{}' printed nothing", command),
            ));
        }

        debug!("Package {}: {}", field, value);
        Ok(value.to_string())
    }

    /// Run the build command and return the newest file in the dist directory
    async fn build(&self, sandbox: &Sandbox) -> ReleaseResult<PathBuf> {
        let build = &self.options.build;
        let echo = if self.options.quiet { Echo::Off } else { Echo::On };

        let command = CommandLine::shell(&build.command)?.with_working_directory(sandbox.path());
        let output = self.process.popen(&command, echo).await?;
        if !output.success() {
            return Err(ReleaseError::build_failed(
                output.error_summary(),
                build.command.clone(),
            ));
        }

        let dist_dir = sandbox.dist_dir(&build.dist_dir);
        let distfile = newest_distribution(&dist_dir)
            .ok_or_release(|| ReleaseError::no_distribution(&dist_dir))?;

        info!("Built {}", sandbox.display_relative(&distfile));
        Ok(distfile)
    }

    /// Create an ASCII-armored detached signature next to `distfile`
    async fn sign(&self, distfile: &Path) -> ReleaseResult<PathBuf> {
        let mut command = CommandLine::new("gpg").arg("--detach-sign").arg("--armor");
        if let Some(identity) = &self.options.identity {
            command = command.arg("--local-user").arg(identity.as_str());
        }
        let command = command.path_arg(distfile)?;

        let output = self.process.popen(&command, Echo::On).await?;
        if !output.success() {
            return Err(ReleaseError::sign_failed(output.error_summary()));
        }

        Ok(signature_path(distfile))
    }
}

/// Newest regular file directly inside `dist_dir`, ignoring signatures
pub fn newest_distribution(dist_dir: &Path) -> Option<PathBuf> {
    WalkDir::new(dist_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().map_or(true, |ext| ext != "asc"))
        .map(|entry| {
            let modified = entry
                .metadata()
                .ok()
                .and_then(|metadata| metadata.modified().ok())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, entry.into_path())
        })
        .max_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)))
        .map(|(_, path)| path)
}

/// `<distfile>.asc`
pub fn signature_path(distfile: &Path) -> PathBuf {
    let mut signature = distfile.as_os_str().to_owned();
    signature.push(".asc");
    PathBuf::from(signature)
}
