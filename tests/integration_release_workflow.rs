//! Release workflow against a real repository, with uploads intercepted

#[macro_use]
mod common;

use common::mock_services::{CannedProcess, RecordingProcess};
use common::test_fixtures::SubversionSetup;
use mkrelease::application::use_cases::release_package::{ReleaseOptions, ReleasePackageUseCase};
use mkrelease::domain::entities::release_config::BuildSettings;
use mkrelease::domain::value_objects::DistLocation;
use mkrelease::infrastructure::process::ProcessRunner;
use mkrelease::infrastructure::scm::{ScmError, SourceControlDriver, SvnScm};
use mkrelease::ReleaseError;
use std::sync::Arc;

fn build_settings() -> BuildSettings {
    BuildSettings {
        command: "mkdir -p dist && printf sdist > dist/pkg-1.0.tar.gz".to_string(),
        dist_dir: "dist".to_string(),
        name_command: "echo pkg".to_string(),
        version_command: "echo 1.0".to_string(),
        ..BuildSettings::default()
    }
}

fn release(
    options: ReleaseOptions,
    process: Arc<RecordingProcess>,
) -> (ReleasePackageUseCase, Arc<dyn SourceControlDriver>) {
    let runner: Arc<dyn ProcessRunner> = process;
    let scm: Arc<dyn SourceControlDriver> = Arc::new(SvnScm::new().with_process(runner.clone()));
    (ReleasePackageUseCase::new(options, scm.clone(), runner), scm)
}

fn options_for(source: &str) -> ReleaseOptions {
    ReleaseOptions::default()
        .with_source(source)
        .with_build(build_settings())
        .with_locations(vec![DistLocation::parse("jarn.com:eggs").unwrap()])
}

#[cfg(unix)]
#[tokio::test]
#[ignore = "needs svn"]
async fn test_release_commits_tags_and_uploads() {
    let svn = SubversionSetup::new();
    svn.modify_file("README.txt");

    let process = Arc::new(RecordingProcess::new());
    let source = svn.sandbox().display().to_string();
    let (use_case, scm) = release(options_for(&source), process.clone());

    let report = use_case.execute().await.unwrap();

    assert_eq!(report.name, "pkg");
    assert_eq!(report.version, "1.0");
    assert!(report.committed);
    assert!(report.tagged);
    assert_eq!(report.tag_id.as_deref(), Some(svn.tag_url("1.0").as_str()));
    assert!(scm.tag_exists(svn.sandbox(), &svn.tag_url("1.0")).await);
    assert!(!scm.is_dirty_sandbox(svn.sandbox()).await);

    let distfile = svn.sandbox().join("dist").join("pkg-1.0.tar.gz");
    assert_eq!(report.artifacts, vec![distfile.clone()]);

    let uploads = process.calls_to("scp");
    assert_eq!(uploads.len(), 1);
    assert_eq!(
        uploads[0].arguments(),
        [distfile.display().to_string(), "jarn.com:eggs".to_string()]
    );
}

#[cfg(unix)]
#[tokio::test]
#[ignore = "needs svn"]
async fn test_release_to_package_index() {
    let svn = SubversionSetup::new();

    let process = Arc::new(RecordingProcess::new());
    let source = svn.sandbox().display().to_string();
    let options = options_for(&source)
        .with_tag(false)
        .with_locations(vec![DistLocation::index("pypi")]);
    let (use_case, _) = release(options, process.clone());

    let report = use_case.execute().await.unwrap();

    let distfile = svn.sandbox().join("dist").join("pkg-1.0.tar.gz");
    let uploads = process.calls_to("twine");
    assert_eq!(uploads.len(), 1);
    assert_eq!(
        uploads[0].arguments(),
        [
            "upload".to_string(),
            "-r".to_string(),
            "pypi".to_string(),
            distfile.display().to_string()
        ]
    );
    assert!(process.calls_to("scp").is_empty());
    assert_eq!(report.uploaded_to, vec!["pypi".to_string()]);
}

#[cfg(unix)]
#[tokio::test]
#[ignore = "needs svn"]
async fn test_existing_tag_aborts_before_commit() {
    let svn = SubversionSetup::new();
    svn.create_tag("1.0");
    svn.modify_file("README.txt");

    let process = Arc::new(RecordingProcess::new());
    let source = svn.sandbox().display().to_string();
    let (use_case, scm) = release(options_for(&source), process.clone());

    let error = use_case.execute().await.unwrap_err();

    assert!(matches!(error, ReleaseError::Scm(ScmError::TagExists { .. })));
    assert!(scm.is_dirty_sandbox(svn.sandbox()).await);
    assert!(process.calls().is_empty());
    assert!(!svn.sandbox().join("dist").exists());
}

#[cfg(unix)]
#[tokio::test]
#[ignore = "needs svn"]
async fn test_missing_file_aborts_before_tagging() {
    let svn = SubversionSetup::new();
    svn.remove_file("setup.py");

    let process = Arc::new(RecordingProcess::new());
    let source = svn.sandbox().display().to_string();
    let (use_case, scm) = release(options_for(&source), process.clone());

    assert_err_contains!(use_case.execute().await, "Uncommitted changes in");
    assert!(!scm.tag_exists(svn.sandbox(), &svn.tag_url("1.0")).await);
}

#[cfg(unix)]
#[tokio::test]
#[ignore = "needs svn"]
async fn test_dry_run_changes_nothing() {
    let svn = SubversionSetup::new();
    svn.modify_file("README.txt");

    let process = Arc::new(RecordingProcess::new());
    let source = svn.sandbox().display().to_string();
    let (use_case, scm) = release(options_for(&source).with_dry_run(true), process.clone());

    assert_err_contains!(use_case.execute().await, "Uncommitted changes in");
    assert!(scm.is_dirty_sandbox(svn.sandbox()).await);
    assert!(!scm.tag_exists(svn.sandbox(), &svn.tag_url("1.0")).await);
    assert!(process.calls().is_empty());
}

#[cfg(unix)]
#[tokio::test]
#[ignore = "needs svn"]
async fn test_release_from_url_uses_temporary_checkout() {
    let svn = SubversionSetup::new();

    let process = Arc::new(RecordingProcess::new());
    let (use_case, scm) = release(
        options_for(&svn.trunk_url()).with_sign(true),
        process.clone(),
    );

    let report = use_case.execute().await.unwrap();

    assert!(!report.committed);
    assert!(report.tagged);
    assert!(scm.tag_exists(svn.sandbox(), &svn.tag_url("1.0")).await);
    assert_not_exists!(report.sandbox);
    assert_eq!(report.artifacts.len(), 2);
    assert_eq!(process.calls_to("gpg").len(), 1);
    assert_eq!(process.calls_to("scp").len(), 2);
}

#[cfg(unix)]
#[tokio::test]
#[ignore = "needs svn"]
async fn test_keep_temp_leaves_checkout() {
    let svn = SubversionSetup::new();

    let process = Arc::new(RecordingProcess::new());
    let options = options_for(&svn.trunk_url())
        .with_tag(false)
        .with_upload(false)
        .with_keep_temp(true);
    let (use_case, _) = release(options, process);

    let report = use_case.execute().await.unwrap();

    assert_dir_exists!(report.sandbox.join(".svn"));
    std::fs::remove_dir_all(&report.sandbox).unwrap();
}

#[tokio::test]
async fn test_failed_checkout_is_reported() {
    let process: Arc<dyn ProcessRunner> = Arc::new(
        CannedProcess::new().with_failure("svn", "checkout", "svn: E170013: Unable to connect"),
    );
    let scm: Arc<dyn SourceControlDriver> = Arc::new(SvnScm::new().with_process(process.clone()));

    let options = options_for("svn://svn.example.com/pkg/trunk").with_dry_run(true);
    let result = ReleasePackageUseCase::new(options, scm, process)
        .execute()
        .await;

    assert_err_contains!(result, "Checkout failed");
}

#[tokio::test]
async fn test_upload_needs_a_location() {
    let process: Arc<dyn ProcessRunner> = Arc::new(CannedProcess::new());
    let scm: Arc<dyn SourceControlDriver> = Arc::new(SvnScm::new().with_process(process.clone()));

    let options = ReleaseOptions::default().with_source("svn://svn.example.com/pkg/trunk");
    let result = ReleasePackageUseCase::new(options, scm, process)
        .execute()
        .await;

    assert!(matches!(result, Err(ReleaseError::NoLocations)));
}
