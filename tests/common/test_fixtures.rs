//! Test fixtures backed by a real Subversion repository
//!
//! The repository lives in a temporary directory and is reached through a
//! `file://` URL, so no server is needed. Tests that use it are marked
//! `#[ignore = "needs svn"]` and run with `cargo test -- --ignored`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Whether `svn` and `svnadmin` can be run
pub fn svn_available() -> bool {
    ["svn", "svnadmin"].iter().all(|tool| {
        Command::new(tool)
            .arg("--version")
            .arg("--quiet")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    })
}

/// A repository with a `pkg/{trunk,branches,tags}` layout and a trunk sandbox
pub struct SubversionSetup {
    temp_dir: TempDir,
    repo_url: String,
    sandbox: PathBuf,
}

impl SubversionSetup {
    /// Create the repository and check out trunk
    ///
    /// Panics when `svn` or `svnadmin` cannot be run.
    pub fn new() -> Self {
        assert!(svn_available(), "svn and svnadmin are required for this test");

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        let repo = root.join("repo");

        run("svnadmin", &["create", path_str(&repo)], &root);
        let repo_url = format!("file://{}", repo.display());

        run(
            "svn",
            &[
                "mkdir",
                "--non-interactive",
                "--parents",
                "-m",
                "Create layout",
                &format!("{}/pkg/trunk", repo_url),
                &format!("{}/pkg/branches", repo_url),
                &format!("{}/pkg/tags", repo_url),
            ],
            &root,
        );

        let sandbox = root.join("sandbox");
        run(
            "svn",
            &[
                "checkout",
                "--non-interactive",
                &format!("{}/pkg/trunk", repo_url),
                path_str(&sandbox),
            ],
            &root,
        );

        fs::write(sandbox.join("README.txt"), "pkg\n===\n").unwrap();
        fs::write(
            sandbox.join("setup.py"),
            "from setuptools import setup\nsetup(name='pkg', version='1.0')\n",
        )
        .unwrap();
        run("svn", &["add", "--non-interactive", "README.txt", "setup.py"], &sandbox);
        run(
            "svn",
            &["commit", "--non-interactive", "-m", "Add package files"],
            &sandbox,
        );
        run("svn", &["update", "--non-interactive"], &sandbox);

        Self {
            temp_dir,
            repo_url,
            sandbox,
        }
    }

    /// Root of the temporary directory holding the repository and sandbox
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn sandbox(&self) -> &Path {
        &self.sandbox
    }

    pub fn trunk_url(&self) -> String {
        format!("{}/pkg/trunk", self.repo_url)
    }

    pub fn tag_url(&self, version: &str) -> String {
        format!("{}/pkg/tags/{}", self.repo_url, version)
    }

    /// Change a tracked file
    pub fn modify_file(&self, name: &str) {
        let path = self.sandbox.join(name);
        let mut content = fs::read_to_string(&path).unwrap_or_default();
        content.push_str("changed\n");
        fs::write(path, content).unwrap();
    }

    /// Delete a tracked file from disk without telling svn
    pub fn remove_file(&self, name: &str) {
        fs::remove_file(self.sandbox.join(name)).unwrap();
    }

    /// Add a file svn does not know about
    pub fn add_unversioned_file(&self, name: &str) {
        fs::write(self.sandbox.join(name), "scratch\n").unwrap();
    }

    /// Create `tag_id` directly with svn
    pub fn create_tag(&self, version: &str) {
        run(
            "svn",
            &[
                "copy",
                "--non-interactive",
                "-m",
                "Tag by hand",
                &self.trunk_url(),
                &self.tag_url(version),
            ],
            self.root(),
        );
    }
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temporary paths are UTF-8")
}

fn run(program: &str, args: &[&str], dir: &Path) {
    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {}: {}", program, e));

    assert!(
        output.status.success(),
        "{} {:?} failed: {}",
        program,
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}
