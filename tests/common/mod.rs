//! Shared test utilities: recording fakes for the external drivers and
//! small filesystem helpers used across the integration tests.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;

use sprout::constants::{GIT_DIR, MANIFEST_FILE};
use sprout::error::{Error, Result};
use sprout::git::Vcs;
use sprout::installer::{InstallOptions, PackageManager, PackageManagerDriver};

/// One recorded version-control operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcsCall {
    Init,
    AddFiles(Vec<String>),
    Commit(String),
    RenameBranch(String),
    AddSubmodule { url: String, path: String },
    SetSubmoduleBranch { path: String, branch: String },
}

/// Version-control fake that records every call instead of spawning git.
pub struct RecordingVcs {
    pub calls: RefCell<Vec<VcsCall>>,
    /// Submodule path whose registration should fail
    pub fail_on_submodule: RefCell<Option<String>>,
    /// Answer returned by `staged_changes`
    pub staged: Cell<bool>,
}

impl RecordingVcs {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail_on_submodule: RefCell::new(None),
            staged: Cell::new(true),
        }
    }

    pub fn failing_on_submodule(path: &str) -> Self {
        let vcs = Self::new();
        *vcs.fail_on_submodule.borrow_mut() = Some(path.to_string());
        vcs
    }

    pub fn recorded(&self) -> Vec<VcsCall> {
        self.calls.borrow().clone()
    }

    pub fn count_submodule_adds(&self) -> usize {
        self.calls.borrow().iter().filter(|c| matches!(c, VcsCall::AddSubmodule { .. })).count()
    }

    pub fn count_branch_configs(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, VcsCall::SetSubmoduleBranch { .. }))
            .count()
    }

    fn record(&self, call: VcsCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl Vcs for RecordingVcs {
    fn init(&self, _root: &Path) -> Result<()> {
        self.record(VcsCall::Init);
        Ok(())
    }

    fn add_files(&self, _root: &Path, paths: &[&str]) -> Result<()> {
        self.record(VcsCall::AddFiles(paths.iter().map(|p| p.to_string()).collect()));
        Ok(())
    }

    fn commit(&self, _root: &Path, message: &str) -> Result<()> {
        self.record(VcsCall::Commit(message.to_string()));
        Ok(())
    }

    fn rename_branch(&self, _root: &Path, name: &str) -> Result<()> {
        self.record(VcsCall::RenameBranch(name.to_string()));
        Ok(())
    }

    fn add_submodule(&self, _root: &Path, url: &str, path: &str) -> Result<()> {
        if self.fail_on_submodule.borrow().as_deref() == Some(path) {
            return Err(Error::CommandError {
                command: format!("git submodule add {} {}", url, path),
                status: "exit status: 1".to_string(),
            });
        }
        self.record(VcsCall::AddSubmodule { url: url.to_string(), path: path.to_string() });
        Ok(())
    }

    fn set_submodule_branch(&self, _root: &Path, path: &str, branch: &str) -> Result<()> {
        self.record(VcsCall::SetSubmoduleBranch {
            path: path.to_string(),
            branch: branch.to_string(),
        });
        Ok(())
    }

    fn staged_changes(&self, _root: &Path) -> Result<bool> {
        Ok(self.staged.get())
    }
}

/// Package-manager fake. `init` writes a minimal manifest so the pipeline's
/// precondition holds without running a real npm.
pub struct RecordingInstaller {
    pub init_calls: RefCell<Vec<Vec<String>>>,
    pub install_calls: RefCell<Vec<Vec<String>>>,
    /// When false, `init` leaves no manifest behind
    pub write_manifest: Cell<bool>,
}

impl RecordingInstaller {
    pub fn new() -> Self {
        Self {
            init_calls: RefCell::new(Vec::new()),
            install_calls: RefCell::new(Vec::new()),
            write_manifest: Cell::new(true),
        }
    }

    pub fn without_manifest() -> Self {
        let installer = Self::new();
        installer.write_manifest.set(false);
        installer
    }
}

impl PackageManagerDriver for RecordingInstaller {
    fn detect(&self, options: &InstallOptions) -> PackageManager {
        options.prefer.unwrap_or(PackageManager::Npm)
    }

    fn init(
        &self,
        _manager: PackageManager,
        extra_args: &[String],
        options: &InstallOptions,
    ) -> Result<()> {
        self.init_calls.borrow_mut().push(extra_args.to_vec());
        let manifest = options.cwd.join(MANIFEST_FILE);
        if self.write_manifest.get() && !manifest.exists() {
            fs::write(&manifest, "{\n  \"name\": \"demo\",\n  \"version\": \"1.0.0\"\n}\n")
                .unwrap();
        }
        Ok(())
    }

    fn install(&self, packages: &[String], _options: &InstallOptions) -> Result<()> {
        self.install_calls.borrow_mut().push(packages.to_vec());
        Ok(())
    }
}

/// Sets the commit identity through the environment so commits succeed on
/// machines without a global git configuration.
pub fn init_git_identity() {
    env::set_var("GIT_AUTHOR_NAME", "Sprout Tests");
    env::set_var("GIT_AUTHOR_EMAIL", "tests@example.com");
    env::set_var("GIT_COMMITTER_NAME", "Sprout Tests");
    env::set_var("GIT_COMMITTER_EMAIL", "tests@example.com");
}

/// Lays out a templates directory: a `sprout.json` blueprint plus template
/// files given as (relative path, content) pairs.
pub fn write_templates(dir: &Path, blueprint: &str, files: &[(&str, &str)]) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("sprout.json"), blueprint).unwrap();
    for (name, content) in files {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
}

/// Copies a directory tree, leaving version-control metadata out.
pub fn copy_dir_without_git(src: &Path, dst: &Path) {
    fs::create_dir_all(dst).unwrap();
    for entry in fs::read_dir(src).unwrap() {
        let entry = entry.unwrap();
        if entry.file_name() == GIT_DIR {
            continue;
        }
        let target = dst.join(entry.file_name());
        if entry.file_type().unwrap().is_dir() {
            copy_dir_without_git(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), &target).unwrap();
        }
    }
}

pub fn commit_count(repo: &Path) -> usize {
    let output = Command::new("git")
        .args(["rev-list", "--count", "HEAD"])
        .current_dir(repo)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git rev-list failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().parse().unwrap()
}

pub fn head_ref(repo: &Path) -> String {
    fs::read_to_string(repo.join(GIT_DIR).join("HEAD")).unwrap().trim().to_string()
}
