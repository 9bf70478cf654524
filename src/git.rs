//! Version-control driver.
//!
//! Every operation is one blocking `git` subprocess with inherited terminal
//! I/O; the exit status is the only signal recovered, so callers decide
//! success or failure and nothing else. The trait seam exists so tests can
//! record calls without a real repository.

use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::constants::{GIT_DIR, GITMODULES_FILE};
use crate::error::{Error, Result};

/// Result of the idempotent repository initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    /// A fresh repository was created
    Initialized,
    /// A control directory already covers this path; nothing was done
    AlreadyInitialized(PathBuf),
}

/// Primitive version-control operations, each an atomic external call.
pub trait Vcs {
    /// Initializes a repository in `root`.
    fn init(&self, root: &Path) -> Result<()>;

    /// Stages the given paths.
    fn add_files(&self, root: &Path, paths: &[&str]) -> Result<()>;

    /// Commits staged changes with `message`.
    fn commit(&self, root: &Path, message: &str) -> Result<()>;

    /// Renames the current branch to `name`.
    fn rename_branch(&self, root: &Path, name: &str) -> Result<()>;

    /// Registers the repository at `url` as a submodule at `path`.
    fn add_submodule(&self, root: &Path, url: &str, path: &str) -> Result<()>;

    /// Sets the tracked branch of the submodule at `path`.
    fn set_submodule_branch(&self, root: &Path, path: &str, branch: &str) -> Result<()>;

    /// Reports whether anything is staged for commit.
    fn staged_changes(&self, root: &Path) -> Result<bool>;
}

/// Production implementation shelling out to the `git` binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCli;

impl GitCli {
    pub fn new() -> Self {
        Self
    }

    /// Runs one git command in `root` with inherited stdio.
    fn run(&self, root: &Path, args: &[&str]) -> Result<std::process::ExitStatus> {
        debug!("Running 'git {}' in {}", args.join(" "), root.display());
        Command::new("git").args(args).current_dir(root).status().map_err(|source| {
            Error::SpawnError { command: format!("git {}", args.join(" ")), source }
        })
    }

    fn run_checked(&self, root: &Path, args: &[&str]) -> Result<()> {
        let status = self.run(root, args)?;
        if !status.success() {
            return Err(Error::CommandError {
                command: format!("git {}", args.join(" ")),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

impl Vcs for GitCli {
    fn init(&self, root: &Path) -> Result<()> {
        self.run_checked(root, &["init"])
    }

    fn add_files(&self, root: &Path, paths: &[&str]) -> Result<()> {
        debug!("Adding files: {:?}", paths);
        let mut args = vec!["add"];
        args.extend_from_slice(paths);
        self.run_checked(root, &args)
    }

    fn commit(&self, root: &Path, message: &str) -> Result<()> {
        debug!("Committing with message: {}", message);
        self.run_checked(root, &["commit", "-m", message])
    }

    /// `git branch -M <name>`
    fn rename_branch(&self, root: &Path, name: &str) -> Result<()> {
        debug!("Renaming branch to: {}", name);
        self.run_checked(root, &["branch", "-M", name])
    }

    fn add_submodule(&self, root: &Path, url: &str, path: &str) -> Result<()> {
        self.run_checked(root, &["submodule", "add", url, path])
    }

    /// `git config -f .gitmodules submodule.<path>.branch <branch>`
    ///
    /// The key is scoped by the submodule's relative path, which is how the
    /// registration file names its sections.
    fn set_submodule_branch(&self, root: &Path, path: &str, branch: &str) -> Result<()> {
        let key = format!("submodule.{}.branch", path);
        self.run_checked(root, &["config", "-f", GITMODULES_FILE, &key, branch])
    }

    /// `git diff --cached --quiet`, interpreted by exit status alone:
    /// 0 means an empty stage, 1 means staged changes.
    fn staged_changes(&self, root: &Path) -> Result<bool> {
        let args = ["diff", "--cached", "--quiet"];
        let status = self.run(root, &args)?;
        match status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(Error::CommandError {
                command: format!("git {}", args.join(" ")),
                status: status.to_string(),
            }),
        }
    }
}

/// Walks upward from `start_path` looking for a version-control marker.
///
/// Returns the first directory containing a `.git` entry (directory or
/// file), or `None` once the filesystem root has been searched. Every
/// ancestor is visited exactly once, so the walk always terminates.
pub fn find_git_dir<P: AsRef<Path>>(start_path: P) -> Option<PathBuf> {
    for dir in start_path.as_ref().ancestors() {
        debug!("Searching for a git directory in {}", dir.display());
        if dir.join(GIT_DIR).exists() {
            return Some(dir.to_path_buf());
        }
    }
    None
}

/// Initializes a repository at `dir` unless one already covers it.
///
/// An existing control directory anywhere in the ancestry is a soft
/// condition: it is logged as a warning and reported as
/// [`InitOutcome::AlreadyInitialized`].
pub fn ensure_repository(vcs: &dyn Vcs, dir: &Path) -> Result<InitOutcome> {
    match find_git_dir(dir) {
        Some(existing) => {
            warn!("Warning! Git directory already exists: {}", existing.display());
            Ok(InitOutcome::AlreadyInitialized(existing))
        }
        None => {
            debug!("Creating git directory in {}", dir.display());
            vcs.init(dir)?;
            Ok(InitOutcome::Initialized)
        }
    }
}
