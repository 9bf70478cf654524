//! Submodule registration.

use log::{debug, warn};
use std::path::Path;

use crate::config::SubmoduleConfig;
use crate::constants::DEFAULT_BRANCH;
use crate::error::Result;
use crate::filesystem::ensure_dir;
use crate::git::Vcs;

/// Result of registering one submodule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmoduleOutcome {
    /// The submodule was added to the repository
    Registered,
    /// The mount path already exists; registration was skipped
    AlreadyPresent,
}

/// Registers `sub` under `root`, skipping the add when its mount path is
/// already occupied.
///
/// The tracked branch is recorded in both cases so the registration file
/// stays authoritative even for pre-existing checkouts. A missing `branch`
/// falls back to the default branch name.
pub fn ensure_submodule(
    vcs: &dyn Vcs,
    root: &Path,
    sub: &SubmoduleConfig,
) -> Result<SubmoduleOutcome> {
    let mount = root.join(&sub.path);
    if let Some(parent) = mount.parent() {
        ensure_dir(parent)?;
    }

    let outcome = if mount.exists() {
        warn!("Warning! Submodule path already exists: {}", mount.display());
        SubmoduleOutcome::AlreadyPresent
    } else {
        debug!("Adding submodule {} at {}", sub.url, sub.path);
        vcs.add_submodule(root, &sub.url, &sub.path)?;
        SubmoduleOutcome::Registered
    };

    let branch = sub.branch.as_deref().unwrap_or(DEFAULT_BRANCH);
    vcs.set_submodule_branch(root, &sub.path, branch)?;
    Ok(outcome)
}
