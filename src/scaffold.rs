//! Scaffolding orchestrator.
//!
//! Drives the whole pipeline from one immutable [`CreateConfig`]: directory
//! setup, manifest initialization, layout creation, repository setup,
//! template instantiation, manifest merge, submodules, dependency install,
//! and the initial commit. Steps run strictly in that order and the first
//! hard failure aborts the rest; completed steps are never rolled back
//! because each of them is idempotent enough to converge on a re-run.

use indexmap::IndexSet;
use log::{debug, warn};
use std::env;
use std::path::{Path, PathBuf};

use crate::config::CreateConfig;
use crate::constants::MANIFEST_FILE;
use crate::error::{Error, Result};
use crate::filesystem::{copy_template_if_missing, ensure_dir};
use crate::git::{ensure_repository, Vcs};
use crate::installer::{InstallOptions, PackageManager, PackageManagerDriver};
use crate::manifest::{merge_if_changed, MergeOutcome};
use crate::replacer::Replacements;
use crate::submodule::ensure_submodule;

/// Values discovered while a run executes.
///
/// The configuration stays read-only for the whole run; everything resolved
/// along the way lives here and is passed explicitly to later steps.
struct RunState {
    /// Directory containing the manifest; every later step works in here
    package_dir: PathBuf,
    manifest_path: PathBuf,
    /// Package manager picked during manifest initialization
    manager: PackageManager,
}

/// Scaffolds a new package as described by `config`.
///
/// Re-running against the same directory is safe: existing files, an
/// existing repository and existing submodule paths are skipped with a
/// warning, and the manifest is only rewritten when the transform actually
/// changes it.
pub fn create_package(
    config: &CreateConfig,
    vcs: &dyn Vcs,
    installer: &dyn PackageManagerDriver,
) -> Result<()> {
    let root = resolve_root(config)?;
    let state = init_manifest(config, installer, root)?;
    create_layout(config, &state)?;
    ensure_repository(vcs, &state.package_dir)?;

    let replacements = Replacements::from_config(config);
    instantiate_templates(config, &state, &replacements)?;
    merge_manifest(config, &state)?;
    register_submodules(config, &state, vcs)?;
    install_dependencies(config, &state, installer)?;
    finalize_repository(config, &state, vcs)
}

/// Resolves the run root from the optional target directory and creates it.
fn resolve_root(config: &CreateConfig) -> Result<PathBuf> {
    let cwd = env::current_dir().map_err(Error::IoError)?;
    let root = match config.target_directory.as_deref() {
        Some(dir) => cwd.join(dir),
        None => cwd,
    };
    debug!("Scaffolding into {}", root.display());
    ensure_dir(&root)?;
    Ok(root)
}

/// Creates the initial manifest through the package-manager driver.
///
/// A manifest that is still absent afterwards aborts the run; every later
/// step depends on its location.
fn init_manifest(
    config: &CreateConfig,
    installer: &dyn PackageManagerDriver,
    root: PathBuf,
) -> Result<RunState> {
    let manager = installer.detect(&InstallOptions::for_directory(&root, config.preferred_manager));
    debug!("Initializing manifest with {}", manager);
    let options = InstallOptions::for_directory(&root, Some(manager));
    installer.init(manager, &config.init_args, &options)?;

    let manifest_path = root.join(MANIFEST_FILE);
    if !manifest_path.exists() {
        return Err(Error::ManifestMissingError {
            manifest_path: manifest_path.display().to_string(),
        });
    }
    let package_dir = manifest_path.parent().map(Path::to_path_buf).unwrap_or(root);
    Ok(RunState { package_dir, manifest_path, manager })
}

/// Creates every directory needed by the declared template targets.
fn create_layout(config: &CreateConfig, state: &RunState) -> Result<()> {
    let mut dirs: IndexSet<PathBuf> = IndexSet::new();
    for file in &config.files {
        collect_parent(&mut dirs, &state.package_dir, target_path(config, file));
    }
    if let Some(main_target) = config.main_source_file_name.as_deref() {
        collect_parent(&mut dirs, &state.package_dir, main_target);
    }
    for dir in &dirs {
        debug!("Creating directory {}", dir.display());
        ensure_dir(dir)?;
    }
    Ok(())
}

fn collect_parent(dirs: &mut IndexSet<PathBuf>, package_dir: &Path, target: &str) {
    if let Some(parent) = Path::new(target).parent() {
        if !parent.as_os_str().is_empty() {
            dirs.insert(package_dir.join(parent));
        }
    }
}

/// Target path for a template file, honoring the rename map.
fn target_path<'a>(config: &'a CreateConfig, file: &'a str) -> &'a str {
    config.rename_files.get(file).map(String::as_str).unwrap_or(file)
}

/// Instantiates the declared template files, then the main source file.
///
/// Existing targets are left alone so user edits survive a re-run.
fn instantiate_templates(
    config: &CreateConfig,
    state: &RunState,
    replacements: &Replacements,
) -> Result<()> {
    for file in &config.files {
        copy_template(config, state, replacements, file, target_path(config, file))?;
    }
    if let (Some(template), Some(target)) =
        (config.main_source_file_template.as_deref(), config.main_source_file_name.as_deref())
    {
        copy_template(config, state, replacements, template, target)?;
    }
    Ok(())
}

fn copy_template(
    config: &CreateConfig,
    state: &RunState,
    replacements: &Replacements,
    file: &str,
    target: &str,
) -> Result<()> {
    let source = config.templates_dir.join(file);
    let destination = state.package_dir.join(target);
    copy_template_if_missing(source, destination, replacements)?;
    Ok(())
}

/// Applies the configured manifest transform, writing only on change.
fn merge_manifest(config: &CreateConfig, state: &RunState) -> Result<()> {
    let outcome = merge_if_changed(&state.manifest_path, |manifest| {
        (config.manifest_transform)(manifest, config)
    })?;
    if outcome == MergeOutcome::Unchanged {
        warn!("Warning! No changes to {} detected", MANIFEST_FILE);
    }
    Ok(())
}

/// Registers the declared submodules one after another.
///
/// The registration file is a single shared resource, so descriptors are
/// processed strictly sequentially and the first failure stops the run.
/// Descriptors are identified by path; duplicates are ignored.
fn register_submodules(config: &CreateConfig, state: &RunState, vcs: &dyn Vcs) -> Result<()> {
    let mut seen: IndexSet<&str> = IndexSet::new();
    for sub in &config.git_submodules {
        if !seen.insert(sub.path.as_str()) {
            warn!("Warning! Duplicate submodule path ignored: {}", sub.path);
            continue;
        }
        ensure_submodule(vcs, &state.package_dir, sub)?;
    }
    Ok(())
}

/// Installs the declared dependencies in one driver call.
fn install_dependencies(
    config: &CreateConfig,
    state: &RunState,
    installer: &dyn PackageManagerDriver,
) -> Result<()> {
    debug!("Installing {} package(s) with {}", config.packages.len(), state.manager);
    let options = InstallOptions::for_directory(&state.package_dir, Some(state.manager));
    installer.install(&config.packages, &options)
}

/// Stages everything, commits when there is something to commit, and moves
/// the repository onto the configured branch.
fn finalize_repository(config: &CreateConfig, state: &RunState, vcs: &dyn Vcs) -> Result<()> {
    vcs.add_files(&state.package_dir, &["."])?;
    if vcs.staged_changes(&state.package_dir)? {
        vcs.commit(&state.package_dir, &config.git_commit_message)?;
    } else {
        warn!("Warning! Nothing staged; skipping commit");
    }
    vcs.rename_branch(&state.package_dir, &config.git_branch)
}
