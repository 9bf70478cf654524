//! Filesystem helpers for the scaffolding pipeline.
//! Writes are parent-creating, and template copies never overwrite an
//! existing destination so re-running the tool cannot clobber user edits.

use log::{debug, warn};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::replacer::{substitute, Replacements};

/// Result of a copy attempt against a destination that may already exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// The destination was absent and has been written
    Written,
    /// The destination already existed and was left untouched
    SkippedExisting,
}

/// Creates a directory and all of its missing ancestors.
pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
    fs::create_dir_all(path.as_ref()).map_err(Error::IoError)
}

pub fn read_text<P: AsRef<Path>>(path: P) -> Result<String> {
    fs::read_to_string(path.as_ref()).map_err(Error::IoError)
}

/// Writes `content` to `path`, creating missing parent directories first.
pub fn write_text<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(Error::IoError)?;
    }
    fs::write(path, content).map_err(Error::IoError)
}

/// Instantiates one template file.
///
/// Reads `source`, substitutes every token occurrence, and writes the result
/// to `target` only if the target does not already exist. An existing target
/// is a soft condition: it is logged as a warning and reported as
/// [`CopyOutcome::SkippedExisting`], never as an error.
pub fn copy_template_if_missing<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    target: Q,
    replacements: &Replacements,
) -> Result<CopyOutcome> {
    let source = source.as_ref();
    let target = target.as_ref();

    if target.exists() {
        warn!("Warning! File already exists: {}", target.display());
        return Ok(CopyOutcome::SkippedExisting);
    }

    debug!("Instantiating '{}' to '{}'", source.display(), target.display());
    let content = read_text(source)?;
    write_text(target, &substitute(&content, replacements))?;
    Ok(CopyOutcome::Written)
}
