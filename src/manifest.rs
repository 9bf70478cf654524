//! Manifest rewriting.
//!
//! The manifest is treated as an opaque JSON object: it is parsed, handed to
//! a caller-supplied transform, and written back only when the transform
//! actually changed something. Key order is preserved across the round trip.

use log::debug;
use serde_json::Value;
use std::path::Path;

use crate::error::{Error, Result};
use crate::filesystem::{read_text, write_text};

/// Result of a manifest merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The transformed manifest differed and was written back
    Applied,
    /// The transform was a no-op; the file was left untouched
    Unchanged,
}

/// Recursively merges `overlay` into `base`.
///
/// Objects merge key by key, with overlay keys winning on conflict; any
/// other pairing replaces the base value outright. Base keys keep their
/// original positions and new overlay keys are appended.
pub fn merge_values(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, value) in overlay_map {
                let entry = match merged.get(key) {
                    Some(existing) => merge_values(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), entry);
            }
            Value::Object(merged)
        }
        _ => overlay.clone(),
    }
}

/// Applies `transform` to the manifest at `path`, writing the result back
/// only when it differs from the current content.
///
/// A manifest that fails to parse, or whose root is not a JSON object, is
/// rejected without being modified.
pub fn merge_if_changed<F>(path: &Path, transform: F) -> Result<MergeOutcome>
where
    F: Fn(&Value) -> Value,
{
    let raw = read_text(path)?;
    let current: Value =
        serde_json::from_str(&raw).map_err(|err| Error::InvalidManifestError {
            manifest_path: path.display().to_string(),
            detail: err.to_string(),
        })?;
    if !current.is_object() {
        return Err(Error::InvalidManifestError {
            manifest_path: path.display().to_string(),
            detail: "the root value is not a JSON object".to_string(),
        });
    }

    let candidate = transform(&current);
    if candidate == current {
        debug!("Manifest {} is already up to date", path.display());
        return Ok(MergeOutcome::Unchanged);
    }

    let mut rendered = serde_json::to_string_pretty(&candidate)?;
    rendered.push('\n');
    write_text(path, &rendered)?;
    Ok(MergeOutcome::Applied)
}
