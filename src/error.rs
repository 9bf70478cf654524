//! Error handling for the Sprout application.
//! Defines custom error types and results used throughout the application.

use std::io;
use thiserror::Error;

/// Custom error types for Sprout operations.
///
/// Every variant aborts the scaffolding pipeline when it surfaces. Expected
/// soft conditions (an existing target file, an unchanged manifest, an
/// already-registered submodule) are modeled as outcome enums in their own
/// modules, not as error variants.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Represents errors that occur while serializing manifest documents
    #[error("JSON error: {0}.")]
    JsonError(#[from] serde_json::Error),

    /// Represents errors in the blueprint or command-line configuration
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// The package manager's init finished without producing a manifest
    #[error("Manifest '{manifest_path}' was not created by the package manager init.")]
    ManifestMissingError { manifest_path: String },

    /// The manifest exists but is not a well-formed JSON object
    #[error("Invalid manifest '{manifest_path}': {detail}.")]
    InvalidManifestError { manifest_path: String, detail: String },

    /// An external command ran and exited with a non-zero status
    #[error("Command '{command}' failed with {status}.")]
    CommandError { command: String, status: String },

    /// An external command could not be started at all
    #[error("Command '{command}' could not be started: {source}.")]
    SpawnError { command: String, source: io::Error },
}

/// Convenience type alias for Results with Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{}", err);
    std::process::exit(1);
}
