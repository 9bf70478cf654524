//! Sprout scaffolds a new source package from an organization's standard
//! template: it creates the directory, initializes the package manifest,
//! instantiates templates with token substitution, brings the result under
//! version control with submodules, installs dependencies, and produces the
//! initial commit on a named branch.

/// Command-line interface for the Sprout binary
pub mod cli;

/// Run configuration
/// Built once from the CLI arguments and the blueprint file
/// (sprout.json, sprout.yml, sprout.yaml)
pub mod config;

/// Well-known file names and default values
pub mod constants;

/// Error types and handling for the Sprout application
pub mod error;

/// Filesystem primitives and template-aware file copying
pub mod filesystem;

/// Version-control driver wrapping git subprocess calls
pub mod git;

/// Package-manager driver wrapping npm and yarn
pub mod installer;

/// Logger initialization
pub mod logger;

/// Manifest loading, merging and conditional write-back
pub mod manifest;

/// Token substitution over template text
pub mod replacer;

/// Core scaffolding orchestration
/// Drives all other components through the pipeline in a fixed order
pub mod scaffold;

/// Submodule registration with skip-if-present semantics
pub mod submodule;
