//! Run configuration.
//!
//! A run is driven by one immutable [`CreateConfig`] built up front from the
//! command line and the blueprint file found in the templates directory.
//! Nothing mutates the configuration after construction; values discovered
//! during the run live elsewhere.

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::cli::Args;
use crate::constants::{
    CONFIG_FILES, DEFAULT_BRANCH, DEFAULT_BUILD_DIR, DEFAULT_COMMIT_MESSAGE, DEFAULT_SOURCE_DIR,
};
use crate::error::{Error, Result};
use crate::filesystem::read_text;
use crate::installer::PackageManager;
use crate::manifest::merge_values;
use crate::replacer::{substitute_value, Replacements};

/// Pure manifest rewrite: current manifest in, candidate manifest out.
pub type ManifestTransform = Box<dyn Fn(&Value, &CreateConfig) -> Value>;

/// One submodule to register: where it comes from, where it mounts, and
/// which branch it tracks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmoduleConfig {
    pub url: String,
    pub path: String,
    #[serde(default)]
    pub branch: Option<String>,
}

/// Blueprint file as written by template authors.
///
/// Lives at the root of a templates directory under one of the
/// [`CONFIG_FILES`] names. Every key is optional; unknown keys are rejected
/// so typos surface instead of being silently dropped.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Blueprint {
    pub preferred_package_system: Option<PackageManager>,
    pub git_organization: Option<String>,
    pub organization_name: Option<String>,
    pub organization_email: Option<String>,
    pub source_dir: Option<String>,
    pub build_dir: Option<String>,
    pub main_source_file_template: Option<String>,
    pub git_commit_message: Option<String>,
    pub git_branch: Option<String>,
    pub files: Vec<String>,
    pub rename_files: IndexMap<String, String>,
    pub packages: Vec<String>,
    pub git_submodules: Vec<SubmoduleConfig>,
    pub manifest: Option<Value>,
}

/// Fully-resolved input for one scaffolding run.
pub struct CreateConfig {
    /// Package manager to use, when forced by the user or the blueprint
    pub preferred_manager: Option<PackageManager>,
    pub git_organization: String,
    pub organization_name: String,
    pub organization_email: String,
    /// Source directory name, relative to the package root
    pub source_dir: String,
    /// Build output directory name, relative to the package root
    pub build_dir: String,
    /// Absolute path of the templates directory
    pub templates_dir: PathBuf,
    /// Package name, taken from the target directory name
    pub main_name: String,
    /// Template for the main source file, relative to the templates directory
    pub main_source_file_template: Option<String>,
    /// Target path of the main source file, relative to the package root
    pub main_source_file_name: Option<String>,
    /// Template files to instantiate, relative to the templates directory
    pub files: Vec<String>,
    /// Template path to target path overrides
    pub rename_files: IndexMap<String, String>,
    /// Dependencies to install
    pub packages: Vec<String>,
    pub git_submodules: Vec<SubmoduleConfig>,
    pub git_commit_message: String,
    pub git_branch: String,
    /// Directory name given on the command line, if any
    pub target_directory: Option<String>,
    /// Flags forwarded verbatim to the manifest initialization subprocess
    pub init_args: Vec<String>,
    pub manifest_transform: ManifestTransform,
}

impl CreateConfig {
    /// Builds the configuration from parsed command-line arguments,
    /// resolving paths against the process working directory.
    pub fn from_args(args: &Args) -> Result<Self> {
        let cwd = env::current_dir().map_err(Error::IoError)?;
        Self::resolve(args, &cwd)
    }

    /// Same as [`CreateConfig::from_args`] with an explicit base directory.
    pub fn resolve(args: &Args, cwd: &Path) -> Result<Self> {
        let templates_dir = if args.template.is_absolute() {
            args.template.clone()
        } else {
            cwd.join(&args.template)
        };
        let blueprint = load_blueprint(&templates_dir)?;

        let target_directory = args.project_directory().map(str::to_string);
        let main_name = match target_directory.as_deref() {
            Some(dir) => dir_basename(Path::new(dir)),
            None => dir_basename(cwd),
        };
        let source_dir = blueprint.source_dir.unwrap_or_else(|| DEFAULT_SOURCE_DIR.to_string());
        let build_dir = blueprint.build_dir.unwrap_or_else(|| DEFAULT_BUILD_DIR.to_string());
        let main_source_file_name = blueprint
            .main_source_file_template
            .as_deref()
            .map(|template| main_source_target(&source_dir, &main_name, template));
        let manifest_transform = match blueprint.manifest {
            Some(overlay) => overlay_transform(overlay),
            None => identity_transform(),
        };

        Ok(Self {
            preferred_manager: args.manager.or(blueprint.preferred_package_system),
            git_organization: blueprint.git_organization.unwrap_or_default(),
            organization_name: blueprint.organization_name.unwrap_or_default(),
            organization_email: blueprint.organization_email.unwrap_or_default(),
            source_dir,
            build_dir,
            templates_dir,
            main_name,
            main_source_file_template: blueprint.main_source_file_template,
            main_source_file_name,
            files: blueprint.files,
            rename_files: blueprint.rename_files,
            packages: blueprint.packages,
            git_submodules: blueprint.git_submodules,
            git_commit_message: blueprint
                .git_commit_message
                .unwrap_or_else(|| DEFAULT_COMMIT_MESSAGE.to_string()),
            git_branch: blueprint.git_branch.unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            target_directory,
            init_args: args.init_args(),
            manifest_transform,
        })
    }
}

impl Default for CreateConfig {
    fn default() -> Self {
        Self {
            preferred_manager: None,
            git_organization: String::new(),
            organization_name: String::new(),
            organization_email: String::new(),
            source_dir: DEFAULT_SOURCE_DIR.to_string(),
            build_dir: DEFAULT_BUILD_DIR.to_string(),
            templates_dir: PathBuf::new(),
            main_name: String::new(),
            main_source_file_template: None,
            main_source_file_name: None,
            files: Vec::new(),
            rename_files: IndexMap::new(),
            packages: Vec::new(),
            git_submodules: Vec::new(),
            git_commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
            git_branch: DEFAULT_BRANCH.to_string(),
            target_directory: None,
            init_args: Vec::new(),
            manifest_transform: identity_transform(),
        }
    }
}

impl fmt::Debug for CreateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateConfig")
            .field("preferred_manager", &self.preferred_manager)
            .field("git_organization", &self.git_organization)
            .field("organization_name", &self.organization_name)
            .field("organization_email", &self.organization_email)
            .field("source_dir", &self.source_dir)
            .field("build_dir", &self.build_dir)
            .field("templates_dir", &self.templates_dir)
            .field("main_name", &self.main_name)
            .field("main_source_file_template", &self.main_source_file_template)
            .field("main_source_file_name", &self.main_source_file_name)
            .field("files", &self.files)
            .field("rename_files", &self.rename_files)
            .field("packages", &self.packages)
            .field("git_submodules", &self.git_submodules)
            .field("git_commit_message", &self.git_commit_message)
            .field("git_branch", &self.git_branch)
            .field("target_directory", &self.target_directory)
            .field("init_args", &self.init_args)
            .field("manifest_transform", &"<transform>")
            .finish()
    }
}

/// Finds and parses the blueprint in `templates_dir`.
///
/// The first existing [`CONFIG_FILES`] candidate wins; a templates
/// directory without any blueprint is a configuration error.
pub fn load_blueprint(templates_dir: &Path) -> Result<Blueprint> {
    for name in CONFIG_FILES {
        let candidate = templates_dir.join(name);
        if candidate.exists() {
            debug!("Loading blueprint from {}", candidate.display());
            let content = read_text(&candidate)?;
            return parse_blueprint(&content).map_err(|err| match err {
                Error::ConfigError(msg) => {
                    Error::ConfigError(format!("{}: {}", candidate.display(), msg))
                }
                other => other,
            });
        }
    }
    Err(Error::ConfigError(format!(
        "no blueprint found in {} (expected one of {})",
        templates_dir.display(),
        CONFIG_FILES.join(", ")
    )))
}

/// Parses blueprint content, accepting JSON first and YAML as a fallback.
pub fn parse_blueprint(content: &str) -> Result<Blueprint> {
    match serde_json::from_str(content) {
        Ok(blueprint) => Ok(blueprint),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|err| Error::ConfigError(format!("invalid blueprint: {}", err))),
    }
}

/// Target path for the main source file: the template's extension carried
/// over onto the package name, inside the source directory.
fn main_source_target(source_dir: &str, main_name: &str, template: &str) -> String {
    match Path::new(template).extension() {
        Some(ext) => format!("{}/{}.{}", source_dir, main_name, ext.to_string_lossy()),
        None => format!("{}/{}", source_dir, main_name),
    }
}

fn dir_basename(path: &Path) -> String {
    path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default()
}

fn identity_transform() -> ManifestTransform {
    Box::new(|manifest, _| manifest.clone())
}

/// Standard blueprint transform: run token substitution over the overlay,
/// then merge it on top of the current manifest.
fn overlay_transform(overlay: Value) -> ManifestTransform {
    Box::new(move |manifest, config| {
        let replacements = Replacements::from_config(config);
        let resolved = substitute_value(&overlay, &replacements);
        merge_values(manifest, &resolved)
    })
}
