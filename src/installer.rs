//! Package-manager driver.
//!
//! Wraps `npm` and `yarn` behind one interface: pick a manager, initialize a
//! manifest, install dependencies. Flag spelling differs per manager and is
//! normalized here from the neutral [`InstallOptions`] fields.

use clap::ValueEnum;
use log::debug;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::str::FromStr;

use crate::constants::{NPM_LOCK_FILE, YARN_LOCK_FILE};
use crate::error::{Error, Result};

/// Supported package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Npm,
    Yarn,
}

impl PackageManager {
    /// Name of the executable to spawn.
    pub fn command(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

impl FromStr for PackageManager {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "npm" => Ok(PackageManager::Npm),
            "yarn" => Ok(PackageManager::Yarn),
            other => Err(Error::ConfigError(format!("unknown package manager '{}'", other))),
        }
    }
}

/// Where subprocess output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Pass stdout and stderr through to the invoking terminal
    Inherit,
    /// Discard all subprocess output
    Quiet,
}

impl OutputMode {
    fn stdio(self) -> (Stdio, Stdio) {
        match self {
            OutputMode::Inherit => (Stdio::inherit(), Stdio::inherit()),
            OutputMode::Quiet => (Stdio::null(), Stdio::null()),
        }
    }
}

/// Neutral install parameters, translated to manager-specific flags.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    pub dev: bool,
    pub exact: bool,
    pub no_save: bool,
    pub bundle: bool,
    pub verbose: bool,
    pub global: bool,
    pub prefer: Option<PackageManager>,
    pub output: OutputMode,
    pub cwd: PathBuf,
}

impl InstallOptions {
    /// Plain options for running inside `cwd`, every flag off.
    pub fn for_directory<P: Into<PathBuf>>(cwd: P, prefer: Option<PackageManager>) -> Self {
        Self {
            dev: false,
            exact: false,
            no_save: false,
            bundle: false,
            verbose: false,
            global: false,
            prefer,
            output: OutputMode::Inherit,
            cwd: cwd.into(),
        }
    }
}

/// Manager selection, manifest initialization and dependency installation.
pub trait PackageManagerDriver {
    /// Picks the manager to use for `options`. Never fails; there is always
    /// a fallback answer.
    fn detect(&self, options: &InstallOptions) -> PackageManager;

    /// Runs `<manager> init` with `extra_args` appended verbatim.
    fn init(&self, manager: PackageManager, extra_args: &[String], options: &InstallOptions)
        -> Result<()>;

    /// Installs `packages`, or runs a bare install when the list is empty.
    fn install(&self, packages: &[String], options: &InstallOptions) -> Result<()>;
}

/// Production driver spawning the real `npm` and `yarn` binaries.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPackageManager;

impl SystemPackageManager {
    pub fn new() -> Self {
        Self
    }
}

impl PackageManagerDriver for SystemPackageManager {
    /// Resolution order: explicit preference, then lockfiles in the working
    /// directory, then a `yarn --version` probe, then npm.
    fn detect(&self, options: &InstallOptions) -> PackageManager {
        if let Some(manager) = options.prefer {
            debug!("Using preferred package manager: {}", manager);
            return manager;
        }
        if options.cwd.join(YARN_LOCK_FILE).exists() {
            debug!("Found {}; using yarn", YARN_LOCK_FILE);
            return PackageManager::Yarn;
        }
        if options.cwd.join(NPM_LOCK_FILE).exists() {
            debug!("Found {}; using npm", NPM_LOCK_FILE);
            return PackageManager::Npm;
        }
        if yarn_available() {
            debug!("No lockfile found; yarn is available");
            return PackageManager::Yarn;
        }
        PackageManager::Npm
    }

    fn init(
        &self,
        manager: PackageManager,
        extra_args: &[String],
        options: &InstallOptions,
    ) -> Result<()> {
        let mut args: Vec<String> = vec!["init".to_string()];
        args.extend(extra_args.iter().cloned());
        run_manager(manager, &args, options)
    }

    fn install(&self, packages: &[String], options: &InstallOptions) -> Result<()> {
        let manager = self.detect(options);
        let args = match manager {
            PackageManager::Npm => npm_install_args(packages, options),
            PackageManager::Yarn => yarn_install_args(packages, options),
        };
        run_manager(manager, &args, options)
    }
}

/// Probes for a usable yarn on the PATH.
fn yarn_available() -> bool {
    let (stdout, stderr) = OutputMode::Quiet.stdio();
    Command::new("yarn")
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(stdout)
        .stderr(stderr)
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

fn npm_install_args(packages: &[String], options: &InstallOptions) -> Vec<String> {
    let mut args: Vec<String> = vec!["install".to_string()];
    args.extend(packages.iter().cloned());
    if options.dev {
        args.push("--save-dev".to_string());
    }
    if options.exact {
        args.push("--save-exact".to_string());
    }
    if options.no_save {
        args.push("--no-save".to_string());
    }
    if options.bundle {
        args.push("--save-bundle".to_string());
    }
    if options.global {
        args.push("--global".to_string());
    }
    if options.verbose {
        args.push("--verbose".to_string());
    }
    args
}

fn yarn_install_args(packages: &[String], options: &InstallOptions) -> Vec<String> {
    // Yarn spells the bare case differently: `yarn install`, not `yarn add`.
    if packages.is_empty() {
        let mut args = vec!["install".to_string()];
        if options.verbose {
            args.push("--verbose".to_string());
        }
        return args;
    }

    let mut args: Vec<String> = Vec::new();
    if options.global {
        args.push("global".to_string());
    }
    args.push("add".to_string());
    args.extend(packages.iter().cloned());
    if options.dev {
        args.push("--dev".to_string());
    }
    if options.exact {
        args.push("--exact".to_string());
    }
    if options.verbose {
        args.push("--verbose".to_string());
    }
    if options.no_save || options.bundle {
        debug!("Ignoring save options not supported by yarn");
    }
    args
}

/// Spawns one manager invocation and maps its exit status to a result.
fn run_manager(manager: PackageManager, args: &[String], options: &InstallOptions) -> Result<()> {
    let command_line = format!("{} {}", manager.command(), args.join(" "));
    debug!("Running '{}' in {}", command_line, options.cwd.display());

    let (stdout, stderr) = options.output.stdio();
    let status = Command::new(manager.command())
        .args(args)
        .current_dir(&options.cwd)
        .stdout(stdout)
        .stderr(stderr)
        .status()
        .map_err(|source| Error::SpawnError { command: command_line.clone(), source })?;

    if !status.success() {
        return Err(Error::CommandError { command: command_line, status: status.to_string() });
    }
    Ok(())
}
