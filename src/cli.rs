//! Command-line interface.

use clap::Parser;
use std::path::PathBuf;

use crate::installer::PackageManager;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Templates directory containing the blueprint and template files
    #[arg(short, long, value_name = "DIR")]
    pub template: PathBuf,

    /// Use this package manager instead of detecting one
    #[arg(short, long, value_name = "MANAGER")]
    pub manager: Option<PackageManager>,

    /// Print debug information
    #[arg(short, long)]
    pub verbose: bool,

    /// New project directory, plus any flags to forward to `init`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "DIR [INIT_ARGS]")]
    pub rest: Vec<String>,
}

impl Args {
    /// The first non-flag trailing argument names the new project
    /// directory; without one the current directory is scaffolded.
    pub fn project_directory(&self) -> Option<&str> {
        self.rest.iter().map(String::as_str).find(|arg| !arg.starts_with('-'))
    }

    /// Flag-style trailing arguments, forwarded verbatim to the manifest
    /// initialization subprocess.
    pub fn init_args(&self) -> Vec<String> {
        self.rest.iter().filter(|arg| arg.starts_with('-')).cloned().collect()
    }
}

pub fn get_args() -> Args {
    Args::parse()
}
