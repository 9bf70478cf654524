//! Sprout's main application entry point.
//! Parses the command line, resolves the run configuration from the
//! blueprint, and hands control to the scaffolding pipeline.

use sprout::{
    cli::{get_args, Args},
    config::CreateConfig,
    error::{default_error_handler, Result},
    git::GitCli,
    installer::SystemPackageManager,
    logger::init_logger,
    scaffold::create_package,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Builds the configuration and runs the pipeline with the production
/// drivers.
fn run(args: Args) -> Result<()> {
    let config = CreateConfig::from_args(&args)?;
    let vcs = GitCli::new();
    let installer = SystemPackageManager::new();
    create_package(&config, &vcs, &installer)
}
