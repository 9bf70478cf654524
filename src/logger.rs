//! Logger initialization. `--verbose` raises the filter to debug;
//! `RUST_LOG` overrides whatever the flag selects.

pub fn init_logger(verbose: bool) {
    let level = if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    env_logger::Builder::new().filter_level(level).parse_default_env().init();
}
