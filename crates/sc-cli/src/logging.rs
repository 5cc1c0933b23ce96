//! Logger setup for the binary

use log::LevelFilter;
use std::io::Write;

/// Install the global logger. `RUST_LOG` overrides the level chosen here.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .try_init();
}
