// crates/scrubreel-cli/src/helpers/log.rs
//
// Logger setup for the binary. Library crates only use the `log` facade;
// this is the one place a backend is installed.
//
// Default level is `info` (`-v` → debug, `-vv` → trace). `RUST_LOG`, when
// set, overrides the flag entirely, e.g.
//   RUST_LOG=scrubreel_media=debug scrubreel strip clip.mp4

use env_logger::{Builder, Env};
use log::LevelFilter;

pub fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn init(verbose: u8) {
    let default = level_for(verbose).as_str().to_ascii_lowercase();
    Builder::from_env(Env::default().default_filter_or(default))
        .format_target(false)
        .init();
}
