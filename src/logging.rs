//! Logging setup for the command line tool.
//!
//! The library only uses the `log` facade. The binary installs a simplelog
//! terminal logger on stderr, so stdout stays clean for tag listings.

use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Level after applying `-v` flags on top of the configured one.
/// Each `-v` raises it one step (info -> debug -> trace).
pub fn effective_level(configured: LevelFilter, verbose: u8) -> LevelFilter {
    let steps = [
        LevelFilter::Off,
        LevelFilter::Error,
        LevelFilter::Warn,
        LevelFilter::Info,
        LevelFilter::Debug,
        LevelFilter::Trace,
    ];
    let start = steps.iter().position(|l| *l == configured).unwrap_or(3);
    steps[(start + verbose as usize).min(steps.len() - 1)]
}

pub fn init_logging(level: LevelFilter) {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();

    if TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto).is_err() {
        eprintln!("Warning: Logger already initialized");
    }
}
