//! Logging setup for the binary.
//!
//! Terminal output goes to stderr at the requested level so it never mixes
//! with report output on stdout. The log file always records at least `info`.
use crate::context::AppContext;
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::OpenOptions;

/// Installs the global logger. Failing to open the log file only drops the
/// file sink; failing to install at all is ignored (a logger already exists).
pub fn init(ctx: &dyn AppContext, level: LevelFilter) {
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Debug)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    match ctx.get_log_file_path().and_then(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(anyhow::Error::from)
    }) {
        Ok(file) => loggers.push(WriteLogger::new(level.max(LevelFilter::Info), config, file)),
        Err(e) => eprintln!("Warning: log file unavailable: {}", e),
    }

    let _ = CombinedLogger::init(loggers);
}

/// Resolves the terminal level from the config default and `-v` / `-q` flags.
pub fn resolve_level(configured: LevelFilter, verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    let levels = [
        LevelFilter::Off,
        LevelFilter::Error,
        LevelFilter::Warn,
        LevelFilter::Info,
        LevelFilter::Debug,
        LevelFilter::Trace,
    ];
    let base = levels.iter().position(|l| *l == configured).unwrap_or(2);
    levels[(base + verbose as usize).min(levels.len() - 1)]
}
