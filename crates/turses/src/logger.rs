//! File-based logging using simplelog
//!
//! Logs go to `turses.log` inside the config directory. Initialisation is a
//! separate step run once the configuration is known, since the level is a
//! config param.

use anyhow::{Context, Result};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::{File, OpenOptions};
use std::path::Path;
use turses_config::RuntimeConfig;

/// Level from the `logging_level` param, falling back to Info on bad values
pub fn level_for(runtime: &RuntimeConfig) -> LevelFilter {
    runtime.log_level().unwrap_or_else(|e| {
        eprintln!("{}, using INFO", e);
        LevelFilter::Info
    })
}

fn open_log_file(log_file: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {:?}", log_file))
}

/// Install the process-wide file logger
pub fn init(log_file: &Path, level: LevelFilter) -> Result<()> {
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_time_offset_to_local()
        .unwrap_or_else(|c| c) // Fallback if local time offset fails
        .build();

    let file = open_log_file(log_file)?;
    WriteLogger::init(level, config, file).context("Failed to initialize logger")?;
    Ok(())
}
