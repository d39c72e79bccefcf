use std::{
    fs::{create_dir_all, File},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::Local;
use simplelog::{CombinedLogger, ConfigBuilder, LevelFilter, WriteLogger};

/// Install a file logger at `<log_dir>/<tag>_<timestamp>.log` and return its path.
pub fn init(log_dir: &Path, tag: &str) -> Result<PathBuf> {
    create_dir_all(log_dir)
        .with_context(|| format!("cannot create log directory {}", log_dir.display()))?;
    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let log_path = log_dir.join(format!("{tag}_{ts}.log"));

    CombinedLogger::init(vec![WriteLogger::new(
        LevelFilter::Info,
        ConfigBuilder::new().build(),
        File::create(&log_path)
            .with_context(|| format!("cannot open log file {}", log_path.display()))?,
    )])?;

    Ok(log_path)
}
