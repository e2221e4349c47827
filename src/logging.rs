// File logging. The terminal belongs to the prompts, so log records go to
// a file instead.

use crate::config::Config;
use anyhow::{Context, Result};
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::{self, OpenOptions};

pub fn init(config: &Config) -> Result<()> {
    if let Some(parent) = config.log_file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("Failed to open log file {}", config.log_file.display()))?;
    let log_config = ConfigBuilder::new()
        .add_filter_allow_str("cidwalk")
        .build();
    WriteLogger::init(config.log_level, log_config, file).context("Logger already initialised")?;
    log::info!("cidwalk {} started, store at {}", env!("CARGO_PKG_VERSION"), config.api_url);
    Ok(())
}
