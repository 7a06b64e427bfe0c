//! CLI command implementations

pub mod chart;
pub mod clear;
pub mod delete;
pub mod edit;
pub mod import;
pub mod list;
pub mod logs;
pub mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};
use cashflow_core::config::Config;
use cashflow_core::services::{LogEvent, LoggingService};
use cashflow_core::CashflowContext;

/// Get the logging service for CLI operations
///
/// Returns None when logging is disabled or fails to initialize; logging
/// never blocks a command.
pub fn get_logger() -> Option<LoggingService> {
    let data_dir = get_data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    let config = Config::load(&data_dir).ok()?;
    if !config.log_events {
        return None;
    }
    LoggingService::new(&data_dir, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Data directory: `$CASHFLOW_DIR`, or `~/.cashflow`
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("CASHFLOW_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".cashflow"))
}

/// Open the cashflow context for the data directory
pub fn get_context() -> Result<CashflowContext> {
    let data_dir = get_data_dir()?;
    CashflowContext::new(&data_dir).context("Failed to initialize cashflow context")
}
