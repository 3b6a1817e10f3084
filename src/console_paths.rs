//! Home-based storage paths for repair-console files.
//!
//! Everything lives under `~/.repair-console/`:
//! - `config.yaml` - Console configuration
//! - `logs/` - Structured action logs

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// The name of the console directory.
const CONSOLE_DIR: &str = ".repair-console";

/// Returns the home-based console directory: `~/.repair-console/`
///
/// Creates the directory if it doesn't exist.
///
/// # Errors
///
/// Returns an error if:
/// - Home directory cannot be determined
/// - Directory creation fails
pub fn console_home_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let console_dir = home.join(CONSOLE_DIR);
    fs::create_dir_all(&console_dir).with_context(|| {
        format!(
            "Failed to create console directory: {}",
            console_dir.display()
        )
    })?;
    Ok(console_dir)
}

/// Returns the logs directory: `~/.repair-console/logs/`
///
/// Creates the directory if it doesn't exist.
pub fn logs_dir() -> Result<PathBuf> {
    let dir = console_home_dir()?.join("logs");
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create logs directory: {}", dir.display()))?;
    Ok(dir)
}

/// Returns the default config path: `~/.repair-console/config.yaml`
pub fn config_path() -> Result<PathBuf> {
    Ok(console_home_dir()?.join("config.yaml"))
}
