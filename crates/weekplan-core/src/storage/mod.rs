mod config;
mod draft_store;

pub use config::{CompletionConfig, Config, StorageConfig};
pub use draft_store::{JsonFileStore, MemoryStore, ScheduleStore};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/weekplan[-dev]/`, or `WEEKPLAN_DATA_DIR` when set.
///
/// Set WEEKPLAN_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("WEEKPLAN_DATA_DIR").filter(|v| !v.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .ok_or_else(|| ConfigError::DataDir("home directory not found".to_string()))?
                .join(".config");
            let env = std::env::var("WEEKPLAN_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("weekplan-dev")
            } else {
                base_dir.join("weekplan")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
