mod config;
pub mod kv;
pub mod log_store;

pub use config::{CoachConfig, Config, LoggingConfig, NotificationsConfig, TimerConfig};
pub use kv::{KvBackend, MemoryKv, SqliteKv};
pub use log_store::{
    LogStore, StoreChange, APP_CATEGORIES_KEY, APP_LAUNCHES_KEY, FOCUS_SESSIONS_KEY,
    MAX_LAUNCHES, MAX_SESSIONS, SETTINGS_KEY,
};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns the data directory.
///
/// `ZENITH_DATA_DIR` wins if set; otherwise `~/.config/zenith[-dev]/`
/// based on ZENITH_ENV (set ZENITH_ENV=dev for a development directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("ZENITH_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("ZENITH_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("zenith-dev")
            } else {
                base_dir.join("zenith")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
