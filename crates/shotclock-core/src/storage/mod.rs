mod config;
pub mod database;
pub mod group_store;

pub use config::{AudioConfig, Config, PlayConfig};
pub use database::{Database, KeyValueStore};
pub use group_store::{GroupStore, GROUPS_KEY};

use std::path::PathBuf;

/// Returns the application data directory and creates it if needed.
///
/// `SHOTCLOCK_DATA_DIR` wins when set. Otherwise `~/.config/shotclock`, or
/// `~/.config/shotclock-dev` when `SHOTCLOCK_ENV=dev`.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("SHOTCLOCK_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("SHOTCLOCK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("shotclock-dev")
            } else {
                base_dir.join("shotclock")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
