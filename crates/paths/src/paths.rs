//! Centralized path management for SStore.
//!
//! Directories are lazily initialized and cached.

use std::path::PathBuf;
use std::sync::OnceLock;

static CONFIG_DIR: OnceLock<PathBuf> = OnceLock::new();

/// ~/.config/sstore (or platform equivalent)
pub fn config_dir() -> &'static PathBuf {
    CONFIG_DIR.get_or_init(|| {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sstore")
    })
}

/// Config file path: config_dir()/config.toml
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}
