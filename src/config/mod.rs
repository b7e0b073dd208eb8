//! Configuration module for DataPlot-RS
//!
//! This module handles persisted engine settings:
//! - Symbolic output precision and free variable
//! - What numeric solves do with a scalar result
//! - Window and DC handling for the `fft()` function
//!
//! # App Data Location
//!
//! Settings are stored in the platform-appropriate location:
//! - **Linux**: `~/.local/share/dev.dataplot-rs/`
//! - **macOS**: `~/Library/Application Support/dev.dataplot-rs/`
//! - **Windows**: `%APPDATA%\dev.dataplot-rs\`
//!
//! # Files
//!
//! - `engine.json` - [`EngineConfig`]
//!
//! # Example
//!
//! ```ignore
//! use dataplot_rs::config::EngineConfig;
//!
//! let mut config = EngineConfig::load_or_default();
//! config.variable = 's';
//! config.save_default()?;
//! ```

pub mod engine;

pub use engine::{EngineConfig, ScalarResultPolicy};

use crate::error::{DataPlotError, Result};
use std::path::PathBuf;

/// Application identifier for data directories
pub const APP_ID: &str = "dev.dataplot-rs";

/// Engine settings filename
pub const ENGINE_CONFIG_FILE: &str = "engine.json";

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        DataPlotError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            DataPlotError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the engine settings file
pub fn config_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(ENGINE_CONFIG_FILE))
}
