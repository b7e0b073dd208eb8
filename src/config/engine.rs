//! Expression engine settings
//!
//! # Main Types
//!
//! - [`EngineConfig`] - Persisted engine settings (`engine.json`)
//! - [`ScalarResultPolicy`] - Handling of scalar results in numeric solves

use super::{config_path, ensure_app_data_dir, ENGINE_CONFIG_FILE};
use crate::analysis::{FftConfig, WindowFunction};
use crate::error::{DataPlotError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Largest number of significant digits an `f64` can carry
pub const MAX_PRECISION: usize = 17;

/// What a numeric solve does when the expression evaluates to a plain number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScalarResultPolicy {
    /// Repeat the value across the X axis of the first available dataset
    #[default]
    Broadcast,
    /// Fail with a type mismatch
    Reject,
}

/// Settings shared by numeric and symbolic solves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Significant digits of coefficients in simplified output
    #[serde(default = "default_precision")]
    pub precision: usize,

    /// Free variable of symbolic expressions (`x`, or `s` for transfer functions)
    #[serde(default = "default_variable")]
    pub variable: char,

    /// Handling of scalar results in numeric solves
    #[serde(default)]
    pub scalar_result: ScalarResultPolicy,

    /// Window applied by `fft()`
    #[serde(default)]
    pub fft_window: WindowFunction,

    /// Whether `fft()` subtracts the mean first
    #[serde(default = "default_true")]
    pub fft_remove_dc: bool,
}

fn default_precision() -> usize {
    15
}

fn default_variable() -> char {
    'x'
}

fn default_true() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
            variable: default_variable(),
            scalar_result: ScalarResultPolicy::default(),
            fft_window: WindowFunction::default(),
            fft_remove_dc: true,
        }
    }
}

impl EngineConfig {
    /// Settings for the `fft()` function
    pub fn fft_config(&self) -> FftConfig {
        FftConfig {
            window: self.fft_window,
            remove_dc: self.fft_remove_dc,
        }
    }

    /// Builder-style variable override
    pub fn with_variable(mut self, variable: char) -> Self {
        self.variable = variable;
        self
    }

    /// Builder-style precision override
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Builder-style scalar result policy override
    pub fn with_scalar_result(mut self, policy: ScalarResultPolicy) -> Self {
        self.scalar_result = policy;
        self
    }

    /// Check that the settings can be used by the engine
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_PRECISION).contains(&self.precision) {
            return Err(DataPlotError::Config(format!(
                "precision must be between 1 and {}, got {}",
                MAX_PRECISION, self.precision
            )));
        }
        if !self.variable.is_ascii_alphabetic() {
            return Err(DataPlotError::Config(format!(
                "variable must be an ASCII letter, got '{}'",
                self.variable
            )));
        }
        Ok(())
    }

    /// Load settings from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            DataPlotError::Config(format!("Failed to read engine config {:?}: {}", path, e))
        })?;

        let config: Self = serde_json::from_str(&content).map_err(|e| {
            DataPlotError::Config(format!("Failed to parse engine config {:?}: {}", path, e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load settings from the default location, returning defaults on any error
    pub fn load_or_default() -> Self {
        Self::load_or_default_from(config_path())
    }

    fn load_or_default_from(path: Option<PathBuf>) -> Self {
        let Some(path) = path else {
            tracing::warn!("Could not determine app data directory, using default engine config");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!("No engine config at {:?}, using defaults", path);
            return Self::default();
        }

        match Self::load(&path) {
            Ok(config) => {
                tracing::info!("Loaded engine config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::warn!("Failed to load engine config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings to a file as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DataPlotError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = serde_json::to_string_pretty(self).map_err(|e| {
            DataPlotError::Config(format!("Failed to serialize engine config: {}", e))
        })?;

        std::fs::write(path, content)
            .map_err(|e| DataPlotError::Config(format!("Failed to write engine config: {}", e)))?;

        tracing::debug!("Saved engine config to {:?}", path);
        Ok(())
    }

    /// Save settings to the default location, returning the file written
    pub fn save_default(&self) -> Result<PathBuf> {
        self.save_in(ensure_app_data_dir()?)
    }

    /// Save settings as `engine.json` inside `dir`
    pub fn save_in(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(ENGINE_CONFIG_FILE);
        self.save(&path)?;
        Ok(path)
    }
}
