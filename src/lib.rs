//! # DataPlot-RS: Math-Channel Expression Engine
//!
//! Evaluates user-typed math channels over plotted datasets, and simplifies
//! polynomial expressions such as transfer-function numerators.
//!
//! ## Architecture
//!
//! - **Expression**: Tokenizer, shunting-yard parser and two stack evaluators
//!   (numeric over datasets, symbolic over polynomial strings)
//! - **Analysis**: FFT, integral, derivative and RMS transforms used by the
//!   series-only expression functions
//! - **Types**: Paired X/Y datasets and the registry expressions read them from
//!
//! ## Configuration
//!
//! Engine settings (symbolic precision, free variable, scalar handling, FFT
//! window) are stored in the platform-appropriate data directory under
//! `dev.dataplot-rs`:
//!
//! - **Linux**: `~/.local/share/dev.dataplot-rs/`
//! - **macOS**: `~/Library/Application Support/dev.dataplot-rs/`
//! - **Windows**: `%APPDATA%\dev.dataplot-rs\`
//!
//! ## Example
//!
//! ```
//! use dataplot_rs::{Dataset2D, EngineConfig, ExpressionTree, NamedDatasets};
//!
//! let datasets = NamedDatasets::new()
//!     .with("Speed", Dataset2D::from_points([(0.0, 1.0), (1.0, 3.0)]));
//!
//! let tree = ExpressionTree::with_datasets(&datasets).with_config(EngineConfig::default());
//! let scaled = tree.solve("s1 * 3.6", 1.0).unwrap();
//! assert_eq!(scaled.points().count(), 2);
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod expression;
pub mod types;

// Re-export commonly used types
pub use config::{EngineConfig, ScalarResultPolicy};
pub use error::{DataPlotError, Result, ResultExt};
pub use expression::{ExpressionError, ExpressionTree};
pub use types::{Dataset2D, DatasetRegistry, NamedDatasets};
