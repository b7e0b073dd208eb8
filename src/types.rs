//! Core data types for DataPlot-RS
//!
//! This module contains the fundamental data structures shared between the
//! expression engine and the signal analysis routines.
//!
//! # Main Types
//!
//! - [`Dataset2D`] - Two equal-length numeric sequences (X and Y)
//! - [`DatasetRegistry`] - Read-only, 1-based lookup of datasets for expressions
//! - [`NamedDatasets`] - Ordered registry that also remembers display names
//!
//! # Ownership
//!
//! Datasets are owned by the caller. The expression engine only borrows a
//! registry for the duration of a solve and always produces new datasets.

use crate::error::{DataPlotError, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A paired series of X and Y values with equal length
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawDataset")]
pub struct Dataset2D {
    x: Vec<f64>,
    y: Vec<f64>,
}

/// Unchecked serde shape, validated through `TryFrom`
#[derive(Deserialize)]
struct RawDataset {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl TryFrom<RawDataset> for Dataset2D {
    type Error = DataPlotError;

    fn try_from(raw: RawDataset) -> Result<Self> {
        Dataset2D::new(raw.x, raw.y)
    }
}

impl Dataset2D {
    /// Create a dataset, failing if X and Y differ in length
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(DataPlotError::Dataset(format!(
                "X has {} points but Y has {}",
                x.len(),
                y.len()
            )));
        }
        Ok(Self { x, y })
    }

    /// Create a dataset from (x, y) pairs
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let (x, y) = points.into_iter().unzip();
        Self { x, y }
    }

    /// Create a dataset sharing `x` with every Y equal to `value`
    pub fn constant(x: &[f64], value: f64) -> Self {
        Self {
            x: x.to_vec(),
            y: vec![value; x.len()],
        }
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Iterate over (x, y) pairs
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// Apply `f` to every Y value, keeping X
    pub fn map_y(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            x: self.x.clone(),
            y: self.y.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Combine Y values pairwise with `other`, keeping this dataset's X
    ///
    /// Returns `None` when the lengths differ.
    pub fn zip_y(&self, other: &Dataset2D, f: impl Fn(f64, f64) -> f64) -> Option<Self> {
        if self.len() != other.len() {
            return None;
        }
        Some(Self {
            x: self.x.clone(),
            y: self
                .y
                .iter()
                .zip(other.y.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }

    /// Copy of this dataset with every X value multiplied by `factor`
    pub fn scaled_x(&self, factor: f64) -> Self {
        Self {
            x: self.x.iter().map(|&v| v * factor).collect(),
            y: self.y.clone(),
        }
    }

    /// Mutable access to Y for in-place transforms within the crate
    pub(crate) fn y_mut(&mut self) -> &mut [f64] {
        &mut self.y
    }
}

/// Read-only collection of datasets addressable by a 1-based index
///
/// Expressions reference datasets as `s1`, `s2`, ... which resolve through
/// this trait. Implementations must not change while a solve is in progress.
pub trait DatasetRegistry {
    /// Number of datasets available
    fn count(&self) -> usize;

    /// Dataset at the 1-based `index`, if any
    fn get(&self, index: usize) -> Option<&Dataset2D>;

    /// Human-readable name for the dataset at `index`
    fn name(&self, index: usize) -> Option<String> {
        (index >= 1 && index <= self.count()).then(|| format!("s{}", index))
    }
}

impl DatasetRegistry for [Dataset2D] {
    fn count(&self) -> usize {
        self.len()
    }

    fn get(&self, index: usize) -> Option<&Dataset2D> {
        index.checked_sub(1).and_then(|i| <[Dataset2D]>::get(self, i))
    }
}

impl DatasetRegistry for Vec<Dataset2D> {
    fn count(&self) -> usize {
        self.len()
    }

    fn get(&self, index: usize) -> Option<&Dataset2D> {
        DatasetRegistry::get(self.as_slice(), index)
    }
}

/// Ordered registry of datasets with display names (e.g. file column headers)
#[derive(Debug, Clone, Default)]
pub struct NamedDatasets {
    entries: Vec<(String, Dataset2D)>,
}

/// One element of a dataset file: `{ "name": "...", "x": [...], "y": [...] }`
#[derive(Deserialize)]
struct DatasetEntry {
    #[serde(default)]
    name: Option<String>,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl NamedDatasets {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a dataset, returning its 1-based index
    pub fn push(&mut self, name: impl Into<String>, dataset: Dataset2D) -> usize {
        self.entries.push((name.into(), dataset));
        self.entries.len()
    }

    /// Builder-style append
    pub fn with(mut self, name: impl Into<String>, dataset: Dataset2D) -> Self {
        self.push(name, dataset);
        self
    }

    /// Find the 1-based index of the dataset called `name`
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(n, _)| n == name)
            .map(|i| i + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over (name, dataset) in index order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Dataset2D)> {
        self.entries.iter().map(|(n, d)| (n.as_str(), d))
    }

    /// Parse a JSON array of datasets; unnamed entries are called `sN`
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<DatasetEntry> = serde_json::from_str(json)?;

        let mut datasets = Self::new();
        for (i, entry) in entries.into_iter().enumerate() {
            let name = entry.name.unwrap_or_else(|| format!("s{}", i + 1));
            let dataset = Dataset2D::new(entry.x, entry.y)
                .with_context(|| format!("Invalid dataset s{} ('{}')", i + 1, name))?;
            datasets.push(name, dataset);
        }
        Ok(datasets)
    }

    /// Load datasets from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read datasets from {:?}", path))?;

        let datasets = Self::from_json(&content)
            .with_context(|| format!("Failed to load datasets from {:?}", path))?;
        tracing::debug!("Loaded {} datasets from {:?}", datasets.count(), path);
        Ok(datasets)
    }
}

impl DatasetRegistry for NamedDatasets {
    fn count(&self) -> usize {
        self.entries.len()
    }

    fn get(&self, index: usize) -> Option<&Dataset2D> {
        index
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(|(_, d)| d)
    }

    fn name(&self, index: usize) -> Option<String> {
        index
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(|(n, _)| n.clone())
    }
}
