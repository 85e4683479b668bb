//! Benchmark run configuration.
//!
//! # Invariants
//! - `repetitions >= 1`.
//! - `data_path` is non-empty.
//! - The annotated grid (`nx * ny` records) fits in a single allocation.
//!
//! Defaults mirror the baseline benchmark: a 2000 x 3000 grid, one
//! repetition, two-pass scan, and a `values.txt` scratch file that is
//! removed when the run ends.

use std::fmt;
use std::fs;
use std::io;
use std::mem::size_of;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::grid::PositionedRecord;
use crate::scan::ScanStrategy;

/// Settings for one benchmark run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Number of load/annotate/scan repetitions (or scan-only repetitions
    /// when `reuse_grid` is set).
    pub repetitions: u32,
    /// Rows in the generated grid.
    pub nx: u32,
    /// Columns in the generated grid.
    pub ny: u32,
    pub strategy: ScanStrategy,
    /// Load and annotate once, then repeat only the scan.
    pub reuse_grid: bool,
    /// Fixed generator seed; `None` seeds from process entropy.
    pub seed: Option<u64>,
    /// Intermediate value file.
    pub data_path: PathBuf,
    /// Leave the value file on disk after the run.
    pub keep_data: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            repetitions: 1,
            nx: 2000,
            ny: 3000,
            strategy: ScanStrategy::TwoPass,
            reuse_grid: false,
            seed: None,
            data_path: PathBuf::from("values.txt"),
            keep_data: false,
        }
    }
}

/// Validation error returned by [`RunConfig::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    RepetitionsZero,
    DataPathEmpty,
    GridTooLarge { nx: u32, ny: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::RepetitionsZero => write!(f, "repetitions must be > 0"),
            ConfigError::DataPathEmpty => write!(f, "data_path must not be empty"),
            ConfigError::GridTooLarge { nx, ny } => {
                write!(f, "grid {nx}x{ny} does not fit in a single allocation")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl RunConfig {
    /// Validate cross-field invariants. Cheap; call once at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repetitions == 0 {
            return Err(ConfigError::RepetitionsZero);
        }
        if self.data_path.as_os_str().is_empty() {
            return Err(ConfigError::DataPathEmpty);
        }
        let bytes =
            u128::from(self.nx) * u128::from(self.ny) * size_of::<PositionedRecord>() as u128;
        if bytes > isize::MAX as u128 {
            return Err(ConfigError::GridTooLarge {
                nx: self.nx,
                ny: self.ny,
            });
        }
        Ok(())
    }

    /// Reads a JSON config file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigFileError> {
        let text = fs::read_to_string(path).map_err(ConfigFileError::Read)?;
        let config: Self = serde_json::from_str(&text).map_err(ConfigFileError::Parse)?;
        config.validate().map_err(ConfigFileError::Invalid)?;
        Ok(config)
    }
}

/// Errors from [`RunConfig::from_json_file`].
#[derive(Debug)]
#[non_exhaustive]
pub enum ConfigFileError {
    Read(io::Error),
    Parse(serde_json::Error),
    Invalid(ConfigError),
}

impl fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(err) => write!(f, "cannot read config file: {err}"),
            Self::Parse(err) => write!(f, "invalid config JSON: {err}"),
            Self::Invalid(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(err) => Some(err),
        }
    }
}
