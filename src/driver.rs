//! Benchmark driver: generate once, then repeat load -> annotate -> scan.
//!
//! The driver owns every grid, records allocations and releases in an
//! [`AllocLedger`], prints one result pair per repetition, and removes the
//! intermediate file when the run ends (including on error) unless told to
//! keep it.
//!
//! Output lines (stdout):
//! ```text
//! Max v1: x=<x>, y=<y>, v1=<v1>
//! Max v2: x=<x>, y=<y>, v2=<v2>
//! ```
//! followed by one allocation summary line.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::alloc_ledger::AllocLedger;
use crate::annotate::annotate;
use crate::config::{ConfigError, RunConfig};
use crate::error::{IoError, LoadError};
use crate::grid::{PositionedGrid, PositionedRecord};
use crate::loader::load_path_with_buffer;
use crate::rng::XorShift64;
use crate::scan::{scan, MaxHit};
use crate::source::{generate_with_rng, GenerateStats};

/// Result pair of one repetition, copied out of the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RepetitionResult {
    pub max_v1: Option<PositionedRecord>,
    pub max_v2: Option<PositionedRecord>,
}

/// Summary of a completed run.
#[derive(Clone, Debug, Default)]
pub struct RunReport {
    pub generate: GenerateStats,
    pub repetitions: Vec<RepetitionResult>,
    pub ledger: AllocLedger,
}

/// Errors that end a run.
#[derive(Debug)]
#[non_exhaustive]
pub enum DriverError {
    Config(ConfigError),
    Generate(IoError),
    Load(LoadError),
    /// Writing results to the output stream failed.
    Output(io::Error),
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
            Self::Generate(err) => write!(f, "failed to generate values: {err}"),
            Self::Load(err) => write!(f, "failed to load values: {err}"),
            Self::Output(err) => write!(f, "failed to write results: {err}"),
        }
    }
}

impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Generate(err) => Some(err),
            Self::Load(err) => Some(err),
            Self::Output(err) => Some(err),
        }
    }
}

/// Removes the intermediate file on drop unless `keep` is set.
struct DataFile {
    path: PathBuf,
    keep: bool,
}

impl Drop for DataFile {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        if let Err(err) = fs::remove_file(&self.path) {
            if err.kind() != io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %err, "cannot remove value file");
            }
        }
    }
}

/// Runs the benchmark described by `config`, printing results to `out`.
pub fn run<W: Write>(config: &RunConfig, out: &mut W) -> Result<RunReport, DriverError> {
    config.validate().map_err(DriverError::Config)?;

    let mut rng = match config.seed {
        Some(seed) => XorShift64::new(seed),
        None => XorShift64::from_entropy(),
    };

    let data = DataFile {
        path: config.data_path.clone(),
        keep: config.keep_data,
    };
    let generate = generate_with_rng(&data.path, config.nx, config.ny, &mut rng)
        .map_err(DriverError::Generate)?;

    let mut report = RunReport {
        generate,
        repetitions: Vec::with_capacity(config.repetitions as usize),
        ledger: AllocLedger::new(),
    };
    let mut staging = Vec::new();

    if config.reuse_grid {
        let grid = load_positioned(&data.path, &mut staging, &mut report.ledger)?;
        for rep in 0..config.repetitions {
            debug!(rep, "scan repetition");
            let result = scan_and_print(&grid, config, out)?;
            report.repetitions.push(result);
        }
        release_positioned(grid, &mut report.ledger);
    } else {
        for rep in 0..config.repetitions {
            debug!(rep, "full repetition");
            let grid = load_positioned(&data.path, &mut staging, &mut report.ledger)?;
            let result = scan_and_print(&grid, config, out)?;
            report.repetitions.push(result);
            release_positioned(grid, &mut report.ledger);
        }
    }

    let ledger = &report.ledger;
    writeln!(
        out,
        "Total bytes allocated: {} (peak {}, live at exit {})",
        ledger.total_allocated_bytes(),
        ledger.peak_bytes(),
        ledger.live_bytes()
    )
    .map_err(DriverError::Output)?;
    info!(
        repetitions = config.repetitions,
        total_bytes = ledger.total_allocated_bytes(),
        peak_bytes = ledger.peak_bytes(),
        "run complete"
    );

    Ok(report)
}

/// Loads the value file and annotates it. The value grid is released as soon
/// as the positioned grid exists.
fn load_positioned(
    path: &Path,
    staging: &mut Vec<u8>,
    ledger: &mut AllocLedger,
) -> Result<PositionedGrid, DriverError> {
    let values = load_path_with_buffer(path, staging).map_err(DriverError::Load)?;
    ledger.record_alloc(values.footprint_bytes());

    let grid = annotate(&values);
    ledger.record_alloc(grid.footprint_bytes());

    let value_bytes = values.footprint_bytes();
    drop(values);
    ledger.record_release(value_bytes);
    Ok(grid)
}

fn release_positioned(grid: PositionedGrid, ledger: &mut AllocLedger) {
    let bytes = grid.footprint_bytes();
    drop(grid);
    ledger.record_release(bytes);
}

fn scan_and_print<W: Write>(
    grid: &PositionedGrid,
    config: &RunConfig,
    out: &mut W,
) -> Result<RepetitionResult, DriverError> {
    let pair = scan(grid, config.strategy);
    write_hit(out, "v1", pair.v1, |r| r.v1)?;
    write_hit(out, "v2", pair.v2, |r| r.v2)?;
    Ok(RepetitionResult {
        max_v1: pair.v1.map(|hit| *hit.record()),
        max_v2: pair.v2.map(|hit| *hit.record()),
    })
}

fn write_hit<W: Write>(
    out: &mut W,
    field: &str,
    hit: Option<MaxHit<'_>>,
    value: impl Fn(&PositionedRecord) -> f32,
) -> Result<(), DriverError> {
    let written = match hit {
        Some(hit) => {
            let record = hit.record();
            writeln!(
                out,
                "Max {field}: x={}, y={}, {field}={:.6}",
                record.x,
                record.y,
                value(record)
            )
        }
        None => writeln!(out, "Max {field}: none (empty grid)"),
    };
    written.map_err(DriverError::Output)
}
