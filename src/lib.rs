//! Data-layout benchmark for a fused maxima scan over a flat 2D grid.
//!
//! ## Scope
//! A grid of `(v1, v2)` samples is generated into a text file, loaded back
//! into a flat cache-line-aligned buffer, annotated with `(x, y)` positions,
//! and scanned for the record with the largest `v1` and the record with the
//! largest `v2`. A pointer-of-pointers layout ([`boxed`]) is kept as the
//! baseline the flat layout is measured against.
//!
//! ## Key invariants
//! - Cell `(x, y)` lives at flat index `x * ny + y` in every layout.
//! - Grids hold exactly `nx * ny` cells; a mismatch is a load error.
//! - Maxima use strict `>`: the first occurrence in flat order wins ties,
//!   identically for the two-pass and the fused scan.
//! - Empty grids (`nx == 0` or `ny == 0`) scan to `None` without reading.
//!
//! ## Flow
//! `generate -> file -> load -> ValueGrid -> annotate -> PositionedGrid -> scan`
//!
//! ## Notable entry points
//! - [`generate`] / [`write_values`]: Value source.
//! - [`load`] / [`load_from_reader`]: Grid loader.
//! - [`annotate`]: Position annotator.
//! - [`find_max_v1`], [`find_max_v2`], [`find_max_v1_v2`], [`scan`]: Maxima
//!   scanner.
//! - [`driver::run`]: repetition loop used by the `gridmax` binary.

pub mod alloc_ledger;
pub mod boxed;
pub mod config;
pub mod driver;
pub mod lines;
pub mod rng;
#[cfg(test)]
pub mod test_utils;
pub mod util;

mod annotate;
mod error;
mod grid;
mod loader;
mod scan;
mod source;

pub use alloc_ledger::AllocLedger;
pub use annotate::annotate;
pub use config::{ConfigError, ConfigFileError, RunConfig};
pub use error::{IoError, LoadError, ShapeError};
pub use grid::{cell_count, PositionedGrid, PositionedRecord, Value, ValueGrid, GRID_ALIGN};
pub use loader::{
    load, load_from_reader, load_path_with_buffer, load_with_buffer, MAX_LINE_LEN, READ_CHUNK_LEN,
};
pub use rng::XorShift64;
pub use scan::{find_max_v1, find_max_v1_v2, find_max_v2, scan, MaxHit, MaxPair, ScanStrategy};
pub use source::{
    generate, generate_with_rng, tick_value, write_grid, write_values, GenerateStats,
    CHUNK_BUF_LEN, SAMPLE_TICKS,
};
