//! Grid loader: parses the intermediate text file into a [`ValueGrid`].
//!
//! # Invariants
//! - The grid buffer is sized from the header exactly once and never grows.
//! - A returned grid holds exactly `nx * ny` values in file order.
//! - On any error the partially filled buffer is dropped before returning.
//!
//! # Parsing rules
//! - Header: exactly two whitespace-separated `u32` tokens, digits only.
//! - Record: exactly two whitespace-separated `f32` tokens. Any spelling
//!   `f32::from_str` accepts is admitted, including `NaN` and `inf`.
//! - A trailing `\r` on any line is ignored. Blank lines are bad records.
//! - Lines past `nx * ny` are still parsed and counted so the mismatch
//!   error reports the real count.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::error::LoadError;
use crate::grid::{cell_count, Value, ValueGrid, GRID_ALIGN};
use crate::lines::for_each_line;
use crate::util::AlignedBuf;

/// Bytes requested from the reader per chunk.
pub const READ_CHUNK_LEN: usize = 1024 * 1024;

/// Longest accepted line, newline excluded. Longer lines are rejected as
/// soon as they pass this length, so staging never exceeds
/// `READ_CHUNK_LEN + MAX_LINE_LEN` bytes.
pub const MAX_LINE_LEN: usize = 4 * 1024;

/// Loads the value file at `path`.
pub fn load(path: &Path) -> Result<ValueGrid, LoadError> {
    let mut staging = Vec::new();
    load_path_with_buffer(path, &mut staging)
}

/// Loads the value file at `path`, reusing `staging` for chunked reads.
pub fn load_path_with_buffer(path: &Path, staging: &mut Vec<u8>) -> Result<ValueGrid, LoadError> {
    debug!(path = %path.display(), "loading values");
    let file = File::open(path).map_err(LoadError::CannotOpen)?;
    load_with_buffer(file, staging)
}

/// Parses a value stream from any reader.
pub fn load_from_reader<R: Read>(reader: R) -> Result<ValueGrid, LoadError> {
    let mut staging = Vec::new();
    load_with_buffer(reader, &mut staging)
}

/// Parses a value stream, reusing `staging` for chunked reads.
pub fn load_with_buffer<R: Read>(reader: R, staging: &mut Vec<u8>) -> Result<ValueGrid, LoadError> {
    let mut fill: Option<GridFill> = None;

    for_each_line(
        reader,
        staging,
        READ_CHUNK_LEN,
        MAX_LINE_LEN,
        |line_no, line| match fill.as_mut() {
            Some(grid) => grid.push(line_no, line),
            None => {
                let (nx, ny) = parse_header(line).ok_or(LoadError::BadHeader)?;
                fill = Some(GridFill::allocate(nx, ny)?);
                Ok(())
            }
        },
    )?;

    fill.ok_or(LoadError::BadHeader)?.finish()
}

/// Grid under construction.
struct GridFill {
    nx: u32,
    ny: u32,
    values: AlignedBuf<Value>,
    found: u64,
}

impl GridFill {
    fn allocate(nx: u32, ny: u32) -> Result<Self, LoadError> {
        let elements = u64::from(nx) * u64::from(ny);
        let len = cell_count(nx, ny).ok_or(LoadError::OutOfMemory { elements })?;
        let values = AlignedBuf::try_zeroed(len, GRID_ALIGN)
            .map_err(|_| LoadError::OutOfMemory { elements })?;
        debug!(
            nx,
            ny,
            bytes = values.footprint_bytes(),
            "allocated value grid"
        );
        Ok(Self {
            nx,
            ny,
            values,
            found: 0,
        })
    }

    fn push(&mut self, line_no: u64, line: &[u8]) -> Result<(), LoadError> {
        let bad_record = LoadError::BadRecord { line: line_no };
        let (v1, v2) = parse_pair::<f32>(line).ok_or(bad_record)?;
        let slot = usize::try_from(self.found)
            .ok()
            .and_then(|idx| self.values.get_mut(idx));
        if let Some(slot) = slot {
            *slot = Value::new(v1, v2);
        }
        self.found += 1;
        Ok(())
    }

    fn finish(self) -> Result<ValueGrid, LoadError> {
        let expected = self.values.len() as u64;
        if self.found != expected {
            return Err(LoadError::CountMismatch {
                expected,
                found: self.found,
            });
        }
        Ok(ValueGrid::from_parts(self.nx, self.ny, self.values))
    }
}

/// Header dimensions are plain decimal digits; `u32::from_str` alone would
/// also take a leading `+`.
fn parse_header(line: &[u8]) -> Option<(u32, u32)> {
    let (nx, ny) = parse_pair::<u32>(line)?;
    let signed = line
        .split(u8::is_ascii_whitespace)
        .any(|token| token.first() == Some(&b'+'));
    (!signed).then_some((nx, ny))
}

/// Parses exactly two whitespace-separated tokens.
fn parse_pair<T: FromStr>(line: &[u8]) -> Option<(T, T)> {
    let text = std::str::from_utf8(line).ok()?;
    let mut tokens = text.split_ascii_whitespace();
    let first = tokens.next()?.parse().ok()?;
    let second = tokens.next()?.parse().ok()?;
    if tokens.next().is_some() {
        return None;
    }
    Some((first, second))
}
