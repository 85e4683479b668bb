//! Value source: writes a pseudo-random grid to the intermediate text file.
//!
//! # Format
//! ```text
//! <nx> <ny>
//! <v1> <v2>      (nx * ny lines, row-major)
//! ```
//! Values carry six fractional digits. Samples are drawn directly on that
//! grid (`k / 10^6`, `k in [0, 10^6)`), so the printed text is exact, never
//! rounds up to `1.000000`, and reloads to the same `f32` bit pattern.
//!
//! # Buffering
//! Lines are staged in a [`CHUNK_BUF_LEN`] buffer and handed to the writer
//! with one `write_all` per full chunk, so the number of write calls grows
//! with output bytes / 1 MiB rather than with record count.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::{debug, trace};

use crate::error::IoError;
use crate::grid::Value;
use crate::rng::XorShift64;

/// Staging buffer size for generated lines (bytes).
pub const CHUNK_BUF_LEN: usize = 1024 * 1024;

/// Sample resolution: values are multiples of `1 / SAMPLE_TICKS`.
pub const SAMPLE_TICKS: u32 = 1_000_000;

// "0.dddddd 0.dddddd\n"
const RECORD_LEN: usize = 18;

const _: () = {
    assert!(CHUNK_BUF_LEN > RECORD_LEN);
    assert!(SAMPLE_TICKS == 1_000_000);
};

/// Counters reported by a successful generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerateStats {
    /// Data lines written (`nx * ny`).
    pub records: u64,
    /// Total bytes written, header included.
    pub bytes_written: u64,
    /// `write_all` calls used for the data lines.
    pub chunk_writes: u64,
}

/// Converts a sample tick to the `f32` the loader will read back.
#[inline]
pub fn tick_value(tick: u32) -> f32 {
    tick as f32 / SAMPLE_TICKS as f32
}

/// Writes `nx * ny` random values to `path`, seeding from process entropy.
pub fn generate(path: &Path, nx: u32, ny: u32) -> Result<GenerateStats, IoError> {
    let mut rng = XorShift64::from_entropy();
    generate_with_rng(path, nx, ny, &mut rng)
}

/// Writes `nx * ny` values drawn from `rng` to `path`.
pub fn generate_with_rng(
    path: &Path,
    nx: u32,
    ny: u32,
    rng: &mut XorShift64,
) -> Result<GenerateStats, IoError> {
    debug!(path = %path.display(), nx, ny, "generating values");
    let file = File::create(path).map_err(IoError::CannotOpen)?;
    write_values(file, nx, ny, rng)
}

/// Serializes `nx * ny` values drawn from `rng` into `out`.
pub fn write_values<W: Write>(
    mut out: W,
    nx: u32,
    ny: u32,
    rng: &mut XorShift64,
) -> Result<GenerateStats, IoError> {
    let mut stats = GenerateStats::default();

    let header = format!("{nx} {ny}\n");
    out.write_all(header.as_bytes())
        .map_err(IoError::WriteFailed)?;
    stats.bytes_written = header.len() as u64;

    let mut chunk = Vec::with_capacity(CHUNK_BUF_LEN);
    for _ in 0..nx {
        for _ in 0..ny {
            let v1 = rng.next_u32(SAMPLE_TICKS);
            let v2 = rng.next_u32(SAMPLE_TICKS);
            push_tick(&mut chunk, v1);
            chunk.push(b' ');
            push_tick(&mut chunk, v2);
            chunk.push(b'\n');
            stats.records += 1;

            if chunk.len() > CHUNK_BUF_LEN - RECORD_LEN {
                flush_chunk(&mut out, &mut chunk, &mut stats)?;
            }
        }
    }
    if !chunk.is_empty() {
        flush_chunk(&mut out, &mut chunk, &mut stats)?;
    }
    out.flush().map_err(IoError::WriteFailed)?;

    debug!(
        records = stats.records,
        bytes = stats.bytes_written,
        chunk_writes = stats.chunk_writes,
        "values written"
    );
    Ok(stats)
}

/// Formats `values` with the file's line layout, header first.
///
/// Unlike [`write_values`] this accepts arbitrary floats; each is printed
/// with `{:.6}`. Useful for replaying hand-built grids.
pub fn write_grid<W: Write>(
    mut out: W,
    nx: u32,
    ny: u32,
    values: &[Value],
) -> Result<(), IoError> {
    writeln!(out, "{nx} {ny}").map_err(IoError::WriteFailed)?;
    for value in values {
        writeln!(out, "{:.6} {:.6}", value.v1, value.v2).map_err(IoError::WriteFailed)?;
    }
    out.flush().map_err(IoError::WriteFailed)
}

fn flush_chunk<W: Write>(
    out: &mut W,
    chunk: &mut Vec<u8>,
    stats: &mut GenerateStats,
) -> Result<(), IoError> {
    trace!(len = chunk.len(), "writing chunk");
    out.write_all(chunk).map_err(IoError::WriteFailed)?;
    stats.bytes_written += chunk.len() as u64;
    stats.chunk_writes += 1;
    chunk.clear();
    Ok(())
}

/// Appends `tick / 10^6` as `0.dddddd`.
#[inline]
fn push_tick(buf: &mut Vec<u8>, tick: u32) {
    debug_assert!(tick < SAMPLE_TICKS);
    let mut text = *b"0.000000";
    let mut rest = tick;
    for digit in text[2..].iter_mut().rev() {
        *digit = b'0' + (rest % 10) as u8;
        rest /= 10;
    }
    buf.extend_from_slice(&text);
}
