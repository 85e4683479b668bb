//! Flat, row-major grid types.
//!
//! Both grids keep all cells in a single [`AlignedBuf`] aligned to
//! [`GRID_ALIGN`]. Cell `(x, y)` lives at flat index `x * ny + y`; every
//! layout in this crate preserves that mapping.
//!
//! Grids are write-once: the loader and the annotator fill them during
//! construction and nothing mutates them afterwards.

use std::mem::size_of;

use crate::error::ShapeError;
use crate::util::{AlignedBuf, Zeroable};

/// Minimum alignment of grid storage (one x86 cache line).
pub const GRID_ALIGN: usize = 64;

/// A pair of samples.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Value {
    pub v1: f32,
    pub v2: f32,
}

impl Value {
    #[inline]
    pub const fn new(v1: f32, v2: f32) -> Self {
        Self { v1, v2 }
    }
}

/// A [`Value`] tagged with its row `x` and column `y`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PositionedRecord {
    pub x: u32,
    pub y: u32,
    pub v1: f32,
    pub v2: f32,
}

const _: () = {
    assert!(size_of::<Value>() == 8);
    assert!(size_of::<PositionedRecord>() == 16);
    assert!(GRID_ALIGN.is_power_of_two());
    assert!(GRID_ALIGN.is_multiple_of(size_of::<Value>()));
    assert!(GRID_ALIGN.is_multiple_of(size_of::<PositionedRecord>()));
};

// SAFETY: plain `#[repr(C)]` structs of u32/f32 fields; all-zero is valid.
unsafe impl Zeroable for Value {}
unsafe impl Zeroable for PositionedRecord {}

/// Number of cells in an `nx` x `ny` grid, if addressable on this target.
#[inline]
pub fn cell_count(nx: u32, ny: u32) -> Option<usize> {
    usize::try_from(u64::from(nx) * u64::from(ny)).ok()
}

/// Dense row-major grid of [`Value`]s produced by the loader.
#[derive(Debug)]
pub struct ValueGrid {
    nx: u32,
    ny: u32,
    values: AlignedBuf<Value>,
}

impl ValueGrid {
    pub(crate) fn from_parts(nx: u32, ny: u32, values: AlignedBuf<Value>) -> Self {
        debug_assert_eq!(cell_count(nx, ny), Some(values.len()));
        Self { nx, ny, values }
    }

    /// Copies `values` (row-major) into a new aligned grid.
    pub fn from_slice(nx: u32, ny: u32, values: &[Value]) -> Result<Self, ShapeError> {
        if cell_count(nx, ny) != Some(values.len()) {
            return Err(ShapeError {
                nx,
                ny,
                found: values.len(),
            });
        }
        let mut buf = AlignedBuf::zeroed(values.len(), GRID_ALIGN);
        buf.copy_from_slice(values);
        Ok(Self::from_parts(nx, ny, buf))
    }

    #[inline]
    pub fn nx(&self) -> u32 {
        self.nx
    }

    #[inline]
    pub fn ny(&self) -> u32 {
        self.ny
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }

    /// Returns the value at row `x`, column `y`.
    pub fn get(&self, x: u32, y: u32) -> Option<&Value> {
        if x >= self.nx || y >= self.ny {
            return None;
        }
        self.values.get(x as usize * self.ny as usize + y as usize)
    }

    /// Bytes held by the flat value buffer.
    #[inline]
    pub fn footprint_bytes(&self) -> usize {
        self.values.footprint_bytes()
    }
}

/// Dense row-major grid of [`PositionedRecord`]s produced by the annotator.
#[derive(Debug)]
pub struct PositionedGrid {
    nx: u32,
    ny: u32,
    records: AlignedBuf<PositionedRecord>,
}

impl PositionedGrid {
    pub(crate) fn from_parts(nx: u32, ny: u32, records: AlignedBuf<PositionedRecord>) -> Self {
        debug_assert_eq!(cell_count(nx, ny), Some(records.len()));
        Self { nx, ny, records }
    }

    #[inline]
    pub fn nx(&self) -> u32 {
        self.nx
    }

    #[inline]
    pub fn ny(&self) -> u32 {
        self.ny
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[PositionedRecord] {
        &self.records
    }

    /// Returns the record at row `x`, column `y`.
    pub fn get(&self, x: u32, y: u32) -> Option<&PositionedRecord> {
        if x >= self.nx || y >= self.ny {
            return None;
        }
        self.records.get(x as usize * self.ny as usize + y as usize)
    }

    /// Bytes held by the flat record buffer.
    #[inline]
    pub fn footprint_bytes(&self) -> usize {
        self.records.footprint_bytes()
    }

    /// Base alignment of the record buffer; `None` for an empty grid.
    #[inline]
    pub fn storage_align(&self) -> Option<usize> {
        self.records.align()
    }
}
