//! Pointer-of-pointers baseline layout.
//!
//! Every record is its own heap allocation and every row is a separate
//! vector of pointers, the layout the flat grid replaces. Scans walk rows in
//! order and report flat row-major indices, so results are directly
//! comparable with [`crate::scan`].
//!
//! This type exists for benchmarking and equivalence tests; production code
//! paths use [`PositionedGrid`].

use std::mem::size_of;

use crate::grid::{PositionedGrid, PositionedRecord, ValueGrid};
use crate::scan::{first_max_by, first_max_pair, MaxHit, MaxPair};

/// Row vectors of individually boxed records.
pub struct BoxedPositionedGrid {
    nx: u32,
    ny: u32,
    rows: Vec<Vec<Box<PositionedRecord>>>,
}

impl BoxedPositionedGrid {
    /// Annotates `grid` straight into the boxed layout.
    pub fn from_values(grid: &ValueGrid) -> Self {
        let (nx, ny) = (grid.nx(), grid.ny());
        let mut values = grid.as_slice().iter();
        let rows = (0..nx)
            .map(|x| {
                (0..ny)
                    .zip(values.by_ref())
                    .map(|(y, value)| {
                        Box::new(PositionedRecord {
                            x,
                            y,
                            v1: value.v1,
                            v2: value.v2,
                        })
                    })
                    .collect()
            })
            .collect();
        Self { nx, ny, rows }
    }

    /// Copies a flat grid into the boxed layout.
    pub fn from_flat(grid: &PositionedGrid) -> Self {
        let ny = grid.ny() as usize;
        let rows = (0..grid.nx() as usize)
            .map(|x| {
                grid.as_slice()[x * ny..(x + 1) * ny]
                    .iter()
                    .map(|record| Box::new(*record))
                    .collect()
            })
            .collect();
        Self {
            nx: grid.nx(),
            ny: grid.ny(),
            rows,
        }
    }

    #[inline]
    pub fn nx(&self) -> u32 {
        self.nx
    }

    #[inline]
    pub fn ny(&self) -> u32 {
        self.ny
    }

    pub fn len(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, x: u32, y: u32) -> Option<&PositionedRecord> {
        self.rows
            .get(x as usize)?
            .get(y as usize)
            .map(|record| &**record)
    }

    /// Heap bytes for records, record pointers, and row headers.
    pub fn footprint_bytes(&self) -> usize {
        let cells = self.len();
        cells * size_of::<PositionedRecord>()
            + cells * size_of::<Box<PositionedRecord>>()
            + self.rows.len() * size_of::<Vec<Box<PositionedRecord>>>()
    }

    fn records(&self) -> impl Iterator<Item = &PositionedRecord> + '_ {
        self.rows.iter().flatten().map(|record| &**record)
    }

    pub fn find_max_v1(&self) -> Option<MaxHit<'_>> {
        first_max_by(self.records(), |r| r.v1)
    }

    pub fn find_max_v2(&self) -> Option<MaxHit<'_>> {
        first_max_by(self.records(), |r| r.v2)
    }

    pub fn find_max_v1_v2(&self) -> MaxPair<'_> {
        first_max_pair(self.records())
    }
}
