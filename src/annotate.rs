//! Position annotator: expands a [`ValueGrid`] into a [`PositionedGrid`].

use tracing::debug;

use crate::grid::{PositionedGrid, PositionedRecord, ValueGrid, GRID_ALIGN};
use crate::util::AlignedBuf;

/// Tags every value with its row-major `(x, y)` position.
///
/// The output is a fresh allocation with the same dimensions; `grid` is only
/// read. Empty grids produce an empty result without allocating.
pub fn annotate(grid: &ValueGrid) -> PositionedGrid {
    let (nx, ny) = (grid.nx(), grid.ny());
    let mut records: AlignedBuf<PositionedRecord> = AlignedBuf::zeroed(grid.len(), GRID_ALIGN);
    debug!(
        nx,
        ny,
        bytes = records.footprint_bytes(),
        "annotating positions"
    );

    let values = grid.as_slice();
    let out = records.as_mut_slice();
    let mut idx = 0usize;
    for x in 0..nx {
        for y in 0..ny {
            let value = values[idx];
            out[idx] = PositionedRecord {
                x,
                y,
                v1: value.v1,
                v2: value.v2,
            };
            idx += 1;
        }
    }
    debug_assert_eq!(idx, out.len());

    PositionedGrid::from_parts(nx, ny, records)
}
