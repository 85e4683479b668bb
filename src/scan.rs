//! Maxima scanner.
//!
//! Finds the record with the largest `v1` and the record with the largest
//! `v2`, either as two independent passes or as one fused pass.
//!
//! # Contract (both strategies)
//! - Traversal order is flat index `0..len`, ascending.
//! - Comparison is strict `>`: among equal maxima the smallest index wins.
//! - An empty grid yields `None`; index 0 is never read in that case.
//! - IEEE-754 semantics: the first record seeds the running maximum even if
//!   it is NaN, and every comparison against NaN is false. A NaN seed is
//!   therefore never replaced, and a NaN after a number is never selected.
//! - No allocation and no mutation.
//!
//! Both strategies, and the boxed layout in [`crate::boxed`], go through the
//! same [`RunningMax`] tracker so their tie-break rules cannot drift apart.

use serde::{Deserialize, Serialize};

use crate::grid::{PositionedGrid, PositionedRecord};

/// Which traversal to use for the pair of maxima.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStrategy {
    /// One pass for `v1`, a second pass for `v2`.
    #[default]
    TwoPass,
    /// One pass tracking both maxima.
    Fused,
}

/// A maximum: its flat index plus a borrow of the record in the owning grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaxHit<'g> {
    index: usize,
    record: &'g PositionedRecord,
}

impl<'g> MaxHit<'g> {
    /// Flat row-major index of the record.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn record(&self) -> &'g PositionedRecord {
        self.record
    }

    /// `(x, y)` of the record.
    #[inline]
    pub fn position(&self) -> (u32, u32) {
        (self.record.x, self.record.y)
    }
}

/// Maxima of `v1` and `v2`. Both are `None` exactly when the grid is empty.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MaxPair<'g> {
    pub v1: Option<MaxHit<'g>>,
    pub v2: Option<MaxHit<'g>>,
}

/// Running first-occurrence maximum over a single key.
#[derive(Clone, Copy)]
pub(crate) struct RunningMax<'g> {
    index: usize,
    best: f32,
    record: &'g PositionedRecord,
}

impl<'g> RunningMax<'g> {
    #[inline(always)]
    pub(crate) fn seed(record: &'g PositionedRecord, key: f32) -> Self {
        Self {
            index: 0,
            best: key,
            record,
        }
    }

    #[inline(always)]
    pub(crate) fn offer(&mut self, index: usize, record: &'g PositionedRecord, key: f32) {
        if key > self.best {
            self.best = key;
            self.index = index;
            self.record = record;
        }
    }

    #[inline(always)]
    pub(crate) fn hit(self) -> MaxHit<'g> {
        MaxHit {
            index: self.index,
            record: self.record,
        }
    }
}

/// First maximum of `key` over `records` in iteration order.
#[inline]
pub(crate) fn first_max_by<'g, I, K>(records: I, key: K) -> Option<MaxHit<'g>>
where
    I: IntoIterator<Item = &'g PositionedRecord>,
    K: Fn(&PositionedRecord) -> f32,
{
    let mut iter = records.into_iter();
    let first = iter.next()?;
    let mut best = RunningMax::seed(first, key(first));
    for (offset, record) in iter.enumerate() {
        best.offer(offset + 1, record, key(record));
    }
    Some(best.hit())
}

/// First maxima of `v1` and `v2` over `records` in one traversal.
#[inline]
pub(crate) fn first_max_pair<'g, I>(records: I) -> MaxPair<'g>
where
    I: IntoIterator<Item = &'g PositionedRecord>,
{
    let mut iter = records.into_iter();
    let Some(first) = iter.next() else {
        return MaxPair::default();
    };
    let mut v1 = RunningMax::seed(first, first.v1);
    let mut v2 = RunningMax::seed(first, first.v2);
    for (offset, record) in iter.enumerate() {
        let index = offset + 1;
        v1.offer(index, record, record.v1);
        v2.offer(index, record, record.v2);
    }
    MaxPair {
        v1: Some(v1.hit()),
        v2: Some(v2.hit()),
    }
}

/// Record with the largest `v1`; first occurrence wins ties.
pub fn find_max_v1(grid: &PositionedGrid) -> Option<MaxHit<'_>> {
    first_max_by(grid.as_slice(), |r| r.v1)
}

/// Record with the largest `v2`; first occurrence wins ties.
pub fn find_max_v2(grid: &PositionedGrid) -> Option<MaxHit<'_>> {
    first_max_by(grid.as_slice(), |r| r.v2)
}

/// Both maxima in a single pass.
pub fn find_max_v1_v2(grid: &PositionedGrid) -> MaxPair<'_> {
    first_max_pair(grid.as_slice())
}

/// Both maxima using `strategy`. Results are identical for either strategy.
pub fn scan(grid: &PositionedGrid, strategy: ScanStrategy) -> MaxPair<'_> {
    match strategy {
        ScanStrategy::TwoPass => MaxPair {
            v1: find_max_v1(grid),
            v2: find_max_v2(grid),
        },
        ScanStrategy::Fused => find_max_v1_v2(grid),
    }
}
