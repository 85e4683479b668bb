//! Allocation accounting owned by the driver.
//!
//! Grids report their footprint via `footprint_bytes()`; whoever owns the
//! grids records the allocation when it receives one and the release when it
//! drops one. There is no process-wide counter. Counters saturate.

use serde::Serialize;

#[inline(always)]
fn sat_add_u64(counter: &mut u64, delta: u64) {
    *counter = counter.saturating_add(delta);
}

#[inline(always)]
fn max_u64(counter: &mut u64, value: u64) {
    *counter = (*counter).max(value);
}

/// Byte-level allocation ledger for grid buffers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AllocLedger {
    live_bytes: u64,
    peak_bytes: u64,
    total_allocated_bytes: u64,
    alloc_count: u64,
    release_count: u64,
}

impl AllocLedger {
    pub const fn new() -> Self {
        Self {
            live_bytes: 0,
            peak_bytes: 0,
            total_allocated_bytes: 0,
            alloc_count: 0,
            release_count: 0,
        }
    }

    /// Records a new buffer of `bytes`.
    pub fn record_alloc(&mut self, bytes: usize) {
        let bytes = bytes as u64;
        sat_add_u64(&mut self.live_bytes, bytes);
        sat_add_u64(&mut self.total_allocated_bytes, bytes);
        sat_add_u64(&mut self.alloc_count, 1);
        max_u64(&mut self.peak_bytes, self.live_bytes);
    }

    /// Records the release of a buffer of `bytes`.
    ///
    /// Releasing more than is live is a bookkeeping bug; it is caught in
    /// debug builds and clamped to zero otherwise.
    pub fn record_release(&mut self, bytes: usize) {
        let bytes = bytes as u64;
        debug_assert!(bytes <= self.live_bytes, "release exceeds live bytes");
        self.live_bytes = self.live_bytes.saturating_sub(bytes);
        sat_add_u64(&mut self.release_count, 1);
    }

    /// Bytes currently allocated and not yet released.
    #[inline]
    pub fn live_bytes(&self) -> u64 {
        self.live_bytes
    }

    /// Highest `live_bytes` seen.
    #[inline]
    pub fn peak_bytes(&self) -> u64 {
        self.peak_bytes
    }

    /// Sum of every recorded allocation.
    #[inline]
    pub fn total_allocated_bytes(&self) -> u64 {
        self.total_allocated_bytes
    }

    #[inline]
    pub fn alloc_count(&self) -> u64 {
        self.alloc_count
    }

    #[inline]
    pub fn release_count(&self) -> u64 {
        self.release_count
    }
}
