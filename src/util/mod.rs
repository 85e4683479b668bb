//! Low-level allocation helpers shared by the grid types.

pub mod aligned;

pub use aligned::{AlignedBuf, AllocError, Zeroable};
