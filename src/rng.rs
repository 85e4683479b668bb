//! # RNG Module
//!
//! Small XorShift64 generator for sample values.
//!
//! ## Design Choices
//!
//! **Generator**: XorShift64. Fast, tiny state, and good enough to fill a
//! benchmark grid; this is not a statistical-quality source.
//!
//! **Bounded sampling**: Lemire's multiply-high method, so drawing a sample
//! tick in `[0, 10^6)` costs a multiply rather than a division.
//!
//! **Seeding**: [`XorShift64::from_entropy`] mixes the wall clock and process
//! id through SplitMix64. Runs are not reproducible unless the caller pins a
//! seed with [`XorShift64::new`].
//!
//! **No `Copy`**: copying an RNG duplicates the stream. Use `clone()`
//! explicitly when that is really wanted.

use std::time::{SystemTime, UNIX_EPOCH};

/// XorShift64 pseudo-random generator.
///
/// NOT thread-safe; each caller owns its instance.
#[derive(Clone, Debug)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// Create a new RNG with the given seed.
    ///
    /// Seed 0 is mapped to a non-zero value to avoid the all-zero lockup state.
    #[inline]
    pub fn new(seed: u64) -> Self {
        let seed = if seed == 0 { 0x9E3779B97F4A7C15 } else { seed };
        Self { state: seed }
    }

    /// Seed from the wall clock and process id.
    pub fn from_entropy() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        let pid = u64::from(std::process::id());
        Self::new(splitmix64(nanos ^ pid.rotate_left(32)))
    }

    /// Generate the next u64 value.
    ///
    /// Shift constants (13, 7, 17) are Marsaglia's full-period triple.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generate a random u32 in `[0, upper)`.
    ///
    /// # Panics
    /// Panics in debug builds if `upper` is 0.
    #[inline]
    pub fn next_u32(&mut self, upper: u32) -> u32 {
        debug_assert!(upper > 0, "upper bound must be > 0");

        if upper.is_power_of_two() {
            // High bits: the low bits of XorShift are weaker.
            return ((self.next_u64() >> 32) as u32) & (upper - 1);
        }

        self.bounded_u64(u64::from(upper)) as u32
    }

    /// Lemire's nearly-divisionless bounded draw.
    #[inline]
    fn bounded_u64(&mut self, upper: u64) -> u64 {
        // 2^64 mod upper: outputs below this would bias the low buckets.
        let threshold = upper.wrapping_neg() % upper;

        loop {
            let m = u128::from(self.next_u64()) * u128::from(upper);
            if (m as u64) >= threshold {
                return (m >> 64) as u64;
            }
        }
    }

    /// Current state, for reproducing a sequence with [`XorShift64::new`].
    #[inline]
    pub fn state(&self) -> u64 {
        self.state
    }
}

impl Default for XorShift64 {
    fn default() -> Self {
        Self::new(0)
    }
}

/// SplitMix64 finalizer (Vigna, 2017); spreads low-entropy seeds.
#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}
