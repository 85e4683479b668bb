//! Property-based tests for the loader and the maxima scanner.
//!
//! Run with: `cargo test --test property`

mod loader_input;
mod scan_equivalence;

/// Proptest case count: `PROPTEST_CASES` wins, otherwise `default`.
pub(crate) fn cases(default: u32) -> u32 {
    std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
        .unwrap_or(default)
        .max(1)
}
