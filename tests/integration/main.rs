//! Integration tests for the gridmax pipeline.
//!
//! Run with: `cargo test --test integration`

mod load_errors;
mod pipeline;
