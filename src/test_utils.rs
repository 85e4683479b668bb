use crate::annotate::annotate;
use crate::grid::{PositionedGrid, Value, ValueGrid};

pub fn env_u32(name: &str) -> Option<u32> {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
}

fn is_ci() -> bool {
    std::env::var_os("CI").is_some()
}

/// Proptest case count: `PROPTEST_CASES` wins, CI gets `default`, local
/// runs are capped at 16.
pub fn proptest_cases(default: u32) -> u32 {
    if let Some(value) = env_u32("PROPTEST_CASES") {
        return value.max(1);
    }
    if is_ci() {
        return default.max(1);
    }
    default.clamp(1, 16)
}

/// Builds an annotated grid from row-major `(v1, v2)` pairs.
pub fn positioned_from_pairs(nx: u32, ny: u32, pairs: &[(f32, f32)]) -> PositionedGrid {
    let values: Vec<Value> = pairs.iter().map(|&(v1, v2)| Value::new(v1, v2)).collect();
    let grid = ValueGrid::from_slice(nx, ny, &values).expect("pairs match grid shape");
    annotate(&grid)
}
