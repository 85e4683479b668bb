#![no_main]

use gridmax::{annotate, find_max_v1_v2, load_from_reader, scan, ScanStrategy};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Cap the header so a tiny input cannot request a multi-gigabyte grid.
    let text_end = data.iter().position(|&b| b == b'\n').unwrap_or(data.len());
    let header = &data[..text_end];
    if header.len() > 7 {
        return;
    }

    let Ok(values) = load_from_reader(data) else {
        return;
    };
    assert_eq!(
        values.len() as u64,
        u64::from(values.nx()) * u64::from(values.ny())
    );

    let grid = annotate(&values);
    let fused = find_max_v1_v2(&grid);
    let two_pass = scan(&grid, ScanStrategy::TwoPass);
    let index = |pair: gridmax::MaxPair<'_>| {
        (pair.v1.map(|h| h.index()), pair.v2.map(|h| h.index()))
    };
    assert_eq!(index(fused), index(two_pass));
    assert_eq!(fused.v1.is_none(), grid.is_empty());
});
