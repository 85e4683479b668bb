//! Every scan path agrees with a naive first-occurrence reference.
//!
//! Values are drawn from a small alphabet (with NaN mixed in) so ties and
//! NaN placements are common.

use proptest::prelude::*;

use gridmax::boxed::BoxedPositionedGrid;
use gridmax::{
    annotate, find_max_v1, find_max_v1_v2, find_max_v2, scan, ScanStrategy, Value, ValueGrid,
};

fn sample() -> impl Strategy<Value = f32> {
    prop_oneof![
        8 => (0u8..5).prop_map(|n| f32::from(n) * 0.25),
        1 => Just(f32::NAN),
        1 => Just(f32::NEG_INFINITY),
    ]
}

fn grid_values() -> impl Strategy<Value = (u32, u32, Vec<Value>)> {
    (0u32..10, 0u32..10).prop_flat_map(|(nx, ny)| {
        let cell = (sample(), sample()).prop_map(|(a, b)| Value::new(a, b));
        (
            Just(nx),
            Just(ny),
            prop::collection::vec(cell, (nx * ny) as usize),
        )
    })
}

/// Strict `>` scan seeded at index 0.
fn reference(keys: impl Iterator<Item = f32>) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, key) in keys.enumerate() {
        match best {
            None => best = Some((i, key)),
            Some((_, b)) if key > b => best = Some((i, key)),
            Some(_) => {}
        }
    }
    best.map(|(i, _)| i)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(crate::cases(256)))]

    #[test]
    fn all_paths_match_reference((nx, ny, values) in grid_values()) {
        let values_grid = ValueGrid::from_slice(nx, ny, &values).unwrap();
        let flat = annotate(&values_grid);
        let boxed = BoxedPositionedGrid::from_flat(&flat);

        let want_v1 = reference(values.iter().map(|v| v.v1));
        let want_v2 = reference(values.iter().map(|v| v.v2));
        let idx = |hit: Option<gridmax::MaxHit<'_>>| hit.map(|h| h.index());

        prop_assert_eq!(idx(find_max_v1(&flat)), want_v1);
        prop_assert_eq!(idx(find_max_v2(&flat)), want_v2);
        for strategy in [ScanStrategy::TwoPass, ScanStrategy::Fused] {
            let pair = scan(&flat, strategy);
            prop_assert_eq!((idx(pair.v1), idx(pair.v2)), (want_v1, want_v2));
        }
        let fused = find_max_v1_v2(&flat);
        prop_assert_eq!((idx(fused.v1), idx(fused.v2)), (want_v1, want_v2));

        prop_assert_eq!(idx(boxed.find_max_v1()), want_v1);
        prop_assert_eq!(idx(boxed.find_max_v2()), want_v2);
        let boxed_pair = boxed.find_max_v1_v2();
        prop_assert_eq!((idx(boxed_pair.v1), idx(boxed_pair.v2)), (want_v1, want_v2));
    }

    #[test]
    fn hit_position_matches_index((nx, ny, values) in grid_values()) {
        prop_assume!(nx > 0 && ny > 0);
        let flat = annotate(&ValueGrid::from_slice(nx, ny, &values).unwrap());
        let hit = find_max_v1(&flat).unwrap();
        let (x, y) = hit.position();
        prop_assert_eq!(x as usize * ny as usize + y as usize, hit.index());
        prop_assert!(std::ptr::eq(hit.record(), flat.get(x, y).unwrap()));
    }
}
