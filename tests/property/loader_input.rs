//! Loader properties.
//!
//! Any grid written on the sample grid reloads bit-exact regardless of how
//! the stream is split into reads, and arbitrary bytes never panic the
//! loader.

use std::io::{self, Read};

use proptest::prelude::*;

use gridmax::{load_from_reader, tick_value, write_grid, write_values, LoadError, Value, XorShift64};

/// Reader that returns at most `step` bytes per call.
struct Trickle<'a> {
    data: &'a [u8],
    step: usize,
}

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.step).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

fn tick_grid() -> impl Strategy<Value = (u32, u32, Vec<Value>)> {
    (0u32..9, 0u32..9).prop_flat_map(|(nx, ny)| {
        let cell = (0u32..1_000_000, 0u32..1_000_000)
            .prop_map(|(a, b)| Value::new(tick_value(a), tick_value(b)));
        (
            Just(nx),
            Just(ny),
            prop::collection::vec(cell, (nx * ny) as usize),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(crate::cases(128)))]

    #[test]
    fn written_grids_reload_exactly((nx, ny, values) in tick_grid(), step in 1usize..64) {
        let mut text = Vec::new();
        write_grid(&mut text, nx, ny, &values).unwrap();

        let grid = load_from_reader(Trickle { data: &text, step }).unwrap();
        prop_assert_eq!((grid.nx(), grid.ny()), (nx, ny));
        prop_assert_eq!(grid.as_slice(), &values[..]);
    }

    #[test]
    fn generated_streams_reload(seed in any::<u64>(), nx in 0u32..16, ny in 0u32..16) {
        let mut text = Vec::new();
        let stats = write_values(&mut text, nx, ny, &mut XorShift64::new(seed)).unwrap();
        prop_assert_eq!(stats.bytes_written, text.len() as u64);

        let grid = load_from_reader(&text[..]).unwrap();
        prop_assert_eq!(grid.len() as u64, stats.records);
    }

    #[test]
    fn dropping_a_record_is_count_mismatch((nx, ny, values) in tick_grid()) {
        prop_assume!(!values.is_empty());
        let mut text = Vec::new();
        write_grid(&mut text, nx, ny, &values[..values.len() - 1]).unwrap();

        match load_from_reader(&text[..]) {
            Err(LoadError::CountMismatch { expected, found }) => {
                prop_assert_eq!(expected, values.len() as u64);
                prop_assert_eq!(found, values.len() as u64 - 1);
            }
            other => prop_assert!(false, "expected CountMismatch, got {:?}", other),
        }
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        if let Ok(grid) = load_from_reader(&bytes[..]) {
            prop_assert_eq!(grid.len() as u64, u64::from(grid.nx()) * u64::from(grid.ny()));
        }
    }
}
