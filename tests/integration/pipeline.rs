use std::fs;
use std::path::Path;

use gridmax::boxed::BoxedPositionedGrid;
use gridmax::{
    annotate, find_max_v1, find_max_v1_v2, find_max_v2, generate_with_rng, load, scan,
    tick_value, write_grid, ScanStrategy, Value, ValueGrid, XorShift64, GRID_ALIGN,
};
use tempfile::TempDir;

fn write_file(dir: &Path, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn two_by_two_file_end_to_end() {
    let tmp = TempDir::new().unwrap();
    let path = write_file(
        tmp.path(),
        "values.txt",
        "2 2\n0.1 0.9\n0.5 0.2\n0.9 0.1\n0.3 0.4\n",
    );

    let values = load(&path).unwrap();
    assert_eq!((values.nx(), values.ny()), (2, 2));
    assert_eq!(values.get(1, 0), Some(&Value::new(0.9, 0.1)));

    let grid = annotate(&values);
    let v1 = find_max_v1(&grid).unwrap();
    let v2 = find_max_v2(&grid).unwrap();
    assert_eq!((v1.position(), v1.record().v1), ((1, 0), 0.9));
    assert_eq!((v2.position(), v2.record().v2), ((0, 0), 0.9));
    assert_eq!(find_max_v1_v2(&grid), scan(&grid, ScanStrategy::TwoPass));
}

#[test]
fn generated_file_reloads_on_the_sample_grid() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("values.txt");
    let mut rng = XorShift64::new(0x5eed);

    let stats = generate_with_rng(&path, 30, 40, &mut rng).unwrap();
    assert_eq!(stats.records, 1200);
    assert_eq!(stats.bytes_written, fs::metadata(&path).unwrap().len());

    let values = load(&path).unwrap();
    assert_eq!(values.len(), 1200);
    assert!((values.as_slice().as_ptr() as usize).is_multiple_of(GRID_ALIGN));
    for value in values.as_slice() {
        for v in [value.v1, value.v2] {
            assert!((0.0..1.0).contains(&v), "{v}");
            let tick = (f64::from(v) * 1e6).round() as u32;
            assert_eq!(tick_value(tick).to_bits(), v.to_bits());
        }
    }
}

#[test]
fn same_seed_gives_same_file() {
    let tmp = TempDir::new().unwrap();
    let a = tmp.path().join("a.txt");
    let b = tmp.path().join("b.txt");
    generate_with_rng(&a, 5, 7, &mut XorShift64::new(3)).unwrap();
    generate_with_rng(&b, 5, 7, &mut XorShift64::new(3)).unwrap();
    assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
}

#[test]
fn annotated_positions_follow_row_major_order() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("values.txt");
    generate_with_rng(&path, 4, 6, &mut XorShift64::new(9)).unwrap();

    let values = load(&path).unwrap();
    let grid = annotate(&values);
    assert_eq!(grid.len(), values.len());
    assert_eq!(grid.storage_align(), Some(GRID_ALIGN));
    for (i, (record, value)) in grid.as_slice().iter().zip(values.as_slice()).enumerate() {
        assert_eq!(record.x as usize, i / 6);
        assert_eq!(record.y as usize, i % 6);
        assert_eq!((record.v1, record.v2), (value.v1, value.v2));
    }
}

#[test]
fn boxed_and_flat_layouts_agree_on_generated_data() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("values.txt");
    generate_with_rng(&path, 17, 23, &mut XorShift64::new(42)).unwrap();

    let values = load(&path).unwrap();
    let flat = annotate(&values);
    let boxed = BoxedPositionedGrid::from_values(&values);

    let index = |hit: Option<gridmax::MaxHit<'_>>| hit.map(|h| h.index());
    assert_eq!(index(boxed.find_max_v1()), index(find_max_v1(&flat)));
    assert_eq!(index(boxed.find_max_v2()), index(find_max_v2(&flat)));
    let pair = boxed.find_max_v1_v2();
    let flat_pair = find_max_v1_v2(&flat);
    assert_eq!(index(pair.v1), index(flat_pair.v1));
    assert_eq!(index(pair.v2), index(flat_pair.v2));
}

#[test]
fn write_grid_replays_hand_built_values() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("values.txt");
    let values = [
        Value::new(0.25, 0.5),
        Value::new(0.75, 0.125),
        Value::new(0.75, 0.5),
    ];
    write_grid(fs::File::create(&path).unwrap(), 1, 3, &values).unwrap();

    let loaded = load(&path).unwrap();
    assert_eq!(loaded.as_slice(), &values);

    let grid = annotate(&ValueGrid::from_slice(1, 3, &values).unwrap());
    let pair = scan(&grid, ScanStrategy::Fused);
    assert_eq!(pair.v1.unwrap().position(), (0, 1));
    assert_eq!(pair.v2.unwrap().position(), (0, 0));
}
