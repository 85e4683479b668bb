use std::fs;
use std::io::{self, Read};

use gridmax::{generate_with_rng, load, load_from_reader, LoadError, XorShift64};
use tempfile::TempDir;

fn load_text(text: &str) -> Result<gridmax::ValueGrid, LoadError> {
    load_from_reader(text.as_bytes())
}

/// Reader that hands out `data` and then fails.
struct FailingReader<'a> {
    data: &'a [u8],
}

impl Read for FailingReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.data.is_empty() {
            return Err(io::Error::other("disk went away"));
        }
        let n = buf.len().min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

#[test]
fn missing_file_is_cannot_open() {
    let tmp = TempDir::new().unwrap();
    let err = load(&tmp.path().join("absent.txt")).unwrap_err();
    match err {
        LoadError::CannotOpen(io) => assert_eq!(io.kind(), io::ErrorKind::NotFound),
        other => panic!("expected CannotOpen, got {other:?}"),
    }
}

#[test]
fn truncated_generated_file_is_count_mismatch() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("values.txt");
    generate_with_rng(&path, 3, 3, &mut XorShift64::new(1)).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let kept: Vec<&str> = text.lines().take(1 + 8).collect();
    fs::write(&path, kept.join("\n") + "\n").unwrap();

    match load(&path).unwrap_err() {
        LoadError::CountMismatch { expected, found } => assert_eq!((expected, found), (9, 8)),
        other => panic!("expected CountMismatch, got {other:?}"),
    }
}

#[test]
fn header_errors() {
    for text in ["", "\n", "abc\n", "2\n", "2 3 4\n", "-1 3\n", "2.0 3\n"] {
        assert!(
            matches!(load_text(text), Err(LoadError::BadHeader)),
            "{text:?}"
        );
    }
}

#[test]
fn record_errors_report_the_file_line() {
    let cases = [
        ("1 2\n0.1 0.2\nxyz 0.3\n", 3),
        ("1 2\n0.1\n0.1 0.2\n", 2),
        ("1 2\n0.1 0.2\n\n", 3),
        ("1 2\n0.1 0.2 0.3\n0.1 0.2\n", 2),
    ];
    for (text, line) in cases {
        match load_text(text) {
            Err(LoadError::BadRecord { line: got }) => assert_eq!(got, line, "{text:?}"),
            other => panic!("{text:?}: expected BadRecord, got {other:?}"),
        }
    }
}

#[test]
fn extra_records_are_counted() {
    match load_text("1 1\n0.1 0.2\n0.3 0.4\n0.5 0.6\n") {
        Err(LoadError::CountMismatch { expected, found }) => assert_eq!((expected, found), (1, 3)),
        other => panic!("expected CountMismatch, got {other:?}"),
    }
}

#[test]
#[cfg(target_pointer_width = "64")]
fn absurd_header_is_out_of_memory() {
    match load_text("4294967295 4294967295\n") {
        Err(LoadError::OutOfMemory { elements }) => {
            assert_eq!(elements, u64::from(u32::MAX) * u64::from(u32::MAX));
        }
        other => panic!("expected OutOfMemory, got {other:?}"),
    }
}

#[test]
fn read_failure_is_surfaced() {
    let reader = FailingReader {
        data: b"2 2\n0.1 0.2\n",
    };
    let err = load_from_reader(reader).unwrap_err();
    assert!(matches!(err, LoadError::Read(_)), "{err:?}");
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn zero_sized_grid_with_no_records_loads() {
    let grid = load_text("0 5\n").unwrap();
    assert!(grid.is_empty());
    assert_eq!((grid.nx(), grid.ny()), (0, 5));
}

#[test]
fn error_messages_are_descriptive() {
    let err = load_text("2 2\n0.1 0.2\n").unwrap_err();
    assert_eq!(
        err.to_string(),
        "mismatch in number of values: header declares 4, found 1"
    );
    assert_eq!(
        load_text("x").unwrap_err().to_string(),
        "failed to parse grid size header"
    );
}
