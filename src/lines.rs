//! Chunked line reader.
//!
//! Reads a stream in fixed-size chunks and hands complete lines to a
//! callback. A line that straddles a chunk boundary is carried to the front
//! of the buffer before the next read, so every emitted line is contiguous.
//!
//! The caller owns the staging buffer so repeated loads reuse one
//! allocation. Lines are capped at `max_line` bytes, so the buffer never
//! holds more than `max_line + chunk_size` bytes.

use std::fmt;
use std::io::{self, Read};

use memchr::memchr_iter;

/// A line ran past the length limit before its newline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineTooLong {
    /// 1-based number of the offending line.
    pub line: u64,
}

impl fmt::Display for LineTooLong {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} exceeds the maximum line length", self.line)
    }
}

impl std::error::Error for LineTooLong {}

/// Calls `emit(line_no, line)` for every line in `reader`.
///
/// `line_no` is 1-based. The terminating `\n` is stripped; a trailing `\r`
/// is left for the caller. A final line without a newline is still emitted.
/// An empty stream emits nothing.
///
/// A line longer than `max_line` bytes (newline excluded) stops the read
/// with [`LineTooLong`] before any more input is buffered.
pub fn for_each_line<R, E, F>(
    mut reader: R,
    buf: &mut Vec<u8>,
    chunk_size: usize,
    max_line: usize,
    mut emit: F,
) -> Result<(), E>
where
    R: Read,
    E: From<io::Error> + From<LineTooLong>,
    F: FnMut(u64, &[u8]) -> Result<(), E>,
{
    assert!(chunk_size > 0);
    buf.clear();
    buf.reserve_exact(max_line + chunk_size);
    let mut line_no = 0u64;

    loop {
        // `buf` holds only the unterminated tail of the previous chunk here.
        let filled = buf.len();
        buf.resize(filled + chunk_size, 0);
        let read = match read_retrying(&mut reader, &mut buf[filled..]) {
            Ok(read) => read,
            Err(err) => {
                buf.truncate(filled);
                return Err(err.into());
            }
        };
        buf.truncate(filled + read);
        if read == 0 {
            break;
        }

        let mut line_start = 0usize;
        for nl in memchr_iter(b'\n', &buf[filled..]) {
            let line_end = filled + nl;
            line_no += 1;
            if line_end - line_start > max_line {
                return Err(LineTooLong { line: line_no }.into());
            }
            emit(line_no, &buf[line_start..line_end])?;
            line_start = line_end + 1;
        }
        buf.drain(..line_start);

        if buf.len() > max_line {
            buf.clear();
            return Err(LineTooLong { line: line_no + 1 }.into());
        }
    }

    if !buf.is_empty() {
        line_no += 1;
        emit(line_no, &buf[..])?;
    }
    Ok(())
}

fn read_retrying<R: Read>(reader: &mut R, dst: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(dst) {
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}
