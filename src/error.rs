//! Error types for the generate and load stages.
//!
//! Errors are stage-specific: the value source only fails on file creation
//! or writes, and the loader only fails on malformed or truncated input.
//! All enums are `#[non_exhaustive]`; consumers should include a fallback
//! match arm.
//!
//! # Design Notes
//! - I/O errors carry the underlying `io::Error` as their source.
//! - Load errors never leave a partially filled grid behind: the buffer is
//!   owned by the loader until the final count check succeeds.

use std::fmt;
use std::io;

use crate::lines::LineTooLong;

/// Errors from writing the intermediate value file.
#[derive(Debug)]
#[non_exhaustive]
pub enum IoError {
    /// The destination could not be created or truncated for writing.
    CannotOpen(io::Error),
    /// Writing the header, a buffered chunk, or the final flush failed.
    WriteFailed(io::Error),
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CannotOpen(err) => write!(f, "cannot open value file for writing: {err}"),
            Self::WriteFailed(err) => write!(f, "failed to write value file: {err}"),
        }
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CannotOpen(err) | Self::WriteFailed(err) => Some(err),
        }
    }
}

/// Errors from parsing a value file into a [`ValueGrid`](crate::ValueGrid).
#[derive(Debug)]
#[non_exhaustive]
pub enum LoadError {
    /// The source file could not be opened for reading.
    CannotOpen(io::Error),
    /// A read failed after the file was opened.
    Read(io::Error),
    /// The first line is missing or is not exactly two unsigned integers.
    BadHeader,
    /// The declared grid does not fit in memory or the address space.
    OutOfMemory { elements: u64 },
    /// A data line is not exactly two floating-point numbers.
    ///
    /// `line` is 1-based and counts the header.
    BadRecord { line: u64 },
    /// The number of data lines differs from `nx * ny`.
    CountMismatch { expected: u64, found: u64 },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CannotOpen(err) => write!(f, "cannot open value file for reading: {err}"),
            Self::Read(err) => write!(f, "failed to read value file: {err}"),
            Self::BadHeader => write!(f, "failed to parse grid size header"),
            Self::OutOfMemory { elements } => {
                write!(f, "cannot allocate grid of {elements} values")
            }
            Self::BadRecord { line } => write!(f, "failed to parse value record on line {line}"),
            Self::CountMismatch { expected, found } => {
                write!(
                    f,
                    "mismatch in number of values: header declares {expected}, found {found}"
                )
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CannotOpen(err) | Self::Read(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for LoadError {
    #[inline]
    fn from(err: io::Error) -> Self {
        Self::Read(err)
    }
}

impl From<LineTooLong> for LoadError {
    /// Line 1 is the header; every later line is a record.
    fn from(err: LineTooLong) -> Self {
        match err.line {
            1 => Self::BadHeader,
            line => Self::BadRecord { line },
        }
    }
}

/// A caller-supplied value slice does not match the declared grid shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShapeError {
    pub nx: u32,
    pub ny: u32,
    pub found: usize,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "grid {}x{} needs {} values, got {}",
            self.nx,
            self.ny,
            u64::from(self.nx) * u64::from(self.ny),
            self.found
        )
    }
}

impl std::error::Error for ShapeError {}
