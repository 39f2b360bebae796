//! Error types for ptxt library.

use std::io;
use thiserror::Error;

/// Result type alias for ptxt operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building or inspecting a PDF.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading input or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input needs more pages than the configured ceiling allows.
    #[error("Too many pages (limit is {limit})")]
    TooManyPages {
        /// Page ceiling that was reached
        limit: usize,
    },

    /// A layout option is out of range.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// A size string could not be converted to points.
    #[error("Invalid size: {0}")]
    InvalidSize(String),

    /// The data does not start with a PDF header.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// The cross-reference table or trailer is malformed or inconsistent.
    #[error("Corrupted PDF structure: {0}")]
    Corrupted(String),
}
