//! # ptxt
//!
//! Streaming plain text to PDF conversion.
//!
//! Text is cut into fixed-width rows, grouped into pages and written as a
//! minimal PDF 1.4 document using one of the standard 14 fonts. Output is
//! produced in a single pass: every object's byte offset is taken from a
//! counting writer at the moment the object starts, and the
//! cross-reference table is written from those offsets at the end.
//!
//! ## Quick Start
//!
//! ```no_run
//! use ptxt::{convert_file, LayoutOptions, Font};
//!
//! fn main() -> ptxt::Result<()> {
//!     let options = LayoutOptions::new()
//!         .with_font(Font::Serif)
//!         .with_font_size(11);
//!     let stats = convert_file("notes.txt", "notes.pdf", &options)?;
//!     println!("{} pages", stats.pages);
//!     Ok(())
//! }
//! ```
//!
//! ## Layout
//!
//! - Rows hold at most `columns` characters. A line that exactly fills a row
//!   leaves its newline for the next row, which then shows up empty; longer
//!   lines wrap. This matches classic line-printer behaviour.
//! - Tabs expand to the next multiple of `tab_stop`.
//! - Pages hold `rows` rows on an A4 media box.
//! - Text bytes are written as-is; there is no font embedding or Unicode
//!   shaping.

pub mod error;
pub mod escape;
pub mod inspect;
pub mod options;
pub mod reader;
pub mod units;
pub mod writer;

// Re-export commonly used types
pub use error::{Error, Result};
pub use inspect::{inspect_bytes, inspect_file, verify, PdfSummary, XrefEntry};
pub use options::{Font, LayoutOptions};
pub use units::parse_size;
pub use writer::{ConversionStats, DocumentBuilder, MAX_PAGES};

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Buffer size used for file input and output.
pub const BUFFER_SIZE: usize = 8192;

/// Convert text from `reader` into a PDF written to `writer`.
///
/// # Arguments
///
/// * `reader` - Source of raw text bytes
/// * `writer` - Destination for the PDF
/// * `options` - Layout options
///
/// # Example
///
/// ```
/// use ptxt::{convert, LayoutOptions};
///
/// let mut pdf = Vec::new();
/// let stats = convert(&b"Hello, world!\n"[..], &mut pdf, &LayoutOptions::default()).unwrap();
/// assert_eq!(stats.pages, 1);
/// assert!(pdf.starts_with(b"%PDF-1.4"));
/// ```
pub fn convert<R: Read, W: Write>(
    reader: R,
    writer: W,
    options: &LayoutOptions,
) -> Result<ConversionStats> {
    let input = BufReader::with_capacity(BUFFER_SIZE, reader);
    DocumentBuilder::new(input, writer, options.clone())?.build()
}

/// Convert text held in memory to PDF bytes.
///
/// # Example
///
/// ```
/// use ptxt::{convert_bytes, LayoutOptions};
///
/// let pdf = convert_bytes(b"line one\nline two\n", &LayoutOptions::default()).unwrap();
/// assert!(pdf.ends_with(b"%%EOF\n"));
/// ```
pub fn convert_bytes(text: &[u8], options: &LayoutOptions) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    DocumentBuilder::new(text, &mut output, options.clone())?.build()?;
    Ok(output)
}

/// Convert a text file to a PDF file.
///
/// The output file is removed again if conversion fails, since a partial
/// document has no valid cross-reference table.
///
/// # Example
///
/// ```no_run
/// use ptxt::{convert_file, LayoutOptions};
///
/// convert_file("README.txt", "README.pdf", &LayoutOptions::default()).unwrap();
/// ```
pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: &LayoutOptions,
) -> Result<ConversionStats> {
    let output = output.as_ref();
    let reader = File::open(input)?;
    let writer = BufWriter::with_capacity(BUFFER_SIZE, File::create(output)?);

    match convert(reader, writer, options) {
        Ok(stats) => Ok(stats),
        Err(e) => {
            discard_output(output);
            Err(e)
        }
    }
}

/// Remove a partially written output file, logging if that fails.
pub fn discard_output(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        log::warn!("could not remove partial output {}: {}", path.display(), e);
    }
}
