//! Document assembly: header, catalog, pages, page tree root, xref.

use std::io::{BufRead, Write};

use log::{info, warn};
use serde::Serialize;

use super::{
    page_object_id, CountingWriter, OffsetTable, PageAssembler, XrefBuilder, CATALOG_ID,
    FONT_RESOURCE, PAGE_HEIGHT, PAGE_TREE_ID, PAGE_WIDTH,
};
use crate::error::{Error, Result};
use crate::escape;
use crate::options::LayoutOptions;
use crate::reader::LineReader;

/// Totals reported after a document has been written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ConversionStats {
    /// Number of pages emitted
    pub pages: usize,
    /// Number of text rows placed across all pages
    pub lines: usize,
    /// Raw input bytes consumed
    pub bytes_read: u64,
    /// Total size of the PDF
    pub bytes_written: u64,
    /// Offset of the cross-reference table
    pub xref_offset: u64,
}

/// Drives a single conversion from an input stream to a PDF stream.
///
/// The builder owns every piece of mutable assembly state: the line reader
/// and its input count, the counting output and the offset table. It is
/// consumed by [`build`](Self::build), so nothing can be appended once the
/// trailer is out.
pub struct DocumentBuilder<R, W> {
    lines: LineReader<R>,
    out: CountingWriter<W>,
    offsets: OffsetTable,
    options: LayoutOptions,
}

impl<R: BufRead, W: Write> DocumentBuilder<R, W> {
    /// Create a builder. Fails if the options are out of range.
    pub fn new(input: R, output: W, options: LayoutOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            lines: LineReader::new(input, options.columns, options.tab_stop),
            out: CountingWriter::new(output),
            offsets: OffsetTable::new(options.max_pages),
            options,
        })
    }

    /// Write the whole document.
    ///
    /// On [`Error::TooManyPages`] the output holds the pages written so far
    /// but no page tree, xref table or trailer.
    pub fn build(mut self) -> Result<ConversionStats> {
        self.out.write_all(b"%PDF-1.4\n")?;

        self.offsets.set_catalog(self.out.position());
        writeln!(self.out, "{} 0 obj", CATALOG_ID)?;
        writeln!(
            self.out,
            "<< /Type /Catalog /Pages {} 0 R >>",
            PAGE_TREE_ID
        )?;
        self.out.write_all(b"endobj\n")?;

        let lines = self.write_pages()?;
        self.write_page_tree()?;

        let xref_offset = XrefBuilder::new(&self.offsets).write_to(&mut self.out)?;
        self.out.flush()?;

        let stats = ConversionStats {
            pages: self.offsets.page_count(),
            lines,
            bytes_read: self.lines.bytes_read(),
            bytes_written: self.out.position(),
            xref_offset,
        };
        info!(
            "wrote {} pages ({} lines, {} bytes in, {} bytes out)",
            stats.pages, stats.lines, stats.bytes_read, stats.bytes_written
        );
        Ok(stats)
    }

    /// Emit pages until the input is exhausted. Returns the total row count.
    fn write_pages(&mut self) -> Result<usize> {
        let assembler = PageAssembler::new(&self.options);
        let mut total_rows = 0;

        loop {
            let index = self.offsets.page_count();
            let page = assembler.write_page(index, &mut self.lines, &mut self.out)?;
            self.offsets.push_page(page.offsets)?;
            total_rows += page.rows;

            if self.lines.is_eof()? {
                return Ok(total_rows);
            }
            if self.offsets.is_full() {
                warn!(
                    "input continues after {} pages, aborting",
                    self.offsets.page_count()
                );
                return Err(Error::TooManyPages {
                    limit: self.options.max_pages,
                });
            }
        }
    }

    fn write_page_tree(&mut self) -> Result<()> {
        let out = &mut self.out;
        self.offsets.set_page_tree(out.position());

        writeln!(out, "{} 0 obj", PAGE_TREE_ID)?;
        out.write_all(b"<< /Type /Pages\n")?;
        out.write_all(b"/Kids [\n")?;
        for index in 0..self.offsets.page_count() {
            writeln!(out, "{} 0 R", page_object_id(index))?;
        }
        out.write_all(b"]\n")?;
        writeln!(out, "/Count {}", self.offsets.page_count())?;
        writeln!(out, "/MediaBox [0 0 {} {}]", PAGE_WIDTH, PAGE_HEIGHT)?;

        out.write_all(b"/Resources << /Font << /")?;
        escape::write_name(out, FONT_RESOURCE.as_bytes())?;
        out.write_all(b" <<\n")?;
        out.write_all(b"/Type /Font\n")?;
        out.write_all(b"/Subtype /Type1\n")?;
        out.write_all(b"/BaseFont /")?;
        escape::write_name(out, self.options.font.base_font().as_bytes())?;
        out.write_all(b"\n")?;
        out.write_all(b">> >> >>\n")?;
        out.write_all(b">>\n")?;
        out.write_all(b"endobj\n")?;
        Ok(())
    }
}
