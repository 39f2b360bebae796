//! Offset bookkeeping and the cross-reference table.

use std::io::Write;

use log::trace;

use super::{
    object_count, CountingWriter, PageOffsets, CATALOG_ID, CONTENT_BASE, LENGTH_BASE, PAGE_BASE,
};
use crate::error::{Error, Result};

/// Byte offsets of every object in the document, in emission order.
///
/// Holds at most `capacity` pages; further pages are rejected.
#[derive(Debug, Clone)]
pub struct OffsetTable {
    catalog: u64,
    page_tree: u64,
    pages: Vec<PageOffsets>,
    capacity: usize,
}

impl OffsetTable {
    /// Create an empty table accepting up to `capacity` pages.
    pub fn new(capacity: usize) -> Self {
        Self {
            catalog: 0,
            page_tree: 0,
            pages: Vec::new(),
            capacity,
        }
    }

    /// Record where the catalog begins.
    pub fn set_catalog(&mut self, offset: u64) {
        self.catalog = offset;
    }

    /// Record where the page tree root begins.
    pub fn set_page_tree(&mut self, offset: u64) {
        self.page_tree = offset;
    }

    /// Append the offsets of the next page.
    pub fn push_page(&mut self, offsets: PageOffsets) -> Result<()> {
        if self.pages.len() >= self.capacity {
            return Err(Error::TooManyPages {
                limit: self.capacity,
            });
        }
        self.pages.push(offsets);
        Ok(())
    }

    /// Number of pages recorded.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Whether no further page can be recorded.
    pub fn is_full(&self) -> bool {
        self.pages.len() >= self.capacity
    }

    /// Offset of the catalog.
    pub fn catalog(&self) -> u64 {
        self.catalog
    }

    /// Offset of the page tree root.
    pub fn page_tree(&self) -> u64 {
        self.page_tree
    }

    /// Page offsets in page order.
    pub fn pages(&self) -> &[PageOffsets] {
        &self.pages
    }
}

/// Writes the xref table and trailer from a finished [`OffsetTable`].
pub struct XrefBuilder<'a> {
    table: &'a OffsetTable,
}

impl<'a> XrefBuilder<'a> {
    /// Create a builder over the recorded offsets.
    pub fn new(table: &'a OffsetTable) -> Self {
        Self { table }
    }

    /// Write the table and trailer. Returns the offset of the `xref` keyword.
    pub fn write_to<W: Write>(&self, out: &mut CountingWriter<W>) -> Result<u64> {
        let xref_offset = out.position();
        let count = self.table.page_count();

        out.write_all(b"xref\n")?;
        out.write_all(b"0 3\n")?;
        out.write_all(b"0000000000 65535 f \n")?;
        write_entry(out, self.table.catalog())?;
        write_entry(out, self.table.page_tree())?;

        let pages = self.table.pages();
        self.write_subsection(out, PAGE_BASE, pages.iter().map(|p| p.page))?;
        self.write_subsection(out, CONTENT_BASE, pages.iter().map(|p| p.content))?;
        self.write_subsection(out, LENGTH_BASE, pages.iter().map(|p| p.length))?;

        out.write_all(b"trailer\n")?;
        writeln!(
            out,
            "<< /Size {} /Root {} 0 R >>",
            object_count(count),
            CATALOG_ID
        )?;
        out.write_all(b"startxref\n")?;
        writeln!(out, "{}", xref_offset)?;
        out.write_all(b"%%EOF\n")?;

        Ok(xref_offset)
    }

    fn write_subsection<W: Write>(
        &self,
        out: &mut CountingWriter<W>,
        first_id: u32,
        offsets: impl Iterator<Item = u64>,
    ) -> Result<()> {
        let count = self.table.page_count();
        trace!("xref subsection {} {}", first_id, count);
        writeln!(out, "{} {}", first_id, count)?;
        for offset in offsets {
            write_entry(out, offset)?;
        }
        Ok(())
    }
}

fn write_entry<W: Write>(out: &mut CountingWriter<W>, offset: u64) -> Result<()> {
    writeln!(out, "{:010} 00000 n ", offset)?;
    Ok(())
}
