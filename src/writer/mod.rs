//! PDF assembly: object numbering, offset tracking, pages, document and
//! cross-reference table.
//!
//! Object ids are fixed per page index. Page objects, content streams and
//! length objects each occupy their own contiguous range of `MAX_PAGES`
//! ids, so the cross-reference table can be written as four subsections
//! without renumbering.

mod counting;
mod document;
mod page;
mod xref;

pub use counting::CountingWriter;
pub use document::{ConversionStats, DocumentBuilder};
pub use page::{EmittedPage, PageAssembler, PageOffsets};
pub use xref::{OffsetTable, XrefBuilder};

/// Hard ceiling on the number of pages in one document.
pub const MAX_PAGES: usize = 32768;

/// Object id of the document catalog.
pub const CATALOG_ID: u32 = 1;
/// Object id of the page tree root.
pub const PAGE_TREE_ID: u32 = 2;
/// First page object id.
pub const PAGE_BASE: u32 = 32768;
/// First content stream object id.
pub const CONTENT_BASE: u32 = PAGE_BASE + MAX_PAGES as u32;
/// First stream length object id.
pub const LENGTH_BASE: u32 = CONTENT_BASE + MAX_PAGES as u32;

/// Page width in points (A4).
pub const PAGE_WIDTH: u32 = 595;
/// Page height in points (A4).
pub const PAGE_HEIGHT: u32 = 842;
/// Text leading in points.
pub const LEADING: u32 = 11;
/// Resource name under which the configured font is registered.
pub const FONT_RESOURCE: &str = "F0";

/// Object id of the page object for page `index`.
pub fn page_object_id(index: usize) -> u32 {
    PAGE_BASE + index as u32
}

/// Object id of the content stream for page `index`.
pub fn content_object_id(index: usize) -> u32 {
    CONTENT_BASE + index as u32
}

/// Object id of the stream length object for page `index`.
pub fn length_object_id(index: usize) -> u32 {
    LENGTH_BASE + index as u32
}

/// Trailer `/Size` for a document with `page_count` pages.
pub fn object_count(page_count: usize) -> u32 {
    LENGTH_BASE + page_count as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_ranges_do_not_overlap() {
        let last = MAX_PAGES - 1;
        assert!(page_object_id(0) > PAGE_TREE_ID);
        assert!(page_object_id(last) < content_object_id(0));
        assert!(content_object_id(last) < length_object_id(0));
    }

    #[test]
    fn test_ids_for_first_page() {
        assert_eq!(page_object_id(0), 32768);
        assert_eq!(content_object_id(0), 65536);
        assert_eq!(length_object_id(0), 98304);
    }

    #[test]
    fn test_object_count_follows_last_length_id() {
        assert_eq!(object_count(1), length_object_id(0) + 1);
        assert_eq!(object_count(7), length_object_id(6) + 1);
    }
}
