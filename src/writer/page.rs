//! Page assembly: one page object, its content stream and the stream's
//! length object per page.

use std::io::{BufRead, Write};

use log::debug;

use super::{
    content_object_id, length_object_id, page_object_id, CountingWriter, FONT_RESOURCE, LEADING,
    PAGE_HEIGHT, PAGE_TREE_ID,
};
use crate::error::Result;
use crate::escape;
use crate::options::LayoutOptions;
use crate::reader::LineReader;

/// Byte offsets of the three objects written for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageOffsets {
    /// Offset of the page object
    pub page: u64,
    /// Offset of the content stream object
    pub content: u64,
    /// Offset of the stream length object
    pub length: u64,
}

/// Result of writing one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmittedPage {
    /// Where each of the page's objects begins
    pub offsets: PageOffsets,
    /// Number of text rows placed on the page
    pub rows: usize,
    /// Byte length of the content stream body
    pub stream_length: u64,
}

/// Writes pages of positioned text rows.
pub struct PageAssembler<'a> {
    options: &'a LayoutOptions,
}

impl<'a> PageAssembler<'a> {
    /// Create an assembler for the given layout.
    pub fn new(options: &'a LayoutOptions) -> Self {
        Self { options }
    }

    /// Write page `index`, pulling rows from `lines` until the page is full
    /// or the input is exhausted.
    pub fn write_page<R: BufRead, W: Write>(
        &self,
        index: usize,
        lines: &mut LineReader<R>,
        out: &mut CountingWriter<W>,
    ) -> Result<EmittedPage> {
        let page_id = page_object_id(index);
        let content_id = content_object_id(index);
        let length_id = length_object_id(index);
        let mut offsets = PageOffsets::default();

        offsets.page = out.position();
        writeln!(out, "{} 0 obj", page_id)?;
        out.write_all(b"<< /Type /Page\n")?;
        writeln!(out, "/Parent {} 0 R", PAGE_TREE_ID)?;
        writeln!(out, "/Contents {} 0 R >>", content_id)?;
        out.write_all(b"endobj\n")?;

        offsets.content = out.position();
        writeln!(out, "{} 0 obj", content_id)?;
        writeln!(out, "<< /Length {} 0 R >>", length_id)?;
        out.write_all(b"stream\n")?;
        let stream_start = out.position();
        let rows = self.write_content(lines, out)?;
        let stream_length = out.position() - stream_start;
        out.write_all(b"\nendstream\n")?;
        out.write_all(b"endobj\n")?;

        offsets.length = out.position();
        writeln!(out, "{} 0 obj", length_id)?;
        writeln!(out, "{}", stream_length)?;
        out.write_all(b"endobj\n")?;

        debug!(
            "page {}: {} rows, stream {} bytes, objects at {}/{}/{}",
            index, rows, stream_length, offsets.page, offsets.content, offsets.length
        );

        Ok(EmittedPage {
            offsets,
            rows,
            stream_length,
        })
    }

    /// Write the text operators of one page. Returns the number of rows.
    fn write_content<R: BufRead, W: Write>(
        &self,
        lines: &mut LineReader<R>,
        out: &mut CountingWriter<W>,
    ) -> Result<usize> {
        let top = i64::from(PAGE_HEIGHT) - i64::from(self.options.offset_y);

        out.write_all(b"BT\n")?;
        writeln!(out, "{} TL", LEADING)?;
        writeln!(out, "{} {} Td", self.options.offset_x, top)?;
        out.write_all(b"/")?;
        escape::write_name(out, FONT_RESOURCE.as_bytes())?;
        writeln!(out, " {} Tf", self.options.font_size)?;

        let mut rows = 0;
        while lines.read_line()? > 0 {
            out.write_all(b"T* (")?;
            escape::write_string(out, lines.line())?;
            out.write_all(b") Tj\n")?;
            rows += 1;
            if rows == self.options.rows {
                break;
            }
        }
        out.write_all(b"ET")?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_one(input: &[u8], options: &LayoutOptions) -> (EmittedPage, String) {
        let mut lines = LineReader::new(input, options.columns, options.tab_stop);
        let mut out = CountingWriter::new(Vec::new());
        let page = PageAssembler::new(options)
            .write_page(0, &mut lines, &mut out)
            .unwrap();
        (page, String::from_utf8(out.into_inner()).unwrap())
    }

    #[test]
    fn test_page_layout() {
        let (page, text) = write_one(b"hello\n", &LayoutOptions::default());

        let expected = "32768 0 obj\n\
            << /Type /Page\n\
            /Parent 2 0 R\n\
            /Contents 65536 0 R >>\n\
            endobj\n\
            65536 0 obj\n\
            << /Length 98304 0 R >>\n\
            stream\n\
            BT\n11 TL\n72 770 Td\n/F0 10 Tf\nT* (hello) Tj\nET\n\
            endstream\n\
            endobj\n\
            98304 0 obj\n\
            45\n\
            endobj\n";
        assert_eq!(text, expected);
        assert_eq!(page.rows, 1);
        assert_eq!(page.stream_length, 45);
    }

    #[test]
    fn test_offsets_point_at_objects() {
        let (page, text) = write_one(b"a\nb\n", &LayoutOptions::default());
        let bytes = text.as_bytes();
        assert_eq!(page.offsets.page, 0);
        assert!(bytes[page.offsets.content as usize..].starts_with(b"65536 0 obj"));
        assert!(bytes[page.offsets.length as usize..].starts_with(b"98304 0 obj"));
    }

    #[test]
    fn test_stream_length_matches_body() {
        let (page, text) = write_one(b"some (text)\n\tmore\n", &LayoutOptions::default());
        let start = text.find("stream\n").unwrap() + "stream\n".len();
        let end = text.find("\nendstream").unwrap();
        assert_eq!((end - start) as u64, page.stream_length);
    }

    #[test]
    fn test_row_limit_stops_page() {
        let options = LayoutOptions::new().with_rows(2);
        let mut lines = LineReader::new(&b"1\n2\n3\n"[..], 80, 8);
        let mut out = CountingWriter::new(Vec::new());
        let page = PageAssembler::new(&options)
            .write_page(0, &mut lines, &mut out)
            .unwrap();
        assert_eq!(page.rows, 2);
        assert!(!lines.is_eof().unwrap());
    }

    #[test]
    fn test_escaped_text_in_stream() {
        let (_, text) = write_one(b"a(b)c\\d\t\n", &LayoutOptions::default());
        assert!(text.contains("T* (a\\(b\\)c\\\\d ) Tj\n"));
    }

    #[test]
    fn test_empty_input_yields_empty_text_block() {
        let (page, text) = write_one(b"", &LayoutOptions::default());
        assert_eq!(page.rows, 0);
        assert!(text.contains("/F0 10 Tf\nET\nendstream"));
    }

    #[test]
    fn test_page_index_selects_ids() {
        let options = LayoutOptions::default();
        let mut lines = LineReader::new(&b"x"[..], 80, 8);
        let mut out = CountingWriter::new(Vec::new());
        PageAssembler::new(&options)
            .write_page(5, &mut lines, &mut out)
            .unwrap();
        let text = String::from_utf8(out.into_inner()).unwrap();
        assert!(text.starts_with("32773 0 obj\n"));
        assert!(text.contains("/Contents 65541 0 R"));
        assert!(text.contains("<< /Length 98309 0 R >>"));
    }
}
