//! Reading back the structure of a generated PDF.
//!
//! The inspector follows `startxref` to a classic cross-reference table,
//! reads every subsection and the trailer, and reports what it found.
//! [`verify`] goes further and checks that each in-use entry points at the
//! start of its `N G obj` marker and that every stream's `/Length` matches
//! the bytes between `stream` and `endstream`.

use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

use log::debug;
use regex::bytes::Regex;
use serde::Serialize;

use crate::error::{Error, Result};

const HEADER_PREFIX: &[u8] = b"%PDF-";

/// One row of the cross-reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct XrefEntry {
    /// Object id
    pub id: u32,
    /// Byte offset (or next free object for free entries)
    pub offset: u64,
    /// Generation number
    pub generation: u16,
    /// `n` entries are in use, `f` entries are free
    pub in_use: bool,
}

/// What the inspector found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PdfSummary {
    /// Version from the header (e.g. "1.4")
    pub version: String,
    /// Offset of the cross-reference table, from `startxref`
    pub xref_offset: u64,
    /// Trailer `/Size`
    pub object_count: u32,
    /// Object id of the catalog, from trailer `/Root`
    pub root: u32,
    /// `/Count` of the page tree root
    pub page_count: usize,
    /// All table entries, in table order
    pub entries: Vec<XrefEntry>,
}

impl PdfSummary {
    /// Look up the table entry for an in-use object.
    pub fn entry(&self, id: u32) -> Option<&XrefEntry> {
        self.entries.iter().find(|e| e.id == id && e.in_use)
    }

    /// Number of in-use objects.
    pub fn object_total(&self) -> usize {
        self.entries.iter().filter(|e| e.in_use).count()
    }
}

fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("valid inspector regex"))
}

fn header_pattern() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    cached(&CELL, r"^%PDF-([0-9]\.[0-9])")
}

fn startxref_pattern() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    cached(&CELL, r"startxref\s+(\d+)\s+%%EOF\s*$")
}

fn size_pattern() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    cached(&CELL, r"/Size\s+(\d+)")
}

fn root_pattern() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    cached(&CELL, r"/Root\s+(\d+)\s+\d+\s+R")
}

fn pages_pattern() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    cached(&CELL, r"/Pages\s+(\d+)\s+\d+\s+R")
}

fn count_pattern() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    cached(&CELL, r"/Count\s+(\d+)")
}

fn stream_head_pattern() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    cached(&CELL, r"(?s)^\d+\s+\d+\s+obj\s*<<(.*?)>>\s*stream(?:\r\n|\n)")
}

fn length_pattern() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    cached(&CELL, r"/Length\s+(\d+)(\s+\d+\s+R)?")
}

fn integer_object_pattern() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    cached(&CELL, r"^\d+\s+\d+\s+obj\s+(\d+)\s+endobj")
}

/// Version from a `%PDF-x.y` header.
fn header_version(data: &[u8]) -> Result<String> {
    if !data.starts_with(HEADER_PREFIX) {
        return Err(Error::UnknownFormat);
    }
    match header_pattern().captures(data) {
        Some(caps) => Ok(String::from_utf8_lossy(&caps[1]).into_owned()),
        None => {
            let tail = &data[HEADER_PREFIX.len()..];
            let shown = &tail[..tail.len().min(3)];
            Err(Error::UnsupportedVersion(
                String::from_utf8_lossy(shown).into_owned(),
            ))
        }
    }
}

/// Inspect a PDF file on disk.
pub fn inspect_file<P: AsRef<Path>>(path: P) -> Result<PdfSummary> {
    let data = fs::read(path)?;
    inspect_bytes(&data)
}

/// Read the header, cross-reference table, trailer and page count.
pub fn inspect_bytes(data: &[u8]) -> Result<PdfSummary> {
    let version = header_version(data)?;

    let caps = startxref_pattern()
        .captures(data)
        .ok_or_else(|| corrupted("missing startxref"))?;
    let xref_offset: u64 = parse_number(&caps[1])?;
    let xref_start = to_index(xref_offset, data.len())?;

    let mut rest = &data[xref_start..];
    if next_line(&mut rest) != Some(b"xref".as_slice()) {
        return Err(corrupted(format!(
            "no xref keyword at offset {}",
            xref_offset
        )));
    }

    let mut entries = Vec::new();
    loop {
        let line = next_line(&mut rest).ok_or_else(|| corrupted("xref table has no trailer"))?;
        if line.starts_with(b"trailer") {
            break;
        }

        let mut header = line.split(|b| b.is_ascii_whitespace()).filter(|p| !p.is_empty());
        let (first, count) = match (header.next(), header.next(), header.next()) {
            (Some(first), Some(count), None) => (
                parse_number::<u32>(first)?,
                parse_number::<u32>(count)?,
            ),
            _ => return Err(corrupted("malformed xref subsection header")),
        };
        debug!("xref subsection {} {}", first, count);

        for i in 0..count {
            let line = next_line(&mut rest).ok_or_else(|| corrupted("truncated xref subsection"))?;
            let id = first
                .checked_add(i)
                .ok_or_else(|| corrupted("xref subsection id overflow"))?;
            entries.push(parse_entry(id, line)?);
        }
    }

    let trailer = rest;
    let object_count = match size_pattern().captures(trailer) {
        Some(caps) => parse_number(&caps[1])?,
        None => return Err(corrupted("trailer has no /Size")),
    };
    let root = match root_pattern().captures(trailer) {
        Some(caps) => parse_number(&caps[1])?,
        None => return Err(corrupted("trailer has no /Root")),
    };

    let mut summary = PdfSummary {
        version,
        xref_offset,
        object_count,
        root,
        page_count: 0,
        entries,
    };
    summary.page_count = read_page_count(data, &summary)?;
    Ok(summary)
}

/// Inspect `data` and check every offset and stream length against it.
pub fn verify(data: &[u8]) -> Result<PdfSummary> {
    let summary = inspect_bytes(data)?;

    for entry in summary.entries.iter().filter(|e| e.in_use) {
        let start = to_index(entry.offset, data.len())?;
        let marker = format!("{} {} obj", entry.id, entry.generation);
        if !data[start..].starts_with(marker.as_bytes()) {
            return Err(corrupted(format!(
                "object {} is not at offset {}",
                entry.id, entry.offset
            )));
        }
    }

    for entry in summary.entries.iter().filter(|e| e.in_use) {
        verify_stream(data, &summary, entry)?;
    }

    Ok(summary)
}

fn verify_stream(data: &[u8], summary: &PdfSummary, entry: &XrefEntry) -> Result<()> {
    let head = object_head(data, entry.offset)?;
    let caps = match stream_head_pattern().captures(head) {
        Some(caps) => caps,
        None => return Ok(()),
    };

    let length_caps = length_pattern()
        .captures(&caps[1])
        .ok_or_else(|| corrupted(format!("stream {} has no /Length", entry.id)))?;
    let value: u64 = parse_number(&length_caps[1])?;
    let length = if length_caps.get(2).is_some() {
        let id = u32::try_from(value).map_err(|_| {
            corrupted(format!(
                "stream {} length reference {} out of range",
                entry.id, value
            ))
        })?;
        let target = summary.entry(id).ok_or_else(|| {
            corrupted(format!(
                "stream {} refers to missing length object {}",
                entry.id, value
            ))
        })?;
        read_integer_object(data, target.offset)?
    } else {
        value
    };

    let body_start = to_index(entry.offset, data.len())? + caps.get(0).map_or(0, |m| m.end());
    let body_end = body_start
        .checked_add(length as usize)
        .filter(|&end| end <= data.len())
        .ok_or_else(|| corrupted(format!("stream {} runs past end of file", entry.id)))?;

    let tail = &data[body_end..];
    let terminators: [&[u8]; 4] = [b"\r\nendstream", b"\nendstream", b"\rendstream", b"endstream"];
    let terminated = terminators.iter().any(|end| tail.starts_with(end));
    if !terminated {
        return Err(corrupted(format!(
            "stream {} length {} does not end at endstream",
            entry.id, length
        )));
    }
    Ok(())
}

fn read_page_count(data: &[u8], summary: &PdfSummary) -> Result<usize> {
    let catalog = summary
        .entry(summary.root)
        .ok_or_else(|| corrupted("catalog is not in the xref table"))?;
    let pages_id: u32 = match pages_pattern().captures(object_head(data, catalog.offset)?) {
        Some(caps) => parse_number(&caps[1])?,
        None => return Err(corrupted("catalog has no /Pages")),
    };

    let tree = summary
        .entry(pages_id)
        .ok_or_else(|| corrupted("page tree is not in the xref table"))?;
    match count_pattern().captures(object_head(data, tree.offset)?) {
        Some(caps) => parse_number(&caps[1]),
        None => Err(corrupted("page tree has no /Count")),
    }
}

fn read_integer_object(data: &[u8], offset: u64) -> Result<u64> {
    let start = to_index(offset, data.len())?;
    match integer_object_pattern().captures(&data[start..]) {
        Some(caps) => parse_number(&caps[1]),
        None => Err(corrupted(format!("no integer object at offset {}", offset))),
    }
}

/// The object starting at `offset`, up to the first `endobj`. For a stream
/// object this always covers the dictionary and the `stream` keyword.
fn object_head(data: &[u8], offset: u64) -> Result<&[u8]> {
    let start = to_index(offset, data.len())?;
    let rest = &data[start..];
    let end = rest
        .windows(b"endobj".len())
        .position(|w| w == b"endobj")
        .ok_or_else(|| corrupted(format!("unterminated object at offset {}", offset)))?;
    Ok(&rest[..end])
}

fn parse_entry(id: u32, line: &[u8]) -> Result<XrefEntry> {
    let mut parts = line.split(|b| *b == b' ').filter(|p| !p.is_empty());
    match (parts.next(), parts.next(), parts.next()) {
        (Some(offset), Some(generation), Some(kind)) if kind == b"n" || kind == b"f" => {
            Ok(XrefEntry {
                id,
                offset: parse_number(offset)?,
                generation: parse_number(generation)?,
                in_use: kind == b"n",
            })
        }
        _ => Err(corrupted(format!("malformed xref entry for object {}", id))),
    }
}

/// Split off the next line, without its end-of-line bytes or trailing spaces.
fn next_line<'a>(rest: &mut &'a [u8]) -> Option<&'a [u8]> {
    if rest.is_empty() {
        return None;
    }
    let data: &'a [u8] = *rest;
    let (line, remainder) = match data.iter().position(|&b| b == b'\n' || b == b'\r') {
        Some(pos) => {
            let skip = if data[pos] == b'\r' && data.get(pos + 1) == Some(&b'\n') {
                2
            } else {
                1
            };
            (&data[..pos], &data[pos + skip..])
        }
        None => (data, &data[data.len()..]),
    };
    *rest = remainder;

    let trimmed_len = line
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |p| p + 1);
    Some(&line[..trimmed_len])
}

fn parse_number<T: FromStr>(bytes: &[u8]) -> Result<T> {
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| corrupted(format!("bad number {:?}", String::from_utf8_lossy(bytes))))
}

fn to_index(offset: u64, len: usize) -> Result<usize> {
    usize::try_from(offset)
        .ok()
        .filter(|&i| i < len)
        .ok_or_else(|| corrupted(format!("offset {} is past end of file", offset)))
}

fn corrupted(message: impl Into<String>) -> Error {
    Error::Corrupted(message.into())
}
