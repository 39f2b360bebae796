//! Escaping for PDF literal strings and names.
//!
//! Both encoders work on raw bytes and never check encoding validity: the
//! text is shown byte-per-glyph with a standard font.

use std::io::{self, Write};

/// Write `text` as the body of a literal string, without the delimiters.
///
/// Backslash, parentheses and tab are written in their two-character
/// escaped form. Every other byte, including control characters and bytes
/// above 0x7F, passes through unchanged.
pub fn write_string<W: Write + ?Sized>(w: &mut W, text: &[u8]) -> io::Result<()> {
    let mut start = 0;
    for (i, &byte) in text.iter().enumerate() {
        let escaped: &[u8] = match byte {
            b'(' => b"\\(",
            b')' => b"\\)",
            b'\\' => b"\\\\",
            b'\t' => b"\\t",
            _ => continue,
        };
        w.write_all(&text[start..i])?;
        w.write_all(escaped)?;
        start = i + 1;
    }
    w.write_all(&text[start..])
}

/// Write `name` as a name object body, without the leading `/`.
///
/// Only bytes strictly between `!` (33) and `~` (126) are written as-is;
/// the boundaries themselves, space, DEL, controls and high bytes become
/// `#xx`. PDF 32000 is ambiguous about whether the regular range is
/// inclusive, so the strict reading is used.
pub fn write_name<W: Write + ?Sized>(w: &mut W, name: &[u8]) -> io::Result<()> {
    for &byte in name {
        if 33 < byte && byte < 126 {
            w.write_all(&[byte])?;
        } else {
            write!(w, "#{:02x}", byte)?;
        }
    }
    Ok(())
}

/// Escape `text` for a literal string into a new buffer.
pub fn escape_string(text: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    // Writing into a Vec cannot fail.
    let _ = write_string(&mut out, text);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escape_name(name: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        write_name(&mut out, name).unwrap();
        out
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(escape_string(b"a(b)c\\d\t"), b"a\\(b\\)c\\\\d\\t".to_vec());
    }

    #[test]
    fn test_string_passthrough() {
        assert_eq!(escape_string(b"plain text"), b"plain text".to_vec());
        assert_eq!(escape_string(b""), Vec::<u8>::new());
        // Controls and high bytes are not touched
        assert_eq!(escape_string(b"\x01\r\xff\xe9"), b"\x01\r\xff\xe9".to_vec());
    }

    #[test]
    fn test_string_adjacent_escapes() {
        assert_eq!(escape_string(b"(())"), b"\\(\\(\\)\\)".to_vec());
        assert_eq!(escape_string(b"\\"), b"\\\\".to_vec());
    }

    #[test]
    fn test_name_regular_bytes() {
        assert_eq!(escape_name(b"Courier"), b"Courier".to_vec());
        assert_eq!(escape_name(b"Times-Roman"), b"Times-Roman".to_vec());
        assert_eq!(escape_name(b"F0"), b"F0".to_vec());
    }

    #[test]
    fn test_name_strict_boundaries() {
        assert_eq!(escape_name(b"!"), b"#21".to_vec());
        assert_eq!(escape_name(b"~"), b"#7e".to_vec());
        assert_eq!(escape_name(b"\""), b"\"".to_vec());
        assert_eq!(escape_name(b"}"), b"}".to_vec());
    }

    #[test]
    fn test_name_space_and_high_bytes() {
        assert_eq!(escape_name(b"A B"), b"A#20B".to_vec());
        assert_eq!(escape_name(b"\x7f\x80\xff"), b"#7f#80#ff".to_vec());
        assert_eq!(escape_name(b"\x00"), b"#00".to_vec());
    }
}
