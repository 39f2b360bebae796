//! Byte-counting output wrapper.

use std::io::{self, Write};

/// Wraps a sink and counts every byte it accepts.
///
/// The count is the only source of object offsets: it is read before the
/// first byte of each object and around each stream body.
pub struct CountingWriter<W> {
    inner: W,
    position: u64,
}

impl<W: Write> CountingWriter<W> {
    /// Wrap `inner`, starting the count at zero.
    pub fn new(inner: W) -> Self {
        Self { inner, position: 0 }
    }

    /// Number of bytes written so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Unwrap, returning the sink.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.position += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_formatted_writes() {
        let mut w = CountingWriter::new(Vec::new());
        writeln!(w, "{} 0 obj", 12).unwrap();
        w.write_all(b"endobj\n").unwrap();
        assert_eq!(w.position(), 16);
        assert_eq!(w.into_inner().len(), 16);
    }

    #[test]
    fn test_partial_writes_counted_exactly() {
        struct Trickle(Vec<u8>);
        impl Write for Trickle {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                let n = buf.len().min(3);
                self.0.extend_from_slice(&buf[..n]);
                Ok(n)
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut w = CountingWriter::new(Trickle(Vec::new()));
        w.write_all(b"0123456789").unwrap();
        assert_eq!(w.position(), 10);
        assert_eq!(w.into_inner().0, b"0123456789");
    }

    #[test]
    fn test_write_error_propagates() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut w = CountingWriter::new(Broken);
        assert!(w.write_all(b"x").is_err());
        assert_eq!(w.position(), 0);
    }
}
