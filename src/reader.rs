//! Fixed-width line reader with tab expansion.

use std::io::{self, BufRead};

/// Reads raw bytes and cuts them into rows of at most `columns` characters.
///
/// A row ends at a newline, at end of input, or when `columns` characters
/// have been filled. In the last case the byte that would have followed is
/// left unread, so a line that exactly fills the row does not consume its
/// newline: the next call returns an empty row made of just that newline.
/// Long input lines therefore wrap across as many rows as they need. This
/// is intentional layout behavior.
///
/// Tabs advance to the next multiple of `tab_stop`, written as spaces and
/// truncated at the column boundary.
pub struct LineReader<R> {
    inner: R,
    columns: usize,
    tab_stop: usize,
    line: Vec<u8>,
    bytes_read: u64,
}

impl<R: BufRead> LineReader<R> {
    /// Create a reader producing rows of `columns` characters.
    pub fn new(inner: R, columns: usize, tab_stop: usize) -> Self {
        Self {
            inner,
            columns,
            tab_stop: tab_stop.max(1),
            line: Vec::with_capacity(columns + 1),
            bytes_read: 0,
        }
    }

    /// Read the next row into the line buffer.
    ///
    /// Returns the number of raw input bytes consumed; zero means the input
    /// is exhausted.
    pub fn read_line(&mut self) -> io::Result<usize> {
        let start = self.bytes_read;
        self.line.clear();

        while self.line.len() < self.columns {
            match self.next_byte()? {
                None | Some(b'\n') => break,
                Some(b'\t') => {
                    let stop = align_up(self.line.len() + 1, self.tab_stop);
                    self.line.resize(stop.min(self.columns), b' ');
                }
                Some(byte) => self.line.push(byte),
            }
        }

        Ok((self.bytes_read - start) as usize)
    }

    /// The row produced by the last call to [`read_line`](Self::read_line).
    pub fn line(&self) -> &[u8] {
        &self.line
    }

    /// Total raw bytes consumed so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Whether the input has no bytes left. Peeks without consuming.
    pub fn is_eof(&mut self) -> io::Result<bool> {
        Ok(self.fill_buf()?.is_empty())
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = match self.fill_buf()?.first() {
            Some(&b) => b,
            None => return Ok(None),
        };
        self.inner.consume(1);
        self.bytes_read += 1;
        Ok(Some(byte))
    }

    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        loop {
            match self.inner.fill_buf() {
                Ok(_) => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        self.inner.fill_buf()
    }
}

fn align_up(value: usize, bound: usize) -> usize {
    value.div_ceil(bound) * bound
}
