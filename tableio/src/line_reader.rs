//! Line reading with a growable buffer
//!
//! The buffer starts small and doubles whenever a line does not fit. Bytes
//! already read are kept across growth, so the stream is consumed exactly
//! once.

use std::io::{BufRead, ErrorKind};

use crate::error::{Result, TableIoError};

/// Reads `\n`-terminated lines from a buffered stream
pub struct LineReader<R> {
    reader: R,
    buf: Vec<u8>,
    text: String,
    line_number: u64,
}

impl<R: BufRead> LineReader<R> {
    /// Reader with the default 64-byte starting buffer
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, 64)
    }

    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(capacity.max(1)),
            text: String::new(),
            line_number: 0,
        }
    }

    /// Next line without its trailing `\n`, or `None` at end of stream
    ///
    /// A final line without a newline is still returned. Invalid UTF-8 is
    /// replaced, since table files are plain ASCII.
    pub fn next_line(&mut self) -> Result<Option<&str>> {
        Ok(self.next_numbered_line()?.map(|(_, line)| line))
    }

    /// Like [`next_line`](Self::next_line), paired with the 1-based line number
    pub fn next_numbered_line(&mut self) -> Result<Option<(u64, &str)>> {
        self.buf.clear();
        if !self.fill_line()? {
            return Ok(None);
        }
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
        }

        self.line_number += 1;
        self.text.clear();
        self.text.push_str(&String::from_utf8_lossy(&self.buf));
        Ok(Some((self.line_number, &self.text)))
    }

    /// 1-based number of the line last returned, 0 before the first
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    /// Current capacity of the byte buffer
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Append bytes up to and including the next newline to `buf`
    ///
    /// Returns false when the stream was already exhausted.
    fn fill_line(&mut self) -> Result<bool> {
        let mut read_any = false;
        loop {
            let available = match self.reader.fill_buf() {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if available.is_empty() {
                return Ok(read_any);
            }
            read_any = true;

            let (chunk, done) = match available.iter().position(|&b| b == b'\n') {
                Some(pos) => (&available[..=pos], true),
                None => (available, false),
            };
            let used = chunk.len();
            grow_for(&mut self.buf, used)?;
            self.buf.extend_from_slice(chunk);
            self.reader.consume(used);

            if done {
                return Ok(true);
            }
        }
    }
}

/// Double the buffer until `extra` more bytes fit
fn grow_for(buf: &mut Vec<u8>, extra: usize) -> Result<()> {
    let needed = buf.len().checked_add(extra).ok_or(TableIoError::Allocation)?;
    if needed <= buf.capacity() {
        return Ok(());
    }
    let mut target = buf.capacity().max(1);
    while target < needed {
        target = target.checked_mul(2).ok_or(TableIoError::Allocation)?;
    }
    buf.try_reserve_exact(target - buf.len())
        .map_err(|_| TableIoError::Allocation)?;
    tracing::trace!(capacity = buf.capacity(), "grew line buffer");
    Ok(())
}
