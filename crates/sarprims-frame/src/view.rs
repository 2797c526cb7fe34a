//! Bounds-checked read cursor over a borrowed byte buffer.

/// A read-only cursor over a byte slice.
///
/// Reads never panic. A read that would run past the end of the buffer moves
/// the cursor to the end and returns `None`, which callers treat as
/// "insufficient data".
#[derive(Debug, Clone, Copy)]
pub struct ByteView<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteView<'a> {
    /// Create a view starting at `offset`. Offsets past the end are clamped.
    pub fn new(buf: &'a [u8], offset: usize) -> Self {
        Self {
            buf,
            pos: offset.min(buf.len()),
        }
    }

    /// Read the next `N` bytes as an unsigned little-endian integer.
    pub fn extract<const N: usize>(&mut self) -> Option<u64> {
        const { assert!(N <= 8, "extract reads at most 8 bytes") };

        let bytes = self.take(N)?;
        Some(
            bytes
                .iter()
                .rev()
                .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte)),
        )
    }

    pub fn u8(&mut self) -> Option<u8> {
        self.extract::<1>().map(|v| v as u8)
    }

    pub fn u16_le(&mut self) -> Option<u16> {
        self.extract::<2>().map(|v| v as u16)
    }

    /// Borrow the next `len` bytes and advance past them.
    pub fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        match self.pos.checked_add(len) {
            Some(end) if end <= self.buf.len() => {
                let out = &self.buf[self.pos..end];
                self.pos = end;
                Some(out)
            }
            _ => {
                self.pos = self.buf.len();
                None
            }
        }
    }

    /// Random access relative to the start of the buffer. Does not move the cursor.
    pub fn get(&self, index: usize) -> Option<u8> {
        self.buf.get(index).copied()
    }

    /// Move the cursor to an absolute position, saturating at the end.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.buf.len());
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos == self.buf.len()
    }

    /// The unread tail of the buffer.
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }
}
