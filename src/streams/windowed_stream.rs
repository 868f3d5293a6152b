use super::SeekableStream;
use std::io::{self, Read, Seek, SeekFrom};

/// A clamped view over `[start, end)` of another seekable stream.
///
/// `start` is wherever the underlying stream was positioned when the window was
/// created, and all positions reported by the window are relative to it, so a
/// window can itself be handed to code that expects a whole stream. Seeks that
/// would leave the window are clamped to its nearest bound instead of failing.
///
/// The window borrows the underlying stream exclusively for its lifetime; nested
/// windows are created over windows, never beside them.
pub struct WindowedStream<'a> {
    inner: &'a mut dyn SeekableStream,
    start: u64,
    end: u64,
    position: u64,
}

impl<'a> WindowedStream<'a> {
    /// Open a window of `length` bytes at the current position of `inner`.
    pub fn new(inner: &'a mut dyn SeekableStream, length: u64) -> io::Result<Self> {
        let start = inner.stream_position()?;
        Ok(Self {
            inner,
            start,
            end: start.saturating_add(length),
            position: start,
        })
    }

    /// Declared length of the window.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Position relative to the window start.
    pub fn position(&self) -> u64 {
        self.position - self.start
    }

    /// Bytes left before the window end.
    pub fn remaining(&self) -> u64 {
        self.end - self.position
    }

    /// Move to the end of the window, discarding whatever was not consumed.
    /// Returns the number of bytes the position fell short of the declared end,
    /// which is non-zero only when the underlying stream is shorter than the window.
    pub fn skip_to_end(&mut self) -> io::Result<u64> {
        self.seek(SeekFrom::End(0))?;
        Ok(self.remaining())
    }
}

impl Read for WindowedStream<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.remaining();
        if remaining == 0 || buf.is_empty() {
            return Ok(0);
        }
        let limit = remaining.min(buf.len() as u64) as usize;
        let n = self.inner.read(&mut buf[..limit])?;
        self.position += n as u64;
        Ok(n)
    }
}

impl Seek for WindowedStream<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => self.start as i128 + offset as i128,
            SeekFrom::Current(delta) => self.position as i128 + delta as i128,
            SeekFrom::End(delta) => self.end as i128 + delta as i128,
        };
        let target = target.clamp(self.start as i128, self.end as i128) as u64;

        if target != self.position {
            let reached = self.inner.seek(SeekFrom::Start(target))?;
            self.position = reached.clamp(self.start, self.end);
        }
        Ok(self.position - self.start)
    }
}
