//! Fixed-capacity scan window over a pulled byte stream.
//!
//! The whole parser runs inside one window allocated up front. When the
//! scanner reaches the filled boundary mid-token, the window shifts the
//! in-progress token (everything from the mark, not just the scan
//! position) to the front and refills the freed tail from the source. A
//! token is therefore always contiguous in memory when it is emitted, and
//! no byte is ever re-pulled.
//!
//! The backing allocation is one byte larger than the configured capacity:
//! a token of exactly `capacity` bytes still needs room for its terminator
//! (or for the pull that reports end of input) before it can complete.
//! Only a token longer than `capacity` can fill the whole allocation, so
//! "window full after shift" is exactly the oversized-token condition.

use tracing::trace;

use crate::source::ByteSource;

/// Outcome of a refill attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Refill {
    /// New bytes were pulled; scanning can continue.
    Bytes,
    /// The source is done; no new bytes will ever arrive.
    Eof,
    /// The in-progress token fills the whole window; nothing can be freed.
    Full,
}

pub(crate) struct ScanBuffer {
    data: Box<[u8]>,
    /// Start of the in-progress token; shift origin. Equals `pos` when no
    /// token is in progress.
    mark: usize,
    /// Scan position.
    pos: usize,
    /// Valid-bytes boundary.
    filled: usize,
    eof: bool,
}

impl ScanBuffer {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity + 1].into_boxed_slice(),
            mark: 0,
            pos: 0,
            filled: 0,
            eof: false,
        }
    }

    /// The byte under the scan position, if one is buffered.
    #[inline]
    pub(crate) fn peek(&self) -> Option<u8> {
        if self.pos < self.filled {
            Some(self.data[self.pos])
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn advance(&mut self) {
        self.pos += 1;
    }

    #[inline]
    pub(crate) fn advance_by(&mut self, n: usize) {
        self.pos += n;
    }

    /// Unscanned buffered bytes, for bulk scans.
    #[inline]
    pub(crate) fn rest(&self) -> &[u8] {
        &self.data[self.pos..self.filled]
    }

    /// Anchor the mark at the scan position: a token starts here.
    #[inline]
    pub(crate) fn set_mark(&mut self) {
        self.mark = self.pos;
    }

    /// The in-progress token's bytes, mark to scan position.
    #[inline]
    pub(crate) fn lexeme(&self) -> &[u8] {
        &self.data[self.mark..self.pos]
    }

    /// Shift the in-progress token to the front and pull into the freed
    /// tail. Call only when the scan position has reached the filled
    /// boundary.
    pub(crate) fn refill<S: ByteSource>(&mut self, source: &mut S) -> Refill {
        if self.eof {
            return Refill::Eof;
        }

        if self.mark > 0 {
            self.data.copy_within(self.mark..self.filled, 0);
            self.filled -= self.mark;
            self.pos -= self.mark;
            self.mark = 0;
        }

        if self.filled == self.data.len() {
            return Refill::Full;
        }

        let pulled = source.pull(&mut self.data[self.filled..]);
        trace!("Refill: kept {} bytes, pulled {}", self.filled, pulled);
        if pulled == 0 {
            self.eof = true;
            return Refill::Eof;
        }
        self.filled += pulled;
        Refill::Bytes
    }
}
