//! Byte sources - the pull side of the streaming parser.
//!
//! The engine never owns the whole document. It pulls chunks on demand
//! through [`ByteSource`] into its fixed scan window, so arbitrarily large
//! documents parse in constant memory. Returning 0 from `pull` signals end
//! of input, permanently; short reads are fine and mean nothing.

use std::io;

/// A pull source of document bytes.
///
/// Implemented for byte slices out of the box; wrap an `io::Read` with
/// [`ReadSource`] and a chunk-producing callback with [`from_fn`].
pub trait ByteSource {
    /// Write up to `buf.len()` bytes at the front of `buf` and return the
    /// count. Return 0 only at end of input: the engine treats the first 0
    /// as final and never calls `pull` again.
    fn pull(&mut self, buf: &mut [u8]) -> usize;
}

/// Sources pass through mutable references, so a caller can lend a source
/// to a parse and keep it (e.g. for [`ReadSource::take_error`]).
impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn pull(&mut self, buf: &mut [u8]) -> usize {
        (**self).pull(buf)
    }
}

/// Byte slices drain front-first, the same reborrow idiom
/// `io::Read for &[u8]` uses.
impl ByteSource for &[u8] {
    fn pull(&mut self, buf: &mut [u8]) -> usize {
        let n = self.len().min(buf.len());
        buf[..n].copy_from_slice(&self[..n]);
        *self = &self[n..];
        n
    }
}

/// Wrap a pull callback as a [`ByteSource`].
///
/// ```
/// use sdlang_core::source::{from_fn, ByteSource};
///
/// let mut chunks = vec![&b"foo "[..], &b"42\n"[..]];
/// let mut source = from_fn(move |buf| {
///     let Some(chunk) = chunks.first_mut() else { return 0 };
///     let n = chunk.pull(buf);
///     if chunk.is_empty() {
///         chunks.remove(0);
///     }
///     n
/// });
///
/// let mut out = [0u8; 16];
/// assert_eq!(source.pull(&mut out), 4);
/// ```
pub fn from_fn<F: FnMut(&mut [u8]) -> usize>(pull: F) -> FromFn<F> {
    FromFn(pull)
}

/// A [`ByteSource`] backed by a closure; see [`from_fn`].
pub struct FromFn<F>(F);

impl<F: FnMut(&mut [u8]) -> usize> ByteSource for FromFn<F> {
    fn pull(&mut self, buf: &mut [u8]) -> usize {
        (self.0)(buf)
    }
}

/// Adapts any `io::Read` into a [`ByteSource`].
///
/// `pull` is infallible by contract, so the first I/O error is stashed and
/// reported as end of input; the parse then finishes (or fails on the
/// truncated document) and the caller checks [`ReadSource::take_error`] to
/// tell a real EOF from a failed read.
pub struct ReadSource<R> {
    inner: R,
    error: Option<io::Error>,
}

impl<R: io::Read> ReadSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, error: None }
    }

    /// Take the stashed I/O error, if the underlying reader failed.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    /// Consume the adapter and get the reader back.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: io::Read> ByteSource for ReadSource<R> {
    fn pull(&mut self, buf: &mut [u8]) -> usize {
        if self.error.is_some() {
            return 0;
        }
        loop {
            match self.inner.read(buf) {
                Ok(n) => return n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.error = Some(e);
                    return 0;
                }
            }
        }
    }
}
