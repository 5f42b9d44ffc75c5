//! Token sinks - the push side of the streaming parser.
//!
//! The engine pushes every token into a caller-supplied [`TokenSink`].
//! Sinks are plain values with no registration step, so composition is
//! ordinary ownership: a filtering or teeing sink simply wraps another
//! sink and forwards what it wants. Closures are sinks too.

use std::io;

use crate::token::Token;

/// Receiver for the raw token stream.
pub trait TokenSink {
    /// Called once per token, in document order.
    ///
    /// `token.text` borrows the parser's scan window and is only valid for
    /// the duration of this call; copy it to keep it. Sinks cannot abort
    /// the parse - errors are the engine's to report.
    fn token(&mut self, token: &Token<'_>);
}

/// Closures are sinks.
impl<F: FnMut(&Token<'_>)> TokenSink for F {
    fn token(&mut self, token: &Token<'_>) {
        self(token)
    }
}

/// Diagnostic sink: prints one line per token, `[line] kind value`.
///
/// This is the default consumer in the demo binaries and a quick way to
/// see what the scanner makes of a document. Tokens with an empty text
/// span print `n/a`.
pub struct TokenPrinter<W> {
    out: W,
}

impl TokenPrinter<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: io::Write> TokenPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: io::Write> TokenSink for TokenPrinter<W> {
    fn token(&mut self, token: &Token<'_>) {
        // Sink callbacks cannot fail; a closed pipe just stops the output.
        let _ = if token.text.is_empty() {
            writeln!(self.out, "[{:>3}] {:<9} n/a", token.line, token.kind.name())
        } else {
            writeln!(
                self.out,
                "[{:>3}] {:<9} {}",
                token.line,
                token.kind.name(),
                String::from_utf8_lossy(token.text)
            )
        };
    }
}
