//! The streaming parser engine.
//!
//! A single forward pass drives three pieces in lockstep: the scan window
//! ([`ScanBuffer`]) pulls chunks from the source, the scan routines match
//! one token at a time, and completed tokens are pushed into the sink.
//! Grammar states (statement position, node body, after a closed block)
//! live in the driver loop; in-token micro-state lives in the locals of
//! each scan routine, so a refill in the middle of a token resumes exactly
//! where scanning stopped and every token is emitted exactly once.
//!
//! The engine is run-to-completion: one call to [`Parser::parse`] consumes
//! the whole source and reports at most one error.

use tracing::trace;

use crate::buffer::{Refill, ScanBuffer};
use crate::error::{ErrorKind, ParseError};
use crate::sink::TokenSink;
use crate::source::ByteSource;
use crate::token::{self, Token, TokenKind};

/// Default scan window capacity in bytes; also the longest token that can
/// be matched.
pub const DEFAULT_BUFFER_CAPACITY: usize = 4096;

/// Default limit on simultaneously open blocks.
pub const DEFAULT_STACK_CAPACITY: usize = 32;

/// Default capacity of the typed dispatcher's name buffers.
pub const DEFAULT_NAME_CAPACITY: usize = 64;

// ============================================================================
// Parser (configuration + entry point)
// ============================================================================

/// The streaming SDLang parser.
///
/// Capacities are fixed at construction; a parse never allocates beyond
/// them. The parser itself is reusable - each call to [`Parser::parse`]
/// runs an independent engine with fresh position state.
///
/// # Example
///
/// ```
/// use sdlang_core::{Parser, Token, TokenKind};
///
/// let mut names = Vec::new();
/// let mut sink = |token: &Token<'_>| {
///     if token.kind == TokenKind::Node {
///         names.push(String::from_utf8_lossy(token.text).into_owned());
///     }
/// };
///
/// let mut parser = Parser::new();
/// parser.parse(&b"server {\n    port 8080\n}\n"[..], &mut sink).unwrap();
/// assert_eq!(names, ["server", "port"]);
/// ```
pub struct Parser {
    buffer_capacity: usize,
    stack_capacity: usize,
    on_error: Option<Box<dyn FnMut(ErrorKind, u32)>>,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            stack_capacity: DEFAULT_STACK_CAPACITY,
            on_error: None,
        }
    }

    /// Set the scan window capacity: the longest matchable token. A token
    /// that is longer fails the parse with
    /// [`ErrorKind::BufferExhausted`](crate::ErrorKind).
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Set the block nesting limit. Opening one block more fails the parse
    /// with [`ErrorKind::StackOverflow`](crate::ErrorKind).
    pub fn stack_capacity(mut self, capacity: usize) -> Self {
        self.stack_capacity = capacity;
        self
    }

    /// Install an error reporter, called exactly once with the kind and
    /// line before `parse` returns an error. Default is no reporting; the
    /// library never prints on its own.
    pub fn on_error(mut self, reporter: impl FnMut(ErrorKind, u32) + 'static) -> Self {
        self.on_error = Some(Box::new(reporter));
        self
    }

    /// Parse `source` to completion, pushing every token into `sink`.
    pub fn parse<S: ByteSource, K: TokenSink>(
        &mut self,
        source: S,
        sink: &mut K,
    ) -> Result<(), ParseError> {
        let mut engine = Engine {
            source,
            buf: ScanBuffer::new(self.buffer_capacity),
            stack: NestingStack::new(self.stack_capacity),
            line: 1,
        };
        let result = engine.run(sink);
        if let Err(err) = result {
            if let Some(reporter) = self.on_error.as_mut() {
                reporter(err.kind, err.line);
            }
        }
        result
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Nesting stack
// ============================================================================

/// Bounded stack of open blocks; each entry is the line of its `{`.
struct NestingStack {
    marks: Vec<u32>,
    capacity: usize,
}

impl NestingStack {
    fn new(capacity: usize) -> Self {
        Self {
            marks: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Push an open-block mark. False means the stack is at capacity and
    /// the block must be rejected.
    fn push(&mut self, line: u32) -> bool {
        if self.marks.len() == self.capacity {
            return false;
        }
        self.marks.push(line);
        true
    }

    fn pop(&mut self) -> Option<u32> {
        self.marks.pop()
    }

    fn depth(&self) -> usize {
        self.marks.len()
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Grammar position between tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Expecting a node identifier (or trivia, or `}` inside a block).
    Statement,
    /// Inside an open node: values, attributes, `{`, or a terminator.
    NodeBody,
    /// A block just closed; its owner node is still open but may only be
    /// terminated now.
    AfterBlock,
}

/// How an identifier run in a node body resolved.
enum Word {
    /// Bare identifier (keyword or error, decided by lookup).
    Plain,
    /// Identifier plus `=`: an attribute name.
    Attribute,
}

struct Engine<S> {
    source: S,
    buf: ScanBuffer,
    stack: NestingStack,
    line: u32,
}

impl<S: ByteSource> Engine<S> {
    fn run<K: TokenSink>(&mut self, sink: &mut K) -> Result<(), ParseError> {
        let mut state = State::Statement;
        loop {
            // Between tokens the mark tracks the scan position, so a
            // refill here may discard everything already consumed.
            self.buf.set_mark();
            let Some(b) = self.peek_byte()? else {
                return self.finish(state, sink);
            };

            match state {
                State::Statement => match b {
                    b' ' | b'\t' | b'\r' => self.buf.advance(),
                    b'\n' => {
                        self.buf.advance();
                        self.line += 1;
                    }
                    b';' => self.buf.advance(),
                    b'}' => {
                        self.pop_block()?;
                        self.buf.advance();
                        self.emit(sink, TokenKind::BlockEnd);
                        state = State::AfterBlock;
                    }
                    c if is_ident_start(c) => {
                        self.scan_ident()?;
                        self.emit(sink, TokenKind::Node);
                        state = State::NodeBody;
                    }
                    _ => return Err(self.error(ErrorKind::Grammar)),
                },

                State::NodeBody => match b {
                    b' ' | b'\t' | b'\r' => self.buf.advance(),
                    b'\n' => {
                        self.emit(sink, TokenKind::NodeEnd);
                        self.buf.advance();
                        self.line += 1;
                        state = State::Statement;
                    }
                    b';' => {
                        self.emit(sink, TokenKind::NodeEnd);
                        self.buf.advance();
                        state = State::Statement;
                    }
                    b'{' => {
                        self.push_block()?;
                        self.buf.advance();
                        self.emit(sink, TokenKind::Block);
                        state = State::Statement;
                    }
                    b'}' => {
                        self.pop_block()?;
                        self.emit(sink, TokenKind::NodeEnd);
                        self.buf.advance();
                        self.emit(sink, TokenKind::BlockEnd);
                        state = State::AfterBlock;
                    }
                    b'"' => {
                        let kind = self.scan_string()?;
                        self.emit(sink, kind);
                    }
                    b'[' => {
                        let kind = self.scan_base64()?;
                        self.emit(sink, kind);
                    }
                    b'+' | b'-' | b'0'..=b'9' => {
                        let kind = self.scan_number()?;
                        self.emit(sink, kind);
                    }
                    c if is_ident_start(c) => match self.scan_word()? {
                        Word::Attribute => {
                            self.emit(sink, TokenKind::Attribute);
                            let kind = self.scan_value()?;
                            self.emit(sink, kind);
                        }
                        Word::Plain => match keyword(self.buf.lexeme()) {
                            Some(kind) => self.emit(sink, kind),
                            None => return Err(self.error(ErrorKind::Grammar)),
                        },
                    },
                    _ => return Err(self.error(ErrorKind::Grammar)),
                },

                State::AfterBlock => match b {
                    b' ' | b'\t' | b'\r' => self.buf.advance(),
                    b'\n' => {
                        self.emit(sink, TokenKind::NodeEnd);
                        self.buf.advance();
                        self.line += 1;
                        state = State::Statement;
                    }
                    b';' => {
                        self.emit(sink, TokenKind::NodeEnd);
                        self.buf.advance();
                        state = State::Statement;
                    }
                    b'}' => {
                        self.pop_block()?;
                        self.emit(sink, TokenKind::NodeEnd);
                        self.buf.advance();
                        self.emit(sink, TokenKind::BlockEnd);
                    }
                    _ => return Err(self.error(ErrorKind::Grammar)),
                },
            }
        }
    }

    /// End of input: close the open node, then require an empty stack.
    fn finish<K: TokenSink>(&mut self, state: State, sink: &mut K) -> Result<(), ParseError> {
        if matches!(state, State::NodeBody | State::AfterBlock) {
            self.emit(sink, TokenKind::NodeEnd);
        }
        if self.stack.depth() > 0 {
            return Err(self.error(ErrorKind::Grammar));
        }
        trace!("Parse complete at line {}", self.line);
        Ok(())
    }

    /// Ensure at least one buffered byte, refilling as needed. `None`
    /// means clean end of input.
    fn peek_byte(&mut self) -> Result<Option<u8>, ParseError> {
        loop {
            if let Some(b) = self.buf.peek() {
                return Ok(Some(b));
            }
            match self.buf.refill(&mut self.source) {
                Refill::Bytes => continue,
                Refill::Eof => return Ok(None),
                Refill::Full => return Err(self.error(ErrorKind::BufferExhausted)),
            }
        }
    }

    /// Trim and push the token spanning mark..pos, then retire the mark.
    fn emit<K: TokenSink>(&mut self, sink: &mut K, kind: TokenKind) {
        let text = token::trim(kind, self.buf.lexeme());
        trace!(
            "Token {:?} at line {}: {:?}",
            kind,
            self.line,
            String::from_utf8_lossy(text)
        );
        sink.token(&Token {
            kind,
            text,
            line: self.line,
        });
        self.buf.set_mark();
    }

    fn error(&self, kind: ErrorKind) -> ParseError {
        ParseError::new(kind, self.line)
    }

    fn push_block(&mut self) -> Result<(), ParseError> {
        if !self.stack.push(self.line) {
            return Err(self.error(ErrorKind::StackOverflow));
        }
        trace!("Block open at line {} (depth {})", self.line, self.stack.depth());
        Ok(())
    }

    fn pop_block(&mut self) -> Result<(), ParseError> {
        match self.stack.pop() {
            Some(_) => {
                trace!("Block close at line {} (depth {})", self.line, self.stack.depth());
                Ok(())
            }
            // Unmatched `}`
            None => Err(self.error(ErrorKind::Grammar)),
        }
    }

    // ------------------------------------------------------------------
    // Scan routines. Each enters with the mark and scan position on the
    // token's first byte and leaves the position one past the token.
    // ------------------------------------------------------------------

    /// Identifier run at statement position (a node name).
    fn scan_ident(&mut self) -> Result<(), ParseError> {
        self.buf.advance();
        loop {
            match self.peek_byte()? {
                Some(b) if is_ident_byte(b) => self.buf.advance(),
                _ => return Ok(()),
            }
        }
    }

    /// Identifier run in value position: an attribute name if a `=`
    /// follows directly, otherwise a bare word for keyword lookup.
    fn scan_word(&mut self) -> Result<Word, ParseError> {
        self.buf.advance();
        loop {
            match self.peek_byte()? {
                Some(b) if is_ident_byte(b) => self.buf.advance(),
                Some(b'=') => {
                    self.buf.advance();
                    return Ok(Word::Attribute);
                }
                _ => return Ok(Word::Plain),
            }
        }
    }

    /// The value demanded by an attribute. It must begin immediately
    /// after the `=`; whitespace or end of input here is an error.
    fn scan_value(&mut self) -> Result<TokenKind, ParseError> {
        match self.peek_byte()? {
            Some(b'"') => self.scan_string(),
            Some(b'[') => self.scan_base64(),
            Some(b'+' | b'-' | b'0'..=b'9') => self.scan_number(),
            Some(c) if is_ident_start(c) => match self.scan_word()? {
                Word::Plain => keyword(self.buf.lexeme())
                    .ok_or_else(|| self.error(ErrorKind::Grammar)),
                Word::Attribute => Err(self.error(ErrorKind::Grammar)),
            },
            _ => Err(self.error(ErrorKind::Grammar)),
        }
    }

    /// Numeric literal. The form and suffix pick the kind:
    /// `0x` hex (unsigned, width by digit count), `l`/`L` for Int64,
    /// `BD`/`bd` for Int128, a fractional part for floats with `f`/`F`
    /// forcing Float32 and optional `d`/`D` for Float64.
    fn scan_number(&mut self) -> Result<TokenKind, ParseError> {
        let signed = matches!(self.buf.peek(), Some(b'+' | b'-'));
        if signed {
            self.buf.advance();
        }

        let first = match self.peek_byte()? {
            Some(b @ b'0'..=b'9') => b,
            // A lone sign is not a number
            _ => return Err(self.error(ErrorKind::Grammar)),
        };
        self.buf.advance();

        // Hex literals are unsigned, so the prefix only counts unsigned
        if first == b'0' && !signed {
            if let Some(b'x' | b'X') = self.peek_byte()? {
                self.buf.advance();
                return self.scan_hex_digits();
            }
        }

        loop {
            match self.peek_byte()? {
                Some(b'0'..=b'9') => self.buf.advance(),
                Some(b'.') => {
                    self.buf.advance();
                    return self.scan_fraction();
                }
                Some(b'l' | b'L') => {
                    self.buf.advance();
                    return Ok(TokenKind::Int64);
                }
                Some(b'B') => {
                    self.buf.advance();
                    return self.expect_second_suffix_byte(b'D');
                }
                Some(b'b') => {
                    self.buf.advance();
                    return self.expect_second_suffix_byte(b'd');
                }
                _ => return Ok(TokenKind::Int32),
            }
        }
    }

    /// The `BD`/`bd` suffix is case-paired; a dangling first half is an
    /// error.
    fn expect_second_suffix_byte(&mut self, second: u8) -> Result<TokenKind, ParseError> {
        match self.peek_byte()? {
            Some(b) if b == second => {
                self.buf.advance();
                Ok(TokenKind::Int128)
            }
            _ => Err(self.error(ErrorKind::Grammar)),
        }
    }

    /// Hex digit run after `0x`. 1-8 digits fit Uint32, 9-16 fit Uint64,
    /// anything else is an error.
    fn scan_hex_digits(&mut self) -> Result<TokenKind, ParseError> {
        let mut count = 0usize;
        loop {
            match self.peek_byte()? {
                Some(b) if b.is_ascii_hexdigit() => {
                    self.buf.advance();
                    count += 1;
                }
                _ => break,
            }
        }
        match count {
            0 => Err(self.error(ErrorKind::Grammar)),
            1..=8 => Ok(TokenKind::Uint32),
            9..=16 => Ok(TokenKind::Uint64),
            _ => Err(self.error(ErrorKind::Grammar)),
        }
    }

    /// Fractional digits after the dot, then an optional exponent and an
    /// optional float suffix.
    fn scan_fraction(&mut self) -> Result<TokenKind, ParseError> {
        match self.peek_byte()? {
            Some(b'0'..=b'9') => self.buf.advance(),
            // At least one digit after the dot
            _ => return Err(self.error(ErrorKind::Grammar)),
        }
        loop {
            match self.peek_byte()? {
                Some(b'0'..=b'9') => self.buf.advance(),
                Some(b'e' | b'E') => {
                    self.buf.advance();
                    return self.scan_exponent();
                }
                Some(b'f' | b'F') => {
                    self.buf.advance();
                    return Ok(TokenKind::Float32);
                }
                Some(b'd' | b'D') => {
                    self.buf.advance();
                    return Ok(TokenKind::Float64);
                }
                _ => return Ok(TokenKind::Float64),
            }
        }
    }

    fn scan_exponent(&mut self) -> Result<TokenKind, ParseError> {
        if let Some(b'+' | b'-') = self.peek_byte()? {
            self.buf.advance();
        }
        match self.peek_byte()? {
            Some(b'0'..=b'9') => self.buf.advance(),
            // Exponent digits are mandatory
            _ => return Err(self.error(ErrorKind::Grammar)),
        }
        loop {
            match self.peek_byte()? {
                Some(b'0'..=b'9') => self.buf.advance(),
                Some(b'f' | b'F') => {
                    self.buf.advance();
                    return Ok(TokenKind::Float32);
                }
                Some(b'd' | b'D') => {
                    self.buf.advance();
                    return Ok(TokenKind::Float64);
                }
                _ => return Ok(TokenKind::Float64),
            }
        }
    }

    /// Quoted string on a single line. `\` passes the next byte through
    /// without interpretation; payload escapes reach the sink undecoded.
    fn scan_string(&mut self) -> Result<TokenKind, ParseError> {
        self.buf.advance(); // opening quote
        loop {
            let (found, skip) = {
                let rest = self.buf.rest();
                match memchr::memchr3(b'"', b'\\', b'\n', rest) {
                    Some(i) => (Some(rest[i]), i),
                    None => (None, rest.len()),
                }
            };
            self.buf.advance_by(skip);

            match found {
                Some(b'"') => {
                    self.buf.advance();
                    return Ok(TokenKind::String);
                }
                Some(b'\\') => {
                    self.buf.advance();
                    match self.peek_byte()? {
                        // Strings cannot span lines, escaped or not
                        Some(b'\n') | None => return Err(self.error(ErrorKind::Grammar)),
                        Some(_) => self.buf.advance(),
                    }
                }
                // Raw newline inside a string
                Some(_) => return Err(self.error(ErrorKind::Grammar)),
                None => {
                    // Boundary mid-content: refill or fail as unterminated
                    if self.peek_byte()?.is_none() {
                        return Err(self.error(ErrorKind::Grammar));
                    }
                }
            }
        }
    }

    /// Base64 blob between brackets: alphabet bytes only, single line.
    fn scan_base64(&mut self) -> Result<TokenKind, ParseError> {
        self.buf.advance(); // opening bracket
        loop {
            match self.peek_byte()? {
                Some(b']') => {
                    self.buf.advance();
                    return Ok(TokenKind::Base64);
                }
                Some(b) if is_base64_byte(b) => self.buf.advance(),
                _ => return Err(self.error(ErrorKind::Grammar)),
            }
        }
    }
}

// ============================================================================
// Byte classes
// ============================================================================

static KEYWORDS: phf::Map<&'static [u8], TokenKind> = phf::phf_map! {
    b"true" => TokenKind::True,
    b"false" => TokenKind::False,
    b"null" => TokenKind::Null,
};

fn keyword(word: &[u8]) -> Option<TokenKind> {
    KEYWORDS.get(word).copied()
}

#[inline]
fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

#[inline]
fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-')
}

#[inline]
fn is_base64_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'=')
}
