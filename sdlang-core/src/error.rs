//! Parse error taxonomy.
//!
//! Parsing has exactly three terminal failure modes. Each aborts the parse
//! and is reported once, with the line number at which it occurred. There
//! is no recovery: the engine never resumes after an error.

/// The kind of a parse failure.
///
/// The discriminants are the stable error codes returned to embedders
/// (success is 0 by absence of an error).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorKind {
    /// Malformed input: bad literal, unmatched `}`, unterminated block or
    /// string, a value where none may appear.
    Grammar = 1,
    /// Block nesting exceeded the configured stack capacity.
    StackOverflow = 2,
    /// A single token is longer than the scan buffer capacity.
    BufferExhausted = 3,
}

impl ErrorKind {
    /// Stable positive code for this error kind.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Get a human-readable message for this error kind.
    pub fn message(self) -> &'static str {
        match self {
            Self::Grammar => "parse error",
            Self::StackOverflow => "block nesting too deep",
            Self::BufferExhausted => "token exceeds buffer capacity",
        }
    }
}

/// Error returned when parsing fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ErrorKind,
    /// 1-based line at which the parse aborted.
    pub line: u32,
}

impl ParseError {
    #[inline]
    pub(crate) fn new(kind: ErrorKind, line: u32) -> Self {
        Self { kind, line }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at line {}", self.kind.message(), self.line)
    }
}

impl std::error::Error for ParseError {}
