//! Parser tokens - the core output of the SDLang streaming parser.
//!
//! This is a SAX-style token model: tokens are pushed into the sink as the
//! scanner matches them, with no accumulation. Structure is represented by
//! start/end token pairs.
//!
//! For a node: Node, value/attribute tokens..., NodeEnd
//! For a block: Block, child node tokens..., BlockEnd
//!
//! Token text is trimmed once at emit time (see [`trim`]); sinks never see
//! delimiters, attribute `=` signs, or leading `+` signs.

/// The kind of an emitted token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenKind {
    // ========== Structure Tokens ==========
    /// Node start: the node's identifier.
    Node,
    /// Node end (statement terminator, closing `}`, or document end).
    NodeEnd,
    /// Block open: `{` (always belongs to the innermost open node).
    Block,
    /// Block close: `}`.
    BlockEnd,
    /// Attribute name: `name=`. The next value token is the attribute's value.
    Attribute,

    // ========== Value Tokens ==========
    /// 32-bit integer: `42`, `-17`.
    Int32,
    /// 64-bit integer: `42l`, `42L` (suffix kept in the text).
    Int64,
    /// 128-bit integer: `42BD`, `42bd` (suffix trimmed from the text).
    Int128,
    /// 32-bit unsigned hex integer: `0xFF` (1-8 hex digits, prefix kept).
    Uint32,
    /// 64-bit unsigned hex integer: `0xDEADBEEF00` (9-16 hex digits).
    Uint64,
    /// 32-bit float: `2.5f` (suffix kept in the text).
    Float32,
    /// 64-bit float: `3.14`, `1.5e-3`, `2.5d` (suffix kept in the text).
    Float64,
    /// Quoted string; text is the raw payload between the quotes,
    /// escapes NOT decoded.
    String,
    /// Base64 blob; text is the payload between `[` and `]`.
    Base64,
    /// Keyword `true`.
    True,
    /// Keyword `false`.
    False,
    /// Keyword `null`.
    Null,
}

impl TokenKind {
    /// Check if this is a value token (can follow an Attribute or stand
    /// anonymously in a node body).
    #[inline]
    pub fn is_value(self) -> bool {
        !matches!(
            self,
            TokenKind::Node
                | TokenKind::NodeEnd
                | TokenKind::Block
                | TokenKind::BlockEnd
                | TokenKind::Attribute
        )
    }

    /// Stable lowercase label for diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Node => "node",
            TokenKind::NodeEnd => "node-end",
            TokenKind::Block => "block",
            TokenKind::BlockEnd => "block-end",
            TokenKind::Attribute => "attribute",
            TokenKind::Int32 => "int32",
            TokenKind::Int64 => "int64",
            TokenKind::Int128 => "int128",
            TokenKind::Uint32 => "uint32",
            TokenKind::Uint64 => "uint64",
            TokenKind::Float32 => "float32",
            TokenKind::Float64 => "float64",
            TokenKind::String => "string",
            TokenKind::Base64 => "base64",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
        }
    }
}

/// A single emitted token.
///
/// The lifetime `'a` refers to the scan buffer - `text` is a zero-copy
/// reference into the parser's window and is only valid for the duration
/// of the sink callback. Sinks that need to keep token text must copy it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Trimmed token text (see [`trim`]). Empty for NodeEnd.
    pub text: &'a [u8],
    /// 1-based line at which the token's match began.
    pub line: u32,
}

/// Trim a raw matched lexeme down to the token text.
///
/// Applied exactly once, when the token is emitted:
/// - `Attribute` drops its trailing `=`
/// - `Int32`/`Int64`/`Float32`/`Float64` drop one leading `+`
/// - `Int128` drops one leading `+` and its 2-byte `BD`/`bd` suffix
/// - `String`/`Base64` drop one delimiter byte on each side
/// - everything else passes through untouched
pub(crate) fn trim(kind: TokenKind, raw: &[u8]) -> &[u8] {
    match kind {
        TokenKind::Attribute => &raw[..raw.len() - 1],
        TokenKind::Int32 | TokenKind::Int64 | TokenKind::Float32 | TokenKind::Float64 => {
            strip_plus(raw)
        }
        TokenKind::Int128 => {
            let raw = strip_plus(raw);
            &raw[..raw.len() - 2]
        }
        TokenKind::String | TokenKind::Base64 => &raw[1..raw.len() - 1],
        _ => raw,
    }
}

#[inline]
fn strip_plus(raw: &[u8]) -> &[u8] {
    match raw.first() {
        Some(b'+') => &raw[1..],
        _ => raw,
    }
}
