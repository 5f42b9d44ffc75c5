//! SDLang Core Parser
//!
//! Streaming, token-based parser for SDLang documents (nodes, attributes,
//! typed values, `{}` blocks). Tokens are delivered to a sink as they are
//! scanned; no tree is built and memory stays fixed regardless of input
//! size.
//!
//! # Architecture
//!
//! - **source.rs** - ByteSource pull trait and stream adapters
//! - **buffer.rs** - Fixed-capacity scan window with shift-and-refill
//! - **token.rs** - TokenKind enum, Token spans, lexeme trimming
//! - **parser.rs** - Parser configuration and the scanning engine
//! - **sink.rs** - TokenSink trait and the debug printer
//! - **value.rs** - Lexeme-to-native decoding for value tokens
//! - **dispatch.rs** - Typed per-value dispatch onto handler callbacks
//! - **error.rs** - ParseError and error kinds

mod buffer;

pub mod dispatch;
pub mod error;
pub mod parser;
pub mod sink;
pub mod source;
pub mod token;
pub mod value;

pub use dispatch::{TypedDispatcher, ValueHandler};
pub use error::{ErrorKind, ParseError};
pub use parser::{
    Parser, DEFAULT_BUFFER_CAPACITY, DEFAULT_NAME_CAPACITY, DEFAULT_STACK_CAPACITY,
};
pub use sink::{TokenPrinter, TokenSink};
pub use source::{ByteSource, ReadSource};
pub use token::{Token, TokenKind};
