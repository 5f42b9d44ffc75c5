//! Typed dispatch - the second consumer tier.
//!
//! [`TypedDispatcher`] is a [`TokenSink`] that tracks which node and
//! attribute the parse is inside, decodes value tokens to native types,
//! and hands each value to a [`ValueHandler`] callback together with both
//! names. Handlers override only the callbacks they care about; the rest
//! default to no-ops.
//!
//! Name tracking is deliberately bounded: node and attribute names are
//! copied into fixed-capacity buffers and silently truncated when longer,
//! so the dispatcher allocates nothing per token.

use crate::parser::DEFAULT_NAME_CAPACITY;
use crate::sink::TokenSink;
use crate::token::{Token, TokenKind};
use crate::value;

/// Per-kind value callbacks.
///
/// `node` is the name of the innermost open node and `attribute` the name
/// from the preceding `name=` (empty for anonymous values). Byte payloads
/// (`value_string`, `value_base64`) borrow the scan window and are only
/// valid during the call.
pub trait ValueHandler {
    /// A `{` opened under `node`.
    fn block_begin(&mut self, node: &str) {
        let _ = node;
    }

    /// The matching `}` closed.
    fn block_end(&mut self) {}

    fn value_i32(&mut self, node: &str, attribute: &str, value: i32) {
        let _ = (node, attribute, value);
    }

    fn value_i64(&mut self, node: &str, attribute: &str, value: i64) {
        let _ = (node, attribute, value);
    }

    fn value_i128(&mut self, node: &str, attribute: &str, value: i128) {
        let _ = (node, attribute, value);
    }

    fn value_u32(&mut self, node: &str, attribute: &str, value: u32) {
        let _ = (node, attribute, value);
    }

    fn value_u64(&mut self, node: &str, attribute: &str, value: u64) {
        let _ = (node, attribute, value);
    }

    fn value_f32(&mut self, node: &str, attribute: &str, value: f32) {
        let _ = (node, attribute, value);
    }

    fn value_f64(&mut self, node: &str, attribute: &str, value: f64) {
        let _ = (node, attribute, value);
    }

    /// Raw string payload, escapes untouched.
    fn value_string(&mut self, node: &str, attribute: &str, value: &[u8]) {
        let _ = (node, attribute, value);
    }

    /// Base64 payload as it appeared, not decoded.
    fn value_base64(&mut self, node: &str, attribute: &str, value: &[u8]) {
        let _ = (node, attribute, value);
    }

    fn value_bool(&mut self, node: &str, attribute: &str, value: bool) {
        let _ = (node, attribute, value);
    }

    fn value_null(&mut self, node: &str, attribute: &str) {
        let _ = (node, attribute);
    }
}

/// Fixed-capacity name buffer; writes beyond capacity truncate silently.
struct NameBuf {
    text: String,
    capacity: usize,
}

impl NameBuf {
    fn new(capacity: usize) -> Self {
        Self {
            text: String::with_capacity(capacity),
            capacity,
        }
    }

    fn set(&mut self, name: &[u8]) {
        self.text.clear();
        let take = name.len().min(self.capacity);
        // Names are ASCII identifiers by grammar, one byte per char
        self.text.extend(name[..take].iter().map(|&b| b as char));
    }

    fn clear(&mut self) {
        self.text.clear();
    }

    fn as_str(&self) -> &str {
        &self.text
    }
}

/// Token sink that decodes values and dispatches them to a handler.
///
/// Bookkeeping per token:
/// - `Node` sets the current node name, `NodeEnd` clears it
/// - `Attribute` sets the current attribute name
/// - every value dispatch clears the attribute name afterwards, so the
///   name applies to exactly one value
/// - `Block` reports `block_begin` with the owning node's name; there is
///   no separate node-begin callback
pub struct TypedDispatcher<H> {
    handler: H,
    node: NameBuf,
    attribute: NameBuf,
}

impl<H: ValueHandler> TypedDispatcher<H> {
    pub fn new(handler: H) -> Self {
        Self::with_name_capacity(handler, DEFAULT_NAME_CAPACITY)
    }

    /// Cap the node/attribute name buffers at `capacity` bytes; longer
    /// names are truncated, never rejected.
    pub fn with_name_capacity(handler: H, capacity: usize) -> Self {
        Self {
            handler,
            node: NameBuf::new(capacity),
            attribute: NameBuf::new(capacity),
        }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn into_inner(self) -> H {
        self.handler
    }

    fn dispatch_value(&mut self, kind: TokenKind, text: &[u8]) {
        match kind {
            TokenKind::Int32 => {
                let Some(v) = value::parse_i32(text) else { return };
                self.handler
                    .value_i32(self.node.as_str(), self.attribute.as_str(), v);
            }
            TokenKind::Int64 => {
                let Some(v) = value::parse_i64(text) else { return };
                self.handler
                    .value_i64(self.node.as_str(), self.attribute.as_str(), v);
            }
            TokenKind::Int128 => {
                let Some(v) = value::parse_i128(text) else { return };
                self.handler
                    .value_i128(self.node.as_str(), self.attribute.as_str(), v);
            }
            TokenKind::Uint32 => {
                let Some(v) = value::parse_u32(text) else { return };
                self.handler
                    .value_u32(self.node.as_str(), self.attribute.as_str(), v);
            }
            TokenKind::Uint64 => {
                let Some(v) = value::parse_u64(text) else { return };
                self.handler
                    .value_u64(self.node.as_str(), self.attribute.as_str(), v);
            }
            TokenKind::Float32 => {
                let Some(v) = value::parse_f32(text) else { return };
                self.handler
                    .value_f32(self.node.as_str(), self.attribute.as_str(), v);
            }
            TokenKind::Float64 => {
                let Some(v) = value::parse_f64(text) else { return };
                self.handler
                    .value_f64(self.node.as_str(), self.attribute.as_str(), v);
            }
            TokenKind::String => {
                self.handler
                    .value_string(self.node.as_str(), self.attribute.as_str(), text);
            }
            TokenKind::Base64 => {
                self.handler
                    .value_base64(self.node.as_str(), self.attribute.as_str(), text);
            }
            TokenKind::True => {
                self.handler
                    .value_bool(self.node.as_str(), self.attribute.as_str(), true);
            }
            TokenKind::False => {
                self.handler
                    .value_bool(self.node.as_str(), self.attribute.as_str(), false);
            }
            TokenKind::Null => {
                self.handler
                    .value_null(self.node.as_str(), self.attribute.as_str());
            }
            // Structural kinds are handled by the caller
            _ => {}
        }
    }
}

impl<H: ValueHandler> TokenSink for TypedDispatcher<H> {
    fn token(&mut self, token: &Token<'_>) {
        match token.kind {
            TokenKind::Node => self.node.set(token.text),
            TokenKind::NodeEnd => self.node.clear(),
            TokenKind::Attribute => self.attribute.set(token.text),
            TokenKind::Block => self.handler.block_begin(self.node.as_str()),
            TokenKind::BlockEnd => self.handler.block_end(),
            kind => {
                self.dispatch_value(kind, token.text);
                // The name applies to exactly one value
                self.attribute.clear();
            }
        }
    }
}
