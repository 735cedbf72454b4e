//! The append-only JSON writer.
//!
//! Every write follows the measure-then-write pattern: compute the exact
//! byte length of the encoded form, request a span of that size from the
//! buffer, and fill it in place. No intermediate strings, no reallocation,
//! no formatting machinery.
//!
//! Writer primitives are total: they do not return errors. Nesting depth is
//! tracked so that a caller serializing a recursive structure can consult
//! [`JsonWriter::depth`] and substitute an empty `{}`/`[]` placeholder past
//! its limit instead of recursing without bound; see
//! [`write_value`](crate::value::write_value).

use std::sync::Arc;

use crate::{
    buffer::{BufferPool, ByteBuffer},
    escape, number,
};

/// An append-only cursor producing UTF-8 JSON bytes into a pooled
/// [`ByteBuffer`].
///
/// # Examples
///
/// ```
/// use jsonwire::JsonWriter;
///
/// let mut w = JsonWriter::new();
/// w.begin_object();
/// w.write_property_name("id");
/// w.write_u32(7);
/// w.value_separator();
/// w.write_property_name("name");
/// w.write_str("n/a");
/// w.end_object();
/// assert_eq!(w.into_vec(), br#"{"id":7,"name":"n/a"}"#);
/// ```
#[derive(Debug)]
pub struct JsonWriter {
    buf: ByteBuffer,
    depth: usize,
}

impl JsonWriter {
    /// Creates a writer backed by the process-wide buffer pool.
    #[must_use]
    pub fn new() -> Self {
        Self::with_pool(Arc::clone(BufferPool::shared()))
    }

    /// Creates a writer backed by the given pool.
    #[must_use]
    pub fn with_pool(pool: Arc<BufferPool>) -> Self {
        Self {
            buf: ByteBuffer::with_pool(pool),
            depth: 0,
        }
    }

    /// Current structural nesting depth.
    ///
    /// Incremented by [`begin_object`](Self::begin_object) /
    /// [`begin_array`](Self::begin_array), decremented by the matching end
    /// calls.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Total bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Flattens the output into a single contiguous vector, returning all
    /// buffer segments to the pool.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.buf.into_vec()
    }

    /// Grants a writable span of at least `hint` bytes for a custom
    /// formatter writing directly into the output; commit with
    /// [`advance`](Self::advance). See [`ByteBuffer::span`].
    pub fn span(&mut self, hint: usize) -> &mut [u8] {
        self.buf.span(hint)
    }

    /// Commits `count` bytes of the last granted span. See
    /// [`ByteBuffer::advance`].
    pub fn advance(&mut self, count: usize) {
        self.buf.advance(count);
    }

    fn push_byte(&mut self, byte: u8) {
        let span = self.buf.span(1);
        span[0] = byte;
        self.buf.advance(1);
    }

    fn push_bytes(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let span = self.buf.span(bytes.len());
        span[..bytes.len()].copy_from_slice(bytes);
        self.buf.advance(bytes.len());
    }

    /// Writes `{` and enters one nesting level.
    pub fn begin_object(&mut self) {
        self.push_byte(b'{');
        self.depth += 1;
    }

    /// Writes `}` and leaves one nesting level.
    pub fn end_object(&mut self) {
        debug_assert!(self.depth > 0, "end_object without matching begin");
        self.push_byte(b'}');
        self.depth -= 1;
    }

    /// Writes `[` and enters one nesting level.
    pub fn begin_array(&mut self) {
        self.push_byte(b'[');
        self.depth += 1;
    }

    /// Writes `]` and leaves one nesting level.
    pub fn end_array(&mut self) {
        debug_assert!(self.depth > 0, "end_array without matching begin");
        self.push_byte(b']');
        self.depth -= 1;
    }

    /// Writes the `,` separating items.
    pub fn value_separator(&mut self) {
        self.push_byte(b',');
    }

    /// Writes the `:` separating a property name from its value.
    pub fn name_separator(&mut self) {
        self.push_byte(b':');
    }

    /// Writes a quoted, escaped property name followed by `:`.
    pub fn write_property_name(&mut self, name: &str) {
        self.write_str(name);
        self.push_byte(b':');
    }

    /// Writes the `null` literal.
    pub fn write_null(&mut self) {
        self.push_bytes(b"null");
    }

    /// Writes `true` or `false`.
    pub fn write_bool(&mut self, value: bool) {
        self.push_bytes(if value { b"true".as_slice() } else { b"false" });
    }

    /// Writes a quoted, escaped string literal.
    pub fn write_str(&mut self, value: &str) {
        let len = escape::escaped_len(value);
        let span = self.buf.span(len);
        escape::write_escaped(value, &mut span[..len]);
        self.buf.advance(len);
    }

    /// Appends pre-encoded JSON bytes verbatim.
    ///
    /// The caller is responsible for the bytes forming valid JSON in
    /// context; the writer performs no validation and no escaping.
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.push_bytes(bytes);
    }

    /// Writes an unsigned 8-bit integer in decimal.
    pub fn write_u8(&mut self, value: u8) {
        self.write_u32(u32::from(value));
    }

    /// Writes an unsigned 16-bit integer in decimal.
    pub fn write_u16(&mut self, value: u16) {
        self.write_u32(u32::from(value));
    }

    /// Writes an unsigned 32-bit integer in decimal.
    pub fn write_u32(&mut self, value: u32) {
        let len = number::decimal_len_u32(value);
        let span = self.buf.span(len);
        number::write_decimal_u32(value, &mut span[..len]);
        self.buf.advance(len);
    }

    /// Writes an unsigned 64-bit integer in decimal.
    pub fn write_u64(&mut self, value: u64) {
        let len = number::decimal_len_u64(value);
        let span = self.buf.span(len);
        number::write_decimal_u64(value, &mut span[..len]);
        self.buf.advance(len);
    }

    /// Writes a signed 8-bit integer in decimal.
    pub fn write_i8(&mut self, value: i8) {
        self.write_i32(i32::from(value));
    }

    /// Writes a signed 16-bit integer in decimal.
    pub fn write_i16(&mut self, value: i16) {
        self.write_i32(i32::from(value));
    }

    /// Writes a signed 32-bit integer in decimal.
    ///
    /// Negative values emit a sign byte and then the digits of the
    /// unsigned magnitude; `unsigned_abs` makes `i32::MIN` unremarkable.
    pub fn write_i32(&mut self, value: i32) {
        let magnitude = value.unsigned_abs();
        let digits = number::decimal_len_u32(magnitude);
        let len = digits + usize::from(value < 0);
        let span = self.buf.span(len);
        if value < 0 {
            span[0] = b'-';
        }
        number::write_decimal_u32(magnitude, &mut span[len - digits..len]);
        self.buf.advance(len);
    }

    /// Writes a signed 64-bit integer in decimal.
    pub fn write_i64(&mut self, value: i64) {
        let magnitude = value.unsigned_abs();
        let digits = number::decimal_len_u64(magnitude);
        let len = digits + usize::from(value < 0);
        let span = self.buf.span(len);
        if value < 0 {
            span[0] = b'-';
        }
        number::write_decimal_u64(magnitude, &mut span[len - digits..len]);
        self.buf.advance(len);
    }

    /// Writes a 32-bit float as its shortest round-trippable decimal.
    ///
    /// JSON has no NaN or infinity; non-finite values are written as
    /// `null`.
    pub fn write_f32(&mut self, value: f32) {
        if value.is_finite() {
            let mut scratch = ryu::Buffer::new();
            let text = scratch.format_finite(value);
            self.push_bytes(text.as_bytes());
        } else {
            self.write_null();
        }
    }

    /// Writes a 64-bit float as its shortest round-trippable decimal.
    ///
    /// JSON has no NaN or infinity; non-finite values are written as
    /// `null`.
    pub fn write_f64(&mut self, value: f64) {
        if value.is_finite() {
            let mut scratch = ryu::Buffer::new();
            let text = scratch.format_finite(value);
            self.push_bytes(text.as_bytes());
        } else {
            self.write_null();
        }
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}
