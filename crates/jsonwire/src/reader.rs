//! The forward-only JSON reader.
//!
//! [`JsonReader`] is a cursor over an immutable byte slice. It never copies
//! input: string reads first locate the closing quote with a
//! backslash-aware scan and hand back a borrowed [`RawSegment`], paying the
//! unescape cost only when the caller asks for decoded text. Structural
//! reads verify a single byte; numeric reads scan a maximal token and
//! convert it with overflow-checked arithmetic.
//!
//! The cursor only moves forward. Every error carries the byte offset at
//! which it was detected, and an error leaves no usable partial state:
//! callers abort the whole decode.

use core::fmt;
use core::ops::Deref;

use bstr::BStr;

use crate::{
    error::{ParseError, ParseErrorKind},
    escape, number,
    token::JsonToken,
};

/// A borrowed view of a string literal's raw content (the bytes between
/// the quotes, still escaped).
///
/// Useful for matching known property names by byte comparison before
/// paying for unescaping. The segment borrows from the reader's input and
/// lives as long as it does.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RawSegment<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> RawSegment<'a> {
    /// The raw (still escaped) bytes between the quotes.
    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Absolute byte offset of the segment start within the reader input.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Decodes the segment into an owned string, resolving escapes.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] on malformed escapes or invalid UTF-8.
    pub fn unescape(&self) -> Result<String, ParseError> {
        escape::unescape(self.bytes, self.offset)
    }
}

impl Deref for RawSegment<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.bytes
    }
}

impl PartialEq<[u8]> for RawSegment<'_> {
    fn eq(&self, other: &[u8]) -> bool {
        self.bytes == other
    }
}

impl PartialEq<&[u8]> for RawSegment<'_> {
    fn eq(&self, other: &&[u8]) -> bool {
        self.bytes == *other
    }
}

impl fmt::Debug for RawSegment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawSegment")
            .field("bytes", &BStr::new(self.bytes))
            .field("offset", &self.offset)
            .finish()
    }
}

/// Bytes that terminate a numeric token. Anything else inside a number's
/// maximal run is an error.
fn is_delimiter(byte: u8) -> bool {
    matches!(
        byte,
        b' ' | b'\t' | b'\r' | b'\n' | b',' | b'}' | b']' | b':'
    )
}

/// A forward-only cursor over UTF-8 JSON bytes.
///
/// # Examples
///
/// ```
/// use jsonwire::JsonReader;
///
/// let mut r = JsonReader::new(br#"{"a":1,"b":2}"#);
/// r.read_begin_object()?;
/// let mut count = 0;
/// let mut total = 0u32;
/// while !r.end_of_object(&mut count)? {
///     let _name = r.read_property_name_segment_raw()?;
///     total += r.read_u32()?;
/// }
/// assert_eq!(total, 3);
/// assert_eq!(r.consumed(), 13);
/// # Ok::<(), jsonwire::ParseError>(())
/// ```
#[derive(Debug)]
pub struct JsonReader<'a> {
    input: &'a [u8],
    offset: usize,
}

impl<'a> JsonReader<'a> {
    /// Creates a reader over `input`.
    #[must_use]
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, offset: 0 }
    }

    /// Bytes consumed so far.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.offset
    }

    /// The unread remainder of the input.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        &self.input[self.offset..]
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.offset).copied()
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.offset)
    }

    /// Advances past insignificant whitespace: space, tab, CR, LF only.
    pub fn skip_whitespace(&mut self) {
        while let Some(byte) = self.peek() {
            match byte {
                b' ' | b'\t' | b'\r' | b'\n' => self.offset += 1,
                _ => break,
            }
        }
    }

    /// Classifies the token at the cursor without consuming it.
    ///
    /// Skips leading whitespace. Returns `None` at end of input or when
    /// the byte at the cursor cannot start a JSON token.
    pub fn current_token(&mut self) -> Option<JsonToken> {
        self.skip_whitespace();
        self.peek().and_then(JsonToken::classify)
    }

    fn expect_byte(&mut self, expected: u8) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(byte) if byte == expected => {
                self.offset += 1;
                Ok(())
            }
            Some(_) => Err(self.error(ParseErrorKind::ExpectedToken(expected as char))),
            None => Err(self.error(ParseErrorKind::UnexpectedEndOfInput)),
        }
    }

    fn consume_if(&mut self, expected: u8) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.offset += 1;
            true
        } else {
            false
        }
    }

    /// Verifies and consumes `{`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] naming the expected token otherwise.
    pub fn read_begin_object(&mut self) -> Result<(), ParseError> {
        self.expect_byte(b'{')
    }

    /// Verifies and consumes `}`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] naming the expected token otherwise.
    pub fn read_end_object(&mut self) -> Result<(), ParseError> {
        self.expect_byte(b'}')
    }

    /// Verifies and consumes `[`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] naming the expected token otherwise.
    pub fn read_begin_array(&mut self) -> Result<(), ParseError> {
        self.expect_byte(b'[')
    }

    /// Verifies and consumes `]`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] naming the expected token otherwise.
    pub fn read_end_array(&mut self) -> Result<(), ParseError> {
        self.expect_byte(b']')
    }

    /// Verifies and consumes `:`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] naming the expected token otherwise.
    pub fn read_name_separator(&mut self) -> Result<(), ParseError> {
        self.expect_byte(b':')
    }

    /// Verifies and consumes `,`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] naming the expected token otherwise.
    pub fn read_value_separator(&mut self) -> Result<(), ParseError> {
        self.expect_byte(b',')
    }

    /// The object-body iteration primitive.
    ///
    /// With `*count == 0` it checks for an immediately closing `}` (the
    /// empty object); on later calls it first expects a `,` unless the
    /// closer is next. Returns `true` once `}` has been consumed,
    /// incrementing `*count` for each item the caller is about to read.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when neither a separator nor the closer is
    /// found where one is required.
    pub fn end_of_object(&mut self, count: &mut usize) -> Result<bool, ParseError> {
        self.end_of_container(b'}', count)
    }

    /// The array-body iteration primitive; see
    /// [`end_of_object`](Self::end_of_object).
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when neither a separator nor the closer is
    /// found where one is required.
    pub fn end_of_array(&mut self, count: &mut usize) -> Result<bool, ParseError> {
        self.end_of_container(b']', count)
    }

    fn end_of_container(&mut self, closer: u8, count: &mut usize) -> Result<bool, ParseError> {
        self.skip_whitespace();
        if *count == 0 {
            if self.consume_if(closer) {
                return Ok(true);
            }
        } else {
            match self.peek() {
                Some(byte) if byte == closer => {
                    self.offset += 1;
                    return Ok(true);
                }
                Some(b',') => self.offset += 1,
                Some(_) => {
                    return Err(
                        self.error(ParseErrorKind::ExpectedSeparatorOrEnd(closer as char))
                    );
                }
                None => return Err(self.error(ParseErrorKind::UnexpectedEndOfInput)),
            }
        }
        *count += 1;
        Ok(false)
    }

    /// Consumes the `null` literal if it is next; leaves the cursor
    /// untouched otherwise.
    pub fn read_is_null(&mut self) -> bool {
        self.skip_whitespace();
        if self.input[self.offset..].starts_with(b"null") {
            self.offset += 4;
            true
        } else {
            false
        }
    }

    /// Reads a `true` or `false` literal.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if neither literal is next.
    pub fn read_bool(&mut self) -> Result<bool, ParseError> {
        self.skip_whitespace();
        if self.input[self.offset..].starts_with(b"true") {
            self.offset += 4;
            Ok(true)
        } else if self.input[self.offset..].starts_with(b"false") {
            self.offset += 5;
            Ok(false)
        } else {
            Err(self.error(ParseErrorKind::ExpectedBoolean))
        }
    }

    /// Reads a string literal and returns its raw content without
    /// unescaping.
    ///
    /// The scan is backslash-aware (`\"` does not terminate the string)
    /// and rejects unescaped control characters.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if no string is next or the literal is
    /// unterminated.
    pub fn read_string_segment_raw(&mut self) -> Result<RawSegment<'a>, ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(b'"') => {}
            Some(_) => return Err(self.error(ParseErrorKind::ExpectedString)),
            None => return Err(self.error(ParseErrorKind::UnexpectedEndOfInput)),
        }
        let start = self.offset + 1;
        let mut at = start;
        loop {
            match self.input.get(at) {
                None => return Err(ParseError::new(ParseErrorKind::UnexpectedEndOfInput, at)),
                Some(b'"') => break,
                Some(b'\\') => {
                    // Skip the escaped byte; hex digits of a \u escape can
                    // never be a quote, so skipping one byte is enough to
                    // keep the scan aligned.
                    at += 2;
                    if at > self.input.len() {
                        return Err(ParseError::new(
                            ParseErrorKind::UnexpectedEndOfInput,
                            self.input.len(),
                        ));
                    }
                }
                Some(&byte) if byte < 0x20 => {
                    return Err(ParseError::new(ParseErrorKind::ControlCharacter(byte), at));
                }
                Some(_) => at += 1,
            }
        }
        let segment = RawSegment {
            bytes: &self.input[start..at],
            offset: start,
        };
        self.offset = at + 1;
        Ok(segment)
    }

    /// Reads a string literal and decodes it into an owned string.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] on a missing/unterminated string or a
    /// malformed escape.
    pub fn read_string(&mut self) -> Result<String, ParseError> {
        self.read_string_segment_raw()?.unescape()
    }

    /// Reads a property name and its `:` separator, returning the name's
    /// raw content without unescaping.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] on a missing string or missing separator.
    pub fn read_property_name_segment_raw(&mut self) -> Result<RawSegment<'a>, ParseError> {
        let segment = self.read_string_segment_raw()?;
        self.read_name_separator()?;
        Ok(segment)
    }

    /// Reads a property name and its `:` separator, decoding the name.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] on a missing string, malformed escape, or
    /// missing separator.
    pub fn read_property_name(&mut self) -> Result<String, ParseError> {
        let segment = self.read_property_name_segment_raw()?;
        segment.unescape()
    }

    /// Scans the maximal integer run at the cursor.
    ///
    /// Returns the sign and unsigned magnitude. The run ends at a JSON
    /// delimiter or end of input; a non-digit inside the run, an empty
    /// run, a redundant leading zero, or a run longer than `max_digits`
    /// is an error.
    fn scan_integer(&mut self, signed: bool, max_digits: usize) -> Result<(bool, u64), ParseError> {
        self.skip_whitespace();
        let start = self.offset;
        let negative = if self.peek() == Some(b'-') {
            if !signed {
                return Err(self.error(ParseErrorKind::InvalidNumber));
            }
            self.offset += 1;
            true
        } else {
            false
        };
        let digits_start = self.offset;
        let mut value: u64 = 0;
        loop {
            match self.peek() {
                Some(byte @ b'0'..=b'9') => {
                    value = value
                        .checked_mul(10)
                        .and_then(|v| v.checked_add(u64::from(byte - b'0')))
                        .ok_or_else(|| ParseError::new(ParseErrorKind::NumberOutOfRange, start))?;
                    self.offset += 1;
                }
                Some(byte) if is_delimiter(byte) => break,
                Some(_) => return Err(self.error(ParseErrorKind::InvalidNumber)),
                None => break,
            }
        }
        let digits = self.offset - digits_start;
        if digits == 0 {
            return Err(self.error(ParseErrorKind::InvalidNumber));
        }
        if digits > 1 && self.input[digits_start] == b'0' {
            return Err(ParseError::new(ParseErrorKind::InvalidNumber, digits_start));
        }
        if digits > max_digits {
            return Err(ParseError::new(ParseErrorKind::NumberOutOfRange, start));
        }
        Ok((negative, value))
    }

    fn finish_signed(
        &self,
        negative: bool,
        magnitude: u64,
        start: usize,
    ) -> Result<i64, ParseError> {
        if negative {
            if magnitude > i64::MAX.unsigned_abs() + 1 {
                return Err(ParseError::new(ParseErrorKind::NumberOutOfRange, start));
            }
            Ok((magnitude as i64).wrapping_neg())
        } else {
            i64::try_from(magnitude)
                .map_err(|_| ParseError::new(ParseErrorKind::NumberOutOfRange, start))
        }
    }

    /// Reads an unsigned 64-bit integer.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] on malformed digits or overflow.
    pub fn read_u64(&mut self) -> Result<u64, ParseError> {
        let (_, value) = self.scan_integer(false, number::max_digits::U64)?;
        Ok(value)
    }

    /// Reads an unsigned 32-bit integer.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] on malformed digits or overflow.
    pub fn read_u32(&mut self) -> Result<u32, ParseError> {
        let start = self.offset;
        let (_, value) = self.scan_integer(false, number::max_digits::U32)?;
        u32::try_from(value).map_err(|_| ParseError::new(ParseErrorKind::NumberOutOfRange, start))
    }

    /// Reads an unsigned 16-bit integer.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] on malformed digits or overflow.
    pub fn read_u16(&mut self) -> Result<u16, ParseError> {
        let start = self.offset;
        let (_, value) = self.scan_integer(false, number::max_digits::U16)?;
        u16::try_from(value).map_err(|_| ParseError::new(ParseErrorKind::NumberOutOfRange, start))
    }

    /// Reads an unsigned 8-bit integer.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] on malformed digits or overflow.
    pub fn read_u8(&mut self) -> Result<u8, ParseError> {
        let start = self.offset;
        let (_, value) = self.scan_integer(false, number::max_digits::U8)?;
        u8::try_from(value).map_err(|_| ParseError::new(ParseErrorKind::NumberOutOfRange, start))
    }

    /// Scans a sign-aware integer bounded by the target width's maximum
    /// digit count and folds the sign in.
    fn read_signed(&mut self, max_digits: usize) -> Result<i64, ParseError> {
        self.skip_whitespace();
        let start = self.offset;
        let (negative, magnitude) = self.scan_integer(true, max_digits)?;
        self.finish_signed(negative, magnitude, start)
    }

    /// Reads a signed 64-bit integer.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] on malformed digits or overflow.
    pub fn read_i64(&mut self) -> Result<i64, ParseError> {
        self.read_signed(number::max_digits::I64)
    }

    /// Reads a signed 32-bit integer.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] on malformed digits or overflow.
    pub fn read_i32(&mut self) -> Result<i32, ParseError> {
        self.skip_whitespace();
        let start = self.offset;
        let value = self.read_signed(number::max_digits::I32)?;
        i32::try_from(value).map_err(|_| ParseError::new(ParseErrorKind::NumberOutOfRange, start))
    }

    /// Reads a signed 16-bit integer.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] on malformed digits or overflow.
    pub fn read_i16(&mut self) -> Result<i16, ParseError> {
        self.skip_whitespace();
        let start = self.offset;
        let value = self.read_signed(number::max_digits::I16)?;
        i16::try_from(value).map_err(|_| ParseError::new(ParseErrorKind::NumberOutOfRange, start))
    }

    /// Reads a signed 8-bit integer.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] on malformed digits or overflow.
    pub fn read_i8(&mut self) -> Result<i8, ParseError> {
        self.skip_whitespace();
        let start = self.offset;
        let value = self.read_signed(number::max_digits::I8)?;
        i8::try_from(value).map_err(|_| ParseError::new(ParseErrorKind::NumberOutOfRange, start))
    }

    /// Scans one complete numeric token, validating the strict JSON number
    /// grammar: `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`,
    /// terminated by a delimiter or end of input.
    fn scan_number_token(&mut self) -> Result<&'a str, ParseError> {
        self.skip_whitespace();
        let start = self.offset;
        let bytes = self.input;
        let mut at = start;
        if bytes.get(at) == Some(&b'-') {
            at += 1;
        }
        match bytes.get(at) {
            Some(b'0') => at += 1,
            Some(b'1'..=b'9') => {
                at += 1;
                while matches!(bytes.get(at), Some(b'0'..=b'9')) {
                    at += 1;
                }
            }
            Some(_) => return Err(ParseError::new(ParseErrorKind::InvalidNumber, at)),
            None => return Err(ParseError::new(ParseErrorKind::UnexpectedEndOfInput, at)),
        }
        if bytes.get(at) == Some(&b'.') {
            at += 1;
            if !matches!(bytes.get(at), Some(b'0'..=b'9')) {
                return Err(ParseError::new(ParseErrorKind::InvalidNumber, at));
            }
            while matches!(bytes.get(at), Some(b'0'..=b'9')) {
                at += 1;
            }
        }
        if matches!(bytes.get(at), Some(b'e' | b'E')) {
            at += 1;
            if matches!(bytes.get(at), Some(b'+' | b'-')) {
                at += 1;
            }
            if !matches!(bytes.get(at), Some(b'0'..=b'9')) {
                return Err(ParseError::new(ParseErrorKind::InvalidNumber, at));
            }
            while matches!(bytes.get(at), Some(b'0'..=b'9')) {
                at += 1;
            }
        }
        match bytes.get(at) {
            None => {}
            Some(&byte) if is_delimiter(byte) => {}
            Some(_) => return Err(ParseError::new(ParseErrorKind::InvalidNumber, at)),
        }
        let token = core::str::from_utf8(&bytes[start..at])
            .map_err(|_| ParseError::new(ParseErrorKind::InvalidNumber, start))?;
        self.offset = at;
        Ok(token)
    }

    /// Reads a 64-bit float.
    ///
    /// The token is scanned against the strict JSON grammar and then
    /// converted with a correctly-rounded decimal-to-binary parse that
    /// consumes the token exactly.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] on a malformed numeric token.
    pub fn read_f64(&mut self) -> Result<f64, ParseError> {
        self.skip_whitespace();
        let start = self.offset;
        let token = self.scan_number_token()?;
        token
            .parse::<f64>()
            .map_err(|_| ParseError::new(ParseErrorKind::InvalidNumber, start))
    }

    /// Reads a 32-bit float; see [`read_f64`](Self::read_f64).
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] on a malformed numeric token.
    pub fn read_f32(&mut self) -> Result<f32, ParseError> {
        self.skip_whitespace();
        let start = self.offset;
        let token = self.scan_number_token()?;
        token
            .parse::<f32>()
            .map_err(|_| ParseError::new(ParseErrorKind::InvalidNumber, start))
    }

    /// Skips one complete JSON value — scalar or nested container —
    /// without materializing it.
    ///
    /// The walk is iterative, so input nested arbitrarily deep cannot
    /// overflow the stack. Tokens inside a skipped container are only
    /// shallowly checked; full validation happens when a value is actually
    /// read.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when no value starts at the cursor or the
    /// input ends inside the skipped value.
    pub fn skip_value(&mut self) -> Result<(), ParseError> {
        let mut depth: usize = 0;
        loop {
            self.skip_whitespace();
            let Some(token) = self.current_token() else {
                return Err(self.error(if self.offset == self.input.len() {
                    ParseErrorKind::UnexpectedEndOfInput
                } else {
                    ParseErrorKind::ExpectedValue
                }));
            };
            match token {
                JsonToken::BeginObject | JsonToken::BeginArray => {
                    self.offset += 1;
                    depth += 1;
                }
                JsonToken::EndObject | JsonToken::EndArray => {
                    if depth == 0 {
                        return Err(self.error(ParseErrorKind::ExpectedValue));
                    }
                    self.offset += 1;
                    depth -= 1;
                }
                JsonToken::NameSeparator | JsonToken::ValueSeparator => {
                    if depth == 0 {
                        return Err(self.error(ParseErrorKind::ExpectedValue));
                    }
                    self.offset += 1;
                    continue;
                }
                JsonToken::String => {
                    self.read_string_segment_raw()?;
                }
                JsonToken::Number => {
                    self.scan_number_token()?;
                }
                JsonToken::True | JsonToken::False => {
                    self.read_bool()?;
                }
                JsonToken::Null => {
                    if !self.read_is_null() {
                        return Err(self.error(ParseErrorKind::ExpectedValue));
                    }
                }
            }
            if depth == 0 {
                return Ok(());
            }
        }
    }
}
