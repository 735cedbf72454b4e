//! Dynamic JSON values and the convenience codec over them.
//!
//! [`Value`] is the dynamically-typed representation for callers that do
//! not know the shape of their data ahead of time. Encoding and decoding
//! run entirely through [`JsonWriter`] and [`JsonReader`], which makes this
//! module both a convenience API and the reference for how an
//! orchestration layer drives the core: the container loops here are the
//! state machine every collection-shaped consumer repeats.
//!
//! Encoding is total. Past [`DEFAULT_MAX_DEPTH`] (or the limit passed to
//! [`to_vec_with_limit`]) nested containers are written as empty `{}`/`[]`
//! placeholders instead of recursing further — the output stays valid
//! JSON and serialization always terminates, even for pathologically deep
//! trees.

use std::collections::BTreeMap;

use crate::{
    error::{ParseError, ParseErrorKind},
    reader::JsonReader,
    token::JsonToken,
    writer::JsonWriter,
};

/// Object representation: property names to values, ordered by name.
pub type Map = BTreeMap<String, Value>;

/// Array representation.
pub type Array = Vec<Value>;

/// Nesting limit applied by [`to_vec`] and [`from_slice`].
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// A JSON value as defined by [RFC 8259].
///
/// # Examples
///
/// ```
/// use jsonwire::{Map, Value, to_vec};
///
/// let mut map = Map::new();
/// map.insert("key".to_string(), Value::String("value".into()));
/// assert_eq!(to_vec(&Value::Object(map)), br#"{"key":"value"}"#);
/// ```
///
/// [RFC 8259]: https://datatracker.ietf.org/doc/html/rfc8259
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// `null`
    Null,
    /// `true` or `false`
    Boolean(bool),
    /// Any JSON number
    Number(f64),
    /// A string literal
    String(String),
    /// An array of values
    Array(Array),
    /// An object
    Object(Map),
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

impl Value {
    /// Returns `true` if the value is [`Null`](Value::Null).
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the value is an object.
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(..))
    }

    /// Returns `true` if the value is an array.
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }
}

impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&String::from_utf8_lossy(&to_vec(self)))
    }
}

/// Serializes `value` with the default nesting limit.
#[must_use]
pub fn to_vec(value: &Value) -> Vec<u8> {
    to_vec_with_limit(value, DEFAULT_MAX_DEPTH)
}

/// Serializes `value`, truncating containers nested `max_depth` or more
/// levels deep to empty placeholders.
#[must_use]
pub fn to_vec_with_limit(value: &Value, max_depth: usize) -> Vec<u8> {
    let mut writer = JsonWriter::new();
    write_value(&mut writer, value, max_depth);
    writer.into_vec()
}

/// Writes one value through `writer`, consulting [`JsonWriter::depth`]
/// against `max_depth` before descending into containers.
///
/// A container at or past the limit is emitted as `{}`/`[]` with its
/// contents dropped. This bounds recursion without making serialization
/// fallible.
pub fn write_value(writer: &mut JsonWriter, value: &Value, max_depth: usize) {
    match value {
        Value::Null => writer.write_null(),
        Value::Boolean(b) => writer.write_bool(*b),
        Value::Number(n) => writer.write_f64(*n),
        Value::String(s) => writer.write_str(s),
        Value::Array(items) => {
            writer.begin_array();
            if writer.depth() <= max_depth {
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        writer.value_separator();
                    }
                    write_value(writer, item, max_depth);
                }
            }
            writer.end_array();
        }
        Value::Object(map) => {
            writer.begin_object();
            if writer.depth() <= max_depth {
                for (index, (name, item)) in map.iter().enumerate() {
                    if index > 0 {
                        writer.value_separator();
                    }
                    writer.write_property_name(name);
                    write_value(writer, item, max_depth);
                }
            }
            writer.end_object();
        }
    }
}

/// Deserializes one complete JSON value from `input`.
///
/// The whole input must be consumed: anything but whitespace after the
/// root value is an error.
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first problem found.
pub fn from_slice(input: &[u8]) -> Result<Value, ParseError> {
    let mut reader = JsonReader::new(input);
    let value = read_value(&mut reader, 0)?;
    reader.skip_whitespace();
    if reader.consumed() != input.len() {
        return Err(ParseError::new(
            ParseErrorKind::TrailingCharacters,
            reader.consumed(),
        ));
    }
    Ok(value)
}

/// Reads one value from `reader` at the given nesting depth.
///
/// Decoding has no truncation option, so nesting past
/// [`DEFAULT_MAX_DEPTH`] is an error rather than a silent rewrite.
///
/// # Errors
///
/// Returns a [`ParseError`] on malformed input or over-deep nesting.
pub fn read_value(reader: &mut JsonReader<'_>, depth: usize) -> Result<Value, ParseError> {
    // One more level than the writer's own limit, so depth-truncated output
    // always reads back.
    if depth > DEFAULT_MAX_DEPTH {
        return Err(ParseError::new(ParseErrorKind::TooDeep, reader.consumed()));
    }
    match reader.current_token() {
        Some(JsonToken::Null) => {
            if reader.read_is_null() {
                Ok(Value::Null)
            } else {
                Err(ParseError::new(
                    ParseErrorKind::ExpectedValue,
                    reader.consumed(),
                ))
            }
        }
        Some(JsonToken::True | JsonToken::False) => Ok(Value::Boolean(reader.read_bool()?)),
        Some(JsonToken::Number) => Ok(Value::Number(reader.read_f64()?)),
        Some(JsonToken::String) => Ok(Value::String(reader.read_string()?)),
        Some(JsonToken::BeginArray) => {
            reader.read_begin_array()?;
            let mut items = Array::new();
            let mut count = 0;
            while !reader.end_of_array(&mut count)? {
                items.push(read_value(reader, depth + 1)?);
            }
            Ok(Value::Array(items))
        }
        Some(JsonToken::BeginObject) => {
            reader.read_begin_object()?;
            let mut map = Map::new();
            let mut count = 0;
            while !reader.end_of_object(&mut count)? {
                let name = reader.read_property_name()?;
                let item = read_value(reader, depth + 1)?;
                map.insert(name, item);
            }
            Ok(Value::Object(map))
        }
        Some(
            JsonToken::EndObject
            | JsonToken::EndArray
            | JsonToken::NameSeparator
            | JsonToken::ValueSeparator,
        )
        | None => Err(ParseError::new(
            ParseErrorKind::ExpectedValue,
            reader.consumed(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_MAX_DEPTH, Map, Value, from_slice, to_vec, to_vec_with_limit};
    use crate::error::ParseErrorKind;

    #[test]
    fn scalars_render() {
        assert_eq!(to_vec(&Value::Null), b"null");
        assert_eq!(to_vec(&Value::Boolean(true)), b"true");
        assert_eq!(to_vec(&Value::Number(1.5)), b"1.5");
        assert_eq!(to_vec(&Value::String("hi".into())), br#""hi""#);
    }

    #[test]
    fn containers_render_with_separators() {
        let doc = Value::Array(vec![
            Value::Number(1.0),
            Value::String("two".into()),
            Value::Null,
        ]);
        assert_eq!(to_vec(&doc), br#"[1.0,"two",null]"#);
    }

    #[test]
    fn object_keys_are_escaped() {
        let mut map = Map::new();
        map.insert("a\"b".to_string(), Value::Null);
        assert_eq!(to_vec(&Value::Object(map)), br#"{"a\"b":null}"#);
    }

    #[test]
    fn depth_limit_truncates_to_placeholders() {
        // {"a":{"b":{"c":1}}} with limit 2: the third object is emptied.
        let mut inner = Map::new();
        inner.insert("c".to_string(), Value::Number(1.0));
        let mut middle = Map::new();
        middle.insert("b".to_string(), Value::Object(inner));
        let mut outer = Map::new();
        outer.insert("a".to_string(), Value::Object(middle));
        let doc = Value::Object(outer);

        assert_eq!(to_vec_with_limit(&doc, 2), br#"{"a":{"b":{}}}"#);
        assert_eq!(to_vec(&doc), br#"{"a":{"b":{"c":1.0}}}"#);
    }

    #[test]
    fn truncated_output_is_still_valid_json() {
        let mut deep = Value::Array(vec![Value::Number(0.0)]);
        for _ in 0..200 {
            deep = Value::Array(vec![deep]);
        }
        let out = to_vec(&deep);
        assert!(from_slice(&out).is_ok());
    }

    #[test]
    fn decode_rejects_over_deep_nesting() {
        let mut doc = vec![b'['; DEFAULT_MAX_DEPTH + 1];
        doc.push(b'1');
        doc.extend(std::iter::repeat_n(b']', DEFAULT_MAX_DEPTH + 1));
        let err = from_slice(&doc).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::TooDeep);
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let err = from_slice(b"1 2").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::TrailingCharacters);
        assert_eq!(err.offset, 2);
        assert!(from_slice(b" 1 ").is_ok());
    }

    #[test]
    fn display_matches_encoding() {
        let doc = Value::Array(vec![Value::Boolean(false)]);
        assert_eq!(doc.to_string(), "[false]");
    }
}
