//! A byte-oriented JSON codec: pooled buffers, hand-tuned numeric and
//! string codecs, and the reader/writer pair built on them.
//!
//! The crate converts in-memory values directly to and from UTF-8 JSON
//! bytes — no intermediate text representation, no intermediate DOM on the
//! codec paths. Writes follow a measure-then-write discipline into exact
//! buffer spans; reads scan the input in place and hand back borrowed
//! segments until decoded text is actually needed.
//!
//! The wire format is strict [RFC 8259] JSON in both directions: no
//! trailing commas, no comments, no single quotes, no leading zeros.
//!
//! # Writing
//!
//! ```
//! use jsonwire::JsonWriter;
//!
//! let mut w = JsonWriter::new();
//! w.begin_array();
//! w.write_i32(-2147483648);
//! w.value_separator();
//! w.write_str("two\n");
//! w.end_array();
//! assert_eq!(w.into_vec(), br#"[-2147483648,"two\n"]"#);
//! ```
//!
//! # Reading
//!
//! ```
//! use jsonwire::JsonReader;
//!
//! let mut r = JsonReader::new(br#"{"count": 3, "tags": ["a", "b"]}"#);
//! r.read_begin_object()?;
//! let mut fields = 0;
//! let mut count = 0u64;
//! while !r.end_of_object(&mut fields)? {
//!     let name = r.read_property_name_segment_raw()?;
//!     if name == b"count".as_slice() {
//!         count = r.read_u64()?;
//!     } else {
//!         r.skip_value()?;
//!     }
//! }
//! assert_eq!(count, 3);
//! # Ok::<(), jsonwire::ParseError>(())
//! ```
//!
//! For data of unknown shape there is a dynamic [`Value`] codec:
//! [`to_vec`], [`from_slice`], and the depth-guarded [`write_value`] /
//! [`read_value`] pair.
//!
//! [RFC 8259]: https://datatracker.ietf.org/doc/html/rfc8259

mod buffer;
mod error;
mod escape;
mod number;
mod reader;
mod token;
mod value;
mod writer;

pub use buffer::{BufferPool, ByteBuffer};
pub use error::{ParseError, ParseErrorKind};
pub use reader::{JsonReader, RawSegment};
pub use token::JsonToken;
pub use value::{
    Array, DEFAULT_MAX_DEPTH, Map, Value, from_slice, read_value, to_vec, to_vec_with_limit,
    write_value,
};
pub use writer::JsonWriter;
