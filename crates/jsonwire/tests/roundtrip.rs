//! Round-trip properties: everything the writer emits, the reader must
//! take back bit-for-bit, and serde_json must agree with both directions.

use jsonwire::{JsonReader, JsonWriter, Map, Value, from_slice, to_vec};
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

#[quickcheck]
fn u64_round_trips(value: u64) -> bool {
    let mut w = JsonWriter::new();
    w.write_u64(value);
    let bytes = w.into_vec();
    let mut r = JsonReader::new(&bytes);
    r.read_u64().unwrap() == value && r.consumed() == bytes.len()
}

#[quickcheck]
fn i64_round_trips(value: i64) -> bool {
    let mut w = JsonWriter::new();
    w.write_i64(value);
    let bytes = w.into_vec();
    let mut r = JsonReader::new(&bytes);
    r.read_i64().unwrap() == value && r.consumed() == bytes.len()
}

#[quickcheck]
fn i32_round_trips(value: i32) -> bool {
    let mut w = JsonWriter::new();
    w.write_i32(value);
    let bytes = w.into_vec();
    let mut r = JsonReader::new(&bytes);
    r.read_i32().unwrap() == value
}

#[quickcheck]
fn narrow_widths_round_trip(a: u8, b: u16, c: i8, d: i16, e: u32) -> bool {
    let mut w = JsonWriter::new();
    w.begin_array();
    w.write_u8(a);
    w.value_separator();
    w.write_u16(b);
    w.value_separator();
    w.write_i8(c);
    w.value_separator();
    w.write_i16(d);
    w.value_separator();
    w.write_u32(e);
    w.end_array();
    let bytes = w.into_vec();

    let mut r = JsonReader::new(&bytes);
    r.read_begin_array().unwrap();
    let mut count = 0;
    assert!(!r.end_of_array(&mut count).unwrap());
    let a2 = r.read_u8().unwrap();
    assert!(!r.end_of_array(&mut count).unwrap());
    let b2 = r.read_u16().unwrap();
    assert!(!r.end_of_array(&mut count).unwrap());
    let c2 = r.read_i8().unwrap();
    assert!(!r.end_of_array(&mut count).unwrap());
    let d2 = r.read_i16().unwrap();
    assert!(!r.end_of_array(&mut count).unwrap());
    let e2 = r.read_u32().unwrap();
    assert!(r.end_of_array(&mut count).unwrap());
    (a2, b2, c2, d2, e2) == (a, b, c, d, e) && r.consumed() == bytes.len()
}

#[quickcheck]
fn f64_round_trips_bit_exact(value: f64) -> quickcheck::TestResult {
    if !value.is_finite() {
        return quickcheck::TestResult::discard();
    }
    let mut w = JsonWriter::new();
    w.write_f64(value);
    let bytes = w.into_vec();
    let mut r = JsonReader::new(&bytes);
    let back = r.read_f64().unwrap();
    quickcheck::TestResult::from_bool(back.to_bits() == value.to_bits())
}

#[quickcheck]
fn f32_round_trips_bit_exact(value: f32) -> quickcheck::TestResult {
    if !value.is_finite() {
        return quickcheck::TestResult::discard();
    }
    let mut w = JsonWriter::new();
    w.write_f32(value);
    let bytes = w.into_vec();
    let mut r = JsonReader::new(&bytes);
    let back = r.read_f32().unwrap();
    quickcheck::TestResult::from_bool(back.to_bits() == value.to_bits())
}

#[quickcheck]
fn strings_round_trip(value: String) -> bool {
    let mut w = JsonWriter::new();
    w.write_str(&value);
    let bytes = w.into_vec();
    let mut r = JsonReader::new(&bytes);
    r.read_string().unwrap() == value && r.consumed() == bytes.len()
}

#[test]
fn awkward_strings_round_trip() {
    for text in [
        "",
        "plain",
        "every\u{0}control\u{1}byte\u{1f}",
        "\"\\\u{8}\u{c}\n\r\t",
        "surrogate pair: 😀🎈",
        "mixed åβ\u{2028}γ",
    ] {
        let mut w = JsonWriter::new();
        w.write_str(text);
        let bytes = w.into_vec();
        let mut r = JsonReader::new(&bytes);
        assert_eq!(r.read_string().unwrap(), text);
    }
}

/// Recursive value generator with a bounded shape so property runs stay
/// fast.
#[derive(Clone, Debug)]
struct ArbValue(Value);

fn arbitrary_value(g: &mut Gen, budget: usize) -> Value {
    let variants: u8 = if budget == 0 { 4 } else { 6 };
    match u8::arbitrary(g) % variants {
        0 => Value::Null,
        1 => Value::Boolean(bool::arbitrary(g)),
        2 => {
            let mut number = f64::arbitrary(g);
            if !number.is_finite() {
                number = 0.5;
            }
            Value::Number(number)
        }
        3 => Value::String(String::arbitrary(g)),
        4 => {
            let len = usize::arbitrary(g) % 4;
            Value::Array((0..len).map(|_| arbitrary_value(g, budget - 1)).collect())
        }
        _ => {
            let len = usize::arbitrary(g) % 4;
            let mut map = Map::new();
            for _ in 0..len {
                map.insert(String::arbitrary(g), arbitrary_value(g, budget - 1));
            }
            Value::Object(map)
        }
    }
}

impl Arbitrary for ArbValue {
    fn arbitrary(g: &mut Gen) -> Self {
        ArbValue(arbitrary_value(g, 3))
    }
}

#[quickcheck]
fn values_round_trip(doc: ArbValue) -> bool {
    let bytes = to_vec(&doc.0);
    from_slice(&bytes).unwrap() == doc.0
}

fn from_oracle(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap()),
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => {
            Value::Array(items.into_iter().map(from_oracle).collect())
        }
        serde_json::Value::Object(map) => {
            Value::Object(map.into_iter().map(|(k, v)| (k, from_oracle(v))).collect())
        }
    }
}

fn to_oracle(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => serde_json::Value::Number(serde_json::Number::from_f64(*n).unwrap()),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(to_oracle).collect()),
        Value::Object(map) => serde_json::Value::Object(
            map.iter().map(|(k, v)| (k.clone(), to_oracle(v))).collect(),
        ),
    }
}

#[quickcheck]
fn oracle_parses_our_output(doc: ArbValue) -> bool {
    let bytes = to_vec(&doc.0);
    let oracle: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    from_oracle(oracle) == doc.0
}

#[quickcheck]
fn we_parse_oracle_output(doc: ArbValue) -> bool {
    let bytes = serde_json::to_vec(&to_oracle(&doc.0)).unwrap();
    from_slice(&bytes).unwrap() == doc.0
}
