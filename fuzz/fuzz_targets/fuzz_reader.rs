#![no_main]
use jsonwire::{from_slice, to_vec};
use libfuzzer_sys::fuzz_target;

// Arbitrary bytes must never panic the reader. When they happen to be valid
// JSON, the decoded value must survive a re-encode/re-decode cycle, and the
// re-encoded bytes must be JSON that serde_json accepts.
fuzz_target!(|data: &[u8]| {
    let Ok(value) = from_slice(data) else { return };

    let bytes = to_vec(&value);
    let again = from_slice(&bytes).expect("re-encoded output must parse");
    assert_eq!(again, value);

    serde_json::from_slice::<serde_json::Value>(&bytes).expect("oracle must accept our output");
});
