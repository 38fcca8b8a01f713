#![no_main]

use i0_consensus::{decode_compact, encode_compact};
use libfuzzer_sys::fuzz_target;

// decode(encode(decode(bits))) must be stable: the first decode may drop
// precision, after that the value is exactly representable.
fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let bits = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let first = decode_compact(bits);
    if first.negative || first.overflow {
        return;
    }
    let again = decode_compact(encode_compact(&first.value));
    assert_eq!(again.value, first.value, "bits {bits:08x}");
    assert!(!again.negative && !again.overflow);
});
