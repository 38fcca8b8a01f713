#![no_main]

use i0_consensus::{block_proof, decode_compact, U256};
use libfuzzer_sys::fuzz_target;

// A harder target never carries less work, and a usable target always
// carries some.
fuzz_target!(|data: &[u8]| {
    if data.len() < 8 {
        return;
    }
    let a = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let b = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
    let (ta, tb) = (decode_compact(a), decode_compact(b));
    if !ta.is_usable() || !tb.is_usable() {
        return;
    }
    assert!(block_proof(a) > U256::ZERO);
    if ta.value <= tb.value {
        assert!(block_proof(a) >= block_proof(b), "{a:08x} vs {b:08x}");
    }
});
