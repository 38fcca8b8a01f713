#![no_main]

use i0_consensus::{check_proof_of_work, decode_compact, Hash256, Network};
use libfuzzer_sys::fuzz_target;

// 32 bytes of hash + 4 bytes of bits.
fuzz_target!(|data: &[u8]| {
    if data.len() < 36 {
        return;
    }
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&data[..32]);
    let hash = Hash256(hash).to_u256();
    let bits = u32::from_le_bytes([data[32], data[33], data[34], data[35]]);

    for network in Network::ALL {
        let params = network.params();
        if check_proof_of_work(&hash, bits, params).is_ok() {
            let target = decode_compact(bits);
            assert!(target.is_usable());
            assert!(target.value <= params.pow_limit);
            assert!(hash <= target.value);
        }
    }
});
