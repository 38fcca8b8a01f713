#![no_main]

use i0_consensus::{decode_compact, next_work_required, Hash256, HeaderChain, Network, U256};
use libfuzzer_sys::fuzz_target;

// Arbitrary windows of timestamps and bits around the retarget boundaries.
// Never panics, and every recomputed target is within the pow limit.
fuzz_target!(|data: &[u8]| {
    if data.len() < 12 {
        return;
    }
    let pick = data[0] as usize % Network::ALL.len();
    let params = Network::ALL[pick].params();
    let starts = [0u32, 1_896, 14_519, 14_520, 149_760, 149_880];
    let start = starts[data[1] as usize % starts.len()];
    let bits = u32::from_le_bytes([data[2], data[3], data[4], data[5]]);
    let base = u32::from_le_bytes([data[6], data[7], data[8], data[9]]);
    let candidate = u32::from_le_bytes([data[10], data[11], 0, 0]);

    let mut chain = HeaderChain::new();
    let Ok(mut last) = chain.insert_root(
        Hash256([0xa5; 32]),
        start,
        base,
        bits,
        U256::ZERO,
        0,
    ) else {
        return;
    };
    let steps = &data[12..];
    for (i, step) in (1..=120u32).zip(steps.iter().cycle()) {
        let mut hash = [0u8; 32];
        hash[..4].copy_from_slice(&i.to_le_bytes());
        let time = base.wrapping_add(i * u32::from(*step));
        match chain.connect(last, Hash256(hash), time, bits, 1) {
            Ok(id) => last = id,
            Err(_) => return,
        }
    }

    let time = chain.get(last).map_or(0, |r| r.time).wrapping_add(candidate);
    if let Ok(next) = next_work_required(&chain, Some(last), time, params) {
        let target = decode_compact(next);
        if next != bits && target.is_usable() {
            assert!(target.value <= params.pow_limit, "{next:08x}");
        }
    }
});
