// Consensus-critical. Changes require tests.
//! Chain work accounting (heaviest-chain selection and time estimates).

use crate::chain::BlockRecord;
use crate::compact::decode_compact;
use crate::params::ChainParams;
use crate::uint256::U256;

/// Expected number of hashes needed for a block at `bits`:
/// `2^256 / (target + 1)`, computed as `!target / (target + 1) + 1` so that
/// 2^256 never has to be represented. Unusable targets carry no work.
pub fn block_proof(bits: u32) -> U256 {
    let target = decode_compact(bits);
    if !target.is_usable() {
        return U256::ZERO;
    }
    match (!target.value).checked_div(target.value + U256::ONE) {
        Some(q) => q + U256::ONE,
        None => U256::ZERO,
    }
}

pub fn cumulative_work(parent: &U256, own: &U256) -> U256 {
    *parent + *own
}

/// Seconds of block production at the tip's difficulty that account for the
/// work between `from` and `to`. Negative when `to` has less work. Saturates
/// at `i64::MAX` in magnitude. An estimate only, never a consensus input.
pub fn equivalent_time(
    to: &BlockRecord,
    from: &BlockRecord,
    tip: &BlockRecord,
    params: &ChainParams,
) -> i64 {
    let (delta, sign) = if to.chain_work > from.chain_work {
        (to.chain_work - from.chain_work, 1i64)
    } else {
        (from.chain_work - to.chain_work, -1i64)
    };
    let scaled = delta.wrapping_mul_u64(u64::from(params.target_spacing));
    let r = scaled.checked_div(block_proof(tip.bits)).unwrap_or(U256::MAX);
    if r.bits() > 63 {
        return sign * i64::MAX;
    }
    sign * i64::try_from(r.low_u64()).unwrap_or(i64::MAX)
}

/// Difficulty relative to the network's easiest target, for display.
pub fn difficulty(bits: u32, params: &ChainParams) -> f64 {
    let target = decode_compact(bits);
    if !target.is_usable() {
        return 0.0;
    }
    let limit = decode_compact(params.pow_limit_bits()).value;
    limit.to_f64() / target.value.to_f64()
}
