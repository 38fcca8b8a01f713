// Consensus-critical. Every constant here is fixed by blocks already on chain.
//! Difficulty retargeting.
//!
//! Two eras exist on the main network:
//!
//! - heights below `legacy_blocks_before`: weekly retarget every 2016 blocks
//!   with the usual 4x clamp in both directions;
//! - from `legacy_blocks_before` on: retarget every `interval` blocks with
//!   tiered dampening on the fast side and a flat 4x clamp on the slow side.
//!
//! The boundary height itself is pinned to `DIFFICULTY_RESET_BITS`.

use log::debug;

use crate::chain::{record_of, walk_back, BlockId, ChainView};
use crate::compact::{decode_compact, encode_compact};
use crate::error::InternalError;
use crate::params::ChainParams;
use crate::uint256::U256;

pub const LEGACY_TARGET_TIMESPAN: u32 = 7 * 24 * 60 * 60;
pub const LEGACY_TARGET_SPACING: u32 = 5 * 60;
pub const LEGACY_INTERVAL: u32 = LEGACY_TARGET_TIMESPAN / LEGACY_TARGET_SPACING;

/// Bits assigned to the first block of the modern era (difficulty 256).
pub const DIFFICULTY_RESET_BITS: u32 = 0x1c00_ffff;

/// From this height on a retarget looks back a full interval.
pub const FULL_LOOKBACK_HEIGHT: u32 = 150_000;

/// Compact target required for the block after `last`.
///
/// `last` is `None` only when the candidate is the genesis block.
/// `candidate_time` is the candidate header's timestamp; only the
/// min-difficulty rule of permissive networks reads it.
pub fn next_work_required<V: ChainView + ?Sized>(
    chain: &V,
    last: Option<BlockId>,
    candidate_time: u32,
    params: &ChainParams,
) -> Result<u32, InternalError> {
    let pow_limit_bits = params.pow_limit_bits();
    let Some(last_id) = last else {
        return Ok(pow_limit_bits);
    };
    let last = record_of(chain, last_id)?;
    if params.no_retargeting {
        return Ok(last.bits);
    }

    let height = last.height.saturating_add(1);
    if let Some(switch) = params.legacy_blocks_before {
        if height < switch {
            return legacy_next_work(chain, last_id, params);
        }
        if height == switch {
            debug!("height {height}: difficulty reset to {DIFFICULTY_RESET_BITS:08x}");
            return Ok(DIFFICULTY_RESET_BITS);
        }
    }

    let interval = params.difficulty_adjustment_interval();
    if height % interval != 0 {
        if !params.allow_min_difficulty_blocks {
            return Ok(last.bits);
        }
        let slack = 2 * i64::from(params.target_spacing);
        if i64::from(candidate_time) > i64::from(last.time) + slack {
            return Ok(pow_limit_bits);
        }
        return last_non_min_difficulty_bits(chain, last_id, interval, pow_limit_bits);
    }

    // The first retarget after genesis looks back one block less; later ones
    // (from FULL_LOOKBACK_HEIGHT) span the whole interval so the window
    // boundaries overlap and a withheld block cannot skew the timespan.
    let lookback = if height >= FULL_LOOKBACK_HEIGHT && height != interval {
        interval
    } else {
        interval - 1
    };
    let first = walk_back(chain, last_id, lookback)?;
    let first_time = record_of(chain, first)?.time;
    let timespan = i64::from(params.target_timespan);
    let actual = i64::from(last.time) - i64::from(first_time);
    let adjusted = dampen_timespan(actual, timespan);
    debug!("retarget at {height}: timespan {timespan}, actual {actual}, adjusted {adjusted}");
    scale_target(last.bits, adjusted, timespan, &params.pow_limit)
}

fn legacy_next_work<V: ChainView + ?Sized>(
    chain: &V,
    last_id: BlockId,
    params: &ChainParams,
) -> Result<u32, InternalError> {
    let last = record_of(chain, last_id)?;
    let height = last.height.saturating_add(1);
    if height % LEGACY_INTERVAL != 0 {
        return Ok(last.bits);
    }

    let first = walk_back(chain, last_id, LEGACY_INTERVAL - 1)?;
    let first_time = record_of(chain, first)?.time;
    let timespan = i64::from(LEGACY_TARGET_TIMESPAN);
    let actual = i64::from(last.time) - i64::from(first_time);
    let adjusted = actual.clamp(timespan / 4, timespan * 4);
    debug!("legacy retarget at {height}: timespan {timespan}, actual {actual}, adjusted {adjusted}");
    scale_target(last.bits, adjusted, timespan, &params.pow_limit)
}

/// Fast periods count as only 2%, 6% or 10% faster than target; slow periods
/// are capped at four times the target.
pub fn dampen_timespan(actual: i64, timespan: i64) -> i64 {
    if actual < timespan {
        let unit = timespan / 50;
        if actual < unit * 16 {
            unit * 45
        } else if actual < unit * 32 {
            unit * 47
        } else {
            unit * 49
        }
    } else if actual > timespan * 4 {
        timespan * 4
    } else {
        actual
    }
}

fn scale_target(
    bits: u32,
    actual: i64,
    timespan: i64,
    pow_limit: &U256,
) -> Result<u32, InternalError> {
    let old = decode_compact(bits).value;
    let mut new = old
        .wrapping_mul_u64(actual.unsigned_abs())
        .checked_div_u64(timespan.unsigned_abs())
        .ok_or(InternalError::ZeroTimespan)?;
    if new > *pow_limit {
        new = *pow_limit;
    }
    let after = encode_compact(&new);
    debug!("retarget before {bits:08x} after {after:08x}");
    Ok(after)
}

/// On permissive networks a block may fall back to the easiest target; the
/// next regular block must return to the last real difficulty. Walks back
/// until an interval boundary or a block whose bits are not the pow limit.
fn last_non_min_difficulty_bits<V: ChainView + ?Sized>(
    chain: &V,
    last_id: BlockId,
    interval: u32,
    pow_limit_bits: u32,
) -> Result<u32, InternalError> {
    let mut rec = record_of(chain, last_id)?;
    while let Some(prev) = rec.prev {
        if rec.height % interval == 0 || rec.bits != pow_limit_bits {
            break;
        }
        rec = record_of(chain, prev)?;
    }
    Ok(rec.bits)
}
