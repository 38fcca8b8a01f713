// Consensus-critical. Changes require tests.
//! Proof-of-work checks.

use log::debug;

use crate::block::{BlockHeader, BlockVersion};
use crate::compact::decode_compact;
use crate::error::ValidationError;
use crate::params::ChainParams;
use crate::uint256::U256;

/// Checks that `bits` is a usable target no easier than the pow limit and
/// that `hash` (read as a number) does not exceed it. Pure; no chain access.
pub fn check_proof_of_work(
    hash: &U256,
    bits: u32,
    params: &ChainParams,
) -> Result<(), ValidationError> {
    let target = decode_compact(bits);
    if !target.is_usable() || target.value > params.pow_limit {
        debug!("check_proof_of_work: bits {bits:08x} below minimum work");
        return Err(ValidationError::TargetOutOfRange { bits });
    }
    if *hash > target.value {
        debug!("check_proof_of_work: hash doesn't match bits {bits:08x}");
        return Err(ValidationError::InsufficientWork { bits });
    }
    Ok(())
}

/// On strict networks every non-legacy header must name this chain's
/// merge-mining id, so work done for another chain is not replayed here.
pub fn check_chain_id(version: BlockVersion, params: &ChainParams) -> Result<(), ValidationError> {
    if version.is_legacy() || !params.auxpow.strict_chain_id {
        return Ok(());
    }
    let got = version.chain_id();
    if got != params.auxpow.chain_id {
        return Err(ValidationError::ChainIdMismatch {
            expected: params.auxpow.chain_id,
            got,
        });
    }
    Ok(())
}

/// Chain id plus the header's own hash against its bits. Merge-mined headers
/// are proven by their parent block, which the auxpow validator checks.
pub fn check_header(header: &BlockHeader, params: &ChainParams) -> Result<(), ValidationError> {
    check_chain_id(header.version, params)?;
    check_proof_of_work(&header.block_hash().to_u256(), header.bits, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{MAIN_PARAMS, TEST_PARAMS};

    #[test]
    fn accepts_hash_at_or_below_target() {
        let target = decode_compact(0x1c00_ffff).value;
        assert_eq!(check_proof_of_work(&target, 0x1c00_ffff, &MAIN_PARAMS), Ok(()));
        assert_eq!(check_proof_of_work(&U256::ZERO, 0x1d00_ffff, &MAIN_PARAMS), Ok(()));
        assert_eq!(
            check_proof_of_work(&(target + U256::ONE), 0x1c00_ffff, &MAIN_PARAMS),
            Err(ValidationError::InsufficientWork { bits: 0x1c00_ffff })
        );
    }

    #[test]
    fn rejects_unusable_or_too_easy_targets() {
        for bits in [
            0u32,        // zero
            0x0100_0000, // zero mantissa
            0x0492_3456, // negative
            0x1d80_ffff, // negative
            0xff12_3456, // overflow
            0x2200_0100, // overflow
            0x1d01_0000, // above pow limit
            0x207f_ffff, // above pow limit
        ] {
            assert_eq!(
                check_proof_of_work(&U256::ZERO, bits, &MAIN_PARAMS),
                Err(ValidationError::TargetOutOfRange { bits }),
                "bits {bits:08x}"
            );
        }
    }

    #[test]
    fn chain_id_only_enforced_on_strict_networks() {
        let foreign = BlockVersion(0x0001_0102);
        let own = BlockVersion(0x0002_0102);
        assert_eq!(
            check_chain_id(foreign, &MAIN_PARAMS),
            Err(ValidationError::ChainIdMismatch { expected: 2, got: 1 })
        );
        assert_eq!(check_chain_id(own, &MAIN_PARAMS), Ok(()));
        assert_eq!(check_chain_id(BlockVersion(1), &MAIN_PARAMS), Ok(()));
        assert_eq!(check_chain_id(foreign, &TEST_PARAMS), Ok(()));
    }
}
