//! Per-network consensus parameters.
//!
//! Networks differ only in data, so there is one `ChainParams` table per
//! network and every algorithm takes the table by reference.

use core::fmt;
use core::str::FromStr;

use crate::compact::encode_compact;
use crate::error::ConfigError;
use crate::uint256::U256;

pub const COIN: i64 = 100_000_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Network {
    Main,
    Test,
    Regtest,
}

impl Network {
    pub const ALL: [Network; 3] = [Network::Main, Network::Test, Network::Regtest];

    pub fn as_str(self) -> &'static str {
        match self {
            Network::Main => "main",
            Network::Test => "test",
            Network::Regtest => "regtest",
        }
    }

    pub fn params(self) -> &'static ChainParams {
        match self {
            Network::Main => &MAIN_PARAMS,
            Network::Test => &TEST_PARAMS,
            Network::Regtest => &REGTEST_PARAMS,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" => Ok(Network::Main),
            "test" => Ok(Network::Test),
            "regtest" => Ok(Network::Regtest),
            other => Err(ConfigError::UnknownNetwork(other.to_string())),
        }
    }
}

/// Merge-mining settings. Only `chain_id` and `strict_chain_id` are read by
/// this crate; the rest is carried for the auxpow validator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuxpowParams {
    pub chain_id: i32,
    pub strict_chain_id: bool,
    pub start_height: u32,
    /// Headers below this height may not carry an auxpow at all.
    pub legacy_headers_before: Option<u32>,
}

/// Version-bit upgrade thresholds, consumed outside this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MajorityParams {
    pub enforce_block_upgrade: u32,
    pub reject_block_outdated: u32,
    pub window: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenesisParams {
    pub time: u32,
    pub nonce: u32,
    pub bits: u32,
    pub version: i32,
    pub reward: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChainParams {
    pub network: Network,
    /// Easiest permissible target. Every accepted target is at most this.
    pub pow_limit: U256,
    pub target_timespan: u32,
    pub target_spacing: u32,
    pub allow_min_difficulty_blocks: bool,
    pub no_retargeting: bool,
    /// Heights below this use the weekly legacy retarget; the height itself
    /// gets the hard-coded difficulty reset. `None` on networks that never
    /// had a legacy era.
    pub legacy_blocks_before: Option<u32>,
    pub auxpow: AuxpowParams,
    pub subsidy_halving_interval: u32,
    pub majority: MajorityParams,
    pub genesis: GenesisParams,
}

impl ChainParams {
    pub fn difficulty_adjustment_interval(&self) -> u32 {
        self.target_timespan / self.target_spacing
    }

    pub fn pow_limit_bits(&self) -> u32 {
        encode_compact(&self.pow_limit)
    }
}

const LIMIT_32_ZERO_BITS: U256 = U256::from_be_limbs([0xffff_ffff, u64::MAX, u64::MAX, u64::MAX]);
const LIMIT_1_ZERO_BIT: U256 =
    U256::from_be_limbs([0x7fff_ffff_ffff_ffff, u64::MAX, u64::MAX, u64::MAX]);

pub static MAIN_PARAMS: ChainParams = ChainParams {
    network: Network::Main,
    pow_limit: LIMIT_32_ZERO_BITS,
    target_timespan: 3 * 60 * 60,
    target_spacing: 90,
    allow_min_difficulty_blocks: false,
    no_retargeting: false,
    legacy_blocks_before: Some(14_640),
    auxpow: AuxpowParams {
        chain_id: 0x0002,
        strict_chain_id: true,
        start_height: 160_000,
        legacy_headers_before: Some(160_000),
    },
    subsidy_halving_interval: 218_750,
    majority: MajorityParams {
        enforce_block_upgrade: 750,
        reject_block_outdated: 950,
        window: 1000,
    },
    genesis: GenesisParams {
        time: 1_313_457_620,
        nonce: 2_831_549_010,
        bits: 0x1d00_ffff,
        version: 1,
        reward: 48 * COIN,
    },
};

pub static TEST_PARAMS: ChainParams = ChainParams {
    network: Network::Test,
    pow_limit: LIMIT_32_ZERO_BITS,
    target_timespan: 3 * 60 * 60,
    target_spacing: 90,
    allow_min_difficulty_blocks: true,
    no_retargeting: false,
    legacy_blocks_before: None,
    auxpow: AuxpowParams {
        chain_id: 0x0002,
        strict_chain_id: false,
        start_height: 0,
        legacy_headers_before: None,
    },
    subsidy_halving_interval: 218_750,
    majority: MajorityParams {
        enforce_block_upgrade: 51,
        reject_block_outdated: 75,
        window: 100,
    },
    genesis: GenesisParams {
        time: 1_313_519_902,
        nonce: 350_784_103,
        bits: 0x1d00_ffff,
        version: 1,
        reward: 48 * COIN,
    },
};

pub static REGTEST_PARAMS: ChainParams = ChainParams {
    network: Network::Regtest,
    pow_limit: LIMIT_1_ZERO_BIT,
    target_timespan: 3 * 60 * 60,
    target_spacing: 90,
    allow_min_difficulty_blocks: true,
    no_retargeting: true,
    legacy_blocks_before: None,
    auxpow: AuxpowParams {
        chain_id: 0x0002,
        strict_chain_id: true,
        start_height: 0,
        legacy_headers_before: Some(0),
    },
    subsidy_halving_interval: 150,
    majority: MajorityParams {
        enforce_block_upgrade: 750,
        reject_block_outdated: 950,
        window: 1000,
    },
    genesis: GenesisParams {
        time: 1_296_688_602,
        nonce: 2,
        bits: 0x207f_ffff,
        version: 1,
        reward: 48 * COIN,
    },
};
