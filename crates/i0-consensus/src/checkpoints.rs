//! Hard-coded checkpoints.
//!
//! A checkpoint pins the block hash at a height: any other block there is
//! rejected, which rules out reorganizations below the last checkpoint. The
//! calibration numbers of the last checkpoint also drive the sync progress
//! estimate.

use std::collections::BTreeMap;

use log::warn;

use crate::chain::{BlockId, BlockLookup, BlockRecord};
use crate::error::ValidationError;
use crate::hash::Hash256;
use crate::params::Network;

/// Signature checks are skipped up to the last checkpoint, so a transaction
/// after it is assumed this many times as costly to verify.
pub const SIGCHECK_VERIFICATION_FACTOR: f64 = 5.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Clone, Debug, PartialEq)]
pub struct CheckpointData {
    pub checkpoints: &'static [(u32, Hash256)],
    /// Timestamp of the last checkpoint block.
    pub time_last_checkpoint: i64,
    /// Transactions between genesis and the last checkpoint.
    pub transactions_last_checkpoint: u64,
    /// Estimated transactions per day after the last checkpoint.
    pub transactions_per_day: f64,
}

const fn cp(height: u32, hash: &str) -> (u32, Hash256) {
    (height, Hash256::from_display_hex(hash))
}

pub static MAIN_CHECKPOINTS: CheckpointData = CheckpointData {
    // Heights below the end of the weekly-retarget era must not be pinned;
    // minimum-work estimates assume the current retarget period.
    checkpoints: &[
        cp(36_180, "0000000000635e5e1a8027383f028f4c666f9e20f4f90968ba8bf7ba8431c71f"),
        cp(127_360, "000000000330be69aa359cb69896554c0dfcd9d76b5415d526708ed737bfe0b6"),
        cp(131_130, "0000000000853272e70ba9aafe9f685c186a7ba3aa57d2ddba7c44c6a25efe09"),
        cp(136_800, "0000000000c8c592fce349ed8cf7eba3113f3c243c9e1cbe27fb6166cc4ffa00"),
        cp(142_900, "00000000005eb49db6f29a6aae382b7a8e9a109aba42e536e6d74b95aba4dffd"),
        cp(155_000, "0000000000041a6bc4cd419ed90a6bb1dbf8df8a587d162504dba9ae84a4418c"),
        cp(161_000, "601581f84984f86f5c4d080b2e32bd1c4da4061730fd9bc6b4ce08c65b30c4bd"),
        cp(367_000, "b619876887c0baac0aca8cef5eea23869bce693b8629fb6b62d8b529cd216586"),
        cp(837_000, "421c7a8246ed2759191beff61c46897c0787779cfd174ba53b01f6e5b5ab6ff1"),
        cp(850_000, "23a601419f21ef1a261bf2a4b0fc6582b8907f33d0c0e23e9c3ff9d169752c94"),
    ],
    time_last_checkpoint: 1_375_749_122,
    transactions_last_checkpoint: 936_858,
    transactions_per_day: 1000.0,
};

pub static TEST_CHECKPOINTS: CheckpointData = CheckpointData {
    checkpoints: &[cp(
        546,
        "000000002a936ca763904c3c35fce2f3556c559c0214345d31b1bcebf76acb70",
    )],
    time_last_checkpoint: 1_337_966_069,
    transactions_last_checkpoint: 1488,
    transactions_per_day: 300.0,
};

pub static REGTEST_CHECKPOINTS: CheckpointData = CheckpointData {
    // Inherited entry; it does not match the regtest genesis rebuilt from
    // `REGTEST_PARAMS`. Genesis blocks are never checked against this table.
    checkpoints: &[cp(
        0,
        "0f9188f13cb7b2c71f2a335e3a4fc328bf5beb436012afca590b1a11466e2206",
    )],
    time_last_checkpoint: 0,
    transactions_last_checkpoint: 0,
    transactions_per_day: 0.0,
};

pub fn checkpoint_data(network: Network) -> &'static CheckpointData {
    match network {
        Network::Main => &MAIN_CHECKPOINTS,
        Network::Test => &TEST_CHECKPOINTS,
        Network::Regtest => &REGTEST_CHECKPOINTS,
    }
}

/// Checkpoint table of one network plus the enforcement switch.
#[derive(Clone, Debug)]
pub struct Checkpoints {
    data: &'static CheckpointData,
    by_height: BTreeMap<u32, Hash256>,
    enabled: bool,
}

impl Checkpoints {
    pub fn new(data: &'static CheckpointData, enabled: bool) -> Self {
        Self {
            data,
            by_height: data.checkpoints.iter().copied().collect(),
            enabled,
        }
    }

    pub fn for_network(network: Network, enabled: bool) -> Self {
        Self::new(checkpoint_data(network), enabled)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn data(&self) -> &'static CheckpointData {
        self.data
    }

    /// False only when a checkpoint exists at `height` and `hash` differs.
    pub fn check_block(&self, height: u32, hash: &Hash256) -> bool {
        if !self.enabled {
            return true;
        }
        match self.by_height.get(&height) {
            Some(expected) => expected == hash,
            None => true,
        }
    }

    /// `check_block` as a validation result, logging the rejection.
    pub fn verify_block(&self, height: u32, hash: &Hash256) -> Result<(), ValidationError> {
        if self.check_block(height, hash) {
            return Ok(());
        }
        warn!("block {hash} at height {height} conflicts with checkpoint");
        Err(ValidationError::CheckpointMismatch {
            height,
            hash: *hash,
        })
    }

    /// Height of the last checkpoint: a lower bound for the chain height.
    pub fn total_blocks_estimate(&self) -> u32 {
        if !self.enabled {
            return 0;
        }
        self.by_height.keys().next_back().copied().unwrap_or(0)
    }

    /// Highest checkpoint already present in the caller's block index.
    pub fn last_checkpoint<L: BlockLookup + ?Sized>(&self, index: &L) -> Option<BlockId> {
        if !self.enabled {
            return None;
        }
        self.by_height
            .values()
            .rev()
            .find_map(|hash| index.find(hash))
    }

    /// Fraction in `[0, 1]` of the estimated total verification work that is
    /// done once `block` is connected. Work counts one unit per transaction
    /// up to the last checkpoint and `SIGCHECK_VERIFICATION_FACTOR` units
    /// after it when `sigchecks` is set. Future transaction volume is
    /// projected from `transactions_per_day` and the wall-clock time `now`.
    pub fn guess_verification_progress(
        &self,
        block: Option<&BlockRecord>,
        now: i64,
        sigchecks: bool,
    ) -> f64 {
        let Some(block) = block else {
            return 0.0;
        };
        let factor = if sigchecks {
            SIGCHECK_VERIFICATION_FACTOR
        } else {
            1.0
        };
        let data = self.data;
        let tx_last = data.transactions_last_checkpoint as f64;
        let chain_tx = block.chain_tx as f64;

        let (done, remaining) = if block.chain_tx <= data.transactions_last_checkpoint {
            let cheap_after = tx_last - chain_tx;
            let expensive_after =
                days_between(data.time_last_checkpoint, now) * data.transactions_per_day;
            (chain_tx, cheap_after + expensive_after * factor)
        } else {
            let expensive_before = chain_tx - tx_last;
            let expensive_after =
                days_between(i64::from(block.time), now) * data.transactions_per_day;
            (tx_last + expensive_before * factor, expensive_after * factor)
        };

        let total = done + remaining;
        if total <= 0.0 {
            return 1.0;
        }
        (done / total).clamp(0.0, 1.0)
    }
}

fn days_between(then: i64, now: i64) -> f64 {
    now.saturating_sub(then).max(0) as f64 / SECONDS_PER_DAY
}
