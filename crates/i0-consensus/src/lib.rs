pub mod block;
pub mod chain;
pub mod checkpoints;
pub mod compact;
pub mod context;
pub mod encode;
pub mod error;
pub mod genesis;
pub mod hash;
mod merkle;
pub mod params;
pub mod pow;
pub mod retarget;
pub mod uint256;
pub mod work;

pub use block::{parse_block_header_bytes, BlockHeader, BlockVersion, BLOCK_HEADER_BYTES};
pub use chain::{walk_back, BlockId, BlockLookup, BlockRecord, ChainView, HeaderChain};
pub use checkpoints::{checkpoint_data, CheckpointData, Checkpoints};
pub use compact::{decode_compact, encode_compact, DecodedTarget};
pub use context::{select, selected, Context, Settings};
pub use error::{
    ConfigError, ConsensusError, ErrorCategory, ErrorCode, IndexError, InternalError,
    ValidationError,
};
pub use genesis::{genesis_hash, genesis_header};
pub use hash::{sha256d, Hash256};
pub use merkle::merkle_root_txids;
pub use params::{ChainParams, Network, MAIN_PARAMS, REGTEST_PARAMS, TEST_PARAMS};
pub use pow::{check_chain_id, check_header, check_proof_of_work};
pub use retarget::next_work_required;
pub use uint256::U256;
pub use work::{block_proof, cumulative_work, difficulty, equivalent_time};
