//! Genesis block reconstruction.
//!
//! The genesis coinbase is fixed data; rebuilding it here lets the genesis
//! hash and merkle root be checked instead of trusted.

use crate::block::{BlockHeader, BlockVersion};
use crate::encode::{push_data, script_num_bytes, tx_bytes, Transaction, TxIn, TxOut, OP_CHECKSIG};
use crate::hash::Hash256;
use crate::merkle::merkle_root_txids;
use crate::params::ChainParams;

pub const GENESIS_MESSAGE: &[u8] =
    b"15/Ago/2011 - Diario El Dia - Obama cae al 39% en la aprobaci\xf3n ciudadana";

pub const GENESIS_OUTPUT_PUBKEY: [u8; 65] = [
    0x04, 0x67, 0x8a, 0xfd, 0xb0, 0xfe, 0x55, 0x48,
    0x27, 0x19, 0x67, 0xf1, 0xa6, 0x71, 0x30, 0xb7,
    0x10, 0x5c, 0xd6, 0xa8, 0x28, 0xe0, 0x39, 0x09,
    0xa6, 0x79, 0x62, 0xe0, 0xea, 0x1f, 0x61, 0xde,
    0xb6, 0x49, 0xf6, 0xbc, 0x3f, 0x4c, 0xef, 0x38,
    0xc4, 0xf3, 0x55, 0x04, 0xe5, 0x1e, 0xc1, 0x12,
    0xde, 0x5c, 0x38, 0x4d, 0xf7, 0xba, 0x0b, 0x8d,
    0x57, 0x8a, 0x4c, 0x70, 0x2b, 0x6b, 0xf1, 0x1d,
    0x5f,
];

/// The number pushed first in the coinbase script (it equals the bits of
/// the original difficulty-1 target).
const COINBASE_SCRIPT_NUMBER: i64 = 486_604_799;

pub fn genesis_coinbase(reward: i64) -> Transaction {
    let mut script_sig = Vec::new();
    push_data(&mut script_sig, &script_num_bytes(COINBASE_SCRIPT_NUMBER));
    push_data(&mut script_sig, &script_num_bytes(4));
    push_data(&mut script_sig, GENESIS_MESSAGE);

    let mut script_pubkey = Vec::new();
    push_data(&mut script_pubkey, &GENESIS_OUTPUT_PUBKEY);
    script_pubkey.push(OP_CHECKSIG);

    Transaction {
        version: 1,
        inputs: vec![TxIn {
            prev_txid: [0u8; 32],
            prev_vout: u32::MAX,
            script_sig,
            sequence: u32::MAX,
        }],
        outputs: vec![TxOut {
            value: reward,
            script_pubkey,
        }],
        locktime: 0,
    }
}

pub fn genesis_header(params: &ChainParams) -> BlockHeader {
    let g = &params.genesis;
    let txid = Hash256::hash(&tx_bytes(&genesis_coinbase(g.reward)));
    BlockHeader {
        version: BlockVersion(g.version),
        prev_block_hash: Hash256::ZERO,
        merkle_root: merkle_root_txids(&[txid]).unwrap_or(txid),
        time: g.time,
        bits: g.bits,
        nonce: g.nonce,
    }
}

pub fn genesis_hash(params: &ChainParams) -> Hash256 {
    genesis_header(params).block_hash()
}
