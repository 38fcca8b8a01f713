//! Header arena and the ancestor-walk capability used by retargeting.
//!
//! Blocks are addressed by `BlockId` handles into an append-only arena, so a
//! walk can only ever hit a missing record (reported as an error), never a
//! dangling reference.

use std::collections::HashMap;

use crate::block::BlockHeader;
use crate::error::{IndexError, InternalError};
use crate::hash::Hash256;
use crate::uint256::U256;
use crate::work::{block_proof, cumulative_work};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(usize);

impl BlockId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What the consensus code may read about a connected block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockRecord {
    pub hash: Hash256,
    pub prev: Option<BlockId>,
    pub height: u32,
    pub time: u32,
    pub bits: u32,
    pub chain_work: U256,
    /// Transactions from genesis up to and including this block.
    pub chain_tx: u64,
}

/// Read-only access to connected blocks and their predecessors.
pub trait ChainView {
    fn record(&self, id: BlockId) -> Option<&BlockRecord>;

    fn prev(&self, id: BlockId) -> Option<BlockId> {
        self.record(id).and_then(|r| r.prev)
    }
}

/// Hash to handle lookup over the locally known index.
pub trait BlockLookup {
    fn find(&self, hash: &Hash256) -> Option<BlockId>;
}

pub(crate) fn record_of<V: ChainView + ?Sized>(
    chain: &V,
    id: BlockId,
) -> Result<&BlockRecord, InternalError> {
    chain.record(id).ok_or(InternalError::UnknownBlock(id))
}

/// Follows `steps` predecessor links from `from`. Running out of ancestors is
/// an invariant violation: callers only walk distances the height guarantees.
pub fn walk_back<V: ChainView + ?Sized>(
    chain: &V,
    from: BlockId,
    steps: u32,
) -> Result<BlockId, InternalError> {
    let height = record_of(chain, from)?.height;
    let mut cur = from;
    for _ in 0..steps {
        cur = chain
            .prev(cur)
            .ok_or(InternalError::MissingAncestor { height, steps })?;
    }
    Ok(cur)
}

#[derive(Clone, Debug, Default)]
pub struct HeaderChain {
    records: Vec<BlockRecord>,
    by_hash: HashMap<Hash256, BlockId>,
    best: Option<BlockId>,
}

impl HeaderChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: BlockId) -> Option<&BlockRecord> {
        self.records.get(id.0)
    }

    /// Block with the most cumulative work; the first one seen wins ties.
    pub fn tip(&self) -> Option<BlockId> {
        self.best
    }

    pub fn insert_genesis(
        &mut self,
        hash: Hash256,
        time: u32,
        bits: u32,
        tx_count: u64,
    ) -> Result<BlockId, IndexError> {
        self.insert_root(hash, 0, time, bits, block_proof(bits), tx_count)
    }

    /// Adds a block without a known parent, e.g. the oldest block of a
    /// pruned window handed over by the block store. Its `chain_work` and
    /// `chain_tx` are taken as given.
    pub fn insert_root(
        &mut self,
        hash: Hash256,
        height: u32,
        time: u32,
        bits: u32,
        chain_work: U256,
        chain_tx: u64,
    ) -> Result<BlockId, IndexError> {
        self.push(BlockRecord {
            hash,
            prev: None,
            height,
            time,
            bits,
            chain_work,
            chain_tx,
        })
    }

    pub fn connect(
        &mut self,
        parent: BlockId,
        hash: Hash256,
        time: u32,
        bits: u32,
        tx_count: u64,
    ) -> Result<BlockId, IndexError> {
        let p = self.get(parent).ok_or(IndexError::UnknownParent(parent))?;
        let height = p.height.checked_add(1).ok_or(IndexError::HeightOverflow)?;
        let record = BlockRecord {
            hash,
            prev: Some(parent),
            height,
            time,
            bits,
            chain_work: cumulative_work(&p.chain_work, &block_proof(bits)),
            chain_tx: p.chain_tx.saturating_add(tx_count),
        };
        self.push(record)
    }

    pub fn connect_header(
        &mut self,
        parent: BlockId,
        header: &BlockHeader,
        tx_count: u64,
    ) -> Result<BlockId, IndexError> {
        self.connect(parent, header.block_hash(), header.time, header.bits, tx_count)
    }

    /// The block at `height` on the branch ending at `id`.
    pub fn ancestor(&self, id: BlockId, height: u32) -> Option<BlockId> {
        let mut cur = id;
        loop {
            let r = self.get(cur)?;
            if r.height == height {
                return Some(cur);
            }
            if r.height < height {
                return None;
            }
            cur = r.prev?;
        }
    }

    fn push(&mut self, record: BlockRecord) -> Result<BlockId, IndexError> {
        if self.by_hash.contains_key(&record.hash) {
            return Err(IndexError::DuplicateHash(record.hash));
        }
        let id = BlockId(self.records.len());
        let better = match self.best.and_then(|b| self.get(b)) {
            Some(best) => record.chain_work > best.chain_work,
            None => true,
        };
        self.by_hash.insert(record.hash, id);
        self.records.push(record);
        if better {
            self.best = Some(id);
        }
        Ok(id)
    }
}

impl ChainView for HeaderChain {
    fn record(&self, id: BlockId) -> Option<&BlockRecord> {
        self.get(id)
    }
}

impl BlockLookup for HeaderChain {
    fn find(&self, hash: &Hash256) -> Option<BlockId> {
        self.by_hash.get(hash).copied()
    }
}
