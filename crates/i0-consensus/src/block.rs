use crate::error::ValidationError;
use crate::hash::Hash256;

pub const BLOCK_HEADER_BYTES: usize = 80;

/// Set on headers that carry a merge-mining proof.
pub const VERSION_AUXPOW: i32 = 1 << 8;
/// The merge-mining chain id lives in the bits above this.
pub const VERSION_CHAIN_START: i32 = 1 << 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockVersion(pub i32);

impl BlockVersion {
    pub fn base_version(self) -> i32 {
        self.0 % VERSION_AUXPOW
    }

    pub fn chain_id(self) -> i32 {
        self.0 / VERSION_CHAIN_START
    }

    pub fn is_auxpow(self) -> bool {
        self.0 & VERSION_AUXPOW != 0
    }

    /// Versions mined before merge-mining existed carry no chain id.
    pub fn is_legacy(self) -> bool {
        self.0 == 1 || (self.0 == 2 && self.chain_id() == 0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockHeader {
    pub version: BlockVersion,
    pub prev_block_hash: Hash256,
    pub merkle_root: Hash256,
    pub time: u32,
    pub bits: u32,
    pub nonce: u32,
}

impl BlockHeader {
    pub fn to_bytes(&self) -> [u8; BLOCK_HEADER_BYTES] {
        let mut out = [0u8; BLOCK_HEADER_BYTES];
        out[0..4].copy_from_slice(&self.version.0.to_le_bytes());
        out[4..36].copy_from_slice(self.prev_block_hash.as_bytes());
        out[36..68].copy_from_slice(self.merkle_root.as_bytes());
        out[68..72].copy_from_slice(&self.time.to_le_bytes());
        out[72..76].copy_from_slice(&self.bits.to_le_bytes());
        out[76..80].copy_from_slice(&self.nonce.to_le_bytes());
        out
    }

    pub fn block_hash(&self) -> Hash256 {
        Hash256::hash(&self.to_bytes())
    }
}

fn le_u32(b: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
}

fn hash_at(b: &[u8], at: usize) -> Hash256 {
    let mut h = [0u8; 32];
    h.copy_from_slice(&b[at..at + 32]);
    Hash256(h)
}

pub fn parse_block_header_bytes(b: &[u8]) -> Result<BlockHeader, ValidationError> {
    if b.len() != BLOCK_HEADER_BYTES {
        return Err(ValidationError::MalformedHeader("block header length mismatch"));
    }

    Ok(BlockHeader {
        version: BlockVersion(le_u32(b, 0) as i32),
        prev_block_hash: hash_at(b, 4),
        merkle_root: hash_at(b, 36),
        time: le_u32(b, 68),
        bits: le_u32(b, 72),
        nonce: le_u32(b, 76),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_bytes_round_trip() {
        let header = BlockHeader {
            version: BlockVersion(0x0002_0102),
            prev_block_hash: Hash256([7u8; 32]),
            merkle_root: Hash256([9u8; 32]),
            time: 1_400_000_000,
            bits: 0x1b0a_bcde,
            nonce: 42,
        };
        let bytes = header.to_bytes();
        assert_eq!(&bytes[0..4], &[0x02, 0x01, 0x02, 0x00]);
        assert_eq!(parse_block_header_bytes(&bytes), Ok(header));
    }

    #[test]
    fn parse_rejects_wrong_length() {
        let err = parse_block_header_bytes(&[0u8; 79]).unwrap_err();
        assert_eq!(err, ValidationError::MalformedHeader("block header length mismatch"));
        assert!(parse_block_header_bytes(&[0u8; 81]).is_err());
    }

    #[test]
    fn version_fields() {
        let v = BlockVersion(0x0002_0102);
        assert_eq!(v.chain_id(), 2);
        assert!(v.is_auxpow());
        assert_eq!(v.base_version(), 2);
        assert!(!v.is_legacy());
        assert!(BlockVersion(1).is_legacy());
        assert!(BlockVersion(2).is_legacy());
        assert!(!BlockVersion(1).is_auxpow());
        assert_eq!(BlockVersion(1).chain_id(), 0);
    }
}
