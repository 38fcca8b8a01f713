use thiserror::Error;

use crate::chain::BlockId;
use crate::hash::Hash256;
use crate::params::Network;

/// Stable identifiers for validation rejections, suitable for logs and for
/// the CLI's JSON responses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    BlockErrParse,
    BlockErrTargetOutOfRange,
    BlockErrBitsMismatch,
    BlockErrPowInsufficient,
    BlockErrChainIdMismatch,
    BlockErrCheckpointMismatch,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BlockErrParse => "BLOCK_ERR_PARSE",
            ErrorCode::BlockErrTargetOutOfRange => "BLOCK_ERR_TARGET_OUT_OF_RANGE",
            ErrorCode::BlockErrBitsMismatch => "BLOCK_ERR_BITS_MISMATCH",
            ErrorCode::BlockErrPowInsufficient => "BLOCK_ERR_POW_INSUFFICIENT",
            ErrorCode::BlockErrChainIdMismatch => "BLOCK_ERR_CHAIN_ID_MISMATCH",
            ErrorCode::BlockErrCheckpointMismatch => "BLOCK_ERR_CHECKPOINT_MISMATCH",
        }
    }
}

/// Which part of the taxonomy an error belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Startup configuration is unusable; the process must not continue.
    Config,
    /// An untrusted candidate was rejected. Expected and frequent.
    Validation,
    /// A chain-index invariant did not hold. Indicates a defect.
    Internal,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown network: {0:?}")]
    UnknownNetwork(String),
    #[error("network already selected: {0}")]
    AlreadySelected(Network),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("malformed block header: {0}")]
    MalformedHeader(&'static str),
    #[error("target of bits {bits:08x} is negative, zero, overflowing or above the pow limit")]
    TargetOutOfRange { bits: u32 },
    #[error("header bits {got:08x} differ from required {expected:08x}")]
    UnexpectedBits { expected: u32, got: u32 },
    #[error("hash does not meet target of bits {bits:08x}")]
    InsufficientWork { bits: u32 },
    #[error("header chain id {got} does not match {expected}")]
    ChainIdMismatch { expected: i32, got: i32 },
    #[error("block {hash} at height {height} does not match checkpoint")]
    CheckpointMismatch { height: u32, hash: Hash256 },
}

impl ValidationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ValidationError::MalformedHeader(_) => ErrorCode::BlockErrParse,
            ValidationError::TargetOutOfRange { .. } => ErrorCode::BlockErrTargetOutOfRange,
            ValidationError::UnexpectedBits { .. } => ErrorCode::BlockErrBitsMismatch,
            ValidationError::InsufficientWork { .. } => ErrorCode::BlockErrPowInsufficient,
            ValidationError::ChainIdMismatch { .. } => ErrorCode::BlockErrChainIdMismatch,
            ValidationError::CheckpointMismatch { .. } => ErrorCode::BlockErrCheckpointMismatch,
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InternalError {
    #[error("block {0:?} is not in the chain index")]
    UnknownBlock(BlockId),
    #[error("walking back {steps} blocks from height {height} ran past genesis")]
    MissingAncestor { height: u32, steps: u32 },
    #[error("target timespan is zero")]
    ZeroTimespan,
}

/// Misuse of the header arena by the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("parent {0:?} is not in the chain index")]
    UnknownParent(BlockId),
    #[error("block {0} is already indexed")]
    DuplicateHash(Hash256),
    #[error("block height overflows u32")]
    HeightOverflow,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConsensusError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Internal(#[from] InternalError),
    #[error(transparent)]
    Index(#[from] IndexError),
}

impl ConsensusError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ConsensusError::Config(_) => ErrorCategory::Config,
            ConsensusError::Validation(_) => ErrorCategory::Validation,
            ConsensusError::Internal(_) | ConsensusError::Index(_) => ErrorCategory::Internal,
        }
    }
}
