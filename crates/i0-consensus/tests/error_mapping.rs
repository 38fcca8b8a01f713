use i0_consensus::{
    ConfigError, ConsensusError, ErrorCategory, ErrorCode, Hash256, IndexError,
    InternalError, Network, ValidationError,
};

#[test]
fn error_code_as_str_covers_all_variants() {
    let cases: &[(ErrorCode, &str)] = &[
        (ErrorCode::BlockErrParse, "BLOCK_ERR_PARSE"),
        (
            ErrorCode::BlockErrTargetOutOfRange,
            "BLOCK_ERR_TARGET_OUT_OF_RANGE",
        ),
        (ErrorCode::BlockErrBitsMismatch, "BLOCK_ERR_BITS_MISMATCH"),
        (
            ErrorCode::BlockErrPowInsufficient,
            "BLOCK_ERR_POW_INSUFFICIENT",
        ),
        (
            ErrorCode::BlockErrChainIdMismatch,
            "BLOCK_ERR_CHAIN_ID_MISMATCH",
        ),
        (
            ErrorCode::BlockErrCheckpointMismatch,
            "BLOCK_ERR_CHECKPOINT_MISMATCH",
        ),
    ];

    for (code, want) in cases {
        assert_eq!(code.as_str(), *want);
    }
}

#[test]
fn validation_errors_map_to_codes() {
    let cases = [
        (ValidationError::MalformedHeader("short"), ErrorCode::BlockErrParse),
        (
            ValidationError::TargetOutOfRange { bits: 0 },
            ErrorCode::BlockErrTargetOutOfRange,
        ),
        (
            ValidationError::UnexpectedBits {
                expected: 0x1d00_ffff,
                got: 0x1c00_ffff,
            },
            ErrorCode::BlockErrBitsMismatch,
        ),
        (
            ValidationError::InsufficientWork { bits: 0x1d00_ffff },
            ErrorCode::BlockErrPowInsufficient,
        ),
        (
            ValidationError::ChainIdMismatch { expected: 2, got: 1 },
            ErrorCode::BlockErrChainIdMismatch,
        ),
        (
            ValidationError::CheckpointMismatch {
                height: 546,
                hash: Hash256::ZERO,
            },
            ErrorCode::BlockErrCheckpointMismatch,
        ),
    ];
    for (err, code) in cases {
        assert_eq!(err.code(), code, "{err}");
        assert_eq!(ConsensusError::from(err).category(), ErrorCategory::Validation);
    }
}

#[test]
fn categories() {
    let config: ConsensusError = ConfigError::UnknownNetwork("x".into()).into();
    assert_eq!(config.category(), ErrorCategory::Config);
    let selected: ConsensusError = ConfigError::AlreadySelected(Network::Main).into();
    assert_eq!(selected.category(), ErrorCategory::Config);

    let internal: ConsensusError = InternalError::MissingAncestor {
        height: 10,
        steps: 119,
    }
    .into();
    assert_eq!(internal.category(), ErrorCategory::Internal);
    let index: ConsensusError = IndexError::DuplicateHash(Hash256::ZERO).into();
    assert_eq!(index.category(), ErrorCategory::Internal);
}

#[test]
fn error_display() {
    let e = ValidationError::TargetOutOfRange { bits: 0x0492_3456 };
    assert_eq!(
        e.to_string(),
        "target of bits 04923456 is negative, zero, overflowing or above the pow limit"
    );
    let e: ConsensusError = ConfigError::UnknownNetwork("signet".into()).into();
    assert_eq!(e.to_string(), "unknown network: \"signet\"");
    let e = InternalError::MissingAncestor {
        height: 10,
        steps: 119,
    };
    assert_eq!(
        e.to_string(),
        "walking back 119 blocks from height 10 ran past genesis"
    );
}
