// Consensus-critical. The compact form is part of every block header.
//! Compact ("nBits") target encoding.
//!
//! `bits = exponent << 24 | mantissa`, with a 23-bit mantissa and a sign bit
//! at `0x00800000`. The value is `mantissa * 256^(exponent - 3)`.

use crate::uint256::U256;

const SIGN_BIT: u32 = 0x0080_0000;
const MANTISSA_MASK: u32 = 0x007f_ffff;

/// Result of decoding a compact target. A negative or overflowing decode is
/// never a usable target; callers reject it rather than clamp it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedTarget {
    pub value: U256,
    pub negative: bool,
    pub overflow: bool,
}

impl DecodedTarget {
    pub fn is_usable(&self) -> bool {
        !self.negative && !self.overflow && !self.value.is_zero()
    }
}

pub fn decode_compact(bits: u32) -> DecodedTarget {
    let size = bits >> 24;
    let mut word = bits & MANTISSA_MASK;
    // Flags look at the mantissa after a right shift, so 0x01803456 is zero
    // and not negative.
    let value = if size <= 3 {
        word >>= 8 * (3 - size);
        U256::from_u64(u64::from(word))
    } else {
        U256::from_u64(u64::from(word)) << (8 * (size - 3))
    };
    let negative = word != 0 && bits & SIGN_BIT != 0;
    let overflow = word != 0
        && (size > 34 || (word > 0xff && size > 33) || (word > 0xffff && size > 32));
    DecodedTarget {
        value,
        negative,
        overflow,
    }
}

/// Normalized compact form of a non-negative value. Zero encodes as `0`.
pub fn encode_compact(value: &U256) -> u32 {
    let mut size = value.bits().div_ceil(8);
    let mut compact = if size <= 3 {
        (value.low_u64() << (8 * (3 - size))) as u32
    } else {
        (*value >> (8 * (size - 3))).low_u64() as u32
    };
    // The mantissa is signed; move a high bit into the exponent instead.
    if compact & SIGN_BIT != 0 {
        compact >>= 8;
        size += 1;
    }
    compact | (size << 24)
}
