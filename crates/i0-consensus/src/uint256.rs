//! Fixed-width 256-bit unsigned integer used for targets and chain work.
//!
//! Limbs are stored big-endian (`limbs[0]` is the most significant word), so
//! the derived ordering is the numeric ordering. Arithmetic wraps modulo 2^256.

use core::fmt;
use core::ops::{Add, BitOr, Not, Shl, Shr, Sub};
use core::str::FromStr;

use thiserror::Error;

#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct U256([u64; 4]);

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseU256Error {
    #[error("u256 hex is {0} digits, at most 64 allowed")]
    TooLong(usize),
    #[error("u256 hex: {0}")]
    Hex(#[from] hex::FromHexError),
}

impl U256 {
    pub const ZERO: U256 = U256([0; 4]);
    pub const ONE: U256 = U256([0, 0, 0, 1]);
    pub const MAX: U256 = U256([u64::MAX; 4]);

    pub const fn from_be_limbs(limbs: [u64; 4]) -> Self {
        U256(limbs)
    }

    pub const fn from_u64(v: u64) -> Self {
        U256([0, 0, 0, v])
    }

    #[allow(clippy::needless_range_loop)]
    pub fn from_be_bytes(b: &[u8; 32]) -> Self {
        let mut limbs = [0u64; 4];
        for i in 0..4 {
            let mut word = [0u8; 8];
            word.copy_from_slice(&b[i * 8..i * 8 + 8]);
            limbs[i] = u64::from_be_bytes(word);
        }
        U256(limbs)
    }

    pub fn to_be_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for i in 0..4 {
            out[i * 8..i * 8 + 8].copy_from_slice(&self.0[i].to_be_bytes());
        }
        out
    }

    /// Interprets `b` as a little-endian number, the byte order of hash digests.
    pub fn from_le_bytes(b: &[u8; 32]) -> Self {
        let mut be = *b;
        be.reverse();
        Self::from_be_bytes(&be)
    }

    pub fn to_le_bytes(&self) -> [u8; 32] {
        let mut out = self.to_be_bytes();
        out.reverse();
        out
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0)
    }

    pub fn low_u64(&self) -> u64 {
        self.0[3]
    }

    /// Position of the highest set bit plus one; zero for zero.
    pub fn bits(&self) -> u32 {
        for (i, limb) in self.0.iter().enumerate() {
            if *limb != 0 {
                return (4 - i as u32) * 64 - limb.leading_zeros();
            }
        }
        0
    }

    fn set_bit(&mut self, bit: u32) {
        let limb = 3 - (bit / 64) as usize;
        self.0[limb] |= 1u64 << (bit % 64);
    }

    pub fn overflowing_add(self, rhs: U256) -> (U256, bool) {
        let mut out = [0u64; 4];
        let mut carry = false;
        for i in (0..4).rev() {
            let (s1, c1) = self.0[i].overflowing_add(rhs.0[i]);
            let (s2, c2) = s1.overflowing_add(carry as u64);
            out[i] = s2;
            carry = c1 || c2;
        }
        (U256(out), carry)
    }

    pub fn overflowing_sub(self, rhs: U256) -> (U256, bool) {
        let mut out = [0u64; 4];
        let mut borrow = false;
        for i in (0..4).rev() {
            let (d1, b1) = self.0[i].overflowing_sub(rhs.0[i]);
            let (d2, b2) = d1.overflowing_sub(borrow as u64);
            out[i] = d2;
            borrow = b1 || b2;
        }
        (U256(out), borrow)
    }

    /// Multiplies by a word, reporting whether any bits were lost above 2^256.
    pub fn overflowing_mul_u64(self, m: u64) -> (U256, bool) {
        let mut out = [0u64; 4];
        let mut carry: u128 = 0;
        for i in (0..4).rev() {
            let prod = (self.0[i] as u128) * (m as u128) + carry;
            out[i] = (prod & 0xffff_ffff_ffff_ffff) as u64;
            carry = prod >> 64;
        }
        (U256(out), carry != 0)
    }

    pub fn wrapping_mul_u64(self, m: u64) -> U256 {
        self.overflowing_mul_u64(m).0
    }

    pub fn checked_div_u64(self, d: u64) -> Option<U256> {
        if d == 0 {
            return None;
        }
        let mut q = [0u64; 4];
        let mut rem: u128 = 0;
        for i in 0..4 {
            let cur = (rem << 64) | self.0[i] as u128;
            q[i] = (cur / d as u128) as u64;
            rem = cur % d as u128;
        }
        Some(U256(q))
    }

    /// Long division by shift and subtract. `None` only for a zero divisor.
    pub fn checked_div(self, divisor: U256) -> Option<U256> {
        if divisor.is_zero() {
            return None;
        }
        if divisor > self {
            return Some(U256::ZERO);
        }
        let mut shift = self.bits() - divisor.bits();
        let mut div = divisor << shift;
        let mut rem = self;
        let mut quotient = U256::ZERO;
        loop {
            if rem >= div {
                rem = rem - div;
                quotient.set_bit(shift);
            }
            if shift == 0 {
                break;
            }
            div = div >> 1;
            shift -= 1;
        }
        Some(quotient)
    }

    /// Lossy conversion used for difficulty display and progress ratios.
    pub fn to_f64(&self) -> f64 {
        self.0
            .iter()
            .fold(0.0f64, |acc, limb| acc * 18_446_744_073_709_551_616.0 + *limb as f64)
    }
}

impl Add for U256 {
    type Output = U256;

    fn add(self, rhs: U256) -> U256 {
        self.overflowing_add(rhs).0
    }
}

impl Sub for U256 {
    type Output = U256;

    fn sub(self, rhs: U256) -> U256 {
        self.overflowing_sub(rhs).0
    }
}

impl Not for U256 {
    type Output = U256;

    fn not(self) -> U256 {
        U256([!self.0[0], !self.0[1], !self.0[2], !self.0[3]])
    }
}

impl BitOr for U256 {
    type Output = U256;

    fn bitor(self, rhs: U256) -> U256 {
        U256([
            self.0[0] | rhs.0[0],
            self.0[1] | rhs.0[1],
            self.0[2] | rhs.0[2],
            self.0[3] | rhs.0[3],
        ])
    }
}

impl Shl<u32> for U256 {
    type Output = U256;

    fn shl(self, shift: u32) -> U256 {
        if shift >= 256 {
            return U256::ZERO;
        }
        let limbs = (shift / 64) as usize;
        let bits = shift % 64;
        let mut out = [0u64; 4];
        for i in 0..4 - limbs {
            let src = i + limbs;
            out[i] = self.0[src] << bits;
            if bits > 0 && src + 1 < 4 {
                out[i] |= self.0[src + 1] >> (64 - bits);
            }
        }
        U256(out)
    }
}

impl Shr<u32> for U256 {
    type Output = U256;

    fn shr(self, shift: u32) -> U256 {
        if shift >= 256 {
            return U256::ZERO;
        }
        let limbs = (shift / 64) as usize;
        let bits = shift % 64;
        let mut out = [0u64; 4];
        for i in limbs..4 {
            let src = i - limbs;
            out[i] = self.0[src] >> bits;
            if bits > 0 && src >= 1 {
                out[i] |= self.0[src - 1] << (64 - bits);
            }
        }
        U256(out)
    }
}

impl From<u64> for U256 {
    fn from(v: u64) -> Self {
        U256::from_u64(v)
    }
}

impl fmt::LowerHex for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.to_be_bytes()))
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}

impl fmt::Debug for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U256(0x{self:x})")
    }
}

/// Parses big-endian hex, with or without a `0x` prefix; short input is
/// left-padded with zeros.
impl FromStr for U256 {
    type Err = ParseU256Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() > 64 {
            return Err(ParseU256Error::TooLong(digits.len()));
        }
        let padded = format!("{digits:0>64}");
        let mut b = [0u8; 32];
        hex::decode_to_slice(padded, &mut b)?;
        Ok(U256::from_be_bytes(&b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;
    use num_traits::{One, Zero};

    fn big(v: &U256) -> BigUint {
        BigUint::from_bytes_be(&v.to_be_bytes())
    }

    fn modulus() -> BigUint {
        BigUint::one() << 256usize
    }

    // Deterministic xorshift stream with a spread of magnitudes.
    fn samples() -> Vec<U256> {
        let mut state = 0x9e37_79b9_7f4a_7c15u64;
        let mut next = || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        };
        let mut out = vec![U256::ZERO, U256::ONE, U256::MAX, U256::from_u64(u64::MAX)];
        for i in 0..40u32 {
            let v = U256::from_be_limbs([next(), next(), next(), next()]);
            out.push(v >> (i * 6));
        }
        out
    }

    #[test]
    fn add_sub_wrap_like_biguint() {
        let xs = samples();
        for a in &xs {
            for b in &xs {
                let sum = big(&(*a + *b));
                assert_eq!(sum, (big(a) + big(b)) % modulus());
                let diff = big(&(*a - *b));
                assert_eq!(diff, (big(a) + modulus() - big(b)) % modulus());
            }
        }
    }

    #[test]
    fn division_matches_biguint() {
        let xs = samples();
        for a in &xs {
            for b in &xs {
                if b.is_zero() {
                    assert_eq!(a.checked_div(*b), None);
                    continue;
                }
                let q = a.checked_div(*b).expect("nonzero divisor");
                assert_eq!(big(&q), big(a) / big(b), "a={a:?} b={b:?}");
            }
        }
    }

    #[test]
    fn word_mul_and_div_match_biguint() {
        for a in samples() {
            for m in [0u64, 1, 2, 90, 10_800, 604_800, u64::MAX] {
                let (p, overflow) = a.overflowing_mul_u64(m);
                let want = big(&a) * BigUint::from(m);
                assert_eq!(overflow, want >= modulus());
                assert_eq!(big(&p), want % modulus());
                if m != 0 {
                    let q = a.checked_div_u64(m).expect("nonzero");
                    assert_eq!(big(&q), big(&a) / BigUint::from(m));
                }
            }
        }
        assert_eq!(U256::ONE.checked_div_u64(0), None);
    }

    #[test]
    fn shifts_match_biguint() {
        for a in samples() {
            for s in [0u32, 1, 8, 63, 64, 65, 128, 200, 255, 256, 300] {
                assert_eq!(big(&(a << s)), (big(&a) << s as usize) % modulus());
                assert_eq!(big(&(a >> s)), big(&a) >> s as usize);
            }
        }
    }

    #[test]
    fn bits_and_ordering() {
        assert_eq!(U256::ZERO.bits(), 0);
        assert_eq!(U256::ONE.bits(), 1);
        assert_eq!(U256::MAX.bits(), 256);
        assert_eq!((U256::ONE << 200).bits(), 201);
        assert!(U256::ONE << 64 > U256::from_u64(u64::MAX));
        assert!(big(&!U256::ZERO) == modulus() - BigUint::one());
        assert!(big(&U256::ZERO).is_zero());
    }

    #[test]
    fn hex_parsing_and_display() {
        let v: U256 = "0x00000000ffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
            .parse()
            .expect("parse");
        assert_eq!(v, U256::from_be_limbs([0xffff_ffff, u64::MAX, u64::MAX, u64::MAX]));
        assert_eq!(
            v.to_string(),
            "00000000ffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
        );
        assert_eq!("ff".parse::<U256>().expect("short"), U256::from_u64(0xff));
        assert!(matches!(
            "1".repeat(65).parse::<U256>(),
            Err(ParseU256Error::TooLong(65))
        ));
        assert!(matches!("zz".parse::<U256>(), Err(ParseU256Error::Hex(_))));
        let err = "1".repeat(65).parse::<U256>().unwrap_err();
        assert_eq!(err.clone(), ParseU256Error::TooLong(65));
    }

    #[test]
    fn byte_order_round_trips() {
        let v = U256::from_be_limbs([1, 2, 3, 4]);
        assert_eq!(U256::from_be_bytes(&v.to_be_bytes()), v);
        assert_eq!(U256::from_le_bytes(&v.to_le_bytes()), v);
        assert_eq!(v.to_le_bytes()[0], 4);
    }

    #[test]
    fn to_f64_is_close() {
        assert_eq!(U256::ZERO.to_f64(), 0.0);
        assert_eq!((U256::ONE << 200).to_f64(), 2f64.powi(200));
    }
}
