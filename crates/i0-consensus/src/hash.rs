use core::fmt;
use core::str::FromStr;

use sha2::{Digest, Sha256};

use crate::uint256::U256;

pub fn sha256d(b: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(b);
    let second = Sha256::digest(first);
    let mut r = [0u8; 32];
    r.copy_from_slice(&second);
    r
}

/// A double-SHA256 digest (block hash, txid, merkle root) in internal byte
/// order. Hex forms are byte-reversed, as block explorers print them.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hash256(pub [u8; 32]);

const fn hex_nibble(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => panic!("invalid hex digit in hash literal"),
    }
}

impl Hash256 {
    pub const ZERO: Hash256 = Hash256([0u8; 32]);

    /// Compile-time parser for hash literals in display order. Intended for
    /// `const` tables; an invalid literal fails the build.
    pub const fn from_display_hex(s: &str) -> Hash256 {
        let b = s.as_bytes();
        assert!(b.len() == 64, "hash literal must be 64 hex digits");
        let mut out = [0u8; 32];
        let mut i = 0;
        while i < 32 {
            out[31 - i] = (hex_nibble(b[2 * i]) << 4) | hex_nibble(b[2 * i + 1]);
            i += 1;
        }
        Hash256(out)
    }

    pub fn hash(data: &[u8]) -> Hash256 {
        Hash256(sha256d(data))
    }

    /// The digest read as a little-endian number, the form compared against
    /// proof-of-work targets.
    pub fn to_u256(&self) -> U256 {
        U256::from_le_bytes(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rev = self.0;
        rev.reverse();
        f.write_str(&hex::encode(rev))
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({self})")
    }
}

impl FromStr for Hash256 {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let mut out = [0u8; 32];
        hex::decode_to_slice(digits, &mut out)?;
        out.reverse();
        Ok(Hash256(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256d_of_empty_input() {
        assert_eq!(
            hex::encode(sha256d(b"")),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        );
    }

    #[test]
    fn const_and_runtime_parsers_agree() {
        const LIT: Hash256 = Hash256::from_display_hex(
            "0000000000635e5e1a8027383f028f4c666f9e20f4f90968ba8bf7ba8431c71f",
        );
        let parsed: Hash256 = "0000000000635e5e1a8027383f028f4c666f9e20f4f90968ba8bf7ba8431c71f"
            .parse()
            .expect("parse");
        assert_eq!(LIT, parsed);
        assert_eq!(
            LIT.to_string(),
            "0000000000635e5e1a8027383f028f4c666f9e20f4f90968ba8bf7ba8431c71f"
        );
        assert_eq!(LIT.0[0], 0x1f);
        assert!("abcd".parse::<Hash256>().is_err());
    }

    #[test]
    fn numeric_value_follows_display_order() {
        let h = Hash256::from_display_hex(
            "00000000000000000000000000000000000000000000000000000000000001ff",
        );
        assert_eq!(h.to_u256(), U256::from_u64(0x1ff));
    }
}
