use crate::hash::Hash256;

/// Merkle root over transaction ids. An odd node at any level is paired with
/// itself. `None` for an empty list.
pub fn merkle_root_txids(txids: &[Hash256]) -> Option<Hash256> {
    if txids.is_empty() {
        return None;
    }

    let mut level: Vec<Hash256> = txids.to_vec();
    let mut preimage = [0u8; 64];
    while level.len() > 1 {
        let mut next: Vec<Hash256> = Vec::with_capacity(level.len().div_ceil(2));
        for pair in level.chunks(2) {
            let left = pair[0];
            let right = pair.get(1).copied().unwrap_or(left);
            preimage[..32].copy_from_slice(left.as_bytes());
            preimage[32..].copy_from_slice(right.as_bytes());
            next.push(Hash256::hash(&preimage));
        }
        level = next;
    }

    Some(level[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(a: &Hash256, b: &Hash256) -> Hash256 {
        let mut p = Vec::new();
        p.extend_from_slice(a.as_bytes());
        p.extend_from_slice(b.as_bytes());
        Hash256::hash(&p)
    }

    #[test]
    fn empty_and_single() {
        assert_eq!(merkle_root_txids(&[]), None);
        let a = Hash256([1u8; 32]);
        assert_eq!(merkle_root_txids(&[a]), Some(a));
    }

    #[test]
    fn odd_levels_duplicate_the_last_node() {
        let a = Hash256([1u8; 32]);
        let b = Hash256([2u8; 32]);
        let c = Hash256([3u8; 32]);
        assert_eq!(merkle_root_txids(&[a, b]), Some(node(&a, &b)));
        let want = node(&node(&a, &b), &node(&c, &c));
        assert_eq!(merkle_root_txids(&[a, b, c]), Some(want));
    }
}
