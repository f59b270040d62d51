/// Unassigned anchor marker for [`TagEdge::seq`].
pub const NO_SEQ: i64 = -1;

/// Symmetric, collision-free key of an unordered pair of point indices.
///
/// Cantor pairing of `(min, max)`: `pair_number(a, b) == pair_number(b, a)`
/// and distinct unordered pairs map to distinct keys.
#[must_use]
pub fn pair_number(a: usize, b: usize) -> u64 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let (lo, hi) = (lo as u64, hi as u64);
    (lo + hi) * (lo + hi + 1) / 2 + hi
}

/// Usage ledger for one unordered pair of points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagEdge {
    pub pt_id1: usize,
    pub pt_id2: usize,
    /// Maximum number of triangles allowed on this edge, frozen at creation.
    pub constrain: u32,
    /// Number of triangles currently using this edge.
    pub num_edge: u32,
    pub seq: i64,
}

impl TagEdge {
    /// Creates an unused edge with the given capacity.
    #[must_use]
    pub fn new(pt_id1: usize, pt_id2: usize, constrain: u32) -> Self {
        Self {
            pt_id1,
            pt_id2,
            constrain,
            num_edge: 0,
            seq: NO_SEQ,
        }
    }

    /// Key of this edge in the store's edge map.
    #[must_use]
    pub fn key(&self) -> u64 {
        pair_number(self.pt_id1, self.pt_id2)
    }

    /// Returns `true` if another triangle may still use this edge.
    #[must_use]
    pub fn has_capacity(&self) -> bool {
        self.num_edge < self.constrain
    }

    /// Returns `true` if the edge touches point `id`.
    #[must_use]
    pub fn touches(&self, id: usize) -> bool {
        self.pt_id1 == id || self.pt_id2 == id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    #[test]
    fn cantor_values() {
        assert_eq!(pair_number(0, 0), 0);
        assert_eq!(pair_number(0, 1), 2);
        assert_eq!(pair_number(1, 1), 4);
        assert_eq!(pair_number(2, 5), 33);
    }

    #[test]
    fn injective_on_small_range() {
        let mut seen = HashMap::new();
        for a in 0..60 {
            for b in a..60 {
                let prev = seen.insert(pair_number(a, b), (a, b));
                assert!(prev.is_none(), "({a}, {b}) collides with {prev:?}");
            }
        }
    }

    #[test]
    fn capacity() {
        let mut e = TagEdge::new(3, 1, 1);
        assert!(e.has_capacity());
        e.num_edge = 1;
        assert!(!e.has_capacity());
        assert_eq!(e.key(), pair_number(1, 3));
    }

    proptest! {
        #[test]
        fn symmetric(a in 0usize..100_000, b in 0usize..100_000) {
            prop_assert_eq!(pair_number(a, b), pair_number(b, a));
        }

        #[test]
        fn distinct_pairs_distinct_keys(
            a in 0usize..5_000, b in 0usize..5_000, c in 0usize..5_000, d in 0usize..5_000,
        ) {
            let same = (a.min(b), a.max(b)) == (c.min(d), c.max(d));
            prop_assert_eq!(pair_number(a, b) == pair_number(c, d), same);
        }
    }
}
