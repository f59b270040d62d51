use crate::error::ConstraintViolation;
use crate::topology::{PointListId, TagType};

/// A provisionally selected point, before it is committed to a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub list: PointListId,
    pub local: usize,
    pub tag_type: TagType,
}

/// Checks a partial selection of two or three points against the free-edge
/// rules.
///
/// Two free-edge points may only be joined if they come from the same list
/// and are neighbors on its closed curve; three free-edge points never form
/// a triangle. `sort_keys` yields the sort key of every point of a list,
/// indexed by local index.
///
/// # Errors
///
/// Returns the violated rule.
pub fn pre_check<'a, F>(candidates: &[Candidate], sort_keys: F) -> Result<(), ConstraintViolation>
where
    F: Fn(PointListId) -> &'a [i64],
{
    let free: Vec<&Candidate> = candidates
        .iter()
        .filter(|c| c.tag_type == TagType::FreeEdge)
        .collect();

    match (candidates.len(), free.len()) {
        (3, 3) => Err(ConstraintViolation::ThreeFreeEdges),
        (2 | 3, 2) => check_free_edge_pair(free[0], free[1], &sort_keys),
        _ => Ok(()),
    }
}

fn check_free_edge_pair<'a, F>(
    a: &Candidate,
    b: &Candidate,
    sort_keys: &F,
) -> Result<(), ConstraintViolation>
where
    F: Fn(PointListId) -> &'a [i64],
{
    if a.list != b.list {
        return Err(ConstraintViolation::FreeEdgeDifferentLists);
    }
    if free_edge_adjacent(sort_keys(a.list), a.local, b.local) {
        Ok(())
    } else {
        Err(ConstraintViolation::FreeEdgeNotAdjacent)
    }
}

/// Returns `true` if local points `a` and `b` are neighbors when the list is
/// ordered by `keys` and closed into a loop.
///
/// Ties in `keys` are broken by local index.
#[must_use]
pub fn free_edge_adjacent(keys: &[i64], a: usize, b: usize) -> bool {
    let n = keys.len();
    if a == b || a >= n || b >= n {
        return false;
    }
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&i| (keys[i], i));

    let rank = |local: usize| order.iter().position(|&i| i == local);
    let (Some(ra), Some(rb)) = (rank(a), rank(b)) else {
        return false;
    };
    let (lo, hi) = (ra.min(rb), ra.max(rb));
    hi - lo == 1 || (lo == 0 && hi == n - 1)
}
