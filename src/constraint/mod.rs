//! Rules that keep the skeleton construction a valid 2-manifold-like surface.
//!
//! Everything here is a function over a [`TopologyStore`](crate::topology::TopologyStore);
//! the only mutation is the edge ledger update in [`check_edge_constraints`],
//! which is all-or-nothing.

mod edges;
mod normal;
mod precheck;

pub use edges::{
    check_edge_constraints, edge_has_capacity, next_triangle_edge, regenerate_edges, release_edges,
    try_regenerate_edges,
};
pub use normal::check_normal;
pub use precheck::{free_edge_adjacent, pre_check, Candidate};

use crate::error::ConstraintViolation;
use crate::topology::TagType;

/// Maximum number of triangles that may share an edge between points of
/// types `a` and `b`.
///
/// | pair                | max |
/// |---------------------|-----|
/// | Branch–Branch       | 3   |
/// | FreeEdge–FreeEdge   | 1   |
/// | Interior–Interior   | 2   |
/// | any other mix       | 2   |
///
/// # Errors
///
/// Returns [`ConstraintViolation::UnsupportedPointType`] if either point is
/// of type [`TagType::Other`], which has no edge capacity.
pub fn edge_constraint(a: TagType, b: TagType) -> Result<u32, ConstraintViolation> {
    use TagType::{Branch, FreeEdge, Interior, Other};
    match (a, b) {
        (Other, _) | (_, Other) => Err(ConstraintViolation::UnsupportedPointType(Other.to_string())),
        (Branch, Branch) => Ok(3),
        (FreeEdge, FreeEdge) => Ok(1),
        (Interior, Interior)
        | (Branch | Interior, FreeEdge)
        | (FreeEdge | Interior, Branch)
        | (Branch | FreeEdge, Interior) => Ok(2),
    }
}
