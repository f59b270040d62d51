use tracing::{debug, warn};

use crate::error::{ConstraintViolation, Result};
use crate::topology::{pair_number, TagEdge, TagTriangle, TopologyStore};

use super::edge_constraint;

/// Looks up the edge `(a, b)`, or builds the fresh one the store would create.
fn edge_or_new(store: &TopologyStore, a: usize, b: usize) -> Result<TagEdge> {
    if let Some(edge) = store.edge(a, b) {
        return Ok(*edge);
    }
    let constrain = edge_constraint(store.point_type(a)?, store.point_type(b)?)?;
    Ok(TagEdge::new(a, b, constrain))
}

/// Reserves one usage on each of the three edges of a candidate triangle.
///
/// Missing edges are created with the capacity for their endpoint types.
/// If any edge is already full, the violation names it (1st, 2nd or 3rd in
/// winding order) and the store is left untouched.
///
/// # Errors
///
/// Returns [`ConstraintViolation::EdgeCapacity`] for a full edge,
/// [`ConstraintViolation::DegenerateTriangle`] if two ids coincide, and a
/// lookup error for unknown points.
pub fn check_edge_constraints(store: &mut TopologyStore, ids: [usize; 3]) -> Result<()> {
    let [a, b, c] = ids;
    if a == b || b == c || c == a {
        return Err(ConstraintViolation::DegenerateTriangle.into());
    }

    let pairs = TagTriangle::new(ids, 0).edges();
    let mut reserved = Vec::with_capacity(3);
    for (n, &(p, q)) in pairs.iter().enumerate() {
        let edge = edge_or_new(store, p, q)?;
        if !edge.has_capacity() {
            return Err(ConstraintViolation::EdgeCapacity {
                edge: n + 1,
                count: edge.num_edge,
                max: edge.constrain,
            }
            .into());
        }
        reserved.push(edge);
    }

    for mut edge in reserved {
        edge.num_edge += 1;
        store.edges.insert(edge.key(), edge);
    }
    Ok(())
}

/// Returns `true` if one more triangle may use the edge `(a, b)`.
///
/// # Errors
///
/// Returns an error if a point is unknown or of a type that cannot form edges.
pub fn edge_has_capacity(store: &TopologyStore, a: usize, b: usize) -> Result<bool> {
    Ok(edge_or_new(store, a, b)?.has_capacity())
}

/// Picks the edge of a freshly created triangle the user can keep building
/// from.
///
/// Edges are tried in the order `(2,3)`, `(1,2)`, `(1,3)`; the first with
/// spare capacity wins.
///
/// # Errors
///
/// Returns an error if the triangle references unknown points.
pub fn next_triangle_edge(store: &TopologyStore, triangle: &TagTriangle) -> Result<Option<(usize, usize)>> {
    let [a, b, c] = triangle.ids;
    for (p, q) in [(b, c), (a, b), (a, c)] {
        if edge_has_capacity(store, p, q)? {
            return Ok(Some((p, q)));
        }
    }
    Ok(None)
}

/// Gives back the three edge usages held by `triangle`.
pub fn release_edges(store: &mut TopologyStore, triangle: &TagTriangle) {
    for (p, q) in triangle.edges() {
        match store.edges.get_mut(&pair_number(p, q)) {
            Some(edge) if edge.num_edge > 0 => edge.num_edge -= 1,
            Some(_) => warn!(p, q, "edge usage already zero"),
            None => warn!(p, q, "released edge is not in the ledger"),
        }
    }
}

/// Rebuilds the edge ledger from scratch by replaying every stored triangle.
///
/// Triangles whose edges no longer fit are kept but reported.
pub fn regenerate_edges(store: &mut TopologyStore) {
    store.edges.clear();
    let triangles = store.triangles.clone();
    for (i, tri) in triangles.iter().enumerate() {
        if let Err(err) = check_edge_constraints(store, tri.ids) {
            warn!(triangle = i, %err, "triangle does not fit the regenerated edges");
        }
    }
    debug!(edges = store.edges.len(), triangles = triangles.len(), "edges regenerated");
}

/// Rebuilds the edge ledger from scratch, stopping at the first triangle
/// whose edges are over capacity.
///
/// On error the ledger is partial; callers work on a copy of the store.
///
/// # Errors
///
/// Returns the violation of the first triangle that does not fit.
pub fn try_regenerate_edges(store: &mut TopologyStore) -> Result<()> {
    store.edges.clear();
    let triangles = store.triangles.clone();
    for tri in &triangles {
        check_edge_constraints(store, tri.ids)?;
    }
    Ok(())
}
