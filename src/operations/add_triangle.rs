use tracing::debug;

use crate::constraint::{check_edge_constraints, check_normal, next_triangle_edge};
use crate::error::Result;
use crate::surface::SkeletonSurface;
use crate::topology::{TagTriangle, TopologyStore};

/// Outcome of a successful [`AddTriangle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddedTriangle {
    /// Position of the new triangle in the store.
    pub index: usize,
    /// The stored triangle, in surface-consistent winding.
    pub triangle: TagTriangle,
    /// Edge the user can continue building from, if any has spare capacity.
    pub next_edge: Option<(usize, usize)>,
}

/// Adds a labeled triangle between three stored points.
///
/// The winding is corrected against the surface normals before the edge
/// ledger is charged. A rejection leaves the store unchanged.
pub struct AddTriangle {
    ids: [usize; 3],
    label: usize,
}

impl AddTriangle {
    /// Creates a new `AddTriangle` operation.
    #[must_use]
    pub fn new(ids: [usize; 3], label: usize) -> Self {
        Self { ids, label }
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintViolation`](crate::error::ConstraintViolation) if
    /// an edge is full or the points coincide, and a lookup error if the label
    /// or a point does not exist.
    pub fn execute<S>(&self, store: &mut TopologyStore, surface: &S) -> Result<AddedTriangle>
    where
        S: SkeletonSurface + ?Sized,
    {
        store.label(self.label)?;
        let ids = check_normal(store, surface, self.ids)?;
        check_edge_constraints(store, ids)?;

        let triangle = TagTriangle::new(ids, self.label);
        store.triangles.push(triangle);
        let index = store.triangles.len() - 1;
        let next_edge = next_triangle_edge(store, &triangle)?;

        debug!(index, ?ids, label = self.label, ?next_edge, "triangle added");
        Ok(AddedTriangle {
            index,
            triangle,
            next_edge,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{ConstraintViolation, LookupError, SkeletonError};
    use crate::math::{Color, Point3};
    use crate::surface::ReferenceSurface;
    use crate::topology::{LabelTriangle, TagInfo, TagPoint, TagType};

    /// A 3x2 grid on the z = 0 plane with upward normals.
    fn surface() -> ReferenceSurface {
        let mut vertices = Vec::new();
        for y in 0..2 {
            for x in 0..3 {
                vertices.push(Point3::new(f64::from(x), f64::from(y), 0.0));
            }
        }
        ReferenceSurface::new(
            "grid",
            vertices,
            vec![[0, 1, 4], [0, 4, 3], [1, 2, 5], [1, 5, 4]],
            vec![0.5; 6],
        )
    }

    fn store(surface: &ReferenceSurface, tag_type: TagType) -> TopologyStore {
        let mut s = TopologyStore::new();
        let tag = s.add_tag_info(TagInfo::new("t", tag_type, 3, Color::default()));
        for (i, v) in surface.vertices().iter().enumerate() {
            s.add_point(TagPoint::new(*v, 0.5, 3, tag, i));
        }
        s.add_label(LabelTriangle::new("face", Color::new(10.0, 20.0, 30.0)));
        s
    }

    #[test]
    fn adds_with_surface_winding() {
        let surf = surface();
        let mut s = store(&surf, TagType::Branch);
        let added = AddTriangle::new([0, 4, 1], 0).execute(&mut s, &surf).unwrap();
        assert_eq!(added.index, 0);
        assert_eq!(added.triangle.ids, [0, 1, 4]);
        assert_eq!(added.next_edge, Some((1, 4)));
        assert_eq!(s.triangles().len(), 1);
        assert_eq!(s.edges().len(), 3);
    }

    #[test]
    fn fourth_triangle_on_branch_edge_is_rejected() {
        let surf = surface();
        let mut s = store(&surf, TagType::Branch);
        for third in [3, 4, 5] {
            AddTriangle::new([0, 1, third], 0).execute(&mut s, &surf).unwrap();
        }
        let before = s.clone();
        let err = AddTriangle::new([0, 1, 2], 0).execute(&mut s, &surf).unwrap_err();
        assert!(matches!(
            err,
            SkeletonError::Constraint(ConstraintViolation::EdgeCapacity { count: 3, max: 3, .. })
        ));
        assert_eq!(s, before);
    }

    #[test]
    fn unknown_label_is_a_lookup_error() {
        let surf = surface();
        let mut s = store(&surf, TagType::Interior);
        let err = AddTriangle::new([0, 1, 4], 5).execute(&mut s, &surf).unwrap_err();
        assert!(matches!(err, SkeletonError::Lookup(LookupError::IndexOutOfRange { .. })));
        assert!(s.triangles().is_empty());
        assert!(s.edges().is_empty());
    }
}
