use tracing::trace;

use crate::error::Result;
use crate::topology::TopologyStore;

use super::SkeletonMesh;

/// Projects a [`TopologyStore`] into a [`SkeletonMesh`].
///
/// Always a full rebuild: one vertex per stored point in sequence order, one
/// face per stored triangle in list order, colored by its face label.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildMesh;

impl BuildMesh {
    /// Creates a new `BuildMesh` operation.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the projection.
    ///
    /// # Errors
    ///
    /// Returns an error if a triangle references a missing point or face label.
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self, store: &TopologyStore) -> Result<SkeletonMesh> {
        let points = store.points();
        let mut mesh = SkeletonMesh {
            vertices: points.iter().map(|p| p.pos).collect(),
            radius: points.iter().map(|p| p.radius).collect(),
            indices: Vec::with_capacity(store.triangles().len()),
            colors: Vec::with_capacity(store.triangles().len()),
        };

        for tri in store.triangles() {
            for &id in &tri.ids {
                store.point(id)?;
            }
            let color = store.label(tri.label)?.color;
            mesh.indices.push(tri.ids.map(|id| id as u32));
            mesh.colors.push(color.to_rgb8());
        }

        trace!(
            vertices = mesh.vertices.len(),
            triangles = mesh.indices.len(),
            "mesh rebuilt"
        );
        Ok(mesh)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Color, Point3};
    use crate::topology::{LabelTriangle, TagInfo, TagPoint, TagTriangle, TagType};

    fn store() -> TopologyStore {
        let mut s = TopologyStore::new();
        let tag = s.add_tag_info(TagInfo::new("b", TagType::Branch, 1, Color::default()));
        for (i, r) in [0.5, 0.6, 0.7, 0.8].into_iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let x = i as f64;
            s.add_point(TagPoint::new(Point3::new(x, x * x, 0.0), r, 1, tag, i));
        }
        s.add_label(LabelTriangle::new("red", Color::new(255.0, 0.0, 0.0)));
        s.add_label(LabelTriangle::new("blue", Color::new(0.0, 0.0, 255.0)));
        s.triangles.push(TagTriangle::new([0, 1, 2], 1));
        s.triangles.push(TagTriangle::new([1, 3, 2], 0));
        s
    }

    #[test]
    fn mesh_mirrors_store() {
        let s = store();
        let mesh = BuildMesh::new().execute(&s).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.radius, vec![0.5, 0.6, 0.7, 0.8]);
        assert_eq!(mesh.indices, vec![[0, 1, 2], [1, 3, 2]]);
        assert_eq!(mesh.colors, vec![[0, 0, 255], [255, 0, 0]]);
    }

    #[test]
    fn moved_point_moves_its_triangles() {
        let mut s = store();
        s.point_mut(1).unwrap().pos = Point3::new(9.0, 9.0, 9.0);
        let mesh = BuildMesh::new().execute(&s).unwrap();
        assert_eq!(mesh.triangle(0).unwrap()[1], Point3::new(9.0, 9.0, 9.0));
    }

    #[test]
    fn rebuild_is_deterministic() {
        let s = store();
        assert_eq!(BuildMesh::new().execute(&s).unwrap(), BuildMesh::new().execute(&s).unwrap());
    }

    #[test]
    fn missing_label_is_an_error() {
        let mut s = store();
        s.triangles.push(TagTriangle::new([0, 1, 3], 7));
        assert!(BuildMesh::new().execute(&s).is_err());
    }
}
