mod build;
mod resample;

pub use build::BuildMesh;
pub use resample::resample_radius;

use crate::math::{point_in_triangle, Point3};

/// Name of the per-point skeleton radius array.
pub const RADIUS_ARRAY: &str = "Radius";

/// Name of the per-face RGB color array.
pub const COLORS_ARRAY: &str = "Colors";

/// Renderable indexed-triangle surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkeletonMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Skeleton radius per vertex.
    pub radius: Vec<f64>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
    /// RGB color per triangle.
    pub colors: Vec<[u8; 3]>,
}

impl SkeletonMesh {
    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if the mesh has no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Corner positions of triangle `index`.
    #[must_use]
    pub fn triangle(&self, index: usize) -> Option<[Point3; 3]> {
        let tri = self.indices.get(index)?;
        let corner = |i: u32| self.vertices.get(i as usize).copied();
        Some([corner(tri[0])?, corner(tri[1])?, corner(tri[2])?])
    }

    /// Index of the first triangle hit by `pos` within `tolerance`.
    ///
    /// Triangles keep the order of the store, so the result is also a
    /// position in the store's triangle list.
    #[must_use]
    pub fn pick(&self, pos: &Point3, tolerance: f64) -> Option<usize> {
        (0..self.indices.len()).find(|&i| {
            self.triangle(i)
                .is_some_and(|[a, b, c]| point_in_triangle(pos, &a, &b, &c, tolerance))
        })
    }
}

/// Receives the rebuilt mesh after every visible topology change.
pub trait MeshSink {
    fn mesh_updated(&mut self, mesh: &SkeletonMesh);
}
