use crate::math::{Point3, Vector3, TOLERANCE};

use super::SkeletonSurface;

/// Triangle surface with a per-vertex skeleton radius.
///
/// Vertex normals are area-weighted averages of the incident face normals,
/// computed once at construction.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSurface {
    name: String,
    vertices: Vec<Point3>,
    triangles: Vec<[usize; 3]>,
    radius: Vec<f64>,
    normals: Vec<Vector3>,
}

impl ReferenceSurface {
    /// Creates a surface. Missing radius values default to zero and
    /// triangles referencing missing vertices are dropped.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        vertices: Vec<Point3>,
        triangles: Vec<[usize; 3]>,
        mut radius: Vec<f64>,
    ) -> Self {
        let n = vertices.len();
        radius.resize(n, 0.0);
        let triangles: Vec<[usize; 3]> = triangles
            .into_iter()
            .filter(|t| t.iter().all(|&i| i < n))
            .collect();
        let normals = vertex_normals(&vertices, &triangles);
        Self {
            name: name.into(),
            vertices,
            triangles,
            radius,
            normals,
        }
    }

    /// Surface name, used to name saved files.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Vertex positions.
    #[must_use]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// Vertex-index triangles.
    #[must_use]
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Per-vertex radius.
    #[must_use]
    pub fn radius(&self) -> &[f64] {
        &self.radius
    }
}

impl SkeletonSurface for ReferenceSurface {
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn vertex(&self, index: usize) -> Option<Point3> {
        self.vertices.get(index).copied()
    }

    fn closest_vertex(&self, pos: &Point3) -> Option<(usize, f64)> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (i, (v - pos).norm_squared()))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| (i, self.radius[i]))
    }

    fn vertex_normal(&self, index: usize) -> Option<Vector3> {
        self.normals.get(index).copied()
    }
}

fn vertex_normals(vertices: &[Point3], triangles: &[[usize; 3]]) -> Vec<Vector3> {
    let mut normals = vec![Vector3::zeros(); vertices.len()];
    for &[a, b, c] in triangles {
        // Unnormalized cross product weights by twice the face area.
        let n = (vertices[b] - vertices[a]).cross(&(vertices[c] - vertices[a]));
        normals[a] += n;
        normals[b] += n;
        normals[c] += n;
    }
    for n in &mut normals {
        let len = n.norm();
        if len > TOLERANCE {
            *n /= len;
        }
    }
    normals
}
