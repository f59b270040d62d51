use crate::surface::SkeletonSurface;

use super::SkeletonMesh;

/// Replaces the radius of every mesh vertex with the radius of the closest
/// reference-surface vertex.
///
/// Used after subdivision, which creates vertices with no radius of their own.
pub fn resample_radius<S>(mesh: &mut SkeletonMesh, surface: &S)
where
    S: SkeletonSurface + ?Sized,
{
    mesh.radius = mesh
        .vertices
        .iter()
        .map(|v| surface.closest_vertex(v).map_or(0.0, |(_, r)| r))
        .collect();
}
