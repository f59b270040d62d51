//! Reference skeleton surface the landmarks are placed on.
//!
//! The session only needs nearest-vertex lookup with the skeleton radius and
//! a per-vertex normal field; [`SkeletonSurface`] is that capability.
//! [`ReferenceSurface`] implements it for an in-memory triangle surface.

mod reference;

pub use reference::ReferenceSurface;

use crate::math::{Point3, Vector3};

/// Closest-vertex and normal queries against a reference skeleton surface.
pub trait SkeletonSurface {
    /// Number of vertices on the surface.
    fn vertex_count(&self) -> usize;

    /// Position of vertex `index`.
    fn vertex(&self, index: usize) -> Option<Point3>;

    /// Index and skeleton radius of the vertex closest to `pos`.
    ///
    /// Returns `None` only for an empty surface.
    fn closest_vertex(&self, pos: &Point3) -> Option<(usize, f64)>;

    /// Unit outward normal at vertex `index`.
    fn vertex_normal(&self, index: usize) -> Option<Vector3>;
}
