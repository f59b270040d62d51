//! External mesh services used when saving.
//!
//! Inflation and subdivision are provided by the host application. The
//! session only calls them and writes what they return.

use crate::error::ServiceError;
use crate::mesh::SkeletonMesh;

/// Produces a closed surface around a skeleton mesh.
pub trait InflationService {
    /// Inflates `mesh` by `radius`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Inflation`] if the service cannot build the surface.
    fn inflate(&self, mesh: &SkeletonMesh, radius: f64) -> Result<SkeletonMesh, ServiceError>;
}

/// Refines a skeleton mesh by repeated subdivision.
pub trait SubdivisionService {
    /// Applies `levels` subdivision passes to `mesh`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Subdivision`] if the service fails.
    fn subdivide(&self, mesh: &SkeletonMesh, levels: u32) -> Result<SkeletonMesh, ServiceError>;
}
