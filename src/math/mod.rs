mod color;
mod triangle;

pub use color::Color;
pub use triangle::{face_normal, point_in_triangle};

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Distance, in world units, within which a pick position counts as hitting a triangle.
pub const PICK_TOLERANCE: f64 = 0.1;
