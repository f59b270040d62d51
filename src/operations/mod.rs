mod add_triangle;
mod edit_triangle;
mod remove_point;

pub use add_triangle::{AddTriangle, AddedTriangle};
pub use edit_triangle::{AssignTriangleLabel, DeleteTriangle, FlipTriangle};
pub use remove_point::RemovePoint;
