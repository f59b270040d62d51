use crate::math::Point3;

/// A landmark placed on the reference skeleton surface.
///
/// The point's identity is its position in the store's point sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct TagPoint {
    /// Current position, snapped to a reference vertex once placement ends.
    pub pos: Point3,
    /// Skeleton radius at the anchor vertex.
    pub radius: f64,
    /// Anatomical index copied from the owning category at creation.
    pub type_index: i64,
    /// Index of the owning category in the store's tag sequence.
    pub tag: usize,
    /// Index of the nearest reference-surface vertex.
    pub seq: usize,
}

impl TagPoint {
    /// Creates a point anchored at reference vertex `seq`.
    #[must_use]
    pub fn new(pos: Point3, radius: f64, type_index: i64, tag: usize, seq: usize) -> Self {
        Self {
            pos,
            radius,
            type_index,
            tag,
            seq,
        }
    }
}
