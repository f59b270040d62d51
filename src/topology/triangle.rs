/// An accepted face, stored as three global point indices.
///
/// Positions and anchor vertices are read from the point sequence on
/// demand, so a triangle always follows its points when they move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagTriangle {
    /// Global point indices in winding order.
    pub ids: [usize; 3],
    /// Index of the face label in the store's label sequence.
    pub label: usize,
}

impl TagTriangle {
    /// Creates a triangle over three global point ids.
    #[must_use]
    pub fn new(ids: [usize; 3], label: usize) -> Self {
        Self { ids, label }
    }

    /// The three edges in winding order: `(1,2)`, `(2,3)`, `(3,1)`.
    #[must_use]
    pub fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.ids;
        [(a, b), (b, c), (c, a)]
    }

    /// Returns `true` if the triangle uses point `id`.
    #[must_use]
    pub fn contains(&self, id: usize) -> bool {
        self.ids.contains(&id)
    }

    /// Reverses the winding by swapping the second and third points.
    pub fn flip(&mut self) {
        self.ids.swap(1, 2);
    }
}
