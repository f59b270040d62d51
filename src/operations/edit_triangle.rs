use tracing::debug;

use crate::constraint::release_edges;
use crate::error::Result;
use crate::topology::{TagTriangle, TopologyStore};

/// Removes the triangle at a list position and frees its edge usages.
///
/// Later triangles shift down by one, keeping their relative order.
pub struct DeleteTriangle {
    index: usize,
}

impl DeleteTriangle {
    /// Creates a new `DeleteTriangle` operation.
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self { index }
    }

    /// Executes the deletion, returning the removed triangle.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if no triangle exists at the position.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<TagTriangle> {
        let triangle = *store.triangle(self.index)?;
        release_edges(store, &triangle);
        store.triangles.remove(self.index);
        debug!(index = self.index, ids = ?triangle.ids, "triangle deleted");
        Ok(triangle)
    }
}

/// Reverses the winding of the triangle at a list position.
///
/// The edge ledger is keyed by unordered pairs, so it is not touched.
pub struct FlipTriangle {
    index: usize,
}

impl FlipTriangle {
    /// Creates a new `FlipTriangle` operation.
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self { index }
    }

    /// Executes the flip.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if no triangle exists at the position.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<()> {
        let triangle = store.triangle_mut(self.index)?;
        triangle.flip();
        debug!(index = self.index, ids = ?triangle.ids, "triangle flipped");
        Ok(())
    }
}

/// Points the triangle at a list position to another face label.
pub struct AssignTriangleLabel {
    index: usize,
    label: usize,
}

impl AssignTriangleLabel {
    /// Creates a new `AssignTriangleLabel` operation.
    #[must_use]
    pub fn new(index: usize, label: usize) -> Self {
        Self { index, label }
    }

    /// Executes the relabeling.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the triangle or the label does not exist.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<()> {
        store.label(self.label)?;
        store.triangle_mut(self.index)?.label = self.label;
        debug!(index = self.index, label = self.label, "triangle relabeled");
        Ok(())
    }
}
