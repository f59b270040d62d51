use tracing::debug;

use crate::constraint::regenerate_edges;
use crate::error::Result;
use crate::topology::{TagPoint, TopologyStore};

/// Removes a point and everything built on it.
///
/// Triangles using the point are deleted, references to later points are
/// shifted down by one and the edge ledger is regenerated from the
/// surviving triangles.
pub struct RemovePoint {
    id: usize,
}

impl RemovePoint {
    /// Creates a new `RemovePoint` operation.
    #[must_use]
    pub fn new(id: usize) -> Self {
        Self { id }
    }

    /// Executes the removal, returning the removed point.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if no point has the given global index.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<TagPoint> {
        store.point(self.id)?;
        let removed_id = self.id;

        let before = store.triangles.len();
        store.triangles.retain(|t| !t.contains(removed_id));
        let dropped = before - store.triangles.len();

        for tri in &mut store.triangles {
            for id in &mut tri.ids {
                if *id > removed_id {
                    *id -= 1;
                }
            }
        }

        let point = store.points.remove(removed_id);
        regenerate_edges(store);

        debug!(id = removed_id, dropped_triangles = dropped, "point removed");
        Ok(point)
    }
}
