use std::collections::HashMap;

slotmap::new_key_type! {
    /// Unique identifier for an external point list.
    pub struct PointListId;
}

/// Maps `(point list, local index)` to the global point index.
///
/// Points are entered through one list per category, while edges and
/// triangles address them in one flat namespace.
#[derive(Debug, Clone, Default)]
pub struct PointIndexTable {
    entries: HashMap<(PointListId, usize), usize>,
}

impl PointIndexTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps the local index of a list point to its global index.
    pub fn insert(&mut self, list: PointListId, local: usize, global: usize) {
        self.entries.insert((list, local), global);
    }

    /// Global index of a list point.
    #[must_use]
    pub fn get(&self, list: PointListId, local: usize) -> Option<usize> {
        self.entries.get(&(list, local)).copied()
    }

    /// Number of registered points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no point is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forgets every point.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drops the entry for a removed point and renumbers the rest.
    ///
    /// Global indices above `global` move down by one, as do local indices
    /// above `local` within the same list. Returns the removed global index.
    pub fn remove(&mut self, list: PointListId, local: usize) -> Option<usize> {
        let global = self.entries.remove(&(list, local))?;
        self.entries = std::mem::take(&mut self.entries)
            .into_iter()
            .map(|((l, idx), g)| {
                let g = if g > global { g - 1 } else { g };
                let idx = if l == list && idx > local { idx - 1 } else { idx };
                ((l, idx), g)
            })
            .collect();
        Some(global)
    }
}
