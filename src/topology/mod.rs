pub mod edge;
pub mod index_table;
pub mod point;
pub mod tag;
pub mod triangle;

pub use edge::{pair_number, TagEdge, NO_SEQ};
pub use index_table::{PointIndexTable, PointListId};
pub use point::TagPoint;
pub use tag::{LabelTriangle, TagInfo, TagType};
pub use triangle::TagTriangle;

use std::collections::BTreeMap;

use crate::error::LookupError;
use crate::math::Point3;

/// Authoritative in-memory graph of one edited skeleton surface.
///
/// Owns the point-label and face-label catalogs, the flat point sequence,
/// the triangle list and the edge usage ledger keyed by [`pair_number`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopologyStore {
    pub(crate) tag_infos: Vec<TagInfo>,
    pub(crate) labels: Vec<LabelTriangle>,
    pub(crate) points: Vec<TagPoint>,
    pub(crate) triangles: Vec<TagTriangle>,
    pub(crate) edges: BTreeMap<u64, TagEdge>,
    pub(crate) label_data: Vec<f64>,
}

impl TopologyStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Point-label categories ---

    /// Appends a point-label category and returns its index.
    pub fn add_tag_info(&mut self, info: TagInfo) -> usize {
        self.tag_infos.push(info);
        self.tag_infos.len() - 1
    }

    /// All point-label categories, in creation order.
    #[must_use]
    pub fn tag_infos(&self) -> &[TagInfo] {
        &self.tag_infos
    }

    /// Returns the category at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::IndexOutOfRange`] if no such category exists.
    pub fn tag_info(&self, index: usize) -> Result<&TagInfo, LookupError> {
        self.tag_infos
            .get(index)
            .ok_or_else(|| out_of_range("tag", index, self.tag_infos.len()))
    }

    /// Returns the category at `index` mutably.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::IndexOutOfRange`] if no such category exists.
    pub fn tag_info_mut(&mut self, index: usize) -> Result<&mut TagInfo, LookupError> {
        let len = self.tag_infos.len();
        self.tag_infos
            .get_mut(index)
            .ok_or_else(|| out_of_range("tag", index, len))
    }

    // --- Face labels ---

    /// Appends a face label and returns its index.
    pub fn add_label(&mut self, label: LabelTriangle) -> usize {
        self.labels.push(label);
        self.labels.len() - 1
    }

    /// All face labels, in creation order.
    #[must_use]
    pub fn labels(&self) -> &[LabelTriangle] {
        &self.labels
    }

    /// Returns the face label at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::IndexOutOfRange`] if no such label exists.
    pub fn label(&self, index: usize) -> Result<&LabelTriangle, LookupError> {
        self.labels
            .get(index)
            .ok_or_else(|| out_of_range("face label", index, self.labels.len()))
    }

    /// Resolves a face label by its external node identity.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::FaceLabelNotFound`] if no label carries `node_id`.
    pub fn label_index(&self, node_id: &str) -> Result<usize, LookupError> {
        self.labels
            .iter()
            .position(|l| l.node_id == node_id)
            .ok_or_else(|| LookupError::FaceLabelNotFound(node_id.to_owned()))
    }

    /// Returns the face label carrying `node_id` mutably.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::FaceLabelNotFound`] if no label carries `node_id`.
    pub fn label_by_node_mut(&mut self, node_id: &str) -> Result<&mut LabelTriangle, LookupError> {
        self.labels
            .iter_mut()
            .find(|l| l.node_id == node_id)
            .ok_or_else(|| LookupError::FaceLabelNotFound(node_id.to_owned()))
    }

    // --- Points ---

    /// Appends a point and returns its global index.
    pub fn add_point(&mut self, point: TagPoint) -> usize {
        self.points.push(point);
        self.points.len() - 1
    }

    /// All points, indexed by global id.
    #[must_use]
    pub fn points(&self) -> &[TagPoint] {
        &self.points
    }

    /// Returns the point at global index `id`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::IndexOutOfRange`] if no such point exists.
    pub fn point(&self, id: usize) -> Result<&TagPoint, LookupError> {
        self.points
            .get(id)
            .ok_or_else(|| out_of_range("point", id, self.points.len()))
    }

    /// Returns the point at global index `id` mutably.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::IndexOutOfRange`] if no such point exists.
    pub fn point_mut(&mut self, id: usize) -> Result<&mut TagPoint, LookupError> {
        let len = self.points.len();
        self.points
            .get_mut(id)
            .ok_or_else(|| out_of_range("point", id, len))
    }

    /// Returns the category type of the point at `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the point or its category does not exist.
    pub fn point_type(&self, id: usize) -> Result<TagType, LookupError> {
        let point = self.point(id)?;
        Ok(self.tag_info(point.tag)?.tag_type)
    }

    /// Current positions of the three corners of `triangle`.
    ///
    /// # Errors
    ///
    /// Returns an error if the triangle references a missing point.
    pub fn triangle_positions(&self, triangle: &TagTriangle) -> Result<[Point3; 3], LookupError> {
        let [a, b, c] = triangle.ids;
        Ok([self.point(a)?.pos, self.point(b)?.pos, self.point(c)?.pos])
    }

    /// Anchor vertices of the three corners of `triangle`.
    ///
    /// # Errors
    ///
    /// Returns an error if the triangle references a missing point.
    pub fn triangle_seqs(&self, triangle: &TagTriangle) -> Result<[usize; 3], LookupError> {
        let [a, b, c] = triangle.ids;
        Ok([self.point(a)?.seq, self.point(b)?.seq, self.point(c)?.seq])
    }

    // --- Triangles ---

    /// All triangles, in creation order.
    #[must_use]
    pub fn triangles(&self) -> &[TagTriangle] {
        &self.triangles
    }

    /// Returns the triangle at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::IndexOutOfRange`] if no such triangle exists.
    pub fn triangle(&self, index: usize) -> Result<&TagTriangle, LookupError> {
        self.triangles
            .get(index)
            .ok_or_else(|| out_of_range("triangle", index, self.triangles.len()))
    }

    /// Returns the triangle at `index` mutably.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::IndexOutOfRange`] if no such triangle exists.
    pub fn triangle_mut(&mut self, index: usize) -> Result<&mut TagTriangle, LookupError> {
        let len = self.triangles.len();
        self.triangles
            .get_mut(index)
            .ok_or_else(|| out_of_range("triangle", index, len))
    }

    // --- Edges ---

    /// The edge ledger, ordered by pair number.
    #[must_use]
    pub fn edges(&self) -> &BTreeMap<u64, TagEdge> {
        &self.edges
    }

    /// Returns the edge between `a` and `b`, in either order.
    #[must_use]
    pub fn edge(&self, a: usize, b: usize) -> Option<&TagEdge> {
        self.edges.get(&pair_number(a, b))
    }

    // --- Legacy label array ---

    /// Per-reference-vertex label scalars, as last decoded or refreshed.
    #[must_use]
    pub fn label_data(&self) -> &[f64] {
        &self.label_data
    }

    /// Legacy label array for a reference surface with `vertex_count`
    /// vertices: each point writes its anatomical index at its anchor vertex,
    /// everything else is zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn label_data_for(&self, vertex_count: usize) -> Vec<f64> {
        let mut data = vec![0.0; vertex_count];
        for p in &self.points {
            if let Some(slot) = data.get_mut(p.seq) {
                *slot = p.type_index as f64;
            }
        }
        data
    }

    /// Regenerates the stored legacy label array.
    pub fn refresh_label_data(&mut self, vertex_count: usize) -> &[f64] {
        self.label_data = self.label_data_for(vertex_count);
        &self.label_data
    }
}

fn out_of_range(entity: &'static str, index: usize, len: usize) -> LookupError {
    LookupError::IndexOutOfRange { entity, index, len }
}
