use tracing::{debug, warn};

use crate::topology::{pair_number, TopologyStore};

use super::{
    FieldArray, FieldData, EDGE_STRIDE, LABEL, LABEL_COLOR_STRIDE, LABEL_TRIANGLE_COLOR,
    LABEL_TRIANGLE_NAME, TAG_EDGES, TAG_INFO, TAG_INFO_STRIDE, TAG_NAME, TAG_POINTS,
    TAG_POINT_STRIDE, TAG_TRIANGLES, TRIANGLE_STRIDE,
};

/// Encodes a [`TopologyStore`] into field-data arrays.
pub struct CustomDataWriter<'a> {
    store: &'a TopologyStore,
}

impl<'a> CustomDataWriter<'a> {
    /// Creates a writer for `store`.
    #[must_use]
    pub fn new(store: &'a TopologyStore) -> Self {
        Self { store }
    }

    /// Writes every array into `field`, replacing earlier versions.
    ///
    /// `vertex_count` is the size of the reference surface the legacy
    /// `Label` array is laid out on. Empty collections leave no array behind.
    pub fn write(&self, field: &mut FieldData, vertex_count: usize) {
        self.write_label(field, vertex_count);
        self.write_tags(field);
        self.write_points(field);
        self.write_face_labels(field);
        self.write_triangles(field);
        self.write_edges(field);
        debug!(arrays = field.len(), "custom data written");
    }

    fn write_label(&self, field: &mut FieldData, vertex_count: usize) {
        field.remove(LABEL);
        let data = self.store.label_data_for(vertex_count);
        if !data.is_empty() {
            field.insert(LABEL, FieldArray::Numeric(data));
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn write_tags(&self, field: &mut FieldData) {
        field.remove(TAG_INFO);
        field.remove(TAG_NAME);
        let tags = self.store.tag_infos();
        if tags.is_empty() {
            return;
        }
        let mut values = Vec::with_capacity(tags.len() * TAG_INFO_STRIDE);
        for t in tags {
            values.extend([t.tag_type.code() as f64, t.anatomical_index as f64]);
            values.extend(t.color.channels());
        }
        field.insert(TAG_INFO, FieldArray::Numeric(values));
        field.insert(TAG_NAME, FieldArray::Text(tags.iter().map(|t| t.name.clone()).collect()));
    }

    #[allow(clippy::cast_precision_loss)]
    fn write_points(&self, field: &mut FieldData) {
        field.remove(TAG_POINTS);
        let points = self.store.points();
        if points.is_empty() {
            return;
        }
        let mut values = Vec::with_capacity(points.len() * TAG_POINT_STRIDE);
        for p in points {
            values.extend([
                p.pos.x,
                p.pos.y,
                p.pos.z,
                p.radius,
                p.seq as f64,
                p.type_index as f64,
                p.tag as f64,
            ]);
        }
        field.insert(TAG_POINTS, FieldArray::Numeric(values));
    }

    fn write_face_labels(&self, field: &mut FieldData) {
        field.remove(LABEL_TRIANGLE_NAME);
        field.remove(LABEL_TRIANGLE_COLOR);
        let labels = self.store.labels();
        if labels.is_empty() {
            return;
        }
        let names = labels.iter().map(|l| l.name.clone()).collect();
        let mut colors = Vec::with_capacity(labels.len() * LABEL_COLOR_STRIDE);
        for l in labels {
            colors.extend(l.color.channels());
        }
        field.insert(LABEL_TRIANGLE_NAME, FieldArray::Text(names));
        field.insert(LABEL_TRIANGLE_COLOR, FieldArray::Numeric(colors));
    }

    /// Corner positions and anchors are written from the current points.
    #[allow(clippy::cast_precision_loss)]
    fn write_triangles(&self, field: &mut FieldData) {
        field.remove(TAG_TRIANGLES);
        let triangles = self.store.triangles();
        if triangles.is_empty() {
            return;
        }
        let mut values = Vec::with_capacity(triangles.len() * TRIANGLE_STRIDE);
        for tri in triangles {
            for &id in &tri.ids {
                match self.store.point(id) {
                    Ok(p) => values.extend([p.pos.x, p.pos.y, p.pos.z, id as f64, p.seq as f64]),
                    Err(err) => {
                        warn!(%err, "triangle corner has no point");
                        values.extend([0.0, 0.0, 0.0, id as f64, 0.0]);
                    }
                }
            }
            values.push(tri.label as f64);
        }
        field.insert(TAG_TRIANGLES, FieldArray::Numeric(values));
    }

    /// Dense layout: record `k` belongs to the edge whose pair number is `k`,
    /// for every key up to `pair_number(n, n)` with `n` points.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn write_edges(&self, field: &mut FieldData) {
        field.remove(TAG_EDGES);
        let n = self.store.points().len();
        if n == 0 {
            return;
        }
        let records = pair_number(n, n) as usize + 1;
        let mut values = vec![0.0; records * EDGE_STRIDE];
        for (&key, edge) in self.store.edges() {
            let Some(slot) = values.get_mut(key as usize * EDGE_STRIDE..(key as usize + 1) * EDGE_STRIDE)
            else {
                warn!(key, "edge key beyond the dense edge table");
                continue;
            };
            slot.copy_from_slice(&[
                edge.pt_id1 as f64,
                edge.pt_id2 as f64,
                edge.seq as f64,
                f64::from(edge.num_edge),
                f64::from(edge.constrain),
            ]);
        }
        field.insert(TAG_EDGES, FieldArray::Numeric(values));
    }
}
