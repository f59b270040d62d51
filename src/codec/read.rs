use std::collections::BTreeMap;

use tracing::debug;

use crate::error::CodecError;
use crate::math::{Color, Point3};
use crate::topology::{
    LabelTriangle, TagEdge, TagInfo, TagPoint, TagTriangle, TagType, TopologyStore,
};

use super::{
    FieldData, EDGE_STRIDE, LABEL, LABEL_COLOR_STRIDE, LABEL_TRIANGLE_COLOR, LABEL_TRIANGLE_NAME,
    TAG_EDGES, TAG_INFO, TAG_INFO_STRIDE, TAG_NAME, TAG_POINTS, TAG_POINT_STRIDE, TAG_TRIANGLES,
    TRIANGLE_STRIDE,
};

/// Decodes field-data arrays back into a [`TopologyStore`].
///
/// Absent arrays decode to empty collections. Triangle corner positions and
/// anchors are not read back; they are derived from the points.
pub struct CustomDataReader<'a> {
    field: &'a FieldData,
}

impl<'a> CustomDataReader<'a> {
    /// Creates a reader over `field`.
    #[must_use]
    pub fn new(field: &'a FieldData) -> Self {
        Self { field }
    }

    /// Executes the decoding.
    ///
    /// # Errors
    ///
    /// Returns a [`CodecError`] if an array is malformed or references an
    /// entity that does not exist.
    pub fn read(&self) -> Result<TopologyStore, CodecError> {
        let mut store = TopologyStore::new();
        store.label_data = self.numeric(LABEL)?.to_vec();
        store.tag_infos = self.read_tags()?;
        store.points = self.read_points(store.tag_infos.len())?;
        store.labels = self.read_face_labels()?;
        store.triangles = self.read_triangles(store.points.len(), store.labels.len())?;
        store.edges = self.read_edges(store.points.len())?;
        debug!(
            tags = store.tag_infos.len(),
            points = store.points.len(),
            triangles = store.triangles.len(),
            edges = store.edges.len(),
            "custom data read"
        );
        Ok(store)
    }

    fn numeric(&self, name: &'static str) -> Result<&'a [f64], CodecError> {
        match self.field.get(name) {
            None => Ok(&[]),
            Some(_) => self.field.numeric(name).ok_or(CodecError::WrongKind { name }),
        }
    }

    fn text(&self, name: &'static str) -> Result<Option<&'a [String]>, CodecError> {
        match self.field.get(name) {
            None => Ok(None),
            Some(_) => self.field.text(name).map(Some).ok_or(CodecError::WrongKind { name }),
        }
    }

    fn records(
        &self,
        name: &'static str,
        stride: usize,
    ) -> Result<std::slice::ChunksExact<'a, f64>, CodecError> {
        let values = self.numeric(name)?;
        if values.len() % stride != 0 {
            return Err(CodecError::Stride {
                name,
                len: values.len(),
                stride,
            });
        }
        Ok(values.chunks_exact(stride))
    }

    fn read_tags(&self) -> Result<Vec<TagInfo>, CodecError> {
        let Some(names) = self.text(TAG_NAME)? else {
            return Ok(Vec::new());
        };
        if self.field.get(TAG_INFO).is_none() {
            return Err(CodecError::MissingCompanion(TAG_NAME, TAG_INFO));
        }
        let records = self.records(TAG_INFO, TAG_INFO_STRIDE)?;
        if records.len() != names.len() {
            return Err(CodecError::NameCountMismatch {
                numeric: TAG_INFO,
                names: TAG_NAME,
                records: records.len(),
                strings: names.len(),
            });
        }
        records
            .zip(names)
            .map(|(r, name)| -> Result<TagInfo, CodecError> {
                Ok(TagInfo::new(
                    name.clone(),
                    TagType::try_from(to_int(TAG_INFO, r[0])?)?,
                    to_int(TAG_INFO, r[1])?,
                    Color::new(r[2], r[3], r[4]),
                ))
            })
            .collect()
    }

    fn read_points(&self, tag_count: usize) -> Result<Vec<TagPoint>, CodecError> {
        self.records(TAG_POINTS, TAG_POINT_STRIDE)?
            .map(|r| -> Result<TagPoint, CodecError> {
                Ok(TagPoint::new(
                    Point3::new(r[0], r[1], r[2]),
                    r[3],
                    to_int(TAG_POINTS, r[5])?,
                    to_index_below(TAG_POINTS, r[6], tag_count)?,
                    to_index(TAG_POINTS, r[4])?,
                ))
            })
            .collect()
    }

    fn read_face_labels(&self) -> Result<Vec<LabelTriangle>, CodecError> {
        let Some(names) = self.text(LABEL_TRIANGLE_NAME)? else {
            return Ok(Vec::new());
        };
        if self.field.get(LABEL_TRIANGLE_COLOR).is_none() {
            return Err(CodecError::MissingCompanion(LABEL_TRIANGLE_NAME, LABEL_TRIANGLE_COLOR));
        }
        let records = self.records(LABEL_TRIANGLE_COLOR, LABEL_COLOR_STRIDE)?;
        if records.len() != names.len() {
            return Err(CodecError::NameCountMismatch {
                numeric: LABEL_TRIANGLE_COLOR,
                names: LABEL_TRIANGLE_NAME,
                records: records.len(),
                strings: names.len(),
            });
        }
        Ok(records
            .zip(names)
            .map(|(r, name)| LabelTriangle::new(name.clone(), Color::new(r[0], r[1], r[2])))
            .collect())
    }

    fn read_triangles(
        &self,
        point_count: usize,
        label_count: usize,
    ) -> Result<Vec<TagTriangle>, CodecError> {
        self.records(TAG_TRIANGLES, TRIANGLE_STRIDE)?
            .map(|r| -> Result<TagTriangle, CodecError> {
                let id = |v: f64| to_index_below(TAG_TRIANGLES, v, point_count);
                Ok(TagTriangle::new(
                    [id(r[3])?, id(r[8])?, id(r[13])?],
                    to_index_below(TAG_TRIANGLES, r[15], label_count)?,
                ))
            })
            .collect()
    }

    fn read_edges(&self, point_count: usize) -> Result<BTreeMap<u64, TagEdge>, CodecError> {
        let mut edges = BTreeMap::new();
        for (key, r) in (0u64..).zip(self.records(TAG_EDGES, EDGE_STRIDE)?) {
            if r.iter().all(|&v| v == 0.0) {
                continue;
            }
            let edge = TagEdge {
                pt_id1: to_index_below(TAG_EDGES, r[0], point_count)?,
                pt_id2: to_index_below(TAG_EDGES, r[1], point_count)?,
                seq: to_int(TAG_EDGES, r[2])?,
                num_edge: to_count(TAG_EDGES, r[3])?,
                constrain: to_count(TAG_EDGES, r[4])?,
            };
            let expected = edge.key();
            if key != expected {
                return Err(CodecError::EdgeKeyMismatch(edge.pt_id1, edge.pt_id2, key, expected));
            }
            edges.insert(key, edge);
        }
        Ok(edges)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn to_int(name: &'static str, value: f64) -> Result<i64, CodecError> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 {
        Ok(value as i64)
    } else {
        Err(CodecError::InvalidIndex { name, value })
    }
}

fn to_index(name: &'static str, value: f64) -> Result<usize, CodecError> {
    usize::try_from(to_int(name, value)?).map_err(|_| CodecError::InvalidIndex { name, value })
}

fn to_index_below(name: &'static str, value: f64, len: usize) -> Result<usize, CodecError> {
    let index = to_index(name, value)?;
    if index < len {
        Ok(index)
    } else {
        Err(CodecError::InvalidIndex { name, value })
    }
}

fn to_count(name: &'static str, value: f64) -> Result<u32, CodecError> {
    u32::try_from(to_int(name, value)?).map_err(|_| CodecError::InvalidIndex { name, value })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::codec::FieldArray;

    fn field(arrays: Vec<(&str, FieldArray)>) -> FieldData {
        let mut f = FieldData::new();
        for (n, a) in arrays {
            f.insert(n, a);
        }
        f
    }

    #[test]
    fn stride_mismatch() {
        let f = field(vec![(TAG_POINTS, FieldArray::Numeric(vec![0.0; 8]))]);
        assert_eq!(
            CustomDataReader::new(&f).read(),
            Err(CodecError::Stride { name: TAG_POINTS, len: 8, stride: 7 })
        );
    }

    #[test]
    fn names_must_match_records() {
        let f = field(vec![
            (TAG_INFO, FieldArray::Numeric(vec![1.0, 0.0, 0.0, 0.0, 0.0])),
            (TAG_NAME, FieldArray::Text(vec!["a".into(), "b".into()])),
        ]);
        assert!(matches!(
            CustomDataReader::new(&f).read(),
            Err(CodecError::NameCountMismatch { records: 1, strings: 2, .. })
        ));
    }

    #[test]
    fn unknown_tag_type() {
        let f = field(vec![
            (TAG_INFO, FieldArray::Numeric(vec![-1.0, 0.0, 0.0, 0.0, 0.0])),
            (TAG_NAME, FieldArray::Text(vec!["a".into()])),
        ]);
        assert_eq!(CustomDataReader::new(&f).read(), Err(CodecError::UnknownTagType(-1)));
    }

    #[test]
    fn point_with_missing_tag() {
        let f = field(vec![(TAG_POINTS, FieldArray::Numeric(vec![0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0]))]);
        assert!(matches!(
            CustomDataReader::new(&f).read(),
            Err(CodecError::InvalidIndex { name: TAG_POINTS, .. })
        ));
    }

    #[test]
    fn all_zero_edge_record_reads_as_absent() {
        let f = field(vec![
            (TAG_INFO, FieldArray::Numeric(vec![1.0, 0.0, 0.0, 0.0, 0.0])),
            (TAG_NAME, FieldArray::Text(vec!["a".into()])),
            (TAG_POINTS, FieldArray::Numeric(vec![0.0; 7])),
            (TAG_EDGES, FieldArray::Numeric(vec![0.0; 5])),
        ]);
        let store = CustomDataReader::new(&f).read().unwrap();
        assert_eq!(store.points().len(), 1);
        assert!(store.edges().is_empty());
    }

    #[test]
    fn edge_under_wrong_key() {
        let mut values = vec![0.0; 5 * 5];
        // Edge (0, 1) belongs at key 2, not key 1.
        values[5..10].copy_from_slice(&[0.0, 1.0, -1.0, 1.0, 3.0]);
        let f = field(vec![
            (TAG_INFO, FieldArray::Numeric(vec![1.0, 0.0, 0.0, 0.0, 0.0])),
            (TAG_NAME, FieldArray::Text(vec!["a".into()])),
            (TAG_POINTS, FieldArray::Numeric(vec![0.0; 14])),
            (TAG_EDGES, FieldArray::Numeric(values)),
        ]);
        assert_eq!(
            CustomDataReader::new(&f).read(),
            Err(CodecError::EdgeKeyMismatch(0, 1, 1, 2))
        );
    }

    #[test]
    fn wrong_kind() {
        let f = field(vec![(TAG_POINTS, FieldArray::Text(vec![]))]);
        assert_eq!(
            CustomDataReader::new(&f).read(),
            Err(CodecError::WrongKind { name: TAG_POINTS })
        );
    }
}
