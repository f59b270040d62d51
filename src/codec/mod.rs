//! Flat-array encoding of a [`TopologyStore`](crate::topology::TopologyStore).
//!
//! Each entity sequence is packed into one numeric array with a fixed
//! per-record stride, plus a parallel string array for names. The arrays are
//! attached to a surface's field data, so a skeleton construction travels
//! with the surface it was built on.
//!
//! | array                | kind    | stride | record                                            |
//! |----------------------|---------|--------|---------------------------------------------------|
//! | `Label`              | numeric | 1      | anatomical index per reference vertex             |
//! | `TagInfo`            | numeric | 5      | `type, anatomicalIndex, r, g, b`                  |
//! | `TagName`            | string  | 1      | category name                                     |
//! | `TagPoints`          | numeric | 7      | `x, y, z, radius, seq, typeIndex, tag`            |
//! | `LabelTriangleName`  | string  | 1      | face label name                                   |
//! | `LabelTriangleColor` | numeric | 3      | `r, g, b`                                         |
//! | `TagTriangles`       | numeric | 16     | `(x, y, z, id, seq) x 3, label`                   |
//! | `TagEdges`           | numeric | 5      | `id1, id2, seq, numEdge, constrain` at pair key   |
//!
//! `TagEdges` is dense: record `k` holds the edge whose pair number is `k`,
//! and unused keys are zero-filled. An all-zero record therefore reads back
//! as "no edge".

mod field;
mod read;
pub mod vtk;
mod write;

pub use field::{FieldArray, FieldData};
pub use read::CustomDataReader;
pub use write::CustomDataWriter;

pub const LABEL: &str = "Label";
pub const TAG_INFO: &str = "TagInfo";
pub const TAG_NAME: &str = "TagName";
pub const TAG_POINTS: &str = "TagPoints";
pub const LABEL_TRIANGLE_NAME: &str = "LabelTriangleName";
pub const LABEL_TRIANGLE_COLOR: &str = "LabelTriangleColor";
pub const TAG_TRIANGLES: &str = "TagTriangles";
pub const TAG_EDGES: &str = "TagEdges";

pub(crate) const TAG_INFO_STRIDE: usize = 5;
pub(crate) const TAG_POINT_STRIDE: usize = 7;
pub(crate) const LABEL_COLOR_STRIDE: usize = 3;
pub(crate) const TRIANGLE_STRIDE: usize = 16;
pub(crate) const EDGE_STRIDE: usize = 5;
