use std::fmt;

use crate::error::CodecError;
use crate::math::Color;

/// Anatomical point category. Governs how many triangles may share an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagType {
    /// Point where several skeleton sheets meet.
    Branch,
    /// Point on the free boundary curve of a sheet.
    FreeEdge,
    /// Point inside a sheet.
    Interior,
    /// Any other landmark. Cannot take part in edges.
    Other,
}

impl TagType {
    /// Numeric code used in persisted field data.
    #[must_use]
    pub fn code(self) -> i64 {
        match self {
            Self::Branch => 1,
            Self::FreeEdge => 2,
            Self::Interior => 3,
            Self::Other => 4,
        }
    }
}

impl TryFrom<i64> for TagType {
    type Error = CodecError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Branch),
            2 => Ok(Self::FreeEdge),
            3 => Ok(Self::Interior),
            4 => Ok(Self::Other),
            other => Err(CodecError::UnknownTagType(other)),
        }
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Branch => "Branch",
            Self::FreeEdge => "Free Edge",
            Self::Interior => "Interior",
            Self::Other => "Other",
        };
        f.write_str(name)
    }
}

/// A point-label category.
///
/// Every placed point belongs to exactly one category, referenced by its
/// position in the store's tag sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct TagInfo {
    pub name: String,
    pub tag_type: TagType,
    /// User-assigned anatomical index. Not required to be unique.
    pub anatomical_index: i64,
    pub color: Color,
    /// Identity of the external label node this category mirrors.
    pub node_id: String,
}

impl TagInfo {
    /// Creates a category with no external node attached.
    #[must_use]
    pub fn new(name: impl Into<String>, tag_type: TagType, anatomical_index: i64, color: Color) -> Self {
        Self {
            name: name.into(),
            tag_type,
            anatomical_index,
            color,
            node_id: String::new(),
        }
    }

    /// Attaches the external node identity.
    #[must_use]
    pub fn with_node_id(mut self, node_id: impl Into<String>) -> Self {
        self.node_id = node_id.into();
        self
    }
}

/// A triangle face-label category.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelTriangle {
    pub name: String,
    pub color: Color,
    pub node_id: String,
}

impl LabelTriangle {
    /// Creates a face label with an empty node id.
    #[must_use]
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
            node_id: String::new(),
        }
    }

    /// Sets the node id of the owning interface element.
    #[must_use]
    pub fn with_node_id(mut self, node_id: impl Into<String>) -> Self {
        self.node_id = node_id.into();
        self
    }
}
