use thiserror::Error;

/// Top-level error type for skeleton mesh construction.
#[derive(Debug, Error)]
pub enum SkeletonError {
    #[error(transparent)]
    Constraint(#[from] ConstraintViolation),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// A requested topology change that would break the skeleton construction rules.
///
/// The `Display` output is the message shown to the user. A violation never
/// leaves the store partially modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintViolation {
    #[error(
        "Edge number {edge} already has {count} connection(s) and can only have {max} connection(s) maximum."
    )]
    EdgeCapacity { edge: usize, count: u32, max: u32 },

    #[error("Cannot use edge points from different lists")]
    FreeEdgeDifferentLists,

    #[error("Violation: Only directly neighboring edge points can be connected.")]
    FreeEdgeNotAdjacent,

    #[error("Cannot use three points of type 'Free Edge' to create triangle")]
    ThreeFreeEdges,

    #[error("points of type '{0}' cannot be connected by an edge")]
    UnsupportedPointType(String),

    #[error("a triangle needs three distinct points")]
    DegenerateTriangle,
}

/// A reference that could not be resolved against the current session state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("No valid triangle label found: {0}")]
    FaceLabelNotFound(String),

    #[error("point {local} of list {list} is not registered")]
    PointNotFound { list: String, local: usize },

    #[error("unknown point list")]
    UnknownPointList,

    #[error("point label not found: {0}")]
    TagNotFound(String),

    #[error("{entity} index {index} is out of range (len {len})")]
    IndexOutOfRange {
        entity: &'static str,
        index: usize,
        len: usize,
    },
}

/// Errors raised while decoding field-data arrays.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    #[error("array {name} has {len} values, not a multiple of {stride}")]
    Stride {
        name: &'static str,
        len: usize,
        stride: usize,
    },

    #[error("array {numeric} holds {records} records but {names} holds {strings} names")]
    NameCountMismatch {
        numeric: &'static str,
        names: &'static str,
        records: usize,
        strings: usize,
    },

    #[error("array {0} is missing its companion array {1}")]
    MissingCompanion(&'static str, &'static str),

    #[error("array {name} has the wrong kind of values")]
    WrongKind { name: &'static str },

    #[error("unknown point type code {0}")]
    UnknownTagType(i64),

    #[error("value {value} in array {name} is not a valid index")]
    InvalidIndex { name: &'static str, value: f64 },

    #[error("edge ({0}, {1}) is stored under key {2}, expected {3}")]
    EdgeKeyMismatch(usize, usize, u64, u64),
}

/// Failures reported by an external mesh service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("inflation failed: {0}")]
    Inflation(String),

    #[error("subdivision failed: {0}")]
    Subdivision(String),
}

/// Convenience type alias for results using [`SkeletonError`].
pub type Result<T> = std::result::Result<T, SkeletonError>;
