use thiserror::Error;

use crate::section::FeatureId;

/// Top-level error type for section construction and analysis.
#[derive(Debug, Error)]
pub enum SectionError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Material(#[from] MaterialError),

    #[error(transparent)]
    Structure(#[from] StructureError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("flange width is too large: span [{start}, {end}] exceeds boundary [{min}, {max}]")]
    FlangeTooWide {
        start: f64,
        end: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("ring is wound counter-clockwise where clockwise winding is required")]
    WindingMismatch,

    #[error("geometry must be a polygon or a collection of polygons, not {0}")]
    UnsupportedShape(&'static str),
}

/// Errors related to geometric operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),

    #[error("not implemented: {0}")]
    NotImplemented(&'static str),
}

/// Errors related to the shape of a feature's material definition.
#[derive(Debug, Error)]
pub enum MaterialError {
    #[error("{feature} requires a single material, got a flange/web mapping")]
    CompositeNotSupported { feature: &'static str },

    #[error("material mapping is missing the `{0}` entry")]
    MissingPart(&'static str),

    #[error("material mapping has unknown entry `{0}`, expected `flange` or `web`")]
    UnknownPart(String),
}

/// Errors related to the feature list of a section.
#[derive(Debug, Error)]
pub enum StructureError {
    #[error("no feature {0:?} found in section")]
    FeatureNotFound(FeatureId),

    #[error("feature {0:?} is not tracked by this section")]
    UntrackedFeature(FeatureId),

    #[error("insert index {index} is out of bounds for {len} features")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Convenience type alias for results using [`SectionError`].
pub type Result<T> = std::result::Result<T, SectionError>;
