use thiserror::Error;

/// Top-level error type for the Euclis geometry kernel.
#[derive(Debug, Error)]
pub enum EuclisError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors raised when a primitive cannot be constructed from its inputs.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("zero-length vector")]
    ZeroVector,

    #[error("coincident points")]
    CoincidentPoints,

    #[error("collinear points")]
    CollinearPoints,

    #[error("points are not coplanar")]
    NotCoplanar,

    #[error("corners do not form a rectangle")]
    NotRectangle,

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors raised by queries and transformations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not implemented: {0}")]
    Unsupported(&'static str),
}

/// Convenience type alias for results using [`EuclisError`].
pub type Result<T> = std::result::Result<T, EuclisError>;
