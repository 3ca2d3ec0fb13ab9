//! Error types for the metcharts crates.

use thiserror::Error;

/// Result type alias using ChartError.
pub type ChartResult<T> = Result<T, ChartError>;

/// Primary error type for chart construction and rendering.
#[derive(Debug, Error)]
pub enum ChartError {
    // === Data errors ===
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Ensemble must have at least one member and one lead time")]
    EmptyEnsemble,

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    // === Style errors ===
    #[error("Unknown variable family: {0}")]
    UnknownFamily(String),

    #[error("Invalid style definition: {0}")]
    InvalidStyle(String),

    // === Rendering errors ===
    #[error("Rendering failed: {0}")]
    RenderError(String),

    #[error("Projection error: {0}")]
    ProjectionError(String),

    #[error("PNG encoding failed: {0}")]
    EncodeError(String),

    // === Infrastructure errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
