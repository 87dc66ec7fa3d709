use thiserror::Error;

/// Errors reported before mesh extraction starts.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum MeshError {
    #[error("target resolution must be finite and positive, got {0}")]
    InvalidResolution(f64),

    #[error("initial span must be finite and positive, got {0}")]
    InvalidSpan(f64),

    #[error("merge distance must be finite and non-negative, got {0}")]
    InvalidMergeDistance(f64),
}
