/// Convenience result type used across detsynth.
pub type SynthResult<T> = Result<T, SynthError>;

/// Top-level error taxonomy used by generator APIs.
#[derive(thiserror::Error, Debug)]
pub enum SynthError {
    /// Invalid user-provided configuration or input pools.
    #[error("validation error: {0}")]
    Validation(String),

    /// A source image could not be read or decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Geometric computation failed (degenerate input, bad buffer sizes).
    #[error("geometry error: {0}")]
    Geometry(String),

    /// The homography solver was handed a correspondence set that is not exactly four points.
    #[error("homography needs exactly 4 point correspondences, got {0}")]
    InvalidCorrespondenceCount(usize),

    /// The correspondence system has no unique solution (collinear or repeated points).
    #[error("homography system is singular")]
    SingularTransform,

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SynthError {
    /// Build a [`SynthError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SynthError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`SynthError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
