/// Convenience result type used across facewarp.
pub type FaceWarpResult<T> = Result<T, FaceWarpError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum FaceWarpError {
    /// Not enough usable points or a triangle with (near) zero area.
    #[error("insufficient geometry: {0}")]
    InsufficientGeometry(String),

    /// A triangle vertex could not be resolved to exactly one landmark index.
    #[error("ambiguous correspondence for vertex ({x}, {y}): {candidates} candidate landmarks")]
    CorrespondenceAmbiguous {
        /// Vertex x coordinate.
        x: f64,
        /// Vertex y coordinate.
        y: f64,
        /// Number of landmarks that matched equally well (0 when none matched).
        candidates: usize,
    },

    /// Inputs that must agree in size do not.
    #[error("size mismatch for {what}: expected {expected}, got {actual}")]
    SizeMismatch {
        /// What was being compared.
        what: &'static str,
        /// Size of the reference input.
        expected: usize,
        /// Size of the offending input.
        actual: usize,
    },

    /// The face detector produced no usable face.
    #[error("no face detected: {0}")]
    NoFace(String),

    /// Invalid caller-provided data or settings.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FaceWarpError {
    /// Build a [`FaceWarpError::InsufficientGeometry`] value.
    pub fn insufficient_geometry(msg: impl Into<String>) -> Self {
        Self::InsufficientGeometry(msg.into())
    }

    /// Build a [`FaceWarpError::SizeMismatch`] value.
    pub fn size_mismatch(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            what,
            expected,
            actual,
        }
    }

    /// Build a [`FaceWarpError::NoFace`] value.
    pub fn no_face(msg: impl Into<String>) -> Self {
        Self::NoFace(msg.into())
    }

    /// Build a [`FaceWarpError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// `true` for errors that only invalidate a single triangle.
    pub fn is_local_geometry(&self) -> bool {
        matches!(self, Self::InsufficientGeometry(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
