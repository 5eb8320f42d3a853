//! Error types for section and polar construction.

use thiserror::Error;

/// Result type alias for section operations.
pub type SectionResult<T> = Result<T, SectionError>;

/// Errors that can occur when building sections and their aerodynamic models.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SectionError {
    /// Polar arrays do not all have the same length.
    #[error("polar shape mismatch: {0}")]
    ShapeMismatch(String),

    /// The angle-of-attack grid is not strictly increasing.
    #[error("polar alpha grid is not strictly increasing at index {index}")]
    NonMonotoneAlpha {
        /// Index of the first offending entry.
        index: usize,
    },

    /// A polar still contains NaN after NaN-row removal was applied (or when
    /// strict construction was requested).
    #[error("polar contains NaN after cleanup in column {column}")]
    NanAfterCleanup {
        /// Name of the offending column (`alpha`, `cl`, `cd` or `cm`).
        column: &'static str,
    },

    /// Every entry of a polar grid is NaN; hole filling has nothing to work
    /// from.
    #[error("polar grid has no finite entries to interpolate from")]
    AllNan,

    /// A polar table or grid would be empty after construction.
    #[error("polar has no rows after construction")]
    Empty,

    /// Two section models cannot be blended along the span because their
    /// tabulation grids differ.
    #[error("incompatible section aero models: {0}")]
    IncompatibleSectionAero(String),

    /// The chord vector of a section is zero.
    #[error("section has zero-length chord")]
    DegenerateChord,
}

impl SectionError {
    /// Create a shape mismatch error.
    #[must_use]
    pub fn shape_mismatch(details: impl Into<String>) -> Self {
        Self::ShapeMismatch(details.into())
    }

    /// Create an incompatible-models error.
    #[must_use]
    pub fn incompatible(details: impl Into<String>) -> Self {
        Self::IncompatibleSectionAero(details.into())
    }
}
