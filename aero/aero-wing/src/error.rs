//! Error types for wing construction and refinement.

use aero_types::SectionError;
use thiserror::Error;

/// Result type alias for wing operations.
pub type WingResult<T> = Result<T, WingError>;

/// Errors that can occur while assembling or refining a wing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WingError {
    /// A wing must have at least one panel.
    #[error("wing needs at least one panel, got {0}")]
    InvalidPanelCount(usize),

    /// A wing must have at least two sections before refinement.
    #[error("wing needs at least two sections, got {0}")]
    TooFewSections(usize),

    /// The `Unchanged` distribution requires exactly `n_panels + 1` sections.
    #[error("unchanged distribution needs exactly {expected} sections, got {actual}")]
    SectionCountMismatch {
        /// Required section count (`n_panels + 1`).
        expected: usize,
        /// Sections actually provided.
        actual: usize,
    },

    /// `SplitProvided` cannot drop user stations; the panel count must allow
    /// at least one panel per user segment.
    #[error("split_provided needs at least {required} refined sections, got {actual}")]
    TooFewPanelsForSplit {
        /// Minimum refined section count (user section count).
        required: usize,
        /// Refined sections the panel count allows (`n_panels + 1`).
        actual: usize,
    },

    /// Two sections project onto the same spanwise station; the refinement
    /// cannot produce a strictly monotone mesh from them.
    #[error("sections {0} and {1} share the same span station")]
    DuplicateSpanStation(usize, usize),

    /// The refined mesh failed the strict monotonicity invariant.
    #[error("refined sections are not strictly monotone along the span")]
    NonMonotoneRefinement,

    /// The spanwise direction must be a nonzero vector.
    #[error("spanwise direction must be a nonzero finite vector")]
    InvalidSpanwiseDirection,

    /// A section or its aerodynamic model is invalid.
    #[error(transparent)]
    Section(#[from] SectionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WingError::InvalidPanelCount(0);
        assert!(format!("{err}").contains("at least one panel"));

        let err = WingError::SectionCountMismatch {
            expected: 5,
            actual: 3,
        };
        assert!(format!("{err}").contains("exactly 5"));

        let err = WingError::Section(SectionError::DegenerateChord);
        assert!(format!("{err}").contains("zero-length"));
    }
}
