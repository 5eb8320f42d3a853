//! Spanwise wing station type.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{SectionError, SectionResult};
use crate::model::SectionModel;

/// A wing station: leading and trailing edge points plus the sectional
/// aerodynamic model that applies there.
///
/// The chord vector `TE - LE` must be nonzero; [`Section::validate`] is
/// called by the wing crate before any geometry is derived.
///
/// # Example
///
/// ```
/// use aero_types::{Point3, Section, SectionModel};
///
/// let section = Section::new(
///     Point3::new(0.0, 2.0, 0.0),
///     Point3::new(1.5, 2.0, 0.0),
///     SectionModel::Inviscid,
/// );
/// assert!((section.chord_length() - 1.5).abs() < 1e-12);
/// let qc = section.quarter_chord();
/// assert!((qc.x - 0.375).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Section {
    /// Leading edge point.
    pub leading_edge: Point3<f64>,
    /// Trailing edge point.
    pub trailing_edge: Point3<f64>,
    /// Sectional aerodynamic model.
    pub model: SectionModel,
}

impl Section {
    /// Create a section from its edge points and aerodynamic model.
    #[inline]
    #[must_use]
    pub const fn new(
        leading_edge: Point3<f64>,
        trailing_edge: Point3<f64>,
        model: SectionModel,
    ) -> Self {
        Self {
            leading_edge,
            trailing_edge,
            model,
        }
    }

    /// The chord vector, pointing from leading to trailing edge.
    #[inline]
    #[must_use]
    pub fn chord_vector(&self) -> Vector3<f64> {
        self.trailing_edge - self.leading_edge
    }

    /// The chord length.
    #[inline]
    #[must_use]
    pub fn chord_length(&self) -> f64 {
        self.chord_vector().norm()
    }

    /// The quarter-chord point, `LE + 0.25 (TE - LE)`.
    #[inline]
    #[must_use]
    pub fn quarter_chord(&self) -> Point3<f64> {
        self.leading_edge + 0.25 * self.chord_vector()
    }

    /// Check the section invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SectionError::DegenerateChord`] if the chord vector is zero
    /// or not finite.
    pub fn validate(&self) -> SectionResult<()> {
        let chord = self.chord_vector();
        if !chord.iter().all(|c| c.is_finite()) || chord.norm_squared() <= f64::EPSILON {
            return Err(SectionError::DegenerateChord);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_chord_position() {
        let section = Section::new(
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
            SectionModel::Inviscid,
        );
        let qc = section.quarter_chord();
        assert!((qc.x - 1.5).abs() < 1e-12);
        assert!(section.validate().is_ok());
    }

    #[test]
    fn zero_chord_is_degenerate() {
        let section = Section::new(
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(1.0, 2.0, 3.0),
            SectionModel::Inviscid,
        );
        assert_eq!(section.validate(), Err(SectionError::DegenerateChord));
    }

    #[test]
    fn non_finite_chord_is_degenerate() {
        let section = Section::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(f64::NAN, 0.0, 0.0),
            SectionModel::Inviscid,
        );
        assert_eq!(section.validate(), Err(SectionError::DegenerateChord));
    }
}
