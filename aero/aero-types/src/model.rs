//! The sectional aerodynamic model attached to a wing station.

use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{SectionError, SectionResult};
use crate::grid::PolarGrid;
use crate::lei::LeiAirfoil;
use crate::polar::PolarTable;

/// Sectional coefficients returned by a single model query.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AeroCoefficients {
    /// Lift coefficient.
    pub cl: f64,
    /// Drag coefficient.
    pub cd: f64,
    /// Moment coefficient.
    pub cm: f64,
}

/// The 2-D aerodynamic model of a wing section.
///
/// A closed set of variants keeps dispatch to a single branch per panel
/// query. All lookups take the angle of attack (radians) and a control
/// deflection (radians); models without a deflection axis ignore `delta`.
///
/// # Example
///
/// ```
/// use aero_types::SectionModel;
///
/// let model = SectionModel::Inviscid;
/// let alpha = 0.2_f64;
/// assert!((model.cl(alpha, 0.0) - 2.0 * std::f64::consts::PI * alpha.sin()).abs() < 1e-12);
/// assert_eq!(model.cd(alpha, 0.0), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SectionModel {
    /// Thin-airfoil result `cl = 2 pi sin(alpha)`, zero drag and moment.
    Inviscid,
    /// 1-D polar over angle of attack.
    PolarVectors(PolarTable),
    /// 2-D polar over angle of attack and deflection.
    PolarMatrices(PolarGrid),
    /// Analytic leading-edge-inflatable airfoil fit.
    LeiBreukels(LeiAirfoil),
}

impl SectionModel {
    /// Lift coefficient at `(alpha, delta)`.
    #[must_use]
    pub fn cl(&self, alpha: f64, delta: f64) -> f64 {
        match self {
            Self::Inviscid => 2.0 * PI * alpha.sin(),
            Self::PolarVectors(table) => table.cl(alpha),
            Self::PolarMatrices(grid) => grid.cl(alpha, delta),
            Self::LeiBreukels(airfoil) => airfoil.cl(alpha),
        }
    }

    /// Drag coefficient at `(alpha, delta)`.
    #[must_use]
    pub fn cd(&self, alpha: f64, delta: f64) -> f64 {
        match self {
            Self::Inviscid => 0.0,
            Self::PolarVectors(table) => table.cd(alpha),
            Self::PolarMatrices(grid) => grid.cd(alpha, delta),
            Self::LeiBreukels(airfoil) => airfoil.cd(alpha),
        }
    }

    /// Moment coefficient at `(alpha, delta)`.
    #[must_use]
    pub fn cm(&self, alpha: f64, delta: f64) -> f64 {
        match self {
            Self::Inviscid => 0.0,
            Self::PolarVectors(table) => table.cm(alpha),
            Self::PolarMatrices(grid) => grid.cm(alpha, delta),
            Self::LeiBreukels(airfoil) => airfoil.cm(alpha),
        }
    }

    /// All three coefficients in one query.
    #[must_use]
    pub fn coefficients(&self, alpha: f64, delta: f64) -> AeroCoefficients {
        AeroCoefficients {
            cl: self.cl(alpha, delta),
            cd: self.cd(alpha, delta),
            cm: self.cm(alpha, delta),
        }
    }

    /// Blend two section models for a station at fraction `t` between them.
    ///
    /// LEI airfoils interpolate their two shape parameters. Tabulated models
    /// interpolate coefficients entrywise and require matching grids. An
    /// `Inviscid` endpoint is promoted to a zeroed table or grid on the
    /// partner's grid before blending, so a polar wing may fade into an
    /// uncambered tip.
    ///
    /// # Errors
    ///
    /// Returns [`SectionError::IncompatibleSectionAero`] when the variants
    /// cannot be combined or their grids differ.
    pub fn blend(a: &Self, b: &Self, t: f64) -> SectionResult<Self> {
        match (a, b) {
            (Self::Inviscid, Self::Inviscid) => Ok(Self::Inviscid),
            (Self::LeiBreukels(x), Self::LeiBreukels(y)) => {
                Ok(Self::LeiBreukels(LeiAirfoil::blend(x, y, t)))
            }
            (Self::PolarVectors(x), Self::PolarVectors(y)) => {
                Ok(Self::PolarVectors(PolarTable::blend(x, y, t)?))
            }
            (Self::PolarMatrices(x), Self::PolarMatrices(y)) => {
                Ok(Self::PolarMatrices(PolarGrid::blend(x, y, t)?))
            }
            (Self::Inviscid, Self::PolarVectors(y)) => {
                let zero = PolarTable::zeroed_like(y);
                Ok(Self::PolarVectors(PolarTable::blend(&zero, y, t)?))
            }
            (Self::PolarVectors(x), Self::Inviscid) => {
                let zero = PolarTable::zeroed_like(x);
                Ok(Self::PolarVectors(PolarTable::blend(x, &zero, t)?))
            }
            (Self::Inviscid, Self::PolarMatrices(y)) => {
                let zero = PolarGrid::zeroed_like(y);
                Ok(Self::PolarMatrices(PolarGrid::blend(&zero, y, t)?))
            }
            (Self::PolarMatrices(x), Self::Inviscid) => {
                let zero = PolarGrid::zeroed_like(x);
                Ok(Self::PolarMatrices(PolarGrid::blend(x, &zero, t)?))
            }
            (x, y) => Err(SectionError::incompatible(format!(
                "{} cannot blend with {}",
                x.kind_name(),
                y.kind_name()
            ))),
        }
    }

    /// Short variant name for messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Inviscid => "inviscid",
            Self::PolarVectors(_) => "polar_vectors",
            Self::PolarMatrices(_) => "polar_matrices",
            Self::LeiBreukels(_) => "lei_airfoil_breukels",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn short_table(scale: f64) -> PolarTable {
        PolarTable::new(
            vec![-0.2, 0.0, 0.2],
            vec![-scale, 0.0, scale],
            vec![0.01, 0.01, 0.01],
            vec![0.0, 0.0, 0.0],
        )
        .unwrap()
    }

    #[test]
    fn inviscid_is_thin_airfoil_theory() {
        let model = SectionModel::Inviscid;
        let alpha = 0.3_f64;
        assert!((model.cl(alpha, 0.0) - 2.0 * PI * alpha.sin()).abs() < 1e-12);
        assert_eq!(model.cd(alpha, 0.0), 0.0);
        assert_eq!(model.cm(alpha, 0.0), 0.0);
    }

    #[test]
    fn coefficients_bundle_matches_single_queries() {
        let model = SectionModel::PolarVectors(short_table(1.0));
        let c = model.coefficients(0.1, 0.0);
        assert!((c.cl - model.cl(0.1, 0.0)).abs() < 1e-15);
        assert!((c.cd - model.cd(0.1, 0.0)).abs() < 1e-15);
        assert!((c.cm - model.cm(0.1, 0.0)).abs() < 1e-15);
    }

    #[test]
    fn blend_of_matching_tables() {
        let a = SectionModel::PolarVectors(short_table(1.0));
        let b = SectionModel::PolarVectors(short_table(2.0));
        let mid = SectionModel::blend(&a, &b, 0.5).unwrap();
        assert!((mid.cl(0.2, 0.0) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn inviscid_promotes_to_zeroed_table() {
        let polar = SectionModel::PolarVectors(short_table(1.0));
        let mid = SectionModel::blend(&SectionModel::Inviscid, &polar, 0.5).unwrap();
        // Halfway between a zeroed table and the polar
        assert!((mid.cl(0.2, 0.0) - 0.5).abs() < 1e-12);
        // cd blends too
        assert!((mid.cd(0.0, 0.0) - 0.005).abs() < 1e-12);
    }

    #[test]
    fn lei_blend_interpolates_shape() {
        let a = SectionModel::LeiBreukels(LeiAirfoil::new(0.0, 0.0));
        let b = SectionModel::LeiBreukels(LeiAirfoil::new(4.0, 1.0));
        let mid = SectionModel::blend(&a, &b, 0.5).unwrap();
        match mid {
            SectionModel::LeiBreukels(airfoil) => {
                assert!((airfoil.tube_diameter - 2.0).abs() < 1e-12);
                assert!((airfoil.camber_height - 0.5).abs() < 1e-12);
            }
            other => panic!("expected LEI variant, got {}", other.kind_name()),
        }
    }

    #[test]
    fn incompatible_variants_refuse_to_blend() {
        let a = SectionModel::PolarVectors(short_table(1.0));
        let b = SectionModel::LeiBreukels(LeiAirfoil::new(0.1, 0.05));
        let err = SectionModel::blend(&a, &b, 0.5).unwrap_err();
        assert!(matches!(err, SectionError::IncompatibleSectionAero(_)));
    }
}
