//! Analytic polar model for leading-edge-inflatable (LEI) kite airfoils.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::polar::lerp;

// Regression constants of the Breukels LEI airfoil model. The fit is a cubic
// in angle of attack (degrees) for lift and quadratics for drag and moment,
// with coefficients that are themselves polynomials in the dimensionless tube
// diameter and maximum camber height.
const C20: f64 = -0.008_011;
const C21: f64 = -0.000_336;
const C22: f64 = 0.000_992;
const C23: f64 = 0.013_936;
const C24: f64 = -0.003_838;
const C25: f64 = -0.000_161;
const C26: f64 = 0.001_243;
const C27: f64 = -0.009_288;
const C28: f64 = -0.002_124;
const C29: f64 = 0.012_267;
const C30: f64 = -0.002_398;
const C31: f64 = -0.000_274;
const C32: f64 = 0.0;
const C33: f64 = 0.0;
const C34: f64 = 0.0;
const C35: f64 = -3.371_000;
const C36: f64 = 0.858_039;
const C37: f64 = 0.141_600;
const C38: f64 = 7.201_140;
const C39: f64 = -0.676_007;
const C40: f64 = 0.806_629;
const C41: f64 = 0.170_454;
const C42: f64 = -0.390_563;
const C43: f64 = 0.101_966;
const C44: f64 = 0.546_094;
const C45: f64 = 0.022_247;
const C46: f64 = -0.071_462;
const C47: f64 = -0.006_527;
const C48: f64 = 0.002_733;
const C49: f64 = 0.000_686;
const C50: f64 = 0.123_685;
const C51: f64 = 0.143_755;
const C52: f64 = 0.495_159;
const C53: f64 = -0.105_362;
const C54: f64 = 0.033_468;
const C55: f64 = -0.284_793;
const C56: f64 = -0.026_199;
const C57: f64 = -0.024_060;
const C58: f64 = 0.000_559;
const C59: f64 = -1.787_703;
const C60: f64 = 0.352_443;
const C61: f64 = -0.839_323;
const C62: f64 = 0.137_932;

/// Beyond this incidence (degrees) the fit hands over to a flat-plate model.
const STALL_LIMIT_DEG: f64 = 20.0;

/// Analytic LEI airfoil described by two shape parameters.
///
/// `tube_diameter` and `camber_height` are dimensionless (normalized by
/// chord). Coefficient queries take the angle of attack in **radians** like
/// the tabulated models; the regression operates on degrees internally.
///
/// # Example
///
/// ```
/// use aero_types::LeiAirfoil;
///
/// let airfoil = LeiAirfoil::new(0.1, 0.08);
/// let cl0 = airfoil.cl(0.0);
/// let cl5 = airfoil.cl(5.0_f64.to_radians());
/// assert!(cl5 > cl0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LeiAirfoil {
    /// Inflatable tube diameter as a fraction of chord.
    pub tube_diameter: f64,
    /// Maximum camber height as a fraction of chord.
    pub camber_height: f64,
}

impl LeiAirfoil {
    /// Create an LEI airfoil from its two shape parameters.
    #[inline]
    #[must_use]
    pub const fn new(tube_diameter: f64, camber_height: f64) -> Self {
        Self {
            tube_diameter,
            camber_height,
        }
    }

    /// Lift coefficient at `alpha` (radians).
    #[must_use]
    pub fn cl(&self, alpha: f64) -> f64 {
        let a = alpha.to_degrees();
        if a.abs() > STALL_LIMIT_DEG {
            return flat_plate_cl(alpha);
        }
        let t = self.tube_diameter;
        let k = self.camber_height;

        let s9 = quadratic(C20, C21, C22, t);
        let s10 = quadratic(C23, C24, C25, t);
        let s11 = quadratic(C26, C27, C28, t);
        let s12 = quadratic(C29, C30, C31, t);
        let s13 = quadratic(C32, C33, C34, t);
        let s14 = quadratic(C35, C36, C37, t);
        let s15 = quadratic(C38, C39, C40, t);
        let s16 = quadratic(C41, C42, C43, t);

        let lambda5 = s9.mul_add(k, s10);
        let lambda6 = s11.mul_add(k, s12);
        let lambda7 = s13.mul_add(k, s14);
        let lambda8 = s15.mul_add(k, s16);

        ((lambda5 * a + lambda6) * a + lambda7) * a + lambda8
    }

    /// Drag coefficient at `alpha` (radians).
    #[must_use]
    pub fn cd(&self, alpha: f64) -> f64 {
        let a = alpha.to_degrees();
        if a.abs() > STALL_LIMIT_DEG {
            return flat_plate_cd(alpha);
        }
        let t = self.tube_diameter;
        let k = self.camber_height;

        let quad = ((C44 * t + C45) * k + (C46 * t + C47)) * k + (C48 * t + C49);
        let linear = C50 * t + C51;
        let constant = quadratic(C52, C53, C54, t);

        quad * a * a + linear * k + constant
    }

    /// Moment coefficient at `alpha` (radians).
    #[must_use]
    pub fn cm(&self, alpha: f64) -> f64 {
        let a = alpha.to_degrees();
        let t = self.tube_diameter;
        let k = self.camber_height;

        let quad = (C55 * t + C56) * k + (C57 * t + C58);
        let linear = C59 * t + C60;
        let constant = C61 * t + C62;

        quad * a * a + linear * k + constant
    }

    /// Blend two LEI airfoils by interpolating the two shape parameters.
    #[must_use]
    pub fn blend(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            tube_diameter: lerp(a.tube_diameter, b.tube_diameter, t),
            camber_height: lerp(a.camber_height, b.camber_height, t),
        }
    }
}

#[inline]
fn quadratic(a: f64, b: f64, c: f64, x: f64) -> f64 {
    (a * x + b).mul_add(x, c)
}

/// Post-stall flat-plate lift, `2 cos(alpha) sin^2(alpha)` with the sign of
/// the incidence.
fn flat_plate_cl(alpha: f64) -> f64 {
    let (s, c) = alpha.sin_cos();
    2.0 * c * s * s.abs()
}

/// Post-stall flat-plate drag, `2 sin^3(alpha)` magnitude.
fn flat_plate_cd(alpha: f64) -> f64 {
    let s = alpha.sin().abs();
    2.0 * s * s * s
}
