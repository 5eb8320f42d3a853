//! Solver configuration.

use aero_types::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Which low-order method drives the circulation solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AerodynamicModel {
    /// Vortex Step Method: angle of attack re-evaluated at the
    /// three-quarter-chord control point, bound self-term kept.
    #[default]
    #[serde(rename = "VSM")]
    Vsm,
    /// Classical lifting-line theory: evaluation at the quarter-chord
    /// aerodynamic center, bound self-term removed.
    #[serde(rename = "LLT")]
    Llt,
}

/// Initial circulation distribution for the fixed-point loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialGamma {
    /// Elliptic loading scaled to unit lift coefficient.
    #[default]
    Elliptic,
    /// All zeros.
    Zeros,
}

/// Jameson-style smoothing of the circulation update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArtificialDamping {
    /// Whether the smoothing term is applied.
    pub enabled: bool,
    /// Second-difference coefficient.
    pub k2: f64,
    /// Fourth-difference coefficient.
    pub k4: f64,
}

impl Default for ArtificialDamping {
    fn default() -> Self {
        Self {
            enabled: false,
            k2: 0.1,
            k4: 0.0,
        }
    }
}

/// Configuration of the circulation solver.
///
/// # Example
///
/// ```
/// use aero_solver::{AerodynamicModel, SolverConfig};
///
/// let config = SolverConfig {
///     model: AerodynamicModel::Llt,
///     rtol: 1e-6,
///     ..SolverConfig::default()
/// };
/// assert_eq!(config.max_iterations, 1500);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// VSM or LLT.
    pub model: AerodynamicModel,
    /// Rankine core radius as a fraction of the filament length scale.
    pub core_radius_fraction: f64,
    /// Iteration cap for the fixed-point loop.
    pub max_iterations: usize,
    /// Relative convergence tolerance on the circulation update.
    pub rtol: f64,
    /// Under-relaxation factor of the damped update.
    pub relaxation_factor: f64,
    /// Floor of the convergence reference, guarding against a zero gamma
    /// norm.
    pub tol_reference_error: f64,
    /// Optional smoothing of the update.
    pub artificial_damping: ArtificialDamping,
    /// Initial circulation distribution.
    pub initial_gamma: InitialGamma,
    /// Fluid density in kg/m^3.
    pub density: f64,
    /// Dynamic viscosity in Pa s; reserved for viscous extensions of the
    /// sectional models.
    pub mu: f64,
    /// Retry a diverged fixed point with a Newton-Raphson solve on the
    /// circulation residual.
    pub allow_newton_fallback: bool,
    /// Point about which moments are integrated.
    pub reference_point: Point3<f64>,
    /// Unit normal of the plane the projected (frontal) area is measured in.
    pub projection_normal: Vector3<f64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            model: AerodynamicModel::Vsm,
            core_radius_fraction: 1e-20,
            max_iterations: 1500,
            rtol: 1e-5,
            relaxation_factor: 0.1,
            tol_reference_error: 0.001,
            artificial_damping: ArtificialDamping::default(),
            initial_gamma: InitialGamma::Elliptic,
            density: 1.225,
            mu: 1.81e-5,
            allow_newton_fallback: true,
            reference_point: Point3::origin(),
            projection_normal: Vector3::new(0.0, 0.0, 1.0),
        }
    }
}

impl SolverConfig {
    /// Configuration for a lifting-line solve, otherwise default.
    #[must_use]
    pub fn llt() -> Self {
        Self {
            model: AerodynamicModel::Llt,
            ..Self::default()
        }
    }

    /// Configuration for a vortex-step solve, otherwise default.
    #[must_use]
    pub fn vsm() -> Self {
        Self::default()
    }

    /// Set the fluid density.
    #[must_use]
    pub const fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    /// Set the relaxation factor.
    #[must_use]
    pub const fn with_relaxation(mut self, relaxation_factor: f64) -> Self {
        self.relaxation_factor = relaxation_factor;
        self
    }

    /// Set the iteration cap.
    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_setup() {
        let config = SolverConfig::default();
        assert_eq!(config.model, AerodynamicModel::Vsm);
        assert_eq!(config.max_iterations, 1500);
        assert!((config.rtol - 1e-5).abs() < 1e-12);
        assert!((config.density - 1.225).abs() < 1e-12);
        assert!(!config.artificial_damping.enabled);
    }

    #[test]
    fn builder_methods() {
        let config = SolverConfig::llt()
            .with_density(1.0)
            .with_relaxation(0.2)
            .with_max_iterations(100);
        assert_eq!(config.model, AerodynamicModel::Llt);
        assert!((config.density - 1.0).abs() < 1e-12);
        assert!((config.relaxation_factor - 0.2).abs() < 1e-12);
        assert_eq!(config.max_iterations, 100);
    }

    #[test]
    fn model_serde_names() {
        let yaml = serde_yaml::to_string(&AerodynamicModel::Vsm).unwrap_or_default();
        assert!(yaml.contains("VSM"));
    }
}
