//! YAML settings for wings and solver configuration.

use std::path::Path;

use aero_types::{PanelDistribution, Point3, Section, SectionModel};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::{SolverError, SolverResult};
use crate::params::{
    AerodynamicModel, ArtificialDamping, InitialGamma, SolverConfig,
};
use aero_wing::Wing;

/// A simulation settings file: wing definitions plus a solver block.
///
/// # Example
///
/// ```
/// use aero_solver::settings::SimulationSettings;
///
/// let yaml = r"
/// wings:
///   - n_panels: 4
///     sections:
///       - leading_edge: [0.0, 5.0, 0.0]
///         trailing_edge: [1.0, 5.0, 0.0]
///         airfoil:
///           type: inviscid
///       - leading_edge: [0.0, -5.0, 0.0]
///         trailing_edge: [1.0, -5.0, 0.0]
///         airfoil:
///           type: inviscid
/// solver_settings:
///   aerodynamic_model_type: VSM
///   density: 1.225
/// ";
/// let settings = SimulationSettings::from_yaml_str(yaml).unwrap();
/// let wings = settings.build_wings().unwrap();
/// assert_eq!(wings.len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Wing definitions.
    pub wings: Vec<WingSettings>,
    /// Solver block.
    #[serde(default)]
    pub solver_settings: SolverSettings,
}

/// One wing in a settings file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WingSettings {
    /// Number of panels to refine to.
    pub n_panels: usize,
    /// Spanwise distribution (defaults to linear).
    #[serde(default)]
    pub spanwise_panel_distribution: PanelDistribution,
    /// Drop NaN polar rows on load.
    #[serde(default = "default_true")]
    pub remove_nan: bool,
    /// Wing stations.
    pub sections: Vec<SectionSettings>,
}

/// One wing station in a settings file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionSettings {
    /// Leading edge point.
    pub leading_edge: [f64; 3],
    /// Trailing edge point.
    pub trailing_edge: [f64; 3],
    /// Sectional aerodynamic model.
    pub airfoil: AirfoilSettings,
}

/// Sectional model data, tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AirfoilSettings {
    /// `cl = 2 pi sin(alpha)`.
    Inviscid,
    /// 1-D polar columns.
    PolarVectors {
        /// Angle-of-attack grid (radians).
        alpha: Vec<f64>,
        /// Lift column.
        cl: Vec<f64>,
        /// Drag column.
        cd: Vec<f64>,
        /// Moment column.
        cm: Vec<f64>,
    },
    /// 2-D polar matrices over angle of attack and deflection.
    PolarMatrices {
        /// Angle-of-attack axis (radians).
        alpha: Vec<f64>,
        /// Deflection axis (radians).
        delta: Vec<f64>,
        /// Lift matrix, one row per alpha.
        cl: Vec<Vec<f64>>,
        /// Drag matrix.
        cd: Vec<Vec<f64>>,
        /// Moment matrix.
        cm: Vec<Vec<f64>>,
    },
    /// Breukels LEI airfoil parameters.
    LeiAirfoilBreukels {
        /// Tube diameter over chord.
        tube_diameter: f64,
        /// Camber height over chord.
        camber_height: f64,
    },
}

/// The `solver_settings` block, mirroring [`SolverConfig`] with file-facing
/// field names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// `VSM` or `LLT`.
    pub aerodynamic_model_type: AerodynamicModel,
    /// Fluid density.
    pub density: f64,
    /// Iteration cap.
    pub max_iterations: usize,
    /// Relative tolerance.
    pub rtol: f64,
    /// Convergence reference floor.
    pub tol_reference_error: f64,
    /// Relaxation factor.
    pub relaxation_factor: f64,
    /// Whether artificial damping is applied.
    pub artificial_damping: bool,
    /// Second-difference damping coefficient.
    pub k2: f64,
    /// Fourth-difference damping coefficient.
    pub k4: f64,
    /// `elliptic` or `zeros`.
    pub type_initial_gamma_distribution: InitialGamma,
    /// Rankine core radius fraction.
    pub core_radius_fraction: f64,
    /// Dynamic viscosity.
    pub mu: f64,
}

fn default_true() -> bool {
    true
}

impl Default for SolverSettings {
    fn default() -> Self {
        let config = SolverConfig::default();
        Self {
            aerodynamic_model_type: config.model,
            density: config.density,
            max_iterations: config.max_iterations,
            rtol: config.rtol,
            tol_reference_error: config.tol_reference_error,
            relaxation_factor: config.relaxation_factor,
            artificial_damping: config.artificial_damping.enabled,
            k2: config.artificial_damping.k2,
            k4: config.artificial_damping.k4,
            type_initial_gamma_distribution: config.initial_gamma,
            core_radius_fraction: config.core_radius_fraction,
            mu: config.mu,
        }
    }
}

impl SimulationSettings {
    /// Parse settings from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns a settings error when the YAML is malformed.
    pub fn from_yaml_str(yaml: &str) -> SolverResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| SolverError::settings(e.to_string()))
    }

    /// Parse settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a settings error when the file cannot be read or parsed.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> SolverResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| SolverError::settings(e.to_string()))?;
        Self::from_yaml_str(&text)
    }

    /// Build the wings described by the file.
    ///
    /// # Errors
    ///
    /// Returns wing or polar construction errors.
    pub fn build_wings(&self) -> SolverResult<Vec<Wing>> {
        self.wings.iter().map(WingSettings::build).collect()
    }

    /// The solver configuration described by the file.
    #[must_use]
    pub fn solver_config(&self) -> SolverConfig {
        let s = &self.solver_settings;
        SolverConfig {
            model: s.aerodynamic_model_type,
            core_radius_fraction: s.core_radius_fraction,
            max_iterations: s.max_iterations,
            rtol: s.rtol,
            relaxation_factor: s.relaxation_factor,
            tol_reference_error: s.tol_reference_error,
            artificial_damping: ArtificialDamping {
                enabled: s.artificial_damping,
                k2: s.k2,
                k4: s.k4,
            },
            initial_gamma: s.type_initial_gamma_distribution,
            density: s.density,
            mu: s.mu,
            ..SolverConfig::default()
        }
    }
}

impl WingSettings {
    /// Build the wing described by this block.
    ///
    /// # Errors
    ///
    /// Returns wing or polar construction errors.
    pub fn build(&self) -> SolverResult<Wing> {
        let mut wing = Wing::new(self.n_panels)?
            .with_distribution(self.spanwise_panel_distribution)
            .with_nan_removal(self.remove_nan);
        for section in &self.sections {
            let model = section.airfoil.build(self.remove_nan)?;
            wing.add_section(Section::new(
                Point3::new(
                    section.leading_edge[0],
                    section.leading_edge[1],
                    section.leading_edge[2],
                ),
                Point3::new(
                    section.trailing_edge[0],
                    section.trailing_edge[1],
                    section.trailing_edge[2],
                ),
                model,
            ));
        }
        Ok(wing)
    }
}

impl AirfoilSettings {
    /// Convert the file data into a [`SectionModel`].
    ///
    /// # Errors
    ///
    /// Returns polar construction errors (shape mismatch, NaN, non-monotone
    /// grids).
    pub fn build(&self, remove_nan: bool) -> SolverResult<SectionModel> {
        match self {
            Self::Inviscid => Ok(SectionModel::Inviscid),
            Self::PolarVectors { alpha, cl, cd, cm } => {
                let table = aero_types::PolarTable::from_raw(
                    alpha.clone(),
                    cl.clone(),
                    cd.clone(),
                    cm.clone(),
                    remove_nan,
                )
                .map_err(aero_wing::WingError::from)?;
                Ok(SectionModel::PolarVectors(table))
            }
            Self::PolarMatrices {
                alpha,
                delta,
                cl,
                cd,
                cm,
            } => {
                let grid = aero_types::PolarGrid::new(
                    alpha.clone(),
                    delta.clone(),
                    rows_to_matrix(cl, alpha.len(), delta.len())?,
                    rows_to_matrix(cd, alpha.len(), delta.len())?,
                    rows_to_matrix(cm, alpha.len(), delta.len())?,
                )
                .map_err(aero_wing::WingError::from)?;
                Ok(SectionModel::PolarMatrices(grid))
            }
            Self::LeiAirfoilBreukels {
                tube_diameter,
                camber_height,
            } => Ok(SectionModel::LeiBreukels(aero_types::LeiAirfoil::new(
                *tube_diameter,
                *camber_height,
            ))),
        }
    }
}

fn rows_to_matrix(rows: &[Vec<f64>], m: usize, n: usize) -> SolverResult<DMatrix<f64>> {
    if rows.len() != m || rows.iter().any(|row| row.len() != n) {
        return Err(SolverError::settings(format!(
            "polar matrix must be {m} rows of {n} values"
        )));
    }
    Ok(DMatrix::from_fn(m, n, |i, j| rows[i][j]))
}
