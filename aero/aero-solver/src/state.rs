//! Preallocated solver buffers, reused across solves.

#![allow(clippy::cast_precision_loss)]

use nalgebra::{DMatrix, DVector, Vector3};

use crate::body::BodyAerodynamics;
use crate::error::{SolverError, SolverResult};
use crate::params::{InitialGamma, SolverConfig};

/// Working storage of the circulation solver, sized to the panel count and
/// created once per body.
///
/// The three influence matrices are stored **transposed**: column `i` holds
/// the induced-velocity influences on panel `i`, so matrix rows of the
/// logical AIC are contiguous in memory and the matrix-vector products run
/// through `gemv_tr` without copies. Nothing in here allocates after
/// construction; the hot loops reuse every buffer.
#[derive(Debug, Clone)]
pub struct SolverState {
    /// Transposed x-component influence matrix.
    pub(crate) aic_x: DMatrix<f64>,
    /// Transposed y-component influence matrix.
    pub(crate) aic_y: DMatrix<f64>,
    /// Transposed z-component influence matrix.
    pub(crate) aic_z: DMatrix<f64>,
    /// Current circulation.
    pub(crate) gamma: DVector<f64>,
    /// Circulation proposed by the latest sweep.
    pub(crate) gamma_new: DVector<f64>,
    /// Smoothed update (artificial damping scratch).
    pub(crate) damped: DVector<f64>,
    /// Latest effective angle of attack per panel.
    pub(crate) alpha: DVector<f64>,
    /// Induced velocity components, one per panel.
    pub(crate) u: DVector<f64>,
    pub(crate) v: DVector<f64>,
    pub(crate) w: DVector<f64>,
    /// Apparent inflow snapshot per panel.
    pub(crate) va: Vec<Vector3<f64>>,
    /// Inflow magnitudes.
    pub(crate) va_norm: DVector<f64>,
    /// Inflow unit vectors.
    pub(crate) va_unit: Vec<Vector3<f64>>,
    /// Local frame snapshots.
    pub(crate) x_airf: Vec<Vector3<f64>>,
    pub(crate) y_airf: Vec<Vector3<f64>>,
    pub(crate) z_airf: Vec<Vector3<f64>>,
    /// Chord lengths.
    pub(crate) chord: Vec<f64>,
    /// Control deflections.
    pub(crate) delta: Vec<f64>,
}

impl SolverState {
    /// Allocate buffers for `panel_count` panels.
    #[must_use]
    pub fn new(panel_count: usize) -> Self {
        let n = panel_count;
        Self {
            aic_x: DMatrix::zeros(n, n),
            aic_y: DMatrix::zeros(n, n),
            aic_z: DMatrix::zeros(n, n),
            gamma: DVector::zeros(n),
            gamma_new: DVector::zeros(n),
            damped: DVector::zeros(n),
            alpha: DVector::zeros(n),
            u: DVector::zeros(n),
            v: DVector::zeros(n),
            w: DVector::zeros(n),
            va: vec![Vector3::zeros(); n],
            va_norm: DVector::zeros(n),
            va_unit: vec![Vector3::zeros(); n],
            x_airf: vec![Vector3::zeros(); n],
            y_airf: vec![Vector3::zeros(); n],
            z_airf: vec![Vector3::zeros(); n],
            chord: vec![0.0; n],
            delta: vec![0.0; n],
        }
    }

    /// Number of panels the buffers are sized for.
    #[must_use]
    pub fn panel_count(&self) -> usize {
        self.gamma.len()
    }

    /// Snapshot the per-panel inflow, frame and chord arrays from the body
    /// and reset the circulation to the configured initial distribution.
    ///
    /// # Errors
    ///
    /// Returns an error when an inflow entry is non-finite or zero.
    ///
    /// # Panics
    ///
    /// Panics if the state was sized for a different panel count.
    pub fn prepare(&mut self, body: &BodyAerodynamics, config: &SolverConfig) -> SolverResult<()> {
        assert_eq!(
            self.panel_count(),
            body.panel_count(),
            "state sized for a different body"
        );

        for (i, panel) in body.panels().iter().enumerate() {
            let norm = panel.va.norm();
            if !norm.is_finite() {
                return Err(SolverError::NonFiniteState { what: "inflow" });
            }
            if norm <= f64::EPSILON {
                return Err(SolverError::ZeroInflow { panel: i });
            }
            self.va[i] = panel.va;
            self.va_norm[i] = norm;
            self.va_unit[i] = panel.va / norm;
            self.x_airf[i] = panel.x_airf;
            self.y_airf[i] = panel.y_airf;
            self.z_airf[i] = panel.z_airf;
            self.chord[i] = panel.chord;
            self.delta[i] = panel.delta;
        }

        match config.initial_gamma {
            InitialGamma::Zeros => self.gamma.fill(0.0),
            InitialGamma::Elliptic => self.fill_elliptic_gamma(body),
        }
        Ok(())
    }

    /// The current circulation vector.
    #[must_use]
    pub fn gamma(&self) -> &DVector<f64> {
        &self.gamma
    }

    /// Overwrite the circulation vector (e.g. to warm-start a solve).
    pub fn set_gamma(&mut self, gamma: &DVector<f64>) {
        self.gamma.copy_from(gamma);
    }

    /// The latest effective angle-of-attack array.
    #[must_use]
    pub fn alpha(&self) -> &DVector<f64> {
        &self.alpha
    }

    /// Logical AIC entry `(i, j)` of the three component matrices.
    #[must_use]
    pub fn aic(&self, i: usize, j: usize) -> Vector3<f64> {
        // Stored transposed
        Vector3::new(self.aic_x[(j, i)], self.aic_y[(j, i)], self.aic_z[(j, i)])
    }

    /// Elliptic circulation `gamma_0 sqrt(1 - (2 y / b)^2)` per wing, with
    /// `gamma_0` sized for unit lift coefficient.
    fn fill_elliptic_gamma(&mut self, body: &BodyAerodynamics) {
        let spanwise = body.spanwise_direction();
        for range in body.wing_ranges() {
            let panels = &body.panels()[range.clone()];

            let mut projection_min = f64::INFINITY;
            let mut projection_max = f64::NEG_INFINITY;
            let mut area = 0.0;
            let mut speed = 0.0;
            for panel in panels {
                for corner in [&panel.corners[0], &panel.corners[1]] {
                    let s = corner.coords.dot(&spanwise);
                    projection_min = projection_min.min(s);
                    projection_max = projection_max.max(s);
                }
                area += panel.chord * panel.width;
                speed += panel.va.norm();
            }
            let span = projection_max - projection_min;
            let mid = 0.5 * (projection_max + projection_min);
            if span <= f64::EPSILON {
                continue;
            }
            speed /= panels.len() as f64;
            let gamma_0 = 2.0 * speed * area / (std::f64::consts::PI * span);

            for (offset, panel) in panels.iter().enumerate() {
                let y = panel.aero_center.coords.dot(&spanwise) - mid;
                let argument = (2.0 * y / span).mul_add(-(2.0 * y / span), 1.0);
                self.gamma[range.start + offset] = gamma_0 * argument.max(0.0).sqrt();
            }
        }
    }
}
