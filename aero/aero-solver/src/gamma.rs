//! The damped fixed-point circulation solve.

use nalgebra::{DMatrix, DVector, Vector3};
use tracing::{debug, warn};

use crate::body::BodyAerodynamics;
use crate::error::{SolverError, SolverResult};
use crate::params::SolverConfig;
use crate::state::SolverState;

/// Iteration cap of the Newton-Raphson fallback.
const NEWTON_MAX_ITERATIONS: usize = 50;

/// Outcome of a circulation solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaLoopReport {
    /// Whether the residual dropped below `rtol`.
    pub converged: bool,
    /// Iterations actually run.
    pub iterations: usize,
    /// Final relative residual.
    pub residual: f64,
    /// Whether the Newton-Raphson fallback produced the final circulation.
    pub newton_fallback: bool,
}

/// One sweep of the fixed-point map: induced velocities from the current
/// `state.gamma`, effective angles of attack, and the proposed circulation
/// `state.gamma_new`. Allocation-free.
fn sweep(body: &BodyAerodynamics, state: &mut SolverState) {
    // The AIC matrices are stored transposed; gemv_tr applies the logical
    // matrix without copies.
    state.u.gemv_tr(1.0, &state.aic_x, &state.gamma, 0.0);
    state.v.gemv_tr(1.0, &state.aic_y, &state.gamma, 0.0);
    state.w.gemv_tr(1.0, &state.aic_z, &state.gamma, 0.0);

    let panels = body.panels();
    for i in 0..panels.len() {
        let velocity = state.va[i] + Vector3::new(state.u[i], state.v[i], state.w[i]);
        let v_normal = velocity.dot(&state.z_airf[i]);
        let v_tangential = velocity.dot(&state.x_airf[i]);
        let alpha = v_normal.atan2(v_tangential);
        state.alpha[i] = alpha;

        let cl = panels[i].model.cl(alpha, state.delta[i]);
        let in_plane = v_normal.hypot(v_tangential);
        state.gamma_new[i] = 0.5 * in_plane * state.chord[i] * cl;
    }
}

/// Jameson-style smoothing of the proposed circulation: second and fourth
/// spanwise differences with edge replication, applied per wing.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn apply_artificial_damping(body: &BodyAerodynamics, config: &SolverConfig, state: &mut SolverState) {
    let k2 = config.artificial_damping.k2;
    let k4 = config.artificial_damping.k4;
    let gamma_new = &state.gamma_new;
    let damped = &mut state.damped;
    for range in body.wing_ranges() {
        let first = range.start;
        let last = range.end - 1;
        let at = |k: isize| -> f64 {
            let clamped = k.clamp(first as isize, last as isize) as usize;
            gamma_new[clamped]
        };
        for i in range.clone() {
            let i = i as isize;
            let d2 = at(i - 1) - 2.0 * at(i) + at(i + 1);
            let d4 = at(i - 2) - 4.0 * at(i - 1) + 6.0 * at(i) - 4.0 * at(i + 1) + at(i + 2);
            damped[i as usize] = gamma_new[i as usize] + k2 * d2 - k4 * d4;
        }
    }
}

/// Run the damped fixed-point iteration on the circulation vector.
///
/// Convergence criterion: `max|gamma_proposed - gamma| / max(max|gamma|,
/// tol_reference_error) < rtol`, where the proposal is the smoothed sweep
/// output when artificial damping is on and the raw sweep output otherwise.
/// Reaching `max_iterations` is not an error;
/// the report carries `converged = false` and the state keeps the last
/// iterate. A non-finite circulation aborts the loop and, if
/// `allow_newton_fallback` is set, retries with a Newton-Raphson solve on
/// the circulation residual.
///
/// The loop reuses the buffers in `state` and performs no allocations.
///
/// # Errors
///
/// Returns [`SolverError::NonFiniteState`] when the circulation diverges and
/// the fallback is disabled or also fails.
pub fn gamma_loop(
    body: &BodyAerodynamics,
    config: &SolverConfig,
    state: &mut SolverState,
) -> SolverResult<GammaLoopReport> {
    let n = state.panel_count();
    let relaxation = config.relaxation_factor;
    let mut residual = f64::INFINITY;

    for iteration in 1..=config.max_iterations {
        sweep(body, state);

        if config.artificial_damping.enabled {
            apply_artificial_damping(body, config, state);
        } else {
            state.damped.copy_from(&state.gamma_new);
        }

        let mut max_delta = 0.0_f64;
        let mut max_gamma = 0.0_f64;
        for i in 0..n {
            // The damped proposal is what gamma relaxes toward; measuring it
            // keeps the criterion meaningful when smoothing shifts the fixed
            // point
            let delta = state.damped[i] - state.gamma[i];
            max_delta = max_delta.max(delta.abs());
            max_gamma = max_gamma.max(state.gamma[i].abs());
            state.gamma[i] = relaxation.mul_add(state.damped[i] - state.gamma[i], state.gamma[i]);
        }

        residual = max_delta / max_gamma.max(config.tol_reference_error);

        if !residual.is_finite() {
            warn!(iteration, "Circulation diverged");
            if config.allow_newton_fallback {
                return newton_fallback(body, config, state);
            }
            return Err(SolverError::NonFiniteState { what: "gamma" });
        }

        if residual < config.rtol {
            debug!(iteration, residual, "Circulation converged");
            return Ok(GammaLoopReport {
                converged: true,
                iterations: iteration,
                residual,
                newton_fallback: false,
            });
        }
    }

    warn!(
        iterations = config.max_iterations,
        residual, "Circulation did not converge; returning last iterate"
    );
    Ok(GammaLoopReport {
        converged: false,
        iterations: config.max_iterations,
        residual,
        newton_fallback: false,
    })
}

/// The circulation residual `F(gamma) = gamma - gamma_new(gamma)`.
///
/// This is the function a Newton-type solver drives to zero; it is exposed
/// so callers can plug in their own root finder. Overwrites `state.gamma`
/// with `gamma_in`.
pub fn residual(
    body: &BodyAerodynamics,
    state: &mut SolverState,
    gamma_in: &DVector<f64>,
    out: &mut DVector<f64>,
) {
    state.gamma.copy_from(gamma_in);
    sweep(body, state);
    for i in 0..gamma_in.len() {
        out[i] = gamma_in[i] - state.gamma_new[i];
    }
}

/// Damped Newton-Raphson on the circulation residual with a
/// forward-difference Jacobian. Used as a fallback when the fixed point
/// diverges; this path may allocate.
fn newton_fallback(
    body: &BodyAerodynamics,
    config: &SolverConfig,
    state: &mut SolverState,
) -> SolverResult<GammaLoopReport> {
    let n = state.panel_count();
    let mut gamma = DVector::zeros(n);
    let mut f0 = DVector::zeros(n);
    let mut f_perturbed = DVector::zeros(n);
    let mut perturbed = DVector::zeros(n);
    let mut jacobian = DMatrix::zeros(n, n);

    for iteration in 1..=NEWTON_MAX_ITERATIONS {
        residual(body, state, &gamma, &mut f0);
        let reference = gamma.amax().max(config.tol_reference_error);
        let norm = f0.amax() / reference;
        if !norm.is_finite() {
            return Err(SolverError::NonFiniteState { what: "gamma" });
        }
        if norm < config.rtol {
            state.gamma.copy_from(&gamma);
            sweep(body, state);
            debug!(iteration, "Newton fallback converged");
            return Ok(GammaLoopReport {
                converged: true,
                iterations: iteration,
                residual: norm,
                newton_fallback: true,
            });
        }

        let step = 1e-6 * reference.max(1.0);
        for j in 0..n {
            perturbed.copy_from(&gamma);
            perturbed[j] += step;
            residual(body, state, &perturbed, &mut f_perturbed);
            for i in 0..n {
                jacobian[(i, j)] = (f_perturbed[i] - f0[i]) / step;
            }
        }

        let Some(delta) = jacobian.clone().lu().solve(&f0) else {
            return Err(SolverError::NonFiniteState { what: "gamma" });
        };
        gamma -= 0.75 * delta;
        if !gamma.iter().all(|g| g.is_finite()) {
            return Err(SolverError::NonFiniteState { what: "gamma" });
        }
    }

    warn!("Newton fallback hit its iteration cap");
    state.gamma.copy_from(&gamma);
    sweep(body, state);
    Ok(GammaLoopReport {
        converged: false,
        iterations: NEWTON_MAX_ITERATIONS,
        residual: f64::NAN,
        newton_fallback: true,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::aic::calculate_aic_matrices;
    use crate::params::InitialGamma;
    use aero_types::{Point3, Section, SectionModel};
    use aero_wing::Wing;

    fn prepared(
        alpha_deg: f64,
        config: &SolverConfig,
    ) -> (BodyAerodynamics, SolverState) {
        let mut wing = Wing::new(10).unwrap();
        wing.add_section(Section::new(
            Point3::new(0.0, 10.0, 0.0),
            Point3::new(1.0, 10.0, 0.0),
            SectionModel::Inviscid,
        ));
        wing.add_section(Section::new(
            Point3::new(0.0, -10.0, 0.0),
            Point3::new(1.0, -10.0, 0.0),
            SectionModel::Inviscid,
        ));
        let mut body = BodyAerodynamics::new(vec![wing], Point3::origin()).unwrap();
        let alpha = alpha_deg.to_radians();
        body.set_va(
            Vector3::new(20.0 * alpha.cos(), 0.0, 20.0 * alpha.sin()),
            Vector3::zeros(),
        )
        .unwrap();

        let mut state = SolverState::new(body.panel_count());
        state.prepare(&body, config).unwrap();
        calculate_aic_matrices(&body, config.model, config.core_radius_fraction, &mut state);
        (body, state)
    }

    #[test]
    fn converges_on_a_rectangular_wing() {
        let config = SolverConfig::default();
        let (body, mut state) = prepared(5.0, &config);
        let report = gamma_loop(&body, &config, &mut state).unwrap();
        assert!(report.converged, "residual {}", report.residual);
        assert!(report.iterations < config.max_iterations);
        assert!(state.gamma().iter().all(|g| g.is_finite()));
    }

    #[test]
    fn zeros_start_reaches_the_same_circulation() {
        let elliptic_config = SolverConfig::default();
        let (body, mut state_a) = prepared(5.0, &elliptic_config);
        gamma_loop(&body, &elliptic_config, &mut state_a).unwrap();

        let zeros_config = SolverConfig {
            initial_gamma: InitialGamma::Zeros,
            ..SolverConfig::default()
        };
        let (_, mut state_b) = prepared(5.0, &zeros_config);
        gamma_loop(&body, &zeros_config, &mut state_b).unwrap();

        for i in 0..state_a.panel_count() {
            assert!(
                (state_a.gamma()[i] - state_b.gamma()[i]).abs() < 1e-3,
                "gamma differs at {i}"
            );
        }
    }

    #[test]
    fn iteration_cap_is_a_warning_not_an_error() {
        let config = SolverConfig {
            max_iterations: 2,
            ..SolverConfig::default()
        };
        let (body, mut state) = prepared(5.0, &config);
        let report = gamma_loop(&body, &config, &mut state).unwrap();
        assert!(!report.converged);
        assert_eq!(report.iterations, 2);
        assert!(report.residual.is_finite());
    }

    #[test]
    fn residual_vanishes_at_the_fixed_point() {
        let config = SolverConfig {
            rtol: 1e-10,
            max_iterations: 20_000,
            ..SolverConfig::default()
        };
        let (body, mut state) = prepared(3.0, &config);
        let report = gamma_loop(&body, &config, &mut state).unwrap();
        assert!(report.converged);

        let gamma = state.gamma().clone();
        let mut f = DVector::zeros(state.panel_count());
        residual(&body, &mut state, &gamma, &mut f);
        assert!(f.amax() < 1e-6, "residual {}", f.amax());
    }

    #[test]
    fn artificial_damping_preserves_convergence() {
        let config = SolverConfig {
            artificial_damping: crate::params::ArtificialDamping {
                enabled: true,
                k2: 0.05,
                k4: 0.001,
            },
            ..SolverConfig::default()
        };
        let (body, mut state) = prepared(5.0, &config);
        let report = gamma_loop(&body, &config, &mut state).unwrap();
        assert!(report.converged);
    }

    #[test]
    fn llt_converges_as_well() {
        let config = SolverConfig::llt();
        let (body, mut state) = prepared(5.0, &config);
        let report = gamma_loop(&body, &config, &mut state).unwrap();
        assert!(report.converged, "residual {}", report.residual);
    }
}
