//! Force and moment integration over the converged circulation.

use aero_types::Vector3;
use nalgebra::DVector;
use tracing::info;

use crate::body::BodyAerodynamics;
use crate::error::{SolverError, SolverResult};
use crate::gamma::GammaLoopReport;
use crate::params::SolverConfig;
use crate::result::{AeroResults, DidNotConverge};
use crate::state::SolverState;

/// Integrate sectional loads into global force, moment and coefficients.
///
/// Per panel, the circulatory lift `rho |V| gamma` acts perpendicular to the
/// effective velocity in the chord/normal plane; the viscous drag
/// `q c cd` acts along it; the sectional moment `q c^2 cm` acts about the
/// spanwise axis. Everything is weighted by panel width and summed; moments
/// are taken about the configured reference point.
///
/// # Errors
///
/// Returns [`SolverError::ZeroInflow`] when the global freestream is zero
/// (coefficients would be undefined).
pub fn calculate_results(
    body: &BodyAerodynamics,
    config: &SolverConfig,
    state: &mut SolverState,
    report: &GammaLoopReport,
) -> SolverResult<AeroResults> {
    let n = body.panel_count();
    let density = config.density;

    let va_global = body.va_global();
    let u_inf = va_global.norm();
    if u_inf <= f64::EPSILON {
        return Err(SolverError::ZeroInflow { panel: 0 });
    }

    // Refresh induced velocities and alpha for the final circulation
    let gamma = state.gamma.clone();
    let mut scratch = DVector::zeros(n);
    crate::gamma::residual(body, state, &gamma, &mut scratch);

    let panels = body.panels();
    let mut force = Vector3::zeros();
    let mut moment = Vector3::zeros();
    let mut gamma_distribution = Vec::with_capacity(n);
    let mut cl_distribution = Vec::with_capacity(n);
    let mut cd_distribution = Vec::with_capacity(n);
    let mut cm_distribution = Vec::with_capacity(n);
    let mut alpha_uncorrected = Vec::with_capacity(n);
    let mut alpha_corrected = Vec::with_capacity(n);

    let mut chord_weight = 0.0;
    let mut width_sum = 0.0;

    for (i, panel) in panels.iter().enumerate() {
        let velocity = state.va[i] + Vector3::new(state.u[i], state.v[i], state.w[i]);
        let v_normal = velocity.dot(&panel.z_airf);
        let v_tangential = velocity.dot(&panel.x_airf);
        let alpha = state.alpha[i];
        let in_plane = v_normal.hypot(v_tangential);
        let q_local = 0.5 * density * in_plane * in_plane;

        let coefficients = panel.model.coefficients(alpha, panel.delta);
        let gamma_i = state.gamma[i];

        // Circulatory lift, perpendicular to the effective velocity
        let mut lift_direction = velocity.cross(&panel.y_airf);
        let lift_norm = lift_direction.norm();
        if lift_norm > f64::EPSILON {
            lift_direction /= lift_norm;
        }
        let drag_direction = velocity / velocity.norm().max(f64::EPSILON);

        let lift = density * in_plane * gamma_i;
        let drag = q_local * panel.chord * coefficients.cd;
        let panel_force = (lift * lift_direction + drag * drag_direction) * panel.width;

        let pitching = q_local * panel.chord * panel.chord * coefficients.cm * panel.width;
        let arm = panel.aero_center - config.reference_point;
        moment += arm.cross(&panel_force) + pitching * panel.y_airf;
        force += panel_force;

        let geometric_alpha = panel
            .va
            .dot(&panel.z_airf)
            .atan2(panel.va.dot(&panel.x_airf));

        gamma_distribution.push(gamma_i);
        cl_distribution.push(coefficients.cl);
        cd_distribution.push(coefficients.cd);
        cm_distribution.push(coefficients.cm);
        alpha_uncorrected.push(geometric_alpha);
        alpha_corrected.push(alpha);

        chord_weight += panel.chord * panel.width;
        width_sum += panel.width;
    }

    let projected_area = body.projected_area(&config.projection_normal);
    let q_infinity = 0.5 * density * u_inf * u_inf;
    let reference_area = if projected_area > f64::EPSILON {
        projected_area
    } else {
        chord_weight
    };
    let mean_chord = chord_weight / width_sum.max(f64::EPSILON);

    // Wind axes from the freestream and the body span axis
    let drag_axis = va_global / u_inf;
    let mut lift_axis = drag_axis.cross(&body.spanwise_direction());
    if lift_axis.norm_squared() <= f64::EPSILON {
        lift_axis = Vector3::new(0.0, 0.0, 1.0);
    } else {
        lift_axis.normalize_mut();
    }
    let side_axis = lift_axis.cross(&drag_axis);

    let denominator = q_infinity * reference_area;
    let results = AeroResults {
        cl: force.dot(&lift_axis) / denominator,
        cd: force.dot(&drag_axis) / denominator,
        cs: force.dot(&side_axis) / denominator,
        cm: moment.dot(&side_axis) / (denominator * mean_chord),
        force,
        moment,
        gamma_distribution,
        cl_distribution,
        cd_distribution,
        cm_distribution,
        alpha_uncorrected,
        alpha_corrected,
        projected_area,
        iterations: report.iterations,
        warning: if report.converged {
            None
        } else {
            Some(DidNotConverge {
                iterations: report.iterations,
                last_residual: report.residual,
            })
        },
    };

    info!(
        cl = format!("{:.4}", results.cl),
        cd = format!("{:.5}", results.cd),
        converged = report.converged,
        "Integrated aerodynamic loads"
    );

    Ok(results)
}
