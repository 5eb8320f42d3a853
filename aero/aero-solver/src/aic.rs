//! Assembly of the induced-velocity influence matrices.

use aero_types::Point3;
use tracing::debug;

use crate::body::BodyAerodynamics;
use crate::panel::Panel;
use crate::params::AerodynamicModel;
use crate::state::SolverState;

/// Fill the three influence matrices with the unit-circulation induced
/// velocities of every panel's filament system at every evaluation point.
///
/// The evaluation point of row `i` is panel `i`'s control point for VSM and
/// its aerodynamic center for LLT. On the diagonal the 2-D bound self-term
/// is removed: VSM subtracts the infinite-line bound velocity at the
/// control point (the finite ring is kept, so only the 3-D correction
/// remains), while LLT skips the bound filament outright since its
/// regularized velocity on the filament is zero anyway. Without this
/// removal the polar closure would see its own 2-D downwash and the
/// sectional lift slope would halve. Traversal is row-major over evaluation
/// points and the buffers are reused, so assembly performs no per-entry
/// allocation.
///
/// # Panics
///
/// Panics if the state was sized for a different panel count.
pub fn calculate_aic_matrices(
    body: &BodyAerodynamics,
    model: AerodynamicModel,
    core_radius_fraction: f64,
    state: &mut SolverState,
) {
    let n = body.panel_count();
    assert_eq!(state.panel_count(), n, "state sized for a different body");

    let panels = body.panels();

    // The matrices are stored transposed: column i is the logical row of
    // evaluation point i and is contiguous in memory.
    let x = state.aic_x.as_mut_slice();
    let y = state.aic_y.as_mut_slice();
    let z = state.aic_z.as_mut_slice();

    let fill_row = |i: usize, row_x: &mut [f64], row_y: &mut [f64], row_z: &mut [f64]| {
        let point = evaluation_point(&panels[i], model);
        for (j, source) in panels.iter().enumerate() {
            let velocity = if i == j {
                match model {
                    AerodynamicModel::Llt => {
                        source.velocity_induced(&point, 1.0, core_radius_fraction, false)
                    }
                    AerodynamicModel::Vsm => {
                        source.velocity_induced(&point, 1.0, core_radius_fraction, true)
                            - source.bound_velocity_2d(&point, 1.0)
                    }
                }
            } else {
                source.velocity_induced(&point, 1.0, core_radius_fraction, true)
            };
            row_x[j] = velocity.x;
            row_y[j] = velocity.y;
            row_z[j] = velocity.z;
        }
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        x.par_chunks_mut(n)
            .zip(y.par_chunks_mut(n))
            .zip(z.par_chunks_mut(n))
            .enumerate()
            .for_each(|(i, ((row_x, row_y), row_z))| fill_row(i, row_x, row_y, row_z));
    }
    #[cfg(not(feature = "parallel"))]
    {
        for (i, ((row_x, row_y), row_z)) in x
            .chunks_mut(n)
            .zip(y.chunks_mut(n))
            .zip(z.chunks_mut(n))
            .enumerate()
        {
            fill_row(i, row_x, row_y, row_z);
        }
    }

    debug!(panels = n, model = ?model, "Assembled AIC matrices");
}

/// The point a panel's angle of attack is reconstructed at.
#[must_use]
pub fn evaluation_point(panel: &Panel, model: AerodynamicModel) -> Point3<f64> {
    match model {
        AerodynamicModel::Vsm => panel.control_point,
        AerodynamicModel::Llt => panel.aero_center,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::params::SolverConfig;
    use aero_types::{Section, SectionModel, Vector3};
    use aero_wing::Wing;
    use approx::assert_relative_eq;

    fn body(n_panels: usize) -> BodyAerodynamics {
        let mut wing = Wing::new(n_panels).unwrap();
        wing.add_section(Section::new(
            Point3::new(0.0, 5.0, 0.0),
            Point3::new(1.0, 5.0, 0.0),
            SectionModel::Inviscid,
        ));
        wing.add_section(Section::new(
            Point3::new(0.0, -5.0, 0.0),
            Point3::new(1.0, -5.0, 0.0),
            SectionModel::Inviscid,
        ));
        let mut body = BodyAerodynamics::new(vec![wing], Point3::origin()).unwrap();
        body.set_va(Vector3::new(10.0, 0.0, 0.0), Vector3::zeros())
            .unwrap();
        body
    }

    #[test]
    fn off_diagonal_entries_match_direct_kernel_evaluation() {
        let body = body(4);
        let mut state = SolverState::new(4);
        state.prepare(&body, &SolverConfig::default()).unwrap();
        calculate_aic_matrices(&body, AerodynamicModel::Vsm, 1e-20, &mut state);

        for i in 0..4 {
            let point = body.panels()[i].control_point;
            for j in 0..4 {
                if i == j {
                    continue;
                }
                let direct = body.panels()[j].velocity_induced(&point, 1.0, 1e-20, true);
                let stored = state.aic(i, j);
                assert_relative_eq!((direct - stored).norm(), 0.0, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn llt_diagonal_excludes_bound_filament() {
        let body = body(4);
        let mut state = SolverState::new(4);
        state.prepare(&body, &SolverConfig::default()).unwrap();
        calculate_aic_matrices(&body, AerodynamicModel::Llt, 1e-20, &mut state);

        for i in 0..4 {
            let point = body.panels()[i].aero_center;
            let without_bound = body.panels()[i].velocity_induced(&point, 1.0, 1e-20, false);
            assert_relative_eq!(
                (state.aic(i, i) - without_bound).norm(),
                0.0,
                epsilon = 1e-14
            );
        }
    }

    #[test]
    fn vsm_diagonal_is_ring_minus_two_dimensional_bound() {
        let body = body(4);
        let mut state = SolverState::new(4);
        state.prepare(&body, &SolverConfig::default()).unwrap();
        calculate_aic_matrices(&body, AerodynamicModel::Vsm, 1e-20, &mut state);

        for i in 0..4 {
            let panel = &body.panels()[i];
            let point = panel.control_point;
            let expected = panel.velocity_induced(&point, 1.0, 1e-20, true)
                - panel.bound_velocity_2d(&point, 1.0);
            assert_relative_eq!((state.aic(i, i) - expected).norm(), 0.0, epsilon = 1e-14);
            // For wide panels the finite bound nearly cancels the 2-D line,
            // so the residual self-term is small against the 2-D downwash
            let two_d = panel.bound_velocity_2d(&point, 1.0);
            assert!(expected.z.abs() < two_d.z.abs());
        }
    }

    #[test]
    fn downwash_has_consistent_sign_across_the_span() {
        // With positive ring circulation (bound along -y), the wake system
        // sweeps every control point in the same normal direction
        let body = body(8);
        let mut state = SolverState::new(8);
        state.prepare(&body, &SolverConfig::default()).unwrap();
        calculate_aic_matrices(&body, AerodynamicModel::Vsm, 1e-20, &mut state);

        let mut sum = 0.0;
        for i in 0..8 {
            for j in 0..8 {
                sum += state.aic(i, j).z;
            }
        }
        assert!(sum.abs() > 0.0);
    }
}
