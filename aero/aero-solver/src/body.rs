//! Aggregation of one or more wings into a single panel system.

use std::ops::Range;

use aero_types::{Point3, Vector3};
use aero_wing::Wing;
use tracing::info;

use crate::error::{SolverError, SolverResult};
use crate::panel::Panel;

/// All panels of all wings, together with the apparent inflow state.
///
/// Building a body refines each wing and panels the refined meshes. Panels
/// are stored wing after wing; [`BodyAerodynamics::wing_ranges`] gives the
/// panel slice of each wing.
///
/// # Example
///
/// ```
/// use aero_types::{Point3, Section, SectionModel, Vector3};
/// use aero_wing::Wing;
/// use aero_solver::BodyAerodynamics;
///
/// let mut wing = Wing::new(4).unwrap();
/// wing.add_section(Section::new(
///     Point3::new(0.0, 5.0, 0.0),
///     Point3::new(1.0, 5.0, 0.0),
///     SectionModel::Inviscid,
/// ));
/// wing.add_section(Section::new(
///     Point3::new(0.0, -5.0, 0.0),
///     Point3::new(1.0, -5.0, 0.0),
///     SectionModel::Inviscid,
/// ));
///
/// let mut body = BodyAerodynamics::new(vec![wing], Point3::origin()).unwrap();
/// body.set_va(Vector3::new(10.0, 0.0, 0.0), Vector3::zeros()).unwrap();
/// assert_eq!(body.panel_count(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct BodyAerodynamics {
    wings: Vec<Wing>,
    panels: Vec<Panel>,
    wing_ranges: Vec<Range<usize>>,
    va_global: Vector3<f64>,
    omega: Vector3<f64>,
    origin: Point3<f64>,
    spanwise_direction: Vector3<f64>,
}

impl BodyAerodynamics {
    /// Refine every wing and build the panel system.
    ///
    /// `origin` is the reference point for the rotational part of the
    /// apparent velocity, `omega x (r - origin)`.
    ///
    /// # Errors
    ///
    /// Returns wing configuration/geometry errors, or [`SolverError::EmptyBody`]
    /// if no wing contributes a panel.
    pub fn new(wings: Vec<Wing>, origin: Point3<f64>) -> SolverResult<Self> {
        if wings.is_empty() {
            return Err(SolverError::EmptyBody);
        }

        let mut panels = Vec::new();
        let mut wing_ranges = Vec::with_capacity(wings.len());
        for wing in &wings {
            let refined = wing.refine()?;
            let start = panels.len();
            for pair in refined.windows(2) {
                panels.push(Panel::from_sections(
                    &pair[0],
                    &pair[1],
                    Vector3::new(1.0, 0.0, 0.0),
                )?);
            }
            wing_ranges.push(start..panels.len());
        }
        if panels.is_empty() {
            return Err(SolverError::EmptyBody);
        }

        let spanwise_direction = wings[0].spanwise_direction();

        info!(
            wings = wings.len(),
            panels = panels.len(),
            "Built aerodynamic body"
        );

        Ok(Self {
            wings,
            panels,
            wing_ranges,
            va_global: Vector3::zeros(),
            omega: Vector3::zeros(),
            origin,
            spanwise_direction,
        })
    }

    /// Set the apparent inflow. Each panel's velocity becomes
    /// `va + omega x (aero_center - origin)` and the semi-infinite trailing
    /// filaments are re-aimed along it.
    ///
    /// # Errors
    ///
    /// Returns an error when the resulting inflow is non-finite, or zero on
    /// any panel.
    pub fn set_va(&mut self, va: Vector3<f64>, omega: Vector3<f64>) -> SolverResult<()> {
        if !va.iter().chain(omega.iter()).all(|c| c.is_finite()) {
            return Err(SolverError::NonFiniteState { what: "inflow" });
        }
        for (index, panel) in self.panels.iter_mut().enumerate() {
            let arm = panel.aero_center - self.origin;
            let local = va + omega.cross(&arm);
            if local.norm_squared() <= f64::EPSILON {
                return Err(SolverError::ZeroInflow { panel: index });
            }
            panel.set_inflow(local)?;
        }
        self.va_global = va;
        self.omega = omega;
        Ok(())
    }

    /// The panels of all wings, wing after wing.
    #[must_use]
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// Total panel count.
    #[must_use]
    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    /// The panel index range of each wing.
    #[must_use]
    pub fn wing_ranges(&self) -> &[Range<usize>] {
        &self.wing_ranges
    }

    /// The wings this body was built from.
    #[must_use]
    pub fn wings(&self) -> &[Wing] {
        &self.wings
    }

    /// Global freestream velocity, excluding the rotational part.
    #[must_use]
    pub const fn va_global(&self) -> Vector3<f64> {
        self.va_global
    }

    /// Body rotation rate.
    #[must_use]
    pub const fn omega(&self) -> Vector3<f64> {
        self.omega
    }

    /// Rotation reference point.
    #[must_use]
    pub const fn origin(&self) -> Point3<f64> {
        self.origin
    }

    /// Spanwise direction of the first wing; used for wind-axis resolution.
    #[must_use]
    pub const fn spanwise_direction(&self) -> Vector3<f64> {
        self.spanwise_direction
    }

    /// Total panel area projected on the plane with unit normal `normal`.
    #[must_use]
    pub fn projected_area(&self, normal: &Vector3<f64>) -> f64 {
        self.panels
            .iter()
            .map(|panel| panel.projected_area(normal))
            .sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use aero_types::{Section, SectionModel};
    use approx::assert_relative_eq;

    fn rectangular_wing(n_panels: usize, span: f64, chord: f64) -> Wing {
        let mut wing = Wing::new(n_panels).unwrap();
        wing.add_section(Section::new(
            Point3::new(0.0, span / 2.0, 0.0),
            Point3::new(chord, span / 2.0, 0.0),
            SectionModel::Inviscid,
        ));
        wing.add_section(Section::new(
            Point3::new(0.0, -span / 2.0, 0.0),
            Point3::new(chord, -span / 2.0, 0.0),
            SectionModel::Inviscid,
        ));
        wing
    }

    #[test]
    fn panel_count_sums_over_wings() {
        let body = BodyAerodynamics::new(
            vec![rectangular_wing(4, 10.0, 1.0), rectangular_wing(3, 6.0, 0.5)],
            Point3::origin(),
        )
        .unwrap();
        assert_eq!(body.panel_count(), 7);
        assert_eq!(body.wing_ranges(), &[0..4, 4..7]);
    }

    #[test]
    fn empty_body_is_rejected() {
        assert!(matches!(
            BodyAerodynamics::new(vec![], Point3::origin()).unwrap_err(),
            SolverError::EmptyBody
        ));
    }

    #[test]
    fn set_va_is_uniform_without_rotation() {
        let mut body =
            BodyAerodynamics::new(vec![rectangular_wing(4, 10.0, 1.0)], Point3::origin()).unwrap();
        let va = Vector3::new(12.0, 0.0, 3.0);
        body.set_va(va, Vector3::zeros()).unwrap();
        for panel in body.panels() {
            assert_relative_eq!((panel.va - va).norm(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn rotation_adds_omega_cross_r() {
        let mut body =
            BodyAerodynamics::new(vec![rectangular_wing(4, 10.0, 1.0)], Point3::origin()).unwrap();
        let va = Vector3::new(10.0, 0.0, 0.0);
        let omega = Vector3::new(0.0, 0.0, 0.1);
        body.set_va(va, omega).unwrap();
        for panel in body.panels() {
            let expected = va + omega.cross(&(panel.aero_center - Point3::origin()));
            assert_relative_eq!((panel.va - expected).norm(), 0.0, epsilon = 1e-12);
        }
        // Panels at +y see a slower inflow than panels at -y for positive yaw rate
        let first = body.panels().first().unwrap().va.norm();
        let last = body.panels().last().unwrap().va.norm();
        assert!(first < last);
    }

    #[test]
    fn zero_inflow_is_rejected() {
        let mut body =
            BodyAerodynamics::new(vec![rectangular_wing(4, 10.0, 1.0)], Point3::origin()).unwrap();
        assert!(matches!(
            body.set_va(Vector3::zeros(), Vector3::zeros()).unwrap_err(),
            SolverError::ZeroInflow { .. }
        ));
    }

    #[test]
    fn projected_area_of_flat_rectangular_wing() {
        let body =
            BodyAerodynamics::new(vec![rectangular_wing(20, 20.0, 1.0)], Point3::origin()).unwrap();
        let area = body.projected_area(&Vector3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(area, 20.0, epsilon = 1e-9);
    }
}
