//! Panels: one chordwise-bound vortex ring per pair of refined sections.

use aero_types::{Point3, Section, SectionModel, Vector3};

use crate::error::{SolverError, SolverResult};
use crate::filament::Filament;

/// Index of the bound filament inside [`Panel::filaments`].
pub(crate) const BOUND_FILAMENT: usize = 1;

/// A spanwise panel with its local frame, horseshoe filaments and sectional
/// aerodynamic model.
///
/// Panels snapshot everything they need from the two bracketing sections at
/// construction; they hold no references back to the wing. The semi-infinite
/// trailing filaments follow the local inflow and are refreshed whenever the
/// body's apparent velocity changes.
#[derive(Debug, Clone)]
pub struct Panel {
    /// Quarter-chord spanwise midpoint; LLT evaluation point.
    pub aero_center: Point3<f64>,
    /// Three-quarter-chord spanwise midpoint; VSM evaluation point.
    pub control_point: Point3<f64>,
    /// Chordwise unit axis, leading to trailing edge.
    pub x_airf: Vector3<f64>,
    /// Spanwise unit axis, first to second section.
    pub y_airf: Vector3<f64>,
    /// Normal unit axis, `x_airf x y_airf`.
    pub z_airf: Vector3<f64>,
    /// Mid-panel chord length.
    pub chord: f64,
    /// Spanwise width between the section leading edges.
    pub width: f64,
    /// Apparent inflow at the aerodynamic center; set by the body.
    pub va: Vector3<f64>,
    /// Control deflection passed to the sectional model.
    pub delta: f64,
    /// Corner points `[LE_1, LE_2, TE_2, TE_1]` of the panel quadrilateral.
    pub corners: [Point3<f64>; 4],
    /// Sectional aerodynamic model at mid-panel.
    pub model: SectionModel,
    pub(crate) filaments: [Filament; 5],
}

impl Panel {
    /// Build a panel between two consecutive refined sections.
    ///
    /// `inflow_direction` seeds the semi-infinite trailing filaments; it is
    /// refreshed later by `set_va`.
    ///
    /// # Errors
    ///
    /// Returns a geometry error if the section pair is degenerate (zero
    /// chord, zero width, or collinear chord and span axes).
    pub fn from_sections(
        first: &Section,
        second: &Section,
        inflow_direction: Vector3<f64>,
    ) -> SolverResult<Self> {
        let le_mid = first.leading_edge.coords.lerp(&second.leading_edge.coords, 0.5);
        let te_mid = first
            .trailing_edge
            .coords
            .lerp(&second.trailing_edge.coords, 0.5);
        let chord_vector = te_mid - le_mid;
        let chord = chord_vector.norm();
        let span_vector = second.leading_edge - first.leading_edge;
        let width = span_vector.norm();
        if chord <= f64::EPSILON || width <= f64::EPSILON {
            return Err(SolverError::DegeneratePanel(
                "zero chord or zero width".into(),
            ));
        }

        let x_airf = chord_vector / chord;
        let y_airf = span_vector / width;
        let normal = x_airf.cross(&y_airf);
        if normal.norm_squared() <= f64::EPSILON {
            return Err(SolverError::DegeneratePanel(
                "chord and span axes are collinear".into(),
            ));
        }
        let z_airf = normal.normalize();

        let aero_center = Point3::from(le_mid + 0.25 * chord_vector);
        let control_point = Point3::from(le_mid + 0.75 * chord_vector);

        let qc_1 = first.quarter_chord();
        let qc_2 = second.quarter_chord();
        let te_1 = first.trailing_edge;
        let te_2 = second.trailing_edge;

        let model = SectionModel::blend(&first.model, &second.model, 0.5)?;

        let filaments = [
            Filament::Trailing {
                start: te_1,
                end: qc_1,
            },
            Filament::Bound {
                start: qc_1,
                end: qc_2,
            },
            Filament::Trailing {
                start: qc_2,
                end: te_2,
            },
            Filament::SemiInfinite {
                pivot: te_2,
                direction: inflow_direction,
                sign: 1.0,
            },
            Filament::SemiInfinite {
                pivot: te_1,
                direction: inflow_direction,
                sign: -1.0,
            },
        ];

        Ok(Self {
            aero_center,
            control_point,
            x_airf,
            y_airf,
            z_airf,
            chord,
            width,
            va: Vector3::zeros(),
            delta: 0.0,
            corners: [first.leading_edge, second.leading_edge, te_2, te_1],
            model,
            filaments,
        })
    }

    /// The horseshoe filaments of this panel.
    #[must_use]
    pub fn filaments(&self) -> &[Filament] {
        &self.filaments
    }

    /// Velocity induced at `point` by this panel's filament system carrying
    /// circulation `gamma`.
    ///
    /// With `include_bound = false` the bound segment is excluded, which
    /// removes the 2-D self-term when a panel evaluates its own ring at the
    /// aerodynamic center.
    #[must_use]
    pub fn velocity_induced(
        &self,
        point: &Point3<f64>,
        gamma: f64,
        core_radius_fraction: f64,
        include_bound: bool,
    ) -> Vector3<f64> {
        let mut velocity = Vector3::zeros();
        for (index, filament) in self.filaments.iter().enumerate() {
            if !include_bound && index == BOUND_FILAMENT {
                continue;
            }
            velocity += filament.velocity_induced(point, gamma, core_radius_fraction);
        }
        velocity
    }

    /// Velocity the bound filament would induce at `point` as an infinite
    /// (2-D) vortex line carrying circulation `gamma`.
    ///
    /// The vortex-step method subtracts this from a panel's own-ring
    /// influence at the control point, so the polar closure is not fed its
    /// own 2-D downwash.
    #[must_use]
    pub fn bound_velocity_2d(&self, point: &Point3<f64>, gamma: f64) -> Vector3<f64> {
        let Filament::Bound { start, end } = &self.filaments[BOUND_FILAMENT] else {
            return Vector3::zeros();
        };
        let axis = (end - start).normalize();
        let r = point - start;
        let r_perp = r - r.dot(&axis) * axis;
        let distance_sq = r_perp.norm_squared();
        if distance_sq <= f64::EPSILON {
            return Vector3::zeros();
        }
        axis.cross(&r_perp) * (gamma / (2.0 * std::f64::consts::PI * distance_sq))
    }

    /// Update the apparent inflow and re-aim the semi-infinite tails.
    pub(crate) fn set_inflow(&mut self, va: Vector3<f64>) -> SolverResult<()> {
        let norm = va.norm();
        if !norm.is_finite() {
            return Err(SolverError::NonFiniteState { what: "inflow" });
        }
        self.va = va;
        if norm > f64::EPSILON {
            let direction = va / norm;
            for filament in &mut self.filaments {
                if let Filament::SemiInfinite {
                    direction: filament_direction,
                    ..
                } = filament
                {
                    *filament_direction = direction;
                }
            }
        }
        Ok(())
    }

    /// Area of the panel quadrilateral projected on the plane with unit
    /// normal `normal`.
    #[must_use]
    pub fn projected_area(&self, normal: &Vector3<f64>) -> f64 {
        let project = |p: &Point3<f64>| -> Vector3<f64> {
            p.coords - p.coords.dot(normal) * normal
        };
        let c0 = project(&self.corners[0]);
        let c1 = project(&self.corners[1]);
        let c2 = project(&self.corners[2]);
        let c3 = project(&self.corners[3]);
        0.5 * (c2 - c0).cross(&(c3 - c1)).norm()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn section(y: f64) -> Section {
        Section::new(
            Point3::new(0.0, y, 0.0),
            Point3::new(1.0, y, 0.0),
            SectionModel::Inviscid,
        )
    }

    fn unit_x() -> Vector3<f64> {
        Vector3::new(1.0, 0.0, 0.0)
    }

    #[test]
    fn frame_is_orthonormal() {
        let panel = Panel::from_sections(&section(1.0), &section(-1.0), unit_x()).unwrap();
        assert_relative_eq!(panel.x_airf.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(panel.y_airf.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(panel.z_airf.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(panel.x_airf.dot(&panel.y_airf), 0.0, epsilon = 1e-12);
        assert_relative_eq!(panel.x_airf.dot(&panel.z_airf), 0.0, epsilon = 1e-12);
        assert_relative_eq!(panel.y_airf.dot(&panel.z_airf), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn reference_points_sit_on_the_chord_line() {
        let panel = Panel::from_sections(&section(1.0), &section(-1.0), unit_x()).unwrap();
        assert_relative_eq!(panel.aero_center.x, 0.25, epsilon = 1e-12);
        assert_relative_eq!(panel.control_point.x, 0.75, epsilon = 1e-12);
        assert_relative_eq!(panel.aero_center.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(panel.chord, 1.0, epsilon = 1e-12);
        assert_relative_eq!(panel.width, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn descending_span_sections_give_downward_normal() {
        // Sections sorted descending in y: y_airf = -y, z_airf = x cross y_airf = -z
        let panel = Panel::from_sections(&section(1.0), &section(-1.0), unit_x()).unwrap();
        assert_relative_eq!(panel.y_airf.y, -1.0, epsilon = 1e-12);
        assert_relative_eq!(panel.z_airf.z, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn set_inflow_reaims_trailing_tails() {
        let mut panel = Panel::from_sections(&section(1.0), &section(-1.0), unit_x()).unwrap();
        let new_inflow = Vector3::new(3.0, 0.0, 4.0);
        panel.set_inflow(new_inflow).unwrap();
        for filament in panel.filaments() {
            if let Filament::SemiInfinite { direction, .. } = filament {
                assert_relative_eq!((direction - new_inflow / 5.0).norm(), 0.0, epsilon = 1e-12);
            }
        }
        assert!(panel.set_inflow(Vector3::new(f64::NAN, 0.0, 0.0)).is_err());
    }

    #[test]
    fn projected_area_of_flat_panel() {
        let panel = Panel::from_sections(&section(1.0), &section(-1.0), unit_x()).unwrap();
        let z = Vector3::new(0.0, 0.0, 1.0);
        assert_relative_eq!(panel.projected_area(&z), 2.0, epsilon = 1e-12);
        // Projection along the chord axis collapses the quad to a line
        assert_relative_eq!(
            panel.projected_area(&Vector3::new(0.0, 1.0, 0.0)),
            0.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn own_ring_velocity_at_control_point_is_downwash() {
        let panel = Panel::from_sections(&section(1.0), &section(-1.0), unit_x()).unwrap();
        // Positive circulation around the ring: bound along y_airf (-y here)
        let v = panel.velocity_induced(&panel.control_point, 1.0, 1e-20, true);
        // The bound vortex dominates at the three-quarter chord point
        assert!(v.z.abs() > 0.0);
        let v_without_bound =
            panel.velocity_induced(&panel.control_point, 1.0, 1e-20, false);
        assert!(
            (v - v_without_bound).norm() > 1e-3,
            "bound filament contribution should be visible"
        );
    }
}
