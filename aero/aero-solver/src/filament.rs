//! Biot-Savart kernels for the three vortex filament kinds.

use nalgebra::{Point3, Vector3};

use std::f64::consts::PI;

/// Absolute underflow guard for core radii and near-zero denominators.
pub(crate) const EPS_ABS: f64 = 1e-20;

const FOUR_PI: f64 = 4.0 * PI;

/// A single vortex filament of a panel's horseshoe system.
///
/// Positive circulation flows from `start` to `end` for the segment kinds,
/// and along `sign * direction` for the semi-infinite tails.
#[derive(Debug, Clone, PartialEq)]
pub enum Filament {
    /// The bound segment lying on the quarter-chord line.
    Bound {
        /// Segment start point.
        start: Point3<f64>,
        /// Segment end point.
        end: Point3<f64>,
    },
    /// A finite trailing segment between the quarter chord and the trailing
    /// edge.
    Trailing {
        /// Segment start point.
        start: Point3<f64>,
        /// Segment end point.
        end: Point3<f64>,
    },
    /// A semi-infinite tail leaving the trailing edge along the inflow.
    SemiInfinite {
        /// Ray origin.
        pivot: Point3<f64>,
        /// Unit inflow direction at panel creation; refreshed by `set_va`.
        direction: Vector3<f64>,
        /// `+1.0` or `-1.0`, orienting the circulation along the ray.
        sign: f64,
    },
}

impl Filament {
    /// Induced velocity at `point` for circulation `gamma`.
    ///
    /// All kernels are regularized with a solid-body (Rankine) core of
    /// radius `core_radius_fraction` times the filament length scale; they
    /// never allocate.
    #[must_use]
    pub fn velocity_induced(
        &self,
        point: &Point3<f64>,
        gamma: f64,
        core_radius_fraction: f64,
    ) -> Vector3<f64> {
        match self {
            Self::Bound { start, end } | Self::Trailing { start, end } => {
                segment_induced_velocity(point, start, end, gamma, core_radius_fraction)
            }
            Self::SemiInfinite {
                pivot,
                direction,
                sign,
            } => semi_infinite_induced_velocity(
                point,
                pivot,
                direction,
                sign * gamma,
                core_radius_fraction,
            ),
        }
    }
}

/// Biot-Savart velocity of a straight segment from `p1` to `p2` carrying
/// circulation `gamma`, evaluated at `p`.
///
/// Inside the Rankine core of radius `max(core_radius_fraction * |r0|,
/// 1e-20)` the `1/d` profile is replaced by solid-body rotation `d / rho^2`.
/// Points closer than the core radius to either endpoint see zero velocity.
pub(crate) fn segment_induced_velocity(
    p: &Point3<f64>,
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    gamma: f64,
    core_radius_fraction: f64,
) -> Vector3<f64> {
    let r1 = p - p1;
    let r2 = p - p2;
    let r0 = p2 - p1;

    let r1_norm = r1.norm();
    let r2_norm = r2.norm();
    let r0_norm = r0.norm();
    if r0_norm <= EPS_ABS {
        return Vector3::zeros();
    }

    let core = (core_radius_fraction * r0_norm).max(EPS_ABS);
    if r1_norm < core || r2_norm < core {
        return Vector3::zeros();
    }

    let cross = r1.cross(&r2);
    let cross_norm_sq = cross.norm_squared();
    if cross_norm_sq <= EPS_ABS * EPS_ABS {
        // Evaluation point on the filament axis
        return Vector3::zeros();
    }

    let alignment = r0.dot(&(r1 / r1_norm - r2 / r2_norm));
    let perp_distance = cross_norm_sq.sqrt() / r0_norm;

    if perp_distance < core {
        // Solid-body profile: v ~ d instead of 1/d
        cross * (gamma / FOUR_PI * alignment / (r0_norm * r0_norm * core * core))
    } else {
        cross * (gamma / FOUR_PI * alignment / cross_norm_sq)
    }
}

/// Velocity of a semi-infinite filament from `pivot` along unit `direction`,
/// carrying circulation `gamma`, evaluated at `p`.
///
/// The core cutoff acts on the perpendicular distance to the ray, with the
/// distance from the pivot as the length scale.
pub(crate) fn semi_infinite_induced_velocity(
    p: &Point3<f64>,
    pivot: &Point3<f64>,
    direction: &Vector3<f64>,
    gamma: f64,
    core_radius_fraction: f64,
) -> Vector3<f64> {
    let r1 = p - pivot;
    let r1_norm = r1.norm();

    let core = (core_radius_fraction * r1_norm).max(EPS_ABS);
    if r1_norm < core {
        return Vector3::zeros();
    }

    let cross = direction.cross(&r1);
    let cross_norm_sq = cross.norm_squared();
    if cross_norm_sq <= EPS_ABS * EPS_ABS {
        // On the ray axis
        return Vector3::zeros();
    }

    let closing = 1.0 + r1.dot(direction) / r1_norm;
    let perp_distance = cross_norm_sq.sqrt();

    if perp_distance < core {
        cross * (gamma / FOUR_PI * closing / (core * core))
    } else {
        cross * (gamma / FOUR_PI * closing / cross_norm_sq)
    }
}
