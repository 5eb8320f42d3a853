//! Core types for steady wing aerodynamics.
//!
//! This crate provides the foundational types shared by the wing-geometry and
//! solver crates:
//!
//! - [`Section`] - A spanwise wing station with leading/trailing edge points
//! - [`SectionModel`] - The 2-D aerodynamic model attached to a station
//! - [`PolarTable`] / [`PolarGrid`] - Tabulated lift/drag/moment polars
//! - [`LeiAirfoil`] - Analytic leading-edge-inflatable airfoil model
//! - [`PanelDistribution`] - Spanwise panel distribution strategies
//!
//! # Layer 0 Crate
//!
//! This crate has no solver or geometry-processing dependencies. It can be
//! used on its own to evaluate sectional polars, or as the input vocabulary
//! for the `aero-wing` and `aero-solver` crates.
//!
//! # Units and Conventions
//!
//! All coordinates are `f64` metres in a **right-handed** system: `x`
//! forward along the chord at zero incidence, `y` spanwise, `z` up. Angles of
//! attack passed to [`SectionModel`] are in **radians**.
//!
//! # Example
//!
//! ```
//! use aero_types::{Point3, Section, SectionModel};
//!
//! let section = Section::new(
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     SectionModel::Inviscid,
//! );
//!
//! assert!((section.chord_length() - 1.0).abs() < 1e-12);
//! let cl = section.model.cl(0.1, 0.0);
//! assert!((cl - 2.0 * std::f64::consts::PI * 0.1_f64.sin()).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod distribution;
mod error;
mod grid;
mod lei;
mod model;
mod polar;
mod section;

pub use distribution::PanelDistribution;
pub use error::{SectionError, SectionResult};
pub use grid::PolarGrid;
pub use lei::LeiAirfoil;
pub use model::{AeroCoefficients, SectionModel};
pub use polar::PolarTable;
pub use section::Section;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix3, Point3, Unit, Vector3};
