//! Steady aerodynamic loads on 3D wings with lifting-line and vortex-step
//! methods.
//!
//! This crate panels refined wing meshes into horseshoe vortex rings, builds
//! the induced-velocity influence matrices, and solves the nonlinear coupled
//! system between circulation, induced velocity and the sectional 2-D polar
//! with a damped fixed-point iteration.
//!
//! # Algorithm
//!
//! 1. [`BodyAerodynamics`] refines each wing and builds one [`Panel`] per
//!    pair of adjacent stations, each carrying a bound filament on the
//!    quarter-chord line, finite trailing legs and semi-infinite tails along
//!    the inflow.
//! 2. [`calculate_aic_matrices`] evaluates the Biot-Savart kernels of every
//!    filament system at every evaluation point (three-quarter-chord control
//!    point for VSM, quarter-chord aerodynamic center for LLT).
//! 3. [`gamma_loop`] iterates the damped fixed-point update of the
//!    circulation vector until the update stalls below tolerance, falling
//!    back to a Newton-Raphson solve if the iteration diverges.
//! 4. [`AeroResults`] integrates sectional loads into global force, moment
//!    and wind-axis coefficients.
//!
//! # Example
//!
//! ```
//! use aero_types::{Point3, Section, SectionModel, Vector3};
//! use aero_wing::Wing;
//! use aero_solver::{BodyAerodynamics, Solver, SolverConfig};
//!
//! let mut wing = Wing::new(10).unwrap();
//! wing.add_section(Section::new(
//!     Point3::new(0.0, 10.0, 0.0),
//!     Point3::new(1.0, 10.0, 0.0),
//!     SectionModel::Inviscid,
//! ));
//! wing.add_section(Section::new(
//!     Point3::new(0.0, -10.0, 0.0),
//!     Point3::new(1.0, -10.0, 0.0),
//!     SectionModel::Inviscid,
//! ));
//!
//! let mut body = BodyAerodynamics::new(vec![wing], Point3::origin()).unwrap();
//! let alpha = 5.0_f64.to_radians();
//! body.set_va(
//!     Vector3::new(20.0 * alpha.cos(), 0.0, 20.0 * alpha.sin()),
//!     Vector3::zeros(),
//! ).unwrap();
//!
//! let mut solver = Solver::new(SolverConfig::default());
//! let results = solver.solve(&body).unwrap();
//! assert!(results.converged());
//! assert!(results.cl > 0.0);
//! ```
//!
//! # Performance
//!
//! The hot path is allocation-free: all working arrays live in a
//! [`SolverState`] created once per body and reused across solves. The
//! `parallel` feature switches AIC assembly to row-parallel `rayon`
//! iteration; assignment stays deterministic.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod aic;
mod body;
mod error;
mod filament;
mod forces;
mod gamma;
mod panel;
mod params;
mod result;
pub mod settings;
mod solver;
mod state;

pub use aic::{calculate_aic_matrices, evaluation_point};
pub use body::BodyAerodynamics;
pub use error::{SolverError, SolverResult};
pub use filament::Filament;
pub use forces::calculate_results;
pub use gamma::{gamma_loop, residual, GammaLoopReport};
pub use panel::Panel;
pub use params::{AerodynamicModel, ArtificialDamping, InitialGamma, SolverConfig};
pub use result::{AeroResults, DidNotConverge};
pub use solver::Solver;
pub use state::SolverState;
