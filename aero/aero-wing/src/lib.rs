//! Wing assembly and spanwise mesh refinement.
//!
//! This crate turns a handful of user-provided wing stations into the dense,
//! strictly ordered spanwise mesh the solver crates panel over.
//!
//! # Algorithm
//!
//! User sections may be added in any order; they are canonicalized by sorting
//! along the wing's spanwise direction before anything else happens. The
//! refinement then resamples the quarter-chord polyline with one of the
//! [`PanelDistribution`] strategies and rebuilds leading/trailing edges by
//! interpolating chord direction and chord length separately. Sectional
//! aerodynamic data is interpolated alongside the geometry.
//!
//! # Example
//!
//! ```
//! use aero_types::{Point3, Section, SectionModel};
//! use aero_wing::Wing;
//!
//! let mut wing = Wing::new(4).unwrap();
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
//! let refined = wing.refine().unwrap();
//! assert_eq!(refined.len(), 5);
//! // Stations run from positive to negative y
//! assert!(refined[0].leading_edge.y > refined[4].leading_edge.y);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod refine;
mod wing;

pub use error::{WingError, WingResult};
pub use wing::Wing;
