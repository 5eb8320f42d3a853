//! Solve orchestration: state sizing, AIC assembly, circulation loop and
//! load integration.

use tracing::info;

use crate::aic::calculate_aic_matrices;
use crate::body::BodyAerodynamics;
use crate::error::SolverResult;
use crate::forces::calculate_results;
use crate::gamma::gamma_loop;
use crate::params::SolverConfig;
use crate::result::AeroResults;
use crate::state::SolverState;

/// The aerodynamic solver: configuration plus reusable working buffers.
///
/// The buffers are sized on first use and reused across solves against
/// bodies of the same panel count, keeping repeated solves allocation-free
/// past the first.
///
/// # Example
///
/// ```
/// use aero_types::{Point3, Section, SectionModel, Vector3};
/// use aero_wing::Wing;
/// use aero_solver::{BodyAerodynamics, Solver, SolverConfig};
///
/// let mut wing = Wing::new(8).unwrap();
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
/// let mut body = BodyAerodynamics::new(vec![wing], Point3::origin()).unwrap();
/// body.set_va(Vector3::new(20.0, 0.0, 1.0), Vector3::zeros()).unwrap();
///
/// let mut solver = Solver::new(SolverConfig::default());
/// let results = solver.solve(&body).unwrap();
/// assert!(results.converged());
/// ```
#[derive(Debug)]
pub struct Solver {
    config: SolverConfig,
    state: Option<SolverState>,
}

impl Solver {
    /// Create a solver with the given configuration.
    #[must_use]
    pub const fn new(config: SolverConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Run a full solve: AIC assembly, circulation loop, load integration.
    ///
    /// The caller sets the inflow on the body beforehand via
    /// [`BodyAerodynamics::set_va`]. A solve that hits the iteration cap
    /// still returns results, flagged through [`AeroResults::warning`].
    ///
    /// # Errors
    ///
    /// Returns an error for zero or non-finite inflow, or when the
    /// circulation diverges beyond recovery.
    pub fn solve(&mut self, body: &BodyAerodynamics) -> SolverResult<AeroResults> {
        let n = body.panel_count();
        let state = match &mut self.state {
            Some(state) if state.panel_count() == n => state,
            slot => slot.insert(SolverState::new(n)),
        };

        state.prepare(body, &self.config)?;
        calculate_aic_matrices(
            body,
            self.config.model,
            self.config.core_radius_fraction,
            state,
        );
        let report = gamma_loop(body, &self.config, state)?;
        let results = calculate_results(body, &self.config, state, &report)?;

        info!(
            model = ?self.config.model,
            panels = n,
            iterations = report.iterations,
            converged = report.converged,
            "Solve finished"
        );

        Ok(results)
    }
}
