//! Error types for the aerodynamic solver.

use aero_types::SectionError;
use aero_wing::WingError;
use thiserror::Error;

/// Result type alias for solver operations.
pub type SolverResult<T> = Result<T, SolverError>;

/// Errors that can occur while building a body or running a solve.
#[derive(Debug, Error)]
pub enum SolverError {
    /// A body needs at least one wing with at least one panel.
    #[error("body has no panels")]
    EmptyBody,

    /// The apparent inflow is zero on at least one panel; angles of attack
    /// are undefined.
    #[error("apparent inflow is zero at panel {panel}")]
    ZeroInflow {
        /// Index of the offending panel.
        panel: usize,
    },

    /// NaN or infinity showed up where finite state is required.
    #[error("non-finite {what}")]
    NonFiniteState {
        /// Which array went non-finite (`inflow`, `aic` or `gamma`).
        what: &'static str,
    },

    /// A panel could not be built from its bracketing sections.
    #[error("degenerate panel geometry: {0}")]
    DegeneratePanel(String),

    /// Wing refinement or panelling failed while building the body.
    #[error(transparent)]
    Wing(#[from] WingError),

    /// A section model could not be processed while building a panel.
    #[error(transparent)]
    Section(#[from] SectionError),

    /// A settings file could not be parsed or converted.
    #[error("invalid settings: {0}")]
    Settings(String),
}

impl SolverError {
    /// Create a settings error.
    #[must_use]
    pub fn settings(details: impl Into<String>) -> Self {
        Self::Settings(details.into())
    }
}
