//! Result types of an aerodynamic solve.

use aero_types::Vector3;

/// Convergence warning carried alongside a usable result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DidNotConverge {
    /// Iterations run before giving up.
    pub iterations: usize,
    /// Relative residual at the last iteration.
    pub last_residual: f64,
}

/// Integrated loads and spanwise distributions of a converged (or
/// best-effort) solve.
#[derive(Debug, Clone, Default)]
pub struct AeroResults {
    /// Lift coefficient in wind axes.
    pub cl: f64,
    /// Drag coefficient in wind axes.
    pub cd: f64,
    /// Side-force coefficient in wind axes.
    pub cs: f64,
    /// Pitching-moment coefficient about the reference point.
    pub cm: f64,
    /// Total aerodynamic force in global coordinates.
    pub force: Vector3<f64>,
    /// Total aerodynamic moment about the reference point.
    pub moment: Vector3<f64>,
    /// Converged circulation per panel.
    pub gamma_distribution: Vec<f64>,
    /// Sectional lift coefficient per panel.
    pub cl_distribution: Vec<f64>,
    /// Sectional drag coefficient per panel.
    pub cd_distribution: Vec<f64>,
    /// Sectional moment coefficient per panel.
    pub cm_distribution: Vec<f64>,
    /// Geometric angle of attack per panel, from the apparent inflow alone.
    pub alpha_uncorrected: Vec<f64>,
    /// Effective angle of attack per panel, including induced velocities.
    pub alpha_corrected: Vec<f64>,
    /// Projected (frontal) reference area.
    pub projected_area: f64,
    /// Iterations the circulation solve ran.
    pub iterations: usize,
    /// Present when the solve stopped at the iteration cap; the distributions
    /// then hold the last iterate.
    pub warning: Option<DidNotConverge>,
}

impl AeroResults {
    /// Whether the circulation solve converged.
    #[must_use]
    pub const fn converged(&self) -> bool {
        self.warning.is_none()
    }
}

impl std::fmt::Display for AeroResults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Aerodynamic solve:")?;
        writeln!(f, "  cl: {:.4}  cd: {:.5}  cs: {:.5}  cm: {:.5}", self.cl, self.cd, self.cs, self.cm)?;
        writeln!(f, "  projected area: {:.4}", self.projected_area)?;
        writeln!(f, "  iterations: {}", self.iterations)?;
        if let Some(warning) = &self.warning {
            writeln!(
                f,
                "  (did not converge, residual {:.3e})",
                warning.last_residual
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converged_flag_follows_warning() {
        let mut results = AeroResults::default();
        assert!(results.converged());
        results.warning = Some(DidNotConverge {
            iterations: 100,
            last_residual: 0.5,
        });
        assert!(!results.converged());
    }

    #[test]
    fn display_mentions_non_convergence() {
        let results = AeroResults {
            warning: Some(DidNotConverge {
                iterations: 10,
                last_residual: 1e-2,
            }),
            ..AeroResults::default()
        };
        let text = format!("{results}");
        assert!(text.contains("did not converge"));
    }
}
