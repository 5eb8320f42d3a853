//! Wing assembly.

use aero_types::{PanelDistribution, Point3, PolarTable, Section, SectionModel, Vector3};
use tracing::info;

use crate::error::{WingError, WingResult};
use crate::refine;

/// A wing described by user stations, refined on demand to a dense spanwise
/// mesh.
///
/// Sections may be added in any order along the span; [`Wing::refine`]
/// canonicalizes them by sorting along [`Wing::spanwise_direction`] before
/// interpolating, so insertion order never affects the result.
///
/// # Example
///
/// ```
/// use aero_types::{PanelDistribution, Point3, Section, SectionModel};
/// use aero_wing::Wing;
///
/// let mut wing = Wing::new(10)
///     .unwrap()
///     .with_distribution(PanelDistribution::Cosine);
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
/// assert_eq!(wing.refine().unwrap().len(), 11);
/// ```
#[derive(Debug, Clone)]
pub struct Wing {
    n_panels: usize,
    distribution: PanelDistribution,
    spanwise_direction: Vector3<f64>,
    remove_nan: bool,
    sections: Vec<Section>,
}

impl Wing {
    /// Create a wing that will be refined to `n_panels` panels.
    ///
    /// # Errors
    ///
    /// Returns [`WingError::InvalidPanelCount`] if `n_panels` is zero.
    pub fn new(n_panels: usize) -> WingResult<Self> {
        if n_panels < 1 {
            return Err(WingError::InvalidPanelCount(n_panels));
        }
        Ok(Self {
            n_panels,
            distribution: PanelDistribution::default(),
            spanwise_direction: Vector3::new(0.0, 1.0, 0.0),
            remove_nan: true,
            sections: Vec::new(),
        })
    }

    /// Set the spanwise panel distribution.
    #[must_use]
    pub const fn with_distribution(mut self, distribution: PanelDistribution) -> Self {
        self.distribution = distribution;
        self
    }

    /// Set the spanwise sorting direction (default `(0, 1, 0)`).
    #[must_use]
    pub const fn with_spanwise_direction(mut self, direction: Vector3<f64>) -> Self {
        self.spanwise_direction = direction;
        self
    }

    /// Control whether NaN rows are dropped from polars added through
    /// [`Wing::add_polar_section`] (default `true`).
    #[must_use]
    pub const fn with_nan_removal(mut self, remove_nan: bool) -> Self {
        self.remove_nan = remove_nan;
        self
    }

    /// Number of panels the refined mesh will have.
    #[must_use]
    pub const fn n_panels(&self) -> usize {
        self.n_panels
    }

    /// The configured distribution.
    #[must_use]
    pub const fn distribution(&self) -> PanelDistribution {
        self.distribution
    }

    /// The spanwise sorting direction.
    #[must_use]
    pub const fn spanwise_direction(&self) -> Vector3<f64> {
        self.spanwise_direction
    }

    /// The user sections in insertion order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Add a wing station. Order along the span does not matter.
    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Add a wing station with a 1-D polar built from raw columns, honouring
    /// the wing's NaN-removal policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the polar columns are invalid.
    pub fn add_polar_section(
        &mut self,
        leading_edge: Point3<f64>,
        trailing_edge: Point3<f64>,
        alpha: Vec<f64>,
        cl: Vec<f64>,
        cd: Vec<f64>,
        cm: Vec<f64>,
    ) -> WingResult<()> {
        let table = PolarTable::from_raw(alpha, cl, cd, cm, self.remove_nan)?;
        self.add_section(Section::new(
            leading_edge,
            trailing_edge,
            SectionModel::PolarVectors(table),
        ));
        Ok(())
    }

    /// Refine the user sections to `n_panels + 1` stations.
    ///
    /// The output is sorted descending along the spanwise direction and is
    /// strictly monotone; user insertion order never affects it.
    ///
    /// # Errors
    ///
    /// Returns configuration errors (too few sections, distribution count
    /// constraints), geometry errors (degenerate chord, duplicate span
    /// stations) or interpolation errors (incompatible neighbouring aero
    /// models).
    pub fn refine(&self) -> WingResult<Vec<Section>> {
        if self.sections.len() < 2 {
            return Err(WingError::TooFewSections(self.sections.len()));
        }
        if !self.spanwise_direction.iter().all(|c| c.is_finite())
            || self.spanwise_direction.norm_squared() <= f64::EPSILON
        {
            return Err(WingError::InvalidSpanwiseDirection);
        }
        for section in &self.sections {
            section.validate()?;
        }

        let refined = refine::refine_sections(
            &self.sections,
            self.n_panels,
            self.distribution,
            &self.spanwise_direction,
        )?;

        info!(
            user_sections = self.sections.len(),
            refined_sections = refined.len(),
            distribution = ?self.distribution,
            "Refined wing mesh"
        );

        Ok(refined)
    }
}
