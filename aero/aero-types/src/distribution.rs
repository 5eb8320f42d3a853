//! Spanwise panel distribution strategies.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How refined sections are distributed along the span.
///
/// # Example
///
/// ```
/// use aero_types::PanelDistribution;
///
/// let distribution = PanelDistribution::default();
/// assert_eq!(distribution, PanelDistribution::Linear);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PanelDistribution {
    /// Evenly spaced in arc length along the quarter-chord line.
    #[default]
    Linear,
    /// Cosine spacing, concentrating panels at the tips.
    Cosine,
    /// Cosine spacing re-weighted toward regions of large chord gradient.
    CosineVanGarrel,
    /// Keep the user stations and subdivide between them by segment length.
    SplitProvided,
    /// Use the user sections directly; requires exactly `n_panels + 1`.
    Unchanged,
}

impl PanelDistribution {
    /// Whether the distribution preserves the user stations verbatim.
    #[must_use]
    pub const fn preserves_user_sections(&self) -> bool {
        matches!(self, Self::SplitProvided | Self::Unchanged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_linear() {
        assert_eq!(PanelDistribution::default(), PanelDistribution::Linear);
    }

    #[test]
    fn preservation_flags() {
        assert!(PanelDistribution::Unchanged.preserves_user_sections());
        assert!(PanelDistribution::SplitProvided.preserves_user_sections());
        assert!(!PanelDistribution::Cosine.preserves_user_sections());
    }
}
