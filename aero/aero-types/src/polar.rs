//! One-dimensional aerodynamic polar tables.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{SectionError, SectionResult};

/// Performs linear interpolation between two values.
#[inline]
#[must_use]
pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    t.mul_add(b - a, a)
}

/// A 1-D lift/drag/moment polar tabulated over angle of attack.
///
/// The angle-of-attack grid must be strictly increasing. Lookups outside the
/// tabulated range clamp to the endpoints; out-of-range queries are not an
/// error.
///
/// # Example
///
/// ```
/// use aero_types::PolarTable;
///
/// let table = PolarTable::new(
///     vec![-0.1, 0.0, 0.1],
///     vec![-0.6, 0.0, 0.6],
///     vec![0.01, 0.01, 0.01],
///     vec![0.0, 0.0, 0.0],
/// ).unwrap();
///
/// assert!((table.cl(0.05) - 0.3).abs() < 1e-12);
/// // Clamped beyond the grid
/// assert!((table.cl(1.0) - 0.6).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PolarTable {
    alpha: Vec<f64>,
    cl: Vec<f64>,
    cd: Vec<f64>,
    cm: Vec<f64>,
}

impl PolarTable {
    /// Create a polar table from raw columns.
    ///
    /// # Errors
    ///
    /// Returns an error if the columns differ in length, are empty, contain
    /// NaN, or if `alpha` is not strictly increasing.
    pub fn new(alpha: Vec<f64>, cl: Vec<f64>, cd: Vec<f64>, cm: Vec<f64>) -> SectionResult<Self> {
        Self::from_raw(alpha, cl, cd, cm, false)
    }

    /// Create a polar table, optionally dropping NaN rows first.
    ///
    /// With `remove_nan`, any row where `alpha`, `cl`, `cd` or `cm` is NaN is
    /// removed from all four columns before validation. Rows surviving the
    /// cleanup must still form a strictly increasing `alpha` grid.
    ///
    /// # Errors
    ///
    /// Returns an error on shape mismatch, an empty table, NaN entries after
    /// cleanup, or a non-monotone `alpha` grid.
    pub fn from_raw(
        alpha: Vec<f64>,
        cl: Vec<f64>,
        cd: Vec<f64>,
        cm: Vec<f64>,
        remove_nan: bool,
    ) -> SectionResult<Self> {
        let n = alpha.len();
        if cl.len() != n || cd.len() != n || cm.len() != n {
            return Err(SectionError::shape_mismatch(format!(
                "alpha: {n}, cl: {}, cd: {}, cm: {}",
                cl.len(),
                cd.len(),
                cm.len()
            )));
        }

        let (alpha, cl, cd, cm) = if remove_nan {
            let mut a = Vec::with_capacity(n);
            let mut l = Vec::with_capacity(n);
            let mut d = Vec::with_capacity(n);
            let mut m = Vec::with_capacity(n);
            for i in 0..n {
                let row = [alpha[i], cl[i], cd[i], cm[i]];
                if !row.iter().any(|v| v.is_nan()) {
                    a.push(alpha[i]);
                    l.push(cl[i]);
                    d.push(cd[i]);
                    m.push(cm[i]);
                }
            }
            (a, l, d, m)
        } else {
            (alpha, cl, cd, cm)
        };

        if alpha.is_empty() {
            return Err(SectionError::Empty);
        }

        for (column, values) in [("alpha", &alpha), ("cl", &cl), ("cd", &cd), ("cm", &cm)] {
            if values.iter().any(|v| v.is_nan()) {
                return Err(SectionError::NanAfterCleanup { column });
            }
        }

        if let Some(index) = alpha.windows(2).position(|w| w[1] <= w[0]) {
            return Err(SectionError::NonMonotoneAlpha { index });
        }

        Ok(Self { alpha, cl, cd, cm })
    }

    /// Number of tabulated rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.alpha.len()
    }

    /// Whether the table has no rows. Construction forbids this; kept for
    /// API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alpha.is_empty()
    }

    /// The angle-of-attack grid.
    #[must_use]
    pub fn alpha_grid(&self) -> &[f64] {
        &self.alpha
    }

    /// Lift coefficient at `alpha` (radians), clamped to the grid.
    #[must_use]
    pub fn cl(&self, alpha: f64) -> f64 {
        self.sample(&self.cl, alpha)
    }

    /// Drag coefficient at `alpha` (radians), clamped to the grid.
    #[must_use]
    pub fn cd(&self, alpha: f64) -> f64 {
        self.sample(&self.cd, alpha)
    }

    /// Moment coefficient at `alpha` (radians), clamped to the grid.
    #[must_use]
    pub fn cm(&self, alpha: f64) -> f64 {
        self.sample(&self.cm, alpha)
    }

    /// Entrywise blend of two tables sharing the same alpha grid.
    ///
    /// # Errors
    ///
    /// Returns an error if the alpha grids differ.
    pub fn blend(a: &Self, b: &Self, t: f64) -> SectionResult<Self> {
        if !grids_match(&a.alpha, &b.alpha) {
            return Err(SectionError::incompatible(
                "polar tables have different alpha grids",
            ));
        }
        let n = a.alpha.len();
        let mut cl = Vec::with_capacity(n);
        let mut cd = Vec::with_capacity(n);
        let mut cm = Vec::with_capacity(n);
        for i in 0..n {
            cl.push(lerp(a.cl[i], b.cl[i], t));
            cd.push(lerp(a.cd[i], b.cd[i], t));
            cm.push(lerp(a.cm[i], b.cm[i], t));
        }
        Ok(Self {
            alpha: a.alpha.clone(),
            cl,
            cd,
            cm,
        })
    }

    /// A table of zeros on the given alpha grid.
    pub(crate) fn zeroed_like(other: &Self) -> Self {
        let n = other.alpha.len();
        Self {
            alpha: other.alpha.clone(),
            cl: vec![0.0; n],
            cd: vec![0.0; n],
            cm: vec![0.0; n],
        }
    }

    fn sample(&self, values: &[f64], alpha: f64) -> f64 {
        let grid = &self.alpha;
        let n = grid.len();
        if n == 1 || alpha <= grid[0] {
            return values[0];
        }
        if alpha >= grid[n - 1] {
            return values[n - 1];
        }
        // partition_point: first index with grid[i] > alpha; bracket is [hi-1, hi]
        let hi = grid.partition_point(|&g| g <= alpha).min(n - 1);
        let lo = hi - 1;
        let t = (alpha - grid[lo]) / (grid[hi] - grid[lo]);
        lerp(values[lo], values[hi], t)
    }
}

/// Grid equality up to floating-point noise.
pub(crate) fn grids_match(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() <= 1e-12)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn linear_table() -> PolarTable {
        PolarTable::new(
            vec![-0.2, -0.1, 0.0, 0.1, 0.2],
            vec![-1.2, -0.6, 0.0, 0.6, 1.2],
            vec![0.02, 0.01, 0.008, 0.01, 0.02],
            vec![-0.05, -0.05, -0.05, -0.05, -0.05],
        )
        .unwrap()
    }

    #[test]
    fn interpolates_linearly() {
        let table = linear_table();
        assert!((table.cl(0.05) - 0.3).abs() < 1e-12);
        assert!((table.cd(0.05) - 0.009).abs() < 1e-12);
        assert!((table.cm(0.123) - (-0.05)).abs() < 1e-12);
    }

    #[test]
    fn clamps_out_of_range() {
        let table = linear_table();
        assert!((table.cl(-10.0) - (-1.2)).abs() < 1e-12);
        assert!((table.cl(10.0) - 1.2).abs() < 1e-12);
        assert!((table.cd(10.0) - 0.02).abs() < 1e-12);
    }

    #[test]
    fn hits_grid_points_exactly() {
        let table = linear_table();
        let expected = [-1.2, -0.6, 0.0, 0.6, 1.2];
        for (i, &a) in table.alpha_grid().to_vec().iter().enumerate() {
            assert!((table.cl(a) - expected[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn rejects_non_monotone_alpha() {
        let err = PolarTable::new(
            vec![0.0, 0.1, 0.1],
            vec![0.0; 3],
            vec![0.0; 3],
            vec![0.0; 3],
        )
        .unwrap_err();
        assert_eq!(err, SectionError::NonMonotoneAlpha { index: 1 });
    }

    #[test]
    fn rejects_shape_mismatch() {
        let err =
            PolarTable::new(vec![0.0, 0.1], vec![0.0], vec![0.0, 0.0], vec![0.0, 0.0]).unwrap_err();
        assert!(matches!(err, SectionError::ShapeMismatch(_)));
    }

    #[test]
    fn removes_nan_rows_consistently() {
        let table = PolarTable::from_raw(
            vec![0.0, 0.1, 0.2, 0.3],
            vec![0.0, f64::NAN, 1.2, 1.8],
            vec![0.01, 0.01, 0.01, f64::NAN],
            vec![0.0, 0.0, 0.0, 0.0],
            true,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.alpha_grid(), &[0.0, 0.2]);
        assert!((table.cl(0.1) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn strict_construction_rejects_nan() {
        let err = PolarTable::new(
            vec![0.0, 0.1],
            vec![0.0, f64::NAN],
            vec![0.0, 0.0],
            vec![0.0, 0.0],
        )
        .unwrap_err();
        assert_eq!(err, SectionError::NanAfterCleanup { column: "cl" });
    }

    #[test]
    fn all_nan_rows_leave_empty_table() {
        let err = PolarTable::from_raw(
            vec![0.0, 0.1],
            vec![f64::NAN, f64::NAN],
            vec![0.0, 0.0],
            vec![0.0, 0.0],
            true,
        )
        .unwrap_err();
        assert_eq!(err, SectionError::Empty);
    }

    #[test]
    fn blend_is_entrywise() {
        let a = linear_table();
        let b = PolarTable::new(
            vec![-0.2, -0.1, 0.0, 0.1, 0.2],
            vec![0.0; 5],
            vec![0.0; 5],
            vec![0.0; 5],
        )
        .unwrap();
        let mid = PolarTable::blend(&a, &b, 0.5).unwrap();
        assert!((mid.cl(0.1) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn blend_rejects_mismatched_grids() {
        let a = linear_table();
        let b = PolarTable::new(vec![0.0, 0.1], vec![0.0; 2], vec![0.0; 2], vec![0.0; 2]).unwrap();
        assert!(PolarTable::blend(&a, &b, 0.5).is_err());
    }
}
