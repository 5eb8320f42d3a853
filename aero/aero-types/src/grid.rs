//! Two-dimensional aerodynamic polar grids over angle of attack and control
//! deflection.

// Hole-filling works on grid indices; casts are safe for practical polar sizes.
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

use nalgebra::DMatrix;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{SectionError, SectionResult};
use crate::polar::{grids_match, lerp};

/// A 2-D lift/drag/moment polar tabulated over angle of attack and a control
/// deflection, evaluated with bilinear interpolation.
///
/// Both axes clamp outside the tabulated range. NaN holes in the input
/// matrices are filled at construction by averaging finite neighbours over an
/// expanding Manhattan radius, weighted by inverse distance.
///
/// # Example
///
/// ```
/// use aero_types::PolarGrid;
/// use nalgebra::DMatrix;
///
/// let alpha = vec![0.0, 0.1];
/// let delta = vec![0.0, 0.2];
/// let cl = DMatrix::from_row_slice(2, 2, &[0.0, 0.4, 0.6, 1.0]);
/// let zeros = DMatrix::zeros(2, 2);
/// let grid = PolarGrid::new(alpha, delta, cl, zeros.clone(), zeros).unwrap();
///
/// // Centre of the cell: average of the four corners
/// assert!((grid.cl(0.05, 0.1) - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PolarGrid {
    alpha: Vec<f64>,
    delta: Vec<f64>,
    cl: DMatrix<f64>,
    cd: DMatrix<f64>,
    cm: DMatrix<f64>,
}

impl PolarGrid {
    /// Create a polar grid from axis vectors and `M x N` coefficient
    /// matrices, where `M = alpha.len()` and `N = delta.len()`.
    ///
    /// NaN entries are filled by expanding-radius weighted-neighbour
    /// interpolation before the grid is stored.
    ///
    /// # Errors
    ///
    /// Returns an error on dimension mismatch, non-monotone axes, or a
    /// coefficient matrix with no finite entry at all.
    pub fn new(
        alpha: Vec<f64>,
        delta: Vec<f64>,
        cl: DMatrix<f64>,
        cd: DMatrix<f64>,
        cm: DMatrix<f64>,
    ) -> SectionResult<Self> {
        let m = alpha.len();
        let n = delta.len();
        if m == 0 || n == 0 {
            return Err(SectionError::Empty);
        }
        for (name, mat) in [("cl", &cl), ("cd", &cd), ("cm", &cm)] {
            if mat.nrows() != m || mat.ncols() != n {
                return Err(SectionError::shape_mismatch(format!(
                    "{name} is {}x{}, expected {m}x{n}",
                    mat.nrows(),
                    mat.ncols()
                )));
            }
        }
        for axis in [&alpha, &delta] {
            if let Some(index) = axis.windows(2).position(|w| w[1] <= w[0]) {
                return Err(SectionError::NonMonotoneAlpha { index });
            }
        }

        let cl = fill_nan_holes(cl)?;
        let cd = fill_nan_holes(cd)?;
        let cm = fill_nan_holes(cm)?;

        Ok(Self {
            alpha,
            delta,
            cl,
            cd,
            cm,
        })
    }

    /// The angle-of-attack axis.
    #[must_use]
    pub fn alpha_grid(&self) -> &[f64] {
        &self.alpha
    }

    /// The deflection axis.
    #[must_use]
    pub fn delta_grid(&self) -> &[f64] {
        &self.delta
    }

    /// Lift coefficient at `(alpha, delta)`, clamped on both axes.
    #[must_use]
    pub fn cl(&self, alpha: f64, delta: f64) -> f64 {
        self.sample(&self.cl, alpha, delta)
    }

    /// Drag coefficient at `(alpha, delta)`, clamped on both axes.
    #[must_use]
    pub fn cd(&self, alpha: f64, delta: f64) -> f64 {
        self.sample(&self.cd, alpha, delta)
    }

    /// Moment coefficient at `(alpha, delta)`, clamped on both axes.
    #[must_use]
    pub fn cm(&self, alpha: f64, delta: f64) -> f64 {
        self.sample(&self.cm, alpha, delta)
    }

    /// Entrywise blend of two grids sharing the same axes.
    ///
    /// # Errors
    ///
    /// Returns an error if the axes differ.
    pub fn blend(a: &Self, b: &Self, t: f64) -> SectionResult<Self> {
        if !grids_match(&a.alpha, &b.alpha) || !grids_match(&a.delta, &b.delta) {
            return Err(SectionError::incompatible(
                "polar grids have different alpha or delta axes",
            ));
        }
        Ok(Self {
            alpha: a.alpha.clone(),
            delta: a.delta.clone(),
            cl: a.cl.zip_map(&b.cl, |x, y| lerp(x, y, t)),
            cd: a.cd.zip_map(&b.cd, |x, y| lerp(x, y, t)),
            cm: a.cm.zip_map(&b.cm, |x, y| lerp(x, y, t)),
        })
    }

    /// A grid of zeros on the same axes as `other`.
    pub(crate) fn zeroed_like(other: &Self) -> Self {
        let m = other.alpha.len();
        let n = other.delta.len();
        Self {
            alpha: other.alpha.clone(),
            delta: other.delta.clone(),
            cl: DMatrix::zeros(m, n),
            cd: DMatrix::zeros(m, n),
            cm: DMatrix::zeros(m, n),
        }
    }

    fn sample(&self, values: &DMatrix<f64>, alpha: f64, delta: f64) -> f64 {
        let (i0, i1, ta) = bracket(&self.alpha, alpha);
        let (j0, j1, td) = bracket(&self.delta, delta);
        let low = lerp(values[(i0, j0)], values[(i0, j1)], td);
        let high = lerp(values[(i1, j0)], values[(i1, j1)], td);
        lerp(low, high, ta)
    }
}

/// Clamped bracket on a strictly increasing axis: indices of the cell and the
/// local interpolation fraction.
fn bracket(axis: &[f64], x: f64) -> (usize, usize, f64) {
    let n = axis.len();
    if n == 1 || x <= axis[0] {
        return (0, 0, 0.0);
    }
    if x >= axis[n - 1] {
        return (n - 1, n - 1, 0.0);
    }
    let hi = axis.partition_point(|&g| g <= x).min(n - 1);
    let lo = hi - 1;
    let t = (x - axis[lo]) / (axis[hi] - axis[lo]);
    (lo, hi, t)
}

/// Replace NaN entries by the inverse-distance weighted average of finite
/// neighbours found at the smallest Manhattan radius that has any.
fn fill_nan_holes(mut values: DMatrix<f64>) -> SectionResult<DMatrix<f64>> {
    if values.iter().all(|v| v.is_nan()) {
        return Err(SectionError::AllNan);
    }
    if !values.iter().any(|v| v.is_nan()) {
        return Ok(values);
    }

    let (m, n) = values.shape();
    let source = values.clone();
    let max_radius = m + n;

    for i in 0..m {
        for j in 0..n {
            if !values[(i, j)].is_nan() {
                continue;
            }
            'radius: for radius in 1..=max_radius {
                let mut weight_sum = 0.0;
                let mut value_sum = 0.0;
                for (ii, jj) in manhattan_ring(i, j, radius, m, n) {
                    let v = source[(ii, jj)];
                    if v.is_nan() {
                        continue;
                    }
                    let dist = (ii.abs_diff(i) + jj.abs_diff(j)) as f64;
                    let w = 1.0 / dist;
                    weight_sum += w;
                    value_sum += w * v;
                }
                if weight_sum > 0.0 {
                    values[(i, j)] = value_sum / weight_sum;
                    break 'radius;
                }
            }
        }
    }

    Ok(values)
}

/// Cells at exactly Manhattan distance `radius` from `(i, j)`, clipped to the
/// grid.
fn manhattan_ring(
    i: usize,
    j: usize,
    radius: usize,
    m: usize,
    n: usize,
) -> impl Iterator<Item = (usize, usize)> {
    let i = i as isize;
    let j = j as isize;
    let r = radius as isize;
    (-r..=r).flat_map(move |di| {
        let dj = r - di.abs();
        let steps: &[isize] = if dj == 0 { &[0] } else { &[1, -1] };
        steps.iter().filter_map(move |&s| {
            let ii = i + di;
            let jj = j + s * dj;
            if ii >= 0 && jj >= 0 && (ii as usize) < m && (jj as usize) < n {
                Some((ii as usize, jj as usize))
            } else {
                None
            }
        })
    })
}
