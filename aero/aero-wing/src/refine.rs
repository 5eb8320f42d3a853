//! Spanwise resampling of the quarter-chord polyline.

// Node counts are small; index/float casts are safe for practical meshes.
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use std::f64::consts::PI;

use aero_types::{PanelDistribution, Point3, Section, SectionModel, Vector3};

use crate::error::{WingError, WingResult};

/// Relative tolerance for snapping a target station onto a user station.
const SNAP_TOLERANCE: f64 = 1e-9;

/// Resolution of the chord-gradient density used by the van Garrel weighting.
const VAN_GARREL_SAMPLES: usize = 256;

/// Refine `sections` to `n_panels + 1` stations with the requested
/// distribution.
///
/// Sections are sorted descending along `spanwise_direction` first, so the
/// result is invariant under permutations of the input.
pub(crate) fn refine_sections(
    sections: &[Section],
    n_panels: usize,
    distribution: PanelDistribution,
    spanwise_direction: &Vector3<f64>,
) -> WingResult<Vec<Section>> {
    let sorted = sort_by_span(sections, spanwise_direction)?;
    let arc = quarter_chord_arc(&sorted)?;
    let total = arc[arc.len() - 1];

    if distribution == PanelDistribution::Unchanged {
        if sorted.len() != n_panels + 1 {
            return Err(WingError::SectionCountMismatch {
                expected: n_panels + 1,
                actual: sorted.len(),
            });
        }
        return Ok(sorted);
    }

    let targets = match distribution {
        PanelDistribution::Linear => linear_targets(n_panels, total),
        PanelDistribution::Cosine => cosine_targets(n_panels, total),
        PanelDistribution::CosineVanGarrel => van_garrel_targets(n_panels, &sorted, &arc),
        PanelDistribution::SplitProvided => split_provided_targets(n_panels, &arc)?,
        PanelDistribution::Unchanged => unreachable!("handled above"),
    };

    let mut refined = Vec::with_capacity(n_panels + 1);
    for &target in &targets {
        refined.push(section_at(&sorted, &arc, target)?);
    }

    check_monotone(&refined, spanwise_direction)?;
    Ok(refined)
}

/// Sort sections descending by their quarter-chord projection on the span
/// axis, rejecting duplicate stations.
fn sort_by_span(sections: &[Section], direction: &Vector3<f64>) -> WingResult<Vec<Section>> {
    let mut order: Vec<usize> = (0..sections.len()).collect();
    let projection =
        |i: usize| -> f64 { (sections[i].quarter_chord().coords).dot(direction) };
    order.sort_by(|&a, &b| {
        projection(b)
            .partial_cmp(&projection(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for pair in order.windows(2) {
        if (projection(pair[0]) - projection(pair[1])).abs() <= f64::EPSILON {
            return Err(WingError::DuplicateSpanStation(pair[0], pair[1]));
        }
    }

    Ok(order.into_iter().map(|i| sections[i].clone()).collect())
}

/// Cumulative arc length along the quarter-chord polyline.
fn quarter_chord_arc(sections: &[Section]) -> WingResult<Vec<f64>> {
    let mut arc = Vec::with_capacity(sections.len());
    arc.push(0.0);
    for (i, pair) in sections.windows(2).enumerate() {
        let step = (pair[1].quarter_chord() - pair[0].quarter_chord()).norm();
        if step <= f64::EPSILON {
            return Err(WingError::DuplicateSpanStation(i, i + 1));
        }
        arc.push(arc[i] + step);
    }
    Ok(arc)
}

fn linear_targets(n_panels: usize, total: f64) -> Vec<f64> {
    (0..=n_panels)
        .map(|i| total * (i as f64) / (n_panels as f64))
        .collect()
}

fn cosine_targets(n_panels: usize, total: f64) -> Vec<f64> {
    (0..=n_panels)
        .map(|i| total * 0.5 * (1.0 - (PI * (i as f64) / (n_panels as f64)).cos()))
        .collect()
}

/// Cosine spacing re-weighted so node density grows where the spanwise chord
/// gradient is large. The cumulative weight `W(s)` integrates
/// `1 + |dc/ds| / mean|dc/ds|`; cosine fractions of `W` are mapped back to
/// arc length. Uniform chord reduces to plain cosine spacing.
fn van_garrel_targets(n_panels: usize, sections: &[Section], arc: &[f64]) -> Vec<f64> {
    let total = arc[arc.len() - 1];

    // Piecewise-constant chord gradient per user segment
    let gradients: Vec<f64> = sections
        .windows(2)
        .zip(arc.windows(2))
        .map(|(pair, a)| (pair[1].chord_length() - pair[0].chord_length()).abs() / (a[1] - a[0]))
        .collect();
    let mean_gradient = gradients.iter().sum::<f64>() / (gradients.len() as f64);

    if mean_gradient <= f64::EPSILON {
        return cosine_targets(n_panels, total);
    }

    // Cumulative weight on a fine uniform grid
    let m = VAN_GARREL_SAMPLES;
    let ds = total / (m as f64);
    let mut cumulative = Vec::with_capacity(m + 1);
    cumulative.push(0.0);
    let mut acc = 0.0;
    for k in 0..m {
        let s = ds * (k as f64 + 0.5);
        let segment = arc.partition_point(|&a| a <= s).clamp(1, arc.len() - 1) - 1;
        acc += (1.0 + gradients[segment] / mean_gradient) * ds;
        cumulative.push(acc);
    }
    let weight_total = cumulative[m];

    // Invert W at cosine fractions of the total weight
    cosine_targets(n_panels, weight_total)
        .iter()
        .map(|&w| {
            let hi = cumulative.partition_point(|&c| c < w).clamp(1, m);
            let lo = hi - 1;
            let span = cumulative[hi] - cumulative[lo];
            let frac = if span > 0.0 {
                (w - cumulative[lo]) / span
            } else {
                0.0
            };
            (ds * (lo as f64 + frac)).min(total)
        })
        .collect()
}

/// Keep every user station and subdivide segments proportionally to their
/// length until `n_panels + 1` stations exist.
fn split_provided_targets(n_panels: usize, arc: &[f64]) -> WingResult<Vec<f64>> {
    let n_sections = arc.len();
    let n_targets = n_panels + 1;
    if n_targets < n_sections {
        return Err(WingError::TooFewPanelsForSplit {
            required: n_sections,
            actual: n_targets,
        });
    }

    let total = arc[n_sections - 1];
    let extra = n_targets - n_sections;
    let n_segments = n_sections - 1;

    // Largest-remainder apportionment of extra nodes over segments
    let mut counts = vec![0usize; n_segments];
    let mut remainders: Vec<(usize, f64)> = Vec::with_capacity(n_segments);
    let mut assigned = 0;
    for i in 0..n_segments {
        let share = (extra as f64) * (arc[i + 1] - arc[i]) / total;
        let floor = share.floor() as usize;
        counts[i] = floor;
        assigned += floor;
        remainders.push((i, share - share.floor()));
    }
    remainders.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    for &(i, _) in remainders.iter().take(extra - assigned) {
        counts[i] += 1;
    }

    let mut targets = Vec::with_capacity(n_targets);
    for i in 0..n_segments {
        targets.push(arc[i]);
        let inner = counts[i];
        for k in 1..=inner {
            let t = (k as f64) / (inner as f64 + 1.0);
            targets.push(arc[i] + t * (arc[i + 1] - arc[i]));
        }
    }
    targets.push(total);
    Ok(targets)
}

/// Interpolate a station at arc-length `target`, returning user stations
/// verbatim when the target lands on one.
fn section_at(sections: &[Section], arc: &[f64], target: f64) -> WingResult<Section> {
    let total = arc[arc.len() - 1];
    let tolerance = SNAP_TOLERANCE * total;

    if let Some(i) = arc.iter().position(|&a| (a - target).abs() <= tolerance) {
        return Ok(sections[i].clone());
    }

    let hi = arc.partition_point(|&a| a < target).clamp(1, arc.len() - 1);
    let lo = hi - 1;
    let frac = (target - arc[lo]) / (arc[hi] - arc[lo]);

    let a = &sections[lo];
    let b = &sections[hi];

    // Chord direction and length interpolate separately
    let dir_a = a.chord_vector().normalize();
    let dir_b = b.chord_vector().normalize();
    let mut dir = dir_a.lerp(&dir_b, frac);
    if dir.norm_squared() <= f64::EPSILON {
        dir = dir_a;
    } else {
        dir.normalize_mut();
    }
    let chord = (1.0 - frac).mul_add(a.chord_length(), frac * b.chord_length());

    let qc_a = a.quarter_chord();
    let qc_b = b.quarter_chord();
    let qc = Point3::from(qc_a.coords.lerp(&qc_b.coords, frac));

    let model = SectionModel::blend(&a.model, &b.model, frac)?;

    Ok(Section::new(
        qc - 0.25 * chord * dir,
        qc + 0.75 * chord * dir,
        model,
    ))
}

/// The refined mesh must be strictly decreasing along the span axis.
fn check_monotone(refined: &[Section], direction: &Vector3<f64>) -> WingResult<()> {
    let ok = refined.windows(2).all(|pair| {
        pair[0].quarter_chord().coords.dot(direction)
            > pair[1].quarter_chord().coords.dot(direction)
    });
    if ok {
        Ok(())
    } else {
        Err(WingError::NonMonotoneRefinement)
    }
}
