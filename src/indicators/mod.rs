//! Pareto-front quality indicators.
//!
//! Read-only diagnostics over objective vectors (all minimized):
//!
//! - [`extract_pareto_front`]: indices of the non-dominated members
//! - [`hypervolume`]: volume dominated by a front up to a reference point
//! - [`spacing`]: spread uniformity (std-dev of nearest-neighbour distances)
//! - [`igd`]: inverted generational distance to a reference front
//!
//! Degenerate inputs (empty or single point) yield `0.0`, and no indicator
//! ever returns `NaN`.
//!
//! [`MetricsTracker`] applies them once per generation.

mod tracker;

pub use tracker::{GenerationMetrics, MetricsTracker, DEFAULT_REFERENCE_REFRESH};

use crate::moo::{dominates, euclidean};
use crate::random::create_rng;
use rand::Rng;

/// Extents below this are treated as constant.
const ACTIVE_RANGE: f64 = 1e-10;

/// Samples used for the Monte-Carlo estimate above two objectives.
const MC_SAMPLES: usize = 10_000;

/// Fixed seed of the Monte-Carlo estimate, for repeatable values.
const MC_SEED: u64 = 42;

fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}

/// Indices of the members of `fitness` no other member dominates, in input
/// order. Duplicates are all kept.
///
/// # Complexity
///
/// O(m · n²)
pub fn extract_pareto_front<P: AsRef<[f64]>>(fitness: &[P]) -> Vec<usize> {
    (0..fitness.len())
        .filter(|&i| {
            !fitness
                .iter()
                .any(|other| dominates(other.as_ref(), fitness[i].as_ref()))
        })
        .collect()
}

/// Hypervolume dominated by `front` and bounded by `reference`.
///
/// - fewer than two varying objectives: box volume between the best point
///   and the reference
/// - two objectives: exact area by horizontal slabs
/// - more: Monte-Carlo estimate with a fixed seed
///
/// Points at or beyond the reference in some objective add nothing.
///
/// # Example
///
/// ```
/// use u_timetable::indicators::hypervolume;
///
/// let front = [[1.0, 3.0], [2.0, 2.0], [3.0, 1.0]];
/// assert_eq!(hypervolume(&front, &[4.0, 4.0]), 6.0);
/// ```
pub fn hypervolume<P: AsRef<[f64]>>(front: &[P], reference: &[f64]) -> f64 {
    if front.len() < 2 || reference.is_empty() {
        return 0.0;
    }
    let m = reference.len();
    let mut lo = vec![f64::INFINITY; m];
    let mut hi = vec![f64::NEG_INFINITY; m];
    for p in front {
        for (k, &v) in p.as_ref().iter().take(m).enumerate() {
            lo[k] = lo[k].min(v);
            hi[k] = hi[k].max(v);
        }
    }
    let active: Vec<usize> = (0..m).filter(|&k| hi[k] - lo[k] > ACTIVE_RANGE).collect();

    let volume = if active.len() < 2 {
        (0..m).map(|k| (reference[k] - lo[k]).max(0.0)).product::<f64>()
    } else if m == 2 {
        hypervolume_2d(front, reference)
    } else {
        hypervolume_monte_carlo(front, reference, &lo, &active)
    };
    finite_or_zero(volume)
}

fn hypervolume_2d<P: AsRef<[f64]>>(front: &[P], reference: &[f64]) -> f64 {
    let mut points: Vec<(f64, f64)> = front
        .iter()
        .map(|p| (p.as_ref()[0], p.as_ref()[1]))
        .filter(|&(x, y)| x < reference[0] && y < reference[1])
        .collect();
    points.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

    let mut area = 0.0;
    let mut ceiling = reference[1];
    for (x, y) in points {
        if y < ceiling {
            area += (reference[0] - x) * (ceiling - y);
            ceiling = y;
        }
    }
    area
}

fn hypervolume_monte_carlo<P: AsRef<[f64]>>(
    front: &[P],
    reference: &[f64],
    lo: &[f64],
    active: &[usize],
) -> f64 {
    if active.iter().any(|&k| reference[k] <= lo[k]) {
        return 0.0;
    }
    let box_volume: f64 = active.iter().map(|&k| reference[k] - lo[k]).product();
    let projected: Vec<Vec<f64>> = front
        .iter()
        .map(|p| active.iter().map(|&k| p.as_ref()[k]).collect())
        .collect();

    let mut rng = create_rng(MC_SEED);
    let mut sample = vec![0.0; active.len()];
    let mut hits = 0usize;
    for _ in 0..MC_SAMPLES {
        for (s, &k) in sample.iter_mut().zip(active) {
            *s = rng.random_range(lo[k]..reference[k]);
        }
        if projected.iter().any(|p| dominates(p, &sample)) {
            hits += 1;
        }
    }
    box_volume * hits as f64 / MC_SAMPLES as f64
}

/// Population standard deviation of each point's distance to its nearest
/// neighbour. `0.0` for perfectly even spacing.
pub fn spacing<P: AsRef<[f64]>>(front: &[P]) -> f64 {
    let n = front.len();
    if n < 2 {
        return 0.0;
    }
    let nearest: Vec<f64> = (0..n)
        .map(|i| {
            (0..n)
                .filter(|&j| j != i)
                .map(|j| euclidean(front[i].as_ref(), front[j].as_ref()))
                .fold(f64::INFINITY, f64::min)
        })
        .collect();
    let mean = nearest.iter().sum::<f64>() / n as f64;
    let variance = nearest.iter().map(|d| (d - mean) * (d - mean)).sum::<f64>() / n as f64;
    finite_or_zero(variance.sqrt())
}

/// Mean distance from each point of `reference_front` to its nearest point
/// in `front`.
pub fn igd<P: AsRef<[f64]>, Q: AsRef<[f64]>>(front: &[P], reference_front: &[Q]) -> f64 {
    if front.len() < 2 || reference_front.is_empty() {
        return 0.0;
    }
    let total: f64 = reference_front
        .iter()
        .map(|r| {
            front
                .iter()
                .map(|p| euclidean(r.as_ref(), p.as_ref()))
                .fold(f64::INFINITY, f64::min)
        })
        .sum();
    finite_or_zero(total / reference_front.len() as f64)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_extract_front() {
        let fit = vec![[1.0, 5.0], [3.0, 3.0], [4.0, 4.0], [5.0, 1.0], [3.0, 3.0]];
        assert_eq!(extract_pareto_front(&fit), vec![0, 1, 3, 4]);
        assert!(extract_pareto_front::<[f64; 2]>(&[]).is_empty());
    }

    #[test]
    fn test_hypervolume_2d_staircase() {
        let front = [[1.0, 3.0], [2.0, 2.0], [3.0, 1.0]];
        assert!((hypervolume(&front, &[4.0, 4.0]) - 6.0).abs() < 1e-12);
        // Order does not matter.
        let shuffled = [[3.0, 1.0], [1.0, 3.0], [2.0, 2.0]];
        assert!((hypervolume(&shuffled, &[4.0, 4.0]) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_hypervolume_ignores_dominated_and_outside_points() {
        let base = [[1.0, 3.0], [3.0, 1.0]];
        let with_extra = [[1.0, 3.0], [3.0, 1.0], [3.5, 3.5], [5.0, 0.5]];
        let r = [4.0, 4.0];
        assert!((hypervolume(&base, &r) - hypervolume(&with_extra, &r)).abs() < 1e-12);
    }

    #[test]
    fn test_hypervolume_degenerate() {
        assert_eq!(hypervolume::<[f64; 2]>(&[], &[1.0, 1.0]), 0.0);
        assert_eq!(hypervolume(&[[1.0, 1.0]], &[2.0, 2.0]), 0.0);
        // Constant first objective: box volume.
        let flat = [[1.0, 1.0], [1.0, 2.0]];
        assert!((hypervolume(&flat, &[2.0, 3.0]) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_hypervolume_3d_estimate() {
        let front = [[0.0, 1.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 0.0]];
        let hv = hypervolume(&front, &[2.0, 2.0, 2.0]);
        // Three unit-thick slabs overlapping pairwise: exact value 4.
        assert!((hv - 4.0).abs() < 0.3, "hv = {hv}");
        assert_eq!(hv, hypervolume(&front, &[2.0, 2.0, 2.0]));
    }

    #[test]
    fn test_spacing() {
        let even = [[0.0, 3.0], [1.0, 2.0], [2.0, 1.0], [3.0, 0.0]];
        assert!(spacing(&even) < 1e-12);
        let uneven = [[0.0, 3.0], [0.1, 2.9], [3.0, 0.0]];
        assert!(spacing(&uneven) > 0.0);
        assert_eq!(spacing(&[[1.0, 1.0]]), 0.0);
    }

    #[test]
    fn test_igd() {
        let reference = [[0.0, 1.0], [1.0, 0.0]];
        assert_eq!(igd(&reference, &reference), 0.0);
        let shifted = [[0.0, 2.0], [1.0, 1.0]];
        assert!((igd(&shifted, &reference) - 1.0).abs() < 1e-12);
        assert_eq!(igd::<[f64; 2], [f64; 2]>(&[], &reference), 0.0);
        assert_eq!(igd(&reference, &Vec::<[f64; 2]>::new()), 0.0);
    }

    proptest! {
        #[test]
        fn prop_indicators_finite(
            pts in proptest::collection::vec((0u8..20, 0u8..20).prop_map(|(a, b)| [a as f64, b as f64]), 0..15)
        ) {
            let front: Vec<[f64; 2]> = extract_pareto_front(&pts).into_iter().map(|i| pts[i]).collect();
            let hv = hypervolume(&front, &[25.0, 25.0]);
            prop_assert!(hv.is_finite() && hv >= 0.0);
            prop_assert!(spacing(&front).is_finite());
            prop_assert!(igd(&front, &pts).is_finite());
            // Members of the front are mutually non-dominated.
            for a in &front {
                for b in &front {
                    prop_assert!(!dominates(a, b));
                }
            }
        }
    }
}
