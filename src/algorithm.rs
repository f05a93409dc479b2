use crate::point::{Accumulate, Metric, Plus, Scale};
use std::mem;

/// Result of a k-means run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KMeansOutcome {
    /// `true` iff the last assignment phase left every point where it was
    pub converged: bool,
    /// `assignments[i] = c` means the ith point belongs to the cth centroid
    pub assignments: Vec<usize>,
    /// Number of assignment phases that ran
    pub iterations: usize,
}

impl KMeansOutcome {
    /// Number of points assigned to each of the `k` centroids
    pub fn cluster_sizes(&self, k: usize) -> Vec<usize> {
        cluster_sizes(&self.assignments, k)
    }

    /// Split into the `(converged, assignments)` pair.
    pub fn into_parts(self) -> (bool, Vec<usize>) {
        (self.converged, self.assignments)
    }
}

/// Index of the centroid closest to `point`.
///
/// Centroids are scanned in increasing index order with a closer-or-equal
/// comparison, so among equally close centroids the one with the largest
/// index wins.
///
/// # Panics
///
/// Panics if `centroids` is empty.
#[inline]
pub fn nearest_centroid<P, C, M>(point: &P, centroids: &[C], metric: &M) -> usize
where
    M: Metric<P, C>,
{
    let mut best = 0;
    let mut best_dist = metric.distance(point, &centroids[0]);

    for (idx, centroid) in centroids.iter().enumerate().skip(1) {
        let dist = metric.distance(point, centroid);
        if dist <= best_dist {
            best = idx;
            best_dist = dist;
        }
    }

    best
}

/// Count the points assigned to each of the `k` centroids.
pub fn cluster_sizes(assignments: &[usize], k: usize) -> Vec<usize> {
    let mut sizes = vec![0usize; k];
    for &cluster in assignments {
        sizes[cluster] += 1;
    }
    sizes
}

/// New value of centroid `cluster`.
///
/// Every member is scaled by `1 / size` before it is accumulated, in
/// ascending point order, starting from `init`. An empty cluster has no
/// members and therefore collapses to `init`.
pub fn recompute_centroid<P, A>(
    cluster: usize,
    size: usize,
    points: &[P],
    assignments: &[usize],
    add: &A,
    init: &P,
) -> P
where
    P: Scale + Clone,
    A: Accumulate<P>,
{
    // Divide before summing so large magnitudes cannot overflow the sum
    let factor = 1.0 / size as f64;

    points
        .iter()
        .zip(assignments)
        .filter(|&(_, &a)| a == cluster)
        .fold(init.clone(), |acc, (point, _)| {
            add.accumulate(acc, point.scale(factor))
        })
}

/// Default start value of a centroid update: a zero shaped like the first
/// point, or `P::default()` when there are no points.
pub(crate) fn zero_init<P>(points: &[P]) -> P
where
    P: Scale + Default,
{
    points.first().map(Scale::zero_like).unwrap_or_default()
}

pub(crate) fn assert_centroids<C>(centroids: &[C]) {
    assert!(!centroids.is_empty(), "at least one centroid is required");
}

/// Assign every point to its nearest centroid without updating anything.
///
/// # Panics
///
/// Panics if `centroids` is empty.
pub fn assign<P, C, M>(points: &[P], centroids: &[C], metric: &M) -> Vec<usize>
where
    M: Metric<P, C>,
{
    assert_centroids(centroids);
    points
        .iter()
        .map(|point| nearest_centroid(point, centroids, metric))
        .collect()
}

/// Sequential k-means with ordinary addition and a zero shaped like the
/// points (see [`Scale::zero_like`]) as the starting value of every centroid
/// update.
///
/// See [`k_means_resume`] for the full contract.
pub fn k_means<P, C, M>(
    points: &[P],
    centroids: &mut [C],
    max_iters: usize,
    metric: &M,
) -> KMeansOutcome
where
    P: Scale + Clone + Default + std::ops::Add<Output = P>,
    C: From<P>,
    M: Metric<P, C>,
{
    k_means_with(points, centroids, max_iters, metric, &Plus, zero_init(points))
}

/// Sequential k-means with a custom accumulator and start value.
///
/// Every point starts out assigned to centroid 0.
pub fn k_means_with<P, C, M, A>(
    points: &[P],
    centroids: &mut [C],
    max_iters: usize,
    metric: &M,
    add: &A,
    init: P,
) -> KMeansOutcome
where
    P: Scale + Clone,
    C: From<P>,
    M: Metric<P, C>,
    A: Accumulate<P>,
{
    let assignments = vec![0; points.len()];
    k_means_resume(points, centroids, assignments, max_iters, metric, add, init)
}

/// Sequential k-means starting from an existing assignment.
///
/// Runs at most `max_iters` assignment phases. Each phase moves every point
/// to its [nearest centroid](nearest_centroid); if no point moved the run
/// has converged and stops before touching the centroids. Otherwise every
/// centroid is overwritten in place with the scaled sum of its members, see
/// [`recompute_centroid`] for the empty-cluster rule.
///
/// Feeding the centroids and assignments of a converged run back in
/// converges again on the first phase without modifying anything.
///
/// # Panics
///
/// Panics if `centroids` is empty or `assignments.len() != points.len()`.
#[allow(clippy::too_many_arguments)]
pub fn k_means_resume<P, C, M, A>(
    points: &[P],
    centroids: &mut [C],
    mut assignments: Vec<usize>,
    max_iters: usize,
    metric: &M,
    add: &A,
    init: P,
) -> KMeansOutcome
where
    P: Scale + Clone,
    C: From<P>,
    M: Metric<P, C>,
    A: Accumulate<P>,
{
    assert_centroids(centroids);
    assert_eq!(
        assignments.len(),
        points.len(),
        "one assignment per point is required"
    );

    let k = centroids.len();
    let mut converged = false;
    let mut iterations = 0;

    while !converged && iterations < max_iters {
        iterations += 1;

        converged = true;
        for (point, slot) in points.iter().zip(assignments.iter_mut()) {
            let choice = nearest_centroid(point, centroids, metric);
            converged &= choice == mem::replace(slot, choice);
        }

        if converged {
            log::trace!("iteration {}: assignments unchanged", iterations);
            break;
        }

        let sizes = cluster_sizes(&assignments, k);
        for (cluster, centroid) in centroids.iter_mut().enumerate() {
            *centroid = C::from(recompute_centroid(
                cluster,
                sizes[cluster],
                points,
                &assignments,
                add,
                &init,
            ));
        }

        log::trace!("iteration {}: cluster sizes {:?}", iterations, sizes);
    }

    log::debug!(
        "k-means on {} points, {} centroids: {} iterations, converged = {}",
        points.len(),
        k,
        iterations,
        converged
    );

    KMeansOutcome {
        converged,
        assignments,
        iterations,
    }
}
