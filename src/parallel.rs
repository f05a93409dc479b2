//! Parallel k-means.
//!
//! Same algorithm, tie-break and empty-cluster rule as
//! [`k_means_resume`](crate::algorithm::k_means_resume); only the scheduling
//! differs. Each assignment phase fans out over points, each update phase
//! over centroids, with a join between phases.

use crate::algorithm::{
    assert_centroids, cluster_sizes, nearest_centroid, recompute_centroid, zero_init,
    KMeansOutcome,
};
use crate::point::{Accumulate, Metric, Plus, Scale};
use rayon::prelude::*;
use rayon::ThreadPool;
use std::mem;
use std::ops::Add;
use std::sync::Arc;

/// How the independent sub-tasks of each phase are scheduled.
#[derive(Debug, Clone, Default)]
pub enum ExecutionPolicy {
    /// Run every sub-task on the calling thread
    Sequential,
    /// Spread sub-tasks over rayon's global pool
    #[default]
    Parallel,
    /// Spread sub-tasks over a dedicated pool
    Pool(Arc<ThreadPool>),
}

impl ExecutionPolicy {
    pub fn is_sequential(&self) -> bool {
        matches!(self, Self::Sequential)
    }

    fn install<R, F>(&self, op: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match self {
            Self::Pool(pool) => pool.install(op),
            Self::Sequential | Self::Parallel => op(),
        }
    }
}

#[inline]
fn assign_point<P, C, M>(
    point: &P,
    centroids: &[C],
    metric: &M,
    slot: &mut usize,
    unchanged: &mut bool,
) where
    M: Metric<P, C>,
{
    let choice = nearest_centroid(point, centroids, metric);
    *unchanged = choice == mem::replace(slot, choice);
}

/// Assignment phase. Each point records whether it stayed put in its own
/// slot of `unchanged`; the slots are AND-reduced once every point is done.
fn assignment_phase<P, C, M>(
    policy: &ExecutionPolicy,
    points: &[P],
    centroids: &[C],
    metric: &M,
    assignments: &mut [usize],
    unchanged: &mut [bool],
) -> bool
where
    P: Sync,
    C: Sync,
    M: Metric<P, C> + Sync,
{
    if policy.is_sequential() {
        points
            .iter()
            .zip(assignments.iter_mut())
            .zip(unchanged.iter_mut())
            .for_each(|((point, slot), stable)| {
                assign_point(point, centroids, metric, slot, stable)
            });
        unchanged.iter().all(|&stable| stable)
    } else {
        points
            .par_iter()
            .zip(assignments.par_iter_mut())
            .zip(unchanged.par_iter_mut())
            .for_each(|((point, slot), stable)| {
                assign_point(point, centroids, metric, slot, stable)
            });
        unchanged.par_iter().all(|&stable| stable)
    }
}

/// Update phase. Every centroid slot is owned by exactly one task; the
/// accumulation inside a task stays sequential.
fn update_phase<P, C, A>(
    policy: &ExecutionPolicy,
    points: &[P],
    centroids: &mut [C],
    assignments: &[usize],
    add: &A,
    init: &P,
) -> Vec<usize>
where
    P: Scale + Clone + Sync,
    C: From<P> + Send,
    A: Accumulate<P> + Sync,
{
    let sizes = cluster_sizes(assignments, centroids.len());
    let update = |(cluster, centroid): (usize, &mut C)| {
        *centroid = C::from(recompute_centroid(
            cluster,
            sizes[cluster],
            points,
            assignments,
            add,
            init,
        ));
    };

    if policy.is_sequential() {
        centroids.iter_mut().enumerate().for_each(update);
    } else {
        centroids.par_iter_mut().enumerate().for_each(update);
    }

    sizes
}

/// Assign every point to its nearest centroid without updating anything.
///
/// # Panics
///
/// Panics if `centroids` is empty.
pub fn par_assign<P, C, M>(
    policy: &ExecutionPolicy,
    points: &[P],
    centroids: &[C],
    metric: &M,
) -> Vec<usize>
where
    P: Sync,
    C: Sync,
    M: Metric<P, C> + Sync,
{
    assert_centroids(centroids);
    if policy.is_sequential() {
        return points
            .iter()
            .map(|point| nearest_centroid(point, centroids, metric))
            .collect();
    }

    policy.install(|| {
        points
            .par_iter()
            .map(|point| nearest_centroid(point, centroids, metric))
            .collect()
    })
}

/// Parallel k-means with ordinary addition and a zero shaped like the points
/// as the start value of every centroid update.
pub fn par_k_means<P, C, M>(
    policy: &ExecutionPolicy,
    points: &[P],
    centroids: &mut [C],
    max_iters: usize,
    metric: &M,
) -> KMeansOutcome
where
    P: Scale + Clone + Default + Add<Output = P> + Send + Sync,
    C: From<P> + Send + Sync,
    M: Metric<P, C> + Sync,
{
    par_k_means_with(
        policy,
        points,
        centroids,
        max_iters,
        metric,
        &Plus,
        zero_init(points),
    )
}

/// Parallel k-means with a custom accumulator and start value.
#[allow(clippy::too_many_arguments)]
pub fn par_k_means_with<P, C, M, A>(
    policy: &ExecutionPolicy,
    points: &[P],
    centroids: &mut [C],
    max_iters: usize,
    metric: &M,
    add: &A,
    init: P,
) -> KMeansOutcome
where
    P: Scale + Clone + Send + Sync,
    C: From<P> + Send + Sync,
    M: Metric<P, C> + Sync,
    A: Accumulate<P> + Sync,
{
    let assignments = vec![0; points.len()];
    par_k_means_resume(
        policy,
        points,
        centroids,
        assignments,
        max_iters,
        metric,
        add,
        init,
    )
}

/// Parallel k-means starting from an existing assignment.
///
/// Produces the same assignments, convergence flag, iteration count and
/// bit-identical centroids as the sequential
/// [`k_means_resume`](crate::algorithm::k_means_resume) given the same
/// inputs, whatever the policy.
///
/// # Panics
///
/// Panics if `centroids` is empty or `assignments.len() != points.len()`.
#[allow(clippy::too_many_arguments)]
pub fn par_k_means_resume<P, C, M, A>(
    policy: &ExecutionPolicy,
    points: &[P],
    centroids: &mut [C],
    mut assignments: Vec<usize>,
    max_iters: usize,
    metric: &M,
    add: &A,
    init: P,
) -> KMeansOutcome
where
    P: Scale + Clone + Send + Sync,
    C: From<P> + Send + Sync,
    M: Metric<P, C> + Sync,
    A: Accumulate<P> + Sync,
{
    assert_centroids(centroids);
    assert_eq!(
        assignments.len(),
        points.len(),
        "one assignment per point is required"
    );

    let k = centroids.len();
    let mut unchanged = vec![false; points.len()];
    let mut converged = false;
    let mut iterations = 0;

    policy.install(|| {
        while !converged && iterations < max_iters {
            iterations += 1;

            converged = assignment_phase(
                policy,
                points,
                centroids,
                metric,
                &mut assignments,
                &mut unchanged,
            );

            if converged {
                log::trace!("iteration {}: assignments unchanged", iterations);
                break;
            }

            let sizes = update_phase(policy, points, centroids, &assignments, add, &init);
            log::trace!("iteration {}: cluster sizes {:?}", iterations, sizes);
        }
    });

    log::debug!(
        "parallel k-means on {} points, {} centroids: {} iterations, converged = {}",
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
