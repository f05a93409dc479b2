use crate::algorithm::{assign, k_means_with, zero_init, KMeansOutcome};
use crate::config::KMeansConfig;
use crate::error::KMeansError;
use crate::parallel::{par_assign, par_k_means_with, ExecutionPolicy};
use crate::point::{Accumulate, Metric, Plus, Scale};
use ndarray::{Array1, Array2, ArrayView2};
use rayon::ThreadPoolBuilder;
use std::sync::Arc;
use std::time::Instant;

/// Configured k-means runner.
///
/// Bundles a [`KMeansConfig`] with the distance metric and accumulation
/// operator, and checks its inputs instead of panicking like the raw
/// kernels do. Centroid initialization is left to the caller: every `fit`
/// refines the centroids it is handed, in place.
///
/// # Example
///
/// ```
/// use lloyd_kmeans::{KMeans, KMeansConfig, L1};
///
/// let points = [0.0f32, 0.0, 0.0, 9.0, 9.0];
/// let mut centroids = [1.0f32, 8.0];
///
/// let kmeans = KMeans::with_config(KMeansConfig::new(10), L1);
/// let outcome = kmeans.fit(&points, &mut centroids).unwrap();
///
/// assert!(outcome.converged);
/// assert_eq!(outcome.assignments, vec![0, 0, 0, 1, 1]);
/// assert_eq!(centroids, [0.0, 9.0]);
/// ```
#[derive(Debug, Clone)]
pub struct KMeans<M, A = Plus> {
    /// Model configuration
    config: KMeansConfig,

    /// Distance between a point and a centroid
    metric: M,

    /// Combines scaled points into a new centroid
    accumulator: A,
}

impl<M> KMeans<M> {
    /// Create a runner with the default configuration and ordinary addition.
    pub fn new(metric: M) -> Self {
        Self::with_config(KMeansConfig::default(), metric)
    }

    /// Create a runner with a custom configuration and ordinary addition.
    pub fn with_config(config: KMeansConfig, metric: M) -> Self {
        Self {
            config,
            metric,
            accumulator: Plus,
        }
    }
}

impl<M, A> KMeans<M, A> {
    /// Replace the accumulation operator.
    pub fn with_accumulator<B>(self, accumulator: B) -> KMeans<M, B> {
        KMeans {
            config: self.config,
            metric: self.metric,
            accumulator,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }

    /// Get the distance metric.
    pub fn metric(&self) -> &M {
        &self.metric
    }

    fn policy(&self) -> Result<ExecutionPolicy, KMeansError> {
        match (&self.config.execution, self.config.num_threads) {
            (ExecutionPolicy::Sequential | ExecutionPolicy::Pool(_), _) | (_, None) => {
                Ok(self.config.execution.clone())
            }
            (_, Some(num_threads)) => {
                let pool = ThreadPoolBuilder::new().num_threads(num_threads).build()?;
                Ok(ExecutionPolicy::Pool(Arc::new(pool)))
            }
        }
    }

    /// Refine `centroids` in place, starting every centroid update from
    /// `init`.
    ///
    /// # Errors
    ///
    /// Returns an error if `centroids` is empty or a dedicated thread pool
    /// cannot be built.
    pub fn fit_with_init<P, C>(
        &self,
        points: &[P],
        centroids: &mut [C],
        init: P,
    ) -> Result<KMeansOutcome, KMeansError>
    where
        P: Scale + Clone + Send + Sync,
        C: From<P> + Send + Sync,
        M: Metric<P, C> + Sync,
        A: Accumulate<P> + Sync,
    {
        if centroids.is_empty() {
            return Err(KMeansError::EmptyCentroids);
        }

        let start = Instant::now();
        let policy = self.policy()?;
        let max_iters = self.config.max_iters;

        let outcome = if policy.is_sequential() {
            k_means_with(
                points,
                centroids,
                max_iters,
                &self.metric,
                &self.accumulator,
                init,
            )
        } else {
            par_k_means_with(
                &policy,
                points,
                centroids,
                max_iters,
                &self.metric,
                &self.accumulator,
                init,
            )
        };

        if self.config.verbose {
            log::info!(
                "k-means: {} points, {} clusters, {} iterations, converged = {}, time = {:.4}s",
                points.len(),
                centroids.len(),
                outcome.iterations,
                outcome.converged,
                start.elapsed().as_secs_f64()
            );
        }

        Ok(outcome)
    }

    /// Refine `centroids` in place, starting every centroid update from a
    /// zero shaped like the points (see [`Scale::zero_like`]).
    ///
    /// # Errors
    ///
    /// Returns an error if `centroids` is empty or a dedicated thread pool
    /// cannot be built.
    pub fn fit<P, C>(&self, points: &[P], centroids: &mut [C]) -> Result<KMeansOutcome, KMeansError>
    where
        P: Scale + Clone + Default + Send + Sync,
        C: From<P> + Send + Sync,
        M: Metric<P, C> + Sync,
        A: Accumulate<P> + Sync,
    {
        self.fit_with_init(points, centroids, zero_init(points))
    }

    /// Cluster the rows of `data`, refining the rows of `centroids` in place.
    ///
    /// # Errors
    ///
    /// Returns an error if `centroids` has no rows or the two matrices have a
    /// different number of columns.
    pub fn fit_array(
        &self,
        data: &ArrayView2<f32>,
        centroids: &mut Array2<f32>,
    ) -> Result<KMeansOutcome, KMeansError>
    where
        M: Metric<Array1<f32>, Array1<f32>> + Sync,
        A: Accumulate<Array1<f32>> + Sync,
    {
        if centroids.nrows() == 0 {
            return Err(KMeansError::EmptyCentroids);
        }
        if data.ncols() != centroids.ncols() {
            return Err(KMeansError::InvalidDimensions(format!(
                "Data has {} features, centroids have {}",
                data.ncols(),
                centroids.ncols()
            )));
        }

        let points: Vec<Array1<f32>> = data.outer_iter().map(|row| row.to_owned()).collect();
        let mut rows: Vec<Array1<f32>> = centroids.outer_iter().map(|row| row.to_owned()).collect();

        let outcome = self.fit_with_init(&points, &mut rows, Array1::zeros(data.ncols()))?;

        for (mut target, row) in centroids.outer_iter_mut().zip(&rows) {
            target.assign(row);
        }

        Ok(outcome)
    }

    /// Assign points to their nearest centroid without moving the centroids.
    ///
    /// # Errors
    ///
    /// Returns an error if `centroids` is empty or a dedicated thread pool
    /// cannot be built.
    pub fn predict<P, C>(&self, points: &[P], centroids: &[C]) -> Result<Vec<usize>, KMeansError>
    where
        P: Sync,
        C: Sync,
        M: Metric<P, C> + Sync,
    {
        if centroids.is_empty() {
            return Err(KMeansError::EmptyCentroids);
        }

        let policy = self.policy()?;
        if policy.is_sequential() {
            Ok(assign(points, centroids, &self.metric))
        } else {
            Ok(par_assign(&policy, points, centroids, &self.metric))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{SquaredEuclidean, L1};
    use approx::assert_relative_eq;
    use ndarray::array;
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::RandomExt;

    #[test]
    fn test_kmeans_new() {
        let kmeans = KMeans::new(L1);
        assert_eq!(kmeans.config().max_iters, 300);
        assert!(!kmeans.config().verbose);
    }

    #[test]
    fn test_fit_sequential_and_parallel_agree() {
        let points = [0.0f64, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 9.0, 9.0, 9.0];

        let mut seq_centroids = [1.0f64, 8.0];
        let seq = KMeans::with_config(KMeansConfig::new(100).sequential(), L1)
            .fit(&points, &mut seq_centroids)
            .unwrap();

        let mut par_centroids = [1.0f64, 8.0];
        let par = KMeans::with_config(KMeansConfig::new(100).with_num_threads(Some(2)), L1)
            .fit(&points, &mut par_centroids)
            .unwrap();

        assert!(seq.converged);
        assert_eq!(seq, par);
        assert_eq!(seq_centroids, par_centroids);
        assert_relative_eq!(seq_centroids[0], 0.0);
        assert_relative_eq!(seq_centroids[1], 9.0);
    }

    #[test]
    fn test_fit_empty_centroids() {
        let mut centroids: [f64; 0] = [];
        let result = KMeans::new(L1).fit(&[1.0f64], &mut centroids);
        assert!(matches!(result, Err(KMeansError::EmptyCentroids)));
    }

    #[test]
    fn test_fit_with_custom_accumulator() {
        // Accumulate in reverse sign, so centroids come out negated
        let points = [2.0f64, 4.0];
        let mut centroids = [0.0f64];
        let kmeans = KMeans::with_config(KMeansConfig::new(1), L1)
            .with_accumulator(|acc: f64, item: f64| acc - item);

        let outcome = kmeans.fit(&points, &mut centroids).unwrap();

        assert!(outcome.converged);
        assert_eq!(centroids, [0.0]);

        let mut centroids = [0.0f64, 100.0];
        let points = [2.0f64, 4.0, 99.0];
        let outcome = kmeans.fit(&points, &mut centroids).unwrap();

        assert!(!outcome.converged);
        assert_relative_eq!(centroids[0], -3.0);
        assert_relative_eq!(centroids[1], -99.0);
    }

    #[test]
    fn test_fit_array() {
        let data = array![
            [0.0f32, 0.0],
            [0.0, 1.0],
            [10.0, 10.0],
            [10.0, 11.0],
            [10.0, 12.0]
        ];
        let mut centroids = array![[1.0f32, 1.0], [8.0, 8.0]];

        let outcome = KMeans::new(SquaredEuclidean)
            .fit_array(&data.view(), &mut centroids)
            .unwrap();

        assert!(outcome.converged);
        assert_eq!(outcome.assignments, vec![0, 0, 1, 1, 1]);
        assert_relative_eq!(centroids[[0, 0]], 0.0);
        assert_relative_eq!(centroids[[0, 1]], 0.5, epsilon = 1e-6);
        assert_relative_eq!(centroids[[1, 0]], 10.0, epsilon = 1e-5);
        assert_relative_eq!(centroids[[1, 1]], 11.0, epsilon = 1e-5);
    }

    #[test]
    fn test_fit_array_dimension_mismatch() {
        let data = Array2::random((50, 8), Uniform::new(-1.0f32, 1.0));
        let mut centroids = Array2::random((4, 16), Uniform::new(-1.0f32, 1.0));

        let result = KMeans::new(L1).fit_array(&data.view(), &mut centroids);
        assert!(matches!(result, Err(KMeansError::InvalidDimensions(_))));
    }

    #[test]
    fn test_fit_array_empty_centroids() {
        let data = Array2::random((50, 8), Uniform::new(-1.0f32, 1.0));
        let mut centroids = Array2::<f32>::zeros((0, 8));

        let result = KMeans::new(L1).fit_array(&data.view(), &mut centroids);
        assert!(matches!(result, Err(KMeansError::EmptyCentroids)));
    }

    #[test]
    fn test_fit_vector_points_with_default_init() {
        let points = vec![array![0.0f64, 0.0], array![0.0, 1.0], array![10.0, 10.0]];
        let mut centroids = vec![array![1.0f64, 1.0], array![8.0, 8.0]];

        let outcome = KMeans::with_config(KMeansConfig::new(10).sequential(), L1)
            .fit(&points, &mut centroids)
            .unwrap();

        assert!(outcome.converged);
        assert_eq!(outcome.assignments, vec![0, 0, 1]);
        assert_eq!(centroids[0], array![0.0f64, 0.5]);
        assert_eq!(centroids[1], array![10.0f64, 10.0]);
    }

    #[test]
    fn test_carried_pool_wins_over_num_threads() {
        let pool = Arc::new(ThreadPoolBuilder::new().num_threads(1).build().unwrap());
        let config = KMeansConfig::new(10)
            .with_execution(ExecutionPolicy::Pool(Arc::clone(&pool)))
            .with_num_threads(Some(3));
        let kmeans = KMeans::with_config(config, L1);

        match kmeans.policy().unwrap() {
            ExecutionPolicy::Pool(used) => assert!(Arc::ptr_eq(&used, &pool)),
            other => panic!("unexpected policy {:?}", other),
        }

        let parallel = KMeans::with_config(KMeansConfig::new(10).with_num_threads(Some(2)), L1);
        match parallel.policy().unwrap() {
            ExecutionPolicy::Pool(built) => assert_eq!(built.current_num_threads(), 2),
            other => panic!("unexpected policy {:?}", other),
        }
    }

    #[test]
    fn test_predict() {
        let kmeans = KMeans::new(L1);

        let labels = kmeans.predict(&[0.5f64, 5.0, 9.5], &[0.0f64, 10.0]).unwrap();
        assert_eq!(labels, vec![0, 1, 1]);

        let empty: [f64; 0] = [];
        assert!(matches!(
            kmeans.predict(&[1.0f64], &empty),
            Err(KMeansError::EmptyCentroids)
        ));
    }
}
