use thiserror::Error;

/// Error types for the configured [`KMeans`](crate::KMeans) runner.
///
/// The raw kernels in [`crate::algorithm`] and [`crate::parallel`] are
/// unchecked and never return these.
#[derive(Error, Debug)]
pub enum KMeansError {
    /// No centroids were supplied, so there is nothing to assign points to
    #[error("At least one centroid is required")]
    EmptyCentroids,

    /// Dimension mismatch between data and centroids
    #[error("Dimension mismatch: {0}")]
    InvalidDimensions(String),

    /// A dedicated rayon pool could not be built
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
