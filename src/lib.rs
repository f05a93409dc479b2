//! # lloyd-kmeans
//!
//! A generic Lloyd-style k-means kernel: points are repeatedly assigned to
//! their nearest centroid and every centroid is recomputed from its members,
//! until no assignment changes or the iteration budget runs out.
//!
//! ## Features
//!
//! - **Generic points**: cluster scalars, `ndarray` vectors or your own type;
//!   the kernel only needs a [`Metric`], a [`Scale`] impl and an
//!   [`Accumulate`] operator (ordinary addition by default)
//! - **Two interchangeable modes**: [`k_means`] runs on the calling thread,
//!   [`par_k_means`] spreads each phase over rayon workers and yields
//!   identical results
//! - **Caller-owned centroids**: initial centroids are supplied by the caller
//!   and refined in place
//!
//! ## Example
//!
//! ```rust
//! use lloyd_kmeans::{k_means, par_k_means, ExecutionPolicy, L1};
//!
//! let points = [0.0f32, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 9.0, 9.0, 9.0];
//!
//! let mut centroids = [1.0f32, 8.0];
//! let outcome = k_means(&points, &mut centroids, usize::MAX, &L1);
//! assert!(outcome.converged);
//! assert_eq!(outcome.assignments, vec![0, 0, 0, 0, 0, 0, 0, 1, 1, 1]);
//! assert_eq!(centroids, [0.0, 9.0]);
//!
//! let mut par_centroids = [1.0f32, 8.0];
//! let par_outcome = par_k_means(
//!     &ExecutionPolicy::Parallel,
//!     &points,
//!     &mut par_centroids,
//!     usize::MAX,
//!     &L1,
//! );
//! assert_eq!(par_outcome, outcome);
//! assert_eq!(par_centroids, centroids);
//! ```
//!
//! ## Custom point types
//!
//! ```rust
//! use lloyd_kmeans::{k_means_with, Scale};
//!
//! #[derive(Clone, Copy, Debug, PartialEq)]
//! struct Rgb(f64, f64, f64);
//!
//! impl Scale for Rgb {
//!     fn scale(&self, factor: f64) -> Self {
//!         Rgb(self.0 * factor, self.1 * factor, self.2 * factor)
//!     }
//! }
//!
//! let pixels = [Rgb(250.0, 0.0, 0.0), Rgb(240.0, 10.0, 0.0), Rgb(0.0, 0.0, 200.0)];
//! let mut palette = [Rgb(255.0, 0.0, 0.0), Rgb(0.0, 0.0, 255.0)];
//!
//! let distance = |p: &Rgb, c: &Rgb| {
//!     (p.0 - c.0).powi(2) + (p.1 - c.1).powi(2) + (p.2 - c.2).powi(2)
//! };
//! let add = |a: Rgb, b: Rgb| Rgb(a.0 + b.0, a.1 + b.1, a.2 + b.2);
//!
//! let outcome = k_means_with(&pixels, &mut palette, 10, &distance, &add, Rgb(0.0, 0.0, 0.0));
//! assert!(outcome.converged);
//! assert_eq!(outcome.assignments, vec![0, 0, 1]);
//! assert_eq!(palette[1], Rgb(0.0, 0.0, 200.0));
//! ```

pub mod algorithm;
mod config;
pub mod distance;
mod error;
mod kmeans;
pub mod parallel;
mod point;

pub use algorithm::{assign, k_means, k_means_resume, k_means_with, KMeansOutcome};
pub use config::KMeansConfig;
pub use distance::{SquaredEuclidean, L1};
pub use error::KMeansError;
pub use kmeans::KMeans;
pub use parallel::{par_assign, par_k_means, par_k_means_resume, par_k_means_with, ExecutionPolicy};
pub use point::{Accumulate, Metric, Plus, Scale};
