//! Stock distance metrics.
//!
//! The kernel accepts any [`Metric`]; these cover the common scalar and
//! dense-vector cases.

use crate::point::Metric;
use ndarray::Array1;

/// Manhattan distance: `|p - c|` for scalars, the sum of absolute
/// coordinate differences for vectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct L1;

/// Squared Euclidean distance. Orders centroids exactly like the Euclidean
/// distance without the square root.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredEuclidean;

macro_rules! scalar_metrics {
    ($($t:ty),*) => {$(
        impl Metric<$t, $t> for L1 {
            type Distance = $t;

            #[inline]
            fn distance(&self, point: &$t, centroid: &$t) -> $t {
                (point - centroid).abs()
            }
        }

        impl Metric<$t, $t> for SquaredEuclidean {
            type Distance = $t;

            #[inline]
            fn distance(&self, point: &$t, centroid: &$t) -> $t {
                let d = point - centroid;
                d * d
            }
        }

        impl Metric<Array1<$t>, Array1<$t>> for L1 {
            type Distance = $t;

            fn distance(&self, point: &Array1<$t>, centroid: &Array1<$t>) -> $t {
                assert_eq!(point.len(), centroid.len(), "point and centroid dimensions differ");
                point
                    .iter()
                    .zip(centroid.iter())
                    .map(|(p, c)| (p - c).abs())
                    .sum()
            }
        }

        impl Metric<Array1<$t>, Array1<$t>> for SquaredEuclidean {
            type Distance = $t;

            fn distance(&self, point: &Array1<$t>, centroid: &Array1<$t>) -> $t {
                assert_eq!(point.len(), centroid.len(), "point and centroid dimensions differ");
                point
                    .iter()
                    .zip(centroid.iter())
                    .map(|(p, c)| {
                        let d = p - c;
                        d * d
                    })
                    .sum()
            }
        }
    )*};
}

scalar_metrics!(f32, f64);
