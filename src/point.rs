//! Capabilities the kernel needs from its points and collaborators.
//!
//! The kernel never looks inside a point. It only measures distances through
//! a [`Metric`], shrinks points with [`Scale`] and folds them together with an
//! [`Accumulate`] operator. Plain closures work for both collaborator traits.

use ndarray::{Array, Dimension};
use std::ops::Add;

/// Multiplication of a point by a scalar.
///
/// Used in the update phase to weight every member of a cluster by
/// `1 / cluster_size` before it is accumulated.
pub trait Scale {
    fn scale(&self, factor: f64) -> Self;

    /// Additive zero with the same shape as `self`.
    ///
    /// Used as the default start value of a centroid update. Override it
    /// when `scale(0.0)` is not a zero (e.g. for points holding infinities).
    fn zero_like(&self) -> Self
    where
        Self: Sized,
    {
        self.scale(0.0)
    }
}

impl Scale for f32 {
    #[inline]
    fn scale(&self, factor: f64) -> Self {
        (f64::from(*self) * factor) as f32
    }

    fn zero_like(&self) -> Self {
        0.0
    }
}

impl Scale for f64 {
    #[inline]
    fn scale(&self, factor: f64) -> Self {
        self * factor
    }

    fn zero_like(&self) -> Self {
        0.0
    }
}

impl<D: Dimension> Scale for Array<f32, D> {
    fn scale(&self, factor: f64) -> Self {
        self.mapv(|x| x.scale(factor))
    }

    fn zero_like(&self) -> Self {
        Array::zeros(self.raw_dim())
    }
}

impl<D: Dimension> Scale for Array<f64, D> {
    fn scale(&self, factor: f64) -> Self {
        self.mapv(|x| x * factor)
    }

    fn zero_like(&self) -> Self {
        Array::zeros(self.raw_dim())
    }
}

/// Distance between a point and a centroid.
///
/// Smaller values mean closer. `Distance` only needs a partial order; a
/// comparison that yields `None` (e.g. NaN) never displaces the current best
/// centroid.
pub trait Metric<P, C> {
    type Distance: PartialOrd;

    fn distance(&self, point: &P, centroid: &C) -> Self::Distance;
}

impl<P, C, D, F> Metric<P, C> for F
where
    F: Fn(&P, &C) -> D,
    D: PartialOrd,
{
    type Distance = D;

    #[inline]
    fn distance(&self, point: &P, centroid: &C) -> D {
        self(point, centroid)
    }
}

/// Associative operator used to sum scaled points into a new centroid.
pub trait Accumulate<P> {
    fn accumulate(&self, acc: P, item: P) -> P;
}

impl<P, F> Accumulate<P> for F
where
    F: Fn(P, P) -> P,
{
    #[inline]
    fn accumulate(&self, acc: P, item: P) -> P {
        self(acc, item)
    }
}

/// Ordinary addition through [`std::ops::Add`]; the default accumulator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Plus;

impl<P: Add<Output = P>> Accumulate<P> for Plus {
    #[inline]
    fn accumulate(&self, acc: P, item: P) -> P {
        acc + item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_scale_scalars() {
        assert_relative_eq!(9.0f32.scale(1.0 / 3.0), 3.0, epsilon = 1e-6);
        assert_relative_eq!(4.0f64.scale(0.25), 1.0);
    }

    #[test]
    fn test_scale_array() {
        let p = array![2.0f32, -4.0, 8.0];
        assert_eq!(p.scale(0.5), array![1.0f32, -2.0, 4.0]);
    }

    #[test]
    fn test_zero_like_keeps_shape() {
        assert_eq!(3.5f32.zero_like(), 0.0);
        assert_eq!(f64::INFINITY.zero_like(), 0.0);

        let p = array![2.0f64, f64::INFINITY, -1.0];
        assert_eq!(p.zero_like(), array![0.0f64, 0.0, 0.0]);
    }

    #[test]
    fn test_closure_collaborators() {
        let metric = |p: &f64, c: &f64| (p - c).abs();
        assert_relative_eq!(metric.distance(&1.0, &4.0), 3.0);

        let max = |a: i32, b: i32| a.max(b);
        assert_eq!(max.accumulate(3, 7), 7);
    }

    #[test]
    fn test_plus() {
        assert_eq!(Plus.accumulate(2, 3), 5);
        assert_eq!(
            Plus.accumulate(array![1.0f64, 2.0], array![0.5, 0.5]),
            array![1.5, 2.5]
        );
    }
}
