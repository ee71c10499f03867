//! Distance metrics between two vectors of the same element type
//!
//! Any `Fn(&[T], &[T]) -> R` is a distance, so the free functions below and
//! ad-hoc closures plug straight into a run. The `_f32` and `_f64` variants
//! accumulate in their own precision instead of widening through f64.

use num_traits::Float;

use crate::types::Scalar;

/// Maps two same-length vectors to a non-negative magnitude.
///
/// Implementations are expected to be deterministic and symmetric; seeding and
/// assignment rely on it but nothing checks it.
pub trait Distance<T, R>: Send + Sync {
    fn distance(&self, a: &[T], b: &[T]) -> R;
}

impl<T, R, F> Distance<T, R> for F
where
    F: Fn(&[T], &[T]) -> R + Send + Sync,
{
    fn distance(&self, a: &[T], b: &[T]) -> R {
        self(a, b)
    }
}

/// Built-in metrics selectable by name
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Metric {
    /// L1, sum of absolute differences
    Manhattan,
    /// L2, square root of the sum of squared differences
    #[default]
    Euclidean,
}

impl<T: Scalar> Distance<T, f64> for Metric {
    fn distance(&self, a: &[T], b: &[T]) -> f64 {
        match self {
            Metric::Manhattan => l1(a, b),
            Metric::Euclidean => l2(a, b),
        }
    }
}

impl Distance<f32, f32> for Metric {
    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Metric::Manhattan => l1_f32(a, b),
            Metric::Euclidean => l2_f32(a, b),
        }
    }
}

/// L1 distance for any scalar type.
/// Elements are widened before subtracting, so unsigned inputs never wrap.
pub fn l1<T: Scalar>(a: &[T], b: &[T]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| (x.as_f64() - y.as_f64()).abs())
        .sum()
}

/// L2 distance for any scalar type
pub fn l2<T: Scalar>(a: &[T], b: &[T]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = x.as_f64() - y.as_f64();
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

pub fn l1_f32(a: &[f32], b: &[f32]) -> f32 {
    fixed_l1(a, b)
}

pub fn l2_f32(a: &[f32], b: &[f32]) -> f32 {
    fixed_l2(a, b)
}

pub fn l1_f64(a: &[f64], b: &[f64]) -> f64 {
    fixed_l1(a, b)
}

pub fn l2_f64(a: &[f64], b: &[f64]) -> f64 {
    fixed_l2(a, b)
}

fn fixed_l1<F: Float>(a: &[F], b: &[F]) -> F {
    a.iter()
        .zip(b)
        .fold(F::zero(), |acc, (&x, &y)| acc + (x - y).abs())
}

fn fixed_l2<F: Float>(a: &[F], b: &[F]) -> F {
    a.iter()
        .zip(b)
        .fold(F::zero(), |acc, (&x, &y)| acc + (x - y) * (x - y))
        .sqrt()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn generic_metrics_on_integers() {
        let a = [1i32, 2, 3];
        let b = [4i32, 6, 3];
        assert_relative_eq!(l1(&a, &b), 7.0);
        assert_relative_eq!(l2(&a, &b), 5.0);
    }

    #[test]
    fn unsigned_difference_does_not_wrap() {
        assert_relative_eq!(l1(&[0u8], &[3u8]), 3.0);
        assert_relative_eq!(l2(&[0u32, 0], &[3u32, 4]), 5.0);
    }

    #[test]
    fn fixed_precision_variants_agree_with_generic() {
        let a = [0.5f32, -1.25, 3.0];
        let b = [1.5f32, 0.75, -1.0];
        assert_relative_eq!(l1_f32(&a, &b) as f64, l1(&a, &b), epsilon = 1e-6);
        assert_relative_eq!(l2_f32(&a, &b) as f64, l2(&a, &b), epsilon = 1e-6);

        let a = [0.5f64, -1.25, 3.0];
        let b = [1.5f64, 0.75, -1.0];
        assert_relative_eq!(l1_f64(&a, &b), 7.0);
        assert_relative_eq!(l2_f64(&a, &b), 21.0f64.sqrt());
    }

    #[test]
    fn metrics_are_symmetric() {
        let a = [3.0f64, -7.5];
        let b = [-2.0f64, 1.0];
        assert_eq!(l1_f64(&a, &b), l1_f64(&b, &a));
        assert_eq!(l2_f64(&a, &b), l2_f64(&b, &a));
    }

    #[test]
    fn metric_enum_dispatches() {
        let a = [0.0f64, 0.0];
        let b = [3.0f64, 4.0];
        assert_relative_eq!(Distance::<f64, f64>::distance(&Metric::Manhattan, &a, &b), 7.0);
        assert_relative_eq!(Distance::<f64, f64>::distance(&Metric::Euclidean, &a, &b), 5.0);

        let a = [0.0f32, 0.0];
        let b = [3.0f32, 4.0];
        assert_relative_eq!(Distance::<f32, f32>::distance(&Metric::Euclidean, &a, &b), 5.0f32);
    }

    #[test]
    fn closures_are_distances() {
        let chebyshev = |a: &[i64], b: &[i64]| -> f64 {
            a.iter().zip(b).map(|(x, y)| (x - y).abs() as f64).fold(0.0, f64::max)
        };
        assert_relative_eq!(chebyshev.distance(&[1, 9], &[4, 2]), 7.0);
    }
}
