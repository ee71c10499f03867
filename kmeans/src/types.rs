//! Type definitions shared by every step of a clustering run
//! Includes the numeric element bound, the vector alias, clusters,
//! and the mean accumulation strategies

use std::fmt::Debug;

use num_traits::{Bounded, Num, NumCast, ToPrimitive};

/// Numeric element of a vector: any integer or floating primitive
pub trait Scalar: Num + NumCast + Bounded + Copy + PartialOrd + Debug + Send + Sync {
    /// Widen the value to f64 (NaN if it has no f64 form)
    fn as_f64(self) -> f64 {
        ToPrimitive::to_f64(&self).unwrap_or(f64::NAN)
    }
}

impl<T> Scalar for T where T: Num + NumCast + Bounded + Copy + PartialOrd + Debug + Send + Sync {}

/// Fixed-length ordered sequence of scalars, used for points and centroids alike
pub type Vector<T> = Vec<T>;

/// One centroid together with the dataset indices currently assigned to it
#[derive(Clone, Debug, PartialEq)]
pub struct Cluster<T> {
    pub centroid: Vector<T>,
    /// Indices into the dataset, in dataset order
    pub members: Vec<usize>,
}

impl<T: Scalar> Cluster<T> {
    pub fn new(centroid: Vector<T>) -> Self {
        Self { centroid, members: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterate over the member points, borrowed from the dataset they index into
    pub fn points<'a>(&'a self, data: &'a [Vector<T>]) -> impl Iterator<Item = &'a [T]> + 'a {
        self.members.iter().map(move |&i| data[i].as_slice())
    }
}

/// How a cluster mean is accumulated
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MeanStrategy {
    /// Sum every member in f64, divide the total once, cast back (truncating for integers)
    #[default]
    SumThenDivide,
    /// Divide each member by the count before adding it in, staying in the element type
    AccumulateDivide,
}
