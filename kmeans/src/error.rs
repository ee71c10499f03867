//! Error types for clustering runs.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, KMeansError>;

/// Failures detected before or during a run.
///
/// Degenerate cluster counts are not errors; see [`crate::task::Outcome`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KMeansError {
    /// A vector's length differs from the first vector of the dataset.
    #[error("dimension mismatch at vector {index}: expected {expected}, got {got}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        got: usize,
    },

    /// Configuration value out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Cluster size cannot be represented in the element type, so an accumulate-divide mean cannot be taken.
    #[error("cluster size {count} is not representable in the element type")]
    CountOverflow { count: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let err = KMeansError::DimensionMismatch { index: 4, expected: 3, got: 2 };
        assert_eq!(err.to_string(), "dimension mismatch at vector 4: expected 3, got 2");

        let err = KMeansError::CountOverflow { count: 300 };
        assert_eq!(err.to_string(), "cluster size 300 is not representable in the element type");
    }
}
