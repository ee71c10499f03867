//! Distance-matrix helpers used by the assignment step

use num_traits::Zero;

use crate::{
    error::{KMeansError, Result},
    types::Vector,
};

/// Allocate a `rows` by `cols` matrix filled with zero
pub fn init_matrix<R: Zero + Clone>(rows: usize, cols: usize) -> Vec<Vec<R>> {
    vec![vec![R::zero(); cols]; rows]
}

/// Swap rows and columns of a rectangular matrix
///
/// An empty matrix, or one with empty rows, transposes to an empty matrix.
pub fn transpose<R: Copy>(matrix: &[Vec<R>]) -> Vec<Vec<R>> {
    let cols = match matrix.first() {
        Some(row) if !row.is_empty() => row.len(),
        _ => return Vec::new(),
    };
    (0..cols)
        .map(|col| matrix.iter().map(|row| row[col]).collect())
        .collect()
}

/// Index of the smallest value; ties and incomparable values keep the earliest index
pub fn argmin<R: PartialOrd + Copy>(values: &[R]) -> Option<usize> {
    let mut iter = values.iter().enumerate();
    let (mut min_index, mut min) = iter.next().map(|(i, v)| (i, *v))?;
    for (i, &v) in iter {
        if v < min {
            min = v;
            min_index = i;
        }
    }
    Some(min_index)
}

/// Check that every vector has `expected` elements
pub fn check_dimensions<T>(vectors: &[Vector<T>], expected: usize) -> Result<()> {
    match vectors.iter().position(|v| v.len() != expected) {
        Some(index) => Err(KMeansError::DimensionMismatch {
            index,
            expected,
            got: vectors[index].len(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transpose_swaps_axes() {
        let matrix = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        assert_eq!(
            transpose(&matrix),
            vec![vec![1.0, 4.0], vec![2.0, 5.0], vec![3.0, 6.0]]
        );
        assert!(transpose::<f64>(&[]).is_empty());
        assert!(transpose::<f64>(&[vec![], vec![]]).is_empty());
    }

    #[test]
    fn init_matrix_shape() {
        let m: Vec<Vec<f32>> = init_matrix(3, 2);
        assert_eq!(m.len(), 3);
        assert!(m.iter().all(|row| row == &vec![0.0, 0.0]));
    }

    #[test]
    fn argmin_first_index_wins_ties() {
        assert_eq!(argmin(&[3.0, 1.0, 1.0, 2.0]), Some(1));
        assert_eq!(argmin(&[5.0, 5.0]), Some(0));
        assert_eq!(argmin::<f64>(&[]), None);
    }

    #[test]
    fn check_dimensions_reports_first_offender() {
        let data = vec![vec![1, 2], vec![3, 4], vec![5], vec![6, 7, 8]];
        assert_eq!(
            check_dimensions(&data, 2),
            Err(KMeansError::DimensionMismatch { index: 2, expected: 2, got: 1 })
        );
        assert!(check_dimensions(&data[..2], 2).is_ok());
    }
}
