//! Assignment step: every point joins the cluster of its nearest centroid

use num_traits::Float;
use rayon::prelude::*;

use crate::{
    distance::Distance,
    error::{KMeansError, Result},
    tools::{argmin, check_dimensions, init_matrix, transpose},
    types::{Cluster, Scalar, Vector},
};

/// Result of one assignment step
#[derive(Clone, Debug)]
pub struct Assignment<T, R> {
    /// One cluster per centroid, index-aligned with the centroid set
    pub clusters: Vec<Cluster<T>>,
    /// Cluster index of every point, in dataset order
    pub labels: Vec<usize>,
    /// Point-major distance matrix: `distances[point][centroid]`
    pub distances: Vec<Vec<R>>,
}

impl<T: Scalar, R: Float> Assignment<T, R> {
    /// Distance from a point to the centroid it was assigned to
    pub fn own_distance(&self, point: usize) -> R {
        self.distances[point][self.labels[point]]
    }

    /// Sum of every point's distance to its own centroid
    pub fn inertia(&self) -> f64 {
        (0..self.labels.len())
            .map(|i| self.own_distance(i).to_f64().unwrap_or(f64::NAN))
            .sum()
    }

    /// Indices of clusters that received no points
    pub fn empty_clusters(&self) -> Vec<usize> {
        self.clusters
            .iter()
            .enumerate()
            .filter_map(|(i, cluster)| cluster.is_empty().then_some(i))
            .collect()
    }
}

/// Partition `data` by nearest centroid
///
/// The full centroid-by-point distance matrix is computed first (on the rayon
/// pool when `parallel` is set, each cell independently so the values do not
/// depend on it) and then read point by point. The lowest centroid index wins
/// ties.
///
/// # Errors
/// * `InvalidParameter` if `centroids` is empty
/// * `DimensionMismatch` if a centroid's length differs from the points'
pub fn assign<T, R, D>(
    data: &[Vector<T>],
    centroids: &[Vector<T>],
    distance: &D,
    parallel: bool,
) -> Result<Assignment<T, R>>
where
    T: Scalar,
    R: Float + Send + Sync,
    D: Distance<T, R> + ?Sized,
{
    if centroids.is_empty() {
        return Err(KMeansError::InvalidParameter(
            "assignment needs at least one centroid".to_string(),
        ));
    }
    if let Some(first) = data.first() {
        check_dimensions(centroids, first.len())?;
    }

    let mut matrix: Vec<Vec<R>> = init_matrix(centroids.len(), data.len());
    if parallel {
        matrix
            .par_iter_mut()
            .zip(centroids.par_iter())
            .for_each(|(row, centroid)| fill_row(row, data, centroid, distance));
    } else {
        matrix
            .iter_mut()
            .zip(centroids)
            .for_each(|(row, centroid)| fill_row(row, data, centroid, distance));
    }
    let distances = transpose(&matrix);

    let mut clusters: Vec<Cluster<T>> = centroids.iter().cloned().map(Cluster::new).collect();
    let labels: Vec<usize> = distances
        .iter()
        .map(|row| argmin(row).unwrap_or_default())
        .collect();
    for (point, &label) in labels.iter().enumerate() {
        clusters[label].members.push(point);
    }

    Ok(Assignment { clusters, labels, distances })
}

fn fill_row<T, R, D>(row: &mut [R], data: &[Vector<T>], centroid: &[T], distance: &D)
where
    D: Distance<T, R> + ?Sized,
{
    for (cell, point) in row.iter_mut().zip(data) {
        *cell = distance.distance(point, centroid);
    }
}

/// Nearest centroid to a single point and its distance, `None` without centroids
pub fn nearest<T, R, D>(point: &[T], centroids: &[Vector<T>], distance: &D) -> Option<(usize, R)>
where
    R: PartialOrd + Copy,
    D: Distance<T, R> + ?Sized,
{
    let distances: Vec<R> = centroids
        .iter()
        .map(|centroid| distance.distance(point, centroid))
        .collect();
    argmin(&distances).map(|i| (i, distances[i]))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::distance::{l1, l2_f64};

    fn line() -> Vec<Vector<f64>> {
        vec![vec![0.0], vec![1.0], vec![5.0], vec![9.0], vec![10.0]]
    }

    #[test]
    fn every_point_lands_in_exactly_one_cluster() {
        let data = line();
        let centroids = vec![vec![0.0], vec![10.0]];
        let assignment = assign(&data, &centroids, &l2_f64, false).unwrap();

        let total: usize = assignment.clusters.iter().map(Cluster::len).sum();
        assert_eq!(total, data.len());

        let mut seen: Vec<usize> = assignment
            .clusters
            .iter()
            .flat_map(|c| c.members.iter().copied())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..data.len()).collect::<Vec<_>>());
    }

    #[test]
    fn ties_go_to_lowest_centroid_index() {
        let data = line();
        let centroids = vec![vec![0.0], vec![10.0]];
        let assignment = assign(&data, &centroids, &l2_f64, false).unwrap();

        // 5.0 is equidistant from both centroids
        assert_eq!(assignment.labels, vec![0, 0, 0, 1, 1]);
        assert_eq!(assignment.clusters[0].members, vec![0, 1, 2]);
        assert_eq!(assignment.clusters[1].centroid, vec![10.0]);
    }

    #[test]
    fn distance_matrix_is_point_major() {
        let data = line();
        let centroids = vec![vec![0.0], vec![10.0]];
        let assignment = assign(&data, &centroids, &l2_f64, false).unwrap();

        assert_eq!(assignment.distances.len(), data.len());
        assert_eq!(assignment.distances[3], vec![9.0, 1.0]);
        assert_relative_eq!(assignment.own_distance(3), 1.0);
        assert_relative_eq!(assignment.inertia(), 0.0 + 1.0 + 5.0 + 1.0 + 0.0);
    }

    #[test]
    fn parallel_fill_matches_sequential() {
        let data: Vec<Vector<f64>> = (0..200)
            .map(|i| vec![(i % 17) as f64 * 0.37, (i % 11) as f64 * 1.3])
            .collect();
        let centroids = vec![vec![0.0, 0.0], vec![3.0, 6.0], vec![5.5, 12.0]];

        let sequential = assign(&data, &centroids, &l2_f64, false).unwrap();
        let parallel = assign(&data, &centroids, &l2_f64, true).unwrap();
        assert_eq!(sequential.labels, parallel.labels);
        assert_eq!(sequential.distances, parallel.distances);
        assert_eq!(sequential.clusters, parallel.clusters);
    }

    #[test]
    fn unmatched_centroid_reports_empty_cluster() {
        let data = line();
        let centroids = vec![vec![0.0], vec![10.0], vec![1000.0]];
        let assignment = assign(&data, &centroids, &l2_f64, false).unwrap();
        assert_eq!(assignment.empty_clusters(), vec![2]);
    }

    #[test]
    fn rejects_missing_or_malformed_centroids() {
        let data = line();
        assert!(matches!(
            assign(&data, &[], &l2_f64, false),
            Err(KMeansError::InvalidParameter(_))
        ));
        assert_eq!(
            assign(&data, &[vec![0.0], vec![1.0, 2.0]], &l2_f64, false).unwrap_err(),
            KMeansError::DimensionMismatch { index: 1, expected: 1, got: 2 }
        );
    }

    #[test]
    fn nearest_reports_index_and_distance() {
        let centroids = vec![vec![0i32, 0], vec![10, 10]];
        assert_eq!(nearest(&[9, 7], &centroids, &l1::<i32>), Some((1, 4.0)));
        assert_eq!(nearest(&[5, 5], &centroids, &l1::<i32>), Some((0, 10.0)));
        assert_eq!(nearest::<i32, f64, _>(&[5, 5], &[], &l1::<i32>), None);
    }
}
