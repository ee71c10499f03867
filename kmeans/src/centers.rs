//! Update step: recompute every centroid as the mean of its assigned points

use num_traits::{Float, NumCast};

use crate::{
    assign::Assignment,
    config::EmptyClusterPolicy,
    error::{KMeansError, Result},
    types::{MeanStrategy, Scalar, Vector},
};

/// Compute the next centroid set from an assignment
///
/// Non-empty clusters move to the element-wise mean of their members. Empty
/// clusters follow `policy`: `Retain` keeps the previous centroid, while
/// `ReseedFarthest` walks the empty clusters in index order and gives each the
/// point farthest from its own centroid, never handing the same point out twice
/// in one step. When no point is left the previous centroid is kept.
///
/// # Arguments
/// * `data` - The points the assignment was computed over
/// * `assignment` - Clusters, labels and distances from the assignment step
/// * `strategy` - How member vectors are accumulated into the mean
/// * `policy` - Handling of clusters that received no points
///
/// # Errors
/// * `CountOverflow` if, under `AccumulateDivide`, a cluster size does not fit the element type
pub fn update<T, R>(
    data: &[Vector<T>],
    assignment: &Assignment<T, R>,
    strategy: MeanStrategy,
    policy: EmptyClusterPolicy,
) -> Result<Vec<Vector<T>>>
where
    T: Scalar,
    R: Float,
{
    let mut centroids = assignment
        .clusters
        .iter()
        .map(|cluster| {
            if cluster.is_empty() {
                Ok(cluster.centroid.clone())
            } else {
                mean(data, &cluster.members, cluster.centroid.len(), strategy)
            }
        })
        .collect::<Result<Vec<Vector<T>>>>()?;

    if policy == EmptyClusterPolicy::ReseedFarthest {
        let mut taken = vec![false; data.len()];
        for cluster in assignment.empty_clusters() {
            if let Some(point) = farthest_point(assignment, &taken) {
                taken[point] = true;
                centroids[cluster] = data[point].clone();
            }
        }
    }

    Ok(centroids)
}

/// Element-wise mean of the member points
///
/// `SumThenDivide` accumulates in f64 so integer sums cannot overflow; the mean
/// lies between the member values, so casting back only fails on f64 rounding
/// at the very edge of the type's range, where it clamps to that edge.
/// `AccumulateDivide` keeps each term at most |x| / count and needs no widening.
fn mean<T: Scalar>(
    data: &[Vector<T>],
    members: &[usize],
    dim: usize,
    strategy: MeanStrategy,
) -> Result<Vector<T>> {
    let count = members.len();
    match strategy {
        MeanStrategy::SumThenDivide => {
            // Step 1: sum every member element-wise in f64
            let mut acc = vec![0.0f64; dim];
            for &i in members {
                for (a, &x) in acc.iter_mut().zip(&data[i]) {
                    *a += x.as_f64();
                }
            }
            // Step 2: divide once and cast back into the element type
            Ok(acc.into_iter().map(|sum| narrow(sum / count as f64)).collect())
        }
        MeanStrategy::AccumulateDivide => {
            let divisor: T = NumCast::from(count).ok_or(KMeansError::CountOverflow { count })?;
            let mut acc = vec![T::zero(); dim];
            for &i in members {
                for (a, &x) in acc.iter_mut().zip(&data[i]) {
                    *a = *a + x / divisor;
                }
            }
            Ok(acc)
        }
    }
}

fn narrow<T: Scalar>(value: f64) -> T {
    NumCast::from(value).unwrap_or_else(|| {
        if value > 0.0 {
            T::max_value()
        } else {
            T::min_value()
        }
    })
}

/// Untaken point with the largest distance to its own centroid, lowest index on ties
fn farthest_point<T: Scalar, R: Float>(assignment: &Assignment<T, R>, taken: &[bool]) -> Option<usize> {
    let mut best: Option<(usize, R)> = None;
    for point in (0..assignment.labels.len()).filter(|&i| !taken[i]) {
        let d = assignment.own_distance(point);
        if best.is_none_or(|(_, max)| d > max) {
            best = Some((point, d));
        }
    }
    best.map(|(point, _)| point)
}
