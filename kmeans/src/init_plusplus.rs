//! K-Means++ initialization algorithm
//! Picks initial centroids among the data points, each new one drawn with
//! probability proportional to its squared distance from the closest centroid
//! chosen so far

use num_traits::Float;
use rand::prelude::*;
use rand_chacha::ChaCha20Rng;

use crate::{distance::Distance, types::{Scalar, Vector}};

/// Select `k` initial centroids from `data` using K-Means++
///
/// # Arguments
/// * `data` - Points to sample from; every returned centroid is a copy of one of them
/// * `k` - Number of centroids to pick
/// * `distance` - Distance used to weigh the candidates
/// * `rng` - Random generator; the same generator state gives the same centroids
///
/// # Returns
/// * `k` centroids, or an empty set if `data` is empty or `k` is zero.
///   Duplicate points in `data` may produce duplicate centroids.
///
/// # Algorithm
/// 1. Choose the first centroid uniformly at random
/// 2. For each remaining centroid:
///    - Keep, for every point, its distance to the nearest centroid so far
///    - Weight every point by that distance squared, scaled by the largest
///      distance so huge coordinates cannot overflow the weights
///    - Draw uniformly in [0, total weight) and walk the cumulative weights
///      until they reach the draw
///    - Points at infinite distance (e.g. an overflowing metric) are drawn
///      uniformly among themselves; NaN distances weigh nothing
pub fn seed_centroids<T, R, D>(
    data: &[Vector<T>],
    k: usize,
    distance: &D,
    rng: &mut ChaCha20Rng,
) -> Vec<Vector<T>>
where
    T: Scalar,
    R: Float,
    D: Distance<T, R> + ?Sized,
{
    if data.is_empty() || k == 0 {
        return Vec::new();
    }

    let mut centroids: Vec<Vector<T>> = Vec::with_capacity(k);
    let first = rng.random_range(0..data.len());
    centroids.push(data[first].clone());

    // Distance of every point to its nearest centroid, refreshed with each new pick.
    // NaN until a comparable distance is seen.
    let mut nearest = vec![f64::NAN; data.len()];
    let mut weights = vec![0.0f64; data.len()];

    for _ in 1..k {
        // Step 1: refresh nearest distances against the newest centroid only
        let newest = &centroids[centroids.len() - 1];
        for (point, near) in data.iter().zip(nearest.iter_mut()) {
            let d = distance.distance(point, newest).to_f64().unwrap_or(f64::NAN);
            if near.is_nan() || d < *near {
                *near = d;
            }
        }

        // Step 2: points at infinite distance outweigh everything else, draw among them
        let infinite: Vec<usize> = (0..data.len()).filter(|&i| nearest[i] == f64::INFINITY).collect();
        if !infinite.is_empty() {
            let selected = infinite[rng.random_range(0..infinite.len())];
            centroids.push(data[selected].clone());
            continue;
        }

        // Step 3: squared distances scaled by the largest one, so the weights stay in [0, 1]
        let scale = nearest.iter().copied().filter(|d| d.is_finite()).fold(0.0, f64::max);
        let mut total = 0.0;
        for (weight, &near) in weights.iter_mut().zip(&nearest) {
            *weight = if scale > 0.0 && near.is_finite() {
                let ratio = near / scale;
                ratio * ratio
            } else {
                0.0
            };
            total += *weight;
        }

        // Step 4: inverse-CDF walk; a zero total means every point already sits on a centroid
        let draw = if total > 0.0 && total.is_finite() { rng.random_range(0.0..total) } else { 0.0 };
        let mut cumulative = 0.0;
        let mut selected = data.len() - 1;
        for (i, weight) in weights.iter().enumerate() {
            cumulative += weight;
            if cumulative >= draw {
                selected = i;
                break;
            }
        }
        centroids.push(data[selected].clone());
    }

    centroids
}
