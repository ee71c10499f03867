//! Run configuration: cluster count, convergence criterion, iteration cap,
//! empty-cluster handling, shuffling and seeding, with builder setters

use crate::{
    error::{KMeansError, Result},
    types::MeanStrategy,
};

/// When the iteration stops
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Convergence {
    /// Centroid set is element-for-element equal to the previous one
    #[default]
    Exact,
    /// Every centroid moved no further than `KMeansConfig::delta`
    Delta,
}

/// What happens to a centroid that attracted no points
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmptyClusterPolicy {
    /// Keep the previous centroid unchanged
    #[default]
    Retain,
    /// Move it onto the point farthest from its own centroid
    ReseedFarthest,
}

/// Dataset shuffling before seeding
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShuffleMode {
    #[default]
    Off,
    /// Shuffle the dataset owned by the task; the new order is visible afterwards
    InPlace,
    /// Shuffle a working copy and leave the owned dataset in its original order
    WorkingCopy,
}

/// Parameters of one clustering run
#[derive(Clone, Debug, PartialEq)]
pub struct KMeansConfig {
    /// Desired number of clusters
    pub k: usize,
    /// Centroid shift tolerance, read only with `Convergence::Delta`
    pub delta: f64,
    pub shuffle: ShuffleMode,
    pub mean: MeanStrategy,
    pub convergence: Convergence,
    /// Optional iteration cap; the best centroid set seen so far is returned when hit
    pub max_iter: Option<usize>,
    pub empty_cluster: EmptyClusterPolicy,
    /// Fill the distance matrix on the rayon pool
    pub parallel: bool,
    /// Seed for the random generator, drawn from the OS when absent
    pub seed: Option<u64>,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: 2,
            delta: 0.0,
            shuffle: ShuffleMode::Off,
            mean: MeanStrategy::SumThenDivide,
            convergence: Convergence::Exact,
            max_iter: None,
            empty_cluster: EmptyClusterPolicy::Retain,
            parallel: false,
            seed: None,
        }
    }
}

impl KMeansConfig {
    pub fn new(k: usize) -> Self {
        Self { k, ..Self::default() }
    }

    pub fn k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn delta(mut self, delta: f64) -> Self {
        self.delta = delta;
        self
    }

    pub fn shuffle(mut self, shuffle: ShuffleMode) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn mean(mut self, mean: MeanStrategy) -> Self {
        self.mean = mean;
        self
    }

    pub fn convergence(mut self, convergence: Convergence) -> Self {
        self.convergence = convergence;
        self
    }

    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = Some(max_iter);
        self
    }

    pub fn empty_cluster(mut self, policy: EmptyClusterPolicy) -> Self {
        self.empty_cluster = policy;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject values no run can use
    pub fn validate(&self) -> Result<()> {
        if !self.delta.is_finite() || self.delta < 0.0 {
            return Err(KMeansError::InvalidParameter(format!(
                "delta must be finite and non-negative, got {}",
                self.delta
            )));
        }
        if self.max_iter == Some(0) {
            return Err(KMeansError::InvalidParameter(
                "max_iter must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
