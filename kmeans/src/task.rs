//! Iteration controller: owns one clustering run from shuffling and seeding
//! through Lloyd's assign/update rounds to convergence or the iteration cap

use std::{fmt::Debug, marker::PhantomData};

use num_traits::Float;
use rand::{SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info, warn};

use crate::{
    assign::assign,
    centers::update,
    config::{Convergence, KMeansConfig, ShuffleMode},
    distance::Distance,
    error::Result,
    init_plusplus::seed_centroids,
    tools::check_dimensions,
    types::{Scalar, Vector},
};

/// Lifecycle of a task
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Uninitialized,
    Seeded,
    Iterating,
    Converged,
    /// Terminated without clustering because k was zero or not below the point count
    Degenerate,
}

/// How a run ended, and therefore what the returned centroid set means
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// k was zero; no centroids
    Empty,
    /// k was not below the point count; the dataset itself is returned, n vectors rather than k
    Passthrough,
    /// The convergence criterion was met
    Converged,
    /// The iteration cap was hit; the centroid set with the lowest inertia seen is returned.
    /// The set produced by the last update is scored too, so it is never dropped unseen.
    IterationCap,
}

/// Centroids produced by a run
#[derive(Clone, Debug, PartialEq)]
pub struct Fit<T> {
    pub centroids: Vec<Vector<T>>,
    pub outcome: Outcome,
    /// Completed assign + update rounds
    pub iterations: usize,
}

impl<T> Fit<T> {
    pub fn into_centroids(self) -> Vec<Vector<T>> {
        self.centroids
    }
}

// Task owns the dataset, configuration, distance and random generator of one
// run. Generic over the element type T, the distance result R and the distance D.
pub struct Task<T, R, D> {
    pub config: KMeansConfig,
    pub data: Vec<Vector<T>>,
    distance: D,
    rng: ChaCha20Rng,
    state: State,
    centroids: Vec<Vector<T>>,
    _result: PhantomData<fn() -> R>,
}

impl<T, R, D> Task<T, R, D>
where
    T: Scalar,
    R: Float + Send + Sync + Debug,
    D: Distance<T, R>,
{
    /// Build a task; the generator is seeded from `config.seed`, or from the OS without one
    pub fn new(data: Vec<Vector<T>>, config: KMeansConfig, distance: D) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_rng(&mut rand::rng()),
        };
        Self {
            config,
            data,
            distance,
            rng,
            state: State::Uninitialized,
            centroids: Vec::new(),
            _result: PhantomData,
        }
    }

    /// Replace the random generator, e.g. to continue an existing stream
    pub fn with_rng(mut self, rng: ChaCha20Rng) -> Self {
        self.rng = rng;
        self
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Centroids of the last run, empty before the first one
    pub fn centroids(&self) -> &[Vector<T>] {
        &self.centroids
    }

    /// Give the dataset back, in shuffled order if `ShuffleMode::InPlace` ran
    pub fn into_data(self) -> Vec<Vector<T>> {
        self.data
    }

    /// Run Lloyd's algorithm to completion
    ///
    /// Shuffles (per `config.shuffle`), seeds with K-Means++, then alternates
    /// assignment and update until the convergence criterion holds or the
    /// iteration cap is reached. k = 0 and k >= n short-circuit before any
    /// randomness is consumed.
    ///
    /// # Errors
    /// * `InvalidParameter` for a configuration `validate` rejects
    /// * `DimensionMismatch` if the dataset vectors differ in length
    /// * `CountOverflow` if, under `AccumulateDivide`, a cluster grows beyond what the element type can count
    pub fn run(&mut self) -> Result<Fit<T>> {
        let Self {
            ref config,
            ref mut data,
            ref distance,
            ref mut rng,
            ref mut state,
            ref mut centroids,
            ..
        } = *self;
        config.validate()?;

        // Step 1: degenerate k short-circuits, before any randomness is used
        let k = config.k;
        let n = data.len();
        if k == 0 {
            *state = State::Degenerate;
            *centroids = Vec::new();
            info!("k is zero, nothing to cluster");
            return Ok(Fit { centroids: Vec::new(), outcome: Outcome::Empty, iterations: 0 });
        }
        if k >= n {
            *state = State::Degenerate;
            *centroids = data.clone();
            info!(k, n, "k is not below the point count, returning the dataset");
            return Ok(Fit { centroids: data.clone(), outcome: Outcome::Passthrough, iterations: 0 });
        }

        check_dimensions(data, data[0].len())?;

        // Step 2: shuffle, either the owned dataset or a working copy of it
        let working: Vec<Vector<T>>;
        let points: &[Vector<T>] = match config.shuffle {
            ShuffleMode::Off => data.as_slice(),
            ShuffleMode::InPlace => {
                data.shuffle(rng);
                data.as_slice()
            }
            ShuffleMode::WorkingCopy => {
                let mut copy = data.clone();
                copy.shuffle(rng);
                working = copy;
                &working
            }
        };

        // Step 3: k-means++ seeding
        let mut current = seed_centroids(points, k, distance, rng);
        *state = State::Seeded;
        debug!(k, n, "seeded centroids");

        *state = State::Iterating;
        let mut iterations = 0;
        let mut best: Option<(f64, Vec<Vector<T>>)> = None;
        // Step 4: assign and update until the criterion holds or the cap is hit
        let outcome = loop {
            let assignment = assign(points, &current, distance, config.parallel)?;
            let inertia = assignment.inertia();
            if best.as_ref().is_none_or(|(lowest, _)| inertia < *lowest) {
                best = Some((inertia, current.clone()));
            }

            let next = update(points, &assignment, config.mean, config.empty_cluster)?;
            iterations += 1;
            debug!(
                iteration = iterations,
                inertia,
                empty = assignment.empty_clusters().len(),
                "lloyd iteration"
            );

            let converged = match config.convergence {
                Convergence::Exact => next == current,
                Convergence::Delta => max_shift(distance, &current, &next) <= config.delta,
            };
            current = next;

            if converged {
                info!(iterations, inertia, "converged");
                break Outcome::Converged;
            }
            if config.max_iter.is_some_and(|cap| iterations >= cap) {
                // The last update has not been assigned yet
                let last = assign(points, &current, distance, config.parallel)?.inertia();
                match best.take() {
                    Some((lowest, _)) if last < lowest => {}
                    Some((_, seen)) => current = seen,
                    None => {}
                }
                warn!(iterations, "iteration cap reached, returning best centroids seen");
                break Outcome::IterationCap;
            }
        };

        *state = State::Converged;
        *centroids = current.clone();
        Ok(Fit { centroids: current, outcome, iterations })
    }
}

/// Largest distance any centroid moved between two sets
fn max_shift<T, R, D>(distance: &D, previous: &[Vector<T>], next: &[Vector<T>]) -> f64
where
    R: Float,
    D: Distance<T, R> + ?Sized,
{
    previous
        .iter()
        .zip(next)
        .map(|(a, b)| distance.distance(a, b).to_f64().unwrap_or(f64::INFINITY))
        .fold(0.0, f64::max)
}

/// Cluster `data` in one call
///
/// `data` is handed to a [`Task`] for the run and put back afterwards, so with
/// `ShuffleMode::InPlace` the caller observes the shuffled order.
pub fn fit<T, R, D>(data: &mut Vec<Vector<T>>, config: &KMeansConfig, distance: D) -> Result<Fit<T>>
where
    T: Scalar,
    R: Float + Send + Sync + Debug,
    D: Distance<T, R>,
{
    let mut task = Task::new(std::mem::take(data), config.clone(), distance);
    let result = task.run();
    *data = task.into_data();
    result
}
