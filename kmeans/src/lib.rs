//! Lloyd's K-Means with K-Means++ seeding over generic numeric vectors
//!
//! A [`task::Task`] owns the dataset and configuration of one run and drives
//! shuffle, seeding and the assign/update iteration. The step functions are
//! public as well for callers that want to drive the iteration themselves.

pub mod assign;
pub mod centers;
pub mod config;
pub mod distance;
pub mod error;
mod init_plusplus;
pub mod task;
mod tools;
pub mod types;

pub use assign::{Assignment, assign, nearest};
pub use centers::update;
pub use config::{Convergence, EmptyClusterPolicy, KMeansConfig, ShuffleMode};
pub use distance::{Distance, Metric, l1, l1_f32, l1_f64, l2, l2_f32, l2_f64};
pub use error::{KMeansError, Result};
pub use init_plusplus::seed_centroids;
pub use task::{Fit, Outcome, State, Task, fit};
pub use types::{Cluster, MeanStrategy, Scalar, Vector};

pub use rand_chacha::ChaCha20Rng;
