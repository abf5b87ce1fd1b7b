//! # knn-diag
//!
//! k-nearest-neighbors classification of tabular diagnostic measurements.
//!
//! ## Modules
//!
//! - **core** — `Matrix`, the `Numeric` element trait, `KnnError`
//! - **io** — integer CSV loading for feature matrices and label files
//! - **preprocessing** — column-wise z-score standardization (sample std)
//! - **neighbors** — ceiling-Euclidean distance and the majority-vote classifier
//! - **metrics** — percentage accuracy
//! - **config** — `RunConfig`: input paths, k range, log level
//! - **pipeline** — load once, standardize once, evaluate every k

pub mod config;
pub mod pipeline;

/// Matrix type and error taxonomy.
pub use knn_diag_core as core;

/// CSV loading.
pub use knn_diag_io as io;

/// Feature standardization.
pub use knn_diag_preprocessing as preprocessing;

/// Nearest neighbors.
pub use knn_diag_neighbors as neighbors;

/// Evaluation metrics.
pub use knn_diag_metrics as metrics;

pub use config::RunConfig;
pub use knn_diag_core::{KnnError, KnnResult, Matrix};
pub use pipeline::{best, run, Dataset, Experiment, KAccuracy};
