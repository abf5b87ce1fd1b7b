use knn_diag_core::{KnnError, KnnResult, Matrix};
use knn_diag_io::{load_from_csv, load_labels};
use knn_diag_metrics::accuracy;
use knn_diag_neighbors::KNNClassifier;
use knn_diag_preprocessing::standardize;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::time::Instant;
use tracing::{debug, info};

use crate::config::RunConfig;

/// The four inputs of a run, checked for consistency with each other.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub data: Matrix<i64>,
    pub correct_labels: Vec<i64>,
    pub learning_data: Matrix<i64>,
    pub learning_labels: Vec<i64>,
}

impl Dataset {
    pub fn new(
        data: Matrix<i64>,
        correct_labels: Vec<i64>,
        learning_data: Matrix<i64>,
        learning_labels: Vec<i64>,
    ) -> KnnResult<Self> {
        if correct_labels.len() != data.rows() {
            return Err(KnnError::LengthMismatch {
                expected: data.rows(),
                got: correct_labels.len(),
            });
        }
        if learning_labels.len() != learning_data.rows() {
            return Err(KnnError::LengthMismatch {
                expected: learning_data.rows(),
                got: learning_labels.len(),
            });
        }
        if !data.is_empty() && !learning_data.is_empty() && data.cols() != learning_data.cols() {
            return Err(KnnError::DimensionMismatch {
                expected: learning_data.cols(),
                got: data.cols(),
            });
        }
        Ok(Dataset {
            data,
            correct_labels,
            learning_data,
            learning_labels,
        })
    }

    /// Load the files named by `config`.
    pub fn load(config: &RunConfig) -> KnnResult<Self> {
        let data = load_from_csv(config.data_path())?;
        let correct_labels = load_labels(config.correct_labels_path())?;
        let learning_data = load_from_csv(config.learning_data_path())?;
        let learning_labels = load_labels(config.learning_labels_path())?;
        Dataset::new(data, correct_labels, learning_data, learning_labels)
    }
}

/// Accuracy obtained for one neighbor count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KAccuracy {
    pub k: usize,
    pub accuracy: f64,
}

impl fmt::Display for KAccuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "k={}, Accuracy={:.2}%", self.k, self.accuracy)
    }
}

/// Standardized data and a fitted classifier, reusable across k values.
///
/// The query and training matrices are each standardized against their own
/// column statistics.
pub struct Experiment {
    standardized_data: Matrix<f64>,
    correct_labels: Vec<i64>,
    classifier: KNNClassifier<i64>,
}

impl Experiment {
    pub fn new(dataset: &Dataset) -> KnnResult<Self> {
        let standardized_data = standardize(&dataset.data)?;
        let standardized_learning = standardize(&dataset.learning_data)?;

        let mut classifier = KNNClassifier::new(1);
        classifier.fit(&standardized_learning, &dataset.learning_labels)?;
        debug!(
            queries = standardized_data.rows(),
            training = standardized_learning.rows(),
            features = standardized_learning.cols(),
            "standardized inputs"
        );

        Ok(Experiment {
            standardized_data,
            correct_labels: dataset.correct_labels.clone(),
            classifier,
        })
    }

    /// Classify every query row with `k` neighbors and score the result.
    pub fn evaluate(&mut self, k: usize) -> KnnResult<KAccuracy> {
        let start = Instant::now();
        self.classifier.set_k(k)?;
        let predicted = self.classifier.predict(&self.standardized_data)?;
        let accuracy = accuracy(&self.correct_labels, &predicted)?;
        debug!(k, accuracy, elapsed_ms = start.elapsed().as_millis() as u64, "evaluated");
        Ok(KAccuracy { k, accuracy })
    }

    pub fn run(&mut self, ks: RangeInclusive<usize>) -> KnnResult<Vec<KAccuracy>> {
        ks.map(|k| self.evaluate(k)).collect()
    }
}

/// Load, standardize and evaluate every k in the configured range.
pub fn run(config: &RunConfig) -> KnnResult<Vec<KAccuracy>> {
    config.validate()?;
    let dataset = Dataset::load(config)?;
    let mut experiment = Experiment::new(&dataset)?;
    let report = experiment.run(config.k_range())?;
    if let Some(top) = best(&report) {
        info!(k = top.k, accuracy = top.accuracy, "best neighbor count");
    }
    Ok(report)
}

/// Highest accuracy in `report`; the smallest k wins a tie.
pub fn best(report: &[KAccuracy]) -> Option<KAccuracy> {
    report.iter().copied().fold(None, |best, r| match best {
        Some(b) if b.accuracy > r.accuracy || (b.accuracy == r.accuracy && b.k <= r.k) => Some(b),
        _ => Some(r),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rows(data: &[&[i64]]) -> Matrix<i64> {
        Matrix::from_rows(data.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    fn clustered() -> Dataset {
        let learning = rows(&[&[1, 2], &[2, 1], &[1, 1], &[9, 8], &[8, 9], &[9, 9]]);
        let data = rows(&[&[1, 1], &[9, 8], &[2, 2], &[8, 8]]);
        Dataset::new(data, vec![0, 1, 0, 1], learning, vec![0, 0, 0, 1, 1, 1]).unwrap()
    }

    #[test]
    fn test_display_format() {
        let r = KAccuracy { k: 3, accuracy: 68.5 };
        assert_eq!(r.to_string(), "k=3, Accuracy=68.50%");
        let r = KAccuracy { k: 15, accuracy: 200.0 / 3.0 };
        assert_eq!(r.to_string(), "k=15, Accuracy=66.67%");
    }

    #[test]
    fn test_experiment_separates_clusters() {
        let mut experiment = Experiment::new(&clustered()).unwrap();
        let report = experiment.run(1..=3).unwrap();
        assert_eq!(report.len(), 3);
        for r in &report {
            assert_relative_eq!(r.accuracy, 100.0);
        }
    }

    #[test]
    fn test_k_larger_than_training_set() {
        let mut experiment = Experiment::new(&clustered()).unwrap();
        assert_eq!(
            experiment.evaluate(7).unwrap_err(),
            KnnError::InvalidK { k: 7, n_train: 6 }
        );
    }

    #[test]
    fn test_dataset_consistency() {
        let learning = rows(&[&[1, 2], &[2, 1]]);
        let data = rows(&[&[1, 1]]);
        assert!(matches!(
            Dataset::new(data.clone(), vec![0, 1], learning.clone(), vec![0, 1]),
            Err(KnnError::LengthMismatch { expected: 1, got: 2 })
        ));
        assert!(matches!(
            Dataset::new(data, vec![0], learning.clone(), vec![0]),
            Err(KnnError::LengthMismatch { expected: 2, got: 1 })
        ));
        let wide = rows(&[&[1, 1, 1]]);
        assert!(matches!(
            Dataset::new(wide, vec![0], learning, vec![0, 1]),
            Err(KnnError::DimensionMismatch { expected: 2, got: 3 })
        ));
    }

    #[test]
    fn test_empty_query_matrix_is_rejected() {
        let learning = rows(&[&[1, 2], &[2, 1]]);
        let dataset = Dataset::new(Matrix::empty(), vec![], learning, vec![0, 1]).unwrap();
        assert!(matches!(
            Experiment::new(&dataset),
            Err(KnnError::InsufficientSamples { got: 0 })
        ));
    }

    #[test]
    fn test_best() {
        let report = [
            KAccuracy { k: 3, accuracy: 90.0 },
            KAccuracy { k: 4, accuracy: 95.0 },
            KAccuracy { k: 5, accuracy: 95.0 },
            KAccuracy { k: 6, accuracy: 80.0 },
        ];
        assert_eq!(best(&report).unwrap().k, 4);
        assert!(best(&[]).is_none());
    }
}
