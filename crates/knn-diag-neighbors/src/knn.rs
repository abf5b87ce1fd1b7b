use knn_diag_core::{KnnError, KnnResult, Matrix, Numeric};
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::distance::euclidean_distance;

/// A training row ranked against a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor {
    pub index: usize,
    pub distance: u64,
}

fn check_k(k: usize, n_train: usize) -> KnnResult<()> {
    if k == 0 || k > n_train {
        return Err(KnnError::InvalidK { k, n_train });
    }
    Ok(())
}

fn check_labels<T, L>(train: &Matrix<T>, labels: &[L]) -> KnnResult<()> {
    if labels.len() != train.rows() {
        return Err(KnnError::LengthMismatch {
            expected: train.rows(),
            got: labels.len(),
        });
    }
    Ok(())
}

/// The `k` training rows closest to `query`, nearest first.
///
/// Equal distances are ordered by ascending training-row index.
pub fn k_nearest<T: Numeric>(query: &[T], train: &Matrix<T>, k: usize) -> KnnResult<Vec<Neighbor>> {
    check_k(k, train.rows())?;
    let mut ranked = train
        .iter_rows()
        .enumerate()
        .map(|(index, row)| {
            euclidean_distance(query, row).map(|distance| Neighbor { index, distance })
        })
        .collect::<KnnResult<Vec<_>>>()?;
    ranked.sort_unstable_by_key(|n| (n.distance, n.index));
    ranked.truncate(k);
    Ok(ranked)
}

/// Labels of the `k` nearest training rows, nearest first.
pub fn k_nearest_labels<T: Numeric, L: Clone>(
    query: &[T],
    train: &Matrix<T>,
    labels: &[L],
    k: usize,
) -> KnnResult<Vec<L>> {
    check_labels(train, labels)?;
    let nearest = k_nearest(query, train, k)?;
    Ok(nearest.iter().map(|n| labels[n.index].clone()).collect())
}

/// Most frequent label among `ranked`, which must be ordered nearest first.
///
/// When several labels share the top count, the one that appears at the
/// nearest rank wins.
pub fn majority_label<L: Clone + PartialEq>(ranked: &[L]) -> KnnResult<L> {
    // (label, votes) in order of first appearance
    let mut tally: Vec<(&L, usize)> = Vec::new();
    for label in ranked {
        match tally.iter_mut().find(|(l, _)| *l == label) {
            Some((_, votes)) => *votes += 1,
            None => tally.push((label, 1)),
        }
    }

    let mut best: Option<(&L, usize)> = None;
    for &(label, votes) in &tally {
        if best.map_or(true, |(_, top)| votes > top) {
            best = Some((label, votes));
        }
    }
    let (winner, top) = best.ok_or_else(|| KnnError::EmptyInput("no labels to vote on".into()))?;

    if tally.iter().filter(|(_, v)| *v == top).count() > 1 {
        trace!(votes = top, "vote tied, nearest-ranked label wins");
    }
    Ok(winner.clone())
}

/// Predict the label of a single query row.
pub fn predict_one<T: Numeric, L: Clone + PartialEq>(
    query: &[T],
    train: &Matrix<T>,
    labels: &[L],
    k: usize,
) -> KnnResult<L> {
    let nearest = k_nearest_labels(query, train, labels, k)?;
    majority_label(&nearest)
}

/// Predict a label for every row of `queries`, in row order.
pub fn classify<T, L>(queries: &Matrix<T>, train: &Matrix<T>, labels: &[L], k: usize) -> KnnResult<Vec<L>>
where
    T: Numeric,
    L: Clone + PartialEq + Send + Sync,
{
    check_k(k, train.rows())?;
    check_labels(train, labels)?;
    if !queries.is_empty() && queries.cols() != train.cols() {
        return Err(KnnError::DimensionMismatch {
            expected: train.cols(),
            got: queries.cols(),
        });
    }

    let rows: Vec<&[T]> = queries.iter_rows().collect();
    let predictions = rows
        .par_iter()
        .map(|row| predict_one(*row, train, labels, k))
        .collect::<KnnResult<Vec<L>>>()?;
    debug!(queries = predictions.len(), k, "classified");
    Ok(predictions)
}

/// K-Nearest Neighbors classifier over standardized features.
pub struct KNNClassifier<L> {
    pub k: usize,
    x_train: Option<Matrix<f64>>,
    y_train: Option<Vec<L>>,
}

impl<L: Clone + PartialEq + Send + Sync> KNNClassifier<L> {
    pub fn new(k: usize) -> Self {
        KNNClassifier {
            k,
            x_train: None,
            y_train: None,
        }
    }

    pub fn fit(&mut self, x: &Matrix<f64>, y: &[L]) -> KnnResult<()> {
        check_labels(x, y)?;
        check_k(self.k, x.rows())?;
        self.x_train = Some(x.clone());
        self.y_train = Some(y.to_vec());
        Ok(())
    }

    /// Change the neighbor count, validating it against the fitted data.
    pub fn set_k(&mut self, k: usize) -> KnnResult<()> {
        if let Some(x) = &self.x_train {
            check_k(k, x.rows())?;
        } else if k == 0 {
            return Err(KnnError::InvalidK { k, n_train: 0 });
        }
        self.k = k;
        Ok(())
    }

    pub fn n_train(&self) -> usize {
        self.x_train.as_ref().map_or(0, |x| x.rows())
    }

    fn fitted(&self) -> KnnResult<(&Matrix<f64>, &[L])> {
        match (self.x_train.as_ref(), self.y_train.as_deref()) {
            (Some(x), Some(y)) => Ok((x, y)),
            _ => Err(KnnError::NotFitted("KNNClassifier")),
        }
    }

    pub fn predict_one(&self, query: &[f64]) -> KnnResult<L> {
        let (x_train, y_train) = self.fitted()?;
        predict_one(query, x_train, y_train, self.k)
    }

    pub fn predict(&self, x: &Matrix<f64>) -> KnnResult<Vec<L>> {
        let (x_train, y_train) = self.fitted()?;
        classify(x, x_train, y_train, self.k)
    }
}
