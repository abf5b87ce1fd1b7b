use knn_diag_core::{KnnError, KnnResult, Matrix};

/// Percentage of positions where the prediction equals the ground truth.
///
/// Both sequences must have the same, non-zero length.
pub fn accuracy<L: PartialEq>(y_true: &[L], y_pred: &[L]) -> KnnResult<f64> {
    if y_true.len() != y_pred.len() {
        return Err(KnnError::LengthMismatch {
            expected: y_true.len(),
            got: y_pred.len(),
        });
    }
    if y_true.is_empty() {
        return Err(KnnError::EmptyInput("no labels to score".into()));
    }
    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(a, b)| a == b)
        .count();
    Ok(100.0 * correct as f64 / y_true.len() as f64)
}

/// Accuracy against ground truth stored one label per row.
pub fn accuracy_from_rows<L: PartialEq + Clone>(correct: &Matrix<L>, y_pred: &[L]) -> KnnResult<f64> {
    let y_true = correct.clone().into_labels()?;
    accuracy(&y_true, y_pred)
}
