use knn_diag_core::{KnnError, KnnResult, Numeric};

/// Euclidean distance between `a` and `b`, rounded up to the next integer.
///
/// The coarse rounding makes equal distances common, so callers must rank
/// ties by training-row index.
pub fn euclidean_distance<T: Numeric>(a: &[T], b: &[T]) -> KnnResult<u64> {
    if a.len() != b.len() {
        return Err(KnnError::DimensionMismatch {
            expected: a.len(),
            got: b.len(),
        });
    }
    let sum: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let diff = x.to_f64() - y.to_f64();
            diff * diff
        })
        .sum();
    Ok(sum.sqrt().ceil() as u64)
}
