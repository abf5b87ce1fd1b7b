use knn_diag_core::{KnnError, KnnResult, Matrix, Numeric};
use tracing::debug;

/// Standardize features by removing the column mean and scaling to unit
/// sample variance (N-1 denominator).
#[derive(Debug, Clone, Default)]
pub struct StandardScaler {
    pub mean: Option<Vec<f64>>,
    pub std: Option<Vec<f64>>,
}

impl StandardScaler {
    pub fn new() -> Self {
        StandardScaler {
            mean: None,
            std: None,
        }
    }

    /// Compute per-column mean and sample standard deviation.
    ///
    /// Needs at least two rows, and fails on the first column whose
    /// standard deviation is zero.
    pub fn fit<T: Numeric>(&mut self, x: &Matrix<T>) -> KnnResult<()> {
        if x.rows() < 2 {
            return Err(KnnError::InsufficientSamples { got: x.rows() });
        }
        let mut means = Vec::with_capacity(x.cols());
        let mut stds = Vec::with_capacity(x.cols());
        for col in 0..x.cols() {
            let mean = column_mean(x, col)?;
            let std = column_std_dev(x, col)?;
            if std < f64::EPSILON {
                return Err(KnnError::DegenerateColumn { column: col });
            }
            means.push(mean);
            stds.push(std);
        }
        debug!(rows = x.rows(), cols = x.cols(), "fitted standard scaler");
        self.mean = Some(means);
        self.std = Some(stds);
        Ok(())
    }

    /// Apply the fitted statistics: `(x - mean) / std` per column.
    pub fn transform<T: Numeric>(&self, x: &Matrix<T>) -> KnnResult<Matrix<f64>> {
        let (Some(mean), Some(std)) = (self.mean.as_ref(), self.std.as_ref()) else {
            return Err(KnnError::NotFitted("StandardScaler"));
        };
        if x.cols() != mean.len() && !x.is_empty() {
            return Err(KnnError::DimensionMismatch {
                expected: mean.len(),
                got: x.cols(),
            });
        }

        let mut data = Vec::with_capacity(x.rows() * x.cols());
        for row in x.iter_rows() {
            for (j, v) in row.iter().enumerate() {
                data.push((v.to_f64() - mean[j]) / std[j]);
            }
        }
        Matrix::new(data, x.rows(), x.cols())
    }

    /// Fit and transform in one step.
    pub fn fit_transform<T: Numeric>(&mut self, x: &Matrix<T>) -> KnnResult<Matrix<f64>> {
        self.fit(x)?;
        self.transform(x)
    }
}

/// Z-score every column of `x` against its own statistics.
pub fn standardize<T: Numeric>(x: &Matrix<T>) -> KnnResult<Matrix<f64>> {
    StandardScaler::new().fit_transform(x)
}

/// Arithmetic mean of column `col`.
pub fn column_mean<T: Numeric>(x: &Matrix<T>, col: usize) -> KnnResult<f64> {
    let values = column_values(x, col)?;
    if values.is_empty() {
        return Err(KnnError::EmptyInput(format!("column {col} has no values")));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation of column `col`.
pub fn column_std_dev<T: Numeric>(x: &Matrix<T>, col: usize) -> KnnResult<f64> {
    let values = column_values(x, col)?;
    let n = values.len();
    if n < 2 {
        return Err(KnnError::InsufficientSamples { got: n });
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let ss: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    Ok((ss / (n - 1) as f64).sqrt())
}

fn column_values<T: Numeric>(x: &Matrix<T>, col: usize) -> KnnResult<Vec<f64>> {
    if col >= x.cols() {
        return Err(KnnError::DimensionMismatch {
            expected: x.cols(),
            got: col + 1,
        });
    }
    Ok(x.iter_rows().map(|row| row[col].to_f64()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_standard_scaler() {
        let x = Matrix::from_rows(vec![vec![1i64, 2], vec![3, 4], vec![5, 9]]).unwrap();
        let z = standardize(&x).unwrap();

        // first column: mean 3, sample std 2
        assert_abs_diff_eq!(*z.get(0, 0).unwrap(), -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(*z.get(1, 0).unwrap(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(*z.get(2, 0).unwrap(), 1.0, epsilon = 1e-12);
        assert_eq!(z.shape(), (3, 2));
    }

    #[test]
    fn test_sample_std_uses_bessel_correction() {
        let x = Matrix::from_rows(vec![vec![2i64], vec![4], vec![4], vec![4], vec![5], vec![5], vec![7], vec![9]])
            .unwrap();
        // population std is exactly 2; the sample std is sqrt(32 / 7)
        assert_abs_diff_eq!(column_std_dev(&x, 0).unwrap(), (32.0f64 / 7.0).sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(column_mean(&x, 0).unwrap(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_standardized_columns_have_zero_mean_unit_std() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let rows = rng.gen_range(3..40);
            let cols = rng.gen_range(1..6);
            let mut data: Vec<Vec<i64>> = (0..rows)
                .map(|_| (0..cols).map(|_| rng.gen_range(-100..100)).collect())
                .collect();
            // keep every column non-constant
            for c in 0..cols {
                data[0][c] = -1000;
                data[1][c] = 1000;
            }
            let x = Matrix::from_rows(data).unwrap();
            let z = standardize(&x).unwrap();
            for c in 0..cols {
                assert_abs_diff_eq!(column_mean(&z, c).unwrap(), 0.0, epsilon = 1e-9);
                assert_abs_diff_eq!(column_std_dev(&z, c).unwrap(), 1.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_constant_column_is_degenerate() {
        let x = Matrix::from_rows(vec![vec![1i64, 7], vec![2, 7], vec![3, 7]]).unwrap();
        assert_eq!(standardize(&x).unwrap_err(), KnnError::DegenerateColumn { column: 1 });
    }

    #[test]
    fn test_too_few_rows() {
        let empty: Matrix<i64> = Matrix::empty();
        assert_eq!(standardize(&empty).unwrap_err(), KnnError::InsufficientSamples { got: 0 });

        let single = Matrix::from_rows(vec![vec![1i64, 2]]).unwrap();
        assert_eq!(standardize(&single).unwrap_err(), KnnError::InsufficientSamples { got: 1 });
    }

    #[test]
    fn test_transform_other_matrix() {
        let train = Matrix::from_rows(vec![vec![0i64], vec![2]]).unwrap();
        let mut scaler = StandardScaler::new();
        scaler.fit(&train).unwrap();

        let other = Matrix::from_rows(vec![vec![1i64], vec![3]]).unwrap();
        let z = scaler.transform(&other).unwrap();
        let s = 2.0f64.sqrt();
        assert_abs_diff_eq!(*z.get(0, 0).unwrap(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(*z.get(1, 0).unwrap(), 2.0 / s, epsilon = 1e-12);

        let wide = Matrix::from_rows(vec![vec![1i64, 2]]).unwrap();
        assert!(matches!(scaler.transform(&wide), Err(KnnError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_transform_before_fit() {
        let x = Matrix::from_rows(vec![vec![1i64], vec![2]]).unwrap();
        assert_eq!(
            StandardScaler::new().transform(&x).unwrap_err(),
            KnnError::NotFitted("StandardScaler")
        );
    }
}
