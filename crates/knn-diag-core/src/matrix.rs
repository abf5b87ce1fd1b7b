use crate::dtype::Numeric;
use crate::error::{KnnError, KnnResult};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense row-major matrix — every row has the same number of columns.
///
/// Stores data in a flat contiguous `Vec<T>`. A matrix with zero rows is
/// valid and reports zero columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

// ─── Construction ───────────────────────────────────────────────────────────

impl<T> Matrix<T> {
    /// Create a matrix from flat row-major data.
    pub fn new(data: Vec<T>, rows: usize, cols: usize) -> KnnResult<Self> {
        if data.len() != rows * cols {
            return Err(KnnError::DimensionMismatch {
                expected: rows * cols,
                got: data.len(),
            });
        }
        Ok(Matrix { data, rows, cols })
    }

    /// A 0×0 matrix.
    pub fn empty() -> Self {
        Matrix {
            data: Vec::new(),
            rows: 0,
            cols: 0,
        }
    }

    /// Build a matrix from owned rows, rejecting ragged input.
    pub fn from_rows(rows: Vec<Vec<T>>) -> KnnResult<Self> {
        let Some(first) = rows.first() else {
            return Ok(Matrix::empty());
        };
        let cols = first.len();
        let n = rows.len();
        let mut data = Vec::with_capacity(n * cols);
        for row in rows {
            if row.len() != cols {
                return Err(KnnError::DimensionMismatch {
                    expected: cols,
                    got: row.len(),
                });
            }
            data.extend(row);
        }
        Ok(Matrix {
            data,
            rows: n,
            cols,
        })
    }
}

// ─── Accessors ──────────────────────────────────────────────────────────────

impl<T> Matrix<T> {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Borrow row `i`, or `None` when out of bounds.
    pub fn row(&self, i: usize) -> Option<&[T]> {
        if i >= self.rows {
            return None;
        }
        let start = i * self.cols;
        Some(&self.data[start..start + self.cols])
    }

    pub fn get(&self, r: usize, c: usize) -> Option<&T> {
        if r >= self.rows || c >= self.cols {
            return None;
        }
        self.data.get(r * self.cols + c)
    }

    /// Iterate over rows in index order.
    pub fn iter_rows(&self) -> impl ExactSizeIterator<Item = &[T]> + '_ {
        // chunks_exact(0) panics, and a zero-column matrix has no meaningful rows
        let width = self.cols.max(1);
        let n = if self.cols == 0 { 0 } else { self.rows };
        self.data.chunks_exact(width).take(n)
    }

    /// Apply `f` to every element, keeping the shape.
    pub fn map<U, F: Fn(&T) -> U>(&self, f: F) -> Matrix<U> {
        Matrix {
            data: self.data.iter().map(f).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Flatten a single-column matrix into its values.
    ///
    /// Label files store one value per row; anything wider is rejected.
    pub fn into_labels(self) -> KnnResult<Vec<T>> {
        if self.rows > 0 && self.cols != 1 {
            return Err(KnnError::DimensionMismatch {
                expected: 1,
                got: self.cols,
            });
        }
        Ok(self.data)
    }
}

impl<T: Clone> Matrix<T> {
    /// Copy out column `j`.
    pub fn column(&self, j: usize) -> Option<Vec<T>> {
        if j >= self.cols {
            return None;
        }
        Some(self.iter_rows().map(|row| row[j].clone()).collect())
    }
}

impl<T: Numeric> Matrix<T> {
    /// Widen every element to `f64`.
    pub fn to_f64(&self) -> Matrix<f64> {
        self.map(|v| v.to_f64())
    }
}

impl<T: fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix({}x{})", self.rows, self.cols)?;
        for row in self.iter_rows() {
            write!(f, "[")?;
            for (j, v) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", v)?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}
