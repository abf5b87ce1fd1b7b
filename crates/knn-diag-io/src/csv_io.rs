use knn_diag_core::{KnnError, KnnResult, Matrix};
use std::path::Path;
use tracing::{debug, info};

const EXPECTED_EXTENSION: &str = "csv";

/// Read a comma-separated file of integers into a matrix.
///
/// There is no header row. Cells are trimmed before parsing and blank lines
/// are skipped. An empty file yields an empty matrix.
pub fn load_from_csv<P: AsRef<Path>>(path: P) -> KnnResult<Matrix<i64>> {
    let path = path.as_ref();
    let shown = path.display().to_string();
    check_extension(path)?;

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| io_error(&shown, e))?;

    let mut rows: Vec<Vec<i64>> = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| io_error(&shown, e))?;
        let line = record.position().map_or(idx as u64 + 1, |p| p.line()) as usize;

        let mut row = Vec::with_capacity(record.len());
        for (col, field) in record.iter().enumerate() {
            let value = field.parse::<i64>().map_err(|_| KnnError::Parse {
                path: shown.clone(),
                row: line,
                col: col + 1,
                value: field.to_string(),
            })?;
            row.push(value);
        }
        rows.push(row);
    }

    let matrix = Matrix::from_rows(rows)?;
    info!(path = %shown, rows = matrix.rows(), cols = matrix.cols(), "loaded matrix");
    Ok(matrix)
}

/// Read a labels file (one integer per row) into a flat vector.
pub fn load_labels<P: AsRef<Path>>(path: P) -> KnnResult<Vec<i64>> {
    let matrix = load_from_csv(path)?;
    let labels = matrix.into_labels()?;
    debug!(count = labels.len(), "flattened labels");
    Ok(labels)
}

fn check_extension(path: &Path) -> KnnResult<()> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    if extension != EXPECTED_EXTENSION {
        return Err(KnnError::Format {
            path: path.display().to_string(),
            extension,
        });
    }
    Ok(())
}

fn io_error(path: &str, e: csv::Error) -> KnnError {
    KnnError::Io {
        path: path.to_string(),
        reason: e.to_string(),
    }
}
